//! Heuristic column detection.
//!
//! Real metadata exports rarely agree on column names ("Title",
//! "publication_name", "journal_ref", ...). This module proposes candidate
//! columns for each semantic role by case-insensitive substring matching
//! against a fixed keyword list. It only proposes; resolution to a single
//! column per role happens in [`crate::schema`].
//!
//! # Example
//!
//! ```
//! use pubmeta::{detect_columns, read_table, ColumnRole};
//!
//! let csv = "Paper Title,Publish Date,Journal Name\na,b,c";
//! let table = read_table(csv.as_bytes(), None).unwrap();
//! let candidates = detect_columns(&table);
//!
//! assert_eq!(candidates.for_role(ColumnRole::Date), &["Publish Date"]);
//! // "Journal Name" contains both "journal" and "name"
//! assert_eq!(
//!     candidates.for_role(ColumnRole::Title),
//!     &["Paper Title", "Journal Name"]
//! );
//! ```

use serde::{Deserialize, Serialize};

use crate::table::Table;

/// The semantic roles a metadata column can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnRole {
    Title,
    Date,
    Journal,
    Abstract,
    Authors,
}

/// Keyword substrings that mark a column name as a candidate for a role.
const ROLE_KEYWORDS: &[(ColumnRole, &[&str])] = &[
    (ColumnRole::Title, &["title", "name"]),
    (ColumnRole::Date, &["publish", "date"]),
    (ColumnRole::Journal, &["journal"]),
    (ColumnRole::Abstract, &["abstract", "summary", "description"]),
    (ColumnRole::Authors, &["author", "creator"]),
];

/// True when the lowercase column name contains one of the role's keywords.
pub(crate) fn role_matches(role: ColumnRole, column: &str) -> bool {
    let lower = column.to_lowercase();
    ROLE_KEYWORDS
        .iter()
        .find(|(r, _)| *r == role)
        .is_some_and(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
}

/// Candidate columns per semantic role, in source column order.
///
/// A column may appear under zero, one, or several roles; an empty list
/// means nothing in the table matched that role.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnCandidates {
    title: Vec<String>,
    date: Vec<String>,
    journal: Vec<String>,
    abstract_text: Vec<String>,
    authors: Vec<String>,
}

impl ColumnCandidates {
    /// The candidate column names for a role, preserving table order.
    #[must_use]
    pub fn for_role(&self, role: ColumnRole) -> &[String] {
        match role {
            ColumnRole::Title => &self.title,
            ColumnRole::Date => &self.date,
            ColumnRole::Journal => &self.journal,
            ColumnRole::Abstract => &self.abstract_text,
            ColumnRole::Authors => &self.authors,
        }
    }

    fn push(&mut self, role: ColumnRole, column: &str) {
        let list = match role {
            ColumnRole::Title => &mut self.title,
            ColumnRole::Date => &mut self.date,
            ColumnRole::Journal => &mut self.journal,
            ColumnRole::Abstract => &mut self.abstract_text,
            ColumnRole::Authors => &mut self.authors,
        };
        list.push(column.to_string());
    }
}

/// Scans the table's column names and returns the candidates for every role.
///
/// Pure and deterministic: the result depends only on the column names and
/// their order.
#[must_use]
pub fn detect_columns(table: &Table) -> ColumnCandidates {
    let mut candidates = ColumnCandidates::default();
    for column in table.columns() {
        for (role, _) in ROLE_KEYWORDS {
            if role_matches(*role, column) {
                candidates.push(*role, column);
            }
        }
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn table_with(columns: &[&str]) -> Table {
        Table::new(columns.iter().map(|c| c.to_string()).collect())
    }

    #[rstest]
    #[case(ColumnRole::Date, "Publish Time", true)]
    #[case(ColumnRole::Date, "submission_date", true)]
    #[case(ColumnRole::Date, "year", false)]
    #[case(ColumnRole::Title, "ARTICLE TITLE", true)]
    #[case(ColumnRole::Title, "journal_name", true)]
    #[case(ColumnRole::Abstract, "Summary", true)]
    #[case(ColumnRole::Abstract, "description_html", true)]
    #[case(ColumnRole::Authors, "creator_list", true)]
    #[case(ColumnRole::Journal, "Journal", true)]
    #[case(ColumnRole::Journal, "source", false)]
    fn test_role_matching(#[case] role: ColumnRole, #[case] column: &str, #[case] expected: bool) {
        assert_eq!(role_matches(role, column), expected);
    }

    #[test]
    fn test_candidates_preserve_column_order() {
        let table = table_with(&["update_date", "Title", "publish_time", "date_added"]);
        let candidates = detect_columns(&table);
        assert_eq!(
            candidates.for_role(ColumnRole::Date),
            &["update_date", "publish_time", "date_added"]
        );
    }

    #[test]
    fn test_column_in_multiple_roles() {
        let table = table_with(&["journal_name"]);
        let candidates = detect_columns(&table);
        assert_eq!(candidates.for_role(ColumnRole::Journal), &["journal_name"]);
        assert_eq!(candidates.for_role(ColumnRole::Title), &["journal_name"]);
    }

    #[test]
    fn test_no_match_gives_empty_list() {
        let table = table_with(&["doi", "license", "url"]);
        let candidates = detect_columns(&table);
        assert!(candidates.for_role(ColumnRole::Abstract).is_empty());
        assert!(candidates.for_role(ColumnRole::Date).is_empty());
    }
}
