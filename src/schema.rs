//! Resolved column schema.
//!
//! Rather than re-running name heuristics at every pipeline stage, the
//! semantic roles are resolved to concrete column names exactly once, at
//! configuration time. Caller-supplied overrides win over detection and are
//! validated against the table; detection falls back to the first candidate
//! in column order.

use serde::{Deserialize, Serialize};

use crate::detect::{detect_columns, ColumnCandidates, ColumnRole};
use crate::table::Table;
use crate::{MetadataError, Result};

/// Caller-supplied column names, one optional override per role.
///
/// Any role left as `None` is auto-detected during [`Schema::resolve`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnOverrides {
    pub title: Option<String>,
    pub date: Option<String>,
    pub journal: Option<String>,
    pub abstract_text: Option<String>,
    pub authors: Option<String>,
}

/// Concrete column names for each semantic role, resolved once per table.
///
/// `title` and `date` are required for the pipeline to run; the remaining
/// roles stay `None` when the table has no matching column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub title: String,
    pub date: String,
    pub journal: Option<String>,
    pub abstract_text: Option<String>,
    pub authors: Option<String>,
}

impl Schema {
    /// Resolves every role against the table.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::Configuration`] when an override names a
    /// column the table does not have, or when no title or date column can
    /// be found at all.
    pub fn resolve(table: &Table, overrides: &ColumnOverrides) -> Result<Self> {
        let candidates = detect_columns(table);
        Ok(Schema {
            title: required(
                table,
                overrides.title.as_deref(),
                ColumnRole::Title,
                &candidates,
                "no suitable title column found",
            )?,
            date: required(
                table,
                overrides.date.as_deref(),
                ColumnRole::Date,
                &candidates,
                "no suitable date column found",
            )?,
            journal: optional(table, overrides.journal.as_deref(), ColumnRole::Journal, &candidates)?,
            abstract_text: optional(
                table,
                overrides.abstract_text.as_deref(),
                ColumnRole::Abstract,
                &candidates,
            )?,
            authors: optional(table, overrides.authors.as_deref(), ColumnRole::Authors, &candidates)?,
        })
    }
}

/// Validates an explicit override against the table's columns.
fn validated(table: &Table, name: &str) -> Result<String> {
    if table.column_index(name).is_some() {
        Ok(name.to_string())
    } else {
        Err(MetadataError::Configuration(format!(
            "column `{name}` not found in table"
        )))
    }
}

fn required(
    table: &Table,
    override_name: Option<&str>,
    role: ColumnRole,
    candidates: &ColumnCandidates,
    missing_message: &str,
) -> Result<String> {
    match override_name {
        Some(name) => validated(table, name),
        None => candidates
            .for_role(role)
            .first()
            .cloned()
            .ok_or_else(|| MetadataError::Configuration(missing_message.to_string())),
    }
}

fn optional(
    table: &Table,
    override_name: Option<&str>,
    role: ColumnRole,
    candidates: &ColumnCandidates,
) -> Result<Option<String>> {
    match override_name {
        Some(name) => validated(table, name).map(Some),
        None => Ok(candidates.for_role(role).first().cloned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn table_with(columns: &[&str]) -> Table {
        Table::new(columns.iter().map(|c| c.to_string()).collect())
    }

    #[test]
    fn test_resolve_by_detection() {
        let table = table_with(&["Title", "Publish Date", "Journal", "Abstract"]);
        let schema = Schema::resolve(&table, &ColumnOverrides::default()).unwrap();

        assert_eq!(schema.title, "Title");
        assert_eq!(schema.date, "Publish Date");
        assert_eq!(schema.journal.as_deref(), Some("Journal"));
        assert_eq!(schema.abstract_text.as_deref(), Some("Abstract"));
        assert_eq!(schema.authors, None);
    }

    #[test]
    fn test_override_wins_over_detection() {
        let table = table_with(&["Title", "created_date", "update_date"]);
        let overrides = ColumnOverrides {
            date: Some("update_date".to_string()),
            ..Default::default()
        };
        let schema = Schema::resolve(&table, &overrides).unwrap();
        assert_eq!(schema.date, "update_date");
    }

    #[test]
    fn test_unknown_override_is_configuration_error() {
        let table = table_with(&["Title", "date"]);
        let overrides = ColumnOverrides {
            journal: Some("venue".to_string()),
            ..Default::default()
        };
        let result = Schema::resolve(&table, &overrides);
        assert!(matches!(result, Err(MetadataError::Configuration(_))));
    }

    #[test]
    fn test_missing_date_column() {
        let table = table_with(&["Title", "Journal"]);
        let err = Schema::resolve(&table, &ColumnOverrides::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: no suitable date column found"
        );
    }
}
