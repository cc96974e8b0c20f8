//! Aggregate views over a cleaned table.
//!
//! Pure read operations: nothing here mutates the table, so the caller can
//! recompute any view after filtering without bookkeeping. Ties in the
//! frequency rankings keep first-encountered (source row) order.
//!
//! # Example
//!
//! ```
//! use pubmeta::{read_table, top_journals};
//!
//! let csv = "title,journal\na,Nature\nb,Science\nc,Nature";
//! let table = read_table(csv.as_bytes(), None).unwrap();
//! let top = top_journals(&table, "journal", 10).unwrap();
//! assert_eq!(top, vec![("Nature".to_string(), 2), ("Science".to_string(), 1)]);
//! ```

use itertools::Itertools;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::table::{Table, Value};
use crate::{MetadataError, Result};

/// Default number of journals returned by [`top_journals`].
pub const TOP_JOURNALS_DEFAULT: usize = 10;
/// Default number of words returned by [`top_words`].
pub const TOP_WORDS_DEFAULT: usize = 25;
/// Default minimum word length for [`top_words`].
pub const MIN_WORD_LEN_DEFAULT: usize = 3;

/// Frequency counter that remembers insertion order so that equal counts
/// sort by first encounter.
#[derive(Debug, Default)]
struct OrderedCounter {
    counts: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl OrderedCounter {
    fn add(&mut self, key: String) {
        match self.index.get(&key) {
            Some(&i) => self.counts[i].1 += 1,
            None => {
                self.index.insert(key.clone(), self.counts.len());
                self.counts.push((key, 1));
            }
        }
    }

    /// Top `n` entries, descending by count; stable sort keeps insertion
    /// order on ties.
    fn into_top(mut self, n: usize) -> Vec<(String, u64)> {
        self.counts.sort_by_key(|(_, count)| std::cmp::Reverse(*count));
        self.counts.truncate(n);
        self.counts
    }
}

/// Counts rows per `year`, ascending by year. Missing years are excluded.
#[must_use]
pub fn pubs_per_year(table: &Table) -> Vec<(i32, u64)> {
    let mut counts: BTreeMap<i32, u64> = BTreeMap::new();
    if let Some(years) = table.column("year") {
        for value in years {
            if let Some(year) = value.as_int() {
                *counts.entry(year as i32).or_default() += 1;
            }
        }
    }
    counts.into_iter().collect()
}

/// Counts rows per journal, descending, truncated to the top `n`.
///
/// Missing journal values are excluded from the counts.
///
/// # Errors
///
/// Returns [`MetadataError::Configuration`] when `journal_column` does not
/// exist.
pub fn top_journals(table: &Table, journal_column: &str, n: usize) -> Result<Vec<(String, u64)>> {
    let values = table.column(journal_column).ok_or_else(|| {
        MetadataError::Configuration(format!("column `{journal_column}` not found in table"))
    })?;
    let mut counter = OrderedCounter::default();
    for value in values {
        if !value.is_missing() {
            counter.add(value.to_text());
        }
    }
    Ok(counter.into_top(n))
}

/// Counts word frequencies in a text column, descending, truncated to the
/// top `top_n`.
///
/// All non-missing values are concatenated and lowercased; a word is a run
/// of at least `min_len` lowercase letters on word boundaries. No stopword
/// filtering is applied, so very common words dominate the head of the
/// result.
///
/// # Errors
///
/// Returns [`MetadataError::Configuration`] when `column` does not exist or
/// the word pattern cannot be built.
pub fn top_words(
    table: &Table,
    column: &str,
    min_len: usize,
    top_n: usize,
) -> Result<Vec<(String, u64)>> {
    let values = table.column(column).ok_or_else(|| {
        MetadataError::Configuration(format!("column `{column}` not found in table"))
    })?;
    let text = values
        .filter(|v| !v.is_missing())
        .map(Value::to_text)
        .join(" ")
        .to_lowercase();

    let word_re = Regex::new(&format!(r"\b[a-z]{{{min_len},}}\b"))
        .map_err(|e| MetadataError::Configuration(format!("invalid word pattern: {e}")))?;

    let mut counter = OrderedCounter::default();
    for found in word_re.find_iter(&text) {
        counter.add(found.as_str().to_string());
    }
    Ok(counter.into_top(top_n))
}

/// Headline numbers for a cleaned table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusSummary {
    /// Total number of records
    pub total_records: usize,
    /// Distinct non-missing journal values, 0 without a journal column
    pub unique_journals: usize,
    /// Mean of `abstract_word_count`, 0.0 for an empty table
    pub mean_abstract_words: f64,
}

/// Computes the summary metrics shown at the top of a dashboard.
#[must_use]
pub fn summarize(table: &Table, journal_column: Option<&str>) -> CorpusSummary {
    let unique_journals = journal_column
        .and_then(|c| table.column(c))
        .map(|values| {
            values
                .filter(|v| !v.is_missing())
                .map(Value::to_text)
                .unique()
                .count()
        })
        .unwrap_or(0);

    let mean_abstract_words = table
        .column("abstract_word_count")
        .map(|values| {
            let counts: Vec<i64> = values.filter_map(Value::as_int).collect();
            if counts.is_empty() {
                0.0
            } else {
                counts.iter().sum::<i64>() as f64 / counts.len() as f64
            }
        })
        .unwrap_or(0.0);

    CorpusSummary {
        total_records: table.len(),
        unique_journals,
        mean_abstract_words,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::read_table;
    use pretty_assertions::assert_eq;

    fn table_of(csv: &str) -> Table {
        read_table(csv.as_bytes(), None).unwrap()
    }

    #[test]
    fn test_pubs_per_year_ascending() {
        let mut table = Table::new(vec!["year".to_string()]);
        for year in [2021, 2019, 2021, 2020, 2021] {
            table.push_row(vec![Value::Int(year)]);
        }
        table.push_row(vec![Value::Missing]);

        assert_eq!(pubs_per_year(&table), vec![(2019, 1), (2020, 1), (2021, 3)]);
    }

    #[test]
    fn test_pubs_per_year_without_year_column() {
        let table = table_of("title\nA");
        assert_eq!(pubs_per_year(&table), vec![]);
    }

    #[test]
    fn test_top_journals_order_and_truncation() {
        let mut csv = String::from("journal\n");
        for _ in 0..40 {
            csv.push_str("Nature\n");
        }
        for _ in 0..25 {
            csv.push_str("Science\n");
        }
        for i in 0..5 {
            csv.push_str(&format!("Journal {i}\n"));
        }
        let table = table_of(&csv);

        let top = top_journals(&table, "journal", 2).unwrap();
        assert_eq!(
            top,
            vec![("Nature".to_string(), 40), ("Science".to_string(), 25)]
        );

        // Singleton journals tie; first-encountered order decides.
        let all = top_journals(&table, "journal", 10).unwrap();
        assert_eq!(all[2].0, "Journal 0");
        assert_eq!(all[6].0, "Journal 4");
    }

    #[test]
    fn test_top_journals_excludes_missing() {
        let mut table = Table::new(vec!["journal".to_string()]);
        table.push_row(vec![Value::text("Nature")]);
        table.push_row(vec![Value::Missing]);
        table.push_row(vec![Value::text("Nature")]);
        let top = top_journals(&table, "journal", 10).unwrap();
        assert_eq!(top, vec![("Nature".to_string(), 2)]);
    }

    #[test]
    fn test_top_journals_unknown_column() {
        let table = table_of("title\nA");
        assert!(matches!(
            top_journals(&table, "journal", 10),
            Err(MetadataError::Configuration(_))
        ));
    }

    #[test]
    fn test_top_words_min_len_boundary() {
        let table = table_of("abstract\nthe quick brown fox");
        let words = top_words(&table, "abstract", 3, 25).unwrap();
        // "fox" is exactly three letters, so all four words qualify.
        assert_eq!(
            words,
            vec![
                ("the".to_string(), 1),
                ("quick".to_string(), 1),
                ("brown".to_string(), 1),
                ("fox".to_string(), 1),
            ]
        );

        let words = top_words(&table, "abstract", 4, 25).unwrap();
        assert_eq!(
            words,
            vec![("quick".to_string(), 1), ("brown".to_string(), 1)]
        );
    }

    #[test]
    fn test_top_words_lowercases_and_counts() {
        let table = table_of("abstract\nViral load and VIRAL spread\nviral dynamics");
        let words = top_words(&table, "abstract", 3, 2).unwrap();
        assert_eq!(words[0], ("viral".to_string(), 3));
    }

    #[test]
    fn test_top_words_ordering_non_increasing() {
        let table = table_of("abstract\naaa bbb aaa ccc bbb aaa ddd");
        let words = top_words(&table, "abstract", 3, 25).unwrap();
        for pair in words.windows(2) {
            assert!(pair[0].1 >= pair[1].1);
        }
    }

    #[test]
    fn test_summarize() {
        let mut table = table_of(
            "journal,abstract_word_count\n\
             Nature,10\n\
             Science,20\n\
             Nature,30",
        );
        let summary = summarize(&table, Some("journal"));
        assert_eq!(summary.total_records, 3);
        assert_eq!(summary.unique_journals, 2);
        assert_eq!(summary.mean_abstract_words, 20.0);

        table.retain_rows(|_| false);
        let empty = summarize(&table, Some("journal"));
        assert_eq!(empty.total_records, 0);
        assert_eq!(empty.mean_abstract_words, 0.0);
    }

    #[test]
    fn test_summarize_without_journal_column() {
        let table = table_of("title\nA");
        let summary = summarize(&table, None);
        assert_eq!(summary.unique_journals, 0);
        assert_eq!(summary.mean_abstract_words, 0.0);
    }
}
