//! Record cleaning.
//!
//! Takes a date-canonicalized table and produces a cleaned copy with the
//! derived columns the presentation layer relies on: `title` (text, from
//! whichever source column holds titles), `abstract` (text, empty when the
//! source has none), and `abstract_word_count`. Optionally drops records
//! that lack a usable title or publish time.
//!
//! Data-quality problems never error here; they degrade to empty text or
//! zero. The only failure mode is a missing title column.

use serde::{Deserialize, Serialize};

use crate::schema::Schema;
use crate::table::{Table, Value};
use crate::{MetadataError, Result};

/// Configuration for [`clean_records`].
///
/// # Examples
///
/// ```
/// use pubmeta::CleanConfig;
///
/// let mut config = CleanConfig::new("Title");
/// config
///     .set_abstract_column(Some("Summary".to_string()))
///     .set_drop_missing(false);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanConfig {
    /// Source column holding titles
    title_column: String,
    /// Source column holding abstracts, if any
    abstract_column: Option<String>,
    /// Whether to drop rows missing a title or publish time
    drop_missing: bool,
}

impl CleanConfig {
    /// Creates a configuration for the given title column, with no abstract
    /// column and `drop_missing` enabled.
    #[must_use]
    pub fn new(title_column: impl Into<String>) -> Self {
        Self {
            title_column: title_column.into(),
            abstract_column: None,
            drop_missing: true,
        }
    }

    /// Builds a configuration from a resolved [`Schema`].
    #[must_use]
    pub fn from_schema(schema: &Schema) -> Self {
        Self {
            title_column: schema.title.clone(),
            abstract_column: schema.abstract_text.clone(),
            drop_missing: true,
        }
    }

    /// Sets the abstract source column.
    pub fn set_abstract_column(&mut self, column: Option<String>) -> &mut Self {
        self.abstract_column = column;
        self
    }

    /// Sets whether rows missing a title or publish time are dropped.
    pub fn set_drop_missing(&mut self, drop_missing: bool) -> &mut Self {
        self.drop_missing = drop_missing;
        self
    }
}

/// Cleans a date-canonicalized table, returning a copy.
///
/// - With `drop_missing`, rows whose title or `publish_time` is missing are
///   removed.
/// - `title` is set to the text form of the title column for every
///   remaining row.
/// - `abstract` is the text form of the abstract column with missing values
///   replaced by empty text, or empty text everywhere when no abstract
///   column is configured or present.
/// - `abstract_word_count` is the number of whitespace-separated tokens in
///   `abstract`.
///
/// # Errors
///
/// Returns [`MetadataError::Configuration`] when the title column does not
/// exist, or when `drop_missing` is requested on a table that has no
/// `publish_time` column yet.
pub fn clean_records(table: &Table, config: &CleanConfig) -> Result<Table> {
    let title_idx = table.column_index(&config.title_column).ok_or_else(|| {
        MetadataError::Configuration(format!(
            "column `{}` not found in table",
            config.title_column
        ))
    })?;

    let mut cleaned = table.clone();

    if config.drop_missing {
        let time_idx = cleaned.column_index("publish_time").ok_or_else(|| {
            MetadataError::Configuration(
                "column `publish_time` not found; canonicalize dates first".to_string(),
            )
        })?;
        cleaned.retain_rows(|row| !row[title_idx].is_missing() && !row[time_idx].is_missing());
    }

    let titles: Vec<Value> = cleaned
        .iter_rows()
        .map(|row| Value::Text(row[title_idx].to_text()))
        .collect();

    let abstract_idx = config
        .abstract_column
        .as_deref()
        .and_then(|c| cleaned.column_index(c));
    let abstracts: Vec<Value> = match abstract_idx {
        Some(idx) => cleaned
            .iter_rows()
            .map(|row| Value::Text(row[idx].to_text()))
            .collect(),
        None => vec![Value::Text(String::new()); cleaned.len()],
    };

    let word_counts: Vec<Value> = abstracts
        .iter()
        .map(|v| {
            let words = v.as_str().map_or(0, |s| s.split_whitespace().count());
            Value::Int(words as i64)
        })
        .collect();

    cleaned.set_column("title", titles)?;
    cleaned.set_column("abstract", abstracts)?;
    cleaned.set_column("abstract_word_count", word_counts)?;
    Ok(cleaned)
}
