//! A library for loading, cleaning, and summarizing publication metadata tables.
//!
//! `pubmeta` turns a CSV of publication records (title, publication date,
//! journal, abstract, authors, under whatever column names the source uses)
//! into a cleaned in-memory table with a guaranteed set of derived columns,
//! plus a handful of aggregate views suitable for driving a dashboard.
//!
//! # Key Features
//!
//! - **Tolerant loading**: malformed CSV rows are skipped, not fatal
//! - **Column detection**: heuristic matching of column names to semantic
//!   roles (title, date, journal, abstract, authors)
//! - **Date canonicalization**: best-effort parsing of real-world date
//!   strings into `publish_time`/`year` columns
//! - **Record cleaning**: normalized `title`/`abstract` columns and a
//!   per-record `abstract_word_count`
//! - **Aggregates**: publications per year, top journals, top words, and a
//!   corpus summary
//!
//! # Basic Usage
//!
//! ```rust
//! use pubmeta::{canonicalize_dates, clean_records, pubs_per_year, read_table, CleanConfig};
//!
//! let csv = "\
//! Title,Publish Date,Journal
//! Viral kinetics,2020-03-01,Nature
//! Spike protein,2021-07-04,Science";
//!
//! let mut table = read_table(csv.as_bytes(), None).unwrap();
//! canonicalize_dates(&mut table, None).unwrap();
//! let cleaned = clean_records(&table, &CleanConfig::new("Title")).unwrap();
//!
//! assert_eq!(pubs_per_year(&cleaned), vec![(2020, 1), (2021, 1)]);
//! ```
//!
//! # Pipeline Entry Point
//!
//! The individual stages above can be driven in one call from an explicit
//! configuration, optionally memoized per source file:
//!
//! ```rust,no_run
//! use pubmeta::{PipelineConfig, TableCache};
//!
//! let config = PipelineConfig::new("metadata.csv");
//! let mut cache = TableCache::new();
//! let table = cache.get_or_load(&config).unwrap();
//! println!("{} records", table.len());
//! ```
//!
//! # Error Handling
//!
//! All fallible operations return the crate [`Result`] wrapping
//! [`MetadataError`]. Only two things are fatal: an unreadable or
//! non-delimited input file ([`MetadataError::Load`]) and a missing or
//! undetectable column ([`MetadataError::Configuration`]). Data-quality
//! problems inside a readable file (unparseable dates, absent abstracts,
//! short rows) always degrade to [`Value::Missing`] or empty defaults.

use thiserror::Error;

pub mod aggregate;
pub mod clean;
pub mod dates;
pub mod detect;
pub mod load;
pub mod pipeline;
pub mod schema;
pub mod table;

// Reexports
pub use aggregate::{
    pubs_per_year, summarize, top_journals, top_words, CorpusSummary, MIN_WORD_LEN_DEFAULT,
    TOP_JOURNALS_DEFAULT, TOP_WORDS_DEFAULT,
};
pub use clean::{clean_records, CleanConfig};
pub use dates::{canonicalize_dates, parse_timestamp};
pub use detect::{detect_columns, ColumnCandidates, ColumnRole};
pub use load::{load_table, read_table};
pub use pipeline::{run_pipeline, PipelineConfig, TableCache};
pub use schema::{ColumnOverrides, Schema};
pub use table::{Table, Value};

/// A specialized Result type for metadata operations.
pub type Result<T> = std::result::Result<T, MetadataError>;

/// Represents errors that can occur while loading or configuring a pipeline.
///
/// Data-quality issues are deliberately absent here: unparseable values are
/// coerced to [`Value::Missing`] rather than surfaced as errors.
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Load error: {0}")]
    Load(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_error_display() {
        let error = MetadataError::Configuration("no suitable date column found".to_string());
        assert_eq!(
            error.to_string(),
            "Configuration error: no suitable date column found"
        );
    }
}
