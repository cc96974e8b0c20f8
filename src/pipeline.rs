//! Pipeline entry point and per-file memoization.
//!
//! [`run_pipeline`] drives the full load → resolve → canonicalize → clean
//! sequence from one explicit [`PipelineConfig`]. [`TableCache`] memoizes
//! the result per source file, keyed by path and validated against the
//! file's modification time, so a dashboard re-rendering on every filter
//! change does not re-read the CSV each time.

use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, trace};

use crate::clean::{clean_records, CleanConfig};
use crate::dates::canonicalize_dates;
use crate::load::load_table;
use crate::schema::{ColumnOverrides, Schema};
use crate::table::Table;
use crate::Result;

/// Explicit configuration for one pipeline run.
///
/// # Examples
///
/// ```no_run
/// use pubmeta::{run_pipeline, ColumnOverrides, PipelineConfig};
///
/// let mut config = PipelineConfig::new("metadata.csv");
/// config
///     .set_row_limit(Some(50_000))
///     .set_columns(ColumnOverrides {
///         date: Some("publish_time".to_string()),
///         ..Default::default()
///     });
/// let table = run_pipeline(&config).unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Source CSV path
    path: PathBuf,
    /// Maximum number of data rows to read
    row_limit: Option<usize>,
    /// Explicit column names, auto-detected where `None`
    columns: ColumnOverrides,
    /// Whether to drop records missing a title or publish time
    drop_missing: bool,
}

impl PipelineConfig {
    /// Creates a configuration for the given source file with auto-detected
    /// columns, no row limit, and `drop_missing` enabled.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            row_limit: None,
            columns: ColumnOverrides::default(),
            drop_missing: true,
        }
    }

    /// The source file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Caps the number of data rows read from the file.
    pub fn set_row_limit(&mut self, row_limit: Option<usize>) -> &mut Self {
        self.row_limit = row_limit;
        self
    }

    /// Sets explicit column names for some or all roles.
    pub fn set_columns(&mut self, columns: ColumnOverrides) -> &mut Self {
        self.columns = columns;
        self
    }

    /// Sets whether records missing a title or publish time are dropped.
    pub fn set_drop_missing(&mut self, drop_missing: bool) -> &mut Self {
        self.drop_missing = drop_missing;
        self
    }
}

/// Runs the full pipeline: load, resolve the schema, canonicalize dates,
/// clean records.
///
/// # Errors
///
/// Returns [`crate::MetadataError::Load`] when the file cannot be read and
/// [`crate::MetadataError::Configuration`] when a required column is
/// missing or undetectable.
pub fn run_pipeline(config: &PipelineConfig) -> Result<Table> {
    let mut table = load_table(&config.path, config.row_limit)?;
    let schema = Schema::resolve(&table, &config.columns)?;
    debug!(?schema, "resolved table schema");

    canonicalize_dates(&mut table, Some(&schema.date))?;

    let mut clean_config = CleanConfig::from_schema(&schema);
    clean_config.set_drop_missing(config.drop_missing);
    let cleaned = clean_records(&table, &clean_config)?;
    debug!(
        rows = cleaned.len(),
        raw_rows = table.len(),
        "pipeline complete"
    );
    Ok(cleaned)
}

#[derive(Debug)]
struct CacheEntry {
    modified: SystemTime,
    table: Table,
}

/// Memoizes cleaned tables per source file.
///
/// An entry is reused only while the file's modification time is unchanged;
/// a touched file reloads transparently. [`invalidate`] and [`clear`] drop
/// entries explicitly.
///
/// [`invalidate`]: TableCache::invalidate
/// [`clear`]: TableCache::clear
#[derive(Debug, Default)]
pub struct TableCache {
    entries: HashMap<PathBuf, CacheEntry>,
}

impl TableCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cleaned table for the config's path, running the
    /// pipeline only when the file is new to the cache or has changed on
    /// disk.
    ///
    /// # Errors
    ///
    /// Propagates pipeline errors, plus [`crate::MetadataError::Io`] when
    /// the file's metadata cannot be read.
    pub fn get_or_load(&mut self, config: &PipelineConfig) -> Result<&Table> {
        let modified = fs::metadata(config.path())?.modified()?;
        match self.entries.entry(config.path().to_path_buf()) {
            Entry::Occupied(entry) if entry.get().modified == modified => {
                trace!(path = %config.path().display(), "table cache hit");
                Ok(&entry.into_mut().table)
            }
            Entry::Occupied(mut entry) => {
                debug!(path = %config.path().display(), "source file changed, reloading");
                entry.insert(CacheEntry {
                    modified,
                    table: run_pipeline(config)?,
                });
                Ok(&entry.into_mut().table)
            }
            Entry::Vacant(entry) => {
                debug!(path = %config.path().display(), "table cache miss");
                Ok(&entry
                    .insert(CacheEntry {
                        modified,
                        table: run_pipeline(config)?,
                    })
                    .table)
            }
        }
    }

    /// Drops the entry for a path. Returns true when one was cached.
    pub fn invalidate(&mut self, path: &Path) -> bool {
        self.entries.remove(path).is_some()
    }

    /// Drops all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached tables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
