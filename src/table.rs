//! In-memory record table with dynamically typed cells.
//!
//! A [`Table`] is an ordered set of named columns over row-major storage.
//! Every cell is a [`Value`], so columns from real-world metadata files can
//! mix text, numbers, and missing entries without a declared schema.
//!
//! # Example
//!
//! ```
//! use pubmeta::table::{Table, Value};
//!
//! let mut table = Table::new(vec!["title".to_string(), "journal".to_string()]);
//! table.push_row(vec![Value::text("Viral kinetics"), Value::text("Nature")]);
//!
//! assert_eq!(table.len(), 1);
//! assert_eq!(table.value(0, "journal").unwrap().to_text(), "Nature");
//! ```

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{MetadataError, Result};

/// A single dynamically typed cell.
///
/// `Missing` is the coercion target for every data-quality problem in the
/// pipeline: empty CSV fields, unparseable dates, absent optional columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Free-form text
    Text(String),
    /// Integer value (also used for derived `year` and word counts)
    Int(i64),
    /// Floating-point value
    Float(f64),
    /// Parsed calendar timestamp (derived `publish_time`)
    Timestamp(NaiveDateTime),
    /// Missing marker
    Missing,
}

impl Value {
    /// Shorthand for building a `Text` value.
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    /// Returns true for the missing marker.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Returns the inner text if this is a `Text` value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the inner integer if this is an `Int` value.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the inner timestamp if this is a `Timestamp` value.
    #[must_use]
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Value::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    /// The text form of the value. `Missing` renders as empty text.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::Int(n) => n.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Timestamp(ts) => ts.format("%Y-%m-%d %H:%M:%S").to_string(),
            Value::Missing => String::new(),
        }
    }
}

/// An ordered collection of named columns over row-major storage.
///
/// Invariant: every row holds exactly `columns().len()` cells. [`push_row`]
/// pads or truncates to maintain this, so indexing a row by a valid column
/// index never goes out of bounds.
///
/// [`push_row`]: Table::push_row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Creates an empty table with the given column names.
    #[must_use]
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// The column names, in source order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Position of a column by exact name.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Appends a row, padding short rows with `Missing` and truncating long
    /// ones to the column count.
    pub fn push_row(&mut self, mut row: Vec<Value>) {
        row.resize(self.columns.len(), Value::Missing);
        self.rows.push(row);
    }

    /// The cells of row `index`, or `None` past the end.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&[Value]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// The cell at (`row`, `column`), or `None` if either does not exist.
    #[must_use]
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// Iterates over the cells of a named column, or `None` if the column
    /// does not exist.
    pub fn column<'a>(&'a self, name: &str) -> Option<impl Iterator<Item = &'a Value>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| &row[idx]))
    }

    /// Adds a derived column, or overwrites an existing one of the same name.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::Configuration`] when `values` does not have
    /// one entry per row.
    pub fn set_column(&mut self, name: &str, values: Vec<Value>) -> Result<()> {
        if values.len() != self.rows.len() {
            return Err(MetadataError::Configuration(format!(
                "column `{name}` has {} values for {} rows",
                values.len(),
                self.rows.len()
            )));
        }
        match self.column_index(name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => {
                self.columns.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
        Ok(())
    }

    /// Keeps only the rows for which the predicate returns true.
    pub fn retain_rows<F>(&mut self, mut predicate: F)
    where
        F: FnMut(&[Value]) -> bool,
    {
        self.rows.retain(|row| predicate(row));
    }

    /// Iterates over all rows.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[Value]> {
        self.rows.iter().map(Vec::as_slice)
    }
}
