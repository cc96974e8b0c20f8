//! Date canonicalization.
//!
//! Metadata dumps mix ISO dates, US-style dates, "2020 Mar 16", bare years,
//! and garbage like "N/A" in the same column. [`canonicalize_dates`] picks a
//! date column, coerces every value into a `publish_time` timestamp (missing
//! on parse failure, never an error) and derives an integer `year` column
//! from it.
//!
//! # Example
//!
//! ```
//! use pubmeta::{canonicalize_dates, read_table, Value};
//!
//! let csv = "title,publish_time\nA,2020-03-16\nB,N/A";
//! let mut table = read_table(csv.as_bytes(), None).unwrap();
//! canonicalize_dates(&mut table, None).unwrap();
//!
//! assert_eq!(table.value(0, "year"), Some(&Value::Int(2020)));
//! assert_eq!(table.value(1, "year"), Some(&Value::Missing));
//! ```

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;

use crate::detect::{role_matches, ColumnRole};
use crate::table::{Table, Value};
use crate::{MetadataError, Result};

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d %b %Y",
    "%Y %b %d",
    "%b %d, %Y",
    "%b %d %Y",
];

/// Best-effort parse of a single date string.
///
/// Tries ISO datetimes, RFC 3339, several day-level formats, then year-month
/// ("2020-05", "2020 Mar") and bare four-digit years, which resolve to the
/// first day of the period. Returns `None` for anything unparseable; never
/// errors.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for format in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, format) {
            return Some(d.and_time(NaiveTime::MIN));
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d") {
        return Some(d.and_time(NaiveTime::MIN));
    }
    if let Ok(d) = NaiveDate::parse_from_str(&format!("{s} 1"), "%Y %b %d") {
        return Some(d.and_time(NaiveTime::MIN));
    }
    if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(year) = s.parse::<i32>() {
            return NaiveDate::from_ymd_opt(year, 1, 1).map(|d| d.and_time(NaiveTime::MIN));
        }
    }
    None
}

/// Adds (or overwrites) `publish_time` and `year` columns derived from a
/// date column.
///
/// With `date_column` given, that column is used and must exist. Without
/// it, the first column whose lowercase name contains `publish` or `date`
/// is selected.
///
/// `year` is always derived from `publish_time`: missing exactly where the
/// timestamp is missing, otherwise its calendar year.
///
/// # Errors
///
/// Returns [`MetadataError::Configuration`] when the named column does not
/// exist, or when no column can be auto-detected.
pub fn canonicalize_dates(table: &mut Table, date_column: Option<&str>) -> Result<()> {
    let idx = match date_column {
        Some(name) => table.column_index(name).ok_or_else(|| {
            MetadataError::Configuration(format!("column `{name}` not found in table"))
        })?,
        None => table
            .columns()
            .iter()
            .position(|c| role_matches(ColumnRole::Date, c))
            .ok_or_else(|| {
                MetadataError::Configuration("no suitable date column found".to_string())
            })?,
    };

    let mut timestamps = Vec::with_capacity(table.len());
    let mut years = Vec::with_capacity(table.len());
    let mut unparsed = 0usize;

    for row in table.iter_rows() {
        let cell = &row[idx];
        let parsed = if cell.is_missing() {
            None
        } else {
            let parsed = parse_timestamp(&cell.to_text());
            if parsed.is_none() {
                unparsed += 1;
            }
            parsed
        };
        match parsed {
            Some(ts) => {
                timestamps.push(Value::Timestamp(ts));
                years.push(Value::Int(i64::from(ts.year())));
            }
            None => {
                timestamps.push(Value::Missing);
                years.push(Value::Missing);
            }
        }
    }

    if unparsed > 0 {
        debug!(unparsed, "date values coerced to missing");
    }
    table.set_column("publish_time", timestamps)?;
    table.set_column("year", years)?;
    Ok(())
}
