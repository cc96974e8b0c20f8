//! Tolerant CSV loading.
//!
//! Reads comma-delimited text with a header row into a [`Table`]. Malformed
//! rows (wrong field count, broken quoting) are skipped so that one bad line
//! in a large metadata dump never aborts the load. Only an unreadable path
//! or an unreadable header row is fatal.
//!
//! # Example
//!
//! ```
//! use pubmeta::read_table;
//!
//! let csv = "title,year\nA,2020\nB,2021";
//! let table = read_table(csv.as_bytes(), None).unwrap();
//! assert_eq!(table.len(), 2);
//! ```

use csv::ReaderBuilder;
use std::fs::File;
use std::io;
use std::path::Path;
use tracing::{debug, warn};

use crate::table::{Table, Value};
use crate::{MetadataError, Result};

/// Loads a CSV file into a [`Table`], reading at most `row_limit` data rows
/// when a limit is given.
///
/// # Errors
///
/// Returns [`MetadataError::Load`] when the path cannot be opened or the
/// header row cannot be parsed.
pub fn load_table(path: impl AsRef<Path>, row_limit: Option<usize>) -> Result<Table> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| MetadataError::Load(format!("cannot open {}: {e}", path.display())))?;
    debug!(path = %path.display(), "loading metadata table");
    read_table(file, row_limit)
}

/// Reads CSV data from any reader into a [`Table`].
///
/// The first record is the header. Data rows whose field count differs from
/// the header, and rows the CSV parser rejects outright, are counted and
/// skipped.
pub fn read_table<R: io::Read>(reader: R, row_limit: Option<usize>) -> Result<Table> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| MetadataError::Load(format!("unreadable header row: {e}")))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if columns.is_empty() {
        return Err(MetadataError::Load("input has no header row".to_string()));
    }

    let mut table = Table::new(columns);
    let mut skipped = 0usize;

    for (line, result) in reader.records().enumerate() {
        if let Some(limit) = row_limit {
            if table.len() >= limit {
                break;
            }
        }
        match result {
            Ok(record) if record.len() == table.columns().len() => {
                table.push_row(record.iter().map(parse_value).collect());
            }
            Ok(record) => {
                skipped += 1;
                debug!(
                    line = line + 2,
                    fields = record.len(),
                    expected = table.columns().len(),
                    "skipping row with wrong field count"
                );
            }
            Err(err) => {
                skipped += 1;
                debug!(line = line + 2, %err, "skipping unparseable row");
            }
        }
    }

    if skipped > 0 {
        warn!(skipped, rows = table.len(), "skipped malformed rows");
    }
    Ok(table)
}

/// Coerces one CSV field: empty becomes `Missing`, numeric text becomes
/// `Int` or `Float`, everything else stays `Text`.
fn parse_value(field: &str) -> Value {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return Value::Missing;
    }
    if let Ok(n) = trimmed.parse::<i64>() {
        return Value::Int(n);
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        return Value::Float(f);
    }
    Value::Text(field.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_basic_load() {
        let input = "\
Title,Journal,Year
Viral kinetics,Nature,2020
Spike protein,Science,2021";

        let table = read_table(input.as_bytes(), None).unwrap();
        assert_eq!(table.columns(), &["Title", "Journal", "Year"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.value(0, "Title"), Some(&Value::text("Viral kinetics")));
        assert_eq!(table.value(1, "Year"), Some(&Value::Int(2021)));
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let input = "\
Title,Journal,Year
Good row,Nature,2020
only two fields,2020
one,too,many,fields
Another good row,Science,2021";

        let table = read_table(input.as_bytes(), None).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.value(1, "Title"), Some(&Value::text("Another good row")));
    }

    #[test]
    fn test_empty_fields_become_missing() {
        let input = "Title,Journal\nNo journal here,";
        let table = read_table(input.as_bytes(), None).unwrap();
        assert_eq!(table.value(0, "Journal"), Some(&Value::Missing));
    }

    #[test]
    fn test_numeric_coercion() {
        let input = "a,b,c\n42,1.5,notanumber";
        let table = read_table(input.as_bytes(), None).unwrap();
        assert_eq!(table.value(0, "a"), Some(&Value::Int(42)));
        assert_eq!(table.value(0, "b"), Some(&Value::Float(1.5)));
        assert_eq!(table.value(0, "c"), Some(&Value::text("notanumber")));
    }

    #[test]
    fn test_row_limit() {
        let input = "t\n1\n2\n3\n4";
        let table = read_table(input.as_bytes(), Some(2)).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let result = load_table("/nonexistent/metadata.csv", None);
        assert!(matches!(result, Err(MetadataError::Load(_))));
    }

    #[test]
    fn test_load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "title,journal\nA,Nature\n").unwrap();

        let table = load_table(file.path(), None).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.value(0, "journal"), Some(&Value::text("Nature")));
    }
}
