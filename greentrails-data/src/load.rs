//! Reading raw provider records from JSON files.
//!
//! Accepts a bare JSON array of records, an Overpass response holding them
//! under `elements`, or a Hiking Project response holding them under
//! `trails`.

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::Value;
use thiserror::Error;

/// Errors raised while loading raw records.
#[derive(Debug, Error)]
pub enum LoadRecordsError {
    /// The file could not be read.
    #[error("failed to read records from {path:?}")]
    Read {
        /// File that was read.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The contents are not valid JSON.
    #[error("records are not valid JSON")]
    Parse {
        /// Source error produced by `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// The JSON holds no record list.
    #[error("expected a JSON array of records or an object with an `elements` or `trails` array")]
    Shape,
}

/// Load raw records from the JSON file at `path`.
///
/// # Errors
/// Returns [`LoadRecordsError`] when the file is unreadable or malformed.
pub fn load_raw_records(path: &Utf8Path) -> Result<Vec<Value>, LoadRecordsError> {
    let contents =
        greentrails_fs::read_to_string(path).map_err(|source| LoadRecordsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    parse_raw_records(&contents)
}

/// Parse raw records from JSON text.
///
/// # Errors
/// Returns [`LoadRecordsError::Parse`] for invalid JSON and
/// [`LoadRecordsError::Shape`] when no record list is present.
///
/// # Examples
/// ```
/// use greentrails_data::parse_raw_records;
///
/// let records = parse_raw_records(r#"{"elements": [{"id": 1}, {"id": 2}]}"#).unwrap();
/// assert_eq!(records.len(), 2);
/// ```
pub fn parse_raw_records(contents: &str) -> Result<Vec<Value>, LoadRecordsError> {
    let value: Value =
        serde_json::from_str(contents).map_err(|source| LoadRecordsError::Parse { source })?;
    match value {
        Value::Array(records) => Ok(records),
        Value::Object(mut object) => {
            match object.remove("elements").or_else(|| object.remove("trails")) {
                Some(Value::Array(records)) => Ok(records),
                _ => Err(LoadRecordsError::Shape),
            }
        }
        _ => Err(LoadRecordsError::Shape),
    }
}
