//! Decoding of the upstream metrics document.
//!
//! The parser emits a JSON array with one object per analyzed file. Only
//! the top-level shape is checked here; individual records are decoded
//! with serde and otherwise trusted.

use crate::error::InputError;
use crate::models::FileMetric;
use serde_json::Value;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Decode file records from an already-parsed JSON value.
pub fn records_from_json(value: Value) -> Result<Vec<FileMetric>, InputError> {
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(InputError::NotASequence {
                found: json_kind(&other),
            })
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item)
                .map_err(|source| InputError::InvalidRecord { index, source })
        })
        .collect()
}

/// Read and decode file records from a path, or from stdin when the path is `-`.
pub fn load_records(path: &Path) -> Result<Vec<FileMetric>, InputError> {
    let origin = path.display().to_string();

    let content = if origin == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|source| InputError::Io {
                origin: "stdin".to_string(),
                source,
            })?;
        buf
    } else {
        std::fs::read_to_string(path).map_err(|source| InputError::Io {
            origin: origin.clone(),
            source,
        })?
    };

    parse_records(&content, &origin)
}

/// Parse a JSON string into file records.
pub fn parse_records(content: &str, origin: &str) -> Result<Vec<FileMetric>, InputError> {
    let value: Value = serde_json::from_str(content).map_err(|source| InputError::Parse {
        origin: origin.to_string(),
        source,
    })?;

    let records = records_from_json(value)?;
    debug!("Decoded {} file records from {}", records.len(), origin);
    Ok(records)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
