//! Data source contract.
//!
//! A source document is either a JSON array of entries or an object holding
//! that array under `communities` or `records`. Anything else, and any read
//! or parse failure, is reported as [`DirectoryError::DataUnavailable`]; the
//! caller then shows [`Directory::empty`] instead of a partial record set.
//!
//! CSV lexing is left to an external parser. Its rows can be turned into
//! entries with [`rows_to_entries`].

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use gatebook_types::{DirectoryConfig, DirectoryError};
use serde_json::{Map, Value};

use crate::index::Directory;

const WRAPPER_KEYS: &[&str] = &["communities", "records"];

/// Extracts the entry list from a parsed source document.
///
/// # Errors
/// Returns `DataUnavailable` if the document holds no entry array.
pub fn entries_from_document(document: Value) -> Result<Vec<Value>, DirectoryError> {
    match document {
        Value::Array(entries) => Ok(entries),
        Value::Object(mut object) => WRAPPER_KEYS
            .iter()
            .find_map(|key| match object.remove(*key) {
                Some(Value::Array(entries)) => Some(entries),
                _ => None,
            })
            .ok_or_else(|| {
                DirectoryError::unavailable("expected an array of records or a `communities` list")
            }),
        other => Err(DirectoryError::unavailable(format!(
            "expected an array of records, found {}",
            kind_of(&other)
        ))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Reads source entries from a JSON reader.
///
/// # Errors
/// Returns `DataUnavailable` on I/O or parse failure, or if the document
/// holds no entry array.
pub fn read_entries<R: Read>(reader: R) -> Result<Vec<Value>, DirectoryError> {
    let document: Value = serde_json::from_reader(reader)
        .map_err(|e| DirectoryError::unavailable(format!("could not parse data: {e}")))?;
    entries_from_document(document)
}

/// Reads source entries from a JSON string.
///
/// # Errors
/// See [`read_entries`].
pub fn parse_entries(json: &str) -> Result<Vec<Value>, DirectoryError> {
    read_entries(json.as_bytes())
}

/// Loads a directory from a JSON file. The file is read fresh on every call.
///
/// # Errors
/// Returns `DataUnavailable` if the file cannot be opened or parsed.
pub fn load_path(path: impl AsRef<Path>, config: DirectoryConfig) -> Result<Directory, DirectoryError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        DirectoryError::unavailable(format!("could not open {}: {e}", path.display()))
    })?;
    let entries = read_entries(BufReader::new(file))?;
    tracing::debug!(path = %path.display(), entries = entries.len(), "read data source");
    Ok(Directory::from_entries(&entries, config))
}

/// Turns lexed CSV rows into source entries keyed by header.
///
/// Short rows leave trailing fields absent; extra cells are ignored.
/// Headers are trimmed; blank headers are skipped.
pub fn rows_to_entries<H, R, C>(headers: &[H], rows: R) -> Vec<Value>
where
    H: AsRef<str>,
    R: IntoIterator,
    R::Item: IntoIterator<Item = C>,
    C: AsRef<str>,
{
    rows.into_iter()
        .map(|row| {
            let mut object = Map::with_capacity(headers.len());
            for (header, cell) in headers.iter().zip(row) {
                let header = header.as_ref().trim();
                if header.is_empty() {
                    continue;
                }
                object.insert(header.to_owned(), Value::String(cell.as_ref().to_owned()));
            }
            Value::Object(object)
        })
        .collect()
}
