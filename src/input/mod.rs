use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use serde_json::Value;
use thiserror::Error;

use crate::schema::RawInputs;

pub mod forms;
pub mod presets;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{path}: line {line}: {source}")]
    Parse {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("{path}: record {record} is not a JSON object")]
    NotAnObject { path: PathBuf, record: usize },
    #[error("{path}: no records")]
    Empty { path: PathBuf },
}

/// Opens `path` for buffered reading, decompressing when it ends in `.gz`.
pub fn open_maybe_gz(path: &Path) -> io::Result<Box<dyn BufRead>> {
    let file = File::open(path)?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

pub fn read_to_string_maybe_gz(path: &Path) -> io::Result<String> {
    let mut reader = open_maybe_gz(path)?;
    let mut content = String::new();
    reader.read_to_string(&mut content)?;
    Ok(content)
}

/// Reads a single JSON object of named raw inputs.
pub fn load_raw_inputs(path: &Path) -> Result<RawInputs, InputError> {
    let content = read_to_string_maybe_gz(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&content).map_err(|source| InputError::Parse {
        path: path.to_path_buf(),
        line: source.line(),
        source,
    })?;
    into_raw(path, 1, value)
}

/// Reads a batch of input records: either one JSON array of objects, or
/// newline-delimited JSON objects (blank lines ignored).
pub fn load_batch(path: &Path) -> Result<Vec<RawInputs>, InputError> {
    let content = read_to_string_maybe_gz(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_batch(path, &content)
}

pub fn parse_batch(path: &Path, content: &str) -> Result<Vec<RawInputs>, InputError> {
    let records = if content.trim_start().starts_with('[') {
        let values: Vec<Value> =
            serde_json::from_str(content).map_err(|source| InputError::Parse {
                path: path.to_path_buf(),
                line: source.line(),
                source,
            })?;
        values
            .into_iter()
            .enumerate()
            .map(|(i, v)| into_raw(path, i + 1, v))
            .collect::<Result<Vec<_>, _>>()?
    } else {
        let mut out = Vec::new();
        for (idx, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let value: Value =
                serde_json::from_str(line).map_err(|source| InputError::Parse {
                    path: path.to_path_buf(),
                    line: idx + 1,
                    source,
                })?;
            out.push(into_raw(path, out.len() + 1, value)?);
        }
        out
    };

    if records.is_empty() {
        return Err(InputError::Empty {
            path: path.to_path_buf(),
        });
    }
    Ok(records)
}

fn into_raw(path: &Path, record: usize, value: Value) -> Result<RawInputs, InputError> {
    match value {
        Value::Object(map) => Ok(map.into_iter().collect()),
        _ => Err(InputError::NotAnObject {
            path: path.to_path_buf(),
            record,
        }),
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
