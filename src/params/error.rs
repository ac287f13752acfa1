//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while parsing, merging or consuming configuration.
#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON: {0}")]
    Syntax(#[from] serde_json::Error),

    #[error("{0} must be a JSON object")]
    NotAnObject(String),

    #[error("Missing required key: {0}")]
    MissingKey(String),

    #[error("Key {key} has wrong type: expected {expected}")]
    TypeMismatch { key: String, expected: &'static str },

    #[error("Unused keys for {owner}: {keys:?}")]
    UnusedKeys { owner: String, keys: Vec<String> },
}
