//! Vocabulary directory reader.
//!
//! A vocabulary directory holds one `<namespace>.txt` file per namespace with
//! one token per line, plus an optional `non_padded_namespaces.txt` listing
//! namespaces that carry no padding or OOV entries.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use super::loader::LoadError;

/// Name of the vocabulary subdirectory inside a serialization directory.
pub const VOCABULARY_DIR: &str = "vocabulary";

/// File listing namespaces without padding tokens.
pub const NON_PADDED_NAMESPACES_FILE: &str = "non_padded_namespaces.txt";

/// Token tables keyed by namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    namespaces: BTreeMap<String, Vec<String>>,
    non_padded: BTreeSet<String>,
}

impl Vocabulary {
    /// Read every namespace file in `dir`.
    pub fn from_dir(dir: &Path) -> Result<Self, LoadError> {
        if !dir.is_dir() {
            return Err(LoadError::NotFound(dir.to_path_buf()));
        }

        let mut vocabulary = Self::default();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("txt") {
                continue;
            }
            let contents = std::fs::read_to_string(&path)?;
            let is_non_padded_list =
                path.file_name().and_then(|n| n.to_str()) == Some(NON_PADDED_NAMESPACES_FILE);

            if is_non_padded_list {
                vocabulary.non_padded = contents
                    .lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(String::from)
                    .collect();
            } else if let Some(namespace) = path.file_stem().and_then(|s| s.to_str()) {
                let tokens = contents.lines().map(String::from).collect();
                vocabulary.namespaces.insert(namespace.to_string(), tokens);
            }
        }

        Ok(vocabulary)
    }

    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.namespaces.keys().map(String::as_str)
    }

    /// Number of tokens in `namespace` (0 if unknown).
    pub fn size(&self, namespace: &str) -> usize {
        self.namespaces.get(namespace).map_or(0, Vec::len)
    }

    pub fn token(&self, namespace: &str, index: usize) -> Option<&str> {
        self.namespaces
            .get(namespace)
            .and_then(|tokens| tokens.get(index))
            .map(String::as_str)
    }

    pub fn index_of(&self, namespace: &str, token: &str) -> Option<usize> {
        self.namespaces
            .get(namespace)
            .and_then(|tokens| tokens.iter().position(|t| t == token))
    }

    pub fn is_padded(&self, namespace: &str) -> bool {
        !self.non_padded.contains(namespace)
    }
}
