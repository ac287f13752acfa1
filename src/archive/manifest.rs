//! Auxiliary file manifest (`files_to_archive.json`).
//!
//! Maps a logical key to the path the file had when it was archived. The file
//! itself travels inside the archive as `fta/<key>`; on restore the key is
//! pointed at the extracted copy instead of the original path.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::error::ArchiveError;

/// Manifest entry name, both in the serialization dir and in the archive.
pub const MANIFEST_NAME: &str = "files_to_archive.json";

/// Archive directory holding auxiliary file contents.
pub const AUXILIARY_DIR: &str = "fta";

/// Caller-supplied auxiliary files: logical key to source path.
pub type FilesToArchive = BTreeMap<String, PathBuf>;

/// Parsed `files_to_archive.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuxiliaryManifest {
    entries: BTreeMap<String, String>,
}

/// Check that `key` names exactly one entry under `fta/`.
pub fn validate_key(key: &str) -> Result<(), ArchiveError> {
    let unsafe_key = key.is_empty()
        || key == "."
        || key == ".."
        || key.contains(|c: char| matches!(c, '/' | '\\' | '\0'));
    if unsafe_key {
        return Err(ArchiveError::InvalidAuxiliaryKey(key.to_string()));
    }
    Ok(())
}

/// Find a key nested under another key (`a.b` under `a`). Substituting both
/// into one config is impossible: the nested path replaces the outer value.
pub fn find_nested_key<'a, I>(keys: I) -> Option<(&'a str, &'a str)>
where
    I: IntoIterator<Item = &'a String>,
    I::IntoIter: Clone,
{
    let keys = keys.into_iter();
    for outer in keys.clone() {
        for inner in keys.clone() {
            let nested = inner
                .strip_prefix(outer.as_str())
                .is_some_and(|rest| rest.starts_with('.'));
            if nested {
                return Some((outer.as_str(), inner.as_str()));
            }
        }
    }
    None
}

impl AuxiliaryManifest {
    /// Build a manifest from caller-supplied files, validating every key.
    pub fn from_files(files: &FilesToArchive) -> Result<Self, ArchiveError> {
        let mut entries = BTreeMap::new();
        for (key, path) in files {
            validate_key(key)?;
            entries.insert(key.clone(), path.to_string_lossy().into_owned());
        }
        if let Some((_, nested)) = find_nested_key(entries.keys()) {
            return Err(ArchiveError::InvalidAuxiliaryKey(nested.to_string()));
        }
        Ok(Self { entries })
    }

    /// Load manifest from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ArchiveError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content).map_err(|source| ArchiveError::MalformedManifest {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse manifest from JSON string. Keys that could not have been
    /// archived are rejected as malformed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let manifest: Self = serde_json::from_str(json)?;
        if let Some(bad) = manifest.entries.keys().find(|k| validate_key(k).is_err()) {
            return Err(serde::de::Error::custom(format!(
                "invalid auxiliary key {:?}",
                bad
            )));
        }
        if let Some((outer, nested)) = find_nested_key(manifest.entries.keys()) {
            return Err(serde::de::Error::custom(format!(
                "auxiliary key {:?} is nested under {:?}",
                nested, outer
            )));
        }
        Ok(manifest)
    }

    pub fn write_to(&self, path: &Path) -> Result<(), ArchiveError> {
        let json = serde_json::to_string(self).map_err(std::io::Error::from)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Archive entry name for `key`.
    pub fn entry_name(key: &str) -> String {
        format!("{}/{}", AUXILIARY_DIR, key)
    }

    /// Substitution layer pointing every key at its extracted copy.
    pub fn replacements(&self, extraction_dir: &Path) -> BTreeMap<String, String> {
        self.entries
            .keys()
            .map(|key| {
                let extracted = extraction_dir.join(AUXILIARY_DIR).join(key);
                (key.clone(), extracted.to_string_lossy().into_owned())
            })
            .collect()
    }

    /// Path the file had at archive time.
    pub fn original_path(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key() {
        assert!(validate_key("extra").is_ok());
        assert!(validate_key("model.embedder.pretrained_file").is_ok());
        for bad in ["", ".", "..", "a/b", "a\\b", "../etc", "nul\0"] {
            assert!(
                matches!(validate_key(bad), Err(ArchiveError::InvalidAuxiliaryKey(_))),
                "key {:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_from_files_rejects_bad_key() {
        let mut files = FilesToArchive::new();
        files.insert("../escape".to_string(), PathBuf::from("/tmp/x"));
        assert!(AuxiliaryManifest::from_files(&files).is_err());
    }

    #[test]
    fn test_nested_keys_rejected() {
        let mut files = FilesToArchive::new();
        files.insert("a".to_string(), PathBuf::from("/tmp/a"));
        files.insert("a.b".to_string(), PathBuf::from("/tmp/ab"));
        assert!(matches!(
            AuxiliaryManifest::from_files(&files),
            Err(ArchiveError::InvalidAuxiliaryKey(ref k)) if k == "a.b"
        ));

        let err = AuxiliaryManifest::from_json(r#"{"a": "/x", "a.b": "/y"}"#).unwrap_err();
        assert!(err.to_string().contains("nested"));
    }

    #[test]
    fn test_sibling_keys_with_shared_prefix_allowed() {
        let mut files = FilesToArchive::new();
        files.insert("a".to_string(), PathBuf::from("/tmp/a"));
        files.insert("ab".to_string(), PathBuf::from("/tmp/ab"));
        files.insert("a-b.c".to_string(), PathBuf::from("/tmp/abc"));
        files.insert("x.y".to_string(), PathBuf::from("/tmp/xy"));
        files.insert("x.z".to_string(), PathBuf::from("/tmp/xz"));
        assert_eq!(AuxiliaryManifest::from_files(&files).unwrap().len(), 5);
    }

    #[test]
    fn test_json_is_plain_object() {
        let mut files = FilesToArchive::new();
        files.insert("extra".to_string(), PathBuf::from("/tmp/foo.txt"));
        let manifest = AuxiliaryManifest::from_files(&files).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MANIFEST_NAME);
        manifest.write_to(&path).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw, serde_json::json!({"extra": "/tmp/foo.txt"}));
        assert_eq!(AuxiliaryManifest::from_file(&path).unwrap(), manifest);
    }

    #[test]
    fn test_malformed_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MANIFEST_NAME);
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            AuxiliaryManifest::from_file(&path),
            Err(ArchiveError::MalformedManifest { .. })
        ));

        std::fs::write(&path, r#"{"a": 1}"#).unwrap();
        assert!(matches!(
            AuxiliaryManifest::from_file(&path),
            Err(ArchiveError::MalformedManifest { .. })
        ));
    }

    #[test]
    fn test_unsafe_key_in_manifest_is_malformed() {
        assert!(AuxiliaryManifest::from_json(r#"{"../../etc/passwd": "/x"}"#).is_err());
    }

    #[test]
    fn test_replacements_point_into_extraction_dir() {
        let manifest = AuxiliaryManifest::from_json(r#"{"extra": "/tmp/foo.txt"}"#).unwrap();
        let replacements = manifest.replacements(Path::new("/tmp/extract"));
        let expected = Path::new("/tmp/extract").join("fta").join("extra");
        assert_eq!(
            replacements.get("extra").map(String::as_str),
            expected.to_str()
        );
        assert_eq!(manifest.original_path("extra"), Some("/tmp/foo.txt"));
    }

    #[test]
    fn test_entry_name() {
        assert_eq!(AuxiliaryManifest::entry_name("extra"), "fta/extra");
    }
}
