//! Archive and restore error types.
//!
//! Every variant is fatal for the call that raised it. Nothing is retried.

use std::path::PathBuf;
use thiserror::Error;

use crate::models::LoadError;
use crate::params::ParamsError;
use crate::resolve::ResolveError;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Required artifact missing: {0}")]
    MissingArtifact(PathBuf),

    #[error("Config file missing: {0}")]
    MissingConfig(PathBuf),

    #[error("Invalid auxiliary file key: {0:?}")]
    InvalidAuxiliaryKey(String),

    #[error("Corrupt archive {path}: {source}")]
    CorruptArchive {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed manifest {path}: {source}")]
    MalformedManifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Config parse failed: {0}")]
    ConfigParse(#[source] ParamsError),

    #[error("Model load failed: {0}")]
    ModelLoad(#[from] LoadError),

    #[error("Archive resolution failed: {0}")]
    Resolution(#[from] ResolveError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ArchiveError {
    /// Returns true if the archive input itself is unusable, as opposed to
    /// a failure in the caller's environment or collaborators.
    pub fn is_bad_archive(&self) -> bool {
        matches!(
            self,
            Self::CorruptArchive { .. } | Self::MalformedManifest { .. }
        )
    }
}
