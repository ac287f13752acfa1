//! Archive reference resolution.
//!
//! An archive may be named by a local path or by a URI. Remote URIs are never
//! fetched here: they resolve only through a cache directory that some other
//! process has populated, keyed by [`cache_key`].

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::debug;

/// URI schemes that resolve through the cache.
const REMOTE_SCHEMES: &[&str] = &["http", "https", "s3"];

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Archive not found: {0}")]
    NotFound(PathBuf),

    #[error("Remote archive {uri} is not cached at {cached}")]
    NotCached { uri: String, cached: PathBuf },

    #[error("Unsupported URI scheme: {0}")]
    UnsupportedScheme(String),
}

/// Turns an archive reference into a readable local file.
pub trait Resolve {
    fn resolve(&self, reference: &str) -> Result<PathBuf, ResolveError>;
}

/// Cache file name for a remote URI: hex SHA-256 of the URI text.
pub fn cache_key(uri: &str) -> String {
    hex::encode(Sha256::digest(uri.as_bytes()))
}

/// Resolves local paths directly and remote URIs through a local cache.
#[derive(Debug, Clone)]
pub struct CachedPathResolver {
    cache_dir: PathBuf,
}

impl CachedPathResolver {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Where a remote URI would be cached.
    pub fn cached_path(&self, uri: &str) -> PathBuf {
        self.cache_dir.join(cache_key(uri))
    }

    fn resolve_local(path: &Path) -> Result<PathBuf, ResolveError> {
        if path.is_file() {
            Ok(path.to_path_buf())
        } else {
            Err(ResolveError::NotFound(path.to_path_buf()))
        }
    }
}

impl Resolve for CachedPathResolver {
    fn resolve(&self, reference: &str) -> Result<PathBuf, ResolveError> {
        let Some((scheme, rest)) = reference.split_once("://") else {
            return Self::resolve_local(Path::new(reference));
        };

        if scheme == "file" {
            return Self::resolve_local(Path::new(rest));
        }
        if !REMOTE_SCHEMES.contains(&scheme) {
            return Err(ResolveError::UnsupportedScheme(scheme.to_string()));
        }

        let cached = self.cached_path(reference);
        debug!(uri = %reference, cached = %cached.display(), "resolving remote archive");
        if cached.is_file() {
            Ok(cached)
        } else {
            Err(ResolveError::NotCached {
                uri: reference.to_string(),
                cached,
            })
        }
    }
}
