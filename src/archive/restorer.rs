//! Restores a model and its configuration from an archive.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tempfile::TempDir;
use tracing::{debug, info, warn};

use super::codec;
use super::error::ArchiveError;
use super::manifest::{AuxiliaryManifest, MANIFEST_NAME};
use super::{CONFIG_NAME, WEIGHTS_NAME};
use crate::config::ArchivalConfig;
use crate::models::{Device, LoadModel};
use crate::params::{merge_overrides, Params};
use crate::resolve::{CachedPathResolver, Resolve};
use crate::telemetry::{ArchiveSpan, SpanExt};

/// Prefix of per-restore extraction directories.
const EXTRACTION_PREFIX: &str = "model-archive-";

/// A restored model together with the configuration it was built from.
#[derive(Debug)]
pub struct Archive<M> {
    pub model: M,
    /// Fully merged configuration, untouched by model construction.
    pub config: Params,
}

/// Restores archives through a resolver and a model loader.
///
/// Each call extracts into its own temporary directory, which is removed
/// before the call returns, whether it succeeds or fails.
#[derive(Debug, Clone)]
pub struct ArchiveRestorer<R, L> {
    resolver: R,
    loader: L,
    temp_root: Option<PathBuf>,
}

impl<L: LoadModel> ArchiveRestorer<CachedPathResolver, L> {
    /// Restorer using the cache and temp locations from `config`.
    pub fn from_config(config: &ArchivalConfig, loader: L) -> Self {
        let restorer = Self::new(CachedPathResolver::new(&config.cache_dir), loader);
        match &config.temp_dir {
            Some(root) => restorer.with_temp_root(root),
            None => restorer,
        }
    }
}

impl<R: Resolve, L: LoadModel> ArchiveRestorer<R, L> {
    pub fn new(resolver: R, loader: L) -> Self {
        Self {
            resolver,
            loader,
            temp_root: None,
        }
    }

    /// Create extraction directories under `root` instead of the system temp dir.
    pub fn with_temp_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.temp_root = Some(root.into());
        self
    }

    /// Restore the archive named by `archive_ref`.
    ///
    /// `overrides` is applied on top of the archived configuration and wins
    /// over the auxiliary-file substitutions recorded in the archive.
    pub fn restore(
        &self,
        archive_ref: &str,
        device: Device,
        overrides: &str,
    ) -> Result<Archive<L::Model>, ArchiveError> {
        let span = ArchiveSpan::restore(archive_ref, device);
        let _guard = span.enter();
        let start = Instant::now();

        let result = self.restore_inner(archive_ref, device, overrides);
        span.record("elapsed_ms", start.elapsed().as_millis() as u64);
        span.record_result(&result);
        result
    }

    fn restore_inner(
        &self,
        archive_ref: &str,
        device: Device,
        overrides: &str,
    ) -> Result<Archive<L::Model>, ArchiveError> {
        let archive_file = self.resolver.resolve(archive_ref)?;

        // Dropping the guard removes the directory on every early return below.
        let extraction = self.extraction_dir()?;
        let tempdir = extraction.path();
        info!(
            archive = %archive_file.display(),
            temp_dir = %tempdir.display(),
            "extracting archive"
        );
        codec::extract(&archive_file, tempdir)?;

        let overrides = reconcile_overrides(tempdir, overrides)?;
        let config = Params::from_file(&tempdir.join(CONFIG_NAME), &overrides)
            .map_err(ArchiveError::ConfigParse)?;

        let model = self.loader.load(
            config.duplicate(),
            &tempdir.join(WEIGHTS_NAME),
            tempdir,
            device,
        )?;

        let cleanup_path = tempdir.to_path_buf();
        if let Err(e) = extraction.close() {
            warn!(
                temp_dir = %cleanup_path.display(),
                error = %e,
                "failed to remove extraction directory"
            );
        }

        Ok(Archive { model, config })
    }

    fn extraction_dir(&self) -> std::io::Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(EXTRACTION_PREFIX);
        match &self.temp_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
    }
}

/// Fold archived auxiliary-file substitutions into the caller's overrides.
///
/// Without a manifest the caller's overrides pass through unchanged.
fn reconcile_overrides(extraction_dir: &Path, overrides: &str) -> Result<String, ArchiveError> {
    let manifest_file = extraction_dir.join(MANIFEST_NAME);
    if !manifest_file.is_file() {
        return Ok(overrides.to_string());
    }

    let manifest = AuxiliaryManifest::from_file(&manifest_file)?;
    let replacements = manifest.replacements(extraction_dir);
    debug!(count = replacements.len(), "substituting archived auxiliary files");
    merge_overrides(&replacements, overrides).map_err(ArchiveError::ConfigParse)
}

/// Restore with the resolver and temp locations from the environment config.
pub fn load_archive<L: LoadModel>(
    archive_ref: &str,
    loader: L,
    device: Device,
    overrides: &str,
) -> Result<Archive<L::Model>, ArchiveError> {
    let config = crate::config::load();
    ArchiveRestorer::from_config(&config, loader).restore(archive_ref, device, overrides)
}
