//! Packs a serialization directory into `model.tar.gz`.

use std::path::{Path, PathBuf};
use std::time::Instant;

use flate2::write::GzEncoder;
use flate2::Compression;
use tempfile::NamedTempFile;
use tracing::{error, info};

use super::error::ArchiveError;
use super::manifest::{AuxiliaryManifest, FilesToArchive, MANIFEST_NAME};
use super::{ARCHIVE_FILE, CONFIG_FILE, CONFIG_NAME, WEIGHTS_NAME};
use crate::models::VOCABULARY_DIR;
use crate::telemetry::{ArchiveSpan, SpanExt};

/// Weights file archived when the caller does not name one.
pub const DEFAULT_WEIGHTS: &str = "best.th";

/// Archive the weights, training config, vocabulary and optional auxiliary
/// files found in `serialization_dir` to `serialization_dir/model.tar.gz`.
///
/// Returns the path of the written archive. On any error no archive is left
/// behind; an existing `model.tar.gz` is only replaced once the new one is
/// complete.
pub fn archive_model(
    serialization_dir: &Path,
    weights: &str,
    files_to_archive: &FilesToArchive,
) -> Result<PathBuf, ArchiveError> {
    let span = ArchiveSpan::archive(serialization_dir, weights);
    let _guard = span.enter();
    let start = Instant::now();

    let result = write_archive(serialization_dir, weights, files_to_archive);
    span.record("elapsed_ms", start.elapsed().as_millis() as u64);
    span.record_result(&result);
    result
}

fn write_archive(
    serialization_dir: &Path,
    weights: &str,
    files_to_archive: &FilesToArchive,
) -> Result<PathBuf, ArchiveError> {
    let weights_file = serialization_dir.join(weights);
    if !weights_file.is_file() {
        error!(
            weights = %weights_file.display(),
            "weights file does not exist, unable to archive model"
        );
        return Err(ArchiveError::MissingArtifact(weights_file));
    }

    let config_file = serialization_dir.join(CONFIG_FILE);
    if !config_file.is_file() {
        error!(
            config = %config_file.display(),
            "config file does not exist, unable to archive model"
        );
        return Err(ArchiveError::MissingConfig(config_file));
    }

    let vocabulary_dir = serialization_dir.join(VOCABULARY_DIR);
    if !vocabulary_dir.is_dir() {
        error!(
            vocabulary = %vocabulary_dir.display(),
            "vocabulary directory does not exist, unable to archive model"
        );
        return Err(ArchiveError::MissingArtifact(vocabulary_dir));
    }

    let manifest = AuxiliaryManifest::from_files(files_to_archive)?;
    if let Some(missing) = files_to_archive.values().find(|path| !path.is_file()) {
        error!(file = %missing.display(), "auxiliary file does not exist, unable to archive model");
        return Err(ArchiveError::MissingArtifact(missing.clone()));
    }

    let manifest_file = if manifest.is_empty() {
        None
    } else {
        let path = serialization_dir.join(MANIFEST_NAME);
        manifest.write_to(&path)?;
        Some(path)
    };

    let archive_file = serialization_dir.join(ARCHIVE_FILE);
    info!(archive = %archive_file.display(), "archiving weights and vocabulary");

    // Staged next to the target so the final rename stays on one filesystem.
    let staging = staging_file(serialization_dir)?;
    let mut builder = tar::Builder::new(GzEncoder::new(staging, Compression::default()));
    builder.append_path_with_name(&config_file, CONFIG_NAME)?;
    builder.append_path_with_name(&weights_file, WEIGHTS_NAME)?;
    builder.append_dir_all(VOCABULARY_DIR, &vocabulary_dir)?;

    if let Some(manifest_file) = &manifest_file {
        builder.append_path_with_name(manifest_file, MANIFEST_NAME)?;
        for (key, path) in files_to_archive {
            builder.append_path_with_name(path, AuxiliaryManifest::entry_name(key))?;
        }
    }

    let staging = builder.into_inner()?.finish()?;
    staging
        .persist(&archive_file)
        .map_err(|e| ArchiveError::Io(e.error))?;

    info!(
        archive = %archive_file.display(),
        auxiliary_files = manifest.len(),
        "model archived"
    );
    Ok(archive_file)
}

/// Temp file for the archive stream. Created with the mode a plain
/// `File::create` would get (0o666 less umask), which `persist` keeps.
fn staging_file(dir: &Path) -> std::io::Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(".model.tar.gz.");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    builder.tempfile_in(dir)
}
