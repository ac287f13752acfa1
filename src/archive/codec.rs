//! Gzip-compressed tar reading and listing.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;

use super::error::ArchiveError;

/// Kind of an archive entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Other,
}

/// One entry of an archive, as listed without extracting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Entry path inside the archive, without a trailing slash.
    pub path: String,
    pub size: u64,
    pub kind: EntryKind,
}

/// Unpack a gzip tar stream into `dest`.
///
/// Entries whose paths would land outside `dest` are skipped by the tar
/// reader rather than written.
pub fn unpack<R: Read>(reader: R, dest: &Path) -> std::io::Result<()> {
    let mut archive = tar::Archive::new(GzDecoder::new(reader));
    archive.set_overwrite(true);
    archive.unpack(dest)
}

/// Extract `archive_file` into `dest`. Any open, decompression or unpack
/// failure is reported as a corrupt archive.
pub fn extract(archive_file: &Path, dest: &Path) -> Result<(), ArchiveError> {
    let corrupt = |source: std::io::Error| ArchiveError::CorruptArchive {
        path: archive_file.to_path_buf(),
        source,
    };
    let file = File::open(archive_file).map_err(corrupt)?;
    unpack(BufReader::new(file), dest).map_err(corrupt)
}

/// List the entries of an archive without extracting it.
pub fn list_entries(archive_file: &Path) -> Result<Vec<ArchiveEntry>, ArchiveError> {
    let corrupt = |source: std::io::Error| ArchiveError::CorruptArchive {
        path: archive_file.to_path_buf(),
        source,
    };
    let file = File::open(archive_file).map_err(corrupt)?;
    let mut archive = tar::Archive::new(GzDecoder::new(BufReader::new(file)));

    let mut entries = Vec::new();
    for entry in archive.entries().map_err(corrupt)? {
        let entry = entry.map_err(corrupt)?;
        let path = entry
            .path()
            .map_err(corrupt)?
            .to_string_lossy()
            .trim_end_matches('/')
            .to_string();
        let entry_type = entry.header().entry_type();
        let kind = if entry_type.is_dir() {
            EntryKind::Directory
        } else if entry_type.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        };
        entries.push(ArchiveEntry {
            path,
            size: entry.size(),
            kind,
        });
    }

    Ok(entries)
}
