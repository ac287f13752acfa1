//! Model archive packing and restoring.
//!
//! An archive is a gzip-compressed tar with fixed entry names:
//!
//! | Entry | Content |
//! |---|---|
//! | `config.json` | experiment configuration |
//! | `weights.th` | serialized model parameters |
//! | `vocabulary/` | vocabulary directory tree |
//! | `files_to_archive.json` | optional auxiliary file manifest |
//! | `fta/<key>` | optional auxiliary file contents, one per manifest key |

mod archiver;
mod codec;
mod error;
pub mod manifest;
mod restorer;

pub use archiver::{archive_model, DEFAULT_WEIGHTS};
pub use codec::{extract, list_entries, unpack, ArchiveEntry, EntryKind};
pub use error::ArchiveError;
pub use manifest::{AuxiliaryManifest, FilesToArchive, AUXILIARY_DIR, MANIFEST_NAME};
pub use restorer::{load_archive, Archive, ArchiveRestorer};

/// Archived name of the configuration file.
pub const CONFIG_NAME: &str = "config.json";

/// Archived name of the weights file.
pub const WEIGHTS_NAME: &str = "weights.th";

/// Configuration file name inside a serialization directory.
pub const CONFIG_FILE: &str = "model_params.json";

/// Archive file name written into the serialization directory.
pub const ARCHIVE_FILE: &str = "model.tar.gz";
