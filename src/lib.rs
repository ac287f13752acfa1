//! Model archival runtime
//!
//! Packages a trained model's artifacts into a single portable archive and
//! reconstructs a runnable model plus its configuration from that archive.
//!
//! # Components
//!
//! - **Archiver**: [`archive::archive_model`] packs weights, config, vocabulary
//!   and optional auxiliary files into `model.tar.gz`.
//! - **Restorer**: [`archive::ArchiveRestorer`] resolves, extracts, reconciles
//!   auxiliary files into the config, and loads the model.
//!
//! # Collaborators
//!
//! - [`params::Params`]: configuration value with override layering.
//! - [`models::LoadModel`]: builds a model from config and extracted weights.
//! - [`resolve::Resolve`]: turns an archive reference into a local path.
//!
//! The library emits `tracing` events and spans only. Installing a subscriber
//! is left to the caller (see [`telemetry::init_logging`]).

pub mod archive;
pub mod cli;
pub mod config;
pub mod models;
pub mod params;
pub mod resolve;
pub mod telemetry;

pub use archive::{
    archive_model, list_entries, load_archive, Archive, ArchiveEntry, ArchiveError,
    ArchiveRestorer, FilesToArchive,
};
pub use models::{Device, LoadError, LoadModel};
pub use params::{Params, ParamsError};
pub use resolve::{CachedPathResolver, Resolve, ResolveError};
