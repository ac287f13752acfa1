//! Telemetry for archive operations.
//!
//! Structured logging setup and span helpers. All output is local (stderr or
//! a log file).

mod logging;
mod spans;

pub use logging::{init_logging, LogConfig, LogError, LogFormat};
pub use spans::{ArchiveSpan, SpanExt};
