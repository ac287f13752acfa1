//! Span utilities for archive operations.
//!
//! Provides standardized span creation and result recording.

use std::path::Path;

use tracing::{info_span, Span};

use crate::models::Device;

/// Extension trait for adding context to spans.
pub trait SpanExt {
    /// Record the result of an operation into the span.
    fn record_result<T, E>(&self, result: &Result<T, E>)
    where
        E: std::fmt::Display;
}

impl SpanExt for Span {
    fn record_result<T, E>(&self, result: &Result<T, E>)
    where
        E: std::fmt::Display,
    {
        match result {
            Ok(_) => {
                self.record("status", "ok");
            }
            Err(e) => {
                self.record("status", "error");
                self.record("error.message", e.to_string().as_str());
            }
        }
    }
}

/// Factory for archive and restore spans.
///
/// Both carry `status` and `error.message` (filled by
/// [`SpanExt::record_result`]) and `elapsed_ms`.
pub struct ArchiveSpan;

impl ArchiveSpan {
    pub fn archive(serialization_dir: &Path, weights: &str) -> Span {
        info_span!(
            "archive_model",
            serialization_dir = %serialization_dir.display(),
            weights = %weights,
            status = tracing::field::Empty,
            error.message = tracing::field::Empty,
            elapsed_ms = tracing::field::Empty,
        )
    }

    pub fn restore(archive_ref: &str, device: Device) -> Span {
        info_span!(
            "restore_archive",
            archive = %archive_ref,
            device = %device,
            status = tracing::field::Empty,
            error.message = tracing::field::Empty,
            elapsed_ms = tracing::field::Empty,
        )
    }
}
