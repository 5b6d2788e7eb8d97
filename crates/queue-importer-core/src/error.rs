//! Error types for the import pipeline.
//!
//! [`ImportError`] aborts a run before any record is sent. [`RecordError`]
//! belongs to a single line and never stops the batch.

use queue_runtime::QueueError;
use std::path::PathBuf;

/// Standard result type for import operations
pub type ImportResult<T> = Result<T, ImportError>;

/// Pre-flight failures that halt the whole import
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Source file not found: {path}")]
    SourceNotFound { path: PathBuf },

    #[error("Failed to read source file {path}: {source}")]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to provision queue '{queue}': {source}")]
    Provisioning {
        queue: String,
        #[source]
        source: QueueError,
    },

    #[error("Failed to open destination '{destination}': {source}")]
    DestinationOpen {
        destination: String,
        #[source]
        source: QueueError,
    },
}

/// Failures confined to one record
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("Record has {found} fields, at least {required} are required")]
    TooFewFields { found: usize, required: usize },

    #[error("Record is not valid UTF-8 (first invalid byte at offset {valid_up_to})")]
    InvalidEncoding { valid_up_to: usize },

    #[error("Send failed: {0}")]
    Send(#[from] QueueError),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
