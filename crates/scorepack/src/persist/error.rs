//! Persistence errors.

use thiserror::Error;

/// Errors that can occur while reading a model snapshot.
#[derive(Debug, Error)]
pub enum ReadError {
    /// I/O error during reading.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input is not valid JSON for the schema.
    #[error("decoding error: {0}")]
    Json(#[from] serde_json::Error),

    /// Snapshot was written by a newer format.
    #[error("unsupported format version {found} (this build reads up to {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// Snapshot holds a model family this crate cannot score.
    #[error("unsupported model type: {0}")]
    UnsupportedModelType(String),

    /// Snapshot decoded but violates a model invariant.
    #[error("validation error: {0}")]
    Validation(String),
}

/// Errors that can occur while writing a model snapshot.
#[derive(Debug, Error)]
pub enum WriteError {
    /// I/O error during writing.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding error.
    #[error("encoding error: {0}")]
    Json(#[from] serde_json::Error),
}
