//! Error types for the benchmark history store.

use thiserror::Error;

/// Result type for history operations.
pub type Result<T> = std::result::Result<T, HistoryError>;

#[derive(Debug, Error)]
pub enum HistoryError {
    /// The persisted artifact does not have the expected shape.
    ///
    /// There is no partial recovery: the file has to be regenerated.
    #[error("malformed benchmark data: {0}")]
    MalformedData(String),

    /// A run handed to `append_run` could not be stored and reloaded.
    #[error("invalid benchmark run: {0}")]
    InvalidRun(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
