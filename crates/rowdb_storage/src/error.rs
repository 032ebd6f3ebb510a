//! Error types for storage operations.

use std::io;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur while saving data.
///
/// Loading never fails: missing or unreadable data comes back as an empty
/// default, so only writes surface these.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A value could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A temporary file could not be moved into place.
    #[error("could not replace {path}: {source}")]
    Persist {
        /// Destination path.
        path: String,
        /// Underlying error.
        source: io::Error,
    },

    /// The table name cannot be used as a file name.
    #[error("invalid table name for storage: {0}")]
    InvalidName(String),
}
