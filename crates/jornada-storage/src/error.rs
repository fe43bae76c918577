//! Storage error types.

use thiserror::Error;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// SQLite failure.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A record could not be encoded or decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem failure while preparing the database location.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Unusable environment or stored metadata.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A stored record was written by a newer format than this build reads.
    #[error("Record {key:?} has version {found}, newest supported is {supported}")]
    UnsupportedVersion {
        key: String,
        found: u32,
        supported: u32,
    },
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
