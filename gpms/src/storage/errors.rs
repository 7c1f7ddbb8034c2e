//! Storage error types.

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Backing file could not be read or written
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Entry could not be serialized for the backing file
    #[error("storage serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
