//! Error types for metadata storage.

use std::io;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// No value is stored under the key.
    #[error("metadata key not found: {key}")]
    NotFound {
        /// The missing key.
        key: String,
    },

    /// The key cannot be used by this store.
    #[error("invalid metadata key '{key}': {reason}")]
    InvalidKey {
        /// The rejected key.
        key: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The store refused a write.
    #[error("write rejected for key {key}")]
    WriteRejected {
        /// The key being written.
        key: String,
    },
}

impl StorageError {
    /// Creates a not found error.
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Whether this error means the key is absent.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
