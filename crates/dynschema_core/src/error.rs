//! Error types for DynSchema core.

use crate::column::Column;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in registry and envelope operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Metadata store error.
    #[error("storage error: {0}")]
    Storage(#[from] dynschema_storage::StorageError),

    /// Codec error.
    #[error("codec error: {0}")]
    Codec(#[from] dynschema_codec::CodecError),

    /// Schema record could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A declared column conflicts with the stored column.
    #[error("column mismatch at position {position}: stored {existing}, supplied {supplied}")]
    ColumnMismatch {
        /// Position of the stored column.
        position: usize,
        /// The stored column.
        existing: Column,
        /// The column the caller declared.
        supplied: Column,
    },

    /// A declared column uses a reserved name.
    #[error("column name '{name}' is reserved")]
    ReservedColumn {
        /// The reserved name.
        name: String,
    },

    /// The persisted schema record is unreadable or inconsistent.
    #[error("corrupt schema record: {message}")]
    CorruptSchema {
        /// Description of the problem.
        message: String,
    },

    /// A store key could not be parsed.
    #[error("invalid key '{key}': {message}")]
    InvalidKey {
        /// The key.
        key: String,
        /// Description of the problem.
        message: String,
    },

    /// Envelope bytes are not a well-formed envelope.
    #[error("invalid envelope: {message}")]
    InvalidEnvelope {
        /// Description of the problem.
        message: String,
    },

    /// A document could not be converted.
    #[error("invalid document: {message}")]
    InvalidDocument {
        /// Description of the problem.
        message: String,
    },
}

/// Discriminator for [`CoreError`], for callers that branch on the failure
/// class rather than its details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`CoreError::ColumnMismatch`].
    ColumnMismatch,
    /// See [`CoreError::ReservedColumn`].
    ReservedColumn,
    /// Any metadata store failure.
    Storage,
    /// Any codec failure.
    Codec,
    /// See [`CoreError::Serialization`].
    Serialization,
    /// See [`CoreError::CorruptSchema`].
    CorruptSchema,
    /// See [`CoreError::InvalidKey`].
    InvalidKey,
    /// See [`CoreError::InvalidEnvelope`].
    InvalidEnvelope,
    /// See [`CoreError::InvalidDocument`].
    InvalidDocument,
}

impl CoreError {
    /// Returns the error's discriminator.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Storage(_) => ErrorKind::Storage,
            Self::Codec(_) => ErrorKind::Codec,
            Self::Serialization(_) => ErrorKind::Serialization,
            Self::ColumnMismatch { .. } => ErrorKind::ColumnMismatch,
            Self::ReservedColumn { .. } => ErrorKind::ReservedColumn,
            Self::CorruptSchema { .. } => ErrorKind::CorruptSchema,
            Self::InvalidKey { .. } => ErrorKind::InvalidKey,
            Self::InvalidEnvelope { .. } => ErrorKind::InvalidEnvelope,
            Self::InvalidDocument { .. } => ErrorKind::InvalidDocument,
        }
    }

    /// Whether this is a column mismatch.
    #[must_use]
    pub fn is_column_mismatch(&self) -> bool {
        self.kind() == ErrorKind::ColumnMismatch
    }

    /// Creates a column mismatch error.
    pub fn column_mismatch(position: usize, existing: Column, supplied: Column) -> Self {
        Self::ColumnMismatch {
            position,
            existing,
            supplied,
        }
    }

    /// Creates a corrupt schema error.
    pub fn corrupt_schema(message: impl Into<String>) -> Self {
        Self::CorruptSchema {
            message: message.into(),
        }
    }

    /// Creates an invalid key error.
    pub fn invalid_key(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidKey {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid envelope error.
    pub fn invalid_envelope(message: impl Into<String>) -> Self {
        Self::InvalidEnvelope {
            message: message.into(),
        }
    }

    /// Creates an invalid document error.
    pub fn invalid_document(message: impl Into<String>) -> Self {
        Self::InvalidDocument {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::TypeTag;
    use dynschema_storage::StorageError;

    #[test]
    fn kinds_separate_mismatch_from_storage() {
        let mismatch = CoreError::column_mismatch(
            0,
            Column::new("a", TypeTag::Bool),
            Column::new("a", TypeTag::String),
        );
        let storage: CoreError = StorageError::not_found("schema").into();

        assert!(mismatch.is_column_mismatch());
        assert_eq!(storage.kind(), ErrorKind::Storage);
        assert!(!storage.is_column_mismatch());
    }

    #[test]
    fn mismatch_message_names_both_columns() {
        let err = CoreError::column_mismatch(
            2,
            Column::new("a", TypeTag::Bool),
            Column::new("b", TypeTag::String),
        );
        assert_eq!(
            err.to_string(),
            "column mismatch at position 2: stored a:bool, supplied b:string"
        );
    }
}
