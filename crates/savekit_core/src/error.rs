//! Error types for savekit core.

use savekit_codec::CodecError;
use savekit_storage::StorageError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for persistence operations.
pub type PersistResult<T> = Result<T, PersistError>;

/// Errors that can occur while saving or loading.
#[derive(Debug, Error)]
pub enum PersistError {
    /// The save text could not be parsed or written.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// The storage backend failed.
    #[error("storage error: {0}")]
    Storage(#[source] StorageError),

    /// Encryption or decryption failed: wrong password, salt or IV, bad
    /// base64, or corrupted data.
    #[error("encryption error: {message}")]
    Encryption {
        /// Description of the failure.
        message: String,
    },

    /// The file is not valid UTF-8 text.
    #[error("save file is not valid UTF-8")]
    InvalidText,

    /// A path could not be used for the requested operation.
    #[error("invalid path: {}", .0.display())]
    InvalidPath(PathBuf),

    /// A background task panicked or was cancelled.
    #[error("background task failed: {message}")]
    TaskFailed {
        /// Description of the failure.
        message: String,
    },
}

impl PersistError {
    /// Creates an encryption error.
    pub fn encryption(message: impl Into<String>) -> Self {
        Self::Encryption {
            message: message.into(),
        }
    }

    /// Creates a task failure from a join error.
    pub fn task_failed(err: tokio::task::JoinError) -> Self {
        Self::TaskFailed {
            message: err.to_string(),
        }
    }

    /// Returns true for encryption failures.
    #[must_use]
    pub fn is_encryption(&self) -> bool {
        matches!(self, Self::Encryption { .. })
    }
}

impl From<StorageError> for PersistError {
    fn from(err: StorageError) -> Self {
        if err.is_crypto() {
            Self::encryption(err.to_string())
        } else {
            Self::Storage(err)
        }
    }
}
