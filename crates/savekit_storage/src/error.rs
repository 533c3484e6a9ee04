//! Error types for storage operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// An I/O error occurred on a specific path.
    #[error("I/O error on {}: {source}", path.display())]
    Path {
        /// The file or directory involved.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// The path has no file name or parent directory where one is required.
    #[error("invalid path: {}", .0.display())]
    InvalidPath(PathBuf),

    /// Encryption failed.
    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    /// Decryption failed: wrong key, wrong IV, or corrupted data.
    #[error("decryption failed: {0}")]
    DecryptionFailed(String),

    /// A key had the wrong length or could not be derived.
    #[error("invalid key: {0}")]
    InvalidKey(String),
}

impl StorageError {
    /// Wraps an I/O error with the path it occurred on.
    pub fn at_path(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Path {
            path: path.into(),
            source,
        }
    }

    /// Creates an encryption failure.
    pub fn encryption_failed(message: impl Into<String>) -> Self {
        Self::EncryptionFailed(message.into())
    }

    /// Creates a decryption failure.
    pub fn decryption_failed(message: impl Into<String>) -> Self {
        Self::DecryptionFailed(message.into())
    }

    /// Creates an invalid key error.
    pub fn invalid_key(message: impl Into<String>) -> Self {
        Self::InvalidKey(message.into())
    }

    /// Returns true for encryption and decryption failures.
    #[must_use]
    pub fn is_crypto(&self) -> bool {
        matches!(
            self,
            Self::EncryptionFailed(_) | Self::DecryptionFailed(_) | Self::InvalidKey(_)
        )
    }
}
