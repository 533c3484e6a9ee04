//! Storage backend trait definition.

use crate::error::StorageResult;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// A stored file as seen by [`StorageBackend::list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Full path of the file.
    pub path: PathBuf,
    /// Last modification time.
    pub modified: SystemTime,
    /// Size in bytes.
    pub len: u64,
}

/// A whole-file store addressed by path.
///
/// Backends are **opaque byte stores**: they do not interpret the bytes they
/// hold. Save text, encryption envelopes and retention policy all live above
/// this trait.
///
/// # Invariants
///
/// - `read` returns exactly the bytes of the last successful `write`
/// - `read` of a missing file is `Ok(None)`, not an error
/// - `write` creates missing parent directories
/// - `remove` of a missing file succeeds
/// - Backends must be `Send + Sync` so they can be shared across tasks
///
/// # Implementors
///
/// - [`super::FileBackend`] - The OS file system
/// - [`super::InMemoryBackend`] - For testing
pub trait StorageBackend: Send + Sync + std::fmt::Debug {
    /// Reads a whole file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    fn read(&self, path: &Path) -> StorageResult<Option<Vec<u8>>>;

    /// Replaces the contents of a file, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the file
    /// cannot be written.
    fn write(&self, path: &Path, data: &[u8]) -> StorageResult<()>;

    /// Lists the files directly inside `dir` whose extension equals
    /// `extension` (without the dot). A missing directory lists as empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be enumerated.
    fn list(&self, dir: &Path, extension: &str) -> StorageResult<Vec<StoredFile>>;

    /// Deletes a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be deleted.
    fn remove(&self, path: &Path) -> StorageResult<()>;

    /// Returns true if a file exists at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if existence cannot be determined.
    fn exists(&self, path: &Path) -> StorageResult<bool> {
        Ok(self.read(path)?.is_some())
    }
}

/// Returns true if `path` has exactly the extension `extension`.
pub(crate) fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(extension)
}
