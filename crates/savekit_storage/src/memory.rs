//! In-memory storage backend for testing.

use crate::backend::{has_extension, StorageBackend, StoredFile};
use crate::error::StorageResult;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime};

#[derive(Debug, Clone)]
struct MemFile {
    data: Vec<u8>,
    modified: SystemTime,
}

/// An in-memory storage backend.
///
/// Modification times come from a logical clock that advances one
/// millisecond per write, so "most recently modified" is always well
/// defined, which keeps retention tests deterministic.
///
/// # Example
///
/// ```rust
/// use savekit_storage::{InMemoryBackend, StorageBackend};
/// use std::path::Path;
///
/// let backend = InMemoryBackend::new();
/// backend.write(Path::new("saves/a.sav"), b"{}").unwrap();
/// assert_eq!(backend.list(Path::new("saves"), "sav").unwrap().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    files: RwLock<BTreeMap<PathBuf, MemFile>>,
    clock: AtomicU64,
}

impl InMemoryBackend {
    /// Creates a new empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn tick(&self) -> SystemTime {
        let millis = self.clock.fetch_add(1, Ordering::SeqCst) + 1;
        SystemTime::UNIX_EPOCH + Duration::from_millis(millis)
    }

    /// Overrides the modification time of a stored file.
    ///
    /// Returns false if the file does not exist.
    pub fn set_modified(&self, path: &Path, modified: SystemTime) -> bool {
        match self.files.write().get_mut(path) {
            Some(file) => {
                file.modified = modified;
                true
            }
            None => false,
        }
    }

    /// Returns every stored path, sorted.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.read().keys().cloned().collect()
    }

    /// Number of stored files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.read().len()
    }

    /// Returns true if no files are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.read().is_empty()
    }

    /// Removes every file.
    pub fn clear(&self) {
        self.files.write().clear();
    }
}

impl StorageBackend for InMemoryBackend {
    fn read(&self, path: &Path) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.files.read().get(path).map(|f| f.data.clone()))
    }

    fn write(&self, path: &Path, data: &[u8]) -> StorageResult<()> {
        let modified = self.tick();
        self.files.write().insert(
            path.to_path_buf(),
            MemFile {
                data: data.to_vec(),
                modified,
            },
        );
        Ok(())
    }

    fn list(&self, dir: &Path, extension: &str) -> StorageResult<Vec<StoredFile>> {
        Ok(self
            .files
            .read()
            .iter()
            .filter(|(path, _)| path.parent() == Some(dir) && has_extension(path, extension))
            .map(|(path, file)| StoredFile {
                path: path.clone(),
                modified: file.modified,
                len: file.data.len() as u64,
            })
            .collect())
    }

    fn remove(&self, path: &Path) -> StorageResult<()> {
        self.files.write().remove(path);
        Ok(())
    }

    fn exists(&self, path: &Path) -> StorageResult<bool> {
        Ok(self.files.read().contains_key(path))
    }
}
