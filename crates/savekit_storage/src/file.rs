//! File-system storage backend.

use crate::backend::{has_extension, StorageBackend, StoredFile};
use crate::error::{StorageError, StorageResult};
use rand::RngCore;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A storage backend over the OS file system.
///
/// # Durability
///
/// With atomic writes enabled (the default), `write` goes to a temporary
/// file in the destination directory, syncs it, and renames it over the
/// target. A crash or failed write leaves the previous file intact.
/// Without atomic writes the target is truncated and written in place.
///
/// # Example
///
/// ```no_run
/// use savekit_storage::{FileBackend, StorageBackend};
/// use std::path::Path;
///
/// let backend = FileBackend::new();
/// backend.write(Path::new("saves/slot1.sav"), b"{}").unwrap();
/// assert_eq!(backend.read(Path::new("saves/slot1.sav")).unwrap(), Some(b"{}".to_vec()));
/// ```
#[derive(Debug, Clone)]
pub struct FileBackend {
    atomic: bool,
}

impl Default for FileBackend {
    fn default() -> Self {
        Self { atomic: true }
    }
}

impl FileBackend {
    /// Creates a backend with atomic writes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables atomic writes.
    #[must_use]
    pub const fn atomic_writes(mut self, atomic: bool) -> Self {
        self.atomic = atomic;
        self
    }

    /// Returns true if writes go through a temporary file.
    #[must_use]
    pub const fn is_atomic(&self) -> bool {
        self.atomic
    }

    fn temp_path(path: &Path) -> StorageResult<PathBuf> {
        let name = path
            .file_name()
            .ok_or_else(|| StorageError::InvalidPath(path.to_path_buf()))?;
        let tag = rand::thread_rng().next_u64();
        let mut temp_name = std::ffi::OsString::from(".");
        temp_name.push(name);
        temp_name.push(format!(".{tag:016x}.tmp"));
        Ok(path.with_file_name(temp_name))
    }

    fn write_atomic(path: &Path, data: &[u8]) -> StorageResult<()> {
        let temp = Self::temp_path(path)?;
        let result = (|| -> io::Result<()> {
            let mut file = File::create(&temp)?;
            file.write_all(data)?;
            file.sync_all()?;
            fs::rename(&temp, path)
        })();
        if let Err(err) = result {
            if let Err(cleanup) = fs::remove_file(&temp) {
                if cleanup.kind() != io::ErrorKind::NotFound {
                    warn!(path = %temp.display(), error = %cleanup, "failed to remove temp file");
                }
            }
            return Err(StorageError::at_path(path, err));
        }
        Ok(())
    }
}

impl StorageBackend for FileBackend {
    fn read(&self, path: &Path) -> StorageResult<Option<Vec<u8>>> {
        match fs::read(path) {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StorageError::at_path(path, err)),
        }
    }

    fn write(&self, path: &Path, data: &[u8]) -> StorageResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StorageError::at_path(parent, e))?;
        }
        debug!(path = %path.display(), bytes = data.len(), atomic = self.atomic, "writing file");
        if self.atomic {
            Self::write_atomic(path, data)
        } else {
            fs::write(path, data).map_err(|e| StorageError::at_path(path, e))
        }
    }

    fn list(&self, dir: &Path, extension: &str) -> StorageResult<Vec<StoredFile>> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(StorageError::at_path(dir, err)),
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StorageError::at_path(dir, e))?;
            let path = entry.path();
            if !has_extension(&path, extension) {
                continue;
            }
            let meta = match entry.metadata() {
                Ok(meta) => meta,
                // Deleted between enumeration and stat.
                Err(err) if err.kind() == io::ErrorKind::NotFound => continue,
                Err(err) => return Err(StorageError::at_path(&path, err)),
            };
            if !meta.is_file() {
                continue;
            }
            let modified = meta
                .modified()
                .map_err(|e| StorageError::at_path(&path, e))?;
            files.push(StoredFile {
                path,
                modified,
                len: meta.len(),
            });
        }
        Ok(files)
    }

    fn remove(&self, path: &Path) -> StorageResult<()> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StorageError::at_path(path, err)),
        }
    }

    fn exists(&self, path: &Path) -> StorageResult<bool> {
        Ok(path.is_file())
    }
}
