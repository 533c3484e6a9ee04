//! The save/load façade.

use crate::config::SaveSettings;
use crate::error::{PersistError, PersistResult};
use crate::text::{decode_text, encode_text};
use parking_lot::Mutex;
use savekit_codec::Document;
use savekit_storage::{retention, FileBackend, StorageBackend};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::OwnedMutexGuard;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Outcome of a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    /// Where the document was written.
    pub path: PathBuf,
    /// Size of the stored text in bytes.
    pub bytes: usize,
    /// Whether the text was encrypted.
    pub encrypted: bool,
    /// Old files deleted by retention.
    pub pruned: Vec<PathBuf>,
}

/// Result of [`SaveManager::load_latest`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LatestSave {
    /// The file that was loaded, or `None` if the directory had no saves.
    pub path: Option<PathBuf>,
    /// The loaded document; empty if there was nothing to load.
    pub document: Document,
}

/// Per-path async locks. Entries are dropped once no operation holds or
/// waits on them, including waiters that are cancelled.
#[derive(Debug, Default)]
struct PathLocks {
    map: Mutex<HashMap<PathBuf, Arc<tokio::sync::Mutex<()>>>>,
}

/// A registered interest in one path's lock. Dropping the last one
/// removes the map entry.
struct LockEntry {
    locks: Arc<PathLocks>,
    path: PathBuf,
    lock: Arc<tokio::sync::Mutex<()>>,
}

impl Drop for LockEntry {
    fn drop(&mut self) {
        let mut map = self.locks.map.lock();
        // Only the map and this entry still reference the lock.
        if Arc::strong_count(&self.lock) == 2 {
            map.remove(&self.path);
        }
    }
}

struct PathGuard {
    // Declared first so the mutex is released before the entry is checked.
    _guard: OwnedMutexGuard<()>,
    _entry: LockEntry,
}

impl PathLocks {
    async fn acquire(self: &Arc<Self>, path: &Path) -> PathGuard {
        let entry = LockEntry {
            locks: Arc::clone(self),
            path: path.to_path_buf(),
            lock: {
                let mut map = self.map.lock();
                Arc::clone(map.entry(path.to_path_buf()).or_default())
            },
        };
        let guard = Arc::clone(&entry.lock).lock_owned().await;
        PathGuard {
            _guard: guard,
            _entry: entry,
        }
    }

    fn len(&self) -> usize {
        self.map.lock().len()
    }
}

/// Saves and loads documents.
///
/// A manager owns a storage backend and default [`SaveSettings`]. Cloning
/// is cheap and clones share the backend and the per-path locks, so
/// operations on the same path issued through any clone run one at a time
/// in the order they acquired the lock. Operations on different paths are
/// not ordered.
///
/// File-system work runs on tokio's blocking pool. Encoding happens
/// synchronously before the first suspension point, so `save` only borrows
/// the document briefly.
///
/// # Example
///
/// ```no_run
/// use savekit_core::{SaveManager, SaveSettings};
/// use savekit_codec::Document;
///
/// # async fn run() -> savekit_core::PersistResult<()> {
/// let manager = SaveManager::new(SaveSettings::default().max_files(5));
///
/// let mut doc = Document::new();
/// doc.set("score", 100).set("name", "Ada");
/// manager.save(&doc, "saves/slot1.sav").await?;
///
/// let loaded = manager.load_new("saves/slot1.sav").await?;
/// assert_eq!(loaded.get("score", 0i64), 100);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SaveManager {
    backend: Arc<dyn StorageBackend>,
    settings: Arc<SaveSettings>,
    locks: Arc<PathLocks>,
    last_stamp: Arc<AtomicU64>,
}

impl SaveManager {
    /// Creates a manager over the file system.
    #[must_use]
    pub fn new(settings: SaveSettings) -> Self {
        let backend = FileBackend::new().atomic_writes(settings.atomic_writes);
        Self::with_backend(Arc::new(backend), settings)
    }

    /// Creates a manager over a custom backend.
    #[must_use]
    pub fn with_backend(backend: Arc<dyn StorageBackend>, settings: SaveSettings) -> Self {
        Self {
            backend,
            settings: Arc::new(settings),
            locks: Arc::default(),
            last_stamp: Arc::default(),
        }
    }

    /// Returns a manager that shares this one's backend and locks but uses
    /// different settings.
    #[must_use]
    pub fn with_settings(&self, settings: SaveSettings) -> Self {
        Self {
            settings: Arc::new(settings),
            ..self.clone()
        }
    }

    /// The settings used by this manager.
    #[must_use]
    pub fn settings(&self) -> &SaveSettings {
        &self.settings
    }

    /// The storage backend.
    #[must_use]
    pub fn backend(&self) -> &Arc<dyn StorageBackend> {
        &self.backend
    }

    /// Saves a document to `path`, then prunes old files in the same
    /// directory beyond the retention limit.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding, encryption, writing or pruning fails.
    /// When the write itself fails the previous file is left intact (with
    /// atomic writes on).
    pub async fn save(&self, doc: &Document, path: impl AsRef<Path>) -> PersistResult<SaveReport> {
        let text = encode_text(doc, &self.settings)?;
        self.write_text(path.as_ref().to_path_buf(), text).await
    }

    /// Loads `path` into `doc`, replacing its contents.
    ///
    /// A missing or empty file loads as an empty document. On error `doc`
    /// is left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if reading, decryption or parsing fails.
    pub async fn load(&self, doc: &mut Document, path: impl AsRef<Path>) -> PersistResult<()> {
        *doc = self.load_new(path).await?;
        Ok(())
    }

    /// Loads `path` into a new document.
    ///
    /// # Errors
    ///
    /// Returns an error if reading, decryption or parsing fails.
    pub async fn load_new(&self, path: impl AsRef<Path>) -> PersistResult<Document> {
        let path = path.as_ref().to_path_buf();
        let bytes = {
            let _guard = self.locks.acquire(&path).await;
            let backend = Arc::clone(&self.backend);
            let read_path = path.clone();
            tokio::task::spawn_blocking(move || backend.read(&read_path))
                .await
                .map_err(PersistError::task_failed)??
        };

        let Some(bytes) = bytes else {
            debug!(path = %path.display(), "no save file, loading empty document");
            return Ok(Document::new());
        };
        let doc = decode_text(&bytes, &self.settings)?;
        info!(path = %path.display(), bytes = bytes.len(), keys = doc.len(), "loaded save");
        Ok(doc)
    }

    /// Saves in the background and reports the result to `on_done`.
    ///
    /// The document is encoded before this returns. Failures are logged
    /// as well as passed to the callback.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn save_with<F>(&self, doc: &Document, path: impl AsRef<Path>, on_done: F) -> JoinHandle<()>
    where
        F: FnOnce(PersistResult<SaveReport>) + Send + 'static,
    {
        let path = path.as_ref().to_path_buf();
        let text = encode_text(doc, &self.settings);
        let manager = self.clone();
        tokio::spawn(async move {
            let result = match text {
                Ok(text) => manager.write_text(path.clone(), text).await,
                Err(err) => Err(err),
            };
            if let Err(err) = &result {
                error!(path = %path.display(), error = %err, "background save failed");
            }
            on_done(result);
        })
    }

    /// Loads in the background and passes the document to `on_done`.
    ///
    /// Failures are logged as well as passed to the callback.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn load_with<F>(&self, path: impl AsRef<Path>, on_done: F) -> JoinHandle<()>
    where
        F: FnOnce(PersistResult<Document>) + Send + 'static,
    {
        let path = path.as_ref().to_path_buf();
        let manager = self.clone();
        tokio::spawn(async move {
            let result = manager.load_new(&path).await;
            if let Err(err) = &result {
                error!(path = %path.display(), error = %err, "background load failed");
            }
            on_done(result);
        })
    }

    /// Saves to a new timestamped file `<prefix>-<unix millis>.<ext>` in
    /// `dir`, then applies retention to `dir`.
    ///
    /// Timestamps issued by one manager (and its clones) strictly increase,
    /// so rapid saves never overwrite each other.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding, encryption, writing or pruning fails.
    pub async fn save_rotating(
        &self,
        doc: &Document,
        dir: impl AsRef<Path>,
        prefix: &str,
    ) -> PersistResult<SaveReport> {
        let text = encode_text(doc, &self.settings)?;
        let name = format!("{prefix}-{}.{}", self.next_stamp(), self.settings.extension);
        self.write_text(dir.as_ref().join(name), text).await
    }

    /// Loads the most recently modified save in `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if listing, reading, decryption or parsing fails.
    pub async fn load_latest(&self, dir: impl AsRef<Path>) -> PersistResult<LatestSave> {
        let dir = dir.as_ref().to_path_buf();
        let backend = Arc::clone(&self.backend);
        let extension = self.settings.extension.clone();
        let latest = tokio::task::spawn_blocking(move || {
            retention::latest(backend.as_ref(), &dir, &extension)
        })
        .await
        .map_err(PersistError::task_failed)??;

        match latest {
            Some(file) => {
                let document = self.load_new(&file.path).await?;
                Ok(LatestSave {
                    path: Some(file.path),
                    document,
                })
            }
            None => Ok(LatestSave::default()),
        }
    }

    async fn write_text(&self, path: PathBuf, text: String) -> PersistResult<SaveReport> {
        if path.file_name().is_none() {
            return Err(PersistError::InvalidPath(path));
        }
        let _guard = self.locks.acquire(&path).await;
        let backend = Arc::clone(&self.backend);
        let settings = Arc::clone(&self.settings);

        let report = tokio::task::spawn_blocking(move || -> PersistResult<SaveReport> {
            backend.write(&path, text.as_bytes())?;
            let pruned = match path.parent() {
                Some(dir) => retention::prune_pinned(
                    backend.as_ref(),
                    dir,
                    &settings.extension,
                    settings.max_files,
                    &path,
                )?,
                None => Vec::new(),
            };
            Ok(SaveReport {
                path,
                bytes: text.len(),
                encrypted: settings.encryption.is_some(),
                pruned,
            })
        })
        .await
        .map_err(PersistError::task_failed)??;

        info!(
            path = %report.path.display(),
            bytes = report.bytes,
            encrypted = report.encrypted,
            pruned = report.pruned.len(),
            "saved"
        );
        Ok(report)
    }

    fn next_stamp(&self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or(0);
        let mut last = self.last_stamp.load(Ordering::SeqCst);
        loop {
            let next = now.max(last + 1);
            match self
                .last_stamp
                .compare_exchange(last, next, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return next,
                Err(actual) => last = actual,
            }
        }
    }
}

impl std::fmt::Debug for SaveManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SaveManager")
            .field("backend", &self.backend)
            .field("settings", &self.settings)
            .field("locked_paths", &self.locks.len())
            .finish()
    }
}
