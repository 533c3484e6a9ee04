//! Cross-crate integration test helpers.
//!
//! Provides a harness that saves through a [`SaveManager`] and remembers
//! what it wrote, so later loads can be checked against it.

use savekit_codec::Document;
use savekit_core::{SaveManager, SaveSettings};
use savekit_storage::{InMemoryBackend, StorageBackend};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A test harness for integration testing.
pub struct SaveHarness {
    /// The manager under test.
    pub manager: SaveManager,
    /// The storage the manager writes to.
    pub backend: Arc<InMemoryBackend>,
    saved: HashMap<PathBuf, Document>,
}

impl SaveHarness {
    /// Creates a harness over in-memory storage.
    pub fn new(settings: SaveSettings) -> Self {
        let backend = Arc::new(InMemoryBackend::new());
        Self {
            manager: SaveManager::with_backend(backend.clone(), settings),
            backend,
            saved: HashMap::new(),
        }
    }

    /// Saves a document and tracks it for later verification.
    pub async fn save(&mut self, path: impl AsRef<Path>, doc: &Document) {
        let path = path.as_ref().to_path_buf();
        self.manager
            .save(doc, &path)
            .await
            .expect("Failed to save document");
        self.saved.insert(path, doc.clone());
    }

    /// Loads a document and verifies it matches the tracked one.
    pub async fn load_and_verify(&self, path: impl AsRef<Path>) -> Document {
        let path = path.as_ref();
        let actual = self
            .manager
            .load_new(path)
            .await
            .expect("Failed to load document");
        if let Some(expected) = self.saved.get(path) {
            assert_eq!(&actual, expected, "Document mismatch for {}", path.display());
        }
        actual
    }

    /// Deletes a save and stops tracking it.
    pub fn remove(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        self.backend.remove(path).expect("Failed to remove save");
        self.saved.remove(path);
    }

    /// Verifies every tracked save that still exists.
    ///
    /// Saves removed by retention are skipped.
    pub async fn verify_all(&self) {
        for path in self.saved.keys() {
            if self.backend.exists(path).expect("Failed to check save") {
                self.load_and_verify(path).await;
            }
        }
    }

    /// Returns the raw stored text of a save.
    pub fn stored_text(&self, path: impl AsRef<Path>) -> Option<String> {
        self.backend
            .read(path.as_ref())
            .expect("Failed to read save")
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Returns the number of tracked saves.
    pub fn tracked_count(&self) -> usize {
        self.saved.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{scenarios, typed_settings};

    #[tokio::test]
    async fn tracks_and_verifies() {
        let mut harness = SaveHarness::new(typed_settings());
        harness.save("a.sav", &scenarios::player()).await;
        harness.save("b.sav", &scenarios::world()).await;
        harness.verify_all().await;
        assert_eq!(harness.tracked_count(), 2);

        harness.remove("a.sav");
        assert_eq!(harness.tracked_count(), 1);
        assert!(harness.manager.load_new("a.sav").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn stored_text_is_readable() {
        let mut harness = SaveHarness::new(SaveSettings::default());
        harness.save("p.sav", &scenarios::player()).await;
        let text = harness.stored_text("p.sav").unwrap();
        assert!(text.contains("\"score\""));
        assert!(harness.stored_text("missing.sav").is_none());
    }
}
