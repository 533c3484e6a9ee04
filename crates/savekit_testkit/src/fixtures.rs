//! Test fixtures and save helpers.
//!
//! Provides temporary save directories, managers over in-memory storage,
//! and sample documents covering every value kind.

use savekit_codec::{CodecSettings, TypeNameHandling};
use savekit_core::{SaveManager, SaveSettings};
use savekit_storage::InMemoryBackend;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// A save manager writing into a temporary directory that is removed on
/// drop.
pub struct TempSaves {
    /// The manager, backed by the real file system.
    pub manager: SaveManager,
    dir: TempDir,
}

impl TempSaves {
    /// Creates a temporary directory with default settings.
    pub fn new() -> Self {
        Self::with_settings(SaveSettings::default())
    }

    /// Creates a temporary directory with the given settings.
    pub fn with_settings(settings: SaveSettings) -> Self {
        Self {
            manager: SaveManager::new(settings),
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Returns the directory root.
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Returns a path inside the directory.
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

impl Default for TempSaves {
    fn default() -> Self {
        Self::new()
    }
}

/// Default settings with `$type` markers on, so math values load back as
/// math values.
pub fn typed_settings() -> SaveSettings {
    SaveSettings::default().codec(CodecSettings::default().type_names(TypeNameHandling::Auto))
}

/// Creates a manager over a fresh in-memory backend and returns both.
pub fn memory_manager(settings: SaveSettings) -> (SaveManager, Arc<InMemoryBackend>) {
    let backend = Arc::new(InMemoryBackend::new());
    let manager = SaveManager::with_backend(backend.clone(), settings);
    (manager, backend)
}

/// Sample documents.
pub mod scenarios {
    use savekit_codec::glam::{IVec2, IVec3, Mat4, Quat, Vec2, Vec3, Vec4};
    use savekit_codec::{Color, CompactId, Document, Key, Value};

    /// A flat player record: score and name.
    pub fn player() -> Document {
        let mut doc = Document::new();
        doc.set("score", 100).set("name", "Ada");
        doc
    }

    /// A player with a nested `stats` document.
    pub fn player_with_stats() -> Document {
        let mut stats = Document::new();
        stats.set("hp", 10);
        let mut doc = player();
        doc.set("stats", stats);
        doc
    }

    /// A document holding one value of every math type.
    pub fn transforms() -> Document {
        let mut doc = Document::new();
        doc.set("uv", Vec2::new(0.25, 0.75))
            .set("position", Vec3::new(1.5, -2.0, 3.25))
            .set("tangent", Vec4::new(0.0, 1.0, 0.0, -1.0))
            .set("cell", IVec2::new(4, -7))
            .set("chunk", IVec3::new(1, 2, 3))
            .set("tint", Color::new(1.0, 0.5, 0.25, 1.0))
            .set("rotation", Quat::from_xyzw(0.0, 0.7071068, 0.0, 0.7071068))
            .set(
                "local_to_world",
                Mat4::from_scale_rotation_translation(
                    Vec3::new(2.0, 2.0, 2.0),
                    Quat::IDENTITY,
                    Vec3::new(10.0, 0.0, -5.0),
                ),
            );
        doc
    }

    /// A commented world save mixing compact-id keys, lists and nesting.
    pub fn world() -> Document {
        let mut inventory = Document::new();
        for (i, item) in ["sword", "shield", "potion"].iter().enumerate() {
            let mut entry = Document::new();
            entry.set("item", *item).set("count", i as i64 + 1);
            inventory.set(Key::from_compact(CompactId::from_bytes([i as u8 + 1; 16])), entry);
        }

        let mut doc = Document::new();
        doc.set(Key::from_string("version").with_comment("save format revision"), 3)
            .set(Key::from_string("player").with_comment("current player"), player_with_stats())
            .set("inventory", inventory)
            .set(
                "visited",
                Value::List(vec!["forest".into(), "cave".into(), Value::Null]),
            )
            .set("playtime", 5423.75)
            .set("hardcore", false)
            .set("transforms", transforms());
        doc
    }
}
