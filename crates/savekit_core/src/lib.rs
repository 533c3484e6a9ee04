//! # savekit Core
//!
//! Save/load façade for savekit.
//!
//! This crate ties the codec and storage layers together:
//! - [`SaveSettings`] select the text variant, encryption, retention and
//!   file extension
//! - [`text`] turns documents into stored text and back, including the
//!   base64 AES-GCM envelope for encrypted saves
//! - [`SaveManager`] runs saves and loads on tokio, serializing operations
//!   on the same path and pruning old files after each save
//!
//! ## Example
//!
//! ```no_run
//! use savekit_core::{EncryptionParams, SaveManager, SaveSettings};
//! use savekit_codec::{Document, Key};
//!
//! # async fn run() -> savekit_core::PersistResult<()> {
//! let settings = SaveSettings::default()
//!     .max_files(10)
//!     .encryption(EncryptionParams::new("password", "salt", "iv"));
//! let manager = SaveManager::new(settings);
//!
//! let mut doc = Document::new();
//! doc.set(Key::from_string("gold").with_comment("soft currency"), 250);
//! manager.save_rotating(&doc, "saves", "autosave").await?;
//!
//! let latest = manager.load_latest("saves").await?;
//! assert_eq!(latest.document.get("gold", 0i64), 250);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod manager;
pub mod text;

pub use config::{EncryptionParams, SaveSettings, DEFAULT_EXTENSION};
pub use error::{PersistError, PersistResult};
pub use manager::{LatestSave, SaveManager, SaveReport};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use savekit_codec as codec;
pub use savekit_storage as storage;
