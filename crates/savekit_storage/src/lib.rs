//! # savekit Storage
//!
//! Storage backends, retention and encryption for savekit.
//!
//! Storage backends are **opaque whole-file stores** addressed by path.
//! They do not interpret the bytes they hold: save text, the encryption
//! envelope and the retention policy are layered on top.
//!
//! ## Available Backends
//!
//! - [`FileBackend`] - The OS file system, with atomic temp-file writes
//! - [`InMemoryBackend`] - For tests, with a logical modification clock
//!
//! ## Example
//!
//! ```rust
//! use savekit_storage::{retention, InMemoryBackend, StorageBackend};
//! use std::path::Path;
//!
//! let backend = InMemoryBackend::new();
//! for name in ["a", "b", "c"] {
//!     backend.write(&Path::new("saves").join(format!("{name}.sav")), b"{}").unwrap();
//! }
//! let removed = retention::prune(&backend, Path::new("saves"), "sav", 2).unwrap();
//! assert_eq!(removed.len(), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod crypto;
mod error;
mod file;
mod memory;
pub mod retention;

pub use backend::{StorageBackend, StoredFile};
pub use crypto::{Cipher, EncryptionKey, KEY_SIZE, NONCE_SIZE, TAG_SIZE};
pub use error::{StorageError, StorageResult};
pub use file::FileBackend;
pub use memory::InMemoryBackend;
