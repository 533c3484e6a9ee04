//! # savekit Testkit
//!
//! Test utilities for savekit.
//!
//! This crate provides:
//! - Temporary save directories and sample documents
//! - Property-based test generators using proptest
//! - Cross-crate integration test helpers
//! - Fuzz testing harnesses for the text codec
//! - Concurrent save stress tests
//!
//! ## Usage
//!
//! ```rust,ignore
//! use savekit_testkit::prelude::*;
//!
//! #[tokio::test]
//! async fn test_with_saves() {
//!     let saves = TempSaves::new();
//!     let doc = scenarios::player();
//!     saves.manager.save(&doc, saves.path("slot1.sav")).await.unwrap();
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod fuzz;
pub mod generators;
pub mod integration;
pub mod stress;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::fuzz::*;
    pub use crate::generators::*;
    pub use crate::integration::*;
    pub use crate::stress::*;
}

pub use fixtures::*;
pub use fuzz::*;
pub use generators::*;
pub use integration::*;
pub use stress::*;
