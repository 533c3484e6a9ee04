//! # savekit Codec
//!
//! Document model and comment-annotated JSON codec for game save data.
//!
//! A [`Document`] is an insertion-ordered map from [`Key`] to [`Value`].
//! Keys are either human-readable strings or 128-bit compact ids, and may
//! carry a comment that is written next to the entry. Values include the
//! JSON scalars, lists, nested documents and the engine math types
//! (vectors, colors, quaternions and 4x4 matrices).
//!
//! ## Text format
//!
//! Save text is JSON with three extensions:
//!
//! - `/* block */` and `// line` comments
//! - the literals `NaN`, `Infinity` and `-Infinity`
//! - math types written as objects of named fields, optionally tagged with
//!   a leading `"$type"` property
//!
//! Six [`CodecVariant`]s combine compact or indented output with three
//! comment placements. Keys and values written with one variant read back
//! under any other, but comments only come back when the reader uses the
//! same placement as the writer.
//!
//! ## Usage
//!
//! ```
//! use savekit_codec::{CodecVariant, Document, Key};
//!
//! let mut doc = Document::new();
//! doc.set(Key::from_string("gold").with_comment("currency"), 250)
//!     .set("name", "Ada");
//!
//! let settings = CodecVariant::IndentedCommentsBefore.settings();
//! let text = doc.to_text(&settings).unwrap();
//! let back = Document::from_text(&text, &settings).unwrap();
//!
//! assert_eq!(back.get("gold", 0i64), 250);
//! assert_eq!(back.comment("gold"), Some("currency"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod convert;
mod decoder;
mod document;
mod encoder;
mod error;
mod id;
mod key;
mod reader;
mod settings;
mod token;
mod value;
mod writer;

pub use convert::Shape;
pub use decoder::{from_text, DocumentDecoder};
pub use document::Document;
pub use encoder::{to_text, DocumentEncoder};
pub use error::{CodecError, CodecResult, Position};
pub use id::{CompactId, HEX_LEN};
pub use key::Key;
pub use reader::TokenReader;
pub use settings::{
    CodecSettings, CodecVariant, CommentPlacement, Formatting, TypeNameHandling,
    DEFAULT_MAX_DEPTH,
};
pub use token::{Scalar, Token, TYPE_MARKER};
pub use value::{Color, FromValue, Value};
pub use writer::TokenWriter;

pub use glam;
