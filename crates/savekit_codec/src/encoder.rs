//! Document to text encoding.

use crate::convert;
use crate::document::Document;
use crate::error::{CodecError, CodecResult};
use crate::settings::{CodecSettings, CommentPlacement};
use crate::token::TYPE_MARKER;
use crate::value::Value;
use crate::writer::TokenWriter;
use tracing::warn;

/// Serializes a document to save text.
///
/// # Errors
///
/// Returns an error if the document nests deeper than the configured
/// depth limit, since such text could not be read back.
pub fn to_text(doc: &Document, settings: &CodecSettings) -> CodecResult<String> {
    let mut encoder = DocumentEncoder::new(settings);
    encoder.encode_root(doc)?;
    encoder.finish()
}

/// Walks a document tree and drives a [`TokenWriter`].
pub struct DocumentEncoder<'s> {
    settings: &'s CodecSettings,
    writer: TokenWriter,
    depth: usize,
}

impl<'s> DocumentEncoder<'s> {
    /// Creates an encoder.
    #[must_use]
    pub fn new(settings: &'s CodecSettings) -> Self {
        Self {
            settings,
            writer: TokenWriter::new(settings.formatting, settings.indent),
            depth: 0,
        }
    }

    /// Writes the header comment (if any) and the root document.
    pub fn encode_root(&mut self, doc: &Document) -> CodecResult<()> {
        if let Some(header) = self.settings.header.as_deref() {
            for line in header.lines().map(str::trim).filter(|l| !l.is_empty()) {
                self.writer.write_comment_line(line)?;
            }
        }
        self.encode_document(doc)
    }

    /// Returns the produced text.
    pub fn finish(self) -> CodecResult<String> {
        self.writer.finish()
    }

    fn enter(&mut self) -> CodecResult<()> {
        self.depth += 1;
        if self.depth > self.settings.max_depth {
            return Err(CodecError::DepthLimitExceeded {
                limit: self.settings.max_depth,
            });
        }
        Ok(())
    }

    fn encode_document(&mut self, doc: &Document) -> CodecResult<()> {
        self.enter()?;
        self.writer.write_start_object()?;
        let placement = self.settings.comments;
        for (key, value) in doc {
            let comment = key.comment();
            if let (CommentPlacement::BeforeKey, Some(c)) = (placement, comment) {
                self.writer.write_comment_line(c)?;
            }
            key.with_display(|name| {
                if name == TYPE_MARKER
                    && value.as_str().and_then(convert::Shape::from_type_name).is_some()
                {
                    warn!("document key names a converter type and will be read as one");
                }
                self.writer.write_property_name(name)
            })?;
            self.encode_value(value)?;
            if let (CommentPlacement::AfterValue, Some(c)) = (placement, comment) {
                self.writer.write_trailing_comment(c);
            }
        }
        self.writer.write_end_object()?;
        self.depth -= 1;
        Ok(())
    }

    fn encode_value(&mut self, value: &Value) -> CodecResult<()> {
        match value {
            Value::Null => self.writer.write_null(),
            Value::Bool(b) => self.writer.write_bool(*b),
            Value::Int(n) => self.writer.write_int(*n),
            Value::Float(f) => self.writer.write_f64(*f),
            Value::String(s) => self.writer.write_string(s),
            Value::Document(doc) => self.encode_document(doc),
            Value::List(items) => {
                self.enter()?;
                self.writer.write_start_array()?;
                for item in items {
                    self.encode_value(item)?;
                }
                self.writer.write_end_array()?;
                self.depth -= 1;
                Ok(())
            }
            Value::Vector2(_)
            | Value::Vector3(_)
            | Value::Vector4(_)
            | Value::Vector2Int(_)
            | Value::Vector3Int(_)
            | Value::Color(_)
            | Value::Quaternion(_)
            | Value::Matrix4x4(_) => {
                self.enter()?;
                convert::write_value(&mut self.writer, value, self.settings.type_names)?;
                self.depth -= 1;
                Ok(())
            }
        }
    }
}
