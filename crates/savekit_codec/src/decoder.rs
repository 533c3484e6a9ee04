//! Text to document decoding.

use crate::convert::{FieldSet, Shape};
use crate::document::Document;
use crate::error::{CodecError, CodecResult};
use crate::key::Key;
use crate::reader::TokenReader;
use crate::settings::{CodecSettings, CommentPlacement};
use crate::token::{Scalar, Token, TYPE_MARKER};
use crate::value::Value;
use tracing::{debug, warn};

/// Parses save text into a document.
///
/// Comments before the root object are skipped. Comments inside objects
/// attach to keys according to the configured [`CommentPlacement`]. Type
/// markers are honored whether or not the settings would write them.
///
/// # Errors
///
/// Returns an error if the text is not a single well-formed object.
pub fn from_text(text: &str, settings: &CodecSettings) -> CodecResult<Document> {
    DocumentDecoder::new(text, settings).decode_root()
}

/// Builds a document tree from a [`TokenReader`].
pub struct DocumentDecoder<'a> {
    reader: TokenReader<'a>,
    placement: CommentPlacement,
    /// Tokens handed back after lookahead, popped from the end.
    pushback: Vec<Token>,
}

impl<'a> DocumentDecoder<'a> {
    /// Creates a decoder over `text`.
    #[must_use]
    pub fn new(text: &'a str, settings: &CodecSettings) -> Self {
        Self {
            reader: TokenReader::new(text, settings.max_depth),
            placement: settings.comments,
            pushback: Vec::new(),
        }
    }

    /// Reads the root object and checks that only comments follow it.
    pub fn decode_root(mut self) -> CodecResult<Document> {
        loop {
            match self.next()? {
                Token::Comment(_) => {}
                Token::StartObject => break,
                other => {
                    return Err(CodecError::unexpected(
                        "'{'",
                        other.describe(),
                        self.reader.token_start(),
                    ))
                }
            }
        }
        let doc = self.decode_document()?;
        while self.reader.next_token()?.is_some() {}
        Ok(doc)
    }

    fn next(&mut self) -> CodecResult<Token> {
        if let Some(token) = self.pushback.pop() {
            return Ok(token);
        }
        self.reader
            .next_token()?
            .ok_or_else(|| CodecError::UnexpectedEof {
                at: self.reader.position(),
            })
    }

    fn next_significant(&mut self) -> CodecResult<Token> {
        loop {
            match self.next()? {
                Token::Comment(_) => {}
                token => return Ok(token),
            }
        }
    }

    /// Reads an object whose `{` was just consumed, detecting converter
    /// objects by a leading type marker.
    ///
    /// A marker that does not name a known shape stays in the document as
    /// an ordinary `$type` entry, so it survives being read and written.
    fn decode_object(&mut self) -> CodecResult<Value> {
        let mut held = Vec::new();
        let first = loop {
            match self.next()? {
                token @ Token::Comment(_) => held.push(token),
                token => break token,
            }
        };

        if matches!(&first, Token::PropertyName(name) if name == TYPE_MARKER) {
            let marker = self.next_significant()?;
            match &marker {
                Token::Value(Scalar::String(name)) => match Shape::from_type_name(name) {
                    Some(shape) => return self.decode_converter(shape),
                    None => warn!(type_name = %name, "unknown type marker, reading as a document"),
                },
                other => warn!(found = %other.describe(), "type marker is not a string"),
            }
            held.push(first);
            held.push(marker);
        } else {
            held.push(first);
        }

        self.pushback.extend(held.into_iter().rev());
        self.decode_document().map(Value::Document)
    }

    fn decode_converter(&mut self, shape: Shape) -> CodecResult<Value> {
        let mut fields = FieldSet::new(shape);
        loop {
            match self.next_significant()? {
                Token::PropertyName(name) => match self.next_significant()? {
                    Token::Value(scalar) => {
                        fields.assign(&name, &scalar);
                    }
                    other => {
                        warn!(
                            shape = shape.type_name(),
                            field = %name,
                            "field holds a nested value, skipping"
                        );
                        self.skip_value(other)?;
                    }
                },
                Token::EndObject => return Ok(fields.finish()),
                other => {
                    return Err(CodecError::unexpected(
                        "field name or '}'",
                        other.describe(),
                        self.reader.token_start(),
                    ))
                }
            }
        }
    }

    /// Reads object entries up to and including the closing `}`.
    fn decode_document(&mut self) -> CodecResult<Document> {
        let mut doc = Document::new();
        let mut pending: Option<String> = None;
        let mut last_key: Option<Key> = None;
        loop {
            match self.next()? {
                Token::Comment(text) => match self.placement {
                    CommentPlacement::BeforeKey => {
                        pending = Some(match pending.take() {
                            Some(prev) => format!("{prev}\n{text}"),
                            None => text,
                        });
                    }
                    CommentPlacement::AfterValue => match &last_key {
                        Some(key) => {
                            let joined = match doc.comment(key) {
                                Some(prev) => format!("{prev}\n{text}"),
                                None => text,
                            };
                            doc.set_comment(key, joined);
                        }
                        None => debug!(comment = %text, "comment before first key dropped"),
                    },
                    CommentPlacement::None => {}
                },
                Token::PropertyName(name) => {
                    let mut key = Key::parse(&name);
                    if let Some(comment) = pending.take() {
                        key = key.with_comment(comment);
                    }
                    let value = self.decode_value()?;
                    if self.placement == CommentPlacement::AfterValue {
                        last_key = Some(key.clone());
                    }
                    doc.insert(key, value);
                }
                Token::EndObject => {
                    if let Some(comment) = pending {
                        debug!(%comment, "comment after last key dropped");
                    }
                    return Ok(doc);
                }
                other => {
                    return Err(CodecError::unexpected(
                        "property name or '}'",
                        other.describe(),
                        self.reader.token_start(),
                    ))
                }
            }
        }
    }

    fn decode_value(&mut self) -> CodecResult<Value> {
        let token = self.next_significant()?;
        self.decode_value_from(token)
    }

    fn decode_value_from(&mut self, token: Token) -> CodecResult<Value> {
        match token {
            Token::StartObject => self.decode_object(),
            Token::StartArray => self.decode_list().map(Value::List),
            Token::Value(scalar) => Ok(scalar.into_value()),
            other => Err(CodecError::unexpected(
                "value",
                other.describe(),
                self.reader.token_start(),
            )),
        }
    }

    fn decode_list(&mut self) -> CodecResult<Vec<Value>> {
        let mut items = Vec::new();
        loop {
            match self.next_significant()? {
                Token::EndArray => return Ok(items),
                token => items.push(self.decode_value_from(token)?),
            }
        }
    }

    /// Skips the value that starts with `first`, including any subtree.
    fn skip_value(&mut self, first: Token) -> CodecResult<()> {
        let mut depth: usize = match first {
            Token::StartObject | Token::StartArray => 1,
            _ => return Ok(()),
        };
        while depth > 0 {
            match self.next()? {
                Token::StartObject | Token::StartArray => depth += 1,
                Token::EndObject | Token::EndArray => depth -= 1,
                _ => {}
            }
        }
        Ok(())
    }
}
