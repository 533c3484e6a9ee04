//! Streaming writer for save text.

use crate::error::{CodecError, CodecResult};
use crate::settings::Formatting;
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Object,
    Array,
}

#[derive(Debug)]
struct Frame {
    container: Container,
    has_items: bool,
    /// The separator before the next item was already written, because a
    /// comment line sits between the two items.
    separated: bool,
}

/// Writes tokens as text, handling separators, indentation and escaping.
///
/// Commas are written lazily, just before the next item, so a trailing
/// comment written after a value stays on the value's line.
pub struct TokenWriter {
    out: String,
    formatting: Formatting,
    indent: usize,
    stack: Vec<Frame>,
    awaiting_value: bool,
    root_written: bool,
}

impl TokenWriter {
    /// Creates a writer.
    #[must_use]
    pub fn new(formatting: Formatting, indent: usize) -> Self {
        Self {
            out: String::new(),
            formatting,
            indent,
            stack: Vec::new(),
            awaiting_value: false,
            root_written: false,
        }
    }

    fn indented(&self) -> bool {
        self.formatting == Formatting::Indented
    }

    fn newline(&mut self, depth: usize) {
        if self.indented() {
            self.out.push('\n');
            for _ in 0..depth * self.indent {
                self.out.push(' ');
            }
        }
    }

    /// Starts a new item in the current container: separator, then line break.
    fn begin_item(&mut self) {
        let depth = self.stack.len();
        let Some(frame) = self.stack.last_mut() else {
            return;
        };
        if frame.has_items && !frame.separated {
            self.out.push(',');
        }
        frame.separated = false;
        self.newline(depth);
    }

    fn mark_item(&mut self) {
        if let Some(frame) = self.stack.last_mut() {
            frame.has_items = true;
        }
    }

    /// Prepares for a value token.
    fn begin_value(&mut self) -> CodecResult<()> {
        if self.awaiting_value {
            self.awaiting_value = false;
            return Ok(());
        }
        match self.stack.last().map(|f| f.container) {
            Some(Container::Array) => {
                self.begin_item();
                self.mark_item();
                Ok(())
            }
            Some(Container::Object) => Err(CodecError::invalid_writer_state(
                "value written in an object without a property name",
            )),
            None if self.root_written => Err(CodecError::invalid_writer_state(
                "more than one root value",
            )),
            None => {
                self.root_written = true;
                Ok(())
            }
        }
    }

    /// Writes a comment on its own line at the current depth.
    ///
    /// Inside a container the separator for the preceding item is emitted
    /// first, so the comment belongs to whatever follows it.
    pub fn write_comment_line(&mut self, text: &str) -> CodecResult<()> {
        if self.awaiting_value {
            return Err(CodecError::invalid_writer_state(
                "comment line between a property name and its value",
            ));
        }
        let depth = self.stack.len();
        if let Some(frame) = self.stack.last_mut() {
            if frame.has_items && !frame.separated {
                self.out.push(',');
            }
            frame.separated = true;
            self.newline(depth);
        } else if self.root_written {
            self.newline(0);
        }
        self.push_comment(text);
        if self.stack.is_empty() && !self.root_written {
            // Header comment: the root object starts on the next line.
            if self.indented() {
                self.out.push('\n');
            }
        }
        Ok(())
    }

    /// Writes a comment directly after the value just written.
    pub fn write_trailing_comment(&mut self, text: &str) {
        if self.indented() {
            self.out.push(' ');
        }
        self.push_comment(text);
    }

    fn push_comment(&mut self, text: &str) {
        // The comment must not terminate itself early.
        let text = text.replace("*/", "* /");
        if self.indented() {
            let _ = write!(self.out, "/* {text} */");
        } else {
            let _ = write!(self.out, "/*{text}*/");
        }
    }

    /// Opens an object.
    pub fn write_start_object(&mut self) -> CodecResult<()> {
        self.begin_value()?;
        self.out.push('{');
        self.stack.push(Frame {
            container: Container::Object,
            has_items: false,
            separated: false,
        });
        Ok(())
    }

    /// Closes the innermost object.
    pub fn write_end_object(&mut self) -> CodecResult<()> {
        self.close(Container::Object, '}')
    }

    /// Opens an array.
    pub fn write_start_array(&mut self) -> CodecResult<()> {
        self.begin_value()?;
        self.out.push('[');
        self.stack.push(Frame {
            container: Container::Array,
            has_items: false,
            separated: false,
        });
        Ok(())
    }

    /// Closes the innermost array.
    pub fn write_end_array(&mut self) -> CodecResult<()> {
        self.close(Container::Array, ']')
    }

    fn close(&mut self, container: Container, bracket: char) -> CodecResult<()> {
        if self.awaiting_value {
            return Err(CodecError::invalid_writer_state(
                "container closed after a property name",
            ));
        }
        let frame = match self.stack.pop() {
            Some(frame) if frame.container == container => frame,
            _ => {
                return Err(CodecError::invalid_writer_state(format!(
                    "unbalanced '{bracket}'"
                )))
            }
        };
        if frame.has_items || frame.separated {
            self.newline(self.stack.len());
        }
        self.out.push(bracket);
        Ok(())
    }

    /// Writes a property name and the following colon.
    pub fn write_property_name(&mut self, name: &str) -> CodecResult<()> {
        if self.awaiting_value || self.stack.last().map(|f| f.container) != Some(Container::Object) {
            return Err(CodecError::invalid_writer_state(
                "property name outside of an object",
            ));
        }
        self.begin_item();
        self.mark_item();
        push_quoted(&mut self.out, name);
        self.out.push(':');
        if self.indented() {
            self.out.push(' ');
        }
        self.awaiting_value = true;
        Ok(())
    }

    /// Writes `null`.
    pub fn write_null(&mut self) -> CodecResult<()> {
        self.begin_value()?;
        self.out.push_str("null");
        Ok(())
    }

    /// Writes `true` or `false`.
    pub fn write_bool(&mut self, value: bool) -> CodecResult<()> {
        self.begin_value()?;
        self.out.push_str(if value { "true" } else { "false" });
        Ok(())
    }

    /// Writes an integer.
    pub fn write_int(&mut self, value: i64) -> CodecResult<()> {
        self.begin_value()?;
        let _ = write!(self.out, "{value}");
        Ok(())
    }

    /// Writes a double. The literal always reads back as a float.
    pub fn write_f64(&mut self, value: f64) -> CodecResult<()> {
        self.begin_value()?;
        if value.is_nan() {
            self.out.push_str("NaN");
        } else if value.is_infinite() {
            self.out
                .push_str(if value > 0.0 { "Infinity" } else { "-Infinity" });
        } else {
            let _ = write!(self.out, "{value:?}");
        }
        Ok(())
    }

    /// Writes a single-precision float using its shortest representation.
    pub fn write_f32(&mut self, value: f32) -> CodecResult<()> {
        self.begin_value()?;
        if value.is_nan() {
            self.out.push_str("NaN");
        } else if value.is_infinite() {
            self.out
                .push_str(if value > 0.0 { "Infinity" } else { "-Infinity" });
        } else {
            let _ = write!(self.out, "{value:?}");
        }
        Ok(())
    }

    /// Writes a string literal.
    pub fn write_string(&mut self, value: &str) -> CodecResult<()> {
        self.begin_value()?;
        push_quoted(&mut self.out, value);
        Ok(())
    }

    /// Returns the finished text.
    ///
    /// # Errors
    ///
    /// Returns an error if a container is still open.
    pub fn finish(self) -> CodecResult<String> {
        if !self.stack.is_empty() || self.awaiting_value {
            return Err(CodecError::invalid_writer_state("unclosed container"));
        }
        Ok(self.out)
    }
}

fn push_quoted(out: &mut String, s: &str) {
    out.reserve(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            c if c < '\u{20}' => {
                let _ = write!(out, "\\u{:04x}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}
