//! Pull tokenizer for save text.
//!
//! The grammar is JSON plus `/* */` and `//` comments and the literals
//! `NaN`, `Infinity` and `-Infinity`. Comments may appear between any two
//! tokens and are surfaced as [`Token::Comment`].

use crate::error::{CodecError, CodecResult, Position};
use crate::token::{Scalar, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Object,
    Array,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Nothing read yet.
    Start,
    /// After `{`: a property name or `}`.
    ObjectStart,
    /// After `,` in an object: a property name.
    ObjectAfterComma,
    /// After a property name: `:`.
    Colon,
    /// After `:`: a value.
    PropertyValue,
    /// After `[`: a value or `]`.
    ArrayStart,
    /// After `,` in an array: a value.
    ArrayAfterComma,
    /// After a value inside a container: `,` or the closing bracket.
    PostValue,
    /// The root value is complete.
    Finished,
}

/// Reads tokens from save text one at a time.
pub struct TokenReader<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
    column: usize,
    stack: Vec<Container>,
    state: State,
    max_depth: usize,
    token_start: Position,
}

impl<'a> TokenReader<'a> {
    /// Creates a reader that rejects nesting deeper than `max_depth`.
    #[must_use]
    pub fn new(src: &'a str, max_depth: usize) -> Self {
        // A leading byte-order mark is not content.
        let src = src.strip_prefix('\u{feff}').unwrap_or(src);
        Self {
            src,
            pos: 0,
            line: 1,
            column: 1,
            stack: Vec::new(),
            state: State::Start,
            max_depth,
            token_start: Position { line: 1, column: 1 },
        }
    }

    /// Current position in the input.
    #[must_use]
    pub fn position(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
        }
    }

    /// Position where the most recently returned token started.
    #[must_use]
    pub fn token_start(&self) -> Position {
        self.token_start
    }

    /// Current container nesting depth.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Returns the next token, or `None` at the end of a complete input.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed input, on input that ends inside a
    /// container, and on non-comment content after the root value.
    pub fn next_token(&mut self) -> CodecResult<Option<Token>> {
        loop {
            self.skip_whitespace();
            self.token_start = self.position();
            let Some(c) = self.peek() else {
                return match self.state {
                    State::Start | State::Finished => Ok(None),
                    _ => Err(CodecError::UnexpectedEof {
                        at: self.token_start,
                    }),
                };
            };

            if c == '/' {
                return self.read_comment().map(Some);
            }

            match self.state {
                State::Finished => {
                    return Err(CodecError::TrailingContent {
                        at: self.token_start,
                    })
                }
                State::Colon => {
                    if c != ':' {
                        return Err(self.unexpected_char("':'", c));
                    }
                    self.bump();
                    self.state = State::PropertyValue;
                }
                State::ObjectStart | State::ObjectAfterComma => {
                    if c == '}' && self.state == State::ObjectStart {
                        self.bump();
                        self.close(Container::Object);
                        return Ok(Some(Token::EndObject));
                    }
                    if c != '"' {
                        return Err(self.unexpected_char("property name", c));
                    }
                    let name = self.read_string()?;
                    self.state = State::Colon;
                    return Ok(Some(Token::PropertyName(name)));
                }
                State::PostValue => {
                    let top = self.stack.last().copied();
                    match (c, top) {
                        (',', Some(Container::Object)) => {
                            self.bump();
                            self.state = State::ObjectAfterComma;
                        }
                        (',', Some(Container::Array)) => {
                            self.bump();
                            self.state = State::ArrayAfterComma;
                        }
                        ('}', Some(Container::Object)) => {
                            self.bump();
                            self.close(Container::Object);
                            return Ok(Some(Token::EndObject));
                        }
                        (']', Some(Container::Array)) => {
                            self.bump();
                            self.close(Container::Array);
                            return Ok(Some(Token::EndArray));
                        }
                        _ => {
                            let expected = match top {
                                Some(Container::Array) => "',' or ']'",
                                _ => "',' or '}'",
                            };
                            return Err(self.unexpected_char(expected, c));
                        }
                    }
                }
                State::ArrayStart if c == ']' => {
                    self.bump();
                    self.close(Container::Array);
                    return Ok(Some(Token::EndArray));
                }
                State::Start
                | State::PropertyValue
                | State::ArrayStart
                | State::ArrayAfterComma => {
                    return self.read_value(c).map(Some);
                }
            }
        }
    }

    fn read_value(&mut self, c: char) -> CodecResult<Token> {
        match c {
            '{' => {
                self.bump();
                self.open(Container::Object)?;
                self.state = State::ObjectStart;
                Ok(Token::StartObject)
            }
            '[' => {
                self.bump();
                self.open(Container::Array)?;
                self.state = State::ArrayStart;
                Ok(Token::StartArray)
            }
            '"' => {
                let s = self.read_string()?;
                self.after_value();
                Ok(Token::Value(Scalar::String(s)))
            }
            '-' | '0'..='9' => {
                let literal = self.read_number()?;
                self.after_value();
                Ok(Token::Value(Scalar::Number(literal)))
            }
            c if c.is_ascii_alphabetic() => {
                let start = self.token_start;
                let word = self.read_word();
                let scalar = match word {
                    "true" => Scalar::Bool(true),
                    "false" => Scalar::Bool(false),
                    "null" => Scalar::Null,
                    "NaN" | "Infinity" => Scalar::Number(word.to_string()),
                    other => return Err(CodecError::unexpected("value", format!("'{other}'"), start)),
                };
                self.after_value();
                Ok(Token::Value(scalar))
            }
            other => Err(self.unexpected_char("value", other)),
        }
    }

    fn open(&mut self, container: Container) -> CodecResult<()> {
        if self.stack.len() >= self.max_depth {
            return Err(CodecError::DepthLimitExceeded {
                limit: self.max_depth,
            });
        }
        self.stack.push(container);
        Ok(())
    }

    fn close(&mut self, container: Container) {
        let popped = self.stack.pop();
        debug_assert_eq!(popped, Some(container));
        self.after_value();
    }

    fn after_value(&mut self) {
        self.state = if self.stack.is_empty() {
            State::Finished
        } else {
            State::PostValue
        };
    }

    fn read_comment(&mut self) -> CodecResult<Token> {
        let start = self.token_start;
        self.bump();
        match self.peek() {
            Some('*') => {
                self.bump();
                let src = self.src;
                let body_start = self.pos;
                loop {
                    match self.peek() {
                        None => return Err(CodecError::UnterminatedComment { at: start }),
                        Some('*') if self.src[self.pos..].starts_with("*/") => {
                            let body = &src[body_start..self.pos];
                            self.bump();
                            self.bump();
                            return Ok(Token::Comment(body.trim().to_string()));
                        }
                        Some(_) => {
                            self.bump();
                        }
                    }
                }
            }
            Some('/') => {
                self.bump();
                let body_start = self.pos;
                while let Some(c) = self.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.bump();
                }
                Ok(Token::Comment(self.src[body_start..self.pos].trim().to_string()))
            }
            Some(c) => Err(CodecError::unexpected("'*' or '/'", describe_char(c), self.position())),
            None => Err(CodecError::UnexpectedEof {
                at: self.position(),
            }),
        }
    }

    fn read_string(&mut self) -> CodecResult<String> {
        // Opening quote.
        self.bump();
        let mut out = String::new();
        loop {
            let at = self.position();
            let Some(c) = self.bump() else {
                return Err(CodecError::UnexpectedEof { at });
            };
            match c {
                '"' => return Ok(out),
                '\\' => self.read_escape(&mut out, at)?,
                c if c < '\u{20}' => {
                    return Err(CodecError::unexpected("string character", describe_char(c), at));
                }
                c => out.push(c),
            }
        }
    }

    fn read_escape(&mut self, out: &mut String, at: Position) -> CodecResult<()> {
        let Some(c) = self.bump() else {
            return Err(CodecError::UnexpectedEof {
                at: self.position(),
            });
        };
        match c {
            '"' => out.push('"'),
            '\\' => out.push('\\'),
            '/' => out.push('/'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'u' => {
                let first = self.read_hex4(at)?;
                let ch = if (0xD800..0xDC00).contains(&first) {
                    if !self.src[self.pos..].starts_with("\\u") {
                        return Err(CodecError::invalid_escape("unpaired high surrogate", at));
                    }
                    self.bump();
                    self.bump();
                    let second = self.read_hex4(at)?;
                    if !(0xDC00..0xE000).contains(&second) {
                        return Err(CodecError::invalid_escape("invalid low surrogate", at));
                    }
                    let code = 0x10000 + ((first - 0xD800) << 10) + (second - 0xDC00);
                    char::from_u32(code)
                } else {
                    char::from_u32(first)
                };
                let ch = ch.ok_or_else(|| CodecError::invalid_escape("unpaired low surrogate", at))?;
                out.push(ch);
            }
            other => {
                return Err(CodecError::invalid_escape(format!("unknown escape '\\{other}'"), at));
            }
        }
        Ok(())
    }

    fn read_hex4(&mut self, at: Position) -> CodecResult<u32> {
        let digits = self.src.get(self.pos..self.pos + 4).unwrap_or("");
        if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(CodecError::invalid_escape("expected four hex digits after \\u", at));
        }
        let code = u32::from_str_radix(digits, 16)
            .map_err(|_| CodecError::invalid_escape("expected four hex digits after \\u", at))?;
        for _ in 0..4 {
            self.bump();
        }
        Ok(code)
    }

    fn read_number(&mut self) -> CodecResult<String> {
        let start_pos = self.pos;
        let at = self.token_start;

        if self.peek() == Some('-') {
            self.bump();
            if self.peek() == Some('I') {
                let word = self.read_word();
                if word == "Infinity" {
                    return Ok("-Infinity".to_string());
                }
                return Err(CodecError::invalid_number(format!("-{word}"), at));
            }
        }

        let int_start = self.pos;
        self.eat_digits();
        let int_part = &self.src[int_start..self.pos];
        let mut valid = !int_part.is_empty() && !(int_part.len() > 1 && int_part.starts_with('0'));

        if self.peek() == Some('.') {
            self.bump();
            valid &= self.eat_digits() > 0;
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            self.bump();
            if matches!(self.peek(), Some('+' | '-')) {
                self.bump();
            }
            valid &= self.eat_digits() > 0;
        }

        // The literal must end at a delimiter.
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' {
                valid = false;
                self.bump();
            } else {
                break;
            }
        }

        let literal = &self.src[start_pos..self.pos];
        if valid {
            Ok(literal.to_string())
        } else {
            Err(CodecError::invalid_number(literal, at))
        }
    }

    fn eat_digits(&mut self) -> usize {
        let mut n = 0;
        while matches!(self.peek(), Some('0'..='9')) {
            self.bump();
            n += 1;
        }
        n
    }

    fn read_word(&mut self) -> &'a str {
        let src = self.src;
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric()) {
            self.bump();
        }
        &src[start..self.pos]
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn unexpected_char(&self, expected: &str, c: char) -> CodecError {
        CodecError::unexpected(expected, describe_char(c), self.token_start)
    }
}

fn describe_char(c: char) -> String {
    if c.is_control() {
        format!("character U+{:04X}", u32::from(c))
    } else {
        format!("'{c}'")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(src: &str) -> CodecResult<Vec<Token>> {
        let mut reader = TokenReader::new(src, 16);
        let mut out = Vec::new();
        while let Some(token) = reader.next_token()? {
            out.push(token);
        }
        Ok(out)
    }

    fn num(s: &str) -> Token {
        Token::Value(Scalar::Number(s.to_string()))
    }

    #[test]
    fn reads_simple_object() {
        let toks = tokens(r#"{"a": 1, "b": [true, null, "x"]}"#).unwrap();
        assert_eq!(
            toks,
            vec![
                Token::StartObject,
                Token::PropertyName("a".into()),
                num("1"),
                Token::PropertyName("b".into()),
                Token::StartArray,
                Token::Value(Scalar::Bool(true)),
                Token::Value(Scalar::Null),
                Token::Value(Scalar::String("x".into())),
                Token::EndArray,
                Token::EndObject,
            ]
        );
    }

    #[test]
    fn reads_comments_everywhere() {
        let src = "/* head */ { // line\n \"a\" /* k */ : /* v */ 1 /* after */ }";
        let toks = tokens(src).unwrap();
        assert_eq!(
            toks,
            vec![
                Token::Comment("head".into()),
                Token::StartObject,
                Token::Comment("line".into()),
                Token::PropertyName("a".into()),
                Token::Comment("k".into()),
                Token::Comment("v".into()),
                num("1"),
                Token::Comment("after".into()),
                Token::EndObject,
            ]
        );
    }

    #[test]
    fn reads_non_finite_literals() {
        let toks = tokens("[NaN, Infinity, -Infinity, -0.5e-3]").unwrap();
        assert_eq!(
            &toks[1..5],
            &[num("NaN"), num("Infinity"), num("-Infinity"), num("-0.5e-3")]
        );
    }

    #[test]
    fn decodes_escapes_and_surrogates() {
        let toks = tokens(r#"["a\"b\\c\/\n\té😀"]"#).unwrap();
        assert_eq!(toks[1], Token::Value(Scalar::String("a\"b\\c/\n\té😀".into())));
    }

    #[test]
    fn rejects_bad_numbers() {
        for bad in ["[01]", "[1.]", "[.5]", "[1e]", "[12abc]", "[-]"] {
            let err = tokens(bad).unwrap_err();
            assert!(
                matches!(err, CodecError::InvalidNumber { .. } | CodecError::UnexpectedToken { .. }),
                "{bad}: {err:?}"
            );
        }
    }

    #[test]
    fn rejects_bad_escapes() {
        assert!(matches!(
            tokens(r#"["\q"]"#).unwrap_err(),
            CodecError::InvalidEscape { .. }
        ));
        assert!(matches!(
            tokens(r#"["\ud83d"]"#).unwrap_err(),
            CodecError::InvalidEscape { .. }
        ));
    }

    #[test]
    fn rejects_trailing_content() {
        let err = tokens("{} {}").unwrap_err();
        assert!(matches!(err, CodecError::TrailingContent { .. }));
        assert!(tokens("{} // fine\n/* also fine */").is_ok());
    }

    #[test]
    fn rejects_unterminated_input() {
        assert!(matches!(
            tokens(r#"{"a": 1"#).unwrap_err(),
            CodecError::UnexpectedEof { .. }
        ));
        assert!(matches!(
            tokens("{ /* open").unwrap_err(),
            CodecError::UnterminatedComment { .. }
        ));
    }

    #[test]
    fn rejects_trailing_commas() {
        assert!(tokens(r#"{"a": 1,}"#).is_err());
        assert!(tokens("[1,]").is_err());
    }

    #[test]
    fn enforces_depth_limit() {
        let deep = "[".repeat(17);
        let err = tokens(&deep).unwrap_err();
        assert_eq!(err, CodecError::DepthLimitExceeded { limit: 16 });
    }

    #[test]
    fn reports_positions() {
        let err = tokens("{\n  \"a\" 1\n}").unwrap_err();
        assert_eq!(err.position(), Some(Position { line: 2, column: 7 }));
    }

    #[test]
    fn skips_byte_order_mark() {
        assert_eq!(tokens("\u{feff}{}").unwrap(), vec![Token::StartObject, Token::EndObject]);
    }
}
