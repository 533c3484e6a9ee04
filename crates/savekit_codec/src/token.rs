//! Token types shared by the reader and writer.

use crate::value::Value;

/// Property name reserved for converter type markers.
pub const TYPE_MARKER: &str = "$type";

/// A scalar literal as it appeared in the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scalar {
    /// `null`
    Null,
    /// `true` or `false`
    Bool(bool),
    /// A number literal, kept verbatim so it can be parsed at the width
    /// the consumer needs. Includes `NaN`, `Infinity` and `-Infinity`.
    Number(String),
    /// A string literal with escapes resolved.
    String(String),
}

impl Scalar {
    /// Returns true if the number literal has a fraction, an exponent, or
    /// is one of the non-finite literals.
    #[must_use]
    pub fn is_float_literal(literal: &str) -> bool {
        literal.contains(['.', 'e', 'E', 'N', 'I'])
    }

    /// Converts to a document value.
    ///
    /// Integer literals become [`Value::Int`] (or [`Value::Float`] if they
    /// overflow `i64`); every other number literal becomes [`Value::Float`].
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Scalar::Null => Value::Null,
            Scalar::Bool(b) => Value::Bool(b),
            Scalar::String(s) => Value::String(s),
            Scalar::Number(literal) => number_value(&literal),
        }
    }

    /// Parses a number literal as `f32`.
    #[must_use]
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Scalar::Number(literal) => literal.parse().ok(),
            _ => None,
        }
    }

    /// Parses a number literal as `i32`, accepting integral float literals.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn as_i32(&self) -> Option<i32> {
        let Scalar::Number(literal) = self else {
            return None;
        };
        if let Ok(n) = literal.parse::<i32>() {
            return Some(n);
        }
        let f: f64 = literal.parse().ok()?;
        let in_range = f >= f64::from(i32::MIN) && f <= f64::from(i32::MAX);
        (f.fract() == 0.0 && in_range).then_some(f as i32)
    }
}

fn number_value(literal: &str) -> Value {
    if !Scalar::is_float_literal(literal) {
        if let Ok(n) = literal.parse::<i64>() {
            return Value::Int(n);
        }
    }
    Value::Float(literal.parse().unwrap_or(f64::NAN))
}

/// A token in the save text stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `{`
    StartObject,
    /// `}`
    EndObject,
    /// `[`
    StartArray,
    /// `]`
    EndArray,
    /// A property name (the colon is consumed with it).
    PropertyName(String),
    /// A scalar value.
    Value(Scalar),
    /// Comment text with delimiters and surrounding whitespace removed.
    Comment(String),
}

impl Token {
    /// Short description for error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Token::StartObject => "'{'".to_string(),
            Token::EndObject => "'}'".to_string(),
            Token::StartArray => "'['".to_string(),
            Token::EndArray => "']'".to_string(),
            Token::PropertyName(name) => format!("property name \"{name}\""),
            Token::Value(Scalar::Null) => "null".to_string(),
            Token::Value(Scalar::Bool(b)) => b.to_string(),
            Token::Value(Scalar::Number(n)) => format!("number {n}"),
            Token::Value(Scalar::String(_)) => "string".to_string(),
            Token::Comment(_) => "comment".to_string(),
        }
    }
}
