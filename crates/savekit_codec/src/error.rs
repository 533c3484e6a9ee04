//! Error types for the codec crate.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// A position in the source text, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    /// Line number (1-based).
    pub line: usize,
    /// Column number in characters (1-based).
    pub column: usize,
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Errors that can occur while reading or writing save text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// A token appeared where the grammar does not allow it.
    #[error("unexpected {found} at {at}, expected {expected}")]
    UnexpectedToken {
        /// What the reader was looking for.
        expected: String,
        /// What it found instead.
        found: String,
        /// Where it was found.
        at: Position,
    },

    /// Input ended in the middle of a value.
    #[error("unexpected end of input at {at}")]
    UnexpectedEof {
        /// Where the input ended.
        at: Position,
    },

    /// A number literal could not be parsed.
    #[error("invalid number '{literal}' at {at}")]
    InvalidNumber {
        /// The offending literal.
        literal: String,
        /// Where it starts.
        at: Position,
    },

    /// A string literal contained a bad escape sequence.
    #[error("invalid escape sequence at {at}: {message}")]
    InvalidEscape {
        /// Description of the problem.
        message: String,
        /// Where the escape starts.
        at: Position,
    },

    /// A comment was opened but never closed.
    #[error("unterminated comment starting at {at}")]
    UnterminatedComment {
        /// Where the comment starts.
        at: Position,
    },

    /// Non-comment content follows the root object.
    #[error("trailing content after root object at {at}")]
    TrailingContent {
        /// Where the trailing content starts.
        at: Position,
    },

    /// Objects or arrays are nested deeper than the reader allows.
    #[error("nesting depth exceeds limit of {limit}")]
    DepthLimitExceeded {
        /// The configured limit.
        limit: usize,
    },

    /// The writer was driven into an invalid state.
    #[error("invalid writer state: {message}")]
    InvalidWriterState {
        /// Description of the misuse.
        message: String,
    },
}

impl CodecError {
    /// Create an unexpected token error.
    pub fn unexpected(expected: impl Into<String>, found: impl Into<String>, at: Position) -> Self {
        Self::UnexpectedToken {
            expected: expected.into(),
            found: found.into(),
            at,
        }
    }

    /// Create an invalid number error.
    pub fn invalid_number(literal: impl Into<String>, at: Position) -> Self {
        Self::InvalidNumber {
            literal: literal.into(),
            at,
        }
    }

    /// Create an invalid escape error.
    pub fn invalid_escape(message: impl Into<String>, at: Position) -> Self {
        Self::InvalidEscape {
            message: message.into(),
            at,
        }
    }

    /// Create an invalid writer state error.
    pub fn invalid_writer_state(message: impl Into<String>) -> Self {
        Self::InvalidWriterState {
            message: message.into(),
        }
    }

    /// Returns the source position of the error, if it has one.
    #[must_use]
    pub fn position(&self) -> Option<Position> {
        match self {
            Self::UnexpectedToken { at, .. }
            | Self::UnexpectedEof { at }
            | Self::InvalidNumber { at, .. }
            | Self::InvalidEscape { at, .. }
            | Self::UnterminatedComment { at }
            | Self::TrailingContent { at } => Some(*at),
            Self::DepthLimitExceeded { .. } | Self::InvalidWriterState { .. } => None,
        }
    }
}
