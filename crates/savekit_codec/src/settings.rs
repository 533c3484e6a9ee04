//! Codec settings and variant selection.

/// Default nesting limit for objects and arrays.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Whitespace style of the written text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Formatting {
    /// No insignificant whitespace.
    Compact,
    /// One entry per line, nested levels indented.
    #[default]
    Indented,
}

/// Where key comments are written, and where the reader looks for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CommentPlacement {
    /// Comments are neither written nor attached on read.
    None,
    /// A comment precedes the property it belongs to.
    #[default]
    BeforeKey,
    /// A comment follows the value it belongs to.
    AfterValue,
}

/// Whether converter values carry a `"$type"` marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TypeNameHandling {
    /// No markers. Converter values are read back as nested documents and
    /// converted on typed access.
    #[default]
    None,
    /// Converter values are written with a leading `"$type"` property.
    Auto,
}

/// The six formatting and comment-placement combinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodecVariant {
    /// Compact, no comments.
    Compact,
    /// Compact, comments before keys.
    CompactCommentsBefore,
    /// Compact, comments after values.
    CompactCommentsAfter,
    /// Indented, no comments.
    Indented,
    /// Indented, comments before keys.
    IndentedCommentsBefore,
    /// Indented, comments after values.
    IndentedCommentsAfter,
}

impl CodecVariant {
    /// Every variant.
    pub const ALL: [CodecVariant; 6] = [
        CodecVariant::Compact,
        CodecVariant::CompactCommentsBefore,
        CodecVariant::CompactCommentsAfter,
        CodecVariant::Indented,
        CodecVariant::IndentedCommentsBefore,
        CodecVariant::IndentedCommentsAfter,
    ];

    /// Selects the variant for a formatting and comment placement.
    #[must_use]
    pub const fn select(formatting: Formatting, comments: CommentPlacement) -> Self {
        match (formatting, comments) {
            (Formatting::Compact, CommentPlacement::None) => CodecVariant::Compact,
            (Formatting::Compact, CommentPlacement::BeforeKey) => {
                CodecVariant::CompactCommentsBefore
            }
            (Formatting::Compact, CommentPlacement::AfterValue) => {
                CodecVariant::CompactCommentsAfter
            }
            (Formatting::Indented, CommentPlacement::None) => CodecVariant::Indented,
            (Formatting::Indented, CommentPlacement::BeforeKey) => {
                CodecVariant::IndentedCommentsBefore
            }
            (Formatting::Indented, CommentPlacement::AfterValue) => {
                CodecVariant::IndentedCommentsAfter
            }
        }
    }

    /// The formatting axis of this variant.
    #[must_use]
    pub const fn formatting(self) -> Formatting {
        match self {
            CodecVariant::Compact
            | CodecVariant::CompactCommentsBefore
            | CodecVariant::CompactCommentsAfter => Formatting::Compact,
            CodecVariant::Indented
            | CodecVariant::IndentedCommentsBefore
            | CodecVariant::IndentedCommentsAfter => Formatting::Indented,
        }
    }

    /// The comment placement axis of this variant.
    #[must_use]
    pub const fn comments(self) -> CommentPlacement {
        match self {
            CodecVariant::Compact | CodecVariant::Indented => CommentPlacement::None,
            CodecVariant::CompactCommentsBefore | CodecVariant::IndentedCommentsBefore => {
                CommentPlacement::BeforeKey
            }
            CodecVariant::CompactCommentsAfter | CodecVariant::IndentedCommentsAfter => {
                CommentPlacement::AfterValue
            }
        }
    }

    /// Default settings using this variant.
    #[must_use]
    pub fn settings(self) -> CodecSettings {
        CodecSettings::default()
            .formatting(self.formatting())
            .comments(self.comments())
    }
}

/// Configuration for writing and reading save text.
///
/// The same comment placement must be used to read text as was used to
/// write it; a mismatch does not fail but attaches comments to the wrong
/// keys or drops them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecSettings {
    /// Whitespace style.
    pub formatting: Formatting,
    /// Comment placement.
    pub comments: CommentPlacement,
    /// Type marker handling for converter values.
    pub type_names: TypeNameHandling,
    /// Spaces per indentation level in indented mode.
    pub indent: usize,
    /// Comment written once before the root object.
    pub header: Option<String>,
    /// Maximum nesting depth accepted by the reader.
    pub max_depth: usize,
}

impl Default for CodecSettings {
    fn default() -> Self {
        Self {
            formatting: Formatting::Indented,
            comments: CommentPlacement::BeforeKey,
            type_names: TypeNameHandling::None,
            indent: 2,
            header: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl CodecSettings {
    /// Creates settings with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the active variant.
    #[must_use]
    pub const fn variant(&self) -> CodecVariant {
        CodecVariant::select(self.formatting, self.comments)
    }

    /// Sets the formatting.
    #[must_use]
    pub fn formatting(mut self, formatting: Formatting) -> Self {
        self.formatting = formatting;
        self
    }

    /// Sets the comment placement.
    #[must_use]
    pub fn comments(mut self, comments: CommentPlacement) -> Self {
        self.comments = comments;
        self
    }

    /// Sets type marker handling.
    #[must_use]
    pub fn type_names(mut self, type_names: TypeNameHandling) -> Self {
        self.type_names = type_names;
        self
    }

    /// Sets the indentation width.
    #[must_use]
    pub fn indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Sets the header comment.
    #[must_use]
    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    /// Sets the reader's nesting limit.
    #[must_use]
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
