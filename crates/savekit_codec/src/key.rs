//! Document keys.

use crate::id::{CompactId, HEX_LEN};
use std::fmt;
use std::hash::{Hash, Hasher};

/// The identity part of a key.
#[derive(Debug, Clone)]
enum Ident {
    Compact(CompactId),
    Text(String),
}

/// Identifier addressing a value inside a [`Document`](crate::Document).
///
/// A key is either a [`CompactId`] or an arbitrary string, and may carry a
/// human-readable comment that is written next to the entry in save text.
///
/// # Equality
///
/// Keys compare by their display form:
/// - two string keys are equal iff the strings match,
/// - two compact keys are equal iff the ids match,
/// - a string key equals a compact key iff the string is exactly the
///   canonical 32-char lowercase hex rendering of the id.
///
/// The comment never takes part in equality or hashing.
#[derive(Clone)]
pub struct Key {
    ident: Ident,
    comment: Option<String>,
}

impl Key {
    /// Creates a key from a compact id.
    #[must_use]
    pub fn from_compact(id: CompactId) -> Self {
        Self {
            ident: Ident::Compact(id),
            comment: None,
        }
    }

    /// Creates a string key.
    ///
    /// The string is kept as-is even if it looks like a compact id; use
    /// [`Key::parse`] to request compact-id decoding.
    #[must_use]
    pub fn from_string(s: impl Into<String>) -> Self {
        Self {
            ident: Ident::Text(s.into()),
            comment: None,
        }
    }

    /// Creates a key with a fresh random compact id.
    #[must_use]
    pub fn random() -> Self {
        Self::from_compact(CompactId::new())
    }

    /// Parses a key as written in save text.
    ///
    /// A canonical 32-char lowercase hex string becomes a compact key,
    /// anything else a string key. Uppercase or mixed-case hex of the same
    /// length stays a string key: only the exact text a compact key
    /// renders to decodes back into one, so re-encoding never changes a key.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        if s.len() == HEX_LEN {
            if let Some(id) = CompactId::parse_canonical(s) {
                return Self::from_compact(id);
            }
        }
        Self::from_string(s)
    }

    /// Returns a copy of this key with the comment replaced.
    ///
    /// Empty or whitespace-only comments clear the comment. Surrounding
    /// whitespace is trimmed and `*/` is rewritten as `* /` so the comment
    /// can always be embedded in a block comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl AsRef<str>) -> Self {
        self.comment = normalize_comment(comment.as_ref());
        self
    }

    /// Returns a copy of this key without a comment.
    #[must_use]
    pub fn without_comment(mut self) -> Self {
        self.comment = None;
        self
    }

    /// Returns the comment, if any.
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Returns the compact id if this is a compact key.
    #[must_use]
    pub fn compact_id(&self) -> Option<CompactId> {
        match &self.ident {
            Ident::Compact(id) => Some(*id),
            Ident::Text(_) => None,
        }
    }

    /// Returns the string if this is a string key.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match &self.ident {
            Ident::Text(s) => Some(s),
            Ident::Compact(_) => None,
        }
    }

    /// Returns true if the identity is the empty id or an empty string.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match &self.ident {
            Ident::Compact(id) => id.is_nil(),
            Ident::Text(s) => s.is_empty(),
        }
    }

    /// Returns the string form, or the compact id as 32-char hex.
    #[must_use]
    pub fn to_display_string(&self) -> String {
        self.with_display(str::to_string)
    }

    /// Runs `f` over the display form without allocating for compact keys.
    pub(crate) fn with_display<R>(&self, f: impl FnOnce(&str) -> R) -> R {
        match &self.ident {
            Ident::Text(s) => f(s),
            Ident::Compact(id) => {
                let mut buf = [0u8; HEX_LEN];
                f(id.encode_hex(&mut buf))
            }
        }
    }
}

fn normalize_comment(comment: &str) -> Option<String> {
    let trimmed = comment.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.replace("*/", "* /"))
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        match (&self.ident, &other.ident) {
            (Ident::Compact(a), Ident::Compact(b)) => a == b,
            (Ident::Text(a), Ident::Text(b)) => a == b,
            (Ident::Compact(id), Ident::Text(s)) | (Ident::Text(s), Ident::Compact(id)) => {
                let mut buf = [0u8; HEX_LEN];
                id.encode_hex(&mut buf) == s.as_str()
            }
        }
    }
}

impl Eq for Key {}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.with_display(|s| s.hash(state));
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Key");
        match &self.ident {
            Ident::Compact(id) => s.field("compact", id),
            Ident::Text(text) => s.field("string", text),
        };
        if let Some(comment) = &self.comment {
            s.field("comment", comment);
        }
        s.finish()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with_display(|s| f.write_str(s))
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Self::from_string(s)
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Self::from_string(s)
    }
}

impl From<CompactId> for Key {
    fn from(id: CompactId) -> Self {
        Self::from_compact(id)
    }
}

impl From<&Key> for Key {
    fn from(key: &Key) -> Self {
        key.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(key: &Key) -> u64 {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn string_keys_compare_by_string() {
        assert_eq!(Key::from_string("score"), Key::from_string("score"));
        assert_ne!(Key::from_string("score"), Key::from_string("Score"));
    }

    #[test]
    fn compact_keys_compare_by_id() {
        let id = CompactId::new();
        assert_eq!(Key::from_compact(id), Key::from_compact(id));
        assert_ne!(Key::from_compact(id), Key::from_compact(CompactId::new()));
    }

    #[test]
    fn hex_looking_strings_differ_from_each_other() {
        let lower = Key::from_string("ab".repeat(16));
        let upper = Key::from_string("AB".repeat(16));
        assert_ne!(lower, upper);
    }

    #[test]
    fn canonical_hex_string_equals_compact_key() {
        let id = CompactId::from_bytes([0x5a; 16]);
        let compact = Key::from_compact(id);
        let text = Key::from_string(id.to_hex());
        assert_eq!(compact, text);
        assert_eq!(text, compact);
        assert_eq!(hash_of(&compact), hash_of(&text));
    }

    #[test]
    fn uppercase_hex_string_differs_from_compact_key() {
        let id = CompactId::from_bytes([0x5a; 16]);
        let text = Key::from_string(id.to_hex().to_uppercase());
        assert_ne!(Key::from_compact(id), text);
    }

    #[test]
    fn comment_does_not_affect_equality_or_hash() {
        let plain = Key::from_string("hp");
        let commented = Key::from_string("hp").with_comment("player health");
        assert_eq!(plain, commented);
        assert_eq!(hash_of(&plain), hash_of(&commented));
    }

    #[test]
    fn blank_comment_clears() {
        let key = Key::from_string("hp").with_comment("note").with_comment("   ");
        assert_eq!(key.comment(), None);
    }

    #[test]
    fn comment_is_trimmed_and_sanitized() {
        let key = Key::from_string("hp").with_comment("  a */ b  ");
        assert_eq!(key.comment(), Some("a * / b"));
    }

    #[test]
    fn without_comment_keeps_identity() {
        let id = CompactId::from_bytes([7; 16]);
        let key = Key::from_compact(id).with_comment("slot owner");
        let plain = key.clone().without_comment();
        assert_eq!(plain.comment(), None);
        assert_eq!(plain.compact_id(), Some(id));
        assert_eq!(plain, key);
        assert_eq!(key.comment(), Some("slot owner"));

        let text = Key::from_string("hp").without_comment();
        assert_eq!(text.as_str(), Some("hp"));
        assert_eq!(text.comment(), None);
    }

    #[test]
    fn parse_accepts_only_lowercase_hex_as_compact() {
        let id = CompactId::from_bytes([0xab; 16]);
        assert_eq!(Key::parse(&id.to_hex()).compact_id(), Some(id));

        let upper = id.to_hex().to_uppercase();
        assert_eq!(Key::parse(&upper).compact_id(), None);
        assert_eq!(Key::parse(&upper).as_str(), Some(upper.as_str()));

        let mixed = format!("AB{}", &id.to_hex()[2..]);
        assert_eq!(Key::parse(&mixed).compact_id(), None);
    }

    #[test]
    fn is_empty() {
        assert!(Key::from_string("").is_empty());
        assert!(Key::from_compact(CompactId::NIL).is_empty());
        assert!(!Key::from_string("x").is_empty());
        assert!(!Key::random().is_empty());
    }

    #[test]
    fn display_string() {
        let id = CompactId::from_bytes([1; 16]);
        assert_eq!(Key::from_compact(id).to_display_string(), id.to_hex());
        assert_eq!(Key::from_string("name").to_display_string(), "name");
    }

    #[test]
    fn from_string_keeps_hex_as_string() {
        let hex = CompactId::new().to_hex();
        let key = Key::from_string(hex.clone());
        assert_eq!(key.as_str(), Some(hex.as_str()));
        assert!(key.compact_id().is_none());
    }

    #[test]
    fn parse_decodes_canonical_hex_only() {
        let id = CompactId::new();
        assert_eq!(Key::parse(&id.to_hex()).compact_id(), Some(id));
        assert!(Key::parse(&id.to_hex().to_uppercase()).compact_id().is_none());
        assert_eq!(Key::parse("name").as_str(), Some("name"));
    }
}
