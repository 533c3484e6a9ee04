//! Insertion-ordered key/value documents.

use crate::error::CodecResult;
use crate::key::Key;
use crate::settings::CodecSettings;
use crate::value::{FromValue, Value};
use std::collections::HashMap;
use std::fmt;

/// One object level of save data: an insertion-ordered map from [`Key`] to
/// [`Value`].
///
/// # Invariants
///
/// - Keys are unique; writing an existing key replaces its value (last
///   write wins) but keeps its original position.
/// - Iteration and serialization follow first-insertion order.
/// - Reads never insert.
///
/// Nested documents are stored by value, so a document can never contain
/// itself or one of its ancestors.
#[derive(Clone, Default)]
pub struct Document {
    entries: Vec<(Key, Value)>,
    index: HashMap<Key, usize>,
}

impl Document {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty document with room for `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Returns the value under `key` converted to `T`, or `default` if the
    /// key is missing or holds a different type.
    pub fn get<T: FromValue>(&self, key: impl Into<Key>, default: T) -> T {
        self.try_get(key).unwrap_or(default)
    }

    /// Returns the value under `key` converted to `T`.
    ///
    /// Returns `None` both when the key is missing and when the stored value
    /// has a different type.
    pub fn try_get<T: FromValue>(&self, key: impl Into<Key>) -> Option<T> {
        self.get_value(key).and_then(T::from_value)
    }

    /// Returns the raw value under `key`.
    pub fn get_value(&self, key: impl Into<Key>) -> Option<&Value> {
        let idx = *self.index.get(&key.into())?;
        Some(&self.entries[idx].1)
    }

    /// Returns a mutable reference to the raw value under `key`.
    pub fn get_value_mut(&mut self, key: impl Into<Key>) -> Option<&mut Value> {
        let idx = *self.index.get(&key.into())?;
        Some(&mut self.entries[idx].1)
    }

    /// Returns the nested document under `key` for in-place edits.
    pub fn get_document_mut(&mut self, key: impl Into<Key>) -> Option<&mut Document> {
        self.get_value_mut(key).and_then(Value::as_document_mut)
    }

    /// Sets `key` to `value` and returns `self` for chaining.
    ///
    /// The stored key is replaced as well, so the comment of the most
    /// recent write wins.
    pub fn set(&mut self, key: impl Into<Key>, value: impl Into<Value>) -> &mut Self {
        self.insert(key, value);
        self
    }

    /// Sets `key` to `value`, returning the previous value if there was one.
    pub fn insert(&mut self, key: impl Into<Key>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        match self.index.get(&key) {
            Some(&idx) => {
                let (_, old) = std::mem::replace(&mut self.entries[idx], (key, value));
                Some(old)
            }
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Removes `key`, returning its value if it was present.
    pub fn remove(&mut self, key: impl Into<Key>) -> Option<Value> {
        let idx = self.index.remove(&key.into())?;
        let (_, value) = self.entries.remove(idx);
        for (later, _) in &self.entries[idx..] {
            if let Some(pos) = self.index.get_mut(later) {
                *pos -= 1;
            }
        }
        Some(value)
    }

    /// Returns true if `key` is present.
    pub fn contains_key(&self, key: impl Into<Key>) -> bool {
        self.index.contains_key(&key.into())
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    /// Number of entries at this level.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Iterates over values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Returns the comment stored with `key`.
    pub fn comment(&self, key: impl Into<Key>) -> Option<&str> {
        let idx = *self.index.get(&key.into())?;
        self.entries[idx].0.comment()
    }

    /// Replaces the comment stored with `key`. Returns false if the key is
    /// missing.
    pub fn set_comment(&mut self, key: impl Into<Key>, comment: impl AsRef<str>) -> bool {
        let Some(&idx) = self.index.get(&key.into()) else {
            return false;
        };
        let entry = &mut self.entries[idx].0;
        *entry = entry.clone().with_comment(comment);
        true
    }

    /// Copies every entry of `other` into this document.
    ///
    /// Keys already present keep their position and take the incoming value.
    pub fn merge(&mut self, other: &Document) -> &mut Self {
        for (key, value) in other.iter() {
            self.insert(key.clone(), value.clone());
        }
        self
    }

    /// Serializes this document with the given settings.
    ///
    /// # Errors
    ///
    /// Returns an error only if the writer is driven into an invalid state,
    /// which indicates a bug.
    pub fn to_text(&self, settings: &CodecSettings) -> CodecResult<String> {
        crate::encoder::to_text(self, settings)
    }

    /// Parses a document from save text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a well-formed object.
    pub fn from_text(text: &str, settings: &CodecSettings) -> CodecResult<Self> {
        crate::decoder::from_text(text, settings)
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Into<Key>, V: Into<Value>> FromIterator<(K, V)> for Document {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut doc = Document::new();
        for (key, value) in iter {
            doc.insert(key, value);
        }
        doc
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a Key, &'a Value);
    type IntoIter = std::iter::Map<
        std::slice::Iter<'a, (Key, Value)>,
        fn(&'a (Key, Value)) -> (&'a Key, &'a Value),
    >;

    fn into_iter(self) -> Self::IntoIter {
        let split: fn(&'a (Key, Value)) -> (&'a Key, &'a Value) = |(k, v)| (k, v);
        self.entries.iter().map(split)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(doc: &Document) -> Vec<String> {
        doc.keys().map(Key::to_display_string).collect()
    }

    #[test]
    fn get_with_default_on_miss_does_not_insert() {
        let doc = Document::new();
        assert_eq!(doc.get("missing", 42i64), 42);
        assert!(!doc.contains_key("missing"));
        assert!(doc.is_empty());
    }

    #[test]
    fn get_on_type_mismatch_returns_default() {
        let mut doc = Document::new();
        doc.set("name", "Ada");
        assert_eq!(doc.get("name", 7i64), 7);
        assert_eq!(doc.try_get::<i64>("name"), None);
        assert_eq!(doc.try_get::<String>("name"), Some("Ada".to_string()));
    }

    #[test]
    fn set_chains() {
        let mut doc = Document::new();
        doc.set("score", 100).set("name", "Ada");
        assert_eq!(doc.get("score", 0i64), 100);
        assert_eq!(doc.get("name", String::new()), "Ada");
    }

    #[test]
    fn overwrite_keeps_position() {
        let mut doc = Document::new();
        doc.set("k3", 3).set("k1", 1).set("k2", 2);
        doc.set("k1", 10);
        assert_eq!(order(&doc), vec!["k3", "k1", "k2"]);
        assert_eq!(doc.get("k1", 0i64), 10);
    }

    #[test]
    fn remove_reindexes_later_entries() {
        let mut doc = Document::new();
        doc.set("a", 1).set("b", 2).set("c", 3);
        assert_eq!(doc.remove("a"), Some(Value::Int(1)));
        assert_eq!(order(&doc), vec!["b", "c"]);
        assert_eq!(doc.get("c", 0i64), 3);
        doc.set("b", 20);
        assert_eq!(order(&doc), vec!["b", "c"]);
        assert_eq!(doc.remove("missing"), None);
    }

    #[test]
    fn clear_empties() {
        let mut doc = Document::new();
        doc.set("a", 1);
        doc.clear();
        assert!(doc.is_empty());
        assert!(!doc.contains_key("a"));
    }

    #[test]
    fn nested_documents() {
        let mut stats = Document::new();
        stats.set("hp", 10);
        let mut doc = Document::new();
        doc.set("stats", stats);

        let read = doc.get("stats", Document::new());
        assert_eq!(read.get("hp", 0i64), 10);

        doc.get_document_mut("stats").unwrap().set("hp", 9);
        assert_eq!(doc.get("stats", Document::new()).get("hp", 0i64), 9);
    }

    #[test]
    fn latest_comment_wins() {
        let mut doc = Document::new();
        doc.set(Key::from_string("hp").with_comment("old"), 1);
        doc.set(Key::from_string("hp").with_comment("new"), 2);
        assert_eq!(doc.comment("hp"), Some("new"));
        assert!(doc.set_comment("hp", "edited"));
        assert_eq!(doc.comment("hp"), Some("edited"));
        assert!(!doc.set_comment("missing", "x"));
    }

    #[test]
    fn merge_keeps_existing_positions() {
        let mut base = Document::new();
        base.set("a", 1).set("b", 2);
        let mut other = Document::new();
        other.set("c", 3).set("a", 10);
        base.merge(&other);
        assert_eq!(order(&base), vec!["a", "b", "c"]);
        assert_eq!(base.get("a", 0i64), 10);
    }

    #[test]
    fn equality_is_ordered() {
        let a: Document = [("x", 1), ("y", 2)].into_iter().collect();
        let b: Document = [("y", 2), ("x", 1)].into_iter().collect();
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }
}
