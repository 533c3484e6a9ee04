//! Compact 128-bit identifiers.

use std::fmt;
use uuid::Uuid;

/// Length of the hex rendering of a [`CompactId`].
pub const HEX_LEN: usize = 32;

/// A compact, fixed-size identifier usable as a fast-compare key.
///
/// Compact ids are 128-bit values rendered in save files as 32 lowercase
/// hex characters. The all-zero id is the distinguished empty value.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct CompactId([u8; 16]);

impl CompactId {
    /// The empty (all-zero) id.
    pub const NIL: Self = Self([0u8; 16]);

    /// Returns the empty id.
    #[must_use]
    pub const fn nil() -> Self {
        Self::NIL
    }

    /// Creates a compact id from raw bytes.
    #[inline]
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Creates a new random compact id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4().into_bytes())
    }

    /// Creates a compact id from a UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid.into_bytes())
    }

    /// Returns the raw bytes.
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Converts to a UUID.
    #[must_use]
    pub fn to_uuid(&self) -> Uuid {
        Uuid::from_bytes(self.0)
    }

    /// Returns true if this is the empty id.
    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0 == [0u8; 16]
    }

    /// Writes the 32-char lowercase hex form into `buf` and returns it.
    pub fn encode_hex<'b>(&self, buf: &'b mut [u8; HEX_LEN]) -> &'b str {
        self.to_uuid().simple().encode_lower(buf)
    }

    /// Returns the 32-char lowercase hex form.
    #[must_use]
    pub fn to_hex(&self) -> String {
        let mut buf = [0u8; HEX_LEN];
        self.encode_hex(&mut buf).to_string()
    }

    /// Parses a 32-char hex string (either case).
    ///
    /// Returns `None` for any other length or for non-hex characters;
    /// hyphenated and braced UUID forms are not accepted.
    #[must_use]
    pub fn parse_hex(s: &str) -> Option<Self> {
        if s.len() != HEX_LEN || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        Uuid::try_parse(s).ok().map(Self::from_uuid)
    }

    /// Parses `s` only if it is exactly the canonical (lowercase) rendering.
    ///
    /// This is the form the writer produces, so decoding it keeps string
    /// keys that merely resemble ids (e.g. uppercase hex) as strings.
    #[must_use]
    pub fn parse_canonical(s: &str) -> Option<Self> {
        if !s
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
        {
            return None;
        }
        Self::parse_hex(s)
    }
}

impl fmt::Debug for CompactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = [0u8; HEX_LEN];
        write!(f, "CompactId({})", self.encode_hex(&mut buf))
    }
}

impl fmt::Display for CompactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = [0u8; HEX_LEN];
        f.write_str(self.encode_hex(&mut buf))
    }
}

impl From<Uuid> for CompactId {
    fn from(uuid: Uuid) -> Self {
        Self::from_uuid(uuid)
    }
}

impl From<[u8; 16]> for CompactId {
    fn from(bytes: [u8; 16]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<CompactId> for [u8; 16] {
    fn from(id: CompactId) -> Self {
        id.0
    }
}
