//! Fuzz testing harnesses for the savekit text codec.
//!
//! These targets can be driven by cargo-fuzz or by the deterministic
//! tests below. Each one must return normally on any input.

use savekit_codec::{CodecSettings, CodecVariant, Document, TypeNameHandling};
use savekit_core::{text, EncryptionParams, SaveSettings};

fn every_settings() -> impl Iterator<Item = CodecSettings> {
    CodecVariant::ALL.into_iter().flat_map(|variant| {
        [TypeNameHandling::Auto, TypeNameHandling::None]
            .into_iter()
            .map(move |names| variant.settings().type_names(names))
    })
}

/// Fuzz target for text decoding.
///
/// Arbitrary bytes either decode or fail with an error, under every
/// variant. Nothing panics.
pub fn fuzz_decode(data: &[u8]) {
    let text = String::from_utf8_lossy(data);
    for settings in every_settings() {
        let _ = Document::from_text(&text, &settings);
    }
}

/// Fuzz target for re-encoding.
///
/// Whatever decodes must encode, and the encoded text must be a fixed
/// point: decoding and re-encoding it reproduces it byte for byte.
pub fn fuzz_reencode(data: &[u8]) {
    let text = String::from_utf8_lossy(data);
    for settings in every_settings() {
        let Ok(doc) = Document::from_text(&text, &settings) else {
            continue;
        };
        let first = doc
            .to_text(&settings)
            .expect("decoded document must encode");
        let again = Document::from_text(&first, &settings)
            .expect("encoded text must decode")
            .to_text(&settings)
            .expect("re-decoded document must encode");
        assert_eq!(first, again, "re-encoding is not stable");
    }
}

/// Fuzz target for the encrypted envelope.
///
/// Arbitrary stored bytes never decrypt into a document by accident and
/// never panic.
pub fn fuzz_decrypt(data: &[u8]) {
    let settings = SaveSettings::new().encryption(EncryptionParams::new("fuzz", "salt", "iv"));
    if let Ok(doc) = text::decode_text(data, &settings) {
        assert!(doc.is_empty(), "garbage decrypted to a document");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::hash::{DefaultHasher, Hash, Hasher};

    /// Generate pseudo-random data for fuzzing based on a seed.
    fn generate_random_data(seed: u64, len: usize) -> Vec<u8> {
        let mut hasher = DefaultHasher::new();
        let mut result = Vec::with_capacity(len);
        let mut state = seed;

        for _ in 0..len {
            state.hash(&mut hasher);
            state = hasher.finish();
            hasher = DefaultHasher::new();
            result.push((state & 0xFF) as u8);
        }

        result
    }

    #[test]
    fn test_fuzz_decode_empty() {
        fuzz_decode(&[]);
    }

    #[test]
    fn test_fuzz_decode_garbage() {
        fuzz_decode(&[0xFF, 0xFF, 0x7B, 0x22]);
        fuzz_decode(b"{\"a\": [1, 2, {\"$type\": \"Vector3\", \"x\": }");
        fuzz_decode(b"{\"a\": /* unterminated");
        fuzz_decode(b"{\"a\": \"\\ud800\"}");
    }

    #[test]
    fn test_fuzz_decode_deep_nesting() {
        let deep = "[".repeat(10_000);
        fuzz_decode(format!("{{\"a\": {deep}").as_bytes());
    }

    #[test]
    fn test_fuzz_reencode_valid() {
        fuzz_reencode(b"{\"score\": 100, \"name\": \"Ada\"}");
        fuzz_reencode(b"/* header */ {/* hp */ \"hp\": 10, \"pos\": {\"$type\": \"Vector2\", \"x\": 1, \"y\": 2}}");
        fuzz_reencode(b"{\"f\": NaN, \"g\": -Infinity, \"list\": [1, 2.5, null, [true]]}");
        fuzz_reencode(b"{\"x\": {\"$type\": \"Unknown\", \"a\": 1}}");
    }

    #[test]
    fn test_fuzz_decrypt() {
        fuzz_decrypt(b"");
        fuzz_decrypt(b"not base64 at all!");
        fuzz_decrypt(b"AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA");
    }

    #[test]
    fn test_fuzz_random_inputs() {
        for seed in 0..50 {
            let data = generate_random_data(seed, 64);
            fuzz_decode(&data);
            fuzz_reencode(&data);
            fuzz_decrypt(&data);
        }
    }
}
