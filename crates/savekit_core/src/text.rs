//! Conversion between documents and the bytes stored on disk.
//!
//! Plain saves are the codec text itself. Encrypted saves are the base64
//! encoding of an AES-GCM envelope around that text, so the file stays
//! printable.

use crate::config::{EncryptionParams, SaveSettings};
use crate::error::{PersistError, PersistResult};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use savekit_codec::Document;
use savekit_storage::Cipher;

/// Serializes a document and encrypts it if the settings ask for it.
///
/// # Errors
///
/// Returns an error if encoding or encryption fails.
pub fn encode_text(doc: &Document, settings: &SaveSettings) -> PersistResult<String> {
    let text = doc.to_text(&settings.codec)?;
    match &settings.encryption {
        Some(params) => encrypt_text(&text, params),
        None => Ok(text),
    }
}

/// Parses stored bytes, decrypting first if the settings ask for it.
///
/// Empty or whitespace-only input decodes to an empty document.
///
/// # Errors
///
/// Returns an error if the bytes are not UTF-8, cannot be decrypted, or
/// do not parse.
pub fn decode_text(bytes: &[u8], settings: &SaveSettings) -> PersistResult<Document> {
    let stored = std::str::from_utf8(bytes).map_err(|_| PersistError::InvalidText)?;
    if stored.trim().is_empty() {
        return Ok(Document::new());
    }
    let text = match &settings.encryption {
        Some(params) => decrypt_text(stored, params)?,
        None => stored.to_string(),
    };
    if text.trim().is_empty() {
        return Ok(Document::new());
    }
    Ok(Document::from_text(&text, &settings.codec)?)
}

/// Encrypts text into a base64 envelope.
///
/// # Errors
///
/// Returns an error if key derivation or encryption fails.
pub fn encrypt_text(text: &str, params: &EncryptionParams) -> PersistResult<String> {
    let cipher = Cipher::new(&params.key()?);
    let envelope = cipher.encrypt(text.as_bytes(), params.iv().as_bytes())?;
    Ok(BASE64.encode(envelope))
}

/// Decrypts a base64 envelope produced by [`encrypt_text`].
///
/// # Errors
///
/// Returns an encryption error on bad base64, wrong parameters, or
/// tampered data.
pub fn decrypt_text(envelope: &str, params: &EncryptionParams) -> PersistResult<String> {
    let envelope = BASE64
        .decode(envelope.trim())
        .map_err(|e| PersistError::encryption(format!("invalid base64: {e}")))?;
    let cipher = Cipher::new(&params.key()?);
    let plain = cipher.decrypt(&envelope, params.iv().as_bytes())?;
    String::from_utf8(plain).map_err(|_| PersistError::InvalidText)
}

#[cfg(test)]
mod tests {
    use super::*;
    use savekit_codec::Key;

    fn encrypted() -> SaveSettings {
        SaveSettings::new().encryption(EncryptionParams::new("pw", "salt", "iv"))
    }

    #[test]
    fn plain_round_trip() {
        let mut doc = Document::new();
        doc.set(Key::from_string("score").with_comment("best run"), 100);
        let settings = SaveSettings::default();
        let text = encode_text(&doc, &settings).unwrap();
        assert!(text.contains("/* best run */"));
        assert_eq!(decode_text(text.as_bytes(), &settings).unwrap(), doc);
    }

    #[test]
    fn encrypted_round_trip() {
        let mut doc = Document::new();
        doc.set("score", 100).set("name", "Ada");
        let settings = encrypted();
        let text = encode_text(&doc, &settings).unwrap();
        assert!(!text.contains("score"));
        assert!(text.bytes().all(|b| b.is_ascii_graphic()));
        assert_eq!(decode_text(text.as_bytes(), &settings).unwrap(), doc);
    }

    #[test]
    fn empty_text_encrypts() {
        let params = EncryptionParams::new("pw", "salt", "iv");
        let envelope = encrypt_text("", &params).unwrap();
        assert_eq!(decrypt_text(&envelope, &params).unwrap(), "");
        assert!(decode_text(envelope.as_bytes(), &encrypted()).unwrap().is_empty());
    }

    #[test]
    fn blank_input_is_empty_document() {
        assert!(decode_text(b"", &SaveSettings::default()).unwrap().is_empty());
        assert!(decode_text(b"  \n", &encrypted()).unwrap().is_empty());
    }

    #[test]
    fn wrong_parameters_fail_as_encryption_errors() {
        let mut doc = Document::new();
        doc.set("a", 1);
        let text = encode_text(&doc, &encrypted()).unwrap();

        for params in [
            EncryptionParams::new("wrong", "salt", "iv"),
            EncryptionParams::new("pw", "wrong", "iv"),
            EncryptionParams::new("pw", "salt", "wrong"),
        ] {
            let settings = SaveSettings::new().encryption(params);
            assert!(decode_text(text.as_bytes(), &settings).unwrap_err().is_encryption());
        }
    }

    #[test]
    fn plain_text_with_encryption_on_is_an_encryption_error() {
        let err = decode_text(b"{\"a\": 1}", &encrypted()).unwrap_err();
        assert!(err.is_encryption());
    }

    #[test]
    fn invalid_utf8() {
        let err = decode_text(&[0xff, 0xfe], &SaveSettings::default()).unwrap_err();
        assert!(matches!(err, PersistError::InvalidText));
    }

    #[test]
    fn parse_errors_surface_as_codec_errors() {
        let err = decode_text(b"{\"a\": ", &SaveSettings::default()).unwrap_err();
        assert!(matches!(err, PersistError::Codec(_)));
    }
}
