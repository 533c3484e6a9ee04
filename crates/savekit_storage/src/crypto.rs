//! Authenticated encryption using AES-256-GCM.
//!
//! Envelope layout: `nonce (12 bytes) || ciphertext || tag (16 bytes)`.
//! A fresh random nonce is drawn for every encryption. Callers may bind
//! extra bytes (the configured IV) as associated data; decryption fails
//! unless the same bytes are supplied.

use crate::error::{StorageError, StorageResult};
use aes_gcm::{
    aead::{generic_array::GenericArray, Aead, KeyInit, Payload},
    Aes256Gcm, Nonce,
};
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Size of the AES-256 key in bytes.
pub const KEY_SIZE: usize = 32;
/// Size of the GCM nonce in bytes.
pub const NONCE_SIZE: usize = 12;
/// Size of the GCM authentication tag in bytes.
pub const TAG_SIZE: usize = 16;

const KDF_INFO: &[u8] = b"savekit-save-key-v1";

/// Encryption key for AES-256-GCM.
///
/// The key is zeroized when dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct EncryptionKey {
    bytes: [u8; KEY_SIZE],
}

impl EncryptionKey {
    /// Generates a new random key.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_SIZE];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Creates a key from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if `bytes` is not exactly 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> StorageResult<Self> {
        if bytes.len() != KEY_SIZE {
            return Err(StorageError::invalid_key(format!(
                "expected {KEY_SIZE} bytes, got {}",
                bytes.len()
            )));
        }
        let mut key_bytes = [0u8; KEY_SIZE];
        key_bytes.copy_from_slice(bytes);
        Ok(Self { bytes: key_bytes })
    }

    /// Derives a key from a password and salt using HKDF-SHA256.
    ///
    /// HKDF is not a password hash. It is adequate for the obfuscation-grade
    /// protection save files need, not for guarding user credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if HKDF expansion fails.
    pub fn derive_from_password(password: &[u8], salt: &[u8]) -> StorageResult<Self> {
        use hkdf::Hkdf;
        use sha2::Sha256;

        let hk = Hkdf::<Sha256>::new(Some(salt), password);
        let mut bytes = [0u8; KEY_SIZE];
        hk.expand(KDF_INFO, &mut bytes)
            .map_err(|_| StorageError::invalid_key("HKDF expand failed"))?;
        Ok(Self { bytes })
    }

    /// Returns the raw key bytes. Do not log the result.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl std::fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Encrypts and decrypts whole payloads.
pub struct Cipher {
    cipher: Aes256Gcm,
}

impl Cipher {
    /// Creates a cipher for `key`.
    #[must_use]
    pub fn new(key: &EncryptionKey) -> Self {
        let cipher = Aes256Gcm::new(GenericArray::from_slice(key.as_bytes()));
        Self { cipher }
    }

    /// Encrypts `plaintext`, authenticating `aad` alongside it.
    ///
    /// # Errors
    ///
    /// Returns an error if the AEAD rejects the input.
    pub fn encrypt(&self, plaintext: &[u8], aad: &[u8]) -> StorageResult<Vec<u8>> {
        let mut nonce_bytes = [0u8; NONCE_SIZE];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, Payload { msg: plaintext, aad })
            .map_err(|_| StorageError::encryption_failed("AES-GCM encryption error"))?;

        let mut envelope = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        envelope.extend_from_slice(&nonce_bytes);
        envelope.extend(ciphertext);
        Ok(envelope)
    }

    /// Decrypts an envelope produced by [`encrypt`](Self::encrypt).
    ///
    /// # Errors
    ///
    /// Returns an error if the envelope is too short, was produced under a
    /// different key or `aad`, or has been tampered with.
    pub fn decrypt(&self, envelope: &[u8], aad: &[u8]) -> StorageResult<Vec<u8>> {
        if envelope.len() < NONCE_SIZE + TAG_SIZE {
            return Err(StorageError::decryption_failed("ciphertext too short"));
        }
        let (nonce, ciphertext) = envelope.split_at(NONCE_SIZE);
        self.cipher
            .decrypt(
                Nonce::from_slice(nonce),
                Payload {
                    msg: ciphertext,
                    aad,
                },
            )
            .map_err(|_| StorageError::decryption_failed("wrong key or corrupted data"))
    }
}

impl std::fmt::Debug for Cipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cipher").field("cipher", &"Aes256Gcm").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cipher() -> Cipher {
        Cipher::new(&EncryptionKey::generate())
    }

    #[test]
    fn key_from_bytes() {
        let bytes = [42u8; KEY_SIZE];
        let key = EncryptionKey::from_bytes(&bytes).unwrap();
        assert_eq!(key.as_bytes(), &bytes);
        assert!(EncryptionKey::from_bytes(&[0u8; 16]).is_err());
    }

    #[test]
    fn debug_redacts_key() {
        let key = EncryptionKey::from_bytes(&[7u8; KEY_SIZE]).unwrap();
        assert!(format!("{key:?}").contains("REDACTED"));
    }

    #[test]
    fn derive_is_deterministic_and_salted() {
        let a = EncryptionKey::derive_from_password(b"pw", b"salt").unwrap();
        let b = EncryptionKey::derive_from_password(b"pw", b"salt").unwrap();
        let c = EncryptionKey::derive_from_password(b"pw", b"pepper").unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
        assert_ne!(a.as_bytes(), c.as_bytes());
    }

    #[test]
    fn round_trip() {
        let cipher = cipher();
        let envelope = cipher.encrypt(b"save text", b"iv").unwrap();
        assert_eq!(envelope.len(), NONCE_SIZE + 9 + TAG_SIZE);
        assert_eq!(cipher.decrypt(&envelope, b"iv").unwrap(), b"save text");
    }

    #[test]
    fn empty_plaintext_round_trips() {
        let cipher = cipher();
        let envelope = cipher.encrypt(b"", b"").unwrap();
        assert_eq!(cipher.decrypt(&envelope, b"").unwrap(), b"");
    }

    #[test]
    fn fresh_nonce_each_time() {
        let cipher = cipher();
        assert_ne!(
            cipher.encrypt(b"same", b"").unwrap(),
            cipher.encrypt(b"same", b"").unwrap()
        );
    }

    #[test]
    fn wrong_key_aad_or_tamper_fails() {
        let cipher = cipher();
        let envelope = cipher.encrypt(b"secret", b"iv").unwrap();

        assert!(Cipher::new(&EncryptionKey::generate())
            .decrypt(&envelope, b"iv")
            .is_err());
        assert!(cipher.decrypt(&envelope, b"other iv").is_err());

        let mut tampered = envelope.clone();
        let last = tampered.len() - 1;
        tampered[last] ^= 0xFF;
        assert!(cipher.decrypt(&tampered, b"iv").is_err());

        let err = cipher.decrypt(&envelope[..10], b"iv").unwrap_err();
        assert!(err.is_crypto());
    }
}
