//! Save settings.

use savekit_codec::CodecSettings;
use savekit_storage::{EncryptionKey, StorageResult};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Default save file extension, without the dot.
pub const DEFAULT_EXTENSION: &str = "sav";

/// Password, salt and IV for encrypted saves.
///
/// The key is derived from the password and salt. The IV is authenticated
/// with every file, so a file only decrypts with the IV it was saved with.
/// All three are wiped from memory on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct EncryptionParams {
    password: String,
    salt: String,
    iv: String,
}

impl EncryptionParams {
    /// Creates encryption parameters.
    #[must_use]
    pub fn new(password: impl Into<String>, salt: impl Into<String>, iv: impl Into<String>) -> Self {
        Self {
            password: password.into(),
            salt: salt.into(),
            iv: iv.into(),
        }
    }

    /// Derives the AES key.
    ///
    /// # Errors
    ///
    /// Returns an error if key derivation fails.
    pub fn key(&self) -> StorageResult<EncryptionKey> {
        EncryptionKey::derive_from_password(self.password.as_bytes(), self.salt.as_bytes())
    }

    /// The IV bound to each encrypted file.
    #[must_use]
    pub fn iv(&self) -> &str {
        &self.iv
    }
}

impl std::fmt::Debug for EncryptionParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionParams")
            .field("password", &"[REDACTED]")
            .field("salt", &"[REDACTED]")
            .field("iv", &"[REDACTED]")
            .finish()
    }
}

/// Configuration for saving and loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveSettings {
    /// How many files with [`extension`](Self::extension) to keep in a save
    /// directory after each save (0 = unlimited).
    pub max_files: usize,

    /// Text formatting, comment placement and type names.
    pub codec: CodecSettings,

    /// Encrypt the text when set.
    pub encryption: Option<EncryptionParams>,

    /// Save file extension, without the dot. Also selects which files
    /// retention considers.
    pub extension: String,

    /// Write through a temporary file and rename over the target.
    pub atomic_writes: bool,
}

impl Default for SaveSettings {
    fn default() -> Self {
        Self {
            max_files: 0,
            codec: CodecSettings::default(),
            encryption: None,
            extension: DEFAULT_EXTENSION.to_string(),
            atomic_writes: true,
        }
    }
}

impl SaveSettings {
    /// Creates settings with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the retention limit.
    #[must_use]
    pub fn max_files(mut self, max_files: usize) -> Self {
        self.max_files = max_files;
        self
    }

    /// Sets the codec settings.
    #[must_use]
    pub fn codec(mut self, codec: CodecSettings) -> Self {
        self.codec = codec;
        self
    }

    /// Enables encryption.
    #[must_use]
    pub fn encryption(mut self, params: EncryptionParams) -> Self {
        self.encryption = Some(params);
        self
    }

    /// Disables encryption.
    #[must_use]
    pub fn without_encryption(mut self) -> Self {
        self.encryption = None;
        self
    }

    /// Sets the file extension. A leading dot is ignored.
    #[must_use]
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    /// Sets whether writes are atomic.
    #[must_use]
    pub fn atomic_writes(mut self, value: bool) -> Self {
        self.atomic_writes = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use savekit_codec::{Formatting, TypeNameHandling};

    #[test]
    fn default_settings() {
        let settings = SaveSettings::default();
        assert_eq!(settings.max_files, 0);
        assert_eq!(settings.extension, "sav");
        assert!(settings.atomic_writes);
        assert!(settings.encryption.is_none());
        assert_eq!(settings.codec.formatting, Formatting::Indented);
    }

    #[test]
    fn builder_pattern() {
        let settings = SaveSettings::new()
            .max_files(3)
            .extension(".json")
            .atomic_writes(false)
            .codec(CodecSettings::new().type_names(TypeNameHandling::Auto))
            .encryption(EncryptionParams::new("pw", "salt", "iv"));

        assert_eq!(settings.max_files, 3);
        assert_eq!(settings.extension, "json");
        assert!(!settings.atomic_writes);
        assert_eq!(settings.codec.type_names, TypeNameHandling::Auto);
        assert_eq!(settings.encryption.as_ref().map(EncryptionParams::iv), Some("iv"));
        assert!(settings.without_encryption().encryption.is_none());
    }

    #[test]
    fn debug_redacts_secrets() {
        let params = EncryptionParams::new("hunter2", "salt", "iv");
        let text = format!("{params:?}");
        assert!(!text.contains("hunter2"));
    }

    #[test]
    fn key_depends_on_password_and_salt() {
        let a = EncryptionParams::new("pw", "salt", "iv").key().unwrap();
        let b = EncryptionParams::new("pw", "salt", "other iv").key().unwrap();
        let c = EncryptionParams::new("pw2", "salt", "iv").key().unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
        assert_ne!(a.as_bytes(), c.as_bytes());
    }
}
