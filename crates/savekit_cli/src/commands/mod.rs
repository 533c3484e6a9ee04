//! CLI command implementations.

pub mod convert;
pub mod inspect;
pub mod prune;

use clap::{Args, ValueEnum};
use savekit_codec::{CodecSettings, CodecVariant, CommentPlacement, TypeNameHandling};
use savekit_core::{EncryptionParams, SaveSettings};
use savekit_storage::{FileBackend, StorageBackend};
use std::path::Path;

/// Result type shared by the commands.
pub type CmdResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Text variant names accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VariantArg {
    /// Compact, no comments
    Compact,
    /// Compact, comments before keys
    CompactBefore,
    /// Compact, comments after values
    CompactAfter,
    /// Indented, no comments
    Indented,
    /// Indented, comments before keys
    IndentedBefore,
    /// Indented, comments after values
    IndentedAfter,
}

impl From<VariantArg> for CodecVariant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Compact => CodecVariant::Compact,
            VariantArg::CompactBefore => CodecVariant::CompactCommentsBefore,
            VariantArg::CompactAfter => CodecVariant::CompactCommentsAfter,
            VariantArg::Indented => CodecVariant::Indented,
            VariantArg::IndentedBefore => CodecVariant::IndentedCommentsBefore,
            VariantArg::IndentedAfter => CodecVariant::IndentedCommentsAfter,
        }
    }
}

/// Comment placement used to read a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CommentsArg {
    /// Discard comments
    None,
    /// Comments precede their key
    Before,
    /// Comments follow their value
    After,
}

impl From<CommentsArg> for CommentPlacement {
    fn from(arg: CommentsArg) -> Self {
        match arg {
            CommentsArg::None => CommentPlacement::None,
            CommentsArg::Before => CommentPlacement::BeforeKey,
            CommentsArg::After => CommentPlacement::AfterValue,
        }
    }
}

/// Decryption parameters for reading a save file.
#[derive(Debug, Clone, Default, Args)]
pub struct CryptoArgs {
    /// Password of an encrypted save
    #[arg(long, requires_all = ["salt", "iv"])]
    pub password: Option<String>,

    /// Salt used with the password
    #[arg(long, requires = "password")]
    pub salt: Option<String>,

    /// IV bound to the file
    #[arg(long, requires = "password")]
    pub iv: Option<String>,
}

impl CryptoArgs {
    /// Returns encryption parameters if a password was given.
    #[must_use]
    pub fn params(&self) -> Option<EncryptionParams> {
        let password = self.password.as_ref()?;
        Some(EncryptionParams::new(
            password.as_str(),
            self.salt.as_deref().unwrap_or_default(),
            self.iv.as_deref().unwrap_or_default(),
        ))
    }
}

/// Settings for reading a file with the given comment placement and
/// optional decryption.
#[must_use]
pub fn read_settings(comments: CommentsArg, crypto: &CryptoArgs) -> SaveSettings {
    let settings = SaveSettings::default().codec(
        CodecSettings::default()
            .comments(comments.into())
            .type_names(TypeNameHandling::Auto),
    );
    match crypto.params() {
        Some(params) => settings.encryption(params),
        None => settings,
    }
}

/// Reads and decodes a save file.
pub fn read_document(
    path: &Path,
    settings: &SaveSettings,
) -> CmdResult<savekit_codec::Document> {
    let bytes = FileBackend::new()
        .read(path)?
        .ok_or_else(|| format!("no save file at {}", path.display()))?;
    Ok(savekit_core::text::decode_text(&bytes, settings)?)
}

/// Formats a byte count for humans.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_args_cover_every_variant() {
        let all: Vec<CodecVariant> = VariantArg::value_variants()
            .iter()
            .map(|v| (*v).into())
            .collect();
        assert_eq!(all, CodecVariant::ALL.to_vec());
    }

    #[test]
    fn crypto_args_need_a_password() {
        assert!(CryptoArgs::default().params().is_none());
        let args = CryptoArgs {
            password: Some("pw".into()),
            salt: Some("s".into()),
            iv: Some("iv".into()),
        };
        assert_eq!(args.params().unwrap().iv(), "iv");
    }

    #[test]
    fn sizes() {
        assert_eq!(format_size(10), "10 B");
        assert_eq!(format_size(2048), "2.0 KB");
    }
}
