//! Convert command implementation.
//!
//! Re-encodes a save file under a different variant, type-name policy or
//! encryption. Comments survive whenever both sides place them.

use super::{read_document, read_settings, CmdResult, CommentsArg, CryptoArgs, VariantArg};
use savekit_codec::{CodecVariant, TypeNameHandling};
use savekit_core::SaveSettings;
use savekit_storage::{FileBackend, StorageBackend};
use std::path::Path;
use tracing::info;

/// Output options for a conversion.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Variant used to read the input.
    pub input_comments: CommentsArg,
    /// Input decryption.
    pub input_crypto: CryptoArgs,
    /// Variant written to the output.
    pub variant: VariantArg,
    /// Write `$type` markers on converter values.
    pub type_names: bool,
    /// Header comment for the output.
    pub header: Option<String>,
    /// Output encryption.
    pub output_crypto: CryptoArgs,
}

/// Builds the settings used to write the output.
#[must_use]
pub fn output_settings(options: &ConvertOptions) -> SaveSettings {
    let mut codec = CodecVariant::from(options.variant).settings().type_names(
        if options.type_names {
            TypeNameHandling::Auto
        } else {
            TypeNameHandling::None
        },
    );
    if let Some(header) = &options.header {
        codec = codec.header(header.as_str());
    }
    let settings = SaveSettings::default().codec(codec);
    match options.output_crypto.params() {
        Some(params) => settings.encryption(params),
        None => settings,
    }
}

/// Runs the convert command.
pub fn run(input: &Path, output: &Path, options: &ConvertOptions) -> CmdResult<()> {
    let doc = read_document(input, &read_settings(options.input_comments, &options.input_crypto))?;
    let settings = output_settings(options);
    let text = savekit_core::text::encode_text(&doc, &settings)?;
    FileBackend::new().write(output, text.as_bytes())?;

    info!(
        input = %input.display(),
        output = %output.display(),
        keys = doc.len(),
        "converted save file"
    );
    println!(
        "Wrote {} keys to {} ({} bytes)",
        doc.len(),
        output.display(),
        text.len()
    );
    Ok(())
}
