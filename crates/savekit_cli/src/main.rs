//! savekit CLI
//!
//! Command-line tools for savekit save files.
//!
//! # Commands
//!
//! - `inspect` - Display the keys and values of a save file
//! - `convert` - Re-encode a save file under another variant or password
//! - `prune` - Delete all but the newest save files in a directory

mod commands;

use clap::{Parser, Subcommand};
use commands::{CommentsArg, CryptoArgs, VariantArg};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// savekit command-line save file tools.
#[derive(Parser)]
#[command(name = "savekit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display the contents of a save file
    Inspect {
        /// Save file to read
        file: PathBuf,

        /// Where comments sit in the file
        #[arg(short, long, value_enum, default_value = "before")]
        comments: CommentsArg,

        #[command(flatten)]
        crypto: CryptoArgs,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Re-encode a save file
    Convert {
        /// Save file to read
        input: PathBuf,

        /// File to write
        output: PathBuf,

        /// Where comments sit in the input
        #[arg(long, value_enum, default_value = "before")]
        comments: CommentsArg,

        #[command(flatten)]
        crypto: CryptoArgs,

        /// Output variant
        #[arg(long, value_enum, default_value = "indented-before")]
        to: VariantArg,

        /// Omit `$type` markers on math values
        #[arg(long)]
        no_type_names: bool,

        /// Header comment written at the top of the output
        #[arg(long)]
        header: Option<String>,

        /// Password for the output
        #[arg(long, requires_all = ["out_salt", "out_iv"])]
        out_password: Option<String>,

        /// Salt for the output
        #[arg(long, requires = "out_password")]
        out_salt: Option<String>,

        /// IV for the output
        #[arg(long, requires = "out_password")]
        out_iv: Option<String>,
    },

    /// Delete all but the newest save files in a directory
    Prune {
        /// Save directory
        dir: PathBuf,

        /// Number of files to keep (0 keeps everything)
        #[arg(short, long)]
        keep: usize,

        /// Save file extension
        #[arg(short, long, default_value = savekit_core::DEFAULT_EXTENSION)]
        extension: String,

        /// Dry run - show what would be removed
        #[arg(short, long)]
        dry_run: bool,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Inspect {
            file,
            comments,
            crypto,
            format,
        } => {
            commands::inspect::run(&file, comments, &crypto, &format)?;
        }
        Commands::Convert {
            input,
            output,
            comments,
            crypto,
            to,
            no_type_names,
            header,
            out_password,
            out_salt,
            out_iv,
        } => {
            let options = commands::convert::ConvertOptions {
                input_comments: comments,
                input_crypto: crypto,
                variant: to,
                type_names: !no_type_names,
                header,
                output_crypto: CryptoArgs {
                    password: out_password,
                    salt: out_salt,
                    iv: out_iv,
                },
            };
            commands::convert::run(&input, &output, &options)?;
        }
        Commands::Prune {
            dir,
            keep,
            extension,
            dry_run,
        } => {
            commands::prune::run(&dir, &extension, keep, dry_run)?;
        }
        Commands::Version => {
            println!("savekit CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("savekit Core v{}", savekit_core::VERSION);
        }
    }

    Ok(())
}
