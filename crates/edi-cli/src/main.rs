//! # edi-cli
//!
//! Command-line decoder/encoder for schema-driven ANSI X12.
//!
//! `edi decode` turns interchange text into a JSON record tree; `edi encode`
//! turns such a tree back into X12 text.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use edi_adapter_x12::{CodecConfig, X12Codec};
use edi_ir::{Interchange, Selection};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "edi")]
#[command(about = "Schema-driven X12 decoder/encoder")]
#[command(version)]
struct Cli {
    /// Path to a YAML/JSON codec configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable per-segment diagnostics and debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode X12 text into a JSON record tree
    Decode {
        /// Input X12 file
        input: PathBuf,

        /// Only print the node at this path (e.g. `GS[0]/ST[0]/header/BEG`)
        #[arg(long)]
        select: Option<String>,

        #[command(flatten)]
        codec: CodecArgs,
    },

    /// Encode a JSON record tree into X12 text
    Encode {
        /// Input JSON file
        input: PathBuf,

        /// Append a line break after every segment
        #[arg(long)]
        new_lines: bool,

        /// Drop trailing empty elements
        #[arg(long)]
        truncate_null: bool,

        #[command(flatten)]
        codec: CodecArgs,
    },
}

/// Options shared by both subcommands; they override the config file
#[derive(Args, Debug)]
struct CodecArgs {
    /// Schema file (JSON or YAML)
    #[arg(short, long)]
    schema: Option<PathBuf>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Segment terminator
    #[arg(long)]
    terminator: Option<char>,

    /// Element separator
    #[arg(long)]
    separator: Option<char>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let mut config = match &cli.config {
        Some(path) => CodecConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => CodecConfig::new(),
    };
    if cli.debug {
        config = config.debug(true);
    }

    match cli.command {
        Commands::Decode {
            input,
            select,
            codec,
        } => {
            let codec_config = codec.apply(config);
            let x12 = build_codec(&codec_config)?;
            info!("Decoding {}", input.display());

            let interchange = x12
                .decode_file(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            debug!(groups = interchange.groups.len(), "Decoded interchange");

            let json = match select.as_deref() {
                Some(path) => {
                    let node = Selection::navigate(&interchange, path)
                        .with_context(|| format!("Invalid selection '{path}'"))?;
                    serde_json::to_string_pretty(&node)?
                }
                None => serde_json::to_string_pretty(&interchange)?,
            };
            write_output(codec.output.as_deref(), &format!("{json}\n"))
        }
        Commands::Encode {
            input,
            new_lines,
            truncate_null,
            codec,
        } => {
            let mut codec_config = codec.apply(config);
            if new_lines {
                codec_config = codec_config.new_lines(true);
            }
            if truncate_null {
                codec_config = codec_config.truncate_null(true);
            }
            let x12 = build_codec(&codec_config)?;
            info!("Encoding {}", input.display());

            let content = fs::read_to_string(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let interchange: Interchange = serde_json::from_str(&content)
                .with_context(|| format!("Invalid record tree in {}", input.display()))?;

            let text = x12.encode(&interchange).context("Failed to encode interchange")?;
            write_output(codec.output.as_deref(), &text)
        }
    }
}

impl CodecArgs {
    fn apply(&self, mut config: CodecConfig) -> CodecConfig {
        if let Some(schema) = &self.schema {
            config.spec = None;
            config = config.with_spec_file(schema);
        }
        if let Some(terminator) = self.terminator {
            config = config.terminator(terminator);
        }
        if let Some(separator) = self.separator {
            config = config.separator(separator);
        }
        config
    }
}

fn build_codec(config: &CodecConfig) -> Result<X12Codec> {
    X12Codec::new(config).context("Failed to configure codec")
}

fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
