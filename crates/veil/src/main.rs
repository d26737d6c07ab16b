//! Veil CLI - obscure and restore images with a password-keyed pixel permutation.
//!
//! Encoding shuffles the pixel columns and rows of an image under a password
//! and writes a lossless PNG. Decoding with the same password restores the
//! original pixels exactly.
//!
//! # Usage
//!
//! ```bash
//! # Encode a single image
//! veil encode cat.jpg --password hunter2
//!
//! # Decode a directory, password from the environment
//! VEIL_PASSWORD=hunter2 veil decode ./veiled/ --report restore.jsonl -f jsonl
//!
//! # Inspect the permutation tables for an image size
//! veil tables --width 640 --height 480 --password hunter2
//!
//! # View configuration
//! veil config show
//! ```

use clap::{Parser, Subcommand};
use veil_core::Direction;

mod cli;
mod logging;

/// Veil - password-keyed pixel scrambling for images.
#[derive(Parser, Debug)]
#[command(name = "veil")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Scramble images under a password
    Encode(cli::transform::TransformArgs),

    /// Restore images scrambled with the same password
    Decode(cli::transform::TransformArgs),

    /// Print the column and row permutation tables for an image size
    Tables(cli::tables::TablesArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match veil_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `veil config path`."
            );
            veil_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Veil v{}", veil_core::VERSION);

    match cli.command {
        Commands::Encode(args) => cli::transform::execute(args, Direction::Encode, config).await,
        Commands::Decode(args) => cli::transform::execute(args, Direction::Decode, config).await,
        Commands::Tables(args) => cli::tables::execute(args, &config).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}
