//! # packchain Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! Entry point for the packchain CLI. It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Routing execution to the command handlers
//! - Printing a single-line diagnostic and exiting non-zero on failure
//!
//! ## Examples
//!
//! ```bash
//! # Get help
//! packchain --help
//!
//! # Create a gzipped tarball with debug logging
//! packchain -vv compress -o backup.tar.gz src/
//! ```
//!
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // Command handlers (compress, formats)
mod common; // Archive engine and shared utilities
mod core; // Errors and configuration

/// Defines the top-level command-line arguments structure using Clap's derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "packchain",
    about = "Resolve archive names like .tar.gz or .tgz into tool pipelines and run them",
    long_about = "Bundles and compresses files by chaining an archiver (tar, zip, ...) and a \n\
                  compressor (gzip, xz, zstd, ...) chosen from the output file's extensions.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

/// Enum defining all available top-level commands.
#[derive(Parser, Debug)]
enum Commands {
    #[command(alias = "c")]
    Compress(commands::compress::CompressArgs),
    #[command(alias = "f")]
    Formats(commands::formats::FormatsArgs),
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let command_result = match cli.command {
        Commands::Compress(args) => commands::compress::handle_compress(args),
        Commands::Formats(args) => commands::formats::handle_formats(args),
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
