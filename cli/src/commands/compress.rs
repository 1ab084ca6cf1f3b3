//! # packchain Compress Command
//!
//! File: cli/src/commands/compress.rs
//!
//! ## Overview
//!
//! Implements `packchain compress`, which bundles and compresses input files
//! into one output file. The archiver and compressor are inferred from the
//! output name unless `--format` says otherwise.
//!
//! ## Usage
//!
//! ```bash
//! # tar + gzip, inferred from the name
//! packchain compress -o backup.tgz src/ Cargo.toml
//!
//! # explicit format, output name is free-form
//! packchain compress -f tar.xz -o backup.bin src/
//!
//! # show what would run without doing anything
//! packchain compress -n -i -o notes.txt.zst notes.txt
//! ```
//!
//! Flags left unset fall back to `[defaults]` in the configuration.
//!
use crate::common::archive::pipeline::{compress, CompressRequest};
use crate::common::archive::resolver::AUTO;
use crate::common::system::SystemPath;
use crate::core::config;
use crate::core::error::Result;
use clap::Parser;
use std::path::PathBuf;

/// Arguments for the 'compress' command.
#[derive(Parser, Debug)]
pub struct CompressArgs {
    /// Output file. Its extensions select the format unless --format is given.
    #[arg(short, long, default_value = AUTO)]
    output: String,

    /// Explicit format, e.g. `tar.gz`, `tgz`, `zip` or `:atar:gz`.
    #[arg(short, long, env = "PACKCHAIN_FORMAT")]
    format: Option<String>,

    /// Resolve and validate only; run nothing and write nothing.
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Print the resolved formats and input files before running.
    #[arg(short, long)]
    informative: bool,

    /// Files and directories to compress.
    files: Vec<PathBuf>,
}

/// Handler function for the 'compress' command.
pub fn handle_compress(args: CompressArgs) -> Result<()> {
    tracing::info!("Handling compress command...");
    let cfg = config::load_config()?;

    let request = CompressRequest {
        output: args.output,
        format: args.format.unwrap_or(cfg.defaults.format),
        files: args.files,
        dry_run: args.dry_run,
        informative: args.informative || cfg.defaults.informative,
        scratch_dir: cfg.defaults.scratch_dir.map(PathBuf::from),
    };
    tracing::debug!("Compress request: {:?}", request);

    let tools = SystemPath::with_overrides(cfg.tools);
    let pair = compress(&request, &tools)?;
    if request.dry_run {
        println!("Dry run: {} -> {}", pair, request.output);
    }
    Ok(())
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compress_args_parsing() {
        let args =
            CompressArgs::try_parse_from(["compress", "-o", "out.tgz", "a", "b"]).unwrap();
        assert_eq!(args.output, "out.tgz");
        assert_eq!(args.files, vec![PathBuf::from("a"), PathBuf::from("b")]);
        assert!(!args.dry_run);
        assert!(!args.informative);
    }

    #[test]
    fn test_compress_args_defaults_and_flags() {
        let args =
            CompressArgs::try_parse_from(["compress", "-n", "-i", "-f", "tar.xz", "a"]).unwrap();
        assert_eq!(args.output, AUTO);
        assert_eq!(args.format.as_deref(), Some("tar.xz"));
        assert!(args.dry_run);
        assert!(args.informative);
    }
}
