//! # packchain Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! One module per top-level command. Each defines a Clap `Args` struct and a
//! `handle_*` function that `main.rs` routes to.
//!
//! ## Commands
//!
//! - `compress`: Resolve formats from the output name and run the pipeline
//! - `formats`: List the tool registry and tool availability
//!

/// Bundles and compresses files into one output. See `common::archive`.
pub mod compress;
/// Lists known formats and whether their tools are installed.
pub mod formats;
