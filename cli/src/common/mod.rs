//! # packchain Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared modules used by the command handlers:
//!
//! - **`archive`**: The format resolution engine and the archiver/compressor pipeline.
//! - **`fs`**: File copy, overwrite-move, and directory helpers.
//! - **`process`**: Running external tools and mapping their failures.
//! - **`system`**: Locating tools on the host.
//!

/// Format resolution engine and stage pipeline.
pub mod archive;
/// Filesystem helpers (copy, move, directories).
pub mod fs;
/// Blocking execution of external tools.
pub mod process;
/// Host tool lookup.
pub mod system;
