//! # packchain Archive Engine (`common::archive`)
//!
//! File: cli/src/common/archive/mod.rs
//!
//! ## Overview
//!
//! The format resolution engine and command pipeline builder. A filename such
//! as `backup.tar.gz` (or an explicit format like `tgz`) is resolved into an
//! archiver and a compressor, which are then run one after the other against
//! a scratch artifact.
//!
//! ## Architecture
//!
//! Submodules, leaves first:
//!
//! - **`registry`**: Static table of tool families and their extensions.
//! - **`extension`**: Splits a filename into its trailing tokens.
//! - **`metadata`**: Decodes `:atar:tgz`-style override tokens.
//! - **`resolver`**: Produces the `(archiver, compression)` `FormatPair`.
//! - **`stages`**: Binds each axis to a runnable stage, checking tool presence.
//! - **`pipeline`**: Validates a request and runs the stages.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::archive::{pipeline, resolver};
//! use crate::common::system::SystemPath;
//!
//! # fn run() -> anyhow::Result<()> {
//! let pair = resolver::resolve_formats("backup.tgz")?;
//! assert_eq!(pair.archiver_name(), "tar");
//!
//! let request = pipeline::CompressRequest {
//!     output: "backup.tgz".into(),
//!     format: "auto".into(),
//!     files: vec!["src".into()],
//!     dry_run: false,
//!     informative: false,
//!     scratch_dir: None,
//! };
//! pipeline::compress(&request, &SystemPath::default())?;
//! # Ok(())
//! # }
//! ```
//!

pub mod extension;
pub mod metadata;
pub mod pipeline;
pub mod registry;
pub mod resolver;
pub mod stages;
