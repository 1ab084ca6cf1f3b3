//! # packchain System Utilities Module (`common::system`)
//!
//! File: cli/src/common/system/mod.rs
//!
//! ## Overview
//!
//! Host inspection: finding the external archivers and compressors the
//! pipeline shells out to. Lookup sits behind the [`ToolLocator`] trait so the
//! pipeline builder can be exercised without touching `PATH`.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::system::{SystemPath, ToolLocator};
//!
//! let tools = SystemPath::default();
//! if tools.locate("xz").is_none() {
//!     println!("xz is not installed");
//! }
//! ```
//!
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::debug;

/// Resolves program names to executables.
pub trait ToolLocator {
    /// Full path of `program`, or `None` if the host does not have it.
    fn locate(&self, program: &str) -> Option<PathBuf>;

    /// Program name to run for the registry's `default` command of `family`.
    /// Allows configuration to swap e.g. `gzip` for `pigz`.
    fn program_for<'a>(&'a self, _family: &str, default: &'a str) -> &'a str {
        default
    }
}

/// Looks tools up on `PATH` using the `which` crate.
#[derive(Debug, Default, Clone)]
pub struct SystemPath {
    /// Family key -> program name to use instead of the registry default.
    program_overrides: HashMap<String, String>,
}

impl SystemPath {
    pub fn with_overrides(program_overrides: HashMap<String, String>) -> Self {
        SystemPath { program_overrides }
    }
}

impl ToolLocator for SystemPath {
    fn locate(&self, program: &str) -> Option<PathBuf> {
        match which::which(program) {
            Ok(path) => {
                debug!("Found '{}' at {}", program, path.display());
                Some(path)
            }
            Err(e) => {
                debug!("'{}' not found on PATH: {}", program, e);
                None
            }
        }
    }

    fn program_for<'a>(&'a self, family: &str, default: &'a str) -> &'a str {
        self.program_overrides
            .get(family)
            .map(String::as_str)
            .unwrap_or(default)
    }
}
