//! # packchain Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types used throughout packchain. Every failure
//! is terminal for the current invocation; nothing is retried. The variants are
//! kept distinct so an operator can tell a typo (`UnsupportedFormat`) apart from
//! an environment problem (`MissingTool`).
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `PackError`: A custom error enum using `thiserror` for specific error types
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible error handling
//!
//! The error types cover:
//! - Usage errors (missing output, no inputs, multiple files without an archiver)
//! - Malformed metadata-annotated extension tokens
//! - Format resolution failures and unsupported formats
//! - Missing external tools
//! - External command and filesystem failures
//!
//! ## Examples
//!
//! ```rust
//! // Return a specific error type
//! if files.is_empty() {
//!     anyhow::bail!(PackError::Usage("no input files given".into()));
//! }
//!
//! // Pattern matching on error types
//! match result {
//!     Err(e) if matches!(e.downcast_ref::<PackError>(), Some(PackError::MissingTool { .. })) => {
//!         println!("install the tool and retry");
//!     }
//!     other => other?,
//! }
//! ```
//!
use thiserror::Error;

/// Custom error type for packchain.
#[derive(Error, Debug)]
pub enum PackError {
    #[error("Usage error: {0}")]
    Usage(String),

    #[error("Malformed extension '{token}': {reason}")]
    MalformedExtension { token: String, reason: String },

    #[error("Could not resolve an archiver or compressor from '{name}'")]
    ResolutionFailed { name: String },

    #[error("Unsupported format: '{format}'")]
    UnsupportedFormat { format: String },

    #[error("Required tool '{program}' for format '{family}' was not found on PATH")]
    MissingTool { family: String, program: String },

    #[error("Missing tools: {}. Install them to use the matching formats.", .programs.join(", "))]
    MissingTools { programs: Vec<String> },

    #[error("External command failed: {cmd}, Status: {status}, Output:\n{output}")]
    ExternalCommand {
        cmd: String,
        status: String,
        output: String,
    },

    #[error("Filesystem error: {0}")]
    FileSystem(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;
