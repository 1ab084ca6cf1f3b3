//! # packchain Process Execution Utilities (`common::process`)
//!
//! File: cli/src/common/process.rs
//!
//! ## Overview
//!
//! Runs an external tool to completion and maps a non-zero exit into
//! `PackError::ExternalCommand`. Execution is blocking; there is no timeout,
//! so a stuck tool blocks the caller.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::process::run_command;
//! use std::ffi::OsString;
//! use std::path::Path;
//!
//! # fn run_example() -> crate::core::error::Result<()> {
//! run_command(Path::new("/usr/bin/gzip"), &[OsString::from("-f"), OsString::from("payload.tar")])?;
//! # Ok(())
//! # }
//! ```
//!
use crate::core::error::{PackError, Result};
use anyhow::Context;
use std::ffi::OsString;
use std::path::Path;
use std::process::Command;
use tracing::{debug, info};

/// Runs `program` with `args`, waiting for it to exit.
///
/// stdout/stderr are captured and only surfaced if the command fails.
///
/// # Errors
///
/// Returns an `Err` if the process cannot be spawned, or
/// `PackError::ExternalCommand` if it exits unsuccessfully.
pub fn run_command(program: &Path, args: &[OsString]) -> Result<()> {
    let cmdline = describe(program, args);
    info!("Running: {}", cmdline);

    let output = Command::new(program)
        .args(args)
        .output()
        .with_context(|| format!("Failed to execute '{}'", program.display()))?;

    debug!(
        "'{}' exited with {}, stdout='{}', stderr='{}'",
        program.display(),
        output.status,
        String::from_utf8_lossy(&output.stdout).trim(),
        String::from_utf8_lossy(&output.stderr).trim()
    );

    if !output.status.success() {
        let mut combined = String::from_utf8_lossy(&output.stderr).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stdout));
        anyhow::bail!(PackError::ExternalCommand {
            cmd: cmdline,
            status: output.status.to_string(),
            output: combined.trim().to_string(),
        });
    }
    Ok(())
}

/// Shell-like rendering of a command line, for logs and errors.
pub fn describe(program: &Path, args: &[OsString]) -> String {
    let mut line = program.display().to_string();
    for arg in args {
        line.push(' ');
        line.push_str(&arg.to_string_lossy());
    }
    line
}
