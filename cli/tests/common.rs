//! # packchain CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration test files (`compress.rs`, `formats.rs`,
//! `main_tests.rs`). Each file in `cli/tests/` is compiled as its own test
//! crate and runs the compiled `packchain` binary.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::path::Path;

/// # Get packchain Command (`packchain_cmd`)
///
/// Creates an `assert_cmd::Command` for the compiled `packchain` binary.
/// `RUST_LOG` is cleared so log lines never leak into asserted output.
///
/// ## Panics
/// Panics if the `packchain` binary cannot be found via `Command::cargo_bin`.
pub fn packchain_cmd() -> Command {
    let mut cmd =
        Command::cargo_bin("packchain").expect("Failed to find packchain binary for testing");
    cmd.env_remove("RUST_LOG").env_remove("PACKCHAIN_FORMAT");
    cmd
}

/// Same as `packchain_cmd`, run from `dir` so no project config above it is picked up
/// unless the test puts one there.
pub fn packchain_in(dir: &Path) -> Command {
    let mut cmd = packchain_cmd();
    cmd.current_dir(dir);
    cmd
}

/// True if every program in `programs` is on PATH.
pub fn have_tools(programs: &[&str]) -> bool {
    programs.iter().all(|p| which::which(p).is_ok())
}
