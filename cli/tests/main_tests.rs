//! # packchain CLI Main Integration Tests
//!
//! File: cli/tests/main_tests.rs
//!
//! ## Overview
//!
//! Verifies top-level behaviour of the `packchain` binary: `--help`,
//! `--version`, and the exit status for unknown commands.
//!

mod common;
use common::*;
use predicates::prelude::*;

#[test]
fn test_help_lists_commands() {
    packchain_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("compress"))
        .stdout(predicate::str::contains("formats"));
}

#[test]
fn test_version() {
    packchain_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_unknown_command_fails() {
    packchain_cmd().arg("explode").assert().failure();
}
