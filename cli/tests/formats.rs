//! # packchain Formats Integration Tests
//!
//! File: cli/tests/formats.rs
//!
//! ## Overview
//!
//! Checks the registry listing printed by `packchain formats`.
//!

mod common;
use common::*;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_formats_lists_registry() {
    let dir = tempdir().unwrap();
    packchain_in(dir.path())
        .arg("formats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Archiver formats:"))
        .stdout(predicate::str::contains("Compression formats:"))
        .stdout(predicate::str::contains(":atar:tgz"))
        .stdout(predicate::str::contains(":Azip:zip"));
}

#[test]
fn test_formats_check_reports_config_override() {
    let dir = tempdir().unwrap();
    std::fs::create_dir(dir.path().join(".git")).unwrap();
    std::fs::write(
        dir.path().join(".packchain.toml"),
        "[tools]\nxz = \"definitely-not-installed-xz\"\n",
    )
    .unwrap();

    packchain_in(dir.path())
        .args(["formats", "--check"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("definitely-not-installed-xz: missing"))
        .stderr(predicate::str::contains("Missing tools"));
}

#[test]
fn test_invalid_config_is_reported() {
    let dir = tempdir().unwrap();
    std::fs::create_dir(dir.path().join(".git")).unwrap();
    std::fs::write(dir.path().join(".packchain.toml"), "[tools]\nlz4 = \"lz4\"\n").unwrap();

    packchain_in(dir.path())
        .arg("formats")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration validation failed"));
}
