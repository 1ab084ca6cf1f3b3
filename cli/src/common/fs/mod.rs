//! # packchain Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//!
//! ## Overview
//!
//! Filesystem helpers for the pipeline executor:
//!
//! - **`io`**: directory creation with contextual errors.
//! - **`copy`**: single-file copy (pass-through stage) and the overwrite-move
//!   that relocates the finished artifact.
//!

pub mod copy;
pub mod io;
