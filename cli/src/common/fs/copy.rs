//! # packchain Filesystem Copy/Move Operations
//!
//! File: cli/src/common/fs/copy.rs
//!
//! ## Overview
//!
//! File-level copy and move helpers used by the pipeline executor:
//!
//! - **`copy_file`**: seeds the scratch artifact when no archiver runs.
//! - **`move_file`**: relocates the finished artifact to the requested output
//!   path, overwriting whatever is there. A plain `rename` is tried first; if
//!   source and target live on different filesystems the move falls back to
//!   `fs_extra`, which copies and then removes the source.
//!
use crate::core::error::{PackError, Result};
use anyhow::Context;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Copies a single regular file from `source` to `target`, replacing `target`.
///
/// # Errors
///
/// Returns an `Err` if `source` is a directory or the copy fails.
pub fn copy_file(source: &Path, target: &Path) -> Result<()> {
    if source.is_dir() {
        anyhow::bail!(PackError::FileSystem(format!(
            "Cannot copy directory {:?} as a single file",
            source
        )));
    }
    let bytes = fs::copy(source, target)
        .with_context(|| format!("Failed to copy {:?} to {:?}", source, target))?;
    debug!("Copied {} bytes from {:?} to {:?}", bytes, source, target);
    Ok(())
}

/// Moves `source` to `target`, overwriting an existing file at `target`.
///
/// # Errors
///
/// Returns an `Err` if both the rename and the copy-based fallback fail.
pub fn move_file(source: &Path, target: &Path) -> Result<()> {
    match fs::rename(source, target) {
        Ok(()) => {
            info!("Moved {:?} to {:?}", source, target);
            Ok(())
        }
        Err(rename_err) => {
            debug!(
                "rename {:?} -> {:?} failed ({}), falling back to fs_extra",
                source, target, rename_err
            );
            let mut options = fs_extra::file::CopyOptions::new();
            options.overwrite = true;
            fs_extra::file::move_file(source, target, &options).map_err(|e| {
                anyhow::anyhow!(e).context(format!("Failed to move {:?} to {:?}", source, target))
            })?;
            info!("Moved {:?} to {:?} (copy + remove)", source, target);
            Ok(())
        }
    }
}
