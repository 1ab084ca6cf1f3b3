//! # packchain Pipeline Executor (`common::archive::pipeline`)
//!
//! File: cli/src/common/archive/pipeline.rs
//!
//! ## Overview
//!
//! Drives one compression request end to end:
//!
//! 1. Validate the request (output given, formats resolve, inputs present,
//!    a single non-directory input when there is no archiver).
//! 2. Report the plan when `informative` is set.
//! 3. Stop here on `dry_run`: no tool lookup, no filesystem writes.
//! 4. Build both stages, checking that their programs exist.
//! 5. Run the archiver into a scratch artifact, compress it in place, and move
//!    the result over the output path.
//!
//! The scratch artifact lives in a fresh `tempfile` directory, created in the
//! system temp directory unless a scratch directory is configured. It must not
//! sit next to the output: an input tree containing the output's directory
//! would otherwise pick it up. Exactly one invocation owns it. The artifact is
//! named after the output's base name, since bundling compressors store it as
//! the single entry of their container.
//!
use crate::common::archive::resolver::{resolve_request, FormatPair, AUTO};
use crate::common::archive::stages::{
    build_archiver_stage, build_compression_stage, ArchiverStage, CompressionStage,
};
use crate::common::fs::{copy::move_file, io::ensure_dir_exists};
use crate::common::system::ToolLocator;
use crate::core::error::{PackError, Result};
use anyhow::Context;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Artifact name used when the output has no usable base name.
const SCRATCH_NAME: &str = "payload";

/// Everything the caller hands the engine.
#[derive(Debug, Clone)]
pub struct CompressRequest {
    /// Output path, or `auto`.
    pub output: String,
    /// Explicit format such as `tar.gz`, or `auto`.
    pub format: String,
    pub files: Vec<PathBuf>,
    pub dry_run: bool,
    pub informative: bool,
    /// Where to create the scratch directory; defaults to the system temp dir.
    pub scratch_dir: Option<PathBuf>,
}

/// The two stages that will run, in order.
#[derive(Debug, Clone)]
pub struct Pipeline {
    pub archiver: ArchiverStage,
    pub compression: CompressionStage,
}

impl Pipeline {
    /// Builds both stages for `pair`.
    ///
    /// When the compressor is the same self-archiving tool as the archiver
    /// (`zip`/`zip`), its container is already compressed and the compression
    /// stage becomes a no-op.
    pub fn build(pair: &FormatPair, tools: &dyn ToolLocator) -> Result<Self> {
        let archiver = build_archiver_stage(pair.archiver.as_deref(), tools)?;
        let compression = if pair.archiver.is_some() && pair.archiver == pair.compression {
            debug!(
                "'{}' archives and compresses in one step",
                pair.archiver_name()
            );
            CompressionStage::NoOp
        } else {
            build_compression_stage(pair.compression.as_deref(), tools)?
        };
        Ok(Pipeline {
            archiver,
            compression,
        })
    }

    /// Runs the stages against `files` inside a fresh scratch directory and
    /// moves the result to `output`.
    pub fn run(&self, files: &[PathBuf], scratch_dir: Option<&Path>, output: &Path) -> Result<()> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(".packchain-");
        let scratch = match scratch_dir {
            Some(dir) => builder
                .tempdir_in(dir)
                .with_context(|| format!("Failed to create scratch directory in {:?}", dir))?,
            None => builder
                .tempdir()
                .context("Failed to create scratch directory in the system temp dir")?,
        };
        debug!("Scratch directory: {:?}", scratch.path());

        let artifact = scratch.path().join(scratch_stem(output));
        let artifact = self.archiver.run(files, artifact)?;
        let artifact = self.compression.run(artifact)?;
        move_file(&artifact, output)?;
        Ok(())
    }
}

/// Validates `request`, resolves its formats and, unless dry-running, runs
/// the pipeline. Returns the resolved pair.
///
/// # Errors
///
/// Any precondition violation is reported before the filesystem is touched.
/// See `PackError` for the categories.
pub fn compress(request: &CompressRequest, tools: &dyn ToolLocator) -> Result<FormatPair> {
    if request.output.is_empty() || request.output == AUTO {
        anyhow::bail!(PackError::Usage(
            "an output path is required for compression".to_string()
        ));
    }
    let output = PathBuf::from(&request.output);

    let pair = resolve_request(&request.output, &request.format)?;
    validate_inputs(&pair, &request.files, &output)?;

    if request.informative {
        println!("{}", describe_plan(&pair, &output, &request.files));
    }
    if request.dry_run {
        info!("Dry run: resolved {}, nothing executed", pair);
        return Ok(pair);
    }

    let pipeline = Pipeline::build(&pair, tools)?;
    info!(
        "Stages: archiver={:?}, compressor={:?}",
        pipeline.archiver.tool().map(|t| &t.program),
        pipeline.compression.tool().map(|t| &t.program)
    );

    ensure_dir_exists(&output_parent(&output))?;
    pipeline.run(&request.files, request.scratch_dir.as_deref(), &output)?;
    info!("Wrote {:?} ({})", output, pair);
    Ok(pair)
}

/// Input checks that do not depend on any external tool.
pub fn validate_inputs(pair: &FormatPair, files: &[PathBuf], output: &Path) -> Result<()> {
    if pair.is_empty() {
        anyhow::bail!(PackError::ResolutionFailed {
            name: output.display().to_string(),
        });
    }
    if files.is_empty() {
        anyhow::bail!(PackError::Usage("no input files given".to_string()));
    }
    if pair.archiver.is_none() {
        if files.len() > 1 {
            anyhow::bail!(PackError::Usage(format!(
                "{} input files need an archiver, but none was resolved ({})",
                files.len(),
                pair
            )));
        }
        if files[0].is_dir() {
            anyhow::bail!(PackError::Usage(format!(
                "{:?} is a directory and needs an archiver, but none was resolved ({})",
                files[0], pair
            )));
        }
    }
    if let Some(missing) = files.iter().find(|f| !f.exists()) {
        anyhow::bail!(PackError::Usage(format!("input {:?} does not exist", missing)));
    }
    if output.is_dir() {
        anyhow::bail!(PackError::Usage(format!(
            "output {:?} is an existing directory",
            output
        )));
    }
    Ok(())
}

fn output_parent(output: &Path) -> PathBuf {
    match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Base name of `output` up to its first dot: `out/bundle.tar.gz` -> `bundle`.
fn scratch_stem(output: &Path) -> String {
    output
        .file_name()
        .map(|n| n.to_string_lossy())
        .and_then(|n| n.split('.').next().map(str::to_string))
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| SCRATCH_NAME.to_string())
}

/// Human-readable plan printed for `--informative`.
pub fn describe_plan(pair: &FormatPair, output: &Path, files: &[PathBuf]) -> String {
    let names: Vec<String> = files.iter().map(|f| f.display().to_string()).collect();
    format!(
        "Archiver:    {}\nCompression: {}\nOutput:      {}\nFiles:       {}",
        pair.archiver_name(),
        pair.compression_name(),
        output.display(),
        names.join(" ")
    )
}
