//! # packchain Command Pipeline Builder (`common::archive::stages`)
//!
//! File: cli/src/common/archive/stages.rs
//!
//! ## Overview
//!
//! Maps resolved format keys to runnable stages. Building a stage is where the
//! two fatal configuration outcomes are told apart:
//!
//! - a key the registry does not know is `PackError::UnsupportedFormat`
//!   (fix the request);
//! - a known key whose program is not on the host is `PackError::MissingTool`
//!   (install software).
//!
//! ## Architecture
//!
//! Each stage takes the current scratch artifact by value and returns the
//! path of the artifact it produced, so the executor threads one path through
//! the stages explicitly:
//!
//! ```text
//! files --ArchiverStage--> bundle[.tar] --CompressionStage--> bundle.tar[.gz]
//! ```
//!
//! | stage                | command                                   |
//! |----------------------|-------------------------------------------|
//! | tar                  | `tar -cf OUT FILES..`                     |
//! | zip (archiver)       | `zip -q -r OUT FILES..`                   |
//! | rar (archiver)       | `rar a -idq -r OUT FILES..`               |
//! | 7z (archiver)        | `7z a -bd -y OUT FILES..`                 |
//! | gzip / xz / bzip2    | `TOOL -f IN` (writes `IN.suffix`)         |
//! | zstd                 | `zstd -q -f --rm IN`                      |
//! | zip / rar / 7z       | bundle `IN` into `IN.suffix`, remove `IN` |
//!
use crate::common::archive::registry::{lookup_family, ToolFamily, ToolGroup};
use crate::common::fs::copy::copy_file;
use crate::common::process::run_command;
use crate::common::system::ToolLocator;
use crate::core::error::{PackError, Result};
use anyhow::Context;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Command-line shape of a family's build program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Invocation {
    Tar,
    Zip,
    Rar,
    SevenZip,
    /// Compresses `IN` into `IN.suffix` and removes `IN` by itself.
    InPlace,
    Zstd,
}

impl Invocation {
    fn for_family(group: ToolGroup, key: &str) -> Option<Self> {
        match (group, key) {
            (ToolGroup::Archiver, "tar") => Some(Invocation::Tar),
            (_, "zip") => Some(Invocation::Zip),
            (_, "rar") => Some(Invocation::Rar),
            (_, "7z") => Some(Invocation::SevenZip),
            (ToolGroup::Compression, "gzip" | "xz" | "bzip2") => Some(Invocation::InPlace),
            (ToolGroup::Compression, "zstd") => Some(Invocation::Zstd),
            _ => None,
        }
    }

    /// Arguments bundling `inputs` into the container `out`.
    /// `flatten` stores entries without their directory part.
    fn bundle_args(self, out: &Path, inputs: &[PathBuf], flatten: bool) -> Vec<OsString> {
        let mut args: Vec<OsString> = match self {
            Invocation::Tar => vec!["-cf".into()],
            Invocation::Zip if flatten => vec!["-q".into(), "-j".into()],
            Invocation::Zip => vec!["-q".into(), "-r".into()],
            Invocation::Rar if flatten => vec!["a".into(), "-idq".into(), "-ep".into()],
            Invocation::Rar => vec!["a".into(), "-idq".into(), "-r".into()],
            Invocation::SevenZip => vec!["a".into(), "-bd".into(), "-y".into()],
            Invocation::InPlace | Invocation::Zstd => Vec::new(),
        };
        args.push(out.as_os_str().to_owned());
        args.extend(inputs.iter().map(|p| operand(p)));
        args
    }
}

/// `path` as a command-line operand. A relative path starting with `-` gets a
/// `./` prefix so no bundler reads it as an option.
fn operand(path: &Path) -> OsString {
    if path.is_relative() && path.as_os_str().to_string_lossy().starts_with('-') {
        Path::new(".").join(path).into_os_string()
    } else {
        path.as_os_str().to_owned()
    }
}

/// A family bound to the executable that will run it.
#[derive(Debug, Clone)]
pub struct BoundTool {
    pub family: &'static ToolFamily,
    pub program: PathBuf,
    invocation: Invocation,
}

/// First stage: turns the input file list into one scratch artifact.
#[derive(Debug, Clone)]
pub enum ArchiverStage {
    /// Copies the single input file unchanged.
    PassThrough,
    Bundle(BoundTool),
}

/// Second stage: compresses the scratch artifact in place.
#[derive(Debug, Clone)]
pub enum CompressionStage {
    NoOp,
    Compress(BoundTool),
}

/// Builds the archiver stage for `format` (`None` = no archiver).
///
/// # Errors
///
/// `PackError::UnsupportedFormat` for an unknown key,
/// `PackError::MissingTool` if the program is not available.
pub fn build_archiver_stage(format: Option<&str>, tools: &dyn ToolLocator) -> Result<ArchiverStage> {
    match format {
        None => Ok(ArchiverStage::PassThrough),
        Some(key) => bind(ToolGroup::Archiver, key, tools).map(ArchiverStage::Bundle),
    }
}

/// Builds the compression stage for `format` (`None` = no compression).
///
/// # Errors
///
/// `PackError::UnsupportedFormat` for an unknown key,
/// `PackError::MissingTool` if the program is not available.
pub fn build_compression_stage(
    format: Option<&str>,
    tools: &dyn ToolLocator,
) -> Result<CompressionStage> {
    match format {
        None => Ok(CompressionStage::NoOp),
        Some(key) => bind(ToolGroup::Compression, key, tools).map(CompressionStage::Compress),
    }
}

fn bind(group: ToolGroup, key: &str, tools: &dyn ToolLocator) -> Result<BoundTool> {
    let unsupported = || PackError::UnsupportedFormat {
        format: key.to_string(),
    };
    let family = lookup_family(group, key).ok_or_else(unsupported)?;
    let invocation = Invocation::for_family(group, key).ok_or_else(unsupported)?;

    let name = tools.program_for(family.key, family.build_command);
    let program = tools.locate(name).ok_or_else(|| PackError::MissingTool {
        family: family.key.to_string(),
        program: name.to_string(),
    })?;
    debug!("Bound {} '{}' to {}", group, key, program.display());
    Ok(BoundTool {
        family,
        program,
        invocation,
    })
}

/// `path` with `.suffix` appended to its file name.
pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut raw = path.as_os_str().to_owned();
    raw.push(".");
    raw.push(suffix);
    PathBuf::from(raw)
}

fn expect_artifact(path: &Path, tool: &BoundTool) -> Result<()> {
    if !path.is_file() {
        anyhow::bail!(PackError::FileSystem(format!(
            "'{}' finished but did not produce {:?}",
            tool.family.key, path
        )));
    }
    Ok(())
}

impl ArchiverStage {
    /// Program that will run, if any.
    pub fn tool(&self) -> Option<&BoundTool> {
        match self {
            ArchiverStage::PassThrough => None,
            ArchiverStage::Bundle(tool) => Some(tool),
        }
    }

    /// Writes `files` into the artifact at `scratch` and returns the produced path.
    pub fn run(&self, files: &[PathBuf], scratch: PathBuf) -> Result<PathBuf> {
        match self {
            ArchiverStage::PassThrough => {
                let [source] = files else {
                    anyhow::bail!(PackError::Usage(format!(
                        "pass-through needs exactly one input, got {}",
                        files.len()
                    )));
                };
                copy_file(source, &scratch)?;
                Ok(scratch)
            }
            ArchiverStage::Bundle(tool) => {
                let out = with_suffix(&scratch, tool.family.suffix);
                info!("Archiving {} input(s) with '{}'", files.len(), tool.family.key);
                let args = tool.invocation.bundle_args(&out, files, false);
                run_command(&tool.program, &args)?;
                expect_artifact(&out, tool)?;
                Ok(out)
            }
        }
    }
}

impl CompressionStage {
    /// Program that will run, if any.
    pub fn tool(&self) -> Option<&BoundTool> {
        match self {
            CompressionStage::NoOp => None,
            CompressionStage::Compress(tool) => Some(tool),
        }
    }

    /// Compresses `artifact` and returns the path of the compressed artifact.
    pub fn run(&self, artifact: PathBuf) -> Result<PathBuf> {
        let CompressionStage::Compress(tool) = self else {
            return Ok(artifact);
        };
        let out = with_suffix(&artifact, tool.family.suffix);
        info!("Compressing {:?} with '{}'", artifact, tool.family.key);

        match tool.invocation {
            Invocation::InPlace => {
                run_command(
                    &tool.program,
                    &[OsString::from("-f"), artifact.into_os_string()],
                )?;
            }
            Invocation::Zstd => {
                let args: Vec<OsString> = vec![
                    "-q".into(),
                    "-f".into(),
                    "--rm".into(),
                    artifact.into_os_string(),
                ];
                run_command(&tool.program, &args)?;
            }
            bundler => {
                let args = bundler.bundle_args(&out, std::slice::from_ref(&artifact), true);
                run_command(&tool.program, &args)?;
                fs::remove_file(&artifact)
                    .with_context(|| format!("Failed to remove {:?}", artifact))?;
            }
        }
        expect_artifact(&out, tool)?;
        Ok(out)
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    /// Locator that knows a fixed set of programs.
    struct FakeTools(HashSet<&'static str>);

    impl ToolLocator for FakeTools {
        fn locate(&self, program: &str) -> Option<PathBuf> {
            self.0
                .contains(program)
                .then(|| PathBuf::from("/fake/bin").join(program))
        }
    }

    fn tools(names: &[&'static str]) -> FakeTools {
        FakeTools(names.iter().copied().collect())
    }

    fn err_of<T: std::fmt::Debug>(result: Result<T>) -> anyhow::Error {
        result.unwrap_err()
    }

    #[test]
    fn test_none_formats() {
        let none = tools(&[]);
        assert!(matches!(
            build_archiver_stage(None, &none).unwrap(),
            ArchiverStage::PassThrough
        ));
        assert!(matches!(
            build_compression_stage(None, &none).unwrap(),
            CompressionStage::NoOp
        ));
    }

    #[test]
    fn test_runnable_stages() {
        let host = tools(&["tar", "gzip"]);
        let archiver = build_archiver_stage(Some("tar"), &host).unwrap();
        assert_eq!(archiver.tool().unwrap().program, PathBuf::from("/fake/bin/tar"));
        let compression = build_compression_stage(Some("gzip"), &host).unwrap();
        assert_eq!(compression.tool().unwrap().family.suffix, "gz");
    }

    #[test]
    fn test_missing_tool() {
        let err = err_of(build_compression_stage(Some("xz"), &tools(&["tar"])));
        match err.downcast_ref::<PackError>() {
            Some(PackError::MissingTool { family, program }) => {
                assert_eq!(family, "xz");
                assert_eq!(program, "xz");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_format_is_not_missing_tool() {
        let everything = tools(&["tar", "gzip", "xz", "foobar"]);
        let err = err_of(build_compression_stage(Some("foobar"), &everything));
        assert!(matches!(
            err.downcast_ref::<PackError>(),
            Some(PackError::UnsupportedFormat { .. })
        ));
        let err = err_of(build_archiver_stage(Some("gzip"), &everything));
        assert!(matches!(
            err.downcast_ref::<PackError>(),
            Some(PackError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_program_override_is_located() {
        struct Pigz;
        impl ToolLocator for Pigz {
            fn locate(&self, program: &str) -> Option<PathBuf> {
                (program == "pigz").then(|| PathBuf::from("/opt/pigz"))
            }
            fn program_for<'a>(&'a self, family: &str, default: &'a str) -> &'a str {
                if family == "gzip" {
                    "pigz"
                } else {
                    default
                }
            }
        }
        let stage = build_compression_stage(Some("gzip"), &Pigz).unwrap();
        assert_eq!(stage.tool().unwrap().program, PathBuf::from("/opt/pigz"));
    }

    #[test]
    fn test_with_suffix() {
        assert_eq!(
            with_suffix(Path::new("/tmp/x/payload.tar"), "gz"),
            PathBuf::from("/tmp/x/payload.tar.gz")
        );
    }

    #[test]
    fn test_bundle_args() {
        let out = Path::new("out.zip");
        let inputs = [PathBuf::from("a"), PathBuf::from("dir")];
        let args = Invocation::Zip.bundle_args(out, &inputs, false);
        assert_eq!(args, ["-q", "-r", "out.zip", "a", "dir"]);
        let args = Invocation::Tar.bundle_args(Path::new("p.tar"), &inputs, false);
        assert_eq!(args, ["-cf", "p.tar", "a", "dir"]);
    }

    #[test]
    fn test_dash_inputs_are_not_options() {
        let inputs = [
            PathBuf::from("--totals"),
            PathBuf::from("-r"),
            PathBuf::from("/abs/-x"),
            PathBuf::from("b"),
        ];
        let args = Invocation::Tar.bundle_args(Path::new("p.tar"), &inputs, false);
        assert_eq!(args, ["-cf", "p.tar", "./--totals", "./-r", "/abs/-x", "b"]);
        let args = Invocation::SevenZip.bundle_args(Path::new("p.7z"), &inputs[..1], false);
        assert_eq!(args, ["a", "-bd", "-y", "p.7z", "./--totals"]);
    }

    #[test]
    fn test_pass_through_copies_single_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let input = dir.path().join("notes.txt");
        fs::write(&input, "data")?;
        let scratch = dir.path().join("payload");
        let produced = ArchiverStage::PassThrough.run(&[input], scratch.clone())?;
        assert_eq!(produced, scratch);
        assert_eq!(fs::read_to_string(&produced)?, "data");
        Ok(())
    }

    #[test]
    fn test_no_op_compression_returns_artifact() -> Result<()> {
        let artifact = PathBuf::from("/tmp/payload.tar");
        assert_eq!(CompressionStage::NoOp.run(artifact.clone())?, artifact);
        Ok(())
    }
}
