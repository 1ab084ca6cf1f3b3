//! # packchain Formats Command
//!
//! File: cli/src/commands/formats.rs
//!
//! ## Overview
//!
//! Implements `packchain formats`, which prints the tool registry: every
//! archiver and compression family, the extensions that select it, and
//! whether its program is available on this host.
//!
//! ## Usage
//!
//! ```bash
//! # List formats and tool availability
//! packchain formats
//!
//! # Fail if any registered tool is missing
//! packchain formats --check
//! ```
//!
use crate::common::archive::registry::{families, ToolFamily, ToolGroup};
use crate::common::system::{SystemPath, ToolLocator};
use crate::core::config;
use crate::core::error::{PackError, Result};
use clap::Parser;

/// Arguments for the 'formats' command.
#[derive(Parser, Debug)]
pub struct FormatsArgs {
    /// Exit with an error if any registered tool is missing.
    #[arg(long)]
    check: bool,
}

/// Handler function for the 'formats' command.
pub fn handle_formats(args: FormatsArgs) -> Result<()> {
    tracing::info!("Handling formats command...");
    let cfg = config::load_config()?;
    let tools = SystemPath::with_overrides(cfg.tools);

    let mut missing = Vec::new();
    for group in [ToolGroup::Archiver, ToolGroup::Compression] {
        println!("{} formats:", capitalize(&group.to_string()));
        for family in families(group) {
            let program = tools.program_for(family.key, family.build_command);
            let found = tools.locate(program).is_some();
            if !found && !missing.contains(&program) {
                missing.push(program);
            }
            println!("  {}", describe_family(family, program, found));
        }
    }

    if missing.is_empty() {
        println!("All tools found.");
    } else {
        println!("Missing tools: {}", missing.join(", "));
        if args.check {
            require_all(&missing)?;
        }
    }
    Ok(())
}

/// Fails with `PackError::MissingTools` if any program in `missing` is listed.
fn require_all(missing: &[&str]) -> Result<()> {
    if !missing.is_empty() {
        anyhow::bail!(PackError::MissingTools {
            programs: missing.iter().map(|p| p.to_string()).collect(),
        });
    }
    Ok(())
}

/// One listing line, e.g. `gzip    gz, :atar:tgz   extract: gunzip  (gzip: found)`.
fn describe_family(family: &ToolFamily, program: &str, found: bool) -> String {
    let extensions: Vec<String> = family.extensions.iter().map(|d| d.to_string()).collect();
    let extensions = if extensions.is_empty() {
        "-".to_string()
    } else {
        extensions.join(", ")
    };
    format!(
        "{:<8}{:<40}extract: {:<8}({}: {})",
        family.key,
        extensions,
        family.extract_command,
        program,
        if found { "found" } else { "missing" }
    )
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
