//! # packchain Format Resolver (`common::archive::resolver`)
//!
//! File: cli/src/common/archive/resolver.rs
//!
//! ## Overview
//!
//! Turns a filename (or a format string such as `tar.gz`) into the pair of
//! tool families that have to run: an archiver and a compressor. Either side
//! may be `none`.
//!
//! ## Architecture
//!
//! Resolution is table-driven and works on the trailing tokens produced by
//! [`super::extension::parse_extensions`]:
//!
//! 1. The nearest token (`ext3`) is decoded through the metadata resolver and
//!    matched against every compression family's extensions. Compression is
//!    tried first because compound extensions like `tgz` are compressor
//!    extensions with an implied archiver.
//! 2. On a match, the descriptor's overrides and then the token's own
//!    overrides are applied in order. If neither forced an archiver, the next
//!    token (`ext2`) is matched against archiver extensions.
//! 3. Without a compression match, `ext3` is matched against archiver
//!    extensions on its own.
//!
//! [`resolve_formats`] is a pure function of its input. [`resolve_request`]
//! layers the `auto` sentinels and the error policy on top of it.
//!
use crate::common::archive::extension::parse_extensions;
use crate::common::archive::metadata::resolve_metadata;
use crate::common::archive::registry::{find_by_extension, Override, Scope, ToolGroup};
use crate::core::error::{PackError, Result};
use std::fmt;
use tracing::debug;

/// Sentinel meaning "derive this value from the other input".
pub const AUTO: &str = "auto";

/// Display form of an axis with no tool.
pub const NONE: &str = "none";

/// The resolved (archiver, compression) pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatPair {
    pub archiver: Option<String>,
    pub compression: Option<String>,
}

impl FormatPair {
    #[cfg(test)]
    pub fn new(archiver: Option<&str>, compression: Option<&str>) -> Self {
        FormatPair {
            archiver: archiver.map(str::to_string),
            compression: compression.map(str::to_string),
        }
    }

    /// True when neither axis resolved to a tool.
    pub fn is_empty(&self) -> bool {
        self.archiver.is_none() && self.compression.is_none()
    }

    pub fn archiver_name(&self) -> &str {
        self.archiver.as_deref().unwrap_or(NONE)
    }

    pub fn compression_name(&self) -> &str {
        self.compression.as_deref().unwrap_or(NONE)
    }

    fn apply(&mut self, overrides: &[Override]) {
        for o in overrides {
            if o.scope.covers_archiver() {
                self.archiver = Some(o.tool.to_string());
            }
            if o.scope.covers_compression() {
                self.compression = Some(o.tool.to_string());
            }
            if o.scope == Scope::Encryption {
                debug!("Ignoring encryption override '{}'", o);
            }
        }
    }
}

impl fmt::Display for FormatPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "archiver={}, compression={}",
            self.archiver_name(),
            self.compression_name()
        )
    }
}

/// Resolves the archiver and compression formats implied by `name`.
///
/// An extension that matches nothing leaves its axis `none`; that is not an
/// error here. The only errors come from malformed metadata tokens.
pub fn resolve_formats(name: &str) -> Result<FormatPair> {
    let tokens = parse_extensions(name);
    let mut pair = FormatPair::default();
    debug!(
        "Tokens of '{}': ext1={:?} ext2={:?} ext3={:?}",
        name,
        tokens.ext1(),
        tokens.ext2(),
        tokens.ext3()
    );

    let Some(ext3) = tokens.ext3() else {
        debug!("'{}' has no extension tokens", name);
        return Ok(pair);
    };
    let nearest = resolve_metadata(ext3)?;

    if let Some((family, descriptor)) = find_by_extension(ToolGroup::Compression, &nearest.ext) {
        debug!(
            "'{}' matched compression family '{}' via '{}'",
            nearest.ext, family.key, descriptor
        );
        pair.compression = Some(family.key.to_string());
        pair.apply(descriptor.overrides);
        pair.apply(&nearest.overrides);

        let forced_archiver = descriptor
            .overrides
            .iter()
            .chain(&nearest.overrides)
            .any(|o| o.scope.covers_archiver());
        if !forced_archiver {
            if let Some(ext2) = tokens.ext2() {
                let hint = resolve_metadata(ext2)?;
                if let Some((archiver, _)) = find_by_extension(ToolGroup::Archiver, &hint.ext) {
                    debug!("'{}' matched archiver family '{}'", hint.ext, archiver.key);
                    pair.archiver = Some(archiver.key.to_string());
                }
            }
        }
    } else {
        if let Some((archiver, _)) = find_by_extension(ToolGroup::Archiver, &nearest.ext) {
            debug!("'{}' matched archiver family '{}'", nearest.ext, archiver.key);
            pair.archiver = Some(archiver.key.to_string());
        }
        pair.apply(&nearest.overrides);
    }

    debug!("Resolved '{}' to {}", name, pair);
    Ok(pair)
}

/// Resolves the pair for a compression request.
///
/// `format` other than `auto` is parsed as the filename `x.<format>` and takes
/// precedence over `output`.
///
/// # Errors
///
/// - `PackError::Usage` if both inputs are `auto`.
/// - `PackError::UnsupportedFormat` if an explicit format resolves to nothing.
/// - `PackError::ResolutionFailed` if the output name resolves to nothing.
pub fn resolve_request(output: &str, format: &str) -> Result<FormatPair> {
    if format != AUTO {
        let pair = resolve_formats(&format!("x.{}", format))?;
        if pair.is_empty() {
            anyhow::bail!(PackError::UnsupportedFormat {
                format: format.to_string(),
            });
        }
        return Ok(pair);
    }

    if output == AUTO {
        anyhow::bail!(PackError::Usage(
            "cannot derive a format when both output and format are 'auto'".to_string()
        ));
    }

    let pair = resolve_formats(output)?;
    if pair.is_empty() {
        anyhow::bail!(PackError::ResolutionFailed {
            name: output.to_string(),
        });
    }
    Ok(pair)
}
