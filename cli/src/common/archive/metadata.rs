//! # packchain Metadata Resolver (`common::archive::metadata`)
//!
//! File: cli/src/common/archive/metadata.rs
//!
//! ## Overview
//!
//! Decodes metadata-annotated extension tokens. A plain token such as `gz` is
//! returned untouched. A token starting with `:` is a list of overrides
//! followed by the bare extension:
//!
//! ```text
//! :atar:tgz      -> ("tgz", [archiver = tar])
//! :atar:cxz:foo  -> ("foo", [archiver = tar, compression = xz])
//! :Azip:zip      -> ("zip", [all = zip])
//! ```
//!
//! Each override segment is a scope letter (`a`, `c`, `e`, `A`) immediately
//! followed by a tool-family key. Later overrides win over earlier ones for the
//! same scope; applying them is the resolver's job, this module only decodes.
//!
use crate::common::archive::registry::{Override, Scope};
use crate::core::error::{PackError, Result};
use std::borrow::Cow;

/// Marks a token as carrying overrides, and separates its segments.
pub const DELIMITER: char = ':';

/// A decoded token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedToken {
    pub ext: String,
    pub overrides: Vec<Override>,
}

/// Splits `token` into its bare extension and ordered overrides.
///
/// # Errors
///
/// Returns `PackError::MalformedExtension` if an override segment has an
/// unknown scope letter or no tool key.
pub fn resolve_metadata(token: &str) -> Result<ResolvedToken> {
    let Some(body) = token.strip_prefix(DELIMITER) else {
        return Ok(ResolvedToken {
            ext: token.to_string(),
            overrides: Vec::new(),
        });
    };

    let mut segments: Vec<&str> = body.split(DELIMITER).collect();
    // split always yields at least one item
    let ext = segments.pop().unwrap_or_default();

    let mut overrides = Vec::with_capacity(segments.len());
    for segment in segments.into_iter().filter(|s| !s.is_empty()) {
        overrides.push(decode_segment(token, segment)?);
    }

    tracing::trace!("Decoded '{}' into ext '{}' with {:?}", token, ext, overrides);
    Ok(ResolvedToken {
        ext: ext.to_string(),
        overrides,
    })
}

fn decode_segment(token: &str, segment: &str) -> Result<Override> {
    let mut chars = segment.chars();
    let code = chars.next().unwrap_or_default();
    let scope = Scope::from_code(code).ok_or_else(|| PackError::MalformedExtension {
        token: token.to_string(),
        reason: format!("unknown scope '{}' in segment '{}'", code, segment),
    })?;
    let key = chars.as_str();
    if key.is_empty() {
        anyhow::bail!(PackError::MalformedExtension {
            token: token.to_string(),
            reason: format!("segment '{}' names no tool", segment),
        });
    }
    Ok(Override {
        scope,
        tool: Cow::Owned(key.to_string()),
    })
}
