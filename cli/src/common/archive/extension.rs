//! # packchain Extension Parser (`common::archive::extension`)
//!
//! File: cli/src/common/archive/extension.rs
//!
//! ## Overview
//!
//! Splits a filename into its trailing dot-separated tokens. Only the final
//! path component is looked at and the base name (everything before the first
//! dot) is dropped. At most the last three tokens are kept, in filename order:
//!
//! | filename           | ext1 | ext2 | ext3 |
//! |--------------------|------|------|------|
//! | `archive.tar.gz`   |      | tar  | gz   |
//! | `a.tar.gz.gpg`     | tar  | gz   | gpg  |
//! | `file.gz`          |      |      | gz   |
//! | `file`             |      |      |      |
//!
use std::path::Path;

/// How many trailing tokens the resolver considers.
pub const MAX_TOKENS: usize = 3;

/// Up to three trailing extension tokens, oldest-first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionTokens {
    tokens: Vec<String>,
}

impl ExtensionTokens {
    /// All kept tokens, oldest-first.
    #[cfg(test)]
    pub fn as_slice(&self) -> &[String] {
        &self.tokens
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// `n`-th token counted from the end (0 = nearest).
    fn from_end(&self, n: usize) -> Option<&str> {
        self.tokens
            .len()
            .checked_sub(n + 1)
            .map(|i| self.tokens[i].as_str())
    }

    /// Furthest from the end.
    pub fn ext1(&self) -> Option<&str> {
        self.from_end(2)
    }

    pub fn ext2(&self) -> Option<&str> {
        self.from_end(1)
    }

    /// Nearest to the end.
    pub fn ext3(&self) -> Option<&str> {
        self.from_end(0)
    }
}

/// Parses the trailing extension tokens of `filename`.
pub fn parse_extensions(filename: &str) -> ExtensionTokens {
    let name = Path::new(filename)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string());

    let mut parts: Vec<String> = name.split('.').skip(1).map(str::to_string).collect();
    if parts.len() > MAX_TOKENS {
        parts.drain(..parts.len() - MAX_TOKENS);
    }
    ExtensionTokens { tokens: parts }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_tokens() {
        let tokens = parse_extensions("archive.tar.gz");
        assert_eq!(tokens.as_slice(), ["tar", "gz"]);
        assert_eq!(tokens.ext1(), None);
        assert_eq!(tokens.ext2(), Some("tar"));
        assert_eq!(tokens.ext3(), Some("gz"));
    }

    #[test]
    fn test_keeps_last_three() {
        let tokens = parse_extensions("backup.2024.01.tar.gz.gpg");
        assert_eq!(tokens.as_slice(), ["tar", "gz", "gpg"]);
        assert_eq!(tokens.ext1(), Some("tar"));
    }

    #[test]
    fn test_no_extension() {
        assert!(parse_extensions("file").is_empty());
        assert_eq!(parse_extensions("file").ext3(), None);
    }

    #[test]
    fn test_single_token_is_ext3() {
        let tokens = parse_extensions("file.gz");
        assert_eq!(tokens.ext3(), Some("gz"));
        assert_eq!(tokens.ext2(), None);
    }

    #[test]
    fn test_ignores_dotted_directories() {
        let tokens = parse_extensions("./out.d/v1.2/archive.tgz");
        assert_eq!(tokens.as_slice(), ["tgz"]);
    }

    #[test]
    fn test_metadata_token_kept_whole() {
        let tokens = parse_extensions("x.:atar:gz");
        assert_eq!(tokens.as_slice(), [":atar:gz"]);
    }
}
