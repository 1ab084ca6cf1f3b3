//! # packchain Tool Registry (`common::archive::registry`)
//!
//! File: cli/src/common/archive/registry.rs
//!
//! ## Overview
//!
//! Static, declarative table of the tool families packchain knows about. Each
//! family records the program used to build an archive, the program used to
//! extract it, the canonical suffix appended to the scratch artifact, and the
//! filename extensions that select it.
//!
//! ## Architecture
//!
//! Families are split into two groups:
//!
//! - **Archiver**: bundles files into one container (`tar`, plus the
//!   self-archiving `zip`, `rar` and `7z` so an `A` override resolves to a
//!   buildable stage).
//! - **Compression**: reduces a single artifact (`gzip`, `xz`, `bzip2`,
//!   `zstd`, `rar`, `zip`, `7z`).
//!
//! Extension descriptors carry their overrides as structured [`Override`]
//! values. The textual `:atar:tgz` form is only decoded for user input, see
//! [`super::metadata`].
//!
//! Adding an archiver family is one more row in [`ARCHIVERS`].
//!
use std::borrow::Cow;
use std::fmt;

/// Which side of the pipeline a tool family belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolGroup {
    Archiver,
    Compression,
}

impl fmt::Display for ToolGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolGroup::Archiver => write!(f, "archiver"),
            ToolGroup::Compression => write!(f, "compression"),
        }
    }
}

/// Scope an override applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// `a`
    Archiver,
    /// `c`
    Compression,
    /// `e`: parsed, not yet acted on.
    Encryption,
    /// `A`: every scope at once.
    All,
}

impl Scope {
    /// Decodes a single scope letter.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'a' => Some(Scope::Archiver),
            'c' => Some(Scope::Compression),
            'e' => Some(Scope::Encryption),
            'A' => Some(Scope::All),
            _ => None,
        }
    }

    pub fn code(self) -> char {
        match self {
            Scope::Archiver => 'a',
            Scope::Compression => 'c',
            Scope::Encryption => 'e',
            Scope::All => 'A',
        }
    }

    /// True if this scope forces the archiver axis.
    pub fn covers_archiver(self) -> bool {
        matches!(self, Scope::Archiver | Scope::All)
    }

    /// True if this scope forces the compression axis.
    pub fn covers_compression(self) -> bool {
        matches!(self, Scope::Compression | Scope::All)
    }
}

/// "This extension forces `scope` to use `tool`."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Override {
    pub scope: Scope,
    pub tool: Cow<'static, str>,
}

impl Override {
    const fn fixed(scope: Scope, tool: &'static str) -> Self {
        Override {
            scope,
            tool: Cow::Borrowed(tool),
        }
    }
}

impl fmt::Display for Override {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.scope.code(), self.tool)
    }
}

/// A recognised extension plus the overrides it implies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionDescriptor {
    pub ext: &'static str,
    pub overrides: &'static [Override],
}

impl ExtensionDescriptor {
    const fn bare(ext: &'static str) -> Self {
        ExtensionDescriptor {
            ext,
            overrides: &[],
        }
    }

    const fn with(ext: &'static str, overrides: &'static [Override]) -> Self {
        ExtensionDescriptor { ext, overrides }
    }
}

impl fmt::Display for ExtensionDescriptor {
    /// Renders the annotated form, e.g. `:atar:tgz`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for o in self.overrides {
            write!(f, ":{}", o)?;
        }
        if self.overrides.is_empty() {
            write!(f, "{}", self.ext)
        } else {
            write!(f, ":{}", self.ext)
        }
    }
}

/// One row of the registry.
#[derive(Debug, PartialEq, Eq)]
pub struct ToolFamily {
    pub key: &'static str,
    pub build_command: &'static str,
    /// Used by extraction only; kept for symmetry.
    pub extract_command: &'static str,
    /// Appended to the scratch artifact by this family's stage.
    pub suffix: &'static str,
    pub extensions: &'static [ExtensionDescriptor],
}

const TAR_ARCHIVER: &[Override] = &[Override::fixed(Scope::Archiver, "tar")];
const RAR_ALL: &[Override] = &[Override::fixed(Scope::All, "rar")];
const ZIP_ALL: &[Override] = &[Override::fixed(Scope::All, "zip")];
const SEVENZ_ALL: &[Override] = &[Override::fixed(Scope::All, "7z")];

/// Archiver families.
pub static ARCHIVERS: &[ToolFamily] = &[
    ToolFamily {
        key: "tar",
        build_command: "tar",
        extract_command: "tar",
        suffix: "tar",
        extensions: &[ExtensionDescriptor::bare("tar")],
    },
    ToolFamily {
        key: "zip",
        build_command: "zip",
        extract_command: "unzip",
        suffix: "zip",
        extensions: &[],
    },
    ToolFamily {
        key: "rar",
        build_command: "rar",
        extract_command: "unrar",
        suffix: "rar",
        extensions: &[],
    },
    ToolFamily {
        key: "7z",
        build_command: "7z",
        extract_command: "7z",
        suffix: "7z",
        extensions: &[],
    },
];

/// Compression families.
pub static COMPRESSORS: &[ToolFamily] = &[
    ToolFamily {
        key: "gzip",
        build_command: "gzip",
        extract_command: "gunzip",
        suffix: "gz",
        extensions: &[
            ExtensionDescriptor::bare("gz"),
            ExtensionDescriptor::with("tgz", TAR_ARCHIVER),
        ],
    },
    ToolFamily {
        key: "xz",
        build_command: "xz",
        extract_command: "unxz",
        suffix: "xz",
        extensions: &[
            ExtensionDescriptor::bare("xz"),
            ExtensionDescriptor::with("txz", TAR_ARCHIVER),
        ],
    },
    ToolFamily {
        key: "bzip2",
        build_command: "bzip2",
        extract_command: "bunzip2",
        suffix: "bz2",
        extensions: &[
            ExtensionDescriptor::bare("bz2"),
            ExtensionDescriptor::bare("bzip"),
            ExtensionDescriptor::bare("bzip2"),
            ExtensionDescriptor::with("tbz2", TAR_ARCHIVER),
            ExtensionDescriptor::with("tbzip", TAR_ARCHIVER),
            ExtensionDescriptor::with("tbzip2", TAR_ARCHIVER),
        ],
    },
    ToolFamily {
        key: "zstd",
        build_command: "zstd",
        extract_command: "unzstd",
        suffix: "zst",
        extensions: &[
            ExtensionDescriptor::bare("zst"),
            ExtensionDescriptor::bare("zstd"),
            ExtensionDescriptor::with("tzst", TAR_ARCHIVER),
            ExtensionDescriptor::with("tzstd", TAR_ARCHIVER),
        ],
    },
    ToolFamily {
        key: "rar",
        build_command: "rar",
        extract_command: "unrar",
        suffix: "rar",
        extensions: &[ExtensionDescriptor::with("rar", RAR_ALL)],
    },
    ToolFamily {
        key: "zip",
        build_command: "zip",
        extract_command: "unzip",
        suffix: "zip",
        extensions: &[ExtensionDescriptor::with("zip", ZIP_ALL)],
    },
    ToolFamily {
        key: "7z",
        build_command: "7z",
        extract_command: "7z",
        suffix: "7z",
        extensions: &[ExtensionDescriptor::with("7z", SEVENZ_ALL)],
    },
];

/// All families of one group, in registry order.
pub fn families(group: ToolGroup) -> &'static [ToolFamily] {
    match group {
        ToolGroup::Archiver => ARCHIVERS,
        ToolGroup::Compression => COMPRESSORS,
    }
}

/// Looks up a family by key within a group.
pub fn lookup_family(group: ToolGroup, key: &str) -> Option<&'static ToolFamily> {
    families(group).iter().find(|family| family.key == key)
}

/// Finds the first family in `group` with a descriptor whose bare extension is `ext`.
pub fn find_by_extension(
    group: ToolGroup,
    ext: &str,
) -> Option<(&'static ToolFamily, &'static ExtensionDescriptor)> {
    families(group).iter().find_map(|family| {
        family
            .extensions
            .iter()
            .find(|descriptor| descriptor.ext == ext)
            .map(|descriptor| (family, descriptor))
    })
}

/// True if `key` names a family in either group.
pub fn is_known_key(key: &str) -> bool {
    lookup_family(ToolGroup::Archiver, key).is_some()
        || lookup_family(ToolGroup::Compression, key).is_some()
}
