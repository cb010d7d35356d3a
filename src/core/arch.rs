//! Supported target architectures
//!
//! The set is closed: every artifact this tool mirrors exists for exactly
//! these two targets.

use clap::ValueEnum;
use serde::Serialize;
use std::fmt;

/// A hardware target the mirror carries artifacts for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, ValueEnum)]
pub enum Architecture {
    #[value(name = "x86_64")]
    #[serde(rename = "x86_64")]
    X86_64,
    #[value(name = "aarch64")]
    #[serde(rename = "aarch64")]
    Aarch64,
}

impl Architecture {
    /// All supported architectures in processing order.
    pub const ALL: [Architecture; 2] = [Architecture::X86_64, Architecture::Aarch64];

    /// Tag used in local filenames.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::X86_64 => "x86_64",
            Self::Aarch64 => "aarch64",
        }
    }

    /// Directory name on the static distribution server.
    pub fn dist_arch(&self) -> &'static str {
        match self {
            Self::X86_64 => "x86_64",
            Self::Aarch64 => "aarch64",
        }
    }

    /// Architecture string used in Compose release asset names.
    pub fn asset_arch(&self) -> &'static str {
        match self {
            Self::X86_64 => "x86_64",
            Self::Aarch64 => "aarch64",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::X86_64 => "x86_64 (AMD64)",
            Self::Aarch64 => "ARM64 (aarch64)",
        }
    }

    /// Alternative names the same target goes by in asset names.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::X86_64 => &["amd64"],
            Self::Aarch64 => &["arm64"],
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Architecture selection as given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ArchSelection {
    #[value(name = "x86_64")]
    X86_64,
    #[value(name = "aarch64")]
    Aarch64,
    All,
}

/// Expand a command-line selection into a deduplicated architecture list.
///
/// `all` anywhere in the selection wins. An empty selection means `all`.
pub fn expand_selection(selection: &[ArchSelection]) -> Vec<Architecture> {
    if selection.is_empty() || selection.contains(&ArchSelection::All) {
        return Architecture::ALL.to_vec();
    }

    let mut archs = Vec::new();
    for sel in selection {
        let arch = match sel {
            ArchSelection::X86_64 => Architecture::X86_64,
            ArchSelection::Aarch64 => Architecture::Aarch64,
            ArchSelection::All => continue,
        };
        if !archs.contains(&arch) {
            archs.push(arch);
        }
    }
    archs
}
