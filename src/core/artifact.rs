//! Artifact kinds and their filename conventions
//!
//! Local names are keyed by (kind, version, architecture) so no two kinds or
//! versions can collide in the output directory:
//!
//! | kind            | local filename                                  |
//! |-----------------|-------------------------------------------------|
//! | engine          | `docker-<version>-<arch>.tgz`                   |
//! | rootless extras | `docker-rootless-extras-<version>-<arch>.tgz`   |
//! | compose         | `docker-compose-linux-<version>-<arch>`         |

use crate::core::arch::Architecture;
use crate::core::version::VersionString;
use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Engine,
    RootlessExtras,
    Compose,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 3] = [
        ArtifactKind::Engine,
        ArtifactKind::Compose,
        ArtifactKind::RootlessExtras,
    ];

    fn local_prefix(&self) -> &'static str {
        match self {
            Self::Engine => "docker-",
            Self::RootlessExtras => "docker-rootless-extras-",
            Self::Compose => "docker-compose-linux-",
        }
    }

    fn local_suffix(&self) -> &'static str {
        match self {
            Self::Engine | Self::RootlessExtras => ".tgz",
            Self::Compose => "",
        }
    }

    /// Destination filename in the output directory.
    pub fn filename(&self, version: &VersionString, arch: Architecture) -> String {
        format!(
            "{}{}-{}{}",
            self.local_prefix(),
            version,
            arch.tag(),
            self.local_suffix()
        )
    }

    /// Glob matching every local file of this kind for `arch`.
    ///
    /// The engine glob also matches rootless archives; use
    /// [`parse_filename`] to tell them apart.
    pub fn local_glob(&self, arch: Architecture) -> String {
        format!("{}*-{}{}", self.local_prefix(), arch.tag(), self.local_suffix())
    }

    /// Archive name on the static distribution server, if this kind lives there.
    pub fn upstream_archive(&self, version: &VersionString) -> Option<String> {
        match self {
            Self::Engine => Some(format!("docker-{}.tgz", version)),
            Self::RootlessExtras => Some(format!("docker-rootless-extras-{}.tgz", version)),
            Self::Compose => None,
        }
    }

    /// Pattern extracting versions of this kind from a static index listing.
    pub fn index_pattern(&self) -> Option<&'static Regex> {
        static ENGINE: OnceLock<Regex> = OnceLock::new();
        static ROOTLESS: OnceLock<Regex> = OnceLock::new();
        match self {
            Self::Engine => Some(ENGINE.get_or_init(|| {
                Regex::new(r"docker-(\d+\.\d+\.\d+)\.tgz").expect("static regex is valid")
            })),
            Self::RootlessExtras => Some(ROOTLESS.get_or_init(|| {
                Regex::new(r"docker-rootless-extras-(\d+\.\d+\.\d+)\.tgz")
                    .expect("static regex is valid")
            })),
            Self::Compose => None,
        }
    }

    /// Whether the downloaded file must be marked executable.
    pub fn is_executable(&self) -> bool {
        matches!(self, Self::Compose)
    }

    pub fn description(&self, arch: Architecture) -> String {
        let what = match self {
            Self::Engine => "Docker binaries",
            Self::RootlessExtras => "Docker rootless extras",
            Self::Compose => "Docker Compose",
        };
        format!("{} ({})", what, arch.tag())
    }
}

fn local_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^docker-(?:(?P<kind>rootless-extras|compose-linux)-)?(?P<version>\d+\.\d+\.\d+)-(?P<arch>[A-Za-z0-9_]+)(?P<ext>\.tgz)?$",
        )
        .expect("static regex is valid")
    })
}

/// A file in the output directory recognized as an artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactFile {
    pub kind: ArtifactKind,
    pub version: VersionString,
    pub arch: Architecture,
}

/// Recognize a local artifact filename.
///
/// Returns `None` for anything that is not exactly one of the three
/// filename templates with a supported architecture.
pub fn parse_filename(name: &str) -> Option<ArtifactFile> {
    let caps = local_regex().captures(name)?;
    let has_ext = caps.name("ext").is_some();
    let kind = match (caps.name("kind").map(|m| m.as_str()), has_ext) {
        (None, true) => ArtifactKind::Engine,
        (Some("rootless-extras"), true) => ArtifactKind::RootlessExtras,
        (Some("compose-linux"), false) => ArtifactKind::Compose,
        _ => return None,
    };
    let version = VersionString::parse_exact(&caps["version"])?;
    let arch = Architecture::ALL
        .into_iter()
        .find(|a| a.tag() == &caps["arch"])?;
    Some(ArtifactFile {
        kind,
        version,
        arch,
    })
}
