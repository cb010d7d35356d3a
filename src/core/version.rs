//! Release version parsing and ordering
//!
//! Upstream tags come in several shapes (`v27.4.1`, `docker-v27.4.1`,
//! `2.32.4`). Everything downstream works on the numeric
//! `major.minor.patch` triple extracted from the tag:
//!
//! ```
//! use docker_offline_updater::VersionString;
//!
//! let v = VersionString::from_tag("docker-v27.4.1");
//! assert_eq!(v.to_string(), "27.4.1");
//! assert!(VersionString::from_tag("v27.10.0") > VersionString::from_tag("v27.9.9"));
//! ```

use regex::Regex;
use semver::Version;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::OnceLock;

/// Prefixes stripped from a tag that carries no numeric triple.
const TAG_PREFIXES: &[&str] = &["docker-", "engine-", "release-", "version-", "v"];

fn triple_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)\.(\d+)\.(\d+)").expect("static regex is valid"))
}

/// A resolved upstream version.
///
/// `Release` is the normal case. `Raw` holds the prefix-stripped tag text
/// when no numeric triple could be found; it sorts below every release.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VersionString {
    Raw(String),
    Release(Version),
}

impl VersionString {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self::Release(Version::new(major, minor, patch))
    }

    /// Parse a release tag, degrading to the stripped tag text.
    pub fn from_tag(tag: &str) -> Self {
        if let Some(v) = Self::find_triple(tag) {
            return v;
        }

        let mut s = tag.trim();
        loop {
            let stripped = TAG_PREFIXES
                .iter()
                .find_map(|prefix| s.strip_prefix(prefix));
            match stripped {
                Some(rest) => s = rest,
                None => break,
            }
        }
        Self::Raw(s.to_string())
    }

    /// Extract the first `major.minor.patch` substring, if any.
    pub fn find_triple(text: &str) -> Option<Self> {
        let caps = triple_regex().captures(text)?;
        let major = caps[1].parse().ok()?;
        let minor = caps[2].parse().ok()?;
        let patch = caps[3].parse().ok()?;
        Some(Self::new(major, minor, patch))
    }

    /// Parse text that must be exactly a numeric triple.
    pub fn parse_exact(text: &str) -> Option<Self> {
        let v = Self::find_triple(text)?;
        (v.to_string() == text).then_some(v)
    }
}

impl fmt::Display for VersionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Release(v) => write!(f, "{}.{}.{}", v.major, v.minor, v.patch),
            Self::Raw(s) => f.write_str(s),
        }
    }
}

impl Serialize for VersionString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Sort versions newest first and drop duplicates.
pub fn sort_descending(mut versions: Vec<VersionString>) -> Vec<VersionString> {
    versions.sort_by(|a, b| b.cmp(a));
    versions.dedup();
    versions
}
