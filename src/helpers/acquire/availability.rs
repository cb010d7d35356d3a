//! Per-architecture availability resolution
//!
//! The newest published engine version is not always on the static
//! distribution server for every architecture yet. Resolution is:
//!
//! 1. probe the canonical archive for the desired version; if present, keep it;
//! 2. otherwise list every version in the architecture's index and take the newest;
//! 3. if the listing is empty or unreachable, keep the desired version anyway.
//!
//! The same operation serves engine and rootless-extras archives; only the
//! filename pattern differs ([`ArtifactKind::index_pattern`]).

use crate::core::arch::Architecture;
use crate::core::artifact::ArtifactKind;
use crate::core::config::Endpoints;
use crate::core::error::FetchError;
use crate::core::output;
use crate::core::version::{self, VersionString};
use crate::helpers::http::HttpClient;

/// Source of truth for what the static distribution server carries.
///
/// Isolates the index scraping so it can be replaced without touching
/// [`resolve_with_fallback`].
pub trait StaticIndex {
    /// Whether the archive of `kind` at `version` exists for `arch`.
    fn archive_exists(&self, arch: Architecture, kind: ArtifactKind, version: &VersionString)
    -> bool;

    /// Every published version of `kind` for `arch`, newest first.
    fn list_versions(
        &self,
        arch: Architecture,
        kind: ArtifactKind,
    ) -> Result<Vec<VersionString>, FetchError>;
}

/// [`StaticIndex`] backed by the HTML directory listing.
pub struct HttpStaticIndex<'a> {
    client: &'a HttpClient,
    endpoints: &'a Endpoints,
}

impl<'a> HttpStaticIndex<'a> {
    pub fn new(client: &'a HttpClient, endpoints: &'a Endpoints) -> Self {
        Self { client, endpoints }
    }

    /// URL of the upstream archive, if `kind` is distributed statically.
    pub fn archive_url(
        &self,
        arch: Architecture,
        kind: ArtifactKind,
        version: &VersionString,
    ) -> Option<String> {
        kind.upstream_archive(version)
            .map(|file| self.endpoints.static_file(arch, &file))
    }
}

impl StaticIndex for HttpStaticIndex<'_> {
    fn archive_exists(
        &self,
        arch: Architecture,
        kind: ArtifactKind,
        version: &VersionString,
    ) -> bool {
        self.archive_url(arch, kind, version)
            .is_some_and(|url| self.client.exists(&url))
    }

    fn list_versions(
        &self,
        arch: Architecture,
        kind: ArtifactKind,
    ) -> Result<Vec<VersionString>, FetchError> {
        let Some(pattern) = kind.index_pattern() else {
            return Ok(Vec::new());
        };
        let listing = self.client.get_text(&self.endpoints.static_index(arch))?;
        Ok(scan_listing(&listing, pattern))
    }
}

/// Extract versions from listing text, newest first, deduplicated.
pub fn scan_listing(listing: &str, pattern: &regex::Regex) -> Vec<VersionString> {
    let found = pattern
        .captures_iter(listing)
        .filter_map(|caps| VersionString::parse_exact(&caps[1]))
        .collect();
    version::sort_descending(found)
}

/// Resolve the version of `kind` to fetch for `arch`, falling back to the
/// newest listed version when `desired` is not published.
pub fn resolve_with_fallback(
    index: &dyn StaticIndex,
    arch: Architecture,
    kind: ArtifactKind,
    desired: &VersionString,
) -> VersionString {
    if index.archive_exists(arch, kind, desired) {
        return desired.clone();
    }

    let listed = match index.list_versions(arch, kind) {
        Ok(versions) => versions,
        Err(e) => {
            output::error(&format!("failed to list {} versions for {}: {}", label(kind), arch, e));
            Vec::new()
        }
    };

    match listed.into_iter().next() {
        Some(newest) => {
            output::warning(&format!(
                "{} {} is not published for {}, falling back to {}",
                label(kind),
                desired,
                arch,
                newest
            ));
            newest
        }
        None => {
            output::error(&format!(
                "no {} versions found for {}, trying {} anyway",
                label(kind),
                arch,
                desired
            ));
            desired.clone()
        }
    }
}

fn label(kind: ArtifactKind) -> &'static str {
    match kind {
        ArtifactKind::Engine => "docker",
        ArtifactKind::RootlessExtras => "rootless extras",
        ArtifactKind::Compose => "compose",
    }
}
