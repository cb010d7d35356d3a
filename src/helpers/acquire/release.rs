//! GitHub release metadata
//!
//! Resolves the latest engine and Compose versions and locates the Compose
//! binary asset for an architecture. Nothing here fails the run: version
//! lookups fall back to fixed constants and asset lookups return `None`.

use crate::core::arch::Architecture;
use crate::core::config::{COMPOSE_REPO, ENGINE_REPO, Endpoints};
use crate::core::error::FetchError;
use crate::core::output;
use crate::core::version::VersionString;
use crate::helpers::http::HttpClient;
use serde::Deserialize;

/// Prefix shared by every Compose Linux binary asset.
const COMPOSE_ASSET_PREFIX: &str = "docker-compose-linux-";

/// The subset of a GitHub release document this tool reads.
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    pub tag_name: Option<String>,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseAsset {
    pub name: String,
    pub browser_download_url: String,
}

/// Latest-version lookup for the engine and Compose projects.
pub struct VersionResolver<'a> {
    client: &'a HttpClient,
    endpoints: &'a Endpoints,
    fallback_engine: VersionString,
    fallback_compose: VersionString,
}

impl<'a> VersionResolver<'a> {
    pub fn new(
        client: &'a HttpClient,
        endpoints: &'a Endpoints,
        fallback_engine: VersionString,
        fallback_compose: VersionString,
    ) -> Self {
        Self {
            client,
            endpoints,
            fallback_engine,
            fallback_compose,
        }
    }

    pub fn latest_engine_version(&self) -> VersionString {
        self.latest_or_fallback("Docker", ENGINE_REPO, &self.fallback_engine)
    }

    pub fn latest_compose_version(&self) -> VersionString {
        self.latest_or_fallback("Docker Compose", COMPOSE_REPO, &self.fallback_compose)
    }

    /// Single attempt; any failure falls back immediately.
    fn latest_or_fallback(
        &self,
        project: &str,
        repo: &str,
        fallback: &VersionString,
    ) -> VersionString {
        output::sub_action(&format!("fetching latest {} version", project));
        match self.latest_tag(repo) {
            Ok(tag) => {
                let version = VersionString::from_tag(&tag);
                output::notice(&format!("latest {} version: {}", project, version));
                version
            }
            Err(e) => {
                output::error(&format!(
                    "failed to fetch latest {} version: {} (using {})",
                    project, e, fallback
                ));
                fallback.clone()
            }
        }
    }

    fn latest_tag(&self, repo: &str) -> Result<String, FetchError> {
        let url = self.endpoints.latest_release(repo);
        let release: Release = self.client.get_json(&url)?;
        release
            .tag_name
            .filter(|t| !t.trim().is_empty())
            .ok_or(FetchError::MissingField {
                field: "tag_name",
                url,
            })
    }
}

/// Finds the Compose binary asset within a tagged release.
pub struct AssetLocator<'a> {
    client: &'a HttpClient,
    endpoints: &'a Endpoints,
}

impl<'a> AssetLocator<'a> {
    pub fn new(client: &'a HttpClient, endpoints: &'a Endpoints) -> Self {
        Self { client, endpoints }
    }

    /// Download URL of the Compose binary for `arch`, if the release has one.
    pub fn locate_asset(&self, version: &VersionString, arch: Architecture) -> Option<String> {
        let url = self
            .endpoints
            .release_by_tag(COMPOSE_REPO, &format!("v{}", version));
        let release: Release = match self.client.get_json(&url) {
            Ok(r) => r,
            Err(e) => {
                output::error(&format!("failed to fetch Compose release v{}: {}", version, e));
                return None;
            }
        };

        let asset = select_asset(&release.assets, arch);
        if asset.is_none() {
            output::error(&format!(
                "no Compose asset for {} in release v{}",
                arch, version
            ));
        }
        asset.map(|a| a.browser_download_url.clone())
    }
}

/// Candidate asset names in priority order: canonical, `.exe`, then the
/// same two forms for each alias.
pub fn candidate_names(arch: Architecture) -> Vec<String> {
    std::iter::once(arch.asset_arch())
        .chain(arch.aliases().iter().copied())
        .flat_map(|a| {
            [
                format!("{}{}", COMPOSE_ASSET_PREFIX, a),
                format!("{}{}.exe", COMPOSE_ASSET_PREFIX, a),
            ]
        })
        .collect()
}

/// Pick the Compose asset for `arch` in a single pass.
///
/// An exact candidate-name match wins. Otherwise the first asset with the
/// Compose prefix whose name mentions the architecture or an alias.
pub fn select_asset(assets: &[ReleaseAsset], arch: Architecture) -> Option<&ReleaseAsset> {
    let candidates = candidate_names(arch);
    let tags: Vec<&str> = std::iter::once(arch.asset_arch())
        .chain(arch.aliases().iter().copied())
        .collect();

    let mut loose = None;
    for asset in assets {
        if candidates.iter().any(|c| *c == asset.name) {
            return Some(asset);
        }
        if loose.is_none()
            && asset.name.starts_with(COMPOSE_ASSET_PREFIX)
            && tags.iter().any(|t| asset.name.contains(t))
        {
            loose = Some(asset);
        }
    }
    loose
}
