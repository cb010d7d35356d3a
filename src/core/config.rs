//! Run configuration
//!
//! Everything a run needs is collected into [`UpdaterConfig`] up front and
//! passed down explicitly.

use crate::core::arch::Architecture;
use crate::core::version::VersionString;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;

/// Default GitHub API base URL
pub const GITHUB_API_BASE: &str = "https://api.github.com";

/// Default static distribution root (one subdirectory per architecture)
pub const DOCKER_STATIC_BASE: &str = "https://download.docker.com/linux/static/stable";

/// Upstream repository publishing engine releases
pub const ENGINE_REPO: &str = "moby/moby";

/// Upstream repository publishing Compose releases
pub const COMPOSE_REPO: &str = "docker/compose";

/// Used when the engine release metadata cannot be fetched
pub const FALLBACK_ENGINE_VERSION: (u64, u64, u64) = (27, 4, 1);

/// Used when the Compose release metadata cannot be fetched
pub const FALLBACK_COMPOSE_VERSION: (u64, u64, u64) = (2, 32, 4);

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_KEEP_LOGS: usize = 3;

const DOWNLOAD_TIMEOUT_SECS: u64 = 120;
const DEFAULT_METADATA_TIMEOUT_SECS: u64 = 30;
const PROBE_TIMEOUT_SECS: u64 = 20;

/// Get the metadata timeout from the environment or use the default.
/// Read once and cached.
fn metadata_timeout() -> Duration {
    static TIMEOUT: OnceLock<Duration> = OnceLock::new();
    *TIMEOUT.get_or_init(|| {
        let secs = std::env::var("DOCKER_UPDATE_HTTP_TIMEOUT")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_METADATA_TIMEOUT_SECS);
        Duration::from_secs(secs.clamp(5, 300))
    })
}

/// Upstream base URLs. Overridable so tests can point at a mock server.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub github_api: String,
    pub static_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            github_api: GITHUB_API_BASE.to_string(),
            static_base: DOCKER_STATIC_BASE.to_string(),
        }
    }
}

impl Endpoints {
    pub fn latest_release(&self, repo: &str) -> String {
        format!("{}/repos/{}/releases/latest", trim(&self.github_api), repo)
    }

    pub fn release_by_tag(&self, repo: &str, tag: &str) -> String {
        format!("{}/repos/{}/releases/tags/{}", trim(&self.github_api), repo, tag)
    }

    /// Directory listing URL for one architecture (trailing slash included).
    pub fn static_index(&self, arch: Architecture) -> String {
        format!("{}/{}/", trim(&self.static_base), arch.dist_arch())
    }

    pub fn static_file(&self, arch: Architecture, file: &str) -> String {
        format!("{}{}", self.static_index(arch), file)
    }
}

fn trim(base: &str) -> &str {
    base.trim_end_matches('/')
}

/// HTTP timeouts per kind of request.
#[derive(Debug, Clone, Copy)]
pub struct Timeouts {
    pub download: Duration,
    pub metadata: Duration,
    pub probe: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            download: Duration::from_secs(DOWNLOAD_TIMEOUT_SECS),
            metadata: metadata_timeout(),
            probe: Duration::from_secs(PROBE_TIMEOUT_SECS),
        }
    }
}

/// HTTP client settings shared by every upstream call.
#[derive(Debug, Clone, Default)]
pub struct HttpSettings {
    pub timeouts: Timeouts,
    /// Bearer token for the GitHub API (raises rate limits from 60/hr to 5000/hr).
    pub github_token: Option<String>,
}

impl HttpSettings {
    pub fn from_env() -> Self {
        Self {
            timeouts: Timeouts::default(),
            github_token: std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty()),
        }
    }
}

/// Complete configuration for one updater run.
#[derive(Debug, Clone)]
pub struct UpdaterConfig {
    pub output_dir: PathBuf,
    pub architectures: Vec<Architecture>,
    pub ci_mode: bool,
    pub keep_logs: usize,
    pub max_attempts: u32,
    /// First retry waits this long; each further retry doubles it.
    pub retry_base_delay: Duration,
    pub endpoints: Endpoints,
    pub http: HttpSettings,
    pub fallback_engine: VersionString,
    pub fallback_compose: VersionString,
}

impl UpdaterConfig {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        let (ea, eb, ec) = FALLBACK_ENGINE_VERSION;
        let (ca, cb, cc) = FALLBACK_COMPOSE_VERSION;
        Self {
            output_dir: output_dir.into(),
            architectures: Architecture::ALL.to_vec(),
            ci_mode: false,
            keep_logs: DEFAULT_KEEP_LOGS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_base_delay: Duration::from_secs(1),
            endpoints: Endpoints::default(),
            http: HttpSettings::default(),
            fallback_engine: VersionString::new(ea, eb, ec),
            fallback_compose: VersionString::new(ca, cb, cc),
        }
    }
}
