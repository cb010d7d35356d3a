//! HTTP access to upstream endpoints
//!
//! One blocking client for everything the updater talks to: the GitHub
//! release API, the static distribution index, and artifact downloads.
//!
//! ## GitHub Authentication
//!
//! Set `GITHUB_TOKEN` environment variable to increase rate limits:
//! ```bash
//! export GITHUB_TOKEN="ghp_xxxxxxxxxxxxxxxxxxxx"
//! ```

use crate::core::config::HttpSettings;
use crate::core::error::FetchError;
use serde::de::DeserializeOwned;

/// Generic user agent; the static distribution server rejects empty ones.
const USER_AGENT: &str = "Mozilla/5.0 (compatible; docker-offline-updater)";

/// Blocking HTTP client with per-request-kind timeouts.
///
/// Metadata and probe requests carry an overall deadline. Downloads go
/// through their own agent whose timeouts apply per socket operation, so a
/// slow but live transfer is never cut off; only a stall is.
#[derive(Debug, Clone)]
pub struct HttpClient {
    settings: HttpSettings,
    download_agent: ureq::Agent,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new(HttpSettings::default())
    }
}

impl HttpClient {
    pub fn new(settings: HttpSettings) -> Self {
        let stall = settings.timeouts.download;
        let download_agent = ureq::AgentBuilder::new()
            .timeout_connect(stall)
            .timeout_read(stall)
            .timeout_write(stall)
            .build();
        Self {
            settings,
            download_agent,
        }
    }

    /// Create a GitHub API request with proper headers and optional auth.
    fn github_request(&self, url: &str) -> ureq::Request {
        let mut request = ureq::get(url)
            .timeout(self.settings.timeouts.metadata)
            .set("Accept", "application/vnd.github.v3+json")
            .set("User-Agent", USER_AGENT);

        if let Some(token) = &self.settings.github_token {
            request = request.set("Authorization", &format!("Bearer {}", token));
        }

        request
    }

    /// GET a GitHub API document and deserialize it.
    pub fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let response = self
            .github_request(url)
            .call()
            .map_err(|e| FetchError::from_ureq(url, e))?;

        response.into_json().map_err(|e| FetchError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    /// GET a text page (directory listings).
    pub fn get_text(&self, url: &str) -> Result<String, FetchError> {
        ureq::get(url)
            .timeout(self.settings.timeouts.metadata)
            .set("User-Agent", USER_AGENT)
            .call()
            .map_err(|e| FetchError::from_ureq(url, e))?
            .into_string()
            .map_err(|e| FetchError::Decode {
                url: url.to_string(),
                message: e.to_string(),
            })
    }

    /// Lightweight existence probe (HEAD). Any failure counts as absent.
    pub fn exists(&self, url: &str) -> bool {
        ureq::head(url)
            .timeout(self.settings.timeouts.probe)
            .set("User-Agent", USER_AGENT)
            .call()
            .is_ok()
    }

    /// Start a download; the caller streams the body.
    pub fn get_stream(&self, url: &str) -> Result<ureq::Response, FetchError> {
        self.download_agent
            .get(url)
            .set("User-Agent", USER_AGENT)
            .call()
            .map_err(|e| FetchError::from_ureq(url, e))
    }
}
