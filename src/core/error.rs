//! Error types for upstream interactions.

use thiserror::Error;

/// Errors from a single HTTP interaction with an upstream endpoint.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("not found: {url}")]
    NotFound { url: String },

    #[error("GitHub API rate limit exceeded. Try again later or set GITHUB_TOKEN.")]
    RateLimited,

    #[error("HTTP {code} from {url}")]
    Status { code: u16, url: String },

    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("failed to parse response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("missing field '{field}' in response from {url}")]
    MissingField { field: &'static str, url: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FetchError {
    /// Map a `ureq` error for `url` into a [`FetchError`].
    pub fn from_ureq(url: &str, err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(404, _) => Self::NotFound {
                url: url.to_string(),
            },
            ureq::Error::Status(403, _) if is_github_api(url) => Self::RateLimited,
            ureq::Error::Status(code, _) => Self::Status {
                code,
                url: url.to_string(),
            },
            ureq::Error::Transport(t) => Self::Transport {
                url: url.to_string(),
                message: t.to_string(),
            },
        }
    }

    /// A missing resource will not appear on retry.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

fn is_github_api(url: &str) -> bool {
    url.contains("/repos/")
}
