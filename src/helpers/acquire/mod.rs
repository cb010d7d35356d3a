//! ACQUIRE phase helpers - getting artifacts
//!
//! Everything between "which version is newest" and "the file is on disk".
//!
//! ## Components
//!
//! - **release**: latest engine/Compose versions, Compose asset lookup
//! - **availability**: per-architecture version fallback on the static index
//! - **download**: streaming fetch with skip-if-present and retries
//! - **retry**: the retry state machine driving downloads

pub mod availability;
pub mod download;
pub mod release;
pub mod retry;

// Re-export commonly used items
pub use availability::{HttpStaticIndex, StaticIndex, resolve_with_fallback};
pub use download::{DownloadRequest, Downloader};
pub use release::{AssetLocator, VersionResolver};
pub use retry::RetryPolicy;
