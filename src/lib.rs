//! Docker offline package updater
//!
//! Keeps a directory of Docker static binaries current for air-gapped
//! installs. One run, per selected architecture:
//!
//! 1. resolves the newest engine and Compose releases (with fallbacks),
//! 2. picks the newest engine and rootless-extras archives actually published,
//! 3. downloads anything missing, with retries,
//! 4. deletes superseded files and old run logs,
//! 5. rewrites `SHA256SUMS` and `VERSION.json`.
//!
//! # Output layout
//!
//! ```text
//! packages/
//!   docker-27.4.1-x86_64.tgz
//!   docker-rootless-extras-27.4.1-x86_64.tgz
//!   docker-compose-linux-2.32.4-x86_64
//!   SHA256SUMS
//!   VERSION.json
//!   update_log_20250101_120000.txt
//! ```
//!
//! # Example
//!
//! ```no_run
//! use docker_offline_updater::{Updater, UpdaterConfig};
//!
//! let summary = Updater::new(UpdaterConfig::new("packages")).run();
//! std::process::exit(if summary.is_success() { 0 } else { 1 });
//! ```

pub mod core;
pub mod helpers;
pub mod updater;

pub use crate::core::arch::{ArchSelection, Architecture};
pub use crate::core::config::UpdaterConfig;
pub use crate::core::output;
pub use crate::core::version::VersionString;
pub use updater::{ArchReport, RunSummary, Updater};
