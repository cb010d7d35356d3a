//! Post-acquisition maintenance of the output directory
//!
//! - **retention**: drop superseded artifacts and old run logs
//! - **ledger**: regenerate `SHA256SUMS` and `VERSION.json`

pub mod ledger;
pub mod retention;

pub use ledger::{IntegrityLedger, ResolvedVersions, RunManifest};
pub use retention::{RetainedVersions, RetentionManager};
