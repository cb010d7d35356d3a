//! Acquisition and maintenance helpers
//!
//! ## Categories
//!
//! - **http**: the blocking upstream client
//! - **acquire**: version resolution, availability fallback, downloads
//! - **maintain**: retention of current artifacts, checksum ledger, run manifest
//! - **internal**: hashing, progress, filesystem utilities

// Internal utility modules (used by other helpers)
pub mod internal;

pub mod acquire;
pub mod http;
pub mod maintain;
