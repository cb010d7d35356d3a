//! Internal utility modules
//!
//! Shared functionality used by the acquisition and maintenance helpers.

pub mod fs_utils;
pub mod hash;
pub mod progress;
