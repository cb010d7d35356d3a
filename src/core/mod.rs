//! Core types and run configuration
//!
//! Domain vocabulary (architectures, artifact kinds, versions, outcomes),
//! the fetch error taxonomy, configuration and console/log output.

pub mod arch;
pub mod artifact;
pub mod ci;
pub mod config;
pub mod error;
pub mod output;
pub mod stats;
pub mod version;
