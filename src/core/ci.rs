//! Step outputs for GitHub Actions
//!
//! Outputs are `name=value` lines appended to the file named by
//! `GITHUB_OUTPUT`. Outside a workflow the variable is unset and nothing is
//! written.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub const OUTPUT_ENV: &str = "GITHUB_OUTPUT";

/// The output file for the current step, if running in a workflow.
pub fn output_file() -> Option<PathBuf> {
    std::env::var_os(OUTPUT_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Append `pairs` to `path` as `name=value` lines.
pub fn append_outputs(path: &Path, pairs: &[(&str, String)]) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    for (name, value) in pairs {
        writeln!(file, "{}={}", name, value)?;
    }
    Ok(())
}

/// Publish `pairs` to the workflow. Returns whether anything was written.
pub fn publish(pairs: &[(&str, String)]) -> io::Result<bool> {
    match output_file() {
        Some(path) => append_outputs(&path, pairs).map(|_| true),
        None => Ok(false),
    }
}
