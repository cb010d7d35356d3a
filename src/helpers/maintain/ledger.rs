//! Checksum ledger and run manifest
//!
//! Both files are regenerated from scratch on every run:
//!
//! - `SHA256SUMS`: `<sha256>  <filename>` per retained artifact, sorted by
//!   name, in the format `sha256sum -c` reads;
//! - `VERSION.json`: resolved versions, timestamp, architectures, counters.

use crate::core::arch::Architecture;
use crate::core::artifact;
use crate::core::output;
use crate::core::stats::RunStats;
use crate::core::version::VersionString;
use crate::helpers::internal::{fs_utils, hash};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

pub const CHECKSUM_FILE: &str = "SHA256SUMS";
pub const MANIFEST_FILE: &str = "VERSION.json";

/// Versions actually kept for one architecture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedVersions {
    pub docker: VersionString,
    pub rootless_extras: VersionString,
    pub compose: VersionString,
}

/// Persisted summary of one run.
#[derive(Debug, Clone, Serialize)]
pub struct RunManifest {
    pub docker_version: VersionString,
    pub compose_version: VersionString,
    pub update_date: String,
    pub architectures: Vec<Architecture>,
    pub resolved: BTreeMap<Architecture, ResolvedVersions>,
    pub download_stats: RunStats,
}

impl RunManifest {
    /// Manifest stamped with the current local time.
    pub fn now(
        docker_version: VersionString,
        compose_version: VersionString,
        architectures: Vec<Architecture>,
        resolved: BTreeMap<Architecture, ResolvedVersions>,
        download_stats: RunStats,
    ) -> Self {
        Self {
            docker_version,
            compose_version,
            update_date: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            architectures,
            resolved,
            download_stats,
        }
    }
}

pub struct IntegrityLedger<'a> {
    output_dir: &'a Path,
}

impl<'a> IntegrityLedger<'a> {
    pub fn new(output_dir: &'a Path) -> Self {
        Self { output_dir }
    }

    pub fn checksum_path(&self) -> PathBuf {
        self.output_dir.join(CHECKSUM_FILE)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.output_dir.join(MANIFEST_FILE)
    }

    /// Hash every recognized artifact and rewrite the ledger.
    ///
    /// Returns `(hash, filename)` entries in the order written.
    pub fn write_checksums(&self) -> io::Result<Vec<(String, String)>> {
        let mut entries = Vec::new();
        for path in fs_utils::regular_files(self.output_dir)? {
            let Some(name) = fs_utils::file_name(&path) else {
                continue;
            };
            if name == CHECKSUM_FILE || artifact::parse_filename(name).is_none() {
                continue;
            }
            entries.push((hash::sha256_file(&path)?, name.to_string()));
        }
        entries.sort_by(|a, b| a.1.cmp(&b.1));

        let body: String = entries
            .iter()
            .map(|(digest, name)| format!("{}  {}\n", digest, name))
            .collect();
        std::fs::write(self.checksum_path(), body)?;

        output::success(&format!(
            "checksums written: {} ({} files)",
            self.checksum_path().display(),
            entries.len()
        ));
        Ok(entries)
    }

    /// Serialize `manifest`, replacing any previous one.
    pub fn write_manifest(&self, manifest: &RunManifest) -> io::Result<()> {
        let json = serde_json::to_string_pretty(manifest).map_err(io::Error::other)?;
        std::fs::write(self.manifest_path(), json + "\n")?;
        output::success(&format!("version info written: {}", self.manifest_path().display()));
        Ok(())
    }
}

/// Parse ledger text back into `(hash, filename)` pairs.
pub fn parse_checksums(text: &str) -> Vec<(String, String)> {
    text.lines()
        .filter_map(|line| line.split_once("  "))
        .map(|(h, n)| (h.to_string(), n.to_string()))
        .collect()
}
