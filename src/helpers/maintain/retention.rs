//! Retention of current artifacts
//!
//! After acquisition, each (kind, architecture) pair keeps only the file for
//! its retained version. Deletion is best-effort: a failure on one file is
//! logged and the rest are still processed.

use crate::core::arch::Architecture;
use crate::core::artifact::{self, ArtifactKind};
use crate::core::output;
use crate::core::version::VersionString;
use crate::helpers::internal::fs_utils;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Glob for run log files.
pub const LOG_GLOB: &str = "update_log_*.txt";

/// The version each artifact kind keeps for one architecture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetainedVersions {
    pub engine: VersionString,
    pub rootless: VersionString,
    pub compose: VersionString,
}

impl RetainedVersions {
    /// Rootless extras follow the engine version unless overridden.
    pub fn new(engine: VersionString, compose: VersionString) -> Self {
        Self {
            rootless: engine.clone(),
            engine,
            compose,
        }
    }

    pub fn with_rootless(mut self, rootless: VersionString) -> Self {
        self.rootless = rootless;
        self
    }

    pub fn for_kind(&self, kind: ArtifactKind) -> &VersionString {
        match kind {
            ArtifactKind::Engine => &self.engine,
            ArtifactKind::RootlessExtras => &self.rootless,
            ArtifactKind::Compose => &self.compose,
        }
    }
}

pub struct RetentionManager<'a> {
    output_dir: &'a Path,
}

impl<'a> RetentionManager<'a> {
    pub fn new(output_dir: &'a Path) -> Self {
        Self { output_dir }
    }

    /// Delete superseded artifacts for `arch`. Returns the deleted paths.
    ///
    /// At most one file survives per kind. When the retained version's file
    /// is missing (its download failed), the newest older copy survives in
    /// its place, or the newest copy when none is older.
    pub fn prune_stale(&self, arch: Architecture, retained: &RetainedVersions) -> Vec<PathBuf> {
        let mut deleted = Vec::new();

        for kind in ArtifactKind::ALL {
            let candidates = match fs_utils::glob_in(self.output_dir, &kind.local_glob(arch)) {
                Ok(paths) => paths,
                Err(e) => {
                    output::error(&format!("cannot list {} files: {}", kind.description(arch), e));
                    continue;
                }
            };

            let files: Vec<(PathBuf, VersionString)> = candidates
                .into_iter()
                .filter_map(|path| {
                    let file = fs_utils::file_name(&path).and_then(artifact::parse_filename)?;
                    (file.kind == kind && file.arch == arch).then_some((path, file.version))
                })
                .collect();

            let keep = retained.for_kind(kind);
            let Some(keep) = survivor(kind, arch, keep, &files, self.output_dir) else {
                continue;
            };

            for (path, version) in &files {
                if *version != keep {
                    remove(path, &mut deleted);
                }
            }
        }

        deleted
    }

    /// Keep the `keep` most recently modified log files, delete the rest.
    pub fn prune_logs(&self, keep: usize) -> Vec<PathBuf> {
        let mut logs = match fs_utils::glob_in(self.output_dir, LOG_GLOB) {
            Ok(paths) => paths,
            Err(e) => {
                output::error(&format!("cannot list log files: {}", e));
                return Vec::new();
            }
        };

        logs.sort_by_cached_key(|p| {
            std::cmp::Reverse(
                std::fs::metadata(p)
                    .and_then(|m| m.modified())
                    .unwrap_or(SystemTime::UNIX_EPOCH),
            )
        });

        let mut deleted = Vec::new();
        for path in logs.into_iter().skip(keep) {
            remove(&path, &mut deleted);
        }
        deleted
    }
}

/// The one version of `kind` allowed to stay on disk for `arch`.
fn survivor(
    kind: ArtifactKind,
    arch: Architecture,
    keep: &VersionString,
    files: &[(PathBuf, VersionString)],
    output_dir: &Path,
) -> Option<VersionString> {
    if output_dir.join(kind.filename(keep, arch)).is_file() {
        return Some(keep.clone());
    }

    let older = files.iter().map(|(_, v)| v).filter(|v| *v < keep).max();
    let fallback = older.or_else(|| files.iter().map(|(_, v)| v).max())?.clone();
    output::warning(&format!(
        "{} is missing, keeping {} {} instead",
        kind.filename(keep, arch),
        kind.description(arch),
        fallback
    ));
    Some(fallback)
}

fn remove(path: &Path, deleted: &mut Vec<PathBuf>) {
    let name = fs_utils::file_name(path).unwrap_or_default();
    match std::fs::remove_file(path) {
        Ok(()) => {
            output::detail(&format!("removed {}", name));
            deleted.push(path.to_path_buf());
        }
        Err(e) => output::error(&format!("failed to remove {}: {}", name, e)),
    }
}
