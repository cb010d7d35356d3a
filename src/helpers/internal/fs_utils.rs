//! Common filesystem utilities
//!
//! Shared operations on the flat output directory.

use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Create a directory (and all ancestors) if it doesn't exist.
pub fn ensure_dir(path: &Path) -> io::Result<()> {
    if !path.is_dir() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Expand a glob pattern rooted in `dir` and return matching paths.
///
/// Returns an empty Vec if nothing matches. Unreadable entries are skipped.
///
/// # Example
/// ```ignore
/// let logs = glob_in(out_dir, "update_log_*.txt")?;
/// ```
pub fn glob_in(dir: &Path, pattern: &str) -> io::Result<Vec<PathBuf>> {
    let escaped = glob::Pattern::escape(&dir.to_string_lossy());
    let full = format!("{}/{}", escaped, pattern);
    let paths = glob::glob(&full)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?
        .filter_map(|r| r.ok())
        .collect();
    Ok(paths)
}

/// Regular files directly inside `dir` (no recursion), sorted by name.
pub fn regular_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(io::Error::other)?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// File name as UTF-8 text, if it has one.
pub fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}

/// Set file permissions (Unix only).
///
/// No-op on non-Unix platforms.
#[cfg(unix)]
pub fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
pub fn set_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_ensure_dir_creates_nested() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a/b/c");
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
        // Idempotent
        ensure_dir(&nested).unwrap();
    }

    #[test]
    fn test_glob_in() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("docker-1.0.0-x86_64.tgz"), "a").unwrap();
        std::fs::write(dir.path().join("docker-1.0.0-aarch64.tgz"), "b").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "c").unwrap();

        let matches = glob_in(dir.path(), "docker-*-x86_64.tgz").unwrap();
        assert_eq!(matches.len(), 1);
        assert!(matches[0].ends_with("docker-1.0.0-x86_64.tgz"));
    }

    #[test]
    fn test_regular_files_skips_directories() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("b.tgz"), "b").unwrap();
        std::fs::write(dir.path().join("a.tgz"), "a").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub/c.tgz"), "c").unwrap();

        let files = regular_files(dir.path()).unwrap();
        let names: Vec<_> = files.iter().filter_map(|p| file_name(p)).collect();
        assert_eq!(names, vec!["a.tgz", "b.tgz"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_set_mode() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempdir().unwrap();
        let path = dir.path().join("tool");
        std::fs::write(&path, "#!/bin/sh").unwrap();
        set_mode(&path, 0o755).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}
