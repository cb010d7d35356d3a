//! Download outcomes and run counters

use serde::Serialize;

/// Result of one acquisition attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// Transferred and hashed; carries the file size in bytes.
    Succeeded { bytes: u64 },
    /// Destination already present, nothing transferred.
    Skipped,
    /// Retries exhausted, 404, or no source URL.
    Failed,
}

impl DownloadOutcome {
    /// Whether the artifact is on disk after this outcome.
    pub fn is_achieved(&self) -> bool {
        !matches!(self, Self::Failed)
    }
}

/// Run-level counters, merged by the orchestrator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub success: u32,
    pub failed: u32,
    pub skipped: u32,
    pub total_size: u64,
}

impl RunStats {
    pub fn record(&mut self, outcome: DownloadOutcome) {
        match outcome {
            DownloadOutcome::Succeeded { bytes } => {
                self.success += 1;
                self.total_size += bytes;
            }
            DownloadOutcome::Skipped => self.skipped += 1,
            DownloadOutcome::Failed => self.failed += 1,
        }
    }

    pub fn merge(&mut self, other: &RunStats) {
        self.success += other.success;
        self.failed += other.failed;
        self.skipped += other.skipped;
        self.total_size += other.total_size;
    }

    pub fn total_size_mb(&self) -> f64 {
        self.total_size as f64 / (1024.0 * 1024.0)
    }
}
