//! Download progress reporting
//!
//! Interactive runs get an indicatif byte bar. CI runs get a plain detail
//! line each time another [`CI_PROGRESS_INTERVAL`] bytes have arrived, which
//! keeps job logs short.

use crate::core::output;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Bytes between progress lines in CI mode (10 MiB)
pub const CI_PROGRESS_INTERVAL: u64 = 10 * 1024 * 1024;

/// Standard spinner characters
const SPINNER_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Standard tick interval for spinners
const TICK_INTERVAL_MS: u64 = 80;

/// Tracks fixed byte-count milestones.
///
/// `advance` reports at most one crossing per call no matter how many
/// chunks arrived in between.
#[derive(Debug)]
pub struct Milestones {
    interval: u64,
    next: u64,
}

impl Milestones {
    pub fn new(interval: u64) -> Self {
        let interval = interval.max(1);
        Self {
            interval,
            next: interval,
        }
    }

    /// Returns true when `position` crossed the next milestone.
    pub fn advance(&mut self, position: u64) -> bool {
        if position < self.next {
            return false;
        }
        self.next = (position / self.interval + 1) * self.interval;
        true
    }
}

fn byte_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("     {spinner:.cyan} [{bar:30.cyan/dim}] {bytes}/{total_bytes} ({eta})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("━╸━")
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("     {spinner:.cyan} {msg} {bytes}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars(SPINNER_CHARS)
}

/// Progress sink for one transfer.
pub enum DownloadProgress {
    Bar(ProgressBar),
    Milestones {
        milestones: Milestones,
        total: Option<u64>,
    },
}

impl DownloadProgress {
    /// Pick the reporter for the current output mode.
    pub fn start(message: &str, total: Option<u64>) -> Self {
        if output::ci_mode() {
            return Self::Milestones {
                milestones: Milestones::new(CI_PROGRESS_INTERVAL),
                total,
            };
        }

        let pb = match total {
            Some(len) => {
                let pb = ProgressBar::new(len);
                pb.set_style(byte_style());
                pb
            }
            None => {
                let pb = ProgressBar::new_spinner();
                pb.set_style(spinner_style());
                pb.set_message(message.to_string());
                pb
            }
        };
        pb.enable_steady_tick(Duration::from_millis(TICK_INTERVAL_MS));
        Self::Bar(pb)
    }

    pub fn update(&mut self, position: u64) {
        match self {
            Self::Bar(pb) => pb.set_position(position),
            Self::Milestones { milestones, total } => {
                if milestones.advance(position) {
                    output::detail(&progress_line(position, *total));
                }
            }
        }
    }

    pub fn finish(&self) {
        if let Self::Bar(pb) = self {
            pb.finish_and_clear();
        }
    }
}

impl Drop for DownloadProgress {
    fn drop(&mut self) {
        self.finish();
    }
}

fn progress_line(position: u64, total: Option<u64>) -> String {
    match total {
        Some(total) if total > 0 => format!(
            "progress {:.1}% ({}/{} bytes)",
            position as f64 * 100.0 / total as f64,
            position,
            total
        ),
        _ => format!("progress {} bytes", position),
    }
}
