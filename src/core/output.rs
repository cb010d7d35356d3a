//! Colored output and run log for the updater
//!
//! Uses owo-colors for terminal colors. Every line is also appended, without
//! color, to the run log file once [`init_log`] has been called:
//!
//! ```text
//! [2025-01-01 12:00:00.123] [WARNING] docker 99.99.99 not published for x86_64
//! ```
//!
//! In CI mode warnings, errors and notices become workflow annotations
//! (`::warning::...`) so they surface in the job summary.

use chrono::Local;
use owo_colors::OwoColorize;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

static CI_MODE: AtomicBool = AtomicBool::new(false);
static LOG_SINK: Mutex<Option<LogSink>> = Mutex::new(None);

struct LogSink {
    path: PathBuf,
    file: File,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Info,
    Notice,
    Success,
    Warning,
    Error,
    Debug,
}

impl Level {
    fn label(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Notice => "NOTICE",
            Self::Success => "SUCCESS",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Debug => "DEBUG",
        }
    }

    fn annotation(&self) -> Option<&'static str> {
        match self {
            Self::Warning => Some("warning"),
            Self::Error => Some("error"),
            Self::Notice => Some("notice"),
            _ => None,
        }
    }
}

/// Switch console output to CI annotation format.
pub fn set_ci_mode(enabled: bool) {
    CI_MODE.store(enabled, Ordering::Relaxed);
}

pub fn ci_mode() -> bool {
    CI_MODE.load(Ordering::Relaxed)
}

/// Start mirroring output into `path` (appending).
pub fn init_log(path: &Path) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    if let Ok(mut sink) = LOG_SINK.lock() {
        *sink = Some(LogSink {
            path: path.to_path_buf(),
            file,
        });
    }
    Ok(())
}

/// Path of the active run log, if any.
pub fn log_path() -> Option<PathBuf> {
    LOG_SINK
        .lock()
        .ok()
        .and_then(|sink| sink.as_ref().map(|s| s.path.clone()))
}

/// Log file name for a run started now: `update_log_<YYYYmmdd_HHMMSS>.txt`.
pub fn log_file_name() -> String {
    format!("update_log_{}.txt", Local::now().format("%Y%m%d_%H%M%S"))
}

fn record(level: Level, message: &str) {
    let Ok(mut guard) = LOG_SINK.lock() else {
        return;
    };
    if let Some(sink) = guard.as_mut() {
        let ts = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        // Losing a log line must never fail the run.
        let _ = writeln!(sink.file, "[{}] [{}] {}", ts, level.label(), message);
    }
}

/// Print a CI annotation if CI mode is on and the level has one.
fn annotate(level: Level, message: &str) -> bool {
    match level.annotation() {
        Some(kind) if ci_mode() => {
            println!("::{}::{}", kind, message);
            true
        }
        _ => false,
    }
}

/// Print an action header (blue, bold)
/// Example: "==> Downloading ARM64 (aarch64) artifacts"
pub fn action(message: &str) {
    record(Level::Notice, message);
    if !annotate(Level::Notice, message) {
        println!("{} {}", "==>".blue().bold(), message.bold());
    }
}

/// Print a sub-action (cyan arrow)
/// Example: "  -> resolving versions"
pub fn sub_action(phase: &str) {
    record(Level::Info, phase);
    println!("  {} {}", "->".cyan(), phase);
}

/// Print a detail line (dimmed prefix)
/// Example: "     sha256 3f1c..."
pub fn detail(message: &str) {
    record(Level::Debug, message);
    println!("     {}", message.dimmed());
}

/// Print a success message (green)
pub fn success(message: &str) {
    record(Level::Success, message);
    println!("{} {}", "==>".green().bold(), message.green());
}

/// Print an info message (cyan)
pub fn info(message: &str) {
    record(Level::Info, message);
    println!("{} {}", "::".cyan(), message);
}

/// Print a notice that should stand out in CI logs
pub fn notice(message: &str) {
    record(Level::Notice, message);
    if !annotate(Level::Notice, message) {
        println!("{} {}", "==>".cyan().bold(), message.bold());
    }
}

/// Print a warning message (yellow)
pub fn warning(message: &str) {
    record(Level::Warning, message);
    if !annotate(Level::Warning, message) {
        eprintln!("{} {}", "warning:".yellow().bold(), message.yellow());
    }
}

/// Print an error message (red)
pub fn error(message: &str) {
    record(Level::Error, message);
    if !annotate(Level::Error, message) {
        eprintln!("{} {}", "error:".red().bold(), message.red());
    }
}

/// Print a skip message (dimmed)
/// Example: "==> docker-27.4.1-x86_64.tgz already present, skipping"
pub fn skip(message: &str) {
    record(Level::Warning, message);
    println!("{} {}", "==>".dimmed(), message.dimmed());
}
