//! docker-offline-update - refresh a directory of Docker offline packages
//!
//! Usage:
//!   docker-offline-update                      All architectures into ./packages
//!   docker-offline-update -a x86_64 -o dist    One architecture into ./dist
//!   docker-offline-update --ci                 Emit workflow annotations and outputs

use anyhow::{Context, Result};
use clap::Parser;
use docker_offline_updater::core::arch::expand_selection;
use docker_offline_updater::core::ci;
use docker_offline_updater::core::config::{
    DEFAULT_KEEP_LOGS, DEFAULT_MAX_ATTEMPTS, DOCKER_STATIC_BASE, Endpoints, GITHUB_API_BASE,
    HttpSettings,
};
use docker_offline_updater::helpers::internal::fs_utils;
use docker_offline_updater::{ArchSelection, Updater, UpdaterConfig, output};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "docker-offline-update")]
#[command(about = "Download the latest Docker static binaries for offline installation")]
#[command(version)]
struct Cli {
    /// Directory holding the offline packages
    #[arg(short, long, default_value = "packages")]
    output: PathBuf,

    /// Architectures to update (repeatable)
    #[arg(short, long = "arch", value_enum, default_value = "all")]
    arch: Vec<ArchSelection>,

    /// CI mode: workflow annotations and step outputs
    #[arg(long, env = "GITHUB_ACTIONS")]
    ci: bool,

    /// Number of run logs to keep
    #[arg(long, default_value_t = DEFAULT_KEEP_LOGS)]
    keep_logs: usize,

    /// Download attempts per artifact
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    max_attempts: u32,

    /// GitHub API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = GITHUB_API_BASE)]
    github_api: String,

    /// Static binary distribution root
    #[arg(long, env = "DOCKER_STATIC_URL", default_value = DOCKER_STATIC_BASE)]
    static_base: String,
}

impl Cli {
    fn into_config(self) -> UpdaterConfig {
        let mut config = UpdaterConfig::new(self.output);
        config.architectures = expand_selection(&self.arch);
        config.ci_mode = self.ci;
        config.keep_logs = self.keep_logs;
        config.max_attempts = self.max_attempts;
        config.endpoints = Endpoints {
            github_api: self.github_api,
            static_base: self.static_base,
        };
        config.http = HttpSettings::from_env();
        config
    }
}

fn main() -> Result<ExitCode> {
    let config = Cli::parse().into_config();
    output::set_ci_mode(config.ci_mode);

    fs_utils::ensure_dir(&config.output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            config.output_dir.display()
        )
    })?;
    let log = config.output_dir.join(output::log_file_name());
    output::init_log(&log)
        .with_context(|| format!("Failed to open log file: {}", log.display()))?;

    let ci_mode = config.ci_mode;
    let summary = Updater::new(config).run();

    if ci_mode {
        if let Err(e) = ci::publish(&summary.ci_outputs()) {
            output::warning(&format!("failed to write step outputs: {}", e));
        }
    }

    Ok(if summary.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
