//! Run orchestration
//!
//! A run moves through fixed phases:
//!
//! ```text
//! Init -> VersionsResolved -> Acquired(arch)* -> Retained -> Finalized
//! ```
//!
//! No phase can abort the run. Failures are counted and surface only through
//! [`RunSummary::is_success`].

use crate::core::arch::Architecture;
use crate::core::artifact::ArtifactKind;
use crate::core::config::UpdaterConfig;
use crate::core::output;
use crate::core::stats::{DownloadOutcome, RunStats};
use crate::core::version::VersionString;
use crate::helpers::acquire::{
    AssetLocator, DownloadRequest, Downloader, HttpStaticIndex, RetryPolicy, VersionResolver,
    resolve_with_fallback,
};
use crate::helpers::http::HttpClient;
use crate::helpers::internal::fs_utils;
use crate::helpers::maintain::{
    IntegrityLedger, ResolvedVersions, RetainedVersions, RetentionManager, RunManifest,
};
use std::collections::BTreeMap;

const RULE: &str = "============================================================";

/// What happened for one architecture.
#[derive(Debug, Clone)]
pub struct ArchReport {
    pub arch: Architecture,
    pub resolved: ResolvedVersions,
    pub outcomes: Vec<(ArtifactKind, DownloadOutcome)>,
    pub stats: RunStats,
}

impl ArchReport {
    pub fn attempted(&self) -> u32 {
        self.outcomes.len() as u32
    }

    pub fn achieved(&self) -> u32 {
        self.outcomes.iter().filter(|(_, o)| o.is_achieved()).count() as u32
    }

    pub fn outcome(&self, kind: ArtifactKind) -> Option<DownloadOutcome> {
        self.outcomes
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, o)| *o)
    }
}

/// Result of a complete run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub engine_version: VersionString,
    pub compose_version: VersionString,
    pub reports: Vec<ArchReport>,
    pub stats: RunStats,
}

impl RunSummary {
    pub fn attempted(&self) -> u32 {
        self.reports.iter().map(ArchReport::attempted).sum()
    }

    pub fn achieved(&self) -> u32 {
        self.reports.iter().map(ArchReport::achieved).sum()
    }

    /// Every attempted artifact is on disk.
    pub fn is_success(&self) -> bool {
        self.achieved() == self.attempted()
    }

    /// Step outputs published to the CI platform.
    pub fn ci_outputs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("docker_version", self.engine_version.to_string()),
            ("compose_version", self.compose_version.to_string()),
            ("success_count", self.achieved().to_string()),
            ("total_count", self.attempted().to_string()),
            ("total_size_mb", format!("{:.2}", self.stats.total_size_mb())),
        ]
    }
}

pub struct Updater {
    config: UpdaterConfig,
    client: HttpClient,
}

impl Updater {
    pub fn new(config: UpdaterConfig) -> Self {
        let client = HttpClient::new(config.http.clone());
        Self { config, client }
    }

    pub fn run(&self) -> RunSummary {
        output::notice(RULE);
        output::notice("starting Docker offline package update");
        let names: Vec<_> = self
            .config
            .architectures
            .iter()
            .map(|a| a.display_name())
            .collect();
        output::info(&format!("architectures: {}", names.join(", ")));
        output::notice(RULE);

        if let Err(e) = fs_utils::ensure_dir(&self.config.output_dir) {
            output::error(&format!(
                "cannot create output directory {}: {}",
                self.config.output_dir.display(),
                e
            ));
        }

        let (engine_version, compose_version) = self.resolve_versions();

        let reports: Vec<ArchReport> = self
            .config
            .architectures
            .iter()
            .map(|&arch| self.acquire_arch(arch, &engine_version, &compose_version))
            .collect();

        self.retain(&reports);

        let mut stats = RunStats::default();
        for report in &reports {
            stats.merge(&report.stats);
        }

        let summary = RunSummary {
            engine_version,
            compose_version,
            reports,
            stats,
        };
        self.finalize(&summary);
        summary
    }

    fn resolve_versions(&self) -> (VersionString, VersionString) {
        let resolver = VersionResolver::new(
            &self.client,
            &self.config.endpoints,
            self.config.fallback_engine.clone(),
            self.config.fallback_compose.clone(),
        );
        (
            resolver.latest_engine_version(),
            resolver.latest_compose_version(),
        )
    }

    fn acquire_arch(
        &self,
        arch: Architecture,
        engine: &VersionString,
        compose: &VersionString,
    ) -> ArchReport {
        output::action(&format!("downloading {} artifacts", arch.display_name()));

        let index = HttpStaticIndex::new(&self.client, &self.config.endpoints);
        let locator = AssetLocator::new(&self.client, &self.config.endpoints);
        let downloader = Downloader::new(
            &self.client,
            &self.config.output_dir,
            RetryPolicy::new(self.config.max_attempts, self.config.retry_base_delay),
        );

        let docker = resolve_with_fallback(&index, arch, ArtifactKind::Engine, engine);
        let rootless = resolve_with_fallback(&index, arch, ArtifactKind::RootlessExtras, &docker);

        let mut outcomes = Vec::with_capacity(3);

        let engine_outcome = match index.archive_url(arch, ArtifactKind::Engine, &docker) {
            Some(url) => downloader.fetch(&static_request(arch, ArtifactKind::Engine, &docker, url)),
            None => DownloadOutcome::Failed,
        };
        outcomes.push((ArtifactKind::Engine, engine_outcome));

        let compose_outcome = self.acquire_compose(&downloader, &locator, arch, compose);
        outcomes.push((ArtifactKind::Compose, compose_outcome));

        let rootless_outcome =
            match index.archive_url(arch, ArtifactKind::RootlessExtras, &rootless) {
                Some(url) => downloader.fetch(&static_request(
                    arch,
                    ArtifactKind::RootlessExtras,
                    &rootless,
                    url,
                )),
                None => DownloadOutcome::Failed,
            };
        outcomes.push((ArtifactKind::RootlessExtras, rootless_outcome));

        let mut stats = RunStats::default();
        for (_, outcome) in &outcomes {
            stats.record(*outcome);
        }

        let report = ArchReport {
            arch,
            resolved: ResolvedVersions {
                docker,
                rootless_extras: rootless,
                compose: compose.clone(),
            },
            outcomes,
            stats,
        };

        let line = format!(
            "{} done: {}/{}",
            arch.display_name(),
            report.achieved(),
            report.attempted()
        );
        if report.achieved() == report.attempted() {
            output::notice(&line);
        } else {
            output::warning(&line);
        }
        report
    }

    fn acquire_compose(
        &self,
        downloader: &Downloader<'_>,
        locator: &AssetLocator<'_>,
        arch: Architecture,
        compose: &VersionString,
    ) -> DownloadOutcome {
        let filename = ArtifactKind::Compose.filename(compose, arch);

        // A present file is skipped by the downloader before the URL is used.
        let url = if downloader.destination(&filename).exists() {
            String::new()
        } else {
            match locator.locate_asset(compose, arch) {
                Some(url) => url,
                None => return DownloadOutcome::Failed,
            }
        };

        downloader.fetch(&DownloadRequest {
            url,
            filename,
            description: ArtifactKind::Compose.description(arch),
            executable: true,
        })
    }

    fn retain(&self, reports: &[ArchReport]) {
        output::action("cleaning up superseded files");
        let retention = RetentionManager::new(&self.config.output_dir);
        for report in reports {
            let retained = RetainedVersions::new(
                report.resolved.docker.clone(),
                report.resolved.compose.clone(),
            )
            .with_rootless(report.resolved.rootless_extras.clone());
            retention.prune_stale(report.arch, &retained);
        }
        retention.prune_logs(self.config.keep_logs);
    }

    fn finalize(&self, summary: &RunSummary) {
        let ledger = IntegrityLedger::new(&self.config.output_dir);
        if let Err(e) = ledger.write_checksums() {
            output::error(&format!("failed to write checksums: {}", e));
        }

        let resolved: BTreeMap<_, _> = summary
            .reports
            .iter()
            .map(|r| (r.arch, r.resolved.clone()))
            .collect();
        let manifest = RunManifest::now(
            summary.engine_version.clone(),
            summary.compose_version.clone(),
            self.config.architectures.clone(),
            resolved,
            summary.stats,
        );
        if let Err(e) = ledger.write_manifest(&manifest) {
            output::error(&format!("failed to write version info: {}", e));
        }

        output::notice(RULE);
        let line = format!(
            "update finished: {}/{} artifacts available",
            summary.achieved(),
            summary.attempted()
        );
        if summary.is_success() {
            output::notice(&line);
        } else {
            output::warning(&line);
        }
        output::info(&format!("  downloaded: {}", summary.stats.success));
        output::info(&format!("  failed:     {}", summary.stats.failed));
        output::info(&format!("  skipped:    {}", summary.stats.skipped));
        output::info(&format!("  total size: {:.2} MB", summary.stats.total_size_mb()));
        output::info(&format!("output directory: {}", self.config.output_dir.display()));
        if let Some(log) = output::log_path() {
            output::info(&format!("log file: {}", log.display()));
        }
        output::notice(RULE);
    }
}

fn static_request(
    arch: Architecture,
    kind: ArtifactKind,
    version: &VersionString,
    url: String,
) -> DownloadRequest {
    DownloadRequest {
        url,
        filename: kind.filename(version, arch),
        description: kind.description(arch),
        executable: kind.is_executable(),
    }
}
