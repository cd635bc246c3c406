//! Target processor
//!
//! Drives one base URL through the pipeline: manifest fetch, parse, bounded
//! fan-out of file recoveries, then report generation. Outcomes are reordered
//! to manifest order before reporting, so reports do not depend on which
//! download finished first.

use crate::config::RecoveryConfig;
use crate::manifest;
use crate::observability::RunStats;
use crate::report::{Report, ReportError, ReportPaths, ReportSummary};
use crate::targets::Target;
use crate::transport::Transport;
use crate::worker::{self, OutcomeRecord};
use chrono::Local;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// What happened to one target
#[derive(Debug)]
pub enum TargetOutcome {
    /// Manifest could not be fetched; nothing was written
    Unreachable,
    Reported {
        paths: ReportPaths,
        summary: ReportSummary,
        /// Cancelled before every file was attempted; the report is partial
        partial: bool,
    },
    ReportFailed {
        summary: ReportSummary,
        error: ReportError,
    },
}

impl TargetOutcome {
    pub fn is_reachable(&self) -> bool {
        !matches!(self, TargetOutcome::Unreachable)
    }
}

/// Summary of a whole run over many targets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOutcome {
    pub attempted: usize,
    pub reachable: usize,
}

pub struct TargetProcessor {
    transport: Arc<dyn Transport>,
    template: Arc<str>,
    options: RecoveryConfig,
    cancel: CancellationToken,
}

impl TargetProcessor {
    pub fn new(transport: Arc<dyn Transport>, template: String, options: RecoveryConfig) -> Self {
        Self {
            transport,
            template: Arc::from(template),
            options,
            cancel: CancellationToken::new(),
        }
    }

    /// Share a cancellation token, e.g. one tripped by Ctrl-C
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Output directory for `target` under the configured root
    pub fn output_dir_for(&self, target: &Target) -> PathBuf {
        if self.options.per_target_dirs {
            self.options.output_dir.join(target.slug())
        } else {
            self.options.output_dir.clone()
        }
    }

    /// Process targets one after another. Invalid URLs and unreachable
    /// manifests are skipped; cancellation stops before the next target.
    pub async fn run(&self, raw_targets: &[String], stats: &RunStats) -> RunOutcome {
        let mut outcome = RunOutcome::default();

        for raw in raw_targets {
            if self.cancel.is_cancelled() {
                warn!("Cancelled, skipping remaining targets");
                break;
            }
            outcome.attempted += 1;

            let target = match Target::parse(raw) {
                Ok(target) => target,
                Err(e) => {
                    warn!(error = %e, "Skipping target");
                    stats.target_skipped();
                    continue;
                }
            };

            let output_dir = self.output_dir_for(&target);
            match self.process(&target, &output_dir).await {
                TargetOutcome::Unreachable => stats.target_skipped(),
                TargetOutcome::Reported { summary, .. } | TargetOutcome::ReportFailed { summary, .. } => {
                    outcome.reachable += 1;
                    stats.target_processed(&summary);
                }
            }
        }

        outcome
    }

    /// Recover every tracked file of one target into `output_dir` and write its reports
    pub async fn process(&self, target: &Target, output_dir: &Path) -> TargetOutcome {
        let control_dir = self.options.control_dir.as_str();
        let entries_url = target.entries_url(control_dir);
        info!(url = %entries_url, "Fetching entries");

        let response = self.transport.get(entries_url.as_str()).await;
        if !response.is_success() {
            warn!(
                target = %target,
                status = ?response.status_code,
                "Failed to fetch entries, skipping target"
            );
            return TargetOutcome::Unreachable;
        }

        let files = manifest::parse(&String::from_utf8_lossy(&response.body));
        info!(target = %target, count = files.len(), "Found tracked files");
        for file in &files {
            debug!(file, "Tracked");
        }

        let total = files.len();
        let outcomes = self.recover_all(target, files, output_dir).await;
        let partial = outcomes.len() < total;
        if partial {
            warn!(
                target = %target,
                completed = outcomes.len(),
                total,
                "Cancelled, writing partial report"
            );
        }

        let report = Report::new(outcomes, Local::now());
        let summary = report.summary();
        info!(
            target = %target,
            ok = summary.ok,
            failed = summary.failed,
            undecodable = summary.undecodable,
            "Recovery finished"
        );

        match self.write_report(report, output_dir).await {
            Ok(paths) => TargetOutcome::Reported {
                paths,
                summary,
                partial,
            },
            Err(e) => {
                error!(target = %target, error = %e, "Failed to write report");
                TargetOutcome::ReportFailed { summary, error: e }
            }
        }
    }

    /// Fan recoveries out over at most `workers` concurrent tasks
    async fn recover_all(
        &self,
        target: &Target,
        files: Vec<String>,
        output_dir: &Path,
    ) -> Vec<OutcomeRecord> {
        let permits = Arc::new(Semaphore::new(self.options.workers.max(1)));
        let mut tasks = JoinSet::new();

        for (index, file) in files.into_iter().enumerate() {
            let permits = Arc::clone(&permits);
            let transport = Arc::clone(&self.transport);
            let cancel = self.cancel.clone();
            let target = target.clone();
            let output_dir = output_dir.to_path_buf();
            let control_dir = self.options.control_dir.clone();

            tasks.spawn(async move {
                let _permit = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return None,
                    permit = permits.acquire_owned() => permit.ok()?,
                };
                if cancel.is_cancelled() {
                    return None;
                }

                let record =
                    worker::recover(transport.as_ref(), &target, &file, &output_dir, &control_dir)
                        .await;
                Some((index, record))
            });
        }

        let mut completed = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Some(entry)) => completed.push(entry),
                Ok(None) => {}
                Err(e) => error!(error = %e, "Recovery task panicked"),
            }
        }

        completed.sort_by_key(|(index, _)| *index);
        completed.into_iter().map(|(_, record)| record).collect()
    }

    async fn write_report(
        &self,
        report: Report,
        output_dir: &Path,
    ) -> Result<ReportPaths, ReportError> {
        let template = Arc::clone(&self.template);
        let output_dir = output_dir.to_path_buf();
        let archive = self.options.archive;

        tokio::task::spawn_blocking(move || report.write(&output_dir, &template, archive))
            .await
            .map_err(|e| ReportError::Io(std::io::Error::other(e)))?
    }
}
