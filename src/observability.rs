//! Logging setup and run-level counters

use crate::humanize::ByteSize;
use crate::report::ReportSummary;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `verbosity` (count of `-v` flags)
/// raises `default_level`.
pub fn init_tracing(default_level: &str, verbosity: u8) {
    let level = match verbosity {
        0 => default_level,
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("svn_ripper={level},warn")));

    // A subscriber may already be installed (tests, embedding)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Counters accumulated across all targets of a run
#[derive(Debug, Default)]
pub struct RunStats {
    targets_processed: AtomicU64,
    targets_skipped: AtomicU64,
    files_ok: AtomicU64,
    files_failed: AtomicU64,
    files_undecodable: AtomicU64,
    bytes: AtomicU64,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target_processed(&self, summary: &ReportSummary) {
        self.targets_processed.fetch_add(1, Ordering::Relaxed);
        self.files_ok.fetch_add(summary.ok as u64, Ordering::Relaxed);
        self.files_failed.fetch_add(summary.failed as u64, Ordering::Relaxed);
        self.files_undecodable
            .fetch_add(summary.undecodable as u64, Ordering::Relaxed);
        self.bytes.fetch_add(summary.bytes, Ordering::Relaxed);
        tracing::debug!(counter = "targets_processed", "Metric incremented");
    }

    pub fn target_skipped(&self) {
        self.targets_skipped.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "targets_skipped", "Metric incremented");
    }

    pub fn snapshot(&self) -> RunStatsSnapshot {
        RunStatsSnapshot {
            targets_processed: self.targets_processed.load(Ordering::Relaxed),
            targets_skipped: self.targets_skipped.load(Ordering::Relaxed),
            files_ok: self.files_ok.load(Ordering::Relaxed),
            files_failed: self.files_failed.load(Ordering::Relaxed),
            files_undecodable: self.files_undecodable.load(Ordering::Relaxed),
            bytes: ByteSize(self.bytes.load(Ordering::Relaxed)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunStatsSnapshot {
    pub targets_processed: u64,
    pub targets_skipped: u64,
    pub files_ok: u64,
    pub files_failed: u64,
    pub files_undecodable: u64,
    pub bytes: ByteSize,
}

impl RunStatsSnapshot {
    pub fn log(&self) {
        tracing::info!(
            targets = self.targets_processed,
            skipped = self.targets_skipped,
            ok = self.files_ok,
            failed = self.files_failed,
            undecodable = self.files_undecodable,
            downloaded = %self.bytes,
            "Run complete"
        );
    }
}
