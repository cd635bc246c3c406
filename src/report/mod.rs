//! Report generation
//!
//! A [`Report`] is a read-only view over one target's outcome list plus the
//! time it was generated. It is written out as:
//!
//! - `report_<stamp>.html` - the outcome table rendered into an HTML template
//! - `report_<stamp>.json` - the outcome records serialized as-is
//! - `recovered_<stamp>.zip` - optional archive of the whole output directory

mod archive;
pub mod html;

pub use archive::package;

use crate::worker::{OutcomeRecord, RecoveryStatus};
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

const REPORT_PREFIX: &str = "report_";
const ARCHIVE_PREFIX: &str = "recovered_";
const FILE_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to read template {path}: {source}")]
    Template {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Load a template from disk, or the built-in one when no path is given
pub fn load_template(path: Option<&Path>) -> Result<String, ReportError> {
    match path {
        Some(path) => fs::read_to_string(path).map_err(|source| ReportError::Template {
            path: path.display().to_string(),
            source,
        }),
        None => Ok(html::DEFAULT_TEMPLATE.to_string()),
    }
}

/// Paths of the files written for one report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub html: PathBuf,
    pub json: PathBuf,
    pub archive: Option<PathBuf>,
}

/// Per-status tallies over an outcome list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportSummary {
    pub ok: usize,
    pub failed: usize,
    pub undecodable: usize,
    pub bytes: u64,
}

#[derive(Debug, Clone)]
pub struct Report {
    generated_at: DateTime<Local>,
    outcomes: Vec<OutcomeRecord>,
}

impl Report {
    pub fn new(outcomes: Vec<OutcomeRecord>, generated_at: DateTime<Local>) -> Self {
        Self {
            generated_at,
            outcomes,
        }
    }

    pub fn outcomes(&self) -> &[OutcomeRecord] {
        &self.outcomes
    }

    pub fn stamp(&self) -> String {
        self.generated_at.format(FILE_STAMP_FORMAT).to_string()
    }

    pub fn summary(&self) -> ReportSummary {
        self.outcomes
            .iter()
            .fold(ReportSummary::default(), |mut summary, record| {
                match record.status {
                    RecoveryStatus::Ok => summary.ok += 1,
                    RecoveryStatus::Failed => summary.failed += 1,
                    RecoveryStatus::Undecodable => summary.undecodable += 1,
                }
                summary.bytes += record.size;
                summary
            })
    }

    pub fn render_html(&self, template: &str) -> String {
        let date = self.generated_at.format(DISPLAY_FORMAT).to_string();
        html::render(template, &date, &self.outcomes)
    }

    pub fn render_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(&self.outcomes)?)
    }

    /// Write the HTML and JSON reports into `output_dir`, and optionally
    /// package the directory afterwards.
    pub fn write(
        &self,
        output_dir: &Path,
        template: &str,
        archive: bool,
    ) -> Result<ReportPaths, ReportError> {
        fs::create_dir_all(output_dir)?;
        let stamp = self.stamp();

        let html_path = output_dir.join(format!("{REPORT_PREFIX}{stamp}.html"));
        fs::write(&html_path, self.render_html(template))?;
        info!(path = %html_path.display(), "HTML report saved");

        let json_path = output_dir.join(format!("{REPORT_PREFIX}{stamp}.json"));
        fs::write(&json_path, self.render_json()?)?;
        info!(path = %json_path.display(), "JSON report saved");

        // Reports are already on disk; a failed archive only loses the zip
        let archive = if archive {
            match package(output_dir, &stamp) {
                Ok(path) => Some(path),
                Err(e) => {
                    warn!(dir = %output_dir.display(), error = %e, "Failed to package output");
                    None
                }
            }
        } else {
            None
        };

        Ok(ReportPaths {
            html: html_path,
            json: json_path,
            archive,
        })
    }
}
