//! Recovery worker
//!
//! One invocation per tracked file: fetch the pristine copy, decode it, write
//! it under the output directory and describe what happened in an
//! [`OutcomeRecord`].

pub mod runner;

pub use runner::recover;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Per-file recovery status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecoveryStatus {
    Ok,
    Failed,
    Undecodable,
}

impl RecoveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecoveryStatus::Ok => "OK",
            RecoveryStatus::Failed => "FAILED",
            RecoveryStatus::Undecodable => "UNDECODABLE",
        }
    }
}

impl std::fmt::Display for RecoveryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of recovering one tracked file. Created once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeRecord {
    pub file: String,
    pub status: RecoveryStatus,
    /// Raw response size in bytes, 0 when the request itself failed
    pub size: u64,
    pub saved_as: Option<PathBuf>,
}

impl OutcomeRecord {
    pub fn ok(file: &str, size: u64, saved_as: PathBuf) -> Self {
        Self {
            file: file.to_string(),
            status: RecoveryStatus::Ok,
            size,
            saved_as: Some(saved_as),
        }
    }

    pub fn failed(file: &str, size: u64) -> Self {
        Self {
            file: file.to_string(),
            status: RecoveryStatus::Failed,
            size,
            saved_as: None,
        }
    }

    pub fn undecodable(file: &str, size: u64) -> Self {
        Self {
            file: file.to_string(),
            status: RecoveryStatus::Undecodable,
            size,
            saved_as: None,
        }
    }
}
