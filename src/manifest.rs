//! Parser for the legacy plaintext `entries` manifest
//!
//! The format is positional: a record starts with a name line, the next line
//! carries the node kind (`file` or `dir`), and two more metadata lines follow.
//! The parser is a small state machine so that malformed or truncated records
//! only cost one line of rescanning instead of failing the whole manifest.
//!
//! The two trailing metadata lines are an assumption about the record shape
//! taken from observed manifests; other historical revisions of the format
//! may lay records out differently.

use std::collections::HashSet;

/// Metadata lines skipped after a recognised `name`/`kind` pair
const TRAILING_FIELDS: usize = 2;

const KIND_FILE: &str = "file";
const KIND_DIR: &str = "dir";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState<'a> {
    SeekingName,
    ExpectKind { name: &'a str },
    SkipFields { remaining: usize },
}

/// Extract tracked file paths from manifest text.
///
/// Returns paths deduplicated in first-seen order. Directory records and
/// names ending in `/` are excluded. A manifest with no file records yields
/// an empty list.
pub fn parse(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();
    let mut state = ScanState::SeekingName;

    for raw in text.lines() {
        let line = raw.trim();

        // A line rejected as a kind token is rescanned as a name candidate.
        loop {
            match state {
                ScanState::SeekingName => {
                    if !is_skippable(line) {
                        state = ScanState::ExpectKind { name: line };
                    }
                    break;
                }
                ScanState::ExpectKind { name } => {
                    if line == KIND_FILE || line == KIND_DIR {
                        if line == KIND_FILE && !name.ends_with('/') && seen.insert(name) {
                            files.push(name.to_string());
                        }
                        state = ScanState::SkipFields {
                            remaining: TRAILING_FIELDS,
                        };
                        break;
                    }
                    state = ScanState::SeekingName;
                }
                ScanState::SkipFields { remaining } => {
                    state = if remaining > 1 {
                        ScanState::SkipFields {
                            remaining: remaining - 1,
                        }
                    } else {
                        ScanState::SeekingName
                    };
                    break;
                }
            }
        }
    }

    files
}

fn is_skippable(line: &str) -> bool {
    line.is_empty() || line.starts_with("<?xml")
}
