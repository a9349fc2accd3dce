//! Catalog auditing, run on every catalog construction and by the `audit` subcommand.
//!
//! Checks performed for every puzzle:
//! - duplicate answers (case-insensitive)
//! - exactly [`CLUES_PER_PUZZLE`] clues
//! - no blank clues
//! - answer no longer than [`MAX_SUBREDDIT_LEN`] characters (warning only)

use std::collections::HashSet;

use serde::Serialize;

use super::{Puzzle, CLUES_PER_PUZZLE};

/// Reddit caps community names at this length.
pub const MAX_SUBREDDIT_LEN: usize = 16;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    pub checked: usize,
    pub duplicates: Vec<String>,
    pub invalid_clue_count: Vec<String>,
    pub empty_clues: Vec<String>,
    pub too_long: Vec<String>,
}

impl AuditReport {
    /// True when the catalog must not be used as-is. Long names only warn.
    pub fn has_errors(&self) -> bool {
        self.checked == 0
            || !self.duplicates.is_empty()
            || !self.invalid_clue_count.is_empty()
            || !self.empty_clues.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.too_long.is_empty()
    }
}

pub fn audit(puzzles: &[Puzzle]) -> AuditReport {
    let mut report = AuditReport {
        checked: puzzles.len(),
        ..Default::default()
    };
    let mut seen = HashSet::new();

    for p in puzzles {
        if !seen.insert(p.subreddit.to_lowercase()) {
            report.duplicates.push(p.subreddit.clone());
        }
        if p.clues.len() != CLUES_PER_PUZZLE {
            report.invalid_clue_count.push(p.subreddit.clone());
        }
        if p.clues.iter().any(|c| c.trim().is_empty()) {
            report.empty_clues.push(p.subreddit.clone());
        }
        if p.subreddit.chars().count() > MAX_SUBREDDIT_LEN {
            report.too_long.push(p.subreddit.clone());
        }
    }

    if report.has_errors() {
        log::warn!(
            "catalog audit failed: {} duplicate(s), {} bad clue count(s), {} empty clue set(s)",
            report.duplicates.len(),
            report.invalid_clue_count.len(),
            report.empty_clues.len()
        );
    }
    report
}
