//! # Puzzle Module - Daily Puzzle Selection
//!
//! A puzzle is one day's trivia unit: the subreddit to guess, three clues revealed
//! in order, and a category tag used when building multiple-choice distractors.
//!
//! ## Selection Policies
//!
//! Two ways of mapping a calendar day onto the catalog are supported:
//!
//! - [`SelectionPolicy::Calendar`] - the puzzle whose `date` matches the day, or
//!   catalog entry 0 when no entry carries that date. Dates before and after the
//!   catalog both degrade to entry 0; this is a fallback, not an error.
//! - [`SelectionPolicy::Rotation`] - `abs(days since epoch) mod catalog length`.
//!   Every day maps onto a puzzle and the catalog repeats once exhausted. Days
//!   before the epoch use the absolute offset, so the mapping mirrors around the
//!   epoch instead of failing.
//!
//! ```rust
//! use chrono::NaiveDate;
//! use snooclues::puzzle::{Catalog, SelectionPolicy};
//!
//! let catalog = Catalog::builtin().unwrap();
//! let day = NaiveDate::from_ymd_opt(2026, 2, 3).unwrap();
//! let puzzle = catalog.select(&SelectionPolicy::Calendar, day).unwrap();
//! assert_eq!(puzzle.subreddit, "gaming");
//! ```

pub mod audit;
pub mod catalog;

pub use audit::{audit, AuditReport};
pub use catalog::{read_puzzles, Catalog, CatalogError};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Number of clues every puzzle is expected to carry.
pub const CLUES_PER_PUZZLE: usize = 3;

/// A single trivia unit from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
    /// Explicit calendar day for calendar-anchored catalogs. Rotation catalogs omit it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// The answer, without any `r/` prefix.
    pub subreddit: String,
    /// Hints in reveal order.
    pub clues: Vec<String>,
    #[serde(default)]
    pub category: String,
}

impl Puzzle {
    pub fn new(subreddit: &str, category: &str, clues: [&str; CLUES_PER_PUZZLE]) -> Self {
        Puzzle {
            date: None,
            subreddit: subreddit.to_string(),
            clues: clues.iter().map(|c| c.to_string()).collect(),
            category: category.to_string(),
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }
}

/// How a calendar day is mapped onto the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "policy", rename_all = "lowercase")]
pub enum SelectionPolicy {
    /// Match on the puzzle's explicit `date`, falling back to the first entry.
    #[default]
    Calendar,
    /// Cycle through the catalog, counting whole days from `epoch`.
    Rotation { epoch: NaiveDate },
}

impl SelectionPolicy {
    /// Pick the puzzle for `date`. Only an empty catalog yields `None`.
    pub fn select<'a>(&self, date: NaiveDate, puzzles: &'a [Puzzle]) -> Option<&'a Puzzle> {
        match self {
            SelectionPolicy::Calendar => puzzle_by_date(date, puzzles),
            SelectionPolicy::Rotation { epoch } => puzzle_by_rotation(date, *epoch, puzzles),
        }
    }
}

/// Calendar-anchored selection: the puzzle dated `date`, else the first puzzle.
pub fn puzzle_by_date(date: NaiveDate, puzzles: &[Puzzle]) -> Option<&Puzzle> {
    puzzles
        .iter()
        .find(|p| p.date == Some(date))
        .or_else(|| puzzles.first())
}

/// Index used by rotation-anchored selection. `None` for an empty catalog.
pub fn rotation_index(date: NaiveDate, epoch: NaiveDate, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    // NaiveDate subtraction counts whole calendar days, so no flooring is needed.
    let offset = date.signed_duration_since(epoch).num_days();
    Some((offset.unsigned_abs() % len as u64) as usize)
}

/// Rotation-anchored selection: `catalog[abs(days since epoch) mod len]`.
pub fn puzzle_by_rotation(date: NaiveDate, epoch: NaiveDate, puzzles: &[Puzzle]) -> Option<&Puzzle> {
    rotation_index(date, epoch, puzzles.len()).and_then(|idx| puzzles.get(idx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sample() -> Vec<Puzzle> {
        vec![
            Puzzle::new("aww", "animals", ["clue1", "clue2", "clue3"]).with_date(day("2026-02-01")),
            Puzzle::new("askreddit", "discussion", ["clue1", "clue2", "clue3"])
                .with_date(day("2026-02-02")),
        ]
    }

    #[test]
    fn calendar_exact_match() {
        let puzzles = sample();
        let p = puzzle_by_date(day("2026-02-02"), &puzzles).unwrap();
        assert_eq!(p.subreddit, "askreddit");
    }

    #[test]
    fn calendar_falls_back_to_first_entry() {
        let puzzles = sample();
        assert_eq!(puzzle_by_date(day("2099-01-01"), &puzzles).unwrap().subreddit, "aww");
        assert_eq!(puzzle_by_date(day("1999-12-31"), &puzzles).unwrap().subreddit, "aww");
    }

    #[test]
    fn empty_catalog_selects_nothing() {
        assert!(puzzle_by_date(day("2026-02-01"), &[]).is_none());
        assert!(puzzle_by_rotation(day("2026-02-01"), day("2026-01-01"), &[]).is_none());
    }

    #[test]
    fn rotation_wraps_and_mirrors_before_epoch() {
        let epoch = day("2026-01-01");
        assert_eq!(rotation_index(epoch, epoch, 3), Some(0));
        assert_eq!(rotation_index(epoch + Duration::days(4), epoch, 3), Some(1));
        // One day before the epoch uses the absolute offset.
        assert_eq!(rotation_index(epoch - Duration::days(1), epoch, 3), Some(1));
        assert_eq!(rotation_index(epoch - Duration::days(3), epoch, 3), Some(0));
    }

    #[test]
    fn policy_dispatch() {
        let puzzles = sample();
        let rotation = SelectionPolicy::Rotation { epoch: day("2026-02-01") };
        assert_eq!(rotation.select(day("2026-02-02"), &puzzles).unwrap().subreddit, "askreddit");
        assert_eq!(rotation.select(day("2026-02-03"), &puzzles).unwrap().subreddit, "aww");
        assert_eq!(
            SelectionPolicy::Calendar.select(day("2026-02-03"), &puzzles).unwrap().subreddit,
            "aww"
        );
    }

    #[test]
    fn policy_serde_shape() {
        let json = serde_json::to_string(&SelectionPolicy::Rotation { epoch: day("2026-02-01") })
            .unwrap();
        assert_eq!(json, r#"{"policy":"rotation","epoch":"2026-02-01"}"#);
        let back: SelectionPolicy = serde_json::from_str(r#"{"policy":"calendar"}"#).unwrap();
        assert_eq!(back, SelectionPolicy::Calendar);
    }
}
