//! Puzzle catalog loading.
//!
//! The built-in catalog is compiled into the binary from `data/puzzles.json`. Operators can
//! point `game.catalog_path` at their own JSON array of puzzles to replace it without
//! recompiling. Every catalog is audited on construction: duplicate answers, clue counts
//! other than three and blank clues are rejected, over-long names are only logged.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use thiserror::Error;

use super::audit::audit;
use super::{Puzzle, SelectionPolicy};
use crate::normalize::normalize_subreddit_name;

const BUILTIN_CATALOG: &str = include_str!("../../data/puzzles.json");

/// Errors raised while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// A catalog must hold at least one puzzle so selection always succeeds.
    #[error("catalog contains no puzzles")]
    Empty,

    #[error(
        "catalog failed audit: duplicates {duplicates:?}, bad clue counts {invalid_clue_count:?}, empty clues {empty_clues:?}"
    )]
    Invalid {
        duplicates: Vec<String>,
        invalid_clue_count: Vec<String>,
        empty_clues: Vec<String>,
    },
}

/// An ordered, immutable list of puzzles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    puzzles: Vec<Puzzle>,
}

impl Catalog {
    pub fn new(puzzles: Vec<Puzzle>) -> Result<Self, CatalogError> {
        if puzzles.is_empty() {
            return Err(CatalogError::Empty);
        }
        let report = audit(&puzzles);
        if report.has_errors() {
            return Err(CatalogError::Invalid {
                duplicates: report.duplicates,
                invalid_clue_count: report.invalid_clue_count,
                empty_clues: report.empty_clues,
            });
        }
        for name in &report.too_long {
            log::warn!("catalog answer '{}' is longer than a subreddit name can be", name);
        }
        Ok(Catalog { puzzles })
    }

    /// The catalog shipped with the game.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json_str(BUILTIN_CATALOG)
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let puzzles: Vec<Puzzle> = serde_json::from_str(json)?;
        Self::new(puzzles)
    }

    /// Load a catalog from a JSON file containing an array of puzzles.
    pub fn load_from_json<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let catalog = Self::new(read_puzzles(path)?)?;
        log::debug!("loaded {} puzzles from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    pub fn puzzles(&self) -> &[Puzzle] {
        &self.puzzles
    }

    pub fn len(&self) -> usize {
        self.puzzles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.puzzles.is_empty()
    }

    /// Look up a puzzle by answer, ignoring case and any `r/` style prefix.
    pub fn find(&self, subreddit: &str) -> Option<&Puzzle> {
        let wanted = normalize_subreddit_name(subreddit);
        self.puzzles
            .iter()
            .find(|p| normalize_subreddit_name(&p.subreddit) == wanted)
    }

    /// The puzzle for `date` under `policy`. Never `None` for a constructed catalog.
    pub fn select(&self, policy: &SelectionPolicy, date: NaiveDate) -> Option<&Puzzle> {
        policy.select(date, &self.puzzles)
    }
}

/// Parse a JSON puzzle file without validating it, for reporting on broken catalogs.
pub fn read_puzzles<P: AsRef<Path>>(path: P) -> Result<Vec<Puzzle>, CatalogError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_json::from_str(&contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_catalog_parses() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.len(), 10);
        assert_eq!(catalog.puzzles()[0].subreddit, "aww");
        assert!(catalog.puzzles().iter().all(|p| p.clues.len() == 3));
        assert!(catalog.puzzles().iter().all(|p| !p.category.is_empty()));
    }

    #[test]
    fn empty_catalog_is_rejected() {
        assert!(matches!(Catalog::from_json_str("[]"), Err(CatalogError::Empty)));
    }

    #[test]
    fn find_ignores_prefix_and_case() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.find("r/AskReddit").unwrap().subreddit, "askreddit");
        assert!(catalog.find("notasub").is_none());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"subreddit":"rust","category":"programming","clues":["a","b","c"]}}]"#
        )
        .unwrap();
        let catalog = Catalog::load_from_json(file.path()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.puzzles()[0].date, None);
    }

    #[test]
    fn two_clue_entry_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"subreddit":"aww","category":"animals","clues":["a","b","c"]}},
               {{"subreddit":"pics","category":"photography","clues":["a","b"]}}]"#
        )
        .unwrap();
        match Catalog::load_from_json(file.path()) {
            Err(CatalogError::Invalid {
                invalid_clue_count, ..
            }) => assert_eq!(invalid_clue_count, vec!["pics"]),
            other => panic!("expected audit failure, got {:?}", other),
        }
        // The raw reader still returns it so the audit command can report on it.
        assert_eq!(read_puzzles(file.path()).unwrap().len(), 2);
    }

    #[test]
    fn duplicate_answers_and_blank_clues_are_rejected() {
        let dup = vec![
            Puzzle::new("pics", "photography", ["a", "b", "c"]),
            Puzzle::new("Pics", "art", ["d", "e", "f"]),
        ];
        assert!(matches!(
            Catalog::new(dup),
            Err(CatalogError::Invalid { duplicates, .. }) if duplicates == vec!["Pics"]
        ));
        let blank = vec![Puzzle::new("aww", "animals", ["a", " ", "c"])];
        assert!(matches!(Catalog::new(blank), Err(CatalogError::Invalid { .. })));
    }

    #[test]
    fn long_names_are_accepted() {
        let long = vec![Puzzle::new("thisnameiswaytoolong", "misc", ["a", "b", "c"])];
        assert_eq!(Catalog::new(long).unwrap().len(), 1);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Catalog::load_from_json("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
