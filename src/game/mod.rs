//! # Game Module - Daily Game Flow
//!
//! [`GameService`] is what a request handler talks to. It owns the puzzle catalog and the
//! scoring settings and is handed a [`GameStore`] at construction; it never reaches for
//! global state.
//!
//! ## Flow
//!
//! 1. [`GameService::init`] - today's clues, the player's attempts/winner status, streak,
//!    rank and four multiple-choice options.
//! 2. [`GameService::guess`] - counts the attempt, and on a correct answer marks the day
//!    won, advances the streak, bumps total wins and adds points to the leaderboard.
//! 3. [`GameService::share_text`] - brag line for a solved day.
//! 4. [`GameService::leaderboard`] - top players with their ranks.
//!
//! ## Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use snooclues::game::{GameService, GameSettings};
//! use snooclues::puzzle::Catalog;
//! use snooclues::storage::MemoryStore;
//!
//! let service = GameService::new(Catalog::builtin().unwrap(), GameSettings::default(), MemoryStore::new());
//! let today = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
//! let outcome = service.guess("t3_post", "alice", today, "r/aww").unwrap();
//! assert!(outcome.correct);
//! assert_eq!(outcome.streak, 1);
//! ```

pub mod errors;

pub use errors::GameError;

use chrono::NaiveDate;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::choices::{multiple_choices, Choice};
use crate::logutil::escape_log;
use crate::normalize::{answers_match, normalize_subreddit_name};
use crate::puzzle::{Catalog, Puzzle, SelectionPolicy};
use crate::rank::Rank;
use crate::storage::{GameStore, PlayerKey};

/// Username hosts pass for players who are not logged in.
pub const ANONYMOUS_USER: &str = "anonymous";

/// Tunables for scoring and puzzle selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSettings {
    #[serde(default)]
    pub selection: SelectionPolicy,
    /// Leaderboard points awarded for each solved day.
    #[serde(default = "default_points_per_win")]
    pub points_per_win: u64,
    /// Guesses allowed per day; `None` means unlimited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<u32>,
}

fn default_points_per_win() -> u64 {
    10
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            selection: SelectionPolicy::Calendar,
            points_per_win: default_points_per_win(),
            max_attempts: None,
        }
    }
}

/// Everything the client needs to render the day's game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameInit {
    pub date: NaiveDate,
    pub clues: Vec<String>,
    pub has_played_today: bool,
    pub attempts: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempts_remaining: Option<u32>,
    pub is_winner: bool,
    pub streak: u32,
    pub total_wins: u32,
    pub score: u64,
    pub rank: Rank,
    pub choices: Vec<Choice>,
    /// Revealed only once the player has solved the day.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuessOutcome {
    pub correct: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    pub attempts: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempts_remaining: Option<u32>,
    pub streak: u32,
    pub total_wins: u32,
    pub score: u64,
    pub rank: Rank,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry {
    pub position: usize,
    pub username: String,
    pub score: u64,
    pub rank: Rank,
}

pub struct GameService<S: GameStore> {
    catalog: Catalog,
    settings: GameSettings,
    store: S,
}

impl<S: GameStore> GameService<S> {
    pub fn new(catalog: Catalog, settings: GameSettings, store: S) -> Self {
        GameService {
            catalog,
            settings,
            store,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The puzzle in play on `today`.
    pub fn puzzle_for(&self, today: NaiveDate) -> Result<&Puzzle, GameError> {
        self.catalog
            .select(&self.settings.selection, today)
            .ok_or(GameError::NoPuzzle(today))
    }

    fn remaining(&self, attempts: u32) -> Option<u32> {
        self.settings
            .max_attempts
            .map(|max| max.saturating_sub(attempts))
    }

    pub fn init(&self, post: &str, user: &str, today: NaiveDate) -> Result<GameInit, GameError> {
        let puzzle = self.puzzle_for(today)?;
        let player = PlayerKey::new(post, user)?;
        let daily = self.store.daily(&player.on(today))?;
        let record = self.store.player(&player)?;
        let score = self.store.leaderboard_score(&player)?;

        Ok(GameInit {
            date: today,
            clues: puzzle.clues.clone(),
            has_played_today: daily.played,
            attempts: daily.attempts,
            attempts_remaining: self.remaining(daily.attempts),
            is_winner: daily.winner,
            streak: record.streak.active_on(today),
            total_wins: record.total_wins,
            score,
            rank: Rank::for_score(score),
            choices: multiple_choices(&puzzle.subreddit, self.catalog.puzzles()),
            answer: daily.winner.then(|| puzzle.subreddit.clone()),
        })
    }

    pub fn guess(
        &self,
        post: &str,
        user: &str,
        today: NaiveDate,
        guess: &str,
    ) -> Result<GuessOutcome, GameError> {
        if user.trim().is_empty() || user == ANONYMOUS_USER {
            return Err(GameError::LoginRequired);
        }
        let puzzle = self.puzzle_for(today)?;
        let player = PlayerKey::new(post, user)?;
        let day = player.on(today);

        let daily = self.store.daily(&day)?;
        if daily.winner {
            return Err(GameError::AlreadySolved);
        }
        if normalize_subreddit_name(guess).is_empty() {
            return Err(GameError::InvalidGuess);
        }
        let max_attempts = self.settings.max_attempts;
        let attempts = match self.store.increment_attempts_within(&day, max_attempts)? {
            Some(attempts) => attempts,
            None => {
                return Err(GameError::OutOfAttempts {
                    max: max_attempts.unwrap_or_default(),
                })
            }
        };
        self.store.mark_played(&day)?;
        let correct = answers_match(guess, &puzzle.subreddit);
        debug!(
            "guess post={} user={} attempt={} guess='{}' correct={}",
            post,
            escape_log(user),
            attempts,
            escape_log(guess),
            correct
        );

        if correct && self.store.mark_winner(&day)? {
            // First win of the day for this player: award it exactly once.
            let streak = self.store.record_streak_win(&player, today)?;
            let total_wins = self.store.increment_total_wins(&player)?;
            let score = self
                .store
                .leaderboard_increment(&player, self.settings.points_per_win)?;
            info!(
                "{} solved {} on {} in {} attempt(s); streak={} score={}",
                escape_log(user),
                puzzle.subreddit,
                today,
                attempts,
                streak.current,
                score
            );
            return Ok(GuessOutcome {
                correct: true,
                answer: Some(puzzle.subreddit.clone()),
                attempts,
                attempts_remaining: self.remaining(attempts),
                streak: streak.current,
                total_wins,
                score,
                rank: Rank::for_score(score),
            });
        }

        let record = self.store.player(&player)?;
        let score = self.store.leaderboard_score(&player)?;
        Ok(GuessOutcome {
            correct,
            answer: correct.then(|| puzzle.subreddit.clone()),
            attempts,
            attempts_remaining: self.remaining(attempts),
            streak: record.streak.active_on(today),
            total_wins: record.total_wins,
            score,
            rank: Rank::for_score(score),
        })
    }

    /// Comment text announcing a solved day. The attempt count comes from the store.
    pub fn share_text(&self, post: &str, user: &str, today: NaiveDate) -> Result<String, GameError> {
        if user.trim().is_empty() || user == ANONYMOUS_USER {
            return Err(GameError::LoginRequired);
        }
        let day = PlayerKey::new(post, user)?.on(today);
        let daily = self.store.daily(&day)?;
        if !daily.winner {
            return Err(GameError::NotSolved);
        }
        Ok(share_message(daily.attempts))
    }

    pub fn leaderboard(&self, post: &str, limit: usize) -> Result<Vec<RankedEntry>, GameError> {
        let rows = self.store.leaderboard_top(post, limit)?;
        Ok(rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| RankedEntry {
                position: i + 1,
                rank: Rank::for_score(row.score),
                username: row.username,
                score: row.score,
            })
            .collect())
    }
}

pub fn share_message(attempts: u32) -> String {
    let plural = if attempts == 1 { "" } else { "s" };
    format!(
        "I solved today's Snoo-Clues in {} attempt{}! 🔍🎉",
        attempts, plural
    )
}
