//! # Storage Module - Game State Persistence
//!
//! Everything the game remembers between requests lives behind the [`GameStore`] trait:
//!
//! - **Daily records** keyed by post + user + day: attempt counter, played flag and winner
//!   flag. Daily records expire [`DAILY_TTL_DAYS`] days after they are first written.
//! - **Player records** keyed by post + user: current streak, last win day, total wins.
//! - **Leaderboard** keyed by post: username to cumulative score.
//!
//! Two implementations are provided:
//!
//! - [`SledStore`] - embedded sled database, values encoded with bincode.
//! - [`MemoryStore`] - mutex-guarded maps for tests and throwaway sessions.
//!
//! Counter updates are atomic in both: sled via compare-and-swap retry loops, the memory
//! store by holding its lock across the read-modify-write.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use chrono::NaiveDate;
//! use snooclues::storage::{DayKey, GameStore, SledStore};
//!
//! fn main() -> anyhow::Result<()> {
//!     let store = SledStore::open("./data/snooclues.db")?;
//!     let day = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
//!     let key = DayKey::new("t3_post", "alice", day)?;
//!     let attempts = store.increment_attempts(&key)?;
//!     println!("attempt #{attempts}");
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod memory;
pub mod sled_store;

pub use errors::StoreError;
pub use memory::MemoryStore;
pub use sled_store::SledStore;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::streak::{StreakState, DAY_FORMAT};

/// Lifetime of per-day records.
pub const DAILY_TTL_DAYS: i64 = 7;

const KEY_SEPARATOR: char = ':';

fn check_segment(segment: &str) -> Result<(), StoreError> {
    if segment.is_empty() || segment.contains(KEY_SEPARATOR) {
        return Err(StoreError::InvalidKey(segment.to_string()));
    }
    Ok(())
}

/// Identifies one player's game on one post.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlayerKey {
    pub post: String,
    pub user: String,
}

impl PlayerKey {
    pub fn new(post: &str, user: &str) -> Result<Self, StoreError> {
        check_segment(post)?;
        check_segment(user)?;
        Ok(PlayerKey {
            post: post.to_string(),
            user: user.to_string(),
        })
    }

    pub fn encode(&self) -> String {
        format!("{}:{}", self.post, self.user)
    }

    pub fn on(&self, day: NaiveDate) -> DayKey {
        DayKey {
            player: self.clone(),
            day,
        }
    }
}

/// Identifies one player's game on one post for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DayKey {
    pub player: PlayerKey,
    pub day: NaiveDate,
}

impl DayKey {
    pub fn new(post: &str, user: &str, day: NaiveDate) -> Result<Self, StoreError> {
        Ok(PlayerKey::new(post, user)?.on(day))
    }

    pub fn encode(&self) -> String {
        format!("{}:{}", self.player.encode(), self.day.format(DAY_FORMAT))
    }
}

/// Per-day state for one player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub attempts: u32,
    pub played: bool,
    pub winner: bool,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl DailyRecord {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|at| at <= now).unwrap_or(false)
    }

    /// The record as seen at `now`: expired records read as empty.
    pub fn live(self, now: DateTime<Utc>) -> DailyRecord {
        if self.is_expired(now) {
            DailyRecord::default()
        } else {
            self
        }
    }

    fn stamped(mut self, now: DateTime<Utc>) -> DailyRecord {
        if self.expires_at.is_none() {
            self.expires_at = Some(now + Duration::days(DAILY_TTL_DAYS));
        }
        self
    }
}

/// Long-lived per-player state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub streak: StreakState,
    pub total_wins: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub username: String,
    pub score: u64,
}

/// Order leaderboard rows by score descending, then username ascending, keeping `limit`.
pub(crate) fn rank_entries(mut entries: Vec<LeaderboardEntry>, limit: usize) -> Vec<LeaderboardEntry> {
    entries.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.username.cmp(&b.username)));
    entries.truncate(limit);
    entries
}

/// Persistence contract the game service depends on.
///
/// Implementations must make every `increment_*` and `mark_*` call atomic with respect
/// to concurrent callers on the same key.
pub trait GameStore {
    /// Current daily record, or an empty one if absent or expired.
    fn daily(&self, key: &DayKey) -> Result<DailyRecord, StoreError>;

    /// Atomically apply `f` to the daily record and persist the result.
    fn update_daily(
        &self,
        key: &DayKey,
        f: &dyn Fn(DailyRecord) -> DailyRecord,
    ) -> Result<DailyRecord, StoreError>;

    fn player(&self, key: &PlayerKey) -> Result<PlayerRecord, StoreError>;

    /// Atomically apply `f` to the player record and persist the result.
    fn update_player(
        &self,
        key: &PlayerKey,
        f: &dyn Fn(PlayerRecord) -> PlayerRecord,
    ) -> Result<PlayerRecord, StoreError>;

    /// Add `by` to the player's score on the post leaderboard; returns the new score.
    fn leaderboard_increment(&self, key: &PlayerKey, by: u64) -> Result<u64, StoreError>;

    fn leaderboard_score(&self, key: &PlayerKey) -> Result<u64, StoreError>;

    /// Highest scores first, ties broken by username.
    fn leaderboard_top(&self, post: &str, limit: usize) -> Result<Vec<LeaderboardEntry>, StoreError>;

    /// Drop daily records that expired before `now`; returns how many were removed.
    fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, StoreError>;

    fn attempts(&self, key: &DayKey) -> Result<u32, StoreError> {
        Ok(self.daily(key)?.attempts)
    }

    fn has_played(&self, key: &DayKey) -> Result<bool, StoreError> {
        Ok(self.daily(key)?.played)
    }

    fn is_winner(&self, key: &DayKey) -> Result<bool, StoreError> {
        Ok(self.daily(key)?.winner)
    }

    fn increment_attempts(&self, key: &DayKey) -> Result<u32, StoreError> {
        let now = Utc::now();
        let record = self.update_daily(key, &|rec: DailyRecord| {
            let mut rec = rec.live(now).stamped(now);
            rec.attempts = rec.attempts.saturating_add(1);
            rec
        })?;
        Ok(record.attempts)
    }

    /// Count an attempt unless `max` attempts are already recorded. The check and the
    /// increment happen in one atomic update; `None` means the limit was reached.
    fn increment_attempts_within(
        &self,
        key: &DayKey,
        max: Option<u32>,
    ) -> Result<Option<u32>, StoreError> {
        let now = Utc::now();
        let refused = std::cell::Cell::new(false);
        let record = self.update_daily(key, &|rec: DailyRecord| {
            let mut rec = rec.live(now).stamped(now);
            let full = max.map(|max| rec.attempts >= max).unwrap_or(false);
            refused.set(full);
            if !full {
                rec.attempts = rec.attempts.saturating_add(1);
            }
            rec
        })?;
        Ok((!refused.get()).then_some(record.attempts))
    }

    fn mark_played(&self, key: &DayKey) -> Result<(), StoreError> {
        let now = Utc::now();
        self.update_daily(key, &|rec: DailyRecord| {
            let mut rec = rec.live(now).stamped(now);
            rec.played = true;
            rec
        })?;
        Ok(())
    }

    /// Set the winner flag (and the played flag). Returns `false` if the player had already
    /// won that day, so callers can award a day's win exactly once.
    fn mark_winner(&self, key: &DayKey) -> Result<bool, StoreError> {
        let now = Utc::now();
        let before = std::cell::Cell::new(false);
        self.update_daily(key, &|rec: DailyRecord| {
            let mut rec = rec.live(now).stamped(now);
            before.set(rec.winner);
            rec.winner = true;
            rec.played = true;
            rec
        })?;
        Ok(!before.get())
    }

    fn streak(&self, key: &PlayerKey) -> Result<StreakState, StoreError> {
        Ok(self.player(key)?.streak)
    }

    /// Apply a win on `today` to the stored streak and return the new value.
    fn record_streak_win(&self, key: &PlayerKey, today: NaiveDate) -> Result<StreakState, StoreError> {
        let record = self.update_player(key, &|mut rec: PlayerRecord| {
            rec.streak = rec.streak.record_win(today);
            rec
        })?;
        Ok(record.streak)
    }

    fn total_wins(&self, key: &PlayerKey) -> Result<u32, StoreError> {
        Ok(self.player(key)?.total_wins)
    }

    fn increment_total_wins(&self, key: &PlayerKey) -> Result<u32, StoreError> {
        let record = self.update_player(key, &|mut rec: PlayerRecord| {
            rec.total_wins = rec.total_wins.saturating_add(1);
            rec
        })?;
        Ok(record.total_wins)
    }
}
