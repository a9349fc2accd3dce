//! In-process store for tests and hosts that keep game state elsewhere.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use super::{
    rank_entries, DailyRecord, DayKey, GameStore, LeaderboardEntry, PlayerKey, PlayerRecord,
    StoreError,
};

#[derive(Default)]
struct Inner {
    daily: HashMap<DayKey, DailyRecord>,
    players: HashMap<PlayerKey, PlayerRecord>,
    leaderboard: HashMap<PlayerKey, u64>,
}

/// Mutex-guarded maps. Each operation holds the lock for its whole read-modify-write.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>, StoreError> {
        self.inner.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl GameStore for MemoryStore {
    fn daily(&self, key: &DayKey) -> Result<DailyRecord, StoreError> {
        let inner = self.lock()?;
        Ok(inner
            .daily
            .get(key)
            .cloned()
            .unwrap_or_default()
            .live(Utc::now()))
    }

    fn update_daily(
        &self,
        key: &DayKey,
        f: &dyn Fn(DailyRecord) -> DailyRecord,
    ) -> Result<DailyRecord, StoreError> {
        let mut inner = self.lock()?;
        let entry = inner.daily.entry(key.clone()).or_default();
        *entry = f(entry.clone());
        Ok(entry.clone())
    }

    fn player(&self, key: &PlayerKey) -> Result<PlayerRecord, StoreError> {
        Ok(self.lock()?.players.get(key).copied().unwrap_or_default())
    }

    fn update_player(
        &self,
        key: &PlayerKey,
        f: &dyn Fn(PlayerRecord) -> PlayerRecord,
    ) -> Result<PlayerRecord, StoreError> {
        let mut inner = self.lock()?;
        let entry = inner.players.entry(key.clone()).or_default();
        *entry = f(*entry);
        Ok(*entry)
    }

    fn leaderboard_increment(&self, key: &PlayerKey, by: u64) -> Result<u64, StoreError> {
        let mut inner = self.lock()?;
        let score = inner.leaderboard.entry(key.clone()).or_insert(0);
        *score = score.saturating_add(by);
        Ok(*score)
    }

    fn leaderboard_score(&self, key: &PlayerKey) -> Result<u64, StoreError> {
        Ok(self.lock()?.leaderboard.get(key).copied().unwrap_or(0))
    }

    fn leaderboard_top(&self, post: &str, limit: usize) -> Result<Vec<LeaderboardEntry>, StoreError> {
        let inner = self.lock()?;
        let entries = inner
            .leaderboard
            .iter()
            .filter(|(key, _)| key.post == post)
            .map(|(key, score)| LeaderboardEntry {
                username: key.user.clone(),
                score: *score,
            })
            .collect();
        Ok(rank_entries(entries, limit))
    }

    fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, StoreError> {
        let mut inner = self.lock()?;
        let before = inner.daily.len();
        inner.daily.retain(|_, rec| !rec.is_expired(now));
        Ok(before - inner.daily.len())
    }
}
