use std::path::Path;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sled::IVec;

use super::{
    rank_entries, DailyRecord, DayKey, GameStore, LeaderboardEntry, PlayerKey, PlayerRecord,
    StoreError,
};

const TREE_DAILY: &str = "snooclues_daily";
const TREE_PLAYERS: &str = "snooclues_players";
const TREE_LEADERBOARD: &str = "snooclues_leaderboard";

/// Sled-backed persistence for daily records, player records and leaderboards.
#[derive(Clone)]
pub struct SledStore {
    _db: sled::Db,
    daily: sled::Tree,
    players: sled::Tree,
    leaderboard: sled::Tree,
}

impl SledStore {
    /// Open (or create) the store rooted at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path_ref = path.as_ref();
        std::fs::create_dir_all(path_ref)?;
        let db = sled::open(path_ref)?;
        let daily = db.open_tree(TREE_DAILY)?;
        let players = db.open_tree(TREE_PLAYERS)?;
        let leaderboard = db.open_tree(TREE_LEADERBOARD)?;
        log::debug!("opened game store at {}", path_ref.display());
        Ok(Self {
            _db: db,
            daily,
            players,
            leaderboard,
        })
    }

    fn serialize<T: Serialize>(value: &T) -> Result<Vec<u8>, StoreError> {
        Ok(bincode::serialize(value)?)
    }

    fn deserialize<T: DeserializeOwned>(bytes: &IVec) -> Result<T, StoreError> {
        Ok(bincode::deserialize::<T>(bytes)?)
    }

    fn read<T: DeserializeOwned + Default>(tree: &sled::Tree, key: &str) -> Result<T, StoreError> {
        match tree.get(key.as_bytes())? {
            Some(bytes) => Self::deserialize(&bytes),
            None => Ok(T::default()),
        }
    }

    /// Read-modify-write with compare-and-swap, retrying when another writer got there first.
    fn update<T, F>(tree: &sled::Tree, key: &str, f: F) -> Result<T, StoreError>
    where
        T: Serialize + DeserializeOwned + Default,
        F: Fn(T) -> T,
    {
        let key = key.as_bytes();
        let mut current = tree.get(key)?;
        loop {
            let value = match &current {
                Some(bytes) => Self::deserialize(bytes)?,
                None => T::default(),
            };
            let next = f(value);
            let encoded = Self::serialize(&next)?;
            match tree.compare_and_swap(key, current.as_ref(), Some(encoded))? {
                Ok(()) => return Ok(next),
                Err(conflict) => {
                    log::trace!("compare-and-swap conflict on {}, retrying", String::from_utf8_lossy(key));
                    current = conflict.current;
                }
            }
        }
    }

    /// Flush pending writes to disk.
    pub fn flush(&self) -> Result<(), StoreError> {
        self.daily.flush()?;
        self.players.flush()?;
        self.leaderboard.flush()?;
        Ok(())
    }
}

impl GameStore for SledStore {
    fn daily(&self, key: &DayKey) -> Result<DailyRecord, StoreError> {
        let record: DailyRecord = Self::read(&self.daily, &key.encode())?;
        Ok(record.live(Utc::now()))
    }

    fn update_daily(
        &self,
        key: &DayKey,
        f: &dyn Fn(DailyRecord) -> DailyRecord,
    ) -> Result<DailyRecord, StoreError> {
        Self::update(&self.daily, &key.encode(), f)
    }

    fn player(&self, key: &PlayerKey) -> Result<PlayerRecord, StoreError> {
        Self::read(&self.players, &key.encode())
    }

    fn update_player(
        &self,
        key: &PlayerKey,
        f: &dyn Fn(PlayerRecord) -> PlayerRecord,
    ) -> Result<PlayerRecord, StoreError> {
        Self::update(&self.players, &key.encode(), f)
    }

    fn leaderboard_increment(&self, key: &PlayerKey, by: u64) -> Result<u64, StoreError> {
        Self::update(&self.leaderboard, &key.encode(), |score: u64| score.saturating_add(by))
    }

    fn leaderboard_score(&self, key: &PlayerKey) -> Result<u64, StoreError> {
        Self::read(&self.leaderboard, &key.encode())
    }

    fn leaderboard_top(&self, post: &str, limit: usize) -> Result<Vec<LeaderboardEntry>, StoreError> {
        let prefix = format!("{}:", post);
        let mut entries = Vec::new();
        for entry in self.leaderboard.scan_prefix(prefix.as_bytes()) {
            let (key, value) = entry?;
            let text = String::from_utf8_lossy(&key);
            if let Some(username) = text.strip_prefix(&prefix) {
                entries.push(LeaderboardEntry {
                    username: username.to_string(),
                    score: Self::deserialize(&value)?,
                });
            }
        }
        Ok(rank_entries(entries, limit))
    }

    fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, StoreError> {
        let mut removed = 0;
        for entry in self.daily.iter() {
            let (key, value) = entry?;
            let record: DailyRecord = match Self::deserialize(&value) {
                Ok(record) => record,
                Err(e) => {
                    log::warn!(
                        "dropping unreadable daily record {}: {}",
                        String::from_utf8_lossy(&key),
                        e
                    );
                    self.daily.remove(&key)?;
                    removed += 1;
                    continue;
                }
            };
            if record.is_expired(now) {
                self.daily.remove(&key)?;
                removed += 1;
            }
        }
        self.daily.flush()?;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use tempfile::tempdir;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, d).unwrap()
    }

    #[test]
    fn attempts_and_flags_persist_across_reopen() {
        let dir = tempdir().unwrap();
        let key = DayKey::new("t3_post", "alice", day(1)).unwrap();
        {
            let store = SledStore::open(dir.path()).unwrap();
            assert_eq!(store.increment_attempts(&key).unwrap(), 1);
            assert_eq!(store.increment_attempts(&key).unwrap(), 2);
            assert!(store.mark_winner(&key).unwrap());
            store.flush().unwrap();
        }
        let store = SledStore::open(dir.path()).unwrap();
        let rec = store.daily(&key).unwrap();
        assert_eq!(rec.attempts, 2);
        assert!(rec.winner);
        assert!(rec.played);
        assert!(!store.mark_winner(&key).unwrap());
    }

    #[test]
    fn concurrent_increments_are_not_lost() {
        let dir = tempdir().unwrap();
        let store = SledStore::open(dir.path()).unwrap();
        let key = DayKey::new("t3_post", "bob", day(2)).unwrap();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                let key = key.clone();
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        store.increment_attempts(&key).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(store.attempts(&key).unwrap(), 200);
    }

    #[test]
    fn concurrent_limited_increments_stop_at_the_limit() {
        let dir = tempdir().unwrap();
        let store = SledStore::open(dir.path()).unwrap();
        let key = DayKey::new("t3_post", "erin", day(3)).unwrap();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                let key = key.clone();
                std::thread::spawn(move || {
                    (0..10)
                        .filter(|_| store.increment_attempts_within(&key, Some(5)).unwrap().is_some())
                        .count()
                })
            })
            .collect();
        let accepted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(accepted, 5);
        assert_eq!(store.attempts(&key).unwrap(), 5);
        assert_eq!(store.increment_attempts_within(&key, None).unwrap(), Some(6));
    }

    #[test]
    fn leaderboard_is_scoped_per_post() {
        let dir = tempdir().unwrap();
        let store = SledStore::open(dir.path()).unwrap();
        let alice = PlayerKey::new("t3_a", "alice").unwrap();
        let bob = PlayerKey::new("t3_a", "bob").unwrap();
        let other = PlayerKey::new("t3_b", "carol").unwrap();
        store.leaderboard_increment(&alice, 10).unwrap();
        store.leaderboard_increment(&bob, 10).unwrap();
        assert_eq!(store.leaderboard_increment(&bob, 10).unwrap(), 20);
        store.leaderboard_increment(&other, 99).unwrap();

        let top = store.leaderboard_top("t3_a", 10).unwrap();
        let names: Vec<_> = top.iter().map(|e| e.username.as_str()).collect();
        assert_eq!(names, vec!["bob", "alice"]);
        assert_eq!(store.leaderboard_score(&other).unwrap(), 99);
    }

    #[test]
    fn purge_removes_only_expired() {
        let dir = tempdir().unwrap();
        let store = SledStore::open(dir.path()).unwrap();
        let key = DayKey::new("t3_post", "dave", day(3)).unwrap();
        store.increment_attempts(&key).unwrap();
        assert_eq!(store.purge_expired(Utc::now()).unwrap(), 0);
        let later = Utc::now() + Duration::days(super::super::DAILY_TTL_DAYS + 1);
        assert_eq!(store.purge_expired(later).unwrap(), 1);
        assert_eq!(store.attempts(&key).unwrap(), 0);
    }
}
