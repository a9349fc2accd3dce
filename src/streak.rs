//! Daily win streaks.
//!
//! Streaks are computed on calendar days (`NaiveDate`), never on timestamps, so a win at
//! 23:59 followed by a win at 00:01 the next day counts as consecutive regardless of the
//! host's timezone.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Storage format for calendar days.
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Per-player streak record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    pub current: u32,
    #[serde(default)]
    pub last_win: Option<NaiveDate>,
}

impl StreakState {
    /// Apply a win on `today` and return the updated record.
    pub fn record_win(self, today: NaiveDate) -> StreakState {
        StreakState {
            current: calculate_new_streak(self.last_win, today, self.current),
            last_win: Some(today),
        }
    }

    /// Streak as displayed on `today`: still alive if the last win was today or
    /// yesterday, otherwise already broken.
    pub fn active_on(&self, today: NaiveDate) -> u32 {
        match self.last_win {
            Some(last) if last == today || Some(last) == yesterday(today) => self.current,
            _ => 0,
        }
    }
}

/// Streak value after a win on `today`.
///
/// - no previous win: 1
/// - previous win yesterday: `current + 1`
/// - previous win today: `current` (a repeated call does not double count)
/// - anything else: 1
pub fn calculate_new_streak(last_win: Option<NaiveDate>, today: NaiveDate, current: u32) -> u32 {
    let Some(last) = last_win else {
        return 1;
    };
    if Some(last) == yesterday(today) {
        return current.saturating_add(1);
    }
    if last == today {
        return current;
    }
    1
}

/// Same as [`calculate_new_streak`] for `YYYY-MM-DD` strings.
///
/// An unreadable `last_win` is treated as no prior win. Returns `None` only when
/// `today` itself cannot be parsed.
pub fn calculate_new_streak_str(last_win: Option<&str>, today: &str, current: u32) -> Option<u32> {
    let today = parse_day(today)?;
    let last = last_win.and_then(parse_day);
    Some(calculate_new_streak(last, today, current))
}

pub fn parse_day(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DAY_FORMAT).ok()
}

pub fn yesterday(today: NaiveDate) -> Option<NaiveDate> {
    today.checked_sub_signed(Duration::days(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        parse_day(s).unwrap()
    }

    #[test]
    fn first_win_starts_at_one() {
        assert_eq!(calculate_new_streak(None, d("2026-02-01"), 0), 1);
        assert_eq!(calculate_new_streak(None, d("2026-02-01"), 42), 1);
    }

    #[test]
    fn consecutive_day_increments() {
        assert_eq!(calculate_new_streak(Some(d("2026-01-31")), d("2026-02-01"), 5), 6);
    }

    #[test]
    fn same_day_is_idempotent() {
        assert_eq!(calculate_new_streak(Some(d("2026-02-01")), d("2026-02-01"), 5), 5);
    }

    #[test]
    fn missed_days_reset() {
        assert_eq!(calculate_new_streak(Some(d("2026-01-28")), d("2026-02-01"), 5), 1);
        assert_eq!(calculate_new_streak(Some(d("2026-01-30")), d("2026-02-01"), 5), 1);
    }

    #[test]
    fn future_last_win_resets() {
        assert_eq!(calculate_new_streak(Some(d("2026-02-05")), d("2026-02-01"), 5), 1);
    }

    #[test]
    fn crosses_month_and_leap_day() {
        assert_eq!(calculate_new_streak(Some(d("2028-02-28")), d("2028-02-29"), 2), 3);
        assert_eq!(calculate_new_streak(Some(d("2028-02-29")), d("2028-03-01"), 3), 4);
        assert_eq!(calculate_new_streak(Some(d("2025-12-31")), d("2026-01-01"), 9), 10);
    }

    #[test]
    fn string_wrapper() {
        assert_eq!(calculate_new_streak_str(Some("2026-01-31"), "2026-02-01", 5), Some(6));
        assert_eq!(calculate_new_streak_str(Some("garbage"), "2026-02-01", 5), Some(1));
        assert_eq!(calculate_new_streak_str(None, "not-a-day", 5), None);
    }

    #[test]
    fn record_win_updates_last_win() {
        let state = StreakState { current: 3, last_win: Some(d("2026-02-01")) };
        let next = state.record_win(d("2026-02-02"));
        assert_eq!(next, StreakState { current: 4, last_win: Some(d("2026-02-02")) });
        assert_eq!(next.record_win(d("2026-02-02")), next);
    }

    #[test]
    fn displayed_streak_lapses_after_a_missed_day() {
        let state = StreakState { current: 4, last_win: Some(d("2026-02-02")) };
        assert_eq!(state.active_on(d("2026-02-02")), 4);
        assert_eq!(state.active_on(d("2026-02-03")), 4);
        assert_eq!(state.active_on(d("2026-02-04")), 0);
        assert_eq!(StreakState::default().active_on(d("2026-02-04")), 0);
    }
}
