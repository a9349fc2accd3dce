use chrono::{Duration, NaiveDate};
use snooclues::streak::{calculate_new_streak, calculate_new_streak_str, parse_day, yesterday};

fn d(s: &str) -> NaiveDate {
    parse_day(s).unwrap()
}

#[test]
fn starts_at_one_without_previous_win() {
    assert_eq!(calculate_new_streak(None, d("2026-02-01"), 0), 1);
}

#[test]
fn increments_on_the_following_day() {
    assert_eq!(calculate_new_streak(Some(d("2026-01-31")), d("2026-02-01"), 5), 6);
}

#[test]
fn keeps_streak_on_the_same_day() {
    assert_eq!(calculate_new_streak(Some(d("2026-02-01")), d("2026-02-01"), 5), 5);
}

#[test]
fn resets_after_missing_several_days() {
    assert_eq!(calculate_new_streak(Some(d("2026-01-28")), d("2026-02-01"), 5), 1);
}

#[test]
fn resets_when_yesterday_was_missed() {
    assert_eq!(calculate_new_streak(Some(d("2026-01-30")), d("2026-02-01"), 5), 1);
}

#[test]
fn rules_hold_across_a_year_of_days() {
    let start = d("2026-01-01");
    for offset in 0..366 {
        let today = start + Duration::days(offset);
        for n in [0u32, 1, 7, 100] {
            assert_eq!(calculate_new_streak(None, today, n), 1);
            assert_eq!(calculate_new_streak(yesterday(today), today, n), n + 1);
            assert_eq!(calculate_new_streak(Some(today), today, n), n);
            for gap in 2..5 {
                let older = today - Duration::days(gap);
                assert_eq!(calculate_new_streak(Some(older), today, n), 1);
            }
        }
    }
}

#[test]
fn string_dates_match_typed_dates() {
    assert_eq!(calculate_new_streak_str(Some("2026-01-31"), "2026-02-01", 5), Some(6));
    assert_eq!(calculate_new_streak_str(Some("2026-01-28"), "2026-02-01", 5), Some(1));
    assert_eq!(calculate_new_streak_str(None, "2026-02-01", 9), Some(1));
}
