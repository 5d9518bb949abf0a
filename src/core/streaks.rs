use chrono::NaiveDate;
use std::collections::HashSet;

use crate::models::Streak;

/// Compute the current and best consecutive-day logging streaks from the
/// set of days that have at least one entry.
///
/// `dates` may arrive in any order and may repeat (several weigh-ins on one
/// day collapse to a single day). `today` is passed in rather than read from
/// the clock so the function stays pure; callers use the local calendar date
/// at call time. A missing entry for `today` does not break the streak yet —
/// the user may still log later in the day — so the walk may start at
/// yesterday instead. Total over any input, including empty.
pub fn compute_streaks(dates: impl IntoIterator<Item = NaiveDate>, today: NaiveDate) -> Streak {
    let days: HashSet<NaiveDate> = dates.into_iter().collect();
    if days.is_empty() {
        return Streak::default();
    }

    let current = current_streak(&days, today);
    let best = best_streak(&days).max(current);

    Streak { current, best }
}

fn current_streak(days: &HashSet<NaiveDate>, today: NaiveDate) -> u32 {
    let start = if days.contains(&today) {
        today
    } else {
        match today.pred_opt() {
            Some(yesterday) if days.contains(&yesterday) => yesterday,
            _ => return 0,
        }
    };

    let mut count = 0u32;
    let mut day = start;
    while days.contains(&day) {
        count += 1;
        match day.pred_opt() {
            Some(prev) => day = prev,
            None => break,
        }
    }
    count
}

fn best_streak(days: &HashSet<NaiveDate>) -> u32 {
    let mut sorted: Vec<NaiveDate> = days.iter().copied().collect();
    sorted.sort();

    let mut best = 0u32;
    let mut run = 1u32;

    for i in 1..sorted.len() {
        let prev = sorted[i - 1];
        let curr = sorted[i];
        if Some(curr) == prev.succ_opt() {
            run += 1;
        } else {
            run = 1;
        }
        best = best.max(run);
    }
    best.max(run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn days_ago(n: u64) -> NaiveDate {
        today().checked_sub_days(Days::new(n)).unwrap()
    }

    #[test]
    fn empty_history_is_zero() {
        let s = compute_streaks([], today());
        assert_eq!(s.current, 0);
        assert_eq!(s.best, 0);
    }

    #[test]
    fn single_entry_today() {
        let s = compute_streaks([today()], today());
        assert_eq!(s.current, 1);
        assert_eq!(s.best, 1);
    }

    #[test]
    fn three_consecutive_days() {
        let s = compute_streaks([today(), days_ago(1), days_ago(2)], today());
        assert_eq!(s.current, 3);
        assert_eq!(s.best, 3);
    }

    #[test]
    fn gap_resets_the_run() {
        // today-5, today-4, then a gap, then today-1, today.
        let s = compute_streaks(
            [days_ago(5), days_ago(4), days_ago(1), today()],
            today(),
        );
        assert_eq!(s.current, 2);
        assert_eq!(s.best, 2);
    }

    #[test]
    fn yesterday_only_keeps_the_streak_alive() {
        // Not logged today yet: grace, the streak still counts.
        let s = compute_streaks([days_ago(1)], today());
        assert_eq!(s.current, 1);
        assert_eq!(s.best, 1);
    }

    #[test]
    fn two_day_old_entry_is_a_broken_streak() {
        let s = compute_streaks([days_ago(2)], today());
        assert_eq!(s.current, 0);
        assert_eq!(s.best, 1);
    }

    #[test]
    fn duplicate_same_day_entries_collapse() {
        let s = compute_streaks([today(), today(), days_ago(1)], today());
        assert_eq!(s.current, 2);
        assert_eq!(s.best, 2);
    }

    #[test]
    fn best_survives_after_a_break() {
        // A 4-day run two weeks back, nothing since.
        let s = compute_streaks(
            [days_ago(14), days_ago(13), days_ago(12), days_ago(11)],
            today(),
        );
        assert_eq!(s.current, 0);
        assert_eq!(s.best, 4);
    }

    #[test]
    fn best_is_never_below_current() {
        let s = compute_streaks([today(), days_ago(1), days_ago(5)], today());
        assert_eq!(s.current, 2);
        assert!(s.best >= s.current);
    }

    #[test]
    fn unordered_input_is_fine() {
        let s = compute_streaks([days_ago(2), today(), days_ago(1)], today());
        assert_eq!(s.current, 3);
        assert_eq!(s.best, 3);
    }
}
