use crate::models::{Goal, Progress};

/// Turn a goal and the latest known weight into a normalized progress
/// fraction plus the distance still to travel.
///
/// Pure and total over finite inputs: movement away from the target counts
/// as zero progress (never negative), overshoot clamps at 1.0, and a goal
/// whose start equals its target is treated as already satisfied. This is
/// the single place the zero-range case is handled; callers must not add
/// their own guards. Inputs are assumed finite — NaN/infinity are rejected
/// upstream by `models::entry::validate_weight_kg`.
pub fn compute_progress(goal: &Goal, current_weight: f64) -> Progress {
    compute(goal.start_weight, goal.target_weight, current_weight)
}

fn compute(start: f64, target: f64, current: f64) -> Progress {
    let total = (target - start).abs();
    if total == 0.0 {
        return Progress {
            fraction: 1.0,
            remaining: 0.0,
        };
    }

    let losing = target < start;
    let progressed = if losing {
        (start - current).max(0.0)
    } else {
        (current - start).max(0.0)
    };

    let remaining = if losing {
        (current - target).max(0.0)
    } else {
        (target - current).max(0.0)
    };

    Progress {
        fraction: (progressed / total).clamp(0.0, 1.0),
        remaining,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn goal(start: f64, target: f64) -> Goal {
        Goal {
            id: 1,
            start_weight: start,
            target_weight: target,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            target_date: None,
            completed_at: None,
        }
    }

    #[test]
    fn no_progress_at_start_weight() {
        let p = compute_progress(&goal(80.0, 70.0), 80.0);
        assert_eq!(p.fraction, 0.0);
        assert_eq!(p.remaining, 10.0);
    }

    #[test]
    fn full_progress_at_target_weight() {
        let p = compute_progress(&goal(80.0, 70.0), 70.0);
        assert_eq!(p.fraction, 1.0);
        assert_eq!(p.remaining, 0.0);

        let p = compute_progress(&goal(60.0, 75.0), 75.0);
        assert_eq!(p.fraction, 1.0);
    }

    #[test]
    fn halfway_on_a_losing_goal() {
        let p = compute_progress(&goal(80.0, 70.0), 75.0);
        assert_eq!(p.fraction, 0.5);
        assert_eq!(p.remaining, 5.0);
    }

    #[test]
    fn wrong_direction_clamps_to_zero() {
        // Gain goal, but the user lost weight instead.
        let p = compute_progress(&goal(70.0, 80.0), 65.0);
        assert_eq!(p.fraction, 0.0);
        assert_eq!(p.remaining, 15.0);
    }

    #[test]
    fn overshoot_clamps_to_one() {
        let p = compute_progress(&goal(80.0, 70.0), 62.0);
        assert_eq!(p.fraction, 1.0);
        assert_eq!(p.remaining, 0.0);
    }

    #[test]
    fn regression_past_start_clamps_to_zero() {
        let p = compute_progress(&goal(80.0, 70.0), 91.0);
        assert_eq!(p.fraction, 0.0);
        assert_eq!(p.remaining, 21.0);
    }

    #[test]
    fn equal_start_and_target_is_already_done() {
        let p = compute_progress(&goal(70.0, 70.0), 85.0);
        assert_eq!(p.fraction, 1.0);
        assert_eq!(p.remaining, 0.0);
    }

    #[test]
    fn fraction_is_monotone_toward_target() {
        let g = goal(80.0, 70.0);
        let mut last = -1.0;
        // Walk current weight from start to target; fraction never decreases.
        for step in 0..=40 {
            let current = 80.0 - step as f64 * 0.25;
            let p = compute_progress(&g, current);
            assert!(p.fraction >= last, "fraction dropped at {current}");
            assert!((0.0..=1.0).contains(&p.fraction));
            last = p.fraction;
        }
    }
}
