use crate::models::{AchievementKind, Streak};

/// Streak lengths that earn a badge.
pub const STREAK_MILESTONES: [(u32, AchievementKind); 6] = [
    (3, AchievementKind::Streak3),
    (7, AchievementKind::Streak7),
    (14, AchievementKind::Streak14),
    (30, AchievementKind::Streak30),
    (60, AchievementKind::Streak60),
    (90, AchievementKind::Streak90),
];

/// Entry counts that earn a badge.
pub const ENTRY_MILESTONES: [(u64, AchievementKind); 4] = [
    (1, AchievementKind::FirstEntry),
    (10, AchievementKind::Entries10),
    (50, AchievementKind::Entries50),
    (100, AchievementKind::Entries100),
];

/// Every achievement the current state qualifies for. Pure; deduplication
/// against already-unlocked rows is `AchievementRepo::sync`'s job. The
/// streak check uses `best` so a milestone once reached is not forgotten
/// when the run later breaks.
pub fn earned(
    streak: &Streak,
    entry_count: u64,
    goal_fraction: Option<f64>,
) -> Vec<AchievementKind> {
    let mut kinds = Vec::new();

    for (threshold, kind) in ENTRY_MILESTONES {
        if entry_count >= threshold {
            kinds.push(kind);
        }
    }

    for (threshold, kind) in STREAK_MILESTONES {
        if streak.best >= threshold {
            kinds.push(kind);
        }
    }

    if goal_fraction.is_some_and(|f| f >= 1.0) {
        kinds.push(AchievementKind::GoalReached);
    }

    kinds
}

#[cfg(test)]
mod tests {
    use super::*;

    fn streak(current: u32, best: u32) -> Streak {
        Streak { current, best }
    }

    #[test]
    fn nothing_earned_with_no_history() {
        assert!(earned(&streak(0, 0), 0, None).is_empty());
    }

    #[test]
    fn first_entry_unlocks_immediately() {
        let kinds = earned(&streak(1, 1), 1, None);
        assert!(kinds.contains(&AchievementKind::FirstEntry));
        assert!(!kinds.contains(&AchievementKind::Entries10));
        assert!(!kinds.contains(&AchievementKind::Streak3));
    }

    #[test]
    fn streak_milestones_accumulate() {
        let kinds = earned(&streak(14, 14), 14, None);
        assert!(kinds.contains(&AchievementKind::Streak3));
        assert!(kinds.contains(&AchievementKind::Streak7));
        assert!(kinds.contains(&AchievementKind::Streak14));
        assert!(!kinds.contains(&AchievementKind::Streak30));
    }

    #[test]
    fn broken_streak_keeps_past_milestones() {
        // Best run was 7, current is 0 after a missed day.
        let kinds = earned(&streak(0, 7), 20, None);
        assert!(kinds.contains(&AchievementKind::Streak7));
    }

    #[test]
    fn goal_reached_requires_full_fraction() {
        assert!(!earned(&streak(0, 0), 5, Some(0.99)).contains(&AchievementKind::GoalReached));
        assert!(earned(&streak(0, 0), 5, Some(1.0)).contains(&AchievementKind::GoalReached));
    }
}
