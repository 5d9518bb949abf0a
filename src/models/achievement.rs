use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Every achievement libra can award. Rows are written to the DB only when
/// a kind unlocks, keyed by `as_str`, so the catalog lives here in code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementKind {
    FirstEntry,
    Entries10,
    Entries50,
    Entries100,
    Streak3,
    Streak7,
    Streak14,
    Streak30,
    Streak60,
    Streak90,
    GoalReached,
}

impl AchievementKind {
    pub fn all() -> Vec<AchievementKind> {
        vec![
            AchievementKind::FirstEntry,
            AchievementKind::Entries10,
            AchievementKind::Entries50,
            AchievementKind::Entries100,
            AchievementKind::Streak3,
            AchievementKind::Streak7,
            AchievementKind::Streak14,
            AchievementKind::Streak30,
            AchievementKind::Streak60,
            AchievementKind::Streak90,
            AchievementKind::GoalReached,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AchievementKind::FirstEntry => "first_entry",
            AchievementKind::Entries10 => "entries_10",
            AchievementKind::Entries50 => "entries_50",
            AchievementKind::Entries100 => "entries_100",
            AchievementKind::Streak3 => "streak_3",
            AchievementKind::Streak7 => "streak_7",
            AchievementKind::Streak14 => "streak_14",
            AchievementKind::Streak30 => "streak_30",
            AchievementKind::Streak60 => "streak_60",
            AchievementKind::Streak90 => "streak_90",
            AchievementKind::GoalReached => "goal_reached",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            AchievementKind::FirstEntry => "First Step",
            AchievementKind::Entries10 => "Ten Weigh-ins",
            AchievementKind::Entries50 => "Fifty Weigh-ins",
            AchievementKind::Entries100 => "Century Club",
            AchievementKind::Streak3 => "3-Day Streak",
            AchievementKind::Streak7 => "One Week Strong",
            AchievementKind::Streak14 => "Two Week Habit",
            AchievementKind::Streak30 => "Thirty Days",
            AchievementKind::Streak60 => "Sixty Days",
            AchievementKind::Streak90 => "Quarter Year",
            AchievementKind::GoalReached => "Goal Reached",
        }
    }
}

impl std::fmt::Display for AchievementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

impl FromStr for AchievementKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AchievementKind::all()
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown achievement kind: {}", s))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievement {
    pub kind: AchievementKind,
    pub unlocked_at: String,
}
