use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Which way the user is trying to move. Derived from the start/target pair,
/// never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalDirection {
    Lose,
    Gain,
    /// start == target: the goal is trivially satisfied.
    Maintain,
}

impl GoalDirection {
    pub fn display_name(&self) -> &'static str {
        match self {
            GoalDirection::Lose => "Lose",
            GoalDirection::Gain => "Gain",
            GoalDirection::Maintain => "Maintain",
        }
    }
}

/// The active weight goal. One at a time; setting a new goal replaces the
/// old one. `target_date` is informational (deadline display only).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: i64,
    /// Weight at goal creation, kg.
    pub start_weight: f64,
    /// Desired end weight, kg.
    pub target_weight: f64,
    pub start_date: NaiveDate,
    pub target_date: Option<NaiveDate>,
    pub completed_at: Option<String>,
}

impl Goal {
    pub fn direction(&self) -> GoalDirection {
        if self.target_weight < self.start_weight {
            GoalDirection::Lose
        } else if self.target_weight > self.start_weight {
            GoalDirection::Gain
        } else {
            GoalDirection::Maintain
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}
