pub mod achievement;
pub mod entry;
pub mod goal;
pub mod stats;

pub use achievement::{Achievement, AchievementKind};
pub use entry::{Unit, WeightEntry, WeightError};
pub use goal::{Goal, GoalDirection};
pub use stats::{Progress, Streak, Trend, TrendPoint};
