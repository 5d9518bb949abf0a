use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Consecutive-day logging streak. `current` ends at today (or yesterday,
/// if today has no entry yet); `best` is the longest run on record.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Streak {
    pub current: u32,
    pub best: u32,
}

/// Normalized goal progress. `fraction` is clamped to [0, 1]; `remaining`
/// is the absolute distance still to travel, kg.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub fraction: f64,
    pub remaining: f64,
}

impl Progress {
    pub fn percent(&self) -> u32 {
        (self.fraction * 100.0).round() as u32
    }

    pub fn is_complete(&self) -> bool {
        self.fraction >= 1.0
    }
}

/// One point on the weight chart: the last reading of a given day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Recent movement summary for the stats view.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Trend {
    /// Change over the last 7 days, kg. None if too little history.
    pub change_7d: Option<f64>,
    /// Change over the last 30 days, kg.
    pub change_30d: Option<f64>,
}

impl Trend {
    /// Coarse direction label based on the 30-day change, falling back to 7d.
    pub fn direction(&self) -> &'static str {
        let delta = self.change_30d.or(self.change_7d);
        match delta {
            Some(d) if d <= -0.5 => "losing",
            Some(d) if d >= 0.5 => "gaining",
            Some(_) => "maintaining",
            None => "not enough data",
        }
    }
}
