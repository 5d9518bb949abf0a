use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Lowest plausible reading from a bathroom scale, in kg.
pub const MIN_WEIGHT_KG: f64 = 20.0;
/// Highest plausible reading from a bathroom scale, in kg.
pub const MAX_WEIGHT_KG: f64 = 500.0;

const KG_PER_LB: f64 = 0.453_592_37;

#[derive(Debug, Error, PartialEq)]
pub enum WeightError {
    #[error("weight must be a finite number")]
    NotFinite,
    #[error("weight {0:.1} kg is outside the accepted range ({MIN_WEIGHT_KG}-{MAX_WEIGHT_KG} kg)")]
    OutOfRange(f64),
}

/// Reject NaN/infinite/implausible readings at the ingestion boundary.
/// Everything downstream (progress, streaks, charts) assumes finite values.
pub fn validate_weight_kg(kg: f64) -> Result<f64, WeightError> {
    if !kg.is_finite() {
        return Err(WeightError::NotFinite);
    }
    if !(MIN_WEIGHT_KG..=MAX_WEIGHT_KG).contains(&kg) {
        return Err(WeightError::OutOfRange(kg));
    }
    Ok(kg)
}

/// Display unit. Storage is always kilograms; conversion happens at the edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Kg,
    Lb,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Kg => "kg",
            Unit::Lb => "lb",
        }
    }

    /// Convert a stored kg value into this unit for display.
    pub fn from_kg(&self, kg: f64) -> f64 {
        match self {
            Unit::Kg => kg,
            Unit::Lb => kg / KG_PER_LB,
        }
    }

    /// Convert user input in this unit into kg for storage.
    pub fn to_kg(&self, value: f64) -> f64 {
        match self {
            Unit::Kg => value,
            Unit::Lb => value * KG_PER_LB,
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Unit {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "kg" | "kgs" | "kilogram" | "kilograms" => Ok(Unit::Kg),
            "lb" | "lbs" | "pound" | "pounds" => Ok(Unit::Lb),
            _ => Err(anyhow::anyhow!("Unknown unit: {} (use kg or lb)", s)),
        }
    }
}

/// A single logged weight measurement. `recorded_on` is the user-editable
/// effective date (backdating is allowed); streaks are computed from it,
/// not from `created_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightEntry {
    pub id: i64,
    pub recorded_on: NaiveDate,
    /// Body mass in kg.
    pub value: f64,
    pub note: Option<String>,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_nan_and_infinity() {
        assert_eq!(validate_weight_kg(f64::NAN), Err(WeightError::NotFinite));
        assert_eq!(
            validate_weight_kg(f64::INFINITY),
            Err(WeightError::NotFinite)
        );
    }

    #[test]
    fn rejects_implausible_values() {
        assert!(matches!(
            validate_weight_kg(0.0),
            Err(WeightError::OutOfRange(_))
        ));
        assert!(matches!(
            validate_weight_kg(-70.0),
            Err(WeightError::OutOfRange(_))
        ));
        assert!(matches!(
            validate_weight_kg(900.0),
            Err(WeightError::OutOfRange(_))
        ));
    }

    #[test]
    fn accepts_ordinary_values() {
        assert_eq!(validate_weight_kg(82.4), Ok(82.4));
    }

    #[test]
    fn unit_round_trip() {
        let lb = Unit::Lb.from_kg(70.0);
        assert!((Unit::Lb.to_kg(lb) - 70.0).abs() < 1e-9);
        assert!((lb - 154.32).abs() < 0.01);
    }
}
