use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::models::Unit;

fn default_unit() -> Unit {
    Unit::Kg
}
fn default_history_limit() -> u32 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Display unit only — the database always stores kilograms.
    #[serde(default = "default_unit")]
    pub unit: Unit,
    /// Default row count for `history` and the dashboard list.
    #[serde(default = "default_history_limit")]
    pub history_limit: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            unit: default_unit(),
            history_limit: default_history_limit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProfileConfig {
    /// Height in cm; enables BMI in stats when set.
    #[serde(default)]
    pub height_cm: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub profile: ProfileConfig,
}

impl AppConfig {
    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "libra").context("Could not determine project directories")
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn data_dir() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.data_dir().to_path_buf())
    }

    pub fn db_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("libra.db"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    fn load_from(path: &PathBuf) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Reading {:?}", path))?;
        let config: AppConfig = toml::from_str(&content).context("Parsing config.toml")?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        self.save_to(&path)
    }

    fn save_to(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).context("Serializing config")?;
        std::fs::write(path, content).with_context(|| format!("Writing {:?}", path))?;
        Ok(())
    }

    pub fn ensure_data_dir() -> Result<PathBuf> {
        let dir = Self::data_dir()?;
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// BMI from the latest weight, if a height is configured.
    pub fn bmi(&self, weight_kg: f64) -> Option<f64> {
        let height_m = self.profile.height_cm? / 100.0;
        if height_m <= 0.0 {
            return None;
        }
        Some(weight_kg / (height_m * height_m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = AppConfig::default();
        config.display.unit = Unit::Lb;
        config.profile.height_cm = Some(178.0);
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.display.unit, Unit::Lb);
        assert_eq!(loaded.profile.height_cm, Some(178.0));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: AppConfig = toml::from_str("[profile]\nheight_cm = 170.0\n").unwrap();
        assert_eq!(config.display.unit, Unit::Kg);
        assert_eq!(config.display.history_limit, 10);
    }

    #[test]
    fn bmi_needs_a_height() {
        let mut config = AppConfig::default();
        assert!(config.bmi(80.0).is_none());
        config.profile.height_cm = Some(180.0);
        let bmi = config.bmi(80.0).unwrap();
        assert!((bmi - 24.69).abs() < 0.01);
    }
}
