//! TOML-based application configuration.
//!
//! Stores the unit-name presets offered when creating a limit and the
//! default icon for new limits. Stored at `<data_dir>/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::limit::Category;

use super::data_dir;

/// Unit-name presets per category, offered when creating a limit. The
/// chosen label is display-only and has no effect on the arithmetic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitPresets {
    #[serde(default = "default_food_units")]
    pub food: Vec<String>,
    #[serde(default = "default_drug_units")]
    pub drug: Vec<String>,
    #[serde(default = "default_activity_units")]
    pub activity: Vec<String>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub units: UnitPresets,
    /// Icon assigned to new limits when none is given.
    #[serde(default = "default_icon")]
    pub default_icon: String,
}

fn default_food_units() -> Vec<String> {
    vec!["Meals".into(), "Drinks".into()]
}
fn default_drug_units() -> Vec<String> {
    vec!["Grams".into(), "Milligrams".into()]
}
fn default_activity_units() -> Vec<String> {
    vec!["Walks".into(), "Hikes".into()]
}
fn default_icon() -> String {
    "leaf".into()
}

impl Default for UnitPresets {
    fn default() -> Self {
        Self {
            food: default_food_units(),
            drug: default_drug_units(),
            activity: default_activity_units(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            units: UnitPresets::default(),
            default_icon: default_icon(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content)?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(Self::path()?, content)?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Unit presets for one category.
    pub fn presets_for(&self, category: Category) -> &[String] {
        match category {
            Category::Food => &self.units.food,
            Category::Drug => &self.units.drug,
            Category::Activity => &self.units.activity,
        }
    }

    /// First preset for a category, used as the default units label.
    pub fn default_units_for(&self, category: Category) -> &str {
        self.presets_for(category)
            .first()
            .map(String::as_str)
            .unwrap_or("Units")
    }
}
