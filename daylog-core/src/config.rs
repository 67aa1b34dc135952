//! Configuration management
//!
//! Settings live in settings.json in the data directory:
//! ```json
//! {
//!   "goals": {
//!     "calories": 2000,
//!     "protein": [120, 120, 120, 120, 120, 90, 90]
//!   }
//! }
//! ```
//! A goal is either a single daily target or seven per-weekday targets,
//! Monday first. Keys the diary doesn't manage are kept on save.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::GoalTarget;

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    goals: BTreeMap<String, GoalTarget>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Daylog configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub goals: BTreeMap<String, GoalTarget>,
    /// Snapshot no goals into new entries (DAYLOG_GOALS_DISABLED)
    pub goals_disabled: bool,
    _raw_settings: SettingsFile,
}

impl Config {
    /// Load config from the data directory
    ///
    /// A missing settings.json yields the defaults; one that doesn't parse is
    /// an error, so a later save can't overwrite it. Goals can
    /// be switched off with the DAYLOG_GOALS_DISABLED environment variable
    /// (for CI/testing).
    pub fn load(data_dir: &Path) -> Result<Self> {
        let settings_path = data_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            parse_settings(&content)?
        } else {
            SettingsFile::default()
        };

        let goals_disabled = matches!(
            std::env::var("DAYLOG_GOALS_DISABLED").ok().as_deref(),
            Some("true" | "1" | "yes" | "TRUE" | "YES")
        );

        Ok(Self {
            goals: raw.goals.clone(),
            goals_disabled,
            _raw_settings: raw,
        })
    }

    /// Save config to the data directory, preserving settings the diary
    /// doesn't manage
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let settings_path = data_dir.join("settings.json");

        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            parse_settings(&content)?
        } else {
            self._raw_settings.clone()
        };

        settings.goals = self.goals.clone();

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }

    /// Add or replace a goal
    pub fn set_goal(&mut self, name: impl Into<String>, target: GoalTarget) {
        self.goals.insert(name.into(), target);
    }

    /// Remove a goal, returning whether it existed
    pub fn remove_goal(&mut self, name: &str) -> bool {
        self.goals.remove(name).is_some()
    }
}

fn parse_settings(content: &str) -> Result<SettingsFile> {
    serde_json::from_str(content).context("settings.json is invalid")
}
