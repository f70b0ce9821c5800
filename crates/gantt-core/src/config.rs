//! Application configuration models.
//!
//! Loaded from the TOML configuration file by the infrastructure layer;
//! every field has a default so a missing or partial file still yields a
//! usable configuration.

use serde::{Deserialize, Serialize};

/// Draft editor tunables.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct DraftConfig {
    /// Enforce end-after-start ordering while editing.
    #[serde(default = "default_validate_dates")]
    pub validate_dates: bool,
    /// Color assigned to newly added tasks.
    #[serde(default = "default_task_color")]
    pub default_color: String,
    /// Maximum number of tasks a single draft may hold.
    #[serde(default = "default_max_tasks")]
    pub max_tasks: usize,
}

fn default_validate_dates() -> bool {
    true
}

fn default_task_color() -> String {
    "#4CAF50".to_string()
}

fn default_max_tasks() -> usize {
    100
}

impl Default for DraftConfig {
    fn default() -> Self {
        Self {
            validate_dates: default_validate_dates(),
            default_color: default_task_color(),
            max_tasks: default_max_tasks(),
        }
    }
}

/// Root application configuration.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Seconds between unconditional autosaves of the persistent state.
    #[serde(default = "default_autosave_interval_secs")]
    pub autosave_interval_secs: u64,
    #[serde(default)]
    pub draft: DraftConfig,
}

fn default_autosave_interval_secs() -> u64 {
    300
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            autosave_interval_secs: default_autosave_interval_secs(),
            draft: DraftConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }
}
