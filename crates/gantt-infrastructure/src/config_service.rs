//! Configuration service implementation.
//!
//! Loads the application configuration from the TOML configuration file
//! and caches it to avoid repeated file I/O. A missing file is created
//! with defaults; an unreadable file logs a warning and falls back to
//! defaults so a broken config never blocks startup.

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use tracing::warn;

use gantt_core::config::AppConfig;
use gantt_core::error::{GanttError, Result};

use crate::paths::GanttPaths;

/// Caching loader for [`AppConfig`].
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    /// Cached configuration; lazily loaded on first access.
    config: Arc<RwLock<Option<AppConfig>>>,
}

impl ConfigService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// A service reading the platform config file location.
    pub fn from_default_location() -> Result<Self> {
        let path = GanttPaths::config_file().map_err(|e| GanttError::config(e.to_string()))?;
        Ok(Self::new(path))
    }

    /// Gets the configuration, loading from file if not cached.
    pub fn get_config(&self) -> AppConfig {
        {
            let read_lock = self.config.read().unwrap();
            if let Some(ref cached) = *read_lock {
                return cached.clone();
            }
        }

        let loaded = self.load_config().unwrap_or_else(|e| {
            warn!("failed to load configuration, using defaults: {e}");
            AppConfig::default()
        });

        {
            let mut write_lock = self.config.write().unwrap();
            *write_lock = Some(loaded.clone());
        }

        loaded
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap();
        *write_lock = None;
    }

    fn load_config(&self) -> Result<AppConfig> {
        if !self.path.exists() {
            let config = AppConfig::default();
            self.write_default(&config)?;
            return Ok(config);
        }

        let content = fs::read_to_string(&self.path)?;
        let config: AppConfig = toml::from_str(&content)
            .map_err(|e| GanttError::config(format!("invalid configuration file: {e}")))?;
        Ok(config)
    }

    fn write_default(&self, config: &AppConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(config)
            .map_err(|e| GanttError::config(format!("cannot serialize configuration: {e}")))?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}
