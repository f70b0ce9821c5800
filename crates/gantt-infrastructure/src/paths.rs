//! Unified path management for Gantt Studio files.
//!
//! The configuration file lives in the platform config directory and the
//! durable chart document in the platform data directory, consistent
//! across Linux, macOS, and Windows.
//!
//! ```text
//! ~/.config/gantt-studio/        # Config directory
//! └── config.toml                # Application configuration
//!
//! ~/.local/share/gantt-studio/   # Data directory
//! ├── chart.json                 # Durable chart document
//! └── last_save                  # Timestamp of the last successful save
//! ```

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

const APP_DIR: &str = "gantt-studio";

/// Unified path management for Gantt Studio.
pub struct GanttPaths;

impl GanttPaths {
    /// Returns the configuration directory (e.g. `~/.config/gantt-studio/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the data directory (e.g. `~/.local/share/gantt-studio/`).
    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the default directory for exported chart files, the
    /// platform download directory when available.
    pub fn export_dir() -> Result<PathBuf, PathError> {
        dirs::download_dir()
            .map(Ok)
            .unwrap_or_else(Self::data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_under_config_dir() {
        let file = GanttPaths::config_file().unwrap();
        assert!(file.ends_with("gantt-studio/config.toml"));
    }

    #[test]
    fn test_data_dir_is_app_scoped() {
        let dir = GanttPaths::data_dir().unwrap();
        assert!(dir.ends_with("gantt-studio"));
    }
}
