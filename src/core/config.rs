use crate::core::dirs::{default_status_file, get_config_directory};
use crate::core::error::{RepoDeckError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const SETTINGS_FILE: &str = "settings.json";

/// User settings remembered between runs
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Last base directory the user browsed
    pub base_path: Option<PathBuf>,
    /// Overrides the default visibility cache location
    pub cache_file: Option<PathBuf>,
    /// Delay before a deferred refresh runs after a command
    pub refresh_delay_ms: u64,
    /// Pause between repositories during a full rebuild
    pub rescan_step_ms: u64,
    pub default_remote: String,
    pub default_commit_message: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_path: None,
            cache_file: None,
            refresh_delay_ms: 1000,
            rescan_step_ms: 50,
            default_remote: "origin".to_string(),
            default_commit_message: "updated".to_string(),
        }
    }
}

impl Settings {
    pub fn settings_file() -> PathBuf {
        get_config_directory().join(SETTINGS_FILE)
    }

    /// Load settings, falling back to defaults when the file is missing or unreadable
    pub fn load() -> Self {
        Self::load_from(&Self::settings_file())
    }

    pub fn load_from(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                log::debug!("No settings at {}: {e}", path.display());
                return Self::default();
            }
        };

        serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!("Ignoring unreadable settings file {}: {e}", path.display());
            Self::default()
        })
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::settings_file())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .map_err(|e| RepoDeckError::directory_creation_failed(dir, e))?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Resolve where the visibility cache lives
    pub fn status_file(&self) -> PathBuf {
        self.cache_file.clone().unwrap_or_else(default_status_file)
    }

    pub fn refresh_delay(&self) -> Duration {
        Duration::from_millis(self.refresh_delay_ms)
    }

    pub fn rescan_step(&self) -> Duration {
        Duration::from_millis(self.rescan_step_ms)
    }
}
