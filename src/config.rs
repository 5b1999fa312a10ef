// Application configuration loaded from assets/config/app.json
//
// Every field has a default so a partial file, or no file at all, still
// produces a usable configuration.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "assets/config/app.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    /// Prefab templates merged over the built-in ones
    pub prefab_path: PathBuf,
    /// JSON object served as fetched remote config values
    pub remote_config_path: PathBuf,
    /// Volume settings file, or the one under the home directory when unset
    pub settings_path: Option<PathBuf>,
    /// Start a gameplay test loop over the main menu
    pub start_test_loop: bool,
    pub logging: LogSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            window_title: "Hamster".to_string(),
            window_width: 800,
            window_height: 600,
            prefab_path: PathBuf::from("assets/config/prefabs.json"),
            remote_config_path: PathBuf::from("assets/config/remote_config.json"),
            settings_path: None,
            start_test_loop: false,
            logging: LogSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Filter directives used when RUST_LOG is not set, e.g. "info" or "hamster=debug"
    pub filter: String,
    pub with_target: bool,
    pub with_timestamps: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        LogSettings {
            filter: "info".to_string(),
            with_target: false,
            with_timestamps: false,
        }
    }
}

impl AppConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads the file if present. A missing file yields the defaults quietly;
    /// an unreadable one yields the defaults with a warning.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return AppConfig::default();
        }
        match Self::load_from_file(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("Warning: {}, using default configuration", err);
                AppConfig::default()
            }
        }
    }
}
