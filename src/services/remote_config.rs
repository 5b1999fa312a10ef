//! Remote config values
//!
//! Lookups fall back from activated values to registered defaults. Fetching
//! is fire-and-forget: a state calls [`RemoteConfig::request_fetch`] and the
//! host services the request on a later frame through a [`ConfigSource`].
//! Every successful activation bumps [`RemoteConfig::generation`] so states
//! can notice fresh values without a callback.

use crate::error::ConfigError;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const SUBTITLE_OVERRIDE_KEY: &str = "subtitle_override";
pub const PHYSICS_GRAVITY_KEY: &str = "physics_gravity";
pub const PHYSICS_GRAVITY_DEFAULT: f64 = -20.0;

/// Outcome of the most recent fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    NoFetchYet,
    Success,
    Failure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchInfo {
    pub status: FetchStatus,
    pub fetch_time: Option<DateTime<Utc>>,
}

#[derive(Debug)]
pub struct RemoteConfig {
    defaults: HashMap<String, Value>,
    active: HashMap<String, Value>,
    fetched: Option<HashMap<String, Value>>,
    info: FetchInfo,
    generation: u64,
    fetch_requested: bool,
}

impl RemoteConfig {
    pub fn new() -> Self {
        RemoteConfig {
            defaults: HashMap::new(),
            active: HashMap::new(),
            fetched: None,
            info: FetchInfo {
                status: FetchStatus::NoFetchYet,
                fetch_time: None,
            },
            generation: 0,
            fetch_requested: false,
        }
    }

    /// Config seeded with the defaults the game's states read
    pub fn with_game_defaults() -> Self {
        let mut config = Self::new();
        config.set_defaults(game_defaults());
        config
    }

    pub fn set_defaults(&mut self, defaults: HashMap<String, Value>) {
        self.defaults.extend(defaults);
    }

    /// Asks the host to fetch fresh values on its next frame
    pub fn request_fetch(&mut self) {
        self.fetch_requested = true;
    }

    /// Consumes a pending fetch request
    pub fn take_fetch_request(&mut self) -> bool {
        std::mem::take(&mut self.fetch_requested)
    }

    /// Stages fetched values; they become visible after [`activate`](Self::activate)
    pub fn complete_fetch(&mut self, values: HashMap<String, Value>) {
        self.fetched = Some(values);
        self.info = FetchInfo {
            status: FetchStatus::Success,
            fetch_time: Some(Utc::now()),
        };
    }

    pub fn fail_fetch(&mut self, err: &ConfigError) {
        tracing::error!(%err, "remote config fetch incomplete");
        self.info.status = FetchStatus::Failure;
    }

    /// Promotes staged values to active. Returns false when the last fetch
    /// did not succeed or nothing is staged.
    pub fn activate(&mut self) -> bool {
        if self.info.status != FetchStatus::Success {
            return false;
        }
        let Some(fetched) = self.fetched.take() else {
            return false;
        };

        self.active.extend(fetched);
        self.generation += 1;
        tracing::info!(
            fetch_time = ?self.info.fetch_time,
            generation = self.generation,
            "remote data loaded and ready"
        );
        true
    }

    /// Realtime update pushed by the backend: stage and activate at once
    pub fn apply_update(&mut self, values: HashMap<String, Value>) -> bool {
        let keys: Vec<&str> = values.keys().map(String::as_str).collect();
        tracing::info!(updated_keys = %keys.join(", "), "remote config update received");
        self.complete_fetch(values);
        self.activate()
    }

    pub fn info(&self) -> FetchInfo {
        self.info
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn get_value(&self, key: &str) -> Option<&Value> {
        self.active.get(key).or_else(|| self.defaults.get(key))
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        match self.get_value(key)? {
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        match self.get_value(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Defaults registered before the first fetch
pub fn game_defaults() -> HashMap<String, Value> {
    let mut defaults = HashMap::new();
    defaults.insert(
        SUBTITLE_OVERRIDE_KEY.to_string(),
        Value::String(crate::ui::views::SubtitleOverride::default_json()),
    );
    defaults.insert(
        PHYSICS_GRAVITY_KEY.to_string(),
        Value::from(PHYSICS_GRAVITY_DEFAULT),
    );
    defaults
}

/// Where fetched values come from
pub trait ConfigSource {
    fn fetch(&mut self) -> Result<HashMap<String, Value>, ConfigError>;
}

/// Reads a JSON object of key/value pairs from disk on every fetch
pub struct FileConfigSource {
    path: PathBuf,
}

impl FileConfigSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        FileConfigSource {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ConfigSource for FileConfigSource {
    fn fetch(&mut self) -> Result<HashMap<String, Value>, ConfigError> {
        let json = fs::read_to_string(&self.path).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: self.path.clone(),
            source,
        })
    }
}

/// Serves a fixed set of values, or nothing at all when offline
#[derive(Debug, Default)]
pub struct StaticConfigSource {
    values: Option<HashMap<String, Value>>,
}

impl StaticConfigSource {
    pub fn new(values: HashMap<String, Value>) -> Self {
        StaticConfigSource {
            values: Some(values),
        }
    }

    pub fn offline() -> Self {
        StaticConfigSource { values: None }
    }
}

impl ConfigSource for StaticConfigSource {
    fn fetch(&mut self) -> Result<HashMap<String, Value>, ConfigError> {
        self.values
            .clone()
            .ok_or_else(|| ConfigError::Fetch("no network connection".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(key: &str, value: Value) -> HashMap<String, Value> {
        let mut map = HashMap::new();
        map.insert(key.to_string(), value);
        map
    }

    #[test]
    fn test_defaults_are_visible_before_fetch() {
        let config = RemoteConfig::with_game_defaults();
        assert_eq!(config.get_f64(PHYSICS_GRAVITY_KEY), Some(PHYSICS_GRAVITY_DEFAULT));
        assert!(config.get_string(SUBTITLE_OVERRIDE_KEY).is_some());
        assert_eq!(config.generation(), 0);
    }

    #[test]
    fn test_fetched_values_need_activation() {
        let mut config = RemoteConfig::with_game_defaults();
        config.complete_fetch(values(PHYSICS_GRAVITY_KEY, Value::from(-9.8)));
        assert_eq!(config.get_f64(PHYSICS_GRAVITY_KEY), Some(PHYSICS_GRAVITY_DEFAULT));

        assert!(config.activate());
        assert_eq!(config.get_f64(PHYSICS_GRAVITY_KEY), Some(-9.8));
        assert_eq!(config.generation(), 1);

        // Nothing staged any more
        assert!(!config.activate());
        assert_eq!(config.generation(), 1);
    }

    #[test]
    fn test_failed_fetch_does_not_activate() {
        let mut config = RemoteConfig::new();
        config.fail_fetch(&ConfigError::Fetch("timeout".to_string()));
        assert_eq!(config.info().status, FetchStatus::Failure);
        assert!(!config.activate());
    }

    #[test]
    fn test_fetch_request_is_consumed_once() {
        let mut config = RemoteConfig::new();
        assert!(!config.take_fetch_request());
        config.request_fetch();
        assert!(config.take_fetch_request());
        assert!(!config.take_fetch_request());
    }

    #[test]
    fn test_realtime_update_activates() {
        let mut config = RemoteConfig::new();
        assert!(config.apply_update(values("greeting", Value::from("hi"))));
        assert_eq!(config.get_string("greeting").as_deref(), Some("hi"));
    }

    #[test]
    fn test_string_numbers_parse() {
        let mut config = RemoteConfig::new();
        config.set_defaults(values("speed", Value::from("12.5")));
        assert_eq!(config.get_f64("speed"), Some(12.5));
        assert_eq!(config.get_f64("missing"), None);
    }

    #[test]
    fn test_static_source_offline() {
        let mut source = StaticConfigSource::offline();
        assert!(matches!(source.fetch(), Err(ConfigError::Fetch(_))));
    }

    #[test]
    fn test_file_source_reads_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("remote_config.json");
        fs::write(&path, r#"{ "physics_gravity": -5.0 }"#).unwrap();

        let mut source = FileConfigSource::new(&path);
        let fetched = source.fetch().unwrap();
        assert_eq!(fetched.get(PHYSICS_GRAVITY_KEY), Some(&Value::from(-5.0)));
    }
}
