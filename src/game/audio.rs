//! Audio volume settings
//!
//! Volumes are whole steps from 0 to [`MAX_VOLUME`] so the settings menu can
//! show them directly. Every change is written through a [`SettingsStore`].
//!
//! # Architecture
//!
//! - `VolumeSettings`: the persisted document
//! - `SettingsStore`: where the document lives (JSON file or memory)
//! - `AudioSettings`: the live values plus the store they persist to

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Highest volume step
pub const MAX_VOLUME: u8 = 6;

/// Persisted volume document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeSettings {
    pub music_volume: u8,
    pub sound_fx_volume: u8,
}

impl Default for VolumeSettings {
    fn default() -> Self {
        VolumeSettings {
            music_volume: MAX_VOLUME,
            sound_fx_volume: MAX_VOLUME,
        }
    }
}

/// Storage backend for volume settings
pub trait SettingsStore {
    /// Returns `None` when nothing has been saved yet
    fn load(&self) -> Result<Option<VolumeSettings>, ConfigError>;

    fn save(&mut self, settings: &VolumeSettings) -> Result<(), ConfigError>;
}

/// Keeps settings in memory; used in tests and when no home directory exists
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    saved: Option<VolumeSettings>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn saved(&self) -> Option<VolumeSettings> {
        self.saved
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<Option<VolumeSettings>, ConfigError> {
        Ok(self.saved)
    }

    fn save(&mut self, settings: &VolumeSettings) -> Result<(), ConfigError> {
        self.saved = Some(*settings);
        Ok(())
    }
}

/// Stores settings as a pretty-printed JSON file
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        JsonSettingsStore {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// `~/.hamster/settings.json`, or `./settings.json` without a home directory
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .map(|p| p.join(".hamster").join("settings.json"))
            .unwrap_or_else(|| PathBuf::from("./settings.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> ConfigError {
        ConfigError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl SettingsStore for JsonSettingsStore {
    fn load(&self) -> Result<Option<VolumeSettings>, ConfigError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        let settings = serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: self.path.clone(),
            source,
        })?;
        Ok(Some(settings))
    }

    fn save(&mut self, settings: &VolumeSettings) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        let json = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, json).map_err(|e| self.io_error(e))?;
        Ok(())
    }
}

/// Live volume settings
pub struct AudioSettings {
    current: VolumeSettings,
    store: Box<dyn SettingsStore>,
}

impl AudioSettings {
    /// Loads saved settings, falling back to full volume when none exist or
    /// the stored document cannot be read
    pub fn load(store: Box<dyn SettingsStore>) -> Self {
        let current = match store.load() {
            Ok(Some(saved)) => VolumeSettings {
                music_volume: saved.music_volume.min(MAX_VOLUME),
                sound_fx_volume: saved.sound_fx_volume.min(MAX_VOLUME),
            },
            Ok(None) => VolumeSettings::default(),
            Err(err) => {
                tracing::warn!(%err, "could not load audio settings, using defaults");
                VolumeSettings::default()
            }
        };
        AudioSettings { current, store }
    }

    pub fn in_memory() -> Self {
        Self::load(Box::new(MemorySettingsStore::new()))
    }

    pub fn music_volume(&self) -> u8 {
        self.current.music_volume
    }

    pub fn sound_fx_volume(&self) -> u8 {
        self.current.sound_fx_volume
    }

    pub fn snapshot(&self) -> VolumeSettings {
        self.current
    }

    /// Gain applied to the music source, 0.0 to 1.0
    pub fn music_gain(&self) -> f32 {
        self.current.music_volume as f32 / MAX_VOLUME as f32
    }

    /// Gain applied to the listener for sound effects, 0.0 to 1.0
    pub fn sound_fx_gain(&self) -> f32 {
        self.current.sound_fx_volume as f32 / MAX_VOLUME as f32
    }

    pub fn set_music_volume(&mut self, volume: u8) -> Result<(), ConfigError> {
        self.current.music_volume = volume.min(MAX_VOLUME);
        self.store.save(&self.current)
    }

    pub fn set_sound_fx_volume(&mut self, volume: u8) -> Result<(), ConfigError> {
        self.current.sound_fx_volume = volume.min(MAX_VOLUME);
        self.store.save(&self.current)
    }
}

/// Applies a signed step to a volume, clamped to `0..=MAX_VOLUME`
pub fn step_volume(volume: u8, step: i32) -> u8 {
    (volume as i32).saturating_add(step).clamp(0, MAX_VOLUME as i32) as u8
}
