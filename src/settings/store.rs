//! JSON-backed settings persistence for standalone hosts.

use super::{
    KEY_BAR_COLOR_TYPE, KEY_BAR_HEIGHT, KEY_MODE, KEY_POINT_SIZE, KEY_ROTATION_ANGLE,
    KEY_ROTATION_SPEED, KEY_SPEED,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Errors from loading or saving persisted settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to access settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unknown setting: {0}")]
    UnknownKey(String),
}

/// Persisted integer settings. Absent keys stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bar_height: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pointsize: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation_angle: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bar_color_type: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation_speed: Option<i32>,
}

impl PersistedSettings {
    /// Value stored under `key`.
    pub fn get(&self, key: &str) -> Option<i32> {
        match key {
            KEY_BAR_HEIGHT => self.bar_height,
            KEY_SPEED => self.speed,
            KEY_MODE => self.mode,
            KEY_POINT_SIZE => self.pointsize,
            KEY_ROTATION_ANGLE => self.rotation_angle,
            KEY_BAR_COLOR_TYPE => self.bar_color_type,
            KEY_ROTATION_SPEED => self.rotation_speed,
            _ => None,
        }
    }

    fn slot_mut(&mut self, key: &str) -> Option<&mut Option<i32>> {
        match key {
            KEY_BAR_HEIGHT => Some(&mut self.bar_height),
            KEY_SPEED => Some(&mut self.speed),
            KEY_MODE => Some(&mut self.mode),
            KEY_POINT_SIZE => Some(&mut self.pointsize),
            KEY_ROTATION_ANGLE => Some(&mut self.rotation_angle),
            KEY_BAR_COLOR_TYPE => Some(&mut self.bar_color_type),
            KEY_ROTATION_SPEED => Some(&mut self.rotation_speed),
            _ => None,
        }
    }
}

/// Settings kept in memory and optionally mirrored to a JSON file.
#[derive(Debug, Clone, Default)]
pub struct JsonSettingsStore {
    path: Option<PathBuf>,
    values: PersistedSettings,
}

impl JsonSettingsStore {
    /// In-memory store with the given values.
    pub fn new(values: PersistedSettings) -> Self {
        Self { path: None, values }
    }

    /// Load from `path`. A missing file yields an empty store bound to that path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref().to_path_buf();
        let values = match std::fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => PersistedSettings::default(),
            Err(source) => return Err(SettingsError::Io { path, source }),
        };
        Ok(Self {
            path: Some(path),
            values,
        })
    }

    /// Parse settings from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn values(&self) -> &PersistedSettings {
        &self.values
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get(&self, key: &str) -> Option<i32> {
        self.values.get(key)
    }

    /// Store a value under a known key.
    pub fn set(&mut self, key: &str, value: i32) -> Result<(), SettingsError> {
        let slot = self
            .values
            .slot_mut(key)
            .ok_or_else(|| SettingsError::UnknownKey(key.to_string()))?;
        *slot = Some(value);
        Ok(())
    }

    /// Write the current values to the bound file, if any.
    pub fn save(&self) -> Result<(), SettingsError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(path, json).map_err(|source| SettingsError::Io {
            path: path.clone(),
            source,
        })
    }
}
