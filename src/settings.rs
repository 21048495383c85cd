//! Game settings and preferences
//!
//! Stored as JSON. Everything is optional in the file; missing fields fall
//! back to defaults so old files keep loading.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::TICK_PERIOD_MS;
use crate::platform::KeyBindings;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings from {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write settings to {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("invalid settings in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to encode settings: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("tick period must be at least 1 ms")]
    ZeroTickPeriod,

    #[error("frame size must be at least 1x1, got {cols}x{rows}")]
    EmptyFrame { cols: usize, rows: usize },
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seed for the enemy-fire generator; `None` picks one per process
    pub seed: Option<u32>,
    /// Milliseconds between timer ticks in real-time mode
    pub tick_period_ms: u64,
    /// Print a frame every N ticks (0 = never)
    pub frame_every: u64,
    /// Frame size in characters
    pub frame_cols: usize,
    pub frame_rows: usize,
    /// `env_logger` filter, used when `RUST_LOG` is unset
    pub log_filter: String,
    pub keys: KeyBindings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            tick_period_ms: TICK_PERIOD_MS,
            frame_every: 0,
            frame_cols: 60,
            frame_rows: 30,
            log_filter: "info".to_string(),
            keys: KeyBindings::default(),
        }
    }
}

impl Settings {
    pub fn validate(self) -> Result<Self, SettingsError> {
        if self.tick_period_ms == 0 {
            return Err(SettingsError::ZeroTickPeriod);
        }
        if self.frame_cols == 0 || self.frame_rows == 0 {
            return Err(SettingsError::EmptyFrame {
                cols: self.frame_cols,
                rows: self.frame_rows,
            });
        }
        Ok(self)
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings =
            serde_json::from_str(&json).map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        log::info!("Loaded settings from {}", path.display());
        settings.validate()
    }

    /// Load from `path` if given and present, otherwise use defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, SettingsError> {
        match path {
            Some(path) if path.exists() => Self::load(path),
            Some(path) => {
                log::info!("No settings at {}, using defaults", path.display());
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
