use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::defaults::{
    default_dash_phase_start, default_dash_tick_ms, default_flash_decay, default_flash_tick_ms,
    default_handle_size, default_maximum_fps, default_selection_enabled,
};

/// Camera view settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    // Selection
    #[serde(default = "default_selection_enabled")]
    pub selection_enabled: bool,
    /// Side of the square hit area around each resize handle, in display pixels.
    #[serde(default = "default_handle_size")]
    pub handle_size: f64,

    // Capture
    #[serde(default = "default_maximum_fps")]
    pub maximum_fps: u32,

    // Marching ants
    #[serde(default = "default_dash_tick_ms")]
    pub dash_tick_ms: u64,
    #[serde(default = "default_dash_phase_start")]
    pub dash_phase_start: f32,

    // Capture flash
    #[serde(default = "default_flash_tick_ms")]
    pub flash_tick_ms: u64,
    #[serde(default = "default_flash_decay")]
    pub flash_decay: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            selection_enabled: default_selection_enabled(),
            handle_size: default_handle_size(),
            maximum_fps: default_maximum_fps(),
            dash_tick_ms: default_dash_tick_ms(),
            dash_phase_start: default_dash_phase_start(),
            flash_tick_ms: default_flash_tick_ms(),
            flash_decay: default_flash_decay(),
        }
    }
}

impl Settings {
    /// Load settings from `path`, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }

        match Self::try_load_from(path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Using default settings, failed to load {}: {e:#}", path.display());
                Self::default()
            }
        }
    }

    pub fn try_load_from(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let settings: Settings = serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(settings.sanitized())
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Replace out-of-range values with their defaults.
    pub fn sanitized(mut self) -> Self {
        if !(self.handle_size.is_finite() && self.handle_size > 0.0) {
            self.handle_size = default_handle_size();
        }
        if self.maximum_fps == 0 {
            self.maximum_fps = default_maximum_fps();
        }
        if self.dash_tick_ms == 0 {
            self.dash_tick_ms = default_dash_tick_ms();
        }
        if self.flash_tick_ms == 0 {
            self.flash_tick_ms = default_flash_tick_ms();
        }
        if !(self.flash_decay > 0.0 && self.flash_decay <= 1.0) {
            self.flash_decay = default_flash_decay();
        }
        if !(self.dash_phase_start.is_finite() && self.dash_phase_start >= 0.0) {
            self.dash_phase_start = default_dash_phase_start();
        }
        self
    }

    #[inline]
    pub fn dash_tick(&self) -> Duration {
        Duration::from_millis(self.dash_tick_ms)
    }

    #[inline]
    pub fn flash_tick(&self) -> Duration {
        Duration::from_millis(self.flash_tick_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(dir.path().join("nope.json"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let settings = Settings {
            handle_size: 12.0,
            maximum_fps: 60,
            selection_enabled: false,
            ..Settings::default()
        };
        settings.save_to(&path).unwrap();

        assert_eq!(Settings::try_load_from(&path).unwrap(), settings);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "handle_size": 10.0 }"#).unwrap();

        let settings = Settings::load_from(&path);
        assert_eq!(settings.handle_size, 10.0);
        assert_eq!(settings.maximum_fps, default_maximum_fps());
        assert_eq!(settings.dash_tick_ms, default_dash_tick_ms());
    }

    #[test]
    fn invalid_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "not json").unwrap();

        assert!(Settings::try_load_from(&path).is_err());
        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn out_of_range_values_are_sanitized() {
        let settings = Settings {
            handle_size: -1.0,
            maximum_fps: 0,
            flash_decay: 3.0,
            dash_tick_ms: 0,
            ..Settings::default()
        }
        .sanitized();

        assert_eq!(settings, Settings::default());
    }
}
