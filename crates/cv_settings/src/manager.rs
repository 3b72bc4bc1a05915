use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::Settings;
use crate::defaults::default_settings_path;

/// Unified config manager.
pub struct ConfigManager {
    path: PathBuf,
    settings: Arc<RwLock<Settings>>,
}

impl ConfigManager {
    /// Create a new config manager (loads settings once and caches them).
    pub fn new() -> Self {
        Self::from_path(default_settings_path())
    }

    /// Create a config manager backed by the settings file at `path`.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let settings = Settings::load_from(&path);
        Self {
            path,
            settings: Arc::new(RwLock::new(settings)),
        }
    }

    /// Get a snapshot copy of current settings.
    pub fn get(&self) -> Settings {
        self.settings.read().clone()
    }

    /// Get the shared settings reference.
    pub fn get_shared(&self) -> Arc<RwLock<Settings>> {
        Arc::clone(&self.settings)
    }

    /// Reload settings from disk.
    pub fn reload(&self) {
        let new_settings = Settings::load_from(&self.path);
        *self.settings.write() = new_settings;
    }

    /// Apply `f` to the cached settings and persist the result.
    pub fn update(&self, f: impl FnOnce(&mut Settings)) -> anyhow::Result<()> {
        let snapshot = {
            let mut guard = self.settings.write();
            f(&mut guard);
            *guard = guard.clone().sanitized();
            guard.clone()
        };
        snapshot.save_to(&self.path)
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    // Convenience accessors.

    #[inline]
    pub fn selection_enabled(&self) -> bool {
        self.settings.read().selection_enabled
    }

    #[inline]
    pub fn handle_size(&self) -> f64 {
        self.settings.read().handle_size
    }

    #[inline]
    pub fn maximum_fps(&self) -> u32 {
        self.settings.read().maximum_fps
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
