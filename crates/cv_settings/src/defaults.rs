use std::path::PathBuf;

/// Environment variable that overrides the settings file location.
pub const CONFIG_ENV_VAR: &str = "CAMVIEW_CONFIG";

// Selection defaults
pub fn default_selection_enabled() -> bool {
    true
}

pub fn default_handle_size() -> f64 {
    8.0
}

// Capture defaults
pub fn default_maximum_fps() -> u32 {
    24
}

// Marching-ants animation defaults
pub fn default_dash_tick_ms() -> u64 {
    50
}

pub fn default_dash_phase_start() -> f32 {
    // Sum of the dash pattern lengths (6 on, 6 off) minus one.
    11.0
}

// Capture flash defaults
pub fn default_flash_tick_ms() -> u64 {
    30
}

pub fn default_flash_decay() -> f32 {
    0.07
}

/// Directory that holds the settings file.
pub fn default_config_dir() -> PathBuf {
    // Prefer a user home directory.
    if let Ok(home_dir) = std::env::var("HOME") {
        return PathBuf::from(home_dir).join(".camview");
    }
    if let Ok(home_dir) = std::env::var("USERPROFILE") {
        return PathBuf::from(home_dir).join(".camview");
    }

    // Last resort: cwd.
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".camview")
}

pub fn default_settings_path() -> PathBuf {
    match std::env::var_os(CONFIG_ENV_VAR) {
        Some(path) => PathBuf::from(path),
        None => default_config_dir().join("settings.json"),
    }
}
