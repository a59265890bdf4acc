//! Path helpers for XDG directories.

use std::path::PathBuf;

const APP_DIR: &str = "capy-webapps";

fn home() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from(std::env::var("HOME").unwrap_or_default()))
}

/// Default web app config: `$XDG_CONFIG_HOME/capy-webapps/webapps.json`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| home().join(".config"))
        .join(APP_DIR)
        .join("webapps.json")
}

/// Where launchers are installed: `$XDG_DATA_HOME/applications`.
pub fn default_applications_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| home().join(".local/share"))
        .join("applications")
}

/// Download cache for icons: `$XDG_CACHE_HOME/capy-webapps/icons`.
pub fn default_icon_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| home().join(".cache"))
        .join(APP_DIR)
        .join("icons")
}
