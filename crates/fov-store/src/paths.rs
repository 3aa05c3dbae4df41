use std::env;
use std::path::{Path, PathBuf};

/// Overrides the data directory for both the layer and `fovctl`.
pub const DATA_DIR_ENV: &str = "FOV_DATA_DIR";

pub const SETTINGS_FILE: &str = "settings.db";
pub const CONFIG_FILE: &str = "layer.toml";

fn default_base_dir() -> PathBuf {
    dirs_home().join(".customized-fov")
}

fn dirs_home() -> PathBuf {
    env::var("HOME")
        .or_else(|_| env::var("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}

/// Pick the data directory: explicit override, then `$FOV_DATA_DIR`, then
/// `~/.customized-fov`.
pub fn resolve_base_dir(base_dir: Option<&Path>) -> PathBuf {
    if let Some(dir) = base_dir {
        return dir.to_path_buf();
    }
    match env::var_os(DATA_DIR_ENV) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => default_base_dir(),
    }
}

pub fn settings_path(base: &Path) -> PathBuf {
    base.join(SETTINGS_FILE)
}

pub fn config_path(base: &Path) -> PathBuf {
    base.join(CONFIG_FILE)
}
