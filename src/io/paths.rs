use std::path::{Path, PathBuf};

use crate::model::config::Config;

pub const APP_DIR: &str = "planhub";
pub const STORE_FILE: &str = "planning-hub-tasks.json";
pub const CONFIG_FILE: &str = "config.toml";
pub const LOG_FILE: &str = "planhub.log";

pub const STORE_ENV: &str = "PLANHUB_STORE";
pub const CONFIG_ENV: &str = "PLANHUB_CONFIG";

/// Get the user's home directory
fn dirs_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}

/// `$XDG_DATA_HOME/planhub`, defaulting to `~/.local/share/planhub`
pub fn data_dir() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .ok()
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| dirs_home().join(".local").join("share"))
        .join(APP_DIR)
}

/// `$XDG_CONFIG_HOME/planhub`, defaulting to `~/.config/planhub`
pub fn config_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .ok()
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| dirs_home().join(".config"))
        .join(APP_DIR)
}

/// Config file: flag, then `PLANHUB_CONFIG`, then the XDG default.
pub fn resolve_config_path(flag: Option<&Path>) -> PathBuf {
    pick_config_path(flag, std::env::var(CONFIG_ENV).ok(), config_dir())
}

fn pick_config_path(flag: Option<&Path>, env: Option<String>, default_dir: PathBuf) -> PathBuf {
    if let Some(p) = flag {
        return p.to_path_buf();
    }
    if let Some(p) = env.filter(|s| !s.is_empty()) {
        return PathBuf::from(p);
    }
    default_dir.join(CONFIG_FILE)
}

/// Store file: flag, then `PLANHUB_STORE`, then `storage.path`, then the
/// XDG default.
pub fn resolve_store_path(flag: Option<&Path>, config: &Config) -> PathBuf {
    pick_store_path(flag, std::env::var(STORE_ENV).ok(), config, data_dir())
}

fn pick_store_path(
    flag: Option<&Path>,
    env: Option<String>,
    config: &Config,
    default_dir: PathBuf,
) -> PathBuf {
    if let Some(p) = flag {
        return p.to_path_buf();
    }
    if let Some(p) = env.filter(|s| !s.is_empty()) {
        return PathBuf::from(p);
    }
    if let Some(p) = config.storage.path.as_deref().filter(|s| !s.is_empty()) {
        return expand_tilde(p);
    }
    default_dir.join(STORE_FILE)
}

/// Directory holding the recovery log and UI state: the store's parent.
pub fn sidecar_dir(store_path: &Path) -> PathBuf {
    match store_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn expand_tilde(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs_home().join(rest),
        None => PathBuf::from(path),
    }
}

/// Abbreviate a path by replacing $HOME with ~
pub fn abbreviate_path(path: &Path) -> String {
    let s = path.display().to_string();
    if let Ok(home) = std::env::var("HOME")
        && !home.is_empty()
        && let Some(rest) = s.strip_prefix(&home)
    {
        return format!("~{}", rest);
    }
    s
}
