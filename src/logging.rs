use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::io::paths::LOG_FILE;

/// Environment variable carrying an EnvFilter directive
pub const LOG_ENV: &str = "PLANHUB_LOG";

/// Build the filter: `PLANHUB_LOG` if set and valid, else the configured
/// level, else `info`.
pub fn build_filter(env_directive: Option<&str>, config_level: &str) -> EnvFilter {
    env_directive
        .filter(|s| !s.trim().is_empty())
        .and_then(|s| EnvFilter::try_new(s).ok())
        .or_else(|| EnvFilter::try_new(config_level).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

/// Install a file subscriber writing to `planhub.log` in `dir`. The terminal
/// belongs to the TUI, so nothing is written to stdout or stderr. Failure to
/// open the file leaves logging disabled.
pub fn init(dir: &Path, config_level: &str) {
    let env = std::env::var(LOG_ENV).ok();
    let filter = build_filter(env.as_deref(), config_level);

    if fs::create_dir_all(dir).is_err() {
        return;
    }
    let Ok(file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE))
    else {
        return;
    };

    let layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(Mutex::new(file));

    // A second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_directive_wins_over_config() {
        let filter = build_filter(Some("planhub=debug"), "warn");
        assert_eq!(filter.to_string(), "planhub=debug");
    }

    #[test]
    fn blank_env_falls_back_to_config() {
        let filter = build_filter(Some("  "), "warn");
        assert_eq!(filter.to_string(), "warn");
    }

    #[test]
    fn init_creates_log_file() {
        let dir = tempfile::TempDir::new().unwrap();
        init(dir.path(), "info");
        assert!(dir.path().join(LOG_FILE).exists());
    }
}
