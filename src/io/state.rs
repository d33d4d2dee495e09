use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::io::recovery::atomic_write;

const STATE_FILE: &str = "ui-state.json";

/// Persisted TUI state (written to ui-state.json next to the store)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UiState {
    /// Which view is showing ("matrix", "calendar", "history")
    pub view: String,
    /// Matrix shows Q1 alone
    #[serde(default)]
    pub focus_mode: bool,
    /// Selected task id
    #[serde(default)]
    pub selected: Option<String>,
    /// Calendar month as `YYYY-MM`
    #[serde(default)]
    pub calendar_month: Option<String>,
}

/// Read ui-state.json from the given directory
pub fn read_ui_state(dir: &Path) -> Option<UiState> {
    let content = fs::read_to_string(dir.join(STATE_FILE)).ok()?;
    serde_json::from_str(&content).ok()
}

/// Write ui-state.json to the given directory
pub fn write_ui_state(dir: &Path, state: &UiState) -> Result<(), std::io::Error> {
    let content = serde_json::to_string_pretty(state)?;
    atomic_write(&dir.join(STATE_FILE), content.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_and_read_round_trip() {
        let dir = TempDir::new().unwrap();
        let state = UiState {
            view: "calendar".into(),
            focus_mode: true,
            selected: Some("3".into()),
            calendar_month: Some("2026-02".into()),
        };

        write_ui_state(dir.path(), &state).unwrap();
        assert_eq!(read_ui_state(dir.path()).unwrap(), state);
    }

    #[test]
    fn read_missing_file_returns_none() {
        let dir = TempDir::new().unwrap();
        assert!(read_ui_state(dir.path()).is_none());
    }

    #[test]
    fn read_malformed_json_returns_none() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(STATE_FILE), "not json {{{").unwrap();
        assert!(read_ui_state(dir.path()).is_none());
    }

    #[test]
    fn serde_defaults_on_minimal_object() {
        // `view` is required, other fields have defaults
        let state: UiState = serde_json::from_str(r#"{"view":"matrix"}"#).unwrap();
        assert_eq!(state.view, "matrix");
        assert!(!state.focus_mode);
        assert!(state.selected.is_none());
        assert!(state.calendar_month.is_none());
    }
}
