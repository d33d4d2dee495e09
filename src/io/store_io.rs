use std::fs;
use std::path::{Path, PathBuf};

use crate::io::paths::sidecar_dir;
use crate::io::recovery::{RecoveryCategory, RecoveryEntry, atomic_write, log_recovery};
use crate::model::task::{Quadrant, Task};

const DAY_MILLIS: i64 = 86_400_000;

/// Error type for store I/O operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not serialize tasks: {0}")]
    SerializeError(#[from] serde_json::Error),
}

/// The board a first-time user starts with.
pub fn seed_tasks(now: i64) -> Vec<Task> {
    vec![
        Task::new(
            "1".into(),
            "Finish Quarterly Report".into(),
            Quadrant::Q1,
            now,
        )
        .with_description("Review Q3 KPIs and finalize slide deck.")
        .with_tags(&["Work"])
        .with_due_date(now + DAY_MILLIS),
        Task::new("2".into(), "Call Electrician".into(), Quadrant::Q3, now).with_tags(&["Home"]),
        Task::new(
            "3".into(),
            "Learn Advanced React Patterns".into(),
            Quadrant::Q2,
            now,
        )
        .with_tags(&["Learning"]),
        Task::new(
            "5".into(),
            "Email Design Team".into(),
            Quadrant::Backlog,
            now,
        )
        .with_description("Ask for the new logo assets.")
        .with_tags(&["Work"]),
    ]
}

/// Load the task list. Never fails: a missing file yields the seed set, and
/// an unreadable or malformed one yields the seed set after its raw content
/// is copied into the recovery log.
pub fn load_tasks(path: &Path, now: i64) -> Vec<Task> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "no store file, starting from seed tasks");
            return seed_tasks(now);
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "could not read store, using seed tasks");
            log_recovery(
                &sidecar_dir(path),
                RecoveryEntry::new(RecoveryCategory::Load, "store unreadable")
                    .field("Source", path.display())
                    .field("Error", &e),
            );
            return seed_tasks(now);
        }
    };

    match serde_json::from_str::<Vec<Task>>(&content) {
        Ok(tasks) => {
            tracing::debug!(path = %path.display(), count = tasks.len(), "loaded tasks");
            tasks
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "malformed store, using seed tasks");
            log_recovery(
                &sidecar_dir(path),
                RecoveryEntry::new(RecoveryCategory::Load, "malformed store replaced by seed tasks")
                    .field("Source", path.display())
                    .field("Error", &e)
                    .body(content),
            );
            seed_tasks(now)
        }
    }
}

/// Write the full ordered task list as pretty JSON, atomically.
pub fn save_tasks(path: &Path, tasks: &[Task]) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(tasks)?;
    atomic_write(path, json.as_bytes()).map_err(|e| StoreError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })?;
    tracing::debug!(path = %path.display(), count = tasks.len(), "saved tasks");
    Ok(())
}

/// Save, and on failure keep the unsaved JSON in the recovery log.
/// Used by the TUI, which never interrupts the user with save errors.
pub fn save_or_recover(path: &Path, tasks: &[Task]) -> bool {
    match save_tasks(path, tasks) {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "save failed");
            let body = serde_json::to_string_pretty(tasks).unwrap_or_default();
            log_recovery(
                &sidecar_dir(path),
                RecoveryEntry::new(RecoveryCategory::Write, "unsaved tasks")
                    .field("Target", path.display())
                    .field("Error", &e)
                    .body(body),
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::recovery::read_recovery_entries;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const NOW: i64 = 1_700_000_000_000;

    #[test]
    fn seed_matches_first_run_board() {
        let tasks = seed_tasks(NOW);
        let ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "5"]);
        assert_eq!(tasks[0].due_date, Some(NOW + DAY_MILLIS));
        assert_eq!(tasks[3].quadrant, Quadrant::Backlog);
        assert!(tasks.iter().all(|t| !t.completed && t.created_at == NOW));
    }

    #[test]
    fn missing_file_yields_seed() {
        let dir = TempDir::new().unwrap();
        let tasks = load_tasks(&dir.path().join("tasks.json"), NOW);
        assert_eq!(tasks, seed_tasks(NOW));
        assert!(read_recovery_entries(dir.path(), None).is_empty());
    }

    #[test]
    fn malformed_file_yields_seed_and_recovery_entry() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");
        fs::write(&path, "{not json").unwrap();

        let tasks = load_tasks(&path, NOW);
        assert_eq!(tasks, seed_tasks(NOW));

        let entries = read_recovery_entries(dir.path(), None);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].category, RecoveryCategory::Load);
        assert_eq!(entries[0].body, "{not json");
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sub").join("tasks.json");
        let mut tasks = seed_tasks(NOW);
        tasks[1].completed = true;
        tasks[1].completed_at = Some(NOW + 5);

        save_tasks(&path, &tasks).unwrap();
        assert_eq!(load_tasks(&path, NOW + 1), tasks);
    }

    #[test]
    fn empty_array_is_an_empty_board() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");
        fs::write(&path, "[]").unwrap();
        assert!(load_tasks(&path, NOW).is_empty());
    }

    #[test]
    fn save_failure_goes_to_recovery_log() {
        let dir = TempDir::new().unwrap();
        // A directory where the file should be makes the rename fail
        let path = dir.path().join("tasks.json");
        fs::create_dir_all(path.join("occupied")).unwrap();

        assert!(!save_or_recover(&path, &seed_tasks(NOW)));
        let entries = read_recovery_entries(dir.path(), None);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].category, RecoveryCategory::Write);
        assert!(entries[0].body.contains("Finish Quarterly Report"));
    }
}
