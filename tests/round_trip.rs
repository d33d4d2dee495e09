use planhub::io::store_io::{load_tasks, save_tasks, seed_tasks};
use planhub::model::task::{Quadrant, Task};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Helper: load a fixture store, save it elsewhere, and assert byte-for-byte equality
fn assert_store_round_trip(fixture_name: &str) {
    let source = fs::read_to_string(fixture(fixture_name))
        .unwrap_or_else(|e| panic!("Could not read fixture {}: {}", fixture_name, e));

    let tasks = load_tasks(&fixture(fixture_name), 0);
    let dir = TempDir::new().unwrap();
    let out_path = dir.path().join("tasks.json");
    save_tasks(&out_path, &tasks).unwrap();
    let output = fs::read_to_string(&out_path).unwrap();

    assert_eq!(
        output, source,
        "Round-trip failed for fixture: {}",
        fixture_name
    );
}

#[test]
fn round_trip_store_fixture() {
    assert_store_round_trip("tasks.json");
}

#[test]
fn fixture_fields_load() {
    let tasks = load_tasks(&fixture("tasks.json"), 0);
    assert_eq!(tasks.len(), 3);

    let report = &tasks[0];
    assert_eq!(report.quadrant, Quadrant::Q1);
    assert_eq!(
        report.description.as_deref(),
        Some("Review Q3 KPIs and finalize slide deck.")
    );
    assert_eq!(report.due_date, Some(1772409600000));
    assert_eq!(report.completed_at, None);

    let done = &tasks[1];
    assert!(done.completed);
    assert_eq!(done.completed_at, Some(1772359200000));

    assert_eq!(tasks[2].title, "Read \"Deep Work\" \u{2615}");
    assert_eq!(tasks[2].quadrant, Quadrant::Backlog);
}

#[test]
fn save_then_load_preserves_order_and_fields() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested/tasks.json");
    let mut done = Task::new("b".into(), "Ship it".into(), Quadrant::Q2, 10).with_tags(&["Work", "Launch"]);
    done.completed = true;
    done.completed_at = Some(20);
    let tasks = vec![
        Task::new("z".into(), "Last alphabetically".into(), Quadrant::Q4, 5)
            .with_description("first in backing order")
            .with_due_date(1_700_000_000_000),
        done,
        Task::new("a".into(), "Inbox idea".into(), Quadrant::Backlog, 30),
    ];

    save_tasks(&path, &tasks).unwrap();
    assert_eq!(load_tasks(&path, 0), tasks);
}

#[test]
fn missing_store_loads_seed() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tasks.json");
    assert_eq!(load_tasks(&path, 1_000), seed_tasks(1_000));
    assert!(!path.exists());
}

#[test]
fn empty_array_is_an_empty_board() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tasks.json");
    fs::write(&path, "[]").unwrap();
    assert!(load_tasks(&path, 0).is_empty());
}

#[test]
fn unknown_fields_are_ignored() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tasks.json");
    fs::write(
        &path,
        r#"[{"id":"x","title":"T","quadrant":"Q2","completed":false,"createdAt":1,"color":"red"}]"#,
    )
    .unwrap();
    let tasks = load_tasks(&path, 0);
    assert_eq!(tasks.len(), 1);
    assert!(tasks[0].tags.is_empty());
}
