use uuid::Uuid;

use crate::model::board::Board;
use crate::model::task::{ImportItem, Quadrant, Task, TaskPatch};

/// Title given to tasks created with `add_task`
pub const DEFAULT_TITLE: &str = "New Task";

/// Direction for manual re-ranking within a quadrant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            _ => Err(format!("invalid direction: {} (expected up or down)", s)),
        }
    }
}

/// Error type for resolving user-supplied task IDs
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("task not found: {0}")]
    NotFound(String),
    #[error("ambiguous task id {prefix}: matches {}", .candidates.join(", "))]
    Ambiguous {
        prefix: String,
        candidates: Vec<String>,
    },
    #[error("title cannot be empty")]
    EmptyTitle,
}

/// Reject blank titles; surrounding whitespace is dropped.
pub fn validate_title(title: &str) -> Result<String, TaskError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(TaskError::EmptyTitle);
    }
    Ok(trimmed.to_string())
}

fn fresh_id() -> String {
    Uuid::new_v4().to_string()
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

/// Append a new incomplete task to the end of the store and select it.
/// Returns the new ID.
pub fn add_task(board: &mut Board, quadrant: Quadrant, now: i64) -> String {
    let id = fresh_id();
    board
        .tasks
        .push(Task::new(id.clone(), DEFAULT_TITLE.to_string(), quadrant, now));
    board.selected = Some(id.clone());
    tracing::debug!(%id, %quadrant, "task added");
    id
}

/// Append one new task per imported item, preserving item order.
/// Returns the new IDs.
pub fn import_items(board: &mut Board, items: Vec<ImportItem>, now: i64) -> Vec<String> {
    let mut ids = Vec::with_capacity(items.len());
    for item in items {
        let id = fresh_id();
        let mut task = Task::new(id.clone(), item.title, item.quadrant, now);
        task.tags = item.tags;
        board.tasks.push(task);
        ids.push(id);
    }
    tracing::debug!(count = ids.len(), "imported tasks");
    ids
}

// ---------------------------------------------------------------------------
// Updates
// ---------------------------------------------------------------------------

/// Flip completion, keeping `completed_at` in step. No-op for unknown IDs.
pub fn toggle_task(board: &mut Board, id: &str, now: i64) -> bool {
    let Some(task) = board.find_mut(id) else {
        return false;
    };
    task.completed = !task.completed;
    task.completed_at = if task.completed { Some(now) } else { None };
    tracing::debug!(%id, completed = task.completed, "task toggled");
    true
}

/// Shallow-merge `patch` into the task. No validation happens here.
pub fn update_task(board: &mut Board, id: &str, patch: TaskPatch) -> bool {
    if patch.is_empty() {
        return false;
    }
    let Some(task) = board.find_mut(id) else {
        return false;
    };
    patch.apply(task);
    tracing::debug!(%id, "task updated");
    true
}

/// Remove a task, clearing the selection if it pointed at it
pub fn delete_task(board: &mut Board, id: &str) -> bool {
    let Some(idx) = board.position(id) else {
        return false;
    };
    board.tasks.remove(idx);
    if board.selected.as_deref() == Some(id) {
        board.selected = None;
    }
    tracing::debug!(%id, "task deleted");
    true
}

/// Change only the quadrant; the backing position is left alone
pub fn move_task(board: &mut Board, id: &str, quadrant: Quadrant) -> bool {
    let Some(task) = board.find_mut(id) else {
        return false;
    };
    if task.quadrant == quadrant {
        return false;
    }
    task.quadrant = quadrant;
    tracing::debug!(%id, %quadrant, "task moved");
    true
}

/// Swap a task with its neighbour among the incomplete tasks of its quadrant.
///
/// The neighbour is found in the quadrant-local sublist; the swap exchanges
/// the two absolute positions in the backing sequence, so tasks of other
/// quadrants (and completed tasks) keep their slots.
pub fn reorder_task(board: &mut Board, id: &str, direction: Direction) -> bool {
    let Some(task) = board.find(id) else {
        return false;
    };
    if task.completed {
        return false;
    }
    let quadrant = task.quadrant;

    // Absolute indices of the quadrant's incomplete tasks, in backing order
    let local: Vec<usize> = board
        .tasks
        .iter()
        .enumerate()
        .filter(|(_, t)| t.quadrant == quadrant && !t.completed)
        .map(|(i, _)| i)
        .collect();
    let Some(local_idx) = local.iter().position(|&i| board.tasks[i].id == id) else {
        return false;
    };

    let neighbour = match direction {
        Direction::Up if local_idx > 0 => local[local_idx - 1],
        Direction::Down if local_idx + 1 < local.len() => local[local_idx + 1],
        _ => return false,
    };
    board.tasks.swap(local[local_idx], neighbour);
    tracing::debug!(%id, ?direction, "task reordered");
    true
}

/// Remove every completed task. Returns how many were removed.
pub fn clear_history(board: &mut Board) -> usize {
    let before = board.tasks.len();
    board.tasks.retain(|t| !t.completed);
    if let Some(sel) = board.selected.as_deref()
        && board.find(sel).is_none()
    {
        board.selected = None;
    }
    let removed = before - board.tasks.len();
    tracing::debug!(removed, "history cleared");
    removed
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// Resolve a user-typed ID: exact match first, then a unique prefix
pub fn resolve_id(board: &Board, query: &str) -> Result<String, TaskError> {
    if board.find(query).is_some() {
        return Ok(query.to_string());
    }
    let candidates: Vec<String> = board
        .tasks
        .iter()
        .filter(|t| !query.is_empty() && t.id.starts_with(query))
        .map(|t| t.id.clone())
        .collect();
    match candidates.len() {
        0 => Err(TaskError::NotFound(query.to_string())),
        1 => Ok(candidates.into_iter().next().unwrap_or_default()),
        _ => Err(TaskError::Ambiguous {
            prefix: query.to_string(),
            candidates,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn validate_title_trims_and_rejects_blank() {
        assert_eq!(validate_title("  Pay rent ").unwrap(), "Pay rent");
        assert!(matches!(validate_title(" \t "), Err(TaskError::EmptyTitle)));
    }

    fn task(id: &str, q: Quadrant) -> Task {
        Task::new(id.into(), id.to_uppercase(), q, 0)
    }

    fn completed(id: &str, q: Quadrant) -> Task {
        let mut t = task(id, q);
        t.completed = true;
        t.completed_at = Some(1);
        t
    }

    fn ids(board: &Board) -> Vec<&str> {
        board.tasks.iter().map(|t| t.id.as_str()).collect()
    }

    fn open_ids(board: &Board, q: Quadrant) -> Vec<&str> {
        crate::ops::views::matrix_view(&board.tasks, q)
            .into_iter()
            .map(|t| t.id.as_str())
            .collect()
    }

    // --- creation ---

    #[test]
    fn add_task_appends_and_selects() {
        let mut board = Board::new(vec![task("a", Quadrant::Q2)]);
        let id = add_task(&mut board, Quadrant::Q1, 42);
        assert_eq!(board.len(), 2);
        let added = board.tasks.last().unwrap();
        assert_eq!(added.id, id);
        assert_eq!(added.title, DEFAULT_TITLE);
        assert_eq!(added.quadrant, Quadrant::Q1);
        assert!(!added.completed);
        assert!(added.tags.is_empty());
        assert_eq!(added.created_at, 42);
        assert_eq!(board.selected.as_deref(), Some(id.as_str()));
    }

    #[test]
    fn add_task_ids_are_unique() {
        let mut board = Board::default();
        let a = add_task(&mut board, Quadrant::Backlog, 0);
        let b = add_task(&mut board, Quadrant::Backlog, 0);
        assert_ne!(a, b);
    }

    #[test]
    fn import_items_appends_in_order() {
        let mut board = Board::new(vec![task("a", Quadrant::Q1)]);
        let ids = import_items(
            &mut board,
            vec![
                ImportItem {
                    title: "Buy milk".into(),
                    quadrant: Quadrant::Q4,
                    tags: vec!["Home".into()],
                },
                ImportItem {
                    title: "Q3 report".into(),
                    quadrant: Quadrant::Q1,
                    tags: vec![],
                },
            ],
            7,
        );
        assert_eq!(ids.len(), 2);
        assert_eq!(board.len(), 3);
        assert_eq!(board.tasks[1].title, "Buy milk");
        assert_eq!(board.tasks[1].tags, vec!["Home"]);
        assert_eq!(board.tasks[2].quadrant, Quadrant::Q1);
        assert!(board.tasks[1..].iter().all(|t| !t.completed && t.created_at == 7));
    }

    // --- toggle ---

    #[test]
    fn toggle_sets_and_clears_completed_at() {
        let mut board = Board::new(vec![task("a", Quadrant::Q1)]);
        assert!(toggle_task(&mut board, "a", 100));
        assert!(board.tasks[0].completed);
        assert_eq!(board.tasks[0].completed_at, Some(100));

        assert!(toggle_task(&mut board, "a", 200));
        assert!(!board.tasks[0].completed);
        assert_eq!(board.tasks[0].completed_at, None);
    }

    #[test]
    fn double_toggle_restores_state() {
        let original = task("a", Quadrant::Q3);
        let mut board = Board::new(vec![original.clone()]);
        toggle_task(&mut board, "a", 5);
        toggle_task(&mut board, "a", 6);
        assert_eq!(board.tasks[0], original);
    }

    #[test]
    fn toggle_unknown_is_noop() {
        let mut board = Board::new(vec![task("a", Quadrant::Q1)]);
        let before = board.clone();
        assert!(!toggle_task(&mut board, "zzz", 1));
        assert_eq!(board, before);
    }

    // --- update ---

    #[test]
    fn update_merges_fields_without_validation() {
        let mut board = Board::new(vec![task("a", Quadrant::Q1)]);
        let changed = update_task(
            &mut board,
            "a",
            TaskPatch {
                title: Some(String::new()),
                description: Some(Some("notes".into())),
                ..Default::default()
            },
        );
        assert!(changed);
        assert_eq!(board.tasks[0].title, "");
        assert_eq!(board.tasks[0].description.as_deref(), Some("notes"));
    }

    #[test]
    fn update_unknown_is_noop() {
        let mut board = Board::new(vec![task("a", Quadrant::Q1)]);
        let patch = TaskPatch {
            title: Some("x".into()),
            ..Default::default()
        };
        assert!(!update_task(&mut board, "b", patch));
        assert_eq!(board.tasks[0].title, "A");
    }

    // --- delete ---

    #[test]
    fn delete_clears_matching_selection() {
        let mut board = Board::new(vec![task("a", Quadrant::Q1), task("b", Quadrant::Q1)]);
        board.selected = Some("a".into());
        assert!(delete_task(&mut board, "b"));
        assert_eq!(board.selected.as_deref(), Some("a"));
        assert!(delete_task(&mut board, "a"));
        assert!(board.selected.is_none());
        assert!(board.is_empty());
        assert!(!delete_task(&mut board, "a"));
    }

    // --- move ---

    #[test]
    fn move_changes_only_quadrant() {
        let mut board = Board::new(vec![
            task("a", Quadrant::Q1),
            task("b", Quadrant::Backlog).with_tags(&["x"]),
            task("c", Quadrant::Q2),
        ]);
        let mut expected = board.tasks[1].clone();
        expected.quadrant = Quadrant::Q4;

        assert!(move_task(&mut board, "b", Quadrant::Q4));
        assert_eq!(ids(&board), vec!["a", "b", "c"]);
        assert_eq!(board.tasks[1], expected);
    }

    #[test]
    fn move_to_same_quadrant_reports_no_change() {
        let mut board = Board::new(vec![task("a", Quadrant::Q1)]);
        assert!(!move_task(&mut board, "a", Quadrant::Q1));
        assert!(!move_task(&mut board, "zzz", Quadrant::Q2));
    }

    // --- reorder ---

    #[test]
    fn reorder_up_swaps_with_previous_in_quadrant() {
        let mut board = Board::new(vec![
            task("a", Quadrant::Q2),
            task("b", Quadrant::Q2),
            task("c", Quadrant::Q2),
        ]);
        assert!(reorder_task(&mut board, "b", Direction::Up));
        assert_eq!(open_ids(&board, Quadrant::Q2), vec!["b", "a", "c"]);
        // b is now first: moving up again is a no-op
        assert!(!reorder_task(&mut board, "b", Direction::Up));
        assert_eq!(open_ids(&board, Quadrant::Q2), vec!["b", "a", "c"]);
    }

    #[test]
    fn reorder_down_at_end_is_noop() {
        let mut board = Board::new(vec![task("a", Quadrant::Q2), task("b", Quadrant::Q2)]);
        assert!(!reorder_task(&mut board, "b", Direction::Down));
        assert!(reorder_task(&mut board, "a", Direction::Down));
        assert_eq!(ids(&board), vec!["b", "a"]);
    }

    #[test]
    fn reorder_skips_other_quadrants_and_completed() {
        // Backing: a(Q1) x(Q2) done(Q1, completed) y(Q3) b(Q1)
        let mut board = Board::new(vec![
            task("a", Quadrant::Q1),
            task("x", Quadrant::Q2),
            completed("done", Quadrant::Q1),
            task("y", Quadrant::Q3),
            task("b", Quadrant::Q1),
        ]);
        assert!(reorder_task(&mut board, "b", Direction::Up));
        // a and b exchanged absolute slots 0 and 4; everything else stays put
        assert_eq!(ids(&board), vec!["b", "x", "done", "y", "a"]);
    }

    #[test]
    fn reorder_completed_task_is_noop() {
        let mut board = Board::new(vec![task("a", Quadrant::Q1), completed("b", Quadrant::Q1)]);
        assert!(!reorder_task(&mut board, "b", Direction::Up));
        assert!(!reorder_task(&mut board, "a", Direction::Down));
        assert_eq!(ids(&board), vec!["a", "b"]);
    }

    #[test]
    fn reorder_leaves_other_relative_order() {
        let mut board = Board::new(vec![
            task("a", Quadrant::Q1),
            task("b", Quadrant::Q1),
            task("c", Quadrant::Q1),
            task("d", Quadrant::Q1),
        ]);
        assert!(reorder_task(&mut board, "c", Direction::Down));
        assert_eq!(ids(&board), vec!["a", "b", "d", "c"]);
    }

    #[test]
    fn direction_parses() {
        assert_eq!("up".parse::<Direction>().unwrap(), Direction::Up);
        assert_eq!("DOWN".parse::<Direction>().unwrap(), Direction::Down);
        assert!("left".parse::<Direction>().is_err());
    }

    // --- clear history ---

    #[test]
    fn clear_history_removes_only_completed() {
        let mut board = Board::new(vec![
            completed("a", Quadrant::Q1),
            task("b", Quadrant::Q2),
            completed("c", Quadrant::Backlog),
        ]);
        board.selected = Some("c".into());
        assert_eq!(clear_history(&mut board), 2);
        assert_eq!(ids(&board), vec!["b"]);
        assert!(board.selected.is_none());
    }

    #[test]
    fn add_toggle_clear_empties_store() {
        let mut board = Board::default();
        let id = add_task(&mut board, Quadrant::Q1, 1);
        assert!(!board.tasks[0].completed);
        toggle_task(&mut board, &id, 2);
        assert!(board.tasks[0].completed);
        assert!(board.tasks[0].completed_at.is_some());
        clear_history(&mut board);
        assert!(board.is_empty());
    }

    // --- resolve ---

    #[test]
    fn resolve_exact_and_prefix() {
        let board = Board::new(vec![
            task("abc123", Quadrant::Q1),
            task("abd456", Quadrant::Q1),
            task("1", Quadrant::Q1),
        ]);
        assert_eq!(resolve_id(&board, "1").unwrap(), "1");
        assert_eq!(resolve_id(&board, "abc").unwrap(), "abc123");
        assert!(matches!(
            resolve_id(&board, "ab"),
            Err(TaskError::Ambiguous { .. })
        ));
        assert!(matches!(
            resolve_id(&board, "zz"),
            Err(TaskError::NotFound(_))
        ));
        assert!(matches!(resolve_id(&board, ""), Err(TaskError::NotFound(_))));
    }
}
