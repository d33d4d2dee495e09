use crossterm::event::{KeyCode, KeyEvent};

use crate::ops::task_ops;
use crate::tui::app::{App, ConfirmAction, ConfirmState, Mode};

/// Ask before clearing the history
pub(super) fn begin_clear_history(app: &mut App) {
    let count = app.board.tasks.iter().filter(|t| t.completed).count();
    if count == 0 {
        app.set_status("History is already empty");
        return;
    }
    app.confirm = Some(ConfirmState {
        message: format!("Delete {} completed task(s) permanently?", count),
        action: ConfirmAction::ClearHistory,
    });
    app.mode = Mode::Confirm;
}

/// `y` runs the pending action; any other key cancels it
pub(super) fn handle_confirm(app: &mut App, key: KeyEvent) {
    let Some(confirm) = app.confirm.take() else {
        app.mode = Mode::Navigate;
        return;
    };
    app.mode = Mode::Navigate;

    if !matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')) {
        app.set_status("Cancelled");
        return;
    }

    match confirm.action {
        ConfirmAction::ClearHistory => {
            let removed = task_ops::clear_history(&mut app.board);
            app.persist();
            app.history_cursor = 0;
            app.set_status(format!("Removed {} completed task(s)", removed));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::{Quadrant, Task};
    use crate::tui::render::test_helpers::app_with_tasks;
    use crossterm::event::KeyModifiers;

    fn tasks() -> Vec<Task> {
        let mut done = Task::new("d".into(), "Done".into(), Quadrant::Q1, 0);
        done.completed = true;
        done.completed_at = Some(10);
        vec![Task::new("o".into(), "Open".into(), Quadrant::Q1, 0), done]
    }

    #[test]
    fn yes_clears_history() {
        let (_dir, mut app) = app_with_tasks(tasks());
        begin_clear_history(&mut app);
        assert_eq!(app.mode, Mode::Confirm);
        handle_confirm(&mut app, KeyEvent::new(KeyCode::Char('y'), KeyModifiers::NONE));
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.board.len(), 1);
        assert_eq!(app.board.tasks[0].id, "o");
    }

    #[test]
    fn anything_else_cancels() {
        let (_dir, mut app) = app_with_tasks(tasks());
        begin_clear_history(&mut app);
        handle_confirm(&mut app, KeyEvent::new(KeyCode::Char('n'), KeyModifiers::NONE));
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.board.len(), 2);
        assert!(app.confirm.is_none());
    }

    #[test]
    fn nothing_to_clear_skips_prompt() {
        let (_dir, mut app) = app_with_tasks(vec![Task::new("o".into(), "Open".into(), Quadrant::Q1, 0)]);
        begin_clear_history(&mut app);
        assert_eq!(app.mode, Mode::Navigate);
        assert!(app.confirm.is_none());
    }
}
