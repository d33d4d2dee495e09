use chrono::{Local, TimeDelta};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::task::Quadrant;
use crate::ops::task_ops::{self, Direction};
use crate::tui::app::{App, View};
use crate::util::dates::now_millis;

use super::confirm::begin_clear_history;
use super::shortcuts::{Action, shortcut_action};

/// Keys while no text field has focus
pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    let has_selection = app.board.selected_task().is_some();
    if let Some(action) = shortcut_action(&key, app.view, app.mode, has_selection) {
        apply_action(app, action);
        return;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('q') if !ctrl => app.should_quit = true,
        KeyCode::Char('c') | KeyCode::Char('q') if ctrl => app.should_quit = true,
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Tab => app.switch_view(app.view.next()),
        KeyCode::BackTab => app.switch_view(app.view.prev()),
        KeyCode::Char('i') => app.open_import(),
        KeyCode::Char('r') => app.open_review(),
        _ => match app.view {
            View::Matrix => matrix_key(app, key),
            View::Calendar => calendar_key(app, key),
            View::History => history_key(app, key),
        },
    }
}

/// Apply a global shortcut. Selection actions target the matrix selection.
pub(super) fn apply_action(app: &mut App, action: Action) {
    if let Action::AddTask(quadrant) = action {
        app.add_and_edit(quadrant);
        return;
    }
    let Some(id) = app.board.selected.clone() else {
        return;
    };
    let fallback = app.pane_index();
    match action {
        Action::DeleteSelected => {
            if task_ops::delete_task(&mut app.board, &id) {
                app.persist();
            }
        }
        Action::ToggleSelected => {
            if task_ops::toggle_task(&mut app.board, &id, now_millis()) {
                app.persist();
                app.set_status("Completed");
            }
        }
        Action::MoveSelected(quadrant) => {
            if task_ops::move_task(&mut app.board, &id, quadrant) {
                app.persist();
                app.set_status(format!("Moved to {} ({})", quadrant, quadrant.label()));
            }
        }
        Action::AddTask(_) => {}
    }
    app.reconcile_selection(fallback);
}

// ---------------------------------------------------------------------------
// Matrix
// ---------------------------------------------------------------------------

/// Pane reached by moving left/right/up/down from `from`
fn neighbor(from: Quadrant, code: KeyCode) -> Option<Quadrant> {
    use Quadrant::*;
    match (from, code) {
        (Backlog, KeyCode::Right) => Some(Q1),
        (Q1, KeyCode::Left) | (Q3, KeyCode::Left) => Some(Backlog),
        (Q1, KeyCode::Right) => Some(Q2),
        (Q2, KeyCode::Left) => Some(Q1),
        (Q3, KeyCode::Right) => Some(Q4),
        (Q4, KeyCode::Left) => Some(Q3),
        (Q1, KeyCode::Down) => Some(Q3),
        (Q2, KeyCode::Down) => Some(Q4),
        (Q3, KeyCode::Up) => Some(Q1),
        (Q4, KeyCode::Up) => Some(Q2),
        _ => None,
    }
}

/// Fold vim keys onto arrows
fn direction_key(key: &KeyEvent) -> KeyCode {
    match key.code {
        KeyCode::Char('h') => KeyCode::Left,
        KeyCode::Char('j') => KeyCode::Down,
        KeyCode::Char('k') => KeyCode::Up,
        KeyCode::Char('l') => KeyCode::Right,
        other => other,
    }
}

fn matrix_key(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match (key.code, ctrl) {
        (KeyCode::Char('K'), _) | (KeyCode::Up, true) => reorder_selected(app, Direction::Up),
        (KeyCode::Char('J'), _) | (KeyCode::Down, true) => reorder_selected(app, Direction::Down),
        (KeyCode::Char('a'), false) => app.add_and_edit(app.pane),
        (KeyCode::Enter, _) | (KeyCode::Char('e'), false) => {
            if let Some(id) = app.board.selected.clone() {
                app.start_edit(&id);
            }
        }
        (KeyCode::Char('f'), false) => app.toggle_focus_mode(),
        (KeyCode::Esc, _) => app.board.selected = None,
        (KeyCode::Char('g'), false) | (KeyCode::Home, _) => app.select_in_pane(app.pane, 0),
        (KeyCode::Char('G'), _) | (KeyCode::End, _) => app.select_in_pane(app.pane, usize::MAX),
        _ if !ctrl => move_cursor(app, direction_key(&key)),
        _ => {}
    }
}

fn move_cursor(app: &mut App, code: KeyCode) {
    let len = app.pane_tasks(app.pane).len();
    let idx = app.pane_index();
    match (code, idx) {
        (KeyCode::Down, None) if len > 0 => app.select_in_pane(app.pane, 0),
        (KeyCode::Down, Some(i)) if i + 1 < len => app.select_in_pane(app.pane, i + 1),
        (KeyCode::Up, Some(i)) if i > 0 => app.select_in_pane(app.pane, i - 1),
        (KeyCode::Up, None) if len > 0 => app.select_in_pane(app.pane, len - 1),
        (KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right, _) => {
            if app.focus_mode {
                return;
            }
            if let Some(target) = neighbor(app.pane, code) {
                // Entering from below lands on the last task
                let index = if code == KeyCode::Up { usize::MAX } else { 0 };
                app.select_in_pane(target, index);
            }
        }
        _ => {}
    }
}

/// Manual re-ranking lives in the backlog panel only
fn reorder_selected(app: &mut App, direction: Direction) {
    let Some(task) = app.board.selected_task() else {
        return;
    };
    if task.quadrant != Quadrant::Backlog {
        app.set_status("Reorder tasks in the backlog panel");
        return;
    }
    let id = task.id.clone();
    if task_ops::reorder_task(&mut app.board, &id, direction) {
        app.persist();
    }
}

// ---------------------------------------------------------------------------
// Calendar
// ---------------------------------------------------------------------------

fn calendar_key(app: &mut App, key: KeyEvent) {
    let shift_days = |app: &mut App, days: i64| {
        if let Some(date) = app
            .calendar_date()
            .and_then(|d| d.checked_add_signed(TimeDelta::days(days)))
        {
            app.set_calendar_date(date);
        }
    };

    match key.code {
        KeyCode::Left | KeyCode::Char('h') => shift_days(app, -1),
        KeyCode::Right | KeyCode::Char('l') => shift_days(app, 1),
        KeyCode::Up => shift_days(app, -7),
        KeyCode::Down => shift_days(app, 7),
        KeyCode::Char('[') => app.set_calendar_month(app.calendar_month.prev()),
        KeyCode::Char(']') => app.set_calendar_month(app.calendar_month.next()),
        KeyCode::Char('t') => app.set_calendar_date(Local::now().date_naive()),
        KeyCode::Char('j') => {
            let len = app.calendar_day_tasks().len();
            if app.calendar_task + 1 < len {
                app.calendar_task += 1;
            }
        }
        KeyCode::Char('k') => app.calendar_task = app.calendar_task.saturating_sub(1),
        KeyCode::Char(' ') => {
            if let Some(id) = app.calendar_day_tasks().get(app.calendar_task).cloned()
                && task_ops::toggle_task(&mut app.board, &id, now_millis())
            {
                app.persist();
            }
        }
        KeyCode::Enter | KeyCode::Char('e') => {
            if let Some(id) = app.calendar_day_tasks().get(app.calendar_task).cloned() {
                app.start_edit(&id);
            }
        }
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

fn history_key(app: &mut App, key: KeyEvent) {
    let ids = app.history_ids();
    let current = ids.get(app.history_cursor).cloned();
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => {
            if app.history_cursor + 1 < ids.len() {
                app.history_cursor += 1;
            }
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.history_cursor = app.history_cursor.saturating_sub(1);
        }
        KeyCode::Char('g') | KeyCode::Home => app.history_cursor = 0,
        KeyCode::Char('G') | KeyCode::End => app.history_cursor = ids.len().saturating_sub(1),
        KeyCode::Char(' ') => {
            if let Some(id) = current
                && task_ops::toggle_task(&mut app.board, &id, now_millis())
            {
                app.persist();
                app.set_status("Reopened");
                app.clamp_history_cursor();
            }
        }
        KeyCode::Delete | KeyCode::Backspace | KeyCode::Char('d') => {
            if let Some(id) = current
                && task_ops::delete_task(&mut app.board, &id)
            {
                app.persist();
                app.clamp_history_cursor();
            }
        }
        KeyCode::Char('X') => begin_clear_history(app),
        _ => {}
    }
}
