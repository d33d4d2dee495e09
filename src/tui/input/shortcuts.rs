use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::task::Quadrant;
use crate::tui::app::{Mode, View};

/// A board mutation triggered by a global shortcut
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    AddTask(Quadrant),
    DeleteSelected,
    ToggleSelected,
    MoveSelected(Quadrant),
}

/// Map a key to a global shortcut.
///
/// Nothing fires while a text field owns the keyboard (any mode but
/// Navigate). `Ctrl+N` works in every view; the rest need the matrix view
/// and a selected task.
pub fn shortcut_action(
    key: &KeyEvent,
    view: View,
    mode: Mode,
    has_selection: bool,
) -> Option<Action> {
    if mode != Mode::Navigate {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('n') | KeyCode::Char('N') => Some(Action::AddTask(Quadrant::Backlog)),
            _ => None,
        };
    }

    if view != View::Matrix || !has_selection || key.modifiers.contains(KeyModifiers::ALT) {
        return None;
    }

    match key.code {
        KeyCode::Delete | KeyCode::Backspace => Some(Action::DeleteSelected),
        KeyCode::Char(' ') => Some(Action::ToggleSelected),
        KeyCode::Char(c) => Quadrant::from_shortcut(c).map(Action::MoveSelected),
        _ => None,
    }
}
