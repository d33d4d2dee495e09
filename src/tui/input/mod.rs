mod confirm;
pub mod drag;
mod edit;
mod modal;
mod mouse;
mod navigate;
pub mod shortcuts;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{AiModalKind, App, Mode};

use confirm::handle_confirm;
use edit::{handle_edit, insert_text};
use modal::handle_modal;
use navigate::handle_navigate;

pub use mouse::handle_mouse;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    app.status = None;

    // Help overlay swallows the key that closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    let key = normalize_key(key);
    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Edit => handle_edit(app, key),
        Mode::Modal => handle_modal(app, key),
        Mode::Confirm => handle_confirm(app, key),
    }
}

/// Handle a bracketed paste event (terminal sends pasted text as a single string).
/// Single-line fields get newlines flattened to spaces; the import box keeps them.
pub fn handle_paste(app: &mut App, text: &str) {
    if text.is_empty() {
        return;
    }
    match app.mode {
        Mode::Edit => {
            if let Some(edit) = &mut app.edit {
                let clean = text.replace("\r\n", " ").replace(['\n', '\r'], " ");
                let (buf, cursor) = edit.active_mut();
                insert_text(buf, cursor, &clean);
            }
        }
        Mode::Modal => {
            if let Some(modal) = &mut app.ai_modal
                && modal.kind == AiModalKind::Import
                && !modal.loading
            {
                let clean = text.replace("\r\n", "\n").replace('\r', "\n");
                insert_text(&mut modal.input, &mut modal.cursor, &clean);
            }
        }
        _ => {}
    }
}

/// Shifted symbol for a base key on a US layout
fn shift_symbol(c: char) -> Option<char> {
    match c {
        '`' => Some('~'),
        '1' => Some('!'),
        '/' => Some('?'),
        '[' => Some('{'),
        ']' => Some('}'),
        _ => None,
    }
}

/// Normalize key events from terminals using the kitty keyboard protocol.
///
/// Kitty sends `Char(lowercase) + SHIFT` instead of `Char(UPPERCASE) + SHIFT`,
/// and `Char(base_symbol) + SHIFT` instead of `Char(shifted_symbol)`.
/// Traditional terminals already send the shifted form, so this is a no-op there.
fn normalize_key(mut key: KeyEvent) -> KeyEvent {
    if let KeyCode::Char(c) = key.code
        && key.modifiers.contains(KeyModifiers::SHIFT)
    {
        if c.is_ascii_lowercase() {
            key.code = KeyCode::Char(c.to_ascii_uppercase());
        } else if let Some(shifted) = shift_symbol(c) {
            key.code = KeyCode::Char(shifted);
            key.modifiers.remove(KeyModifiers::SHIFT);
        }
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::{Quadrant, Task};
    use crate::tui::app::View;
    use crate::tui::render::test_helpers::app_with_tasks;

    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn normalize_kitty_shift_letters() {
        let key = normalize_key(KeyEvent::new(KeyCode::Char('k'), KeyModifiers::SHIFT));
        assert_eq!(key.code, KeyCode::Char('K'));
        let key = normalize_key(KeyEvent::new(KeyCode::Char('/'), KeyModifiers::SHIFT));
        assert_eq!(key.code, KeyCode::Char('?'));
        assert!(!key.modifiers.contains(KeyModifiers::SHIFT));
    }

    #[test]
    fn help_overlay_swallows_one_key() {
        let (_dir, mut app) = app_with_tasks(vec![]);
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.show_help);
        assert!(!app.should_quit);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn paste_into_edit_field_flattens_newlines() {
        let (_dir, mut app) = app_with_tasks(vec![Task::new("a".into(), "".into(), Quadrant::Q1, 0)]);
        app.start_edit("a");
        handle_paste(&mut app, "one\ntwo");
        assert_eq!(app.edit.as_ref().unwrap().title, "one two");
    }

    #[test]
    fn paste_into_import_keeps_lines() {
        let (_dir, mut app) = app_with_tasks(vec![]);
        app.open_import();
        handle_paste(&mut app, "- milk\r\n- eggs");
        let modal = app.ai_modal.as_ref().unwrap();
        assert_eq!(modal.input, "- milk\n- eggs");
        assert_eq!(modal.cursor, modal.input.len());
    }

    #[test]
    fn paste_ignored_while_navigating() {
        let (_dir, mut app) = app_with_tasks(vec![]);
        handle_paste(&mut app, "x");
        assert_eq!(app.view, View::Matrix);
        assert!(app.board.is_empty());
    }
}
