use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::App;
use crate::util::unicode::{next_grapheme_boundary, prev_grapheme_boundary};

/// Insert `text` at the cursor and move the cursor past it
pub(super) fn insert_text(buf: &mut String, cursor: &mut usize, text: &str) {
    let at = (*cursor).min(buf.len());
    buf.insert_str(at, text);
    *cursor = at + text.len();
}

/// Apply a cursor-movement or editing key to a text buffer.
/// Returns false for keys it does not handle.
pub(super) fn edit_text(buf: &mut String, cursor: &mut usize, key: KeyEvent) -> bool {
    *cursor = (*cursor).min(buf.len());
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Left => {
            if let Some(p) = prev_grapheme_boundary(buf, *cursor) {
                *cursor = p;
            }
        }
        KeyCode::Right => {
            if let Some(n) = next_grapheme_boundary(buf, *cursor) {
                *cursor = n;
            }
        }
        KeyCode::Home => *cursor = line_start(buf, *cursor),
        KeyCode::End => *cursor = line_end(buf, *cursor),
        KeyCode::Char('a') if ctrl => *cursor = line_start(buf, *cursor),
        KeyCode::Char('e') if ctrl => *cursor = line_end(buf, *cursor),
        KeyCode::Char('u') if ctrl => {
            let start = line_start(buf, *cursor);
            buf.replace_range(start..*cursor, "");
            *cursor = start;
        }
        KeyCode::Backspace => {
            if let Some(p) = prev_grapheme_boundary(buf, *cursor) {
                buf.replace_range(p..*cursor, "");
                *cursor = p;
            }
        }
        KeyCode::Delete => {
            if let Some(n) = next_grapheme_boundary(buf, *cursor) {
                buf.replace_range(*cursor..n, "");
            }
        }
        KeyCode::Char(c) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
            let mut tmp = [0u8; 4];
            insert_text(buf, cursor, c.encode_utf8(&mut tmp));
        }
        _ => return false,
    }
    true
}

fn line_start(buf: &str, cursor: usize) -> usize {
    buf[..cursor].rfind('\n').map_or(0, |i| i + 1)
}

fn line_end(buf: &str, cursor: usize) -> usize {
    buf[cursor..].find('\n').map_or(buf.len(), |i| cursor + i)
}

/// Keys for the edit popup
pub(super) fn handle_edit(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.cancel_edit(),
        KeyCode::Enter => app.commit_edit(),
        KeyCode::Tab | KeyCode::Down => {
            if let Some(edit) = &mut app.edit {
                edit.focus(edit.field.next());
            }
        }
        KeyCode::BackTab | KeyCode::Up => {
            if let Some(edit) = &mut app.edit {
                edit.focus(edit.field.prev());
            }
        }
        _ => {
            if let Some(edit) = &mut app.edit {
                let (buf, cursor) = edit.active_mut();
                if edit_text(buf, cursor, key) {
                    edit.error = None;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::{Quadrant, Task};
    use crate::tui::app::{EditField, Mode};
    use crate::tui::render::test_helpers::app_with_tasks;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(buf: &mut String, cursor: &mut usize, s: &str) {
        for c in s.chars() {
            edit_text(buf, cursor, key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn typing_and_cursor_movement() {
        let mut buf = String::new();
        let mut cursor = 0;
        type_str(&mut buf, &mut cursor, "helo");
        edit_text(&mut buf, &mut cursor, key(KeyCode::Left));
        type_str(&mut buf, &mut cursor, "l");
        assert_eq!(buf, "hello");
        edit_text(&mut buf, &mut cursor, key(KeyCode::Home));
        edit_text(&mut buf, &mut cursor, key(KeyCode::Delete));
        assert_eq!(buf, "ello");
        edit_text(&mut buf, &mut cursor, key(KeyCode::End));
        edit_text(&mut buf, &mut cursor, key(KeyCode::Backspace));
        assert_eq!(buf, "ell");
        assert_eq!(cursor, 3);
    }

    #[test]
    fn backspace_removes_whole_grapheme() {
        let mut buf = "caf\u{65}\u{301}".to_string();
        let mut cursor = buf.len();
        edit_text(&mut buf, &mut cursor, key(KeyCode::Backspace));
        assert_eq!(buf, "caf");
    }

    #[test]
    fn ctrl_u_clears_to_line_start() {
        let mut buf = "first\nsecond".to_string();
        let mut cursor = buf.len();
        edit_text(
            &mut buf,
            &mut cursor,
            KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL),
        );
        assert_eq!(buf, "first\n");
        assert_eq!(cursor, 6);
    }

    #[test]
    fn tab_cycles_fields_and_enter_saves() {
        let (_dir, mut app) = app_with_tasks(vec![Task::new("a".into(), "Old".into(), Quadrant::Q1, 0)]);
        app.start_edit("a");
        handle_edit(&mut app, key(KeyCode::Tab));
        assert_eq!(app.edit.as_ref().unwrap().field, EditField::Description);
        handle_edit(&mut app, key(KeyCode::Tab));
        handle_edit(&mut app, key(KeyCode::Tab));
        assert_eq!(app.edit.as_ref().unwrap().field, EditField::Tags);
        for c in "Work".chars() {
            handle_edit(&mut app, key(KeyCode::Char(c)));
        }
        handle_edit(&mut app, key(KeyCode::Enter));
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.board.find("a").unwrap().tags, vec!["Work".to_string()]);
    }

    #[test]
    fn esc_discards_changes() {
        let (_dir, mut app) = app_with_tasks(vec![Task::new("a".into(), "Old".into(), Quadrant::Q1, 0)]);
        app.start_edit("a");
        handle_edit(&mut app, key(KeyCode::Backspace));
        handle_edit(&mut app, key(KeyCode::Esc));
        assert_eq!(app.mode, Mode::Navigate);
        assert!(app.edit.is_none());
        assert_eq!(app.board.find("a").unwrap().title, "Old");
    }
}
