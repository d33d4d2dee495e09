use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{AiModalKind, App};

use super::edit::{edit_text, insert_text};

/// Keys for the AI assistant popup
pub(super) fn handle_modal(app: &mut App, key: KeyEvent) {
    let Some(modal) = &mut app.ai_modal else {
        app.close_modal();
        return;
    };

    if key.code == KeyCode::Esc {
        app.close_modal();
        return;
    }

    match modal.kind {
        AiModalKind::Review => {
            if matches!(key.code, KeyCode::Enter | KeyCode::Char('q')) {
                app.close_modal();
            }
        }
        AiModalKind::Import => {
            if modal.loading {
                return;
            }
            let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
            match key.code {
                KeyCode::Char('s') if ctrl => app.submit_import(),
                KeyCode::Enter if ctrl || key.modifiers.contains(KeyModifiers::ALT) => {
                    app.submit_import()
                }
                KeyCode::Enter => insert_text(&mut modal.input, &mut modal.cursor, "\n"),
                _ => {
                    if edit_text(&mut modal.input, &mut modal.cursor, key) {
                        modal.error = None;
                    }
                }
            }
        }
    }
}
