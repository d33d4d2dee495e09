use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{AiModalKind, App, Mode, View};
use crate::util::unicode;

use super::helpers::push_right_hint;

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let mut spans: Vec<Span> = Vec::new();

    if let Some(confirm) = &app.confirm {
        spans.push(Span::styled(
            format!("{} ", confirm.message),
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled("(y/n)", Style::default().fg(app.theme.highlight).bg(bg)));
    } else if let Some(dragged) = app.drag.dragged() {
        let title = app
            .board
            .find(dragged)
            .map(|t| t.title.as_str())
            .unwrap_or_default();
        let target = match app.drag.over() {
            Some(q) => format!(" \u{2192} {} {}", q, q.label()),
            None => String::new(),
        };
        spans.push(Span::styled(
            format!("Moving \"{}\"{}", unicode::truncate_to_width(title, 40), target),
            Style::default().fg(app.theme.highlight).bg(bg),
        ));
    } else if let Some(status) = &app.status {
        let fg = if status.is_error {
            app.theme.red
        } else {
            app.theme.text
        };
        spans.push(Span::styled(status.text.clone(), Style::default().fg(fg).bg(bg)));
    }

    if app.ctx.config.ui.show_key_hints {
        push_right_hint(&mut spans, key_hints(app), width, app.theme.dim, bg);
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

/// Short key reminder for the current mode and view
fn key_hints(app: &App) -> &'static str {
    match app.mode {
        Mode::Edit => "Enter save  Tab next field  Esc cancel",
        Mode::Confirm => "y confirm  any key cancel",
        Mode::Modal => match app.ai_modal.as_ref().map(|m| m.kind) {
            Some(AiModalKind::Import) => "Ctrl+S import  Esc close",
            _ => "Enter close",
        },
        Mode::Navigate if app.show_help => "any key close",
        Mode::Navigate => match app.view {
            View::Matrix => "a add  e edit  Space done  1-4 ` move  f focus  i import  ? help",
            View::Calendar => "\u{2190}\u{2192}\u{2191}\u{2193} day  [ ] month  t today  Space toggle  ? help",
            View::History => "Space reopen  d delete  X clear  ? help",
        },
    }
}
