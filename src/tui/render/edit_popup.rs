use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};

use crate::ops::task_ops::DEFAULT_TITLE;
use crate::tui::app::{App, EditField, EditState};
use crate::util::unicode;

use super::helpers::{centered_fixed, input_line};

const LABEL_WIDTH: usize = 9;

fn placeholder(field: EditField) -> &'static str {
    match field {
        EditField::Title => DEFAULT_TITLE,
        EditField::Description => "Add description...",
        EditField::Due => "YYYY-MM-DD",
        EditField::Tags => "comma separated",
    }
}

/// Render the task edit popup over the content area
pub fn render_edit_popup(frame: &mut Frame, app: &App, area: Rect) {
    let Some(edit) = &app.edit else {
        return;
    };
    let popup = centered_fixed(64, 10, area);
    frame.render_widget(Clear, popup);

    let bg = app.theme.background;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(app.theme.selection_border))
        .title(Span::styled(
            " Edit Task ",
            Style::default()
                .fg(app.theme.text_bright)
                .add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(bg));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let width = inner.width as usize;
    let mut lines: Vec<Line> = vec![Line::from("")];
    for field in EditField::ALL {
        lines.push(field_line(app, edit, field, width));
    }
    lines.push(Line::from(""));
    match &edit.error {
        Some(err) => lines.push(Line::from(Span::styled(
            format!(" {}", err),
            Style::default().fg(app.theme.red),
        ))),
        None => lines.push(Line::from("")),
    }
    lines.push(Line::from(Span::styled(
        " Enter save  Tab next field  Esc cancel",
        Style::default().fg(app.theme.dim),
    )));

    frame.render_widget(Paragraph::new(lines), inner);
}

fn field_line(app: &App, edit: &EditState, field: EditField, width: usize) -> Line<'static> {
    let active = edit.field == field;
    let label_style = if active {
        Style::default()
            .fg(app.theme.highlight)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.dim)
    };
    let mut spans = vec![Span::styled(
        format!(" {:<w$}  ", field.label(), w = LABEL_WIDTH - 3),
        label_style,
    )];

    let room = width.saturating_sub(LABEL_WIDTH);
    let value = edit.buffer(field);
    let text_style = Style::default().fg(app.theme.text_bright);
    if active {
        spans.extend(input_line(
            value,
            edit.cursor,
            room,
            text_style,
            Style::default().fg(app.theme.highlight),
        ));
    } else if value.is_empty() {
        spans.push(Span::styled(
            placeholder(field),
            Style::default()
                .fg(app.theme.dim)
                .add_modifier(Modifier::ITALIC),
        ));
    } else {
        spans.push(Span::styled(unicode::truncate_to_width(value, room), text_style));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::{Quadrant, Task};
    use crate::tui::render::test_helpers::{TERM_H, TERM_W, app_with_tasks, render_to_string};

    fn render(app: &App) -> String {
        render_to_string(TERM_W, TERM_H, |frame, area| render_edit_popup(frame, app, area))
    }

    #[test]
    fn shows_fields_with_cursor_on_title() {
        let (_dir, mut app) = app_with_tasks(vec![
            Task::new("a".into(), "Book flights".into(), Quadrant::Q2, 0).with_tags(&["Travel", "Home"]),
        ]);
        app.start_edit("a");
        let out = render(&app);
        assert!(out.contains("Edit Task"));
        assert!(out.contains("Title   Book flights\u{258C}"));
        assert!(out.contains("Notes   Add description..."));
        assert!(out.contains("Due     YYYY-MM-DD"));
        assert!(out.contains("Tags    Travel, Home"));
    }

    #[test]
    fn new_task_shows_default_placeholder_once_unfocused() {
        let (_dir, mut app) = app_with_tasks(vec![]);
        app.add_and_edit(Quadrant::Q1);
        if let Some(edit) = &mut app.edit {
            edit.focus(EditField::Due);
        }
        let out = render(&app);
        assert!(out.contains(&format!("Title   {}", DEFAULT_TITLE)));
        assert!(out.contains("Due     \u{258C}"));
    }

    #[test]
    fn error_line_is_shown() {
        let (_dir, mut app) = app_with_tasks(vec![Task::new("a".into(), "A".into(), Quadrant::Q1, 0)]);
        app.start_edit("a");
        if let Some(edit) = &mut app.edit {
            edit.due = "soon".into();
        }
        app.commit_edit();
        let out = render(&app);
        let err = app.edit.as_ref().unwrap().error.clone().unwrap();
        assert!(out.contains(&err));
    }
}
