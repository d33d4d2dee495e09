use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::{App, View};

use super::helpers::centered_rect;

/// Render the help overlay (toggled with ?)
pub fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    // Center the overlay, leaving some margin
    let overlay_area = centered_rect(60, 80, area);

    // Clear the area behind the overlay
    frame.render_widget(Clear, overlay_area);

    let bg = app.theme.background;
    let text_color = app.theme.text;
    let bright = app.theme.text_bright;
    let highlight = app.theme.highlight;
    let dim = app.theme.dim;

    let key_style = Style::default()
        .fg(highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(text_color).bg(bg);
    let header_style = Style::default()
        .fg(bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(" Key Bindings", header_style)));
    lines.push(Line::from(""));

    // Context-sensitive help
    let bindings: &[(&str, &str)] = match app.view {
        View::Matrix => &[
            (" \u{2191}\u{2193}\u{2190}\u{2192}/hjkl", "Move between tasks and panes"),
            (" a", "Add a task to the current pane"),
            (" Enter/e", "Edit the selected task"),
            (" Space", "Mark the selected task done"),
            (" Del/Bksp", "Delete the selected task"),
            (" 1-4", "Move to Q1..Q4"),
            (" `", "Move to the backlog"),
            (" K/J", "Reorder within the backlog"),
            (" f", "Focus mode (Q1 only)"),
            (" mouse drag", "Drop a card on another pane"),
        ],
        View::Calendar => &[
            (" \u{2190}\u{2192}\u{2191}\u{2193}", "Move the day cursor"),
            (" [ ]", "Previous / next month"),
            (" t", "Jump to today"),
            (" j/k", "Move within the day's tasks"),
            (" Space", "Toggle the task"),
            (" Enter/e", "Edit the task"),
        ],
        View::History => &[
            (" \u{2191}\u{2193}/jk", "Move cursor"),
            (" g/G", "Jump to top/bottom"),
            (" Space", "Reopen the task"),
            (" Del/d", "Delete the task"),
            (" X", "Clear all history"),
        ],
    };
    lines.push(Line::from(Span::styled(
        format!(" {}", app.view.label()),
        header_style,
    )));
    for (key, desc) in bindings {
        add_binding(&mut lines, key, desc, key_style, desc_style);
    }
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled(" Assistant", header_style)));
    add_binding(&mut lines, " i", "Import tasks with Gemini", key_style, desc_style);
    add_binding(&mut lines, " r", "Weekly review", key_style, desc_style);
    add_binding(&mut lines, " Ctrl+S", "Send the import text", key_style, desc_style);
    lines.push(Line::from(""));

    // Global keys
    lines.push(Line::from(Span::styled(" Global", header_style)));
    add_binding(&mut lines, " Ctrl+N", "New task in the backlog", key_style, desc_style);
    add_binding(&mut lines, " Tab/S-Tab", "Next / previous view", key_style, desc_style);
    add_binding(&mut lines, " ?", "Toggle this help", key_style, desc_style);
    add_binding(&mut lines, " q", "Quit", key_style, desc_style);
    add_binding(&mut lines, " Ctrl+Q", "Quit (immediate)", key_style, desc_style);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(dim).bg(bg))
        .style(Style::default().bg(bg));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));

    frame.render_widget(paragraph, overlay_area);
}

fn add_binding<'a>(
    lines: &mut Vec<Line<'a>>,
    key: &'a str,
    desc: &'a str,
    key_style: Style,
    desc_style: Style,
) {
    let key_width = 16;
    let padded_key = format!("{:<width$}", key, width = key_width);
    lines.push(Line::from(vec![
        Span::styled(padded_key, key_style),
        Span::styled(desc, desc_style),
    ]));
}
