use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::ops::views;
use crate::tui::app::{App, HitTarget, View};

use super::HitMap;
use super::helpers::{push_right_hint, spans_width};

/// Render the tab bar: brand, view tabs, board counts, with separator line below
pub fn render_tab_bar(frame: &mut Frame, app: &App, area: Rect, hits: &mut HitMap) {
    // Split into tab row and separator row
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // tabs
            Constraint::Length(1), // separator
        ])
        .split(area);

    let sep_cols = render_tabs(frame, app, chunks[0], hits);
    render_separator(frame, app, chunks[1], &sep_cols);
}

/// Render tabs and return the column positions of each separator character.
fn render_tabs(frame: &mut Frame, app: &App, area: Rect, hits: &mut HitMap) -> Vec<usize> {
    let bg = app.theme.background;
    let bg_style = Style::default().bg(bg);
    let mut spans: Vec<Span> = Vec::new();
    let mut sep_cols: Vec<usize> = Vec::new();
    let sep = Span::styled("\u{2502}", Style::default().fg(app.theme.dim).bg(bg));

    // Leading brand
    spans.push(Span::styled(" ", bg_style));
    spans.push(Span::styled(
        "\u{25C6}",
        Style::default().fg(app.theme.highlight).bg(bg),
    ));
    spans.push(Span::styled(
        " planhub ",
        Style::default()
            .fg(app.theme.text_bright)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    ));
    sep_cols.push(spans_width(&spans));
    spans.push(sep.clone());

    for view in View::ALL {
        let label = format!(" {} ", view.label());
        let x = spans_width(&spans) as u16;
        let w = label.chars().count() as u16;
        if x + w <= area.width {
            hits.push((Rect::new(area.x + x, area.y, w, 1), HitTarget::Tab(view)));
        }
        spans.push(Span::styled(label, tab_style(app, app.view == view)));
        sep_cols.push(spans_width(&spans));
        spans.push(sep.clone());
    }

    // Right side: counts, plus a focus badge
    let stats = views::stats(&app.board.tasks);
    let mut right = format!("{} open \u{00B7} {} done ", stats.open(), stats.done());
    if app.focus_mode && app.view == View::Matrix {
        right = format!("FOCUS  {}", right);
    }
    push_right_hint(
        &mut spans,
        &right,
        area.width as usize,
        app.theme.dim,
        bg,
    );

    let line = Line::from(spans);
    let tabs = Paragraph::new(line).style(bg_style);
    frame.render_widget(tabs, area);
    sep_cols
}

fn render_separator(frame: &mut Frame, app: &App, area: Rect, sep_cols: &[usize]) {
    let width = area.width as usize;
    let mut line: String = String::with_capacity(width * 3);
    for col in 0..width {
        if sep_cols.contains(&col) {
            line.push('\u{2534}');
        } else {
            line.push('\u{2500}');
        }
    }
    let sep_widget =
        Paragraph::new(line).style(Style::default().fg(app.theme.dim).bg(app.theme.background));
    frame.render_widget(sep_widget, area);
}

/// Style for a tab: highlighted if current, normal otherwise
fn tab_style(app: &App, is_current: bool) -> Style {
    if is_current {
        Style::default()
            .fg(app.theme.text_bright)
            .bg(app.theme.selection_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.text).bg(app.theme.background)
    }
}
