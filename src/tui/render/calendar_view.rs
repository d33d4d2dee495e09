use chrono::Local;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::model::task::Task;
use crate::ops::views::{self, DayCell};
use crate::tui::app::{App, HitTarget};
use crate::util::dates::format_long_day;
use crate::util::unicode;

use super::HitMap;
use super::helpers::{push_right_hint, scroll_offset};

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const SIDE_PANEL_WIDTH: u16 = 32;

/// Render the month grid with per-day progress, and the cursor day's tasks
/// in a side panel.
pub fn render_calendar_view(frame: &mut Frame, app: &App, area: Rect, hits: &mut HitMap) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(SIDE_PANEL_WIDTH)])
        .split(area);

    let cal = views::calendar_month(&app.board.tasks, app.calendar_month);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // month title
            Constraint::Length(1), // weekday names
            Constraint::Min(0),    // weeks
        ])
        .split(columns[0]);

    render_header(frame, app, rows[0]);
    render_weekdays(frame, app, rows[1]);

    let weeks = cal.weeks() as u32;
    let week_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints((0..weeks).map(|_| Constraint::Ratio(1, weeks)))
        .split(rows[2]);

    let today = Local::now().date_naive();
    for (i, cell) in cal.days.iter().enumerate() {
        let slot = cal.leading_blanks + i;
        let Some(row) = week_rows.get(slot / 7) else {
            continue;
        };
        let rect = day_columns(*row)[slot % 7];
        let is_cursor = cell.day() == app.calendar_day;
        render_day(frame, app, cell, rect, is_cursor, cell.date == today);
        hits.push((rect, HitTarget::Day(cell.day())));
    }

    let selected = cal.day(app.calendar_day).map(|c| c.tasks.clone()).unwrap_or_default();
    render_side_panel(frame, app, &selected, columns[1]);
}

fn day_columns(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 7); 7])
        .split(area)
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let mut spans = vec![Span::styled(
        format!(" {}", app.calendar_month.title()),
        Style::default()
            .fg(app.theme.text_bright)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )];
    push_right_hint(
        &mut spans,
        "[ prev  ] next  t today ",
        area.width as usize,
        app.theme.dim,
        bg,
    );
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_weekdays(frame: &mut Frame, app: &App, area: Rect) {
    let style = Style::default()
        .fg(app.theme.dim)
        .add_modifier(Modifier::BOLD);
    for (name, rect) in WEEKDAYS.iter().zip(day_columns(area).iter()) {
        frame.render_widget(Paragraph::new(Span::styled(format!(" {}", name), style)), *rect);
    }
}

fn render_day(frame: &mut Frame, app: &App, cell: &DayCell, area: Rect, is_cursor: bool, is_today: bool) {
    let bg = if is_cursor {
        app.theme.selection_bg
    } else {
        app.theme.panel
    };
    // One column gap between cells
    let area = Rect {
        width: area.width.saturating_sub(1),
        ..area
    };
    let width = area.width as usize;
    if width < 4 || area.height == 0 {
        return;
    }

    let day_style = if is_today {
        Style::default()
            .fg(app.theme.text_bright)
            .bg(app.theme.highlight)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.text).bg(bg)
    };
    let mut first = vec![Span::styled(format!("{:>2}", cell.day()), day_style)];
    if cell.total() > 0 {
        let all_done = cell.completed() == cell.total();
        let count_color = if all_done { app.theme.green } else { app.theme.dim };
        push_right_hint(
            &mut first,
            &format!("{}/{}", cell.completed(), cell.total()),
            width,
            count_color,
            bg,
        );
    }

    let mut lines = vec![Line::from(first)];
    if let Some(fraction) = cell.completion_fraction() {
        lines.push(progress_bar(app, fraction, width, bg));
    }
    for task in &cell.tasks {
        lines.push(task_line(app, task, width, bg));
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn progress_bar(app: &App, fraction: f64, width: usize, bg: ratatui::style::Color) -> Line<'static> {
    let filled = ((fraction * width as f64).round() as usize).min(width);
    let color = if filled == width {
        app.theme.green
    } else {
        app.theme.highlight
    };
    Line::from(vec![
        Span::styled("\u{2588}".repeat(filled), Style::default().fg(color).bg(bg)),
        Span::styled(
            "\u{2591}".repeat(width - filled),
            Style::default().fg(app.theme.dim).bg(bg),
        ),
    ])
}

fn task_line(app: &App, task: &Task, width: usize, bg: ratatui::style::Color) -> Line<'static> {
    let (marker, style) = if task.completed {
        (
            "\u{2713} ",
            Style::default()
                .fg(app.theme.dim)
                .bg(bg)
                .add_modifier(Modifier::CROSSED_OUT),
        )
    } else {
        (
            "\u{25CB} ",
            Style::default()
                .fg(app.theme.quadrant_color(task.quadrant))
                .bg(bg),
        )
    };
    Line::from(vec![
        Span::styled(marker, style.remove_modifier(Modifier::CROSSED_OUT)),
        Span::styled(
            unicode::truncate_to_width(&task.title, width.saturating_sub(2)),
            style,
        ),
    ])
}

fn render_side_panel(frame: &mut Frame, app: &App, tasks: &[&Task], area: Rect) {
    let title = app
        .calendar_date()
        .map(format_long_day)
        .unwrap_or_default();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(app.theme.dim))
        .title(Span::styled(
            format!(" {} ", title),
            Style::default()
                .fg(app.theme.text_bright)
                .add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(app.theme.background));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if tasks.is_empty() {
        let empty = Paragraph::new(Span::styled(
            " Nothing due",
            Style::default().fg(app.theme.dim),
        ));
        frame.render_widget(empty, inner);
        return;
    }

    let width = inner.width as usize;
    let height = inner.height as usize;
    let offset = scroll_offset(Some(app.calendar_task), tasks.len(), height);
    let lines: Vec<Line> = tasks
        .iter()
        .enumerate()
        .skip(offset)
        .take(height)
        .map(|(i, task)| {
            let bg = if i == app.calendar_task {
                app.theme.selection_bg
            } else {
                app.theme.background
            };
            let label = format!(" {}", task.quadrant);
            let title_width = width.saturating_sub(1 + label.len());
            let mut line = task_line(app, task, title_width, bg);
            line.spans.insert(0, Span::styled(" ", Style::default().bg(bg)));
            let used: usize = line.spans.iter().map(|s| unicode::display_width(&s.content)).sum();
            line.spans.push(Span::styled(
                " ".repeat(width.saturating_sub(used + label.len())),
                Style::default().bg(bg),
            ));
            line.spans.push(Span::styled(
                label,
                Style::default().fg(app.theme.dim).bg(bg),
            ));
            line
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::Quadrant;
    use crate::tui::render::test_helpers::{TERM_H, TERM_W, app_with_tasks, render_to_string};
    use crate::util::dates::local_midnight_millis;
    use chrono::NaiveDate;

    fn march(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    fn due_task(id: &str, title: &str, day: u32, done: bool) -> Task {
        let mut t = Task::new(id.into(), title.into(), Quadrant::Q2, 0)
            .with_due_date(local_midnight_millis(march(day)).unwrap());
        t.completed = done;
        t
    }

    fn render(app: &App, hits: &mut HitMap) -> String {
        render_to_string(TERM_W, TERM_H - 3, |frame, area| {
            render_calendar_view(frame, app, area, hits)
        })
    }

    #[test]
    fn month_grid_with_progress_and_side_panel() {
        let (_dir, mut app) = app_with_tasks(vec![
            due_task("a", "Dentist", 9, false),
            due_task("b", "Pay rent", 9, true),
            due_task("c", "Gym", 20, false),
        ]);
        app.set_calendar_date(march(9));
        let mut hits = Vec::new();
        let out = render(&app, &mut hits);

        assert!(out.contains("March 2026"));
        for name in WEEKDAYS {
            assert!(out.contains(name));
        }
        assert!(out.contains("1/2"));
        assert!(out.contains("0/1"));
        assert!(out.contains("Monday, March 9, 2026"));
        let panel_line = out.lines().find(|l| l.contains("Dentist") && l.contains("Q2"));
        assert!(panel_line.is_some());
    }

    #[test]
    fn empty_day_says_nothing_due() {
        let (_dir, mut app) = app_with_tasks(vec![due_task("a", "Dentist", 9, false)]);
        app.set_calendar_date(march(10));
        let mut hits = Vec::new();
        let out = render(&app, &mut hits);
        assert!(out.contains("Nothing due"));
    }

    #[test]
    fn one_hit_per_day() {
        let (_dir, mut app) = app_with_tasks(vec![]);
        app.set_calendar_date(march(1));
        let mut hits = Vec::new();
        render(&app, &mut hits);
        assert_eq!(hits.len(), 31);
        // March 2026 starts on a Sunday: day 1 sits in the first column
        let (first, target) = &hits[0];
        assert_eq!(*target, HitTarget::Day(1));
        assert_eq!(first.x, 0);
        let (eighth, _) = &hits[7];
        assert_eq!(eighth.x, 0);
        assert!(eighth.y > first.y);
    }
}
