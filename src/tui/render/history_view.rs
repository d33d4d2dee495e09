use chrono::NaiveDate;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::task::Task;
use crate::ops::views;
use crate::tui::app::{App, HitTarget};
use crate::util::dates::{format_long_day, format_time, now_millis};
use crate::util::unicode;

use super::HitMap;
use super::helpers::{push_right_hint, scroll_offset, spans_width};

/// A display row of the history list
enum Row<'a> {
    Heading(NaiveDate),
    /// Index into the flattened task list, and the task
    Task(usize, &'a Task),
}

/// Render completed tasks grouped by completion day, newest first
pub fn render_history_view(frame: &mut Frame, app: &App, area: Rect, hits: &mut HitMap) {
    let bg = app.theme.background;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // title
            Constraint::Length(1), // spacer
            Constraint::Min(0),    // list
        ])
        .split(area);

    let groups = views::history_view(&app.board.tasks, now_millis());
    let total: usize = groups.iter().map(|g| g.tasks.len()).sum();

    let mut title = vec![
        Span::styled(" \u{2713} ", Style::default().fg(app.theme.green).bg(bg)),
        Span::styled(
            "Task History",
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
    ];
    if total > 0 {
        push_right_hint(
            &mut title,
            &format!("{} completed  X clear history ", total),
            chunks[0].width as usize,
            app.theme.dim,
            bg,
        );
    }
    frame.render_widget(Paragraph::new(Line::from(title)), chunks[0]);

    let list = chunks[2];
    if total == 0 {
        let empty = Paragraph::new(Span::styled(
            "No completed tasks yet.",
            Style::default().fg(app.theme.dim),
        ))
        .alignment(Alignment::Center);
        let rect = Rect {
            y: list.y + list.height / 3,
            height: 1.min(list.height),
            ..list
        };
        frame.render_widget(empty, rect);
        return;
    }

    let mut rows: Vec<Row> = Vec::new();
    let mut index = 0;
    for group in &groups {
        rows.push(Row::Heading(group.date));
        for task in &group.tasks {
            rows.push(Row::Task(index, *task));
            index += 1;
        }
    }

    let cursor_row = rows
        .iter()
        .position(|r| matches!(r, Row::Task(i, _) if *i == app.history_cursor));
    let height = list.height as usize;
    let mut offset = scroll_offset(cursor_row, rows.len(), height);
    // Keep the day heading in view when its first task is under the cursor
    if let Some(c) = cursor_row
        && c > 0
        && offset == c
        && matches!(rows[c - 1], Row::Heading(_))
    {
        offset -= 1;
    }

    let width = list.width as usize;
    for (i, row) in rows.iter().enumerate().skip(offset).take(height) {
        let rect = Rect::new(list.x, list.y + (i - offset) as u16, list.width, 1);
        let line = match row {
            Row::Heading(date) => Line::from(Span::styled(
                format!(" {}", format_long_day(*date).to_uppercase()),
                Style::default()
                    .fg(app.theme.dim)
                    .add_modifier(Modifier::BOLD),
            )),
            Row::Task(idx, task) => {
                hits.push((rect, HitTarget::HistoryRow(*idx)));
                task_row(app, task, *idx == app.history_cursor, width)
            }
        };
        frame.render_widget(Paragraph::new(line), rect);
    }
}

fn task_row(app: &App, task: &Task, selected: bool, width: usize) -> Line<'static> {
    let bg = if selected {
        app.theme.selection_bg
    } else {
        app.theme.background
    };
    let time = task
        .completed_at
        .map(format_time)
        .unwrap_or_else(|| "--:--".to_string());

    let mut meta = task.quadrant.to_string();
    if !task.tags.is_empty() {
        meta = format!("{} \u{00B7} {}", meta, task.tags.join(", "));
    }
    let meta = format!("{} ", meta);

    let mut spans = vec![
        Span::styled("   \u{2713} ", Style::default().fg(app.theme.green).bg(bg)),
        Span::styled(format!("{}  ", time), Style::default().fg(app.theme.dim).bg(bg)),
    ];
    let title_width = width.saturating_sub(spans_width(&spans) + unicode::display_width(&meta) + 2);
    let title_style = if selected {
        Style::default().fg(app.theme.text_bright).bg(bg)
    } else {
        Style::default().fg(app.theme.text).bg(bg)
    };
    spans.push(Span::styled(
        unicode::truncate_to_width(&task.title, title_width),
        title_style.add_modifier(Modifier::CROSSED_OUT),
    ));
    push_right_hint(&mut spans, &meta, width, app.theme.dim, bg);
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::Quadrant;
    use crate::tui::render::test_helpers::{TERM_H, TERM_W, app_with_tasks, render_to_string};
    use chrono::{Local, TimeZone};

    fn done_at(id: &str, title: &str, y: i32, m: u32, d: u32, h: u32) -> Task {
        let mut t = Task::new(id.into(), title.into(), Quadrant::Q1, 0).with_tags(&["Work"]);
        t.completed = true;
        t.completed_at = Some(
            Local
                .with_ymd_and_hms(y, m, d, h, 5, 0)
                .earliest()
                .unwrap()
                .timestamp_millis(),
        );
        t
    }

    fn render(app: &App, hits: &mut HitMap) -> String {
        render_to_string(TERM_W, TERM_H - 3, |frame, area| {
            render_history_view(frame, app, area, hits)
        })
    }

    #[test]
    fn groups_by_day_newest_first() {
        let (_dir, app) = app_with_tasks(vec![
            done_at("a", "Old chore", 2026, 3, 2, 9),
            done_at("b", "Morning run", 2026, 3, 3, 8),
            done_at("c", "Evening call", 2026, 3, 3, 18),
            Task::new("o".into(), "Still open".into(), Quadrant::Q1, 0),
        ]);
        let mut hits = Vec::new();
        let out = render(&app, &mut hits);

        assert!(out.contains("Task History"));
        assert!(out.contains("3 completed"));
        assert!(!out.contains("Still open"));

        let lines: Vec<&str> = out.lines().collect();
        let pos = |needle: &str| lines.iter().position(|l| l.contains(needle)).unwrap();
        assert!(pos("TUESDAY, MARCH 3, 2026") < pos("Evening call"));
        assert!(pos("Evening call") < pos("Morning run"));
        assert!(pos("Morning run") < pos("MONDAY, MARCH 2, 2026"));
        assert!(pos("MONDAY, MARCH 2, 2026") < pos("Old chore"));

        let row = lines[pos("Evening call")];
        assert!(row.contains("18:05"));
        assert!(row.contains("Q1 \u{00B7} Work"));

        let targets: Vec<&HitTarget> = hits.iter().map(|(_, t)| t).collect();
        assert_eq!(
            targets,
            vec![
                &HitTarget::HistoryRow(0),
                &HitTarget::HistoryRow(1),
                &HitTarget::HistoryRow(2)
            ]
        );
    }

    #[test]
    fn empty_history_message() {
        let (_dir, app) = app_with_tasks(vec![]);
        let mut hits = Vec::new();
        let out = render(&app, &mut hits);
        assert!(out.contains("No completed tasks yet."));
        assert!(hits.is_empty());
    }

    #[test]
    fn cursor_scrolls_into_view() {
        let tasks: Vec<Task> = (0..20)
            .map(|i| done_at(&format!("t{}", i), &format!("Chore {:02}", i), 2026, 3, 3, i))
            .collect();
        let (_dir, mut app) = app_with_tasks(tasks);
        // Newest first: cursor 19 is the 00:05 chore
        app.history_cursor = 19;
        let mut hits = Vec::new();
        let out = render_to_string(80, 8, |frame, area| {
            render_history_view(frame, &app, area, &mut hits)
        });
        assert!(out.contains("Chore 00"));
        assert!(!out.contains("Chore 19"));
    }
}
