use chrono::{Local, NaiveDate};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::model::task::{Quadrant, Task};
use crate::tui::app::{App, HitTarget};
use crate::util::unicode;

use super::HitMap;
use super::helpers::{due_label, scroll_offset, spans_width};

/// Render the matrix: backlog panel on the left, the four quadrants in a
/// 2x2 grid on the right. Focus mode shows Q1 alone.
pub fn render_matrix_view(frame: &mut Frame, app: &App, area: Rect, hits: &mut HitMap) {
    if app.focus_mode {
        render_pane(frame, app, Quadrant::Q1, area, hits);
        return;
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(28), Constraint::Percentage(72)])
        .split(area);
    render_pane(frame, app, Quadrant::Backlog, columns[0], hits);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(columns[1]);
    for (i, quadrant) in Quadrant::MATRIX.into_iter().enumerate() {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[i / 2]);
        render_pane(frame, app, quadrant, cells[i % 2], hits);
    }
}

fn heading(quadrant: Quadrant) -> String {
    match quadrant {
        Quadrant::Backlog => "Backlog".to_string(),
        q => format!("{} \u{00B7} {}", q, q.label()),
    }
}

fn subtitle(quadrant: Quadrant) -> &'static str {
    match quadrant {
        Quadrant::Backlog => "Unsorted tasks & ideas",
        q => q.sub_label(),
    }
}

fn render_pane(frame: &mut Frame, app: &App, quadrant: Quadrant, area: Rect, hits: &mut HitMap) {
    hits.push((area, HitTarget::Pane(quadrant)));

    let bg = app.theme.background;
    let color = app.theme.quadrant_color(quadrant);
    let tasks = app.pane_tasks(quadrant);

    let border_color = if app.drag.over() == Some(quadrant) {
        app.theme.highlight
    } else if app.pane == quadrant {
        app.theme.selection_border
    } else {
        app.theme.dim
    };

    let title = Line::from(Span::styled(
        format!(" {} ", heading(quadrant)),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ));
    let count = Line::from(Span::styled(
        format!(" {} ", tasks.len()),
        Style::default().fg(app.theme.dim),
    ))
    .right_aligned();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color))
        .title(title)
        .title_top(count)
        .style(Style::default().bg(bg));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height < 2 || inner.width == 0 {
        return;
    }

    let sub = Paragraph::new(Span::styled(
        subtitle(quadrant),
        Style::default().fg(app.theme.dim).add_modifier(Modifier::ITALIC),
    ));
    frame.render_widget(sub, Rect { height: 1, ..inner });

    let list = Rect {
        y: inner.y + 1,
        height: inner.height - 1,
        ..inner
    };

    if tasks.is_empty() {
        render_empty(frame, app, quadrant, list);
        return;
    }

    let height = list.height as usize;
    let selected = app.board.selected.as_deref();
    let cursor = tasks.iter().position(|t| Some(t.id.as_str()) == selected);
    let offset = scroll_offset(cursor, tasks.len(), height);
    let today = Local::now().date_naive();

    for (row, task) in tasks.iter().enumerate().skip(offset).take(height) {
        let rect = Rect::new(list.x, list.y + (row - offset) as u16, list.width, 1);
        let line = task_line(app, task, cursor == Some(row), rect.width as usize, today);
        frame.render_widget(Paragraph::new(line), rect);
        hits.push((
            rect,
            HitTarget::Task {
                id: task.id.clone(),
                quadrant,
            },
        ));
    }
}

fn render_empty(frame: &mut Frame, app: &App, quadrant: Quadrant, area: Rect) {
    let dim = Style::default().fg(app.theme.dim);
    let lines = if quadrant == Quadrant::Backlog {
        vec![
            Line::from(Span::styled(
                "Inbox Zero",
                Style::default()
                    .fg(app.theme.text_bright)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled("Great job!", dim)),
        ]
    } else {
        vec![Line::from(Span::styled("Drop tasks here", dim))]
    };
    let height = (lines.len() as u16).min(area.height);
    let rect = Rect {
        y: area.y + (area.height - height) / 2,
        height,
        ..area
    };
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), rect);
}

/// One task card: marker, title, then tags, notes marker and due date on the right
fn task_line(app: &App, task: &Task, selected: bool, width: usize, today: NaiveDate) -> Line<'static> {
    let bg = if selected {
        app.theme.selection_bg
    } else {
        app.theme.background
    };
    let title_style = if selected {
        Style::default()
            .fg(app.theme.text_bright)
            .bg(bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.text).bg(bg)
    };

    let mut meta: Vec<Span> = Vec::new();
    for tag in &task.tags {
        meta.push(Span::styled(
            format!(" #{}", tag),
            Style::default().fg(app.theme.tag_color(tag)).bg(bg),
        ));
    }
    if task.description.is_some() {
        meta.push(Span::styled(" \u{2261}", Style::default().fg(app.theme.dim).bg(bg)));
    }
    if let Some((label, color)) = due_label(task, today, &app.theme) {
        meta.push(Span::styled(format!(" {}", label), Style::default().fg(color).bg(bg)));
    }
    meta.push(Span::styled(" ", Style::default().bg(bg)));

    let prefix = 3;
    let mut meta_width = spans_width(&meta);
    // Narrow panes drop the metadata before the title
    if prefix + meta_width + 8 > width {
        meta.clear();
        meta_width = 0;
    }
    let title_width = width.saturating_sub(prefix + meta_width);

    let marker = if selected { " \u{25B8} " } else { " \u{25CB} " };
    let mut spans = vec![
        Span::styled(
            marker,
            Style::default()
                .fg(app.theme.quadrant_color(task.quadrant))
                .bg(bg),
        ),
        Span::styled(unicode::fit_to_width(&task.title, title_width), title_style),
    ];
    spans.extend(meta);
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::{TERM_H, TERM_W, app_with_tasks, render_to_string};
    use crate::util::dates::local_midnight_millis;

    fn task(id: &str, title: &str, q: Quadrant) -> Task {
        Task::new(id.into(), title.into(), q, 0)
    }

    fn render(app: &App) -> String {
        let mut hits = Vec::new();
        render_to_string(TERM_W, TERM_H - 3, |frame, area| {
            render_matrix_view(frame, app, area, &mut hits)
        })
    }

    #[test]
    fn panes_show_open_tasks_only() {
        let mut done = task("c", "Filed taxes", Quadrant::Q1);
        done.completed = true;
        let (_dir, app) = app_with_tasks(vec![
            task("a", "Fix the leak", Quadrant::Q1),
            task("b", "Someday idea", Quadrant::Backlog),
            done,
        ]);
        let out = render(&app);
        assert!(out.contains("Q1 \u{00B7} Do First"));
        assert!(out.contains("Q4 \u{00B7} Eliminate"));
        assert!(out.contains("Urgent & Important"));
        assert!(out.contains("Unsorted tasks & ideas"));
        assert!(out.contains("Fix the leak"));
        assert!(out.contains("Someday idea"));
        assert!(!out.contains("Filed taxes"));
        assert!(out.contains("Drop tasks here"));
        assert!(!out.contains("Inbox Zero"));
    }

    #[test]
    fn empty_backlog_celebrates() {
        let (_dir, app) = app_with_tasks(vec![]);
        let out = render(&app);
        assert!(out.contains("Inbox Zero"));
        assert!(out.contains("Great job!"));
    }

    #[test]
    fn focus_mode_shows_q1_alone() {
        let (_dir, mut app) = app_with_tasks(vec![
            task("a", "Fix the leak", Quadrant::Q1),
            task("b", "Plan garden", Quadrant::Q2),
        ]);
        app.focus_mode = true;
        let out = render(&app);
        assert!(out.contains("Fix the leak"));
        assert!(!out.contains("Plan garden"));
        assert!(!out.contains("Backlog"));
    }

    #[test]
    fn card_shows_tags_and_overdue_date() {
        let due = local_midnight_millis(NaiveDate::from_ymd_opt(2020, 1, 15).unwrap()).unwrap();
        let (_dir, app) = app_with_tasks(vec![
            task("a", "Renew ID", Quadrant::Q1)
                .with_tags(&["Admin"])
                .with_due_date(due),
        ]);
        let out = render(&app);
        let line = out.lines().find(|l| l.contains("Renew ID")).unwrap();
        assert!(line.contains("#Admin"));
        assert!(line.contains("2020-01-15"));
    }

    #[test]
    fn long_pane_scrolls_to_selection() {
        let tasks: Vec<Task> = (0..30)
            .map(|i| task(&format!("t{}", i), &format!("Task {:02}", i), Quadrant::Q1))
            .collect();
        let (_dir, mut app) = app_with_tasks(tasks);
        app.focus_mode = true;
        app.select_task("t29");
        let mut hits = Vec::new();
        let out = render_to_string(40, 8, |frame, area| {
            render_matrix_view(frame, &app, area, &mut hits)
        });
        assert!(out.contains("Task 29"));
        assert!(out.contains("Task 25"));
        assert!(!out.contains("Task 24"));
        assert!(!out.contains("Task 00"));
    }

    #[test]
    fn hits_for_each_visible_card() {
        let (_dir, app) = app_with_tasks(vec![
            task("a", "A", Quadrant::Q1),
            task("b", "B", Quadrant::Q1),
        ]);
        let mut hits = Vec::new();
        render_to_string(TERM_W, TERM_H - 3, |frame, area| {
            render_matrix_view(frame, &app, area, &mut hits)
        });
        let cards: Vec<&Rect> = hits
            .iter()
            .filter(|(_, t)| matches!(t, HitTarget::Task { .. }))
            .map(|(r, _)| r)
            .collect();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[1].y, cards[0].y + 1);
        assert_eq!(hits.len(), 5 + 2);
    }
}
