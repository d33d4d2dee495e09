use chrono::NaiveDate;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use unicode_segmentation::UnicodeSegmentation;

use crate::model::task::Task;
use crate::tui::theme::Theme;
use crate::util::dates::{format_day, local_date};
use crate::util::unicode;

/// Text cursor glyph
pub(super) const CURSOR: &str = "\u{258C}";

/// Compute total display width of a slice of spans
pub(super) fn spans_width(spans: &[Span]) -> usize {
    spans
        .iter()
        .map(|s| unicode::display_width(&s.content))
        .sum()
}

/// Pad `spans` so that `hint` ends at the right edge, if it fits
pub(super) fn push_right_hint(spans: &mut Vec<Span<'_>>, hint: &str, width: usize, fg: Color, bg: Color) {
    let used = spans_width(spans);
    let hint_width = unicode::display_width(hint);
    if used + hint_width < width {
        let padding = width - used - hint_width;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(hint.to_string(), Style::default().fg(fg).bg(bg)));
    }
}

/// Create a centered rectangle of the given percentage of the parent
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// A `width` x `height` rectangle centered in `area`, shrunk to fit
pub(super) fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect::new(
        area.x + (area.width - w) / 2,
        area.y + (area.height - h) / 2,
        w,
        h,
    )
}

/// Single-line input with a cursor at byte offset `cursor`, scrolled so the
/// cursor stays within `width` cells.
pub(super) fn input_line<'a>(
    text: &str,
    cursor: usize,
    width: usize,
    style: Style,
    cursor_style: Style,
) -> Vec<Span<'a>> {
    let cursor = cursor.min(text.len());
    let mut before = &text[..cursor];
    let after = &text[cursor..];
    let budget = width.saturating_sub(1);
    while unicode::display_width(before) > budget {
        match before.graphemes(true).next() {
            Some(g) => before = &before[g.len()..],
            None => break,
        }
    }
    let room = budget - unicode::display_width(before).min(budget);
    vec![
        Span::styled(before.to_string(), style),
        Span::styled(CURSOR, cursor_style),
        Span::styled(unicode::truncate_to_width(after, room), style),
    ]
}

/// Multi-line text with the cursor glyph inserted at `cursor`
pub(super) fn input_lines<'a>(
    text: &str,
    cursor: usize,
    style: Style,
    cursor_style: Style,
) -> Vec<Line<'a>> {
    let cursor = cursor.min(text.len());
    let before: Vec<&str> = text[..cursor].split('\n').collect();
    let after: Vec<&str> = text[cursor..].split('\n').collect();

    let mut lines: Vec<Line> = Vec::new();
    for line in &before[..before.len() - 1] {
        lines.push(Line::from(Span::styled(line.to_string(), style)));
    }
    lines.push(Line::from(vec![
        Span::styled(before[before.len() - 1].to_string(), style),
        Span::styled(CURSOR, cursor_style),
        Span::styled(after[0].to_string(), style),
    ]));
    for line in &after[1..] {
        lines.push(Line::from(Span::styled(line.to_string(), style)));
    }
    lines
}

/// Due date label and its color: red when overdue, bright on the day itself
pub(super) fn due_label(task: &Task, today: NaiveDate, theme: &Theme) -> Option<(String, Color)> {
    let due = task.due_date?;
    let date = local_date(due)?;
    let color = if task.completed {
        theme.dim
    } else if date < today {
        theme.red
    } else if date == today {
        theme.q3
    } else {
        theme.dim
    };
    let label = if date == today {
        "today".to_string()
    } else {
        format_day(due)
    };
    Some((label, color))
}

/// First index of a window of `height` rows that keeps `cursor` visible
pub(super) fn scroll_offset(cursor: Option<usize>, len: usize, height: usize) -> usize {
    match cursor {
        Some(c) if height > 0 && c >= height => (c + 1 - height).min(len.saturating_sub(height)),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(spans: &[Span]) -> String {
        spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn input_line_scrolls_to_cursor() {
        let spans = input_line("hello world", 11, 6, Style::default(), Style::default());
        assert_eq!(plain(&spans), "world\u{258C}");

        let spans = input_line("hello", 0, 10, Style::default(), Style::default());
        assert_eq!(plain(&spans), "\u{258C}hello");
    }

    #[test]
    fn input_lines_place_cursor_on_its_line() {
        let lines = input_lines("ab\ncd\nef", 4, Style::default(), Style::default());
        let text: Vec<String> = lines.iter().map(|l| plain(&l.spans)).collect();
        assert_eq!(text, vec!["ab", "c\u{258C}d", "ef"]);
    }

    #[test]
    fn scroll_keeps_cursor_in_window() {
        assert_eq!(scroll_offset(None, 10, 4), 0);
        assert_eq!(scroll_offset(Some(2), 10, 4), 0);
        assert_eq!(scroll_offset(Some(5), 10, 4), 2);
        assert_eq!(scroll_offset(Some(9), 10, 4), 6);
    }

    #[test]
    fn centered_fixed_fits_inside() {
        let r = centered_fixed(20, 6, Rect::new(0, 0, 100, 30));
        assert_eq!(r, Rect::new(40, 12, 20, 6));
        let r = centered_fixed(200, 60, Rect::new(0, 0, 100, 30));
        assert_eq!(r, Rect::new(0, 0, 100, 30));
    }
}
