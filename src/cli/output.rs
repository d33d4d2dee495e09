use serde::Serialize;

use crate::io::recovery::RecoveryEntry;
use crate::model::task::{Quadrant, Task};
use crate::ops::views::{BoardStats, CalendarMonth, HistoryGroup};
use crate::util::dates::{format_day, format_long_day, format_time};

/// Characters of a task id shown in listings
const SHORT_ID_LEN: usize = 8;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct QuadrantListJson<'a> {
    pub quadrant: Quadrant,
    pub label: &'static str,
    pub tasks: Vec<&'a Task>,
}

#[derive(Serialize)]
pub struct CalendarJson<'a> {
    pub month: String,
    pub leading_blanks: usize,
    pub days: Vec<CalendarDayJson<'a>>,
}

#[derive(Serialize)]
pub struct CalendarDayJson<'a> {
    pub date: String,
    pub completed: usize,
    pub total: usize,
    pub tasks: Vec<&'a Task>,
}

#[derive(Serialize)]
pub struct HistoryGroupJson<'a> {
    pub date: String,
    pub tasks: Vec<&'a Task>,
}

#[derive(Serialize)]
pub struct StatsJson {
    pub quadrants: Vec<QuadrantStatsJson>,
    pub open: usize,
    pub done: usize,
    pub total: usize,
}

#[derive(Serialize)]
pub struct QuadrantStatsJson {
    pub quadrant: Quadrant,
    pub label: &'static str,
    pub open: usize,
    pub done: usize,
}

#[derive(Serialize)]
pub struct ImportJson<'a> {
    pub imported: Vec<&'a Task>,
}

#[derive(Serialize)]
pub struct ReviewJson<'a> {
    pub review: &'a str,
}

#[derive(Serialize)]
pub struct RecoveryEntryJson {
    pub timestamp: String,
    pub category: String,
    pub description: String,
    pub fields: Vec<(String, String)>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub body: String,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn calendar_to_json<'a>(cal: &CalendarMonth<'a>) -> CalendarJson<'a> {
    CalendarJson {
        month: format!("{:04}-{:02}", cal.month.year, cal.month.month),
        leading_blanks: cal.leading_blanks,
        days: cal
            .days
            .iter()
            .filter(|d| d.total() > 0)
            .map(|d| CalendarDayJson {
                date: d.date.format("%Y-%m-%d").to_string(),
                completed: d.completed(),
                total: d.total(),
                tasks: d.tasks.clone(),
            })
            .collect(),
    }
}

pub fn history_to_json<'a>(groups: &[HistoryGroup<'a>]) -> Vec<HistoryGroupJson<'a>> {
    groups
        .iter()
        .map(|g| HistoryGroupJson {
            date: g.date.format("%Y-%m-%d").to_string(),
            tasks: g.tasks.clone(),
        })
        .collect()
}

pub fn stats_to_json(stats: &BoardStats) -> StatsJson {
    StatsJson {
        quadrants: Quadrant::ALL
            .into_iter()
            .map(|q| {
                let c = stats.get(q);
                QuadrantStatsJson {
                    quadrant: q,
                    label: q.label(),
                    open: c.open,
                    done: c.done,
                }
            })
            .collect(),
        open: stats.open(),
        done: stats.done(),
        total: stats.total,
    }
}

pub fn recovery_to_json(entry: &RecoveryEntry) -> RecoveryEntryJson {
    RecoveryEntryJson {
        timestamp: entry.timestamp.to_rfc3339(),
        category: entry.category.to_string(),
        description: entry.description.clone(),
        fields: entry.fields.clone(),
        body: entry.body.clone(),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(SHORT_ID_LEN) {
        Some((i, _)) => &id[..i],
        None => id,
    }
}

fn format_tags(tags: &[String]) -> String {
    tags.iter()
        .map(|t| format!("#{}", t))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format a single task as a one-line summary
pub fn format_task_line(task: &Task) -> String {
    let check = if task.completed { 'x' } else { ' ' };
    let mut line = format!("[{}] {:<8} {}", check, short_id(&task.id), task.title);
    if !task.tags.is_empty() {
        line.push_str("  ");
        line.push_str(&format_tags(&task.tags));
    }
    if let Some(due) = task.due_date {
        line.push_str(&format!("  due {}", format_day(due)));
    }
    line
}

/// Format detailed task view
pub fn format_task_detail(task: &Task) -> Vec<String> {
    let mut lines = Vec::new();
    let check = if task.completed { 'x' } else { ' ' };
    lines.push(format!("[{}] {}", check, task.title));
    lines.push(format!("id: {}", task.id));
    lines.push(format!(
        "quadrant: {} ({}, {})",
        task.quadrant,
        task.quadrant.label(),
        task.quadrant.sub_label()
    ));
    if !task.tags.is_empty() {
        lines.push(format!("tags: {}", format_tags(&task.tags)));
    }
    lines.push(format!(
        "created: {} {}",
        format_day(task.created_at),
        format_time(task.created_at)
    ));
    if let Some(due) = task.due_date {
        lines.push(format!("due: {}", format_day(due)));
    }
    if let Some(done) = task.completed_at {
        lines.push(format!("completed: {} {}", format_day(done), format_time(done)));
    }
    if let Some(desc) = &task.description {
        lines.push("description:".to_string());
        for line in desc.lines() {
            lines.push(format!("  {}", line));
        }
    }
    lines
}

/// Format one quadrant's listing
pub fn format_quadrant_listing(quadrant: Quadrant, tasks: &[&Task]) -> Vec<String> {
    let mut lines = vec![format!(
        "== {} {} ({}) ==",
        quadrant,
        quadrant.label(),
        quadrant.sub_label()
    )];
    if tasks.is_empty() {
        lines.push("  (empty)".to_string());
    }
    for task in tasks {
        lines.push(format!("  {}", format_task_line(task)));
    }
    lines
}

/// Month grid (Sunday first) followed by the tasks due that month.
/// Days with tasks are marked `*` while any is open, `+` once all are done.
pub fn format_calendar(cal: &CalendarMonth<'_>) -> Vec<String> {
    let mut lines = vec![cal.month.title(), "Su  Mo  Tu  We  Th  Fr  Sa".to_string()];

    let mut row = "    ".repeat(cal.leading_blanks);
    let mut col = cal.leading_blanks;
    for day in &cal.days {
        let mark = match (day.completed(), day.total()) {
            (_, 0) => ' ',
            (c, t) if c == t => '+',
            _ => '*',
        };
        row.push_str(&format!("{:>2}{}", day.day(), mark));
        col += 1;
        if col == 7 {
            lines.push(row.trim_end().to_string());
            row = String::new();
            col = 0;
        } else {
            row.push(' ');
        }
    }
    if !row.trim().is_empty() {
        lines.push(row.trim_end().to_string());
    }

    let due: Vec<_> = cal.days.iter().filter(|d| d.total() > 0).collect();
    if !due.is_empty() {
        lines.push(String::new());
        for day in due {
            lines.push(format!(
                "{}  ({}/{} done)",
                day.date.format("%a %b %-d"),
                day.completed(),
                day.total()
            ));
            for task in &day.tasks {
                lines.push(format!("  {}", format_task_line(task)));
            }
        }
    }
    lines
}

pub fn format_history(groups: &[HistoryGroup<'_>]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, group) in groups.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.push(format_long_day(group.date));
        for task in &group.tasks {
            let time = task.completed_at.map(format_time).unwrap_or_default();
            lines.push(format!(
                "  {:>5}  {}  [{}]",
                time,
                task.title,
                task.quadrant.label()
            ));
        }
    }
    lines
}

pub fn format_stats(stats: &BoardStats) -> Vec<String> {
    let mut lines = vec![format!("{:<22}{:>6}{:>6}", "", "open", "done")];
    for q in Quadrant::ALL {
        let c = stats.get(q);
        lines.push(format!(
            "{:<22}{:>6}{:>6}",
            format!("{} {}", q, q.label()),
            c.open,
            c.done
        ));
    }
    lines.push(format!(
        "{:<22}{:>6}{:>6}",
        format!("total ({})", stats.total),
        stats.open(),
        stats.done()
    ));
    lines
}

pub fn format_recovery_entry(entry: &RecoveryEntry) -> Vec<String> {
    let mut lines = vec![format!(
        "{}  {}: {}",
        entry
            .timestamp
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M"),
        entry.category,
        entry.description
    )];
    for (key, value) in &entry.fields {
        lines.push(format!("  {}: {}", key, value));
    }
    if !entry.body.is_empty() {
        for line in entry.body.lines() {
            lines.push(format!("  | {}", line));
        }
    }
    lines
}
