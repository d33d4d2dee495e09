//! Read-only projections of the task store.
//!
//! Every view here is a pure, order-preserving filter over the one backing
//! sequence. Calendar and history bucketing use the local calendar day.

use chrono::{Datelike, Local, NaiveDate};
use indexmap::IndexMap;

use crate::model::task::{Quadrant, Task};
use crate::util::dates::local_date;

// ---------------------------------------------------------------------------
// Matrix
// ---------------------------------------------------------------------------

/// Incomplete tasks of one quadrant, in backing order. The backlog panel
/// uses the same filter.
pub fn matrix_view(tasks: &[Task], quadrant: Quadrant) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|t| t.quadrant == quadrant && !t.completed)
        .collect()
}

// ---------------------------------------------------------------------------
// Calendar
// ---------------------------------------------------------------------------

/// A displayed calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct YearMonth {
    pub year: i32,
    /// 1-based
    pub month: u32,
}

impl YearMonth {
    /// A month chrono can represent, including the first day of the month
    /// after it (so `days_in_month` and `next` are always defined).
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if !(1..=12).contains(&month) {
            return None;
        }
        NaiveDate::from_ymd_opt(year, month, 1)?;
        let ym = YearMonth { year, month };
        ym.step(true)?;
        Some(ym)
    }

    pub fn current() -> Self {
        let today = Local::now().date_naive();
        YearMonth {
            year: today.year(),
            month: today.month(),
        }
    }

    pub fn of(date: NaiveDate) -> Self {
        YearMonth {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Neighbouring month, if its first day exists
    fn step(self, forward: bool) -> Option<Self> {
        let (year, month) = match (forward, self.month) {
            (true, 12) => (self.year.checked_add(1)?, 1),
            (true, m) => (self.year, m + 1),
            (false, 1) => (self.year.checked_sub(1)?, 12),
            (false, m) => (self.year, m - 1),
        };
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| YearMonth { year, month })
    }

    /// Previous month; stays put at the start of the representable range
    pub fn prev(self) -> Self {
        self.step(false).unwrap_or(self)
    }

    /// Next month; stays put at the end of the representable range
    pub fn next(self) -> Self {
        self.step(true)
            .filter(|m| m.step(true).is_some())
            .unwrap_or(self)
    }

    pub fn days_in_month(self) -> u32 {
        (28..=31)
            .rev()
            .find(|&d| NaiveDate::from_ymd_opt(self.year, self.month, d).is_some())
            .unwrap_or(0)
    }

    /// Parse `YYYY-MM`
    pub fn parse(s: &str) -> Result<Self, String> {
        let err = || format!("invalid month: {} (expected YYYY-MM)", s);
        let (y, m) = s.trim().split_once('-').ok_or_else(err)?;
        let year: i32 = y.parse().map_err(|_| err())?;
        let month: u32 = m.parse().map_err(|_| err())?;
        YearMonth::new(year, month).ok_or_else(err)
    }

    /// Heading form, e.g. `May 2025`
    pub fn title(self) -> String {
        self.first_day().format("%B %Y").to_string()
    }
}

/// One day of the calendar grid
#[derive(Debug, Clone)]
pub struct DayCell<'a> {
    pub date: NaiveDate,
    /// Tasks due this day, completed or not, in backing order
    pub tasks: Vec<&'a Task>,
}

impl DayCell<'_> {
    pub fn day(&self) -> u32 {
        self.date.day()
    }

    pub fn total(&self) -> usize {
        self.tasks.len()
    }

    pub fn completed(&self) -> usize {
        self.tasks.iter().filter(|t| t.completed).count()
    }

    /// `completed / total`, or None for a day with nothing due
    pub fn completion_fraction(&self) -> Option<f64> {
        let total = self.total();
        (total > 0).then(|| self.completed() as f64 / total as f64)
    }
}

/// A month grid: leading blank cells, then one cell per day
#[derive(Debug, Clone)]
pub struct CalendarMonth<'a> {
    pub month: YearMonth,
    /// Blank cells before the 1st (Sunday = 0)
    pub leading_blanks: usize,
    pub days: Vec<DayCell<'a>>,
}

impl<'a> CalendarMonth<'a> {
    pub fn day(&self, day: u32) -> Option<&DayCell<'a>> {
        self.days.get((day as usize).checked_sub(1)?)
    }

    /// Number of grid rows (weeks) the month spans
    pub fn weeks(&self) -> usize {
        (self.leading_blanks + self.days.len()).div_ceil(7)
    }
}

pub fn calendar_month(tasks: &[Task], month: YearMonth) -> CalendarMonth<'_> {
    let first = month.first_day();
    let leading_blanks = first.weekday().num_days_from_sunday() as usize;
    let mut days: Vec<DayCell> = (0..month.days_in_month())
        .filter_map(|offset| first.checked_add_days(chrono::Days::new(offset as u64)))
        .map(|date| DayCell {
            date,
            tasks: Vec::new(),
        })
        .collect();

    for task in tasks {
        let Some(date) = task.due_date.and_then(local_date) else {
            continue;
        };
        if YearMonth::of(date) != month {
            continue;
        }
        if let Some(cell) = days.get_mut(date.day() as usize - 1) {
            cell.tasks.push(task);
        }
    }

    CalendarMonth {
        month,
        leading_blanks,
        days,
    }
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// Completed tasks sharing one local completion day
#[derive(Debug, Clone)]
pub struct HistoryGroup<'a> {
    pub date: NaiveDate,
    /// Most recently completed first
    pub tasks: Vec<&'a Task>,
}

/// Completed tasks, newest first, grouped by local completion day.
/// A task missing `completed_at`, or with one outside the representable
/// date range, is shown under the day of `now`.
pub fn history_view(tasks: &[Task], now: i64) -> Vec<HistoryGroup<'_>> {
    let mut done: Vec<&Task> = tasks.iter().filter(|t| t.completed).collect();
    // Stable sort keeps backing order among equal timestamps
    done.sort_by_key(|t| std::cmp::Reverse(t.completed_at.unwrap_or(now)));

    let mut groups: IndexMap<NaiveDate, Vec<&Task>> = IndexMap::new();
    for task in done {
        let Some(date) = task
            .completed_at
            .and_then(local_date)
            .or_else(|| local_date(now))
        else {
            continue;
        };
        groups.entry(date).or_default().push(task);
    }

    groups
        .into_iter()
        .map(|(date, tasks)| HistoryGroup { date, tasks })
        .collect()
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Open/done counts for one quadrant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuadrantCounts {
    pub open: usize,
    pub done: usize,
}

/// Per-quadrant counts plus the store total
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardStats {
    pub per_quadrant: IndexMap<Quadrant, QuadrantCounts>,
    pub total: usize,
}

impl BoardStats {
    pub fn get(&self, quadrant: Quadrant) -> QuadrantCounts {
        self.per_quadrant.get(&quadrant).copied().unwrap_or_default()
    }

    pub fn open(&self) -> usize {
        self.per_quadrant.values().map(|c| c.open).sum()
    }

    pub fn done(&self) -> usize {
        self.per_quadrant.values().map(|c| c.done).sum()
    }
}

pub fn stats(tasks: &[Task]) -> BoardStats {
    let mut per_quadrant: IndexMap<Quadrant, QuadrantCounts> = Quadrant::ALL
        .into_iter()
        .map(|q| (q, QuadrantCounts::default()))
        .collect();
    for task in tasks {
        let counts = per_quadrant.entry(task.quadrant).or_default();
        if task.completed {
            counts.done += 1;
        } else {
            counts.open += 1;
        }
    }
    BoardStats {
        per_quadrant,
        total: tasks.len(),
    }
}
