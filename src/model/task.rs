use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the four Eisenhower quadrants, or the unsorted backlog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quadrant {
    /// Urgent & important
    Q1,
    /// Not urgent & important
    Q2,
    /// Urgent & not important
    Q3,
    /// Not urgent & not important
    Q4,
    /// Unsorted inbox
    Backlog,
}

impl Quadrant {
    pub const ALL: [Quadrant; 5] = [
        Quadrant::Q1,
        Quadrant::Q2,
        Quadrant::Q3,
        Quadrant::Q4,
        Quadrant::Backlog,
    ];

    /// The four matrix cells, in reading order (top-left to bottom-right)
    pub const MATRIX: [Quadrant; 4] = [Quadrant::Q1, Quadrant::Q2, Quadrant::Q3, Quadrant::Q4];

    /// Wire literal (`Q1` … `Backlog`)
    pub fn as_str(self) -> &'static str {
        match self {
            Quadrant::Q1 => "Q1",
            Quadrant::Q2 => "Q2",
            Quadrant::Q3 => "Q3",
            Quadrant::Q4 => "Q4",
            Quadrant::Backlog => "Backlog",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Quadrant::Q1 => "Do First",
            Quadrant::Q2 => "Schedule",
            Quadrant::Q3 => "Delegate",
            Quadrant::Q4 => "Eliminate",
            Quadrant::Backlog => "Backlog",
        }
    }

    pub fn sub_label(self) -> &'static str {
        match self {
            Quadrant::Q1 => "Urgent & Important",
            Quadrant::Q2 => "Not Urgent & Important",
            Quadrant::Q3 => "Urgent & Not Important",
            Quadrant::Q4 => "Not Urgent & Not Important",
            Quadrant::Backlog => "Inbox",
        }
    }

    /// Key that moves the selected task here
    pub fn shortcut(self) -> char {
        match self {
            Quadrant::Q1 => '1',
            Quadrant::Q2 => '2',
            Quadrant::Q3 => '3',
            Quadrant::Q4 => '4',
            Quadrant::Backlog => '`',
        }
    }

    pub fn from_shortcut(c: char) -> Option<Quadrant> {
        Quadrant::ALL.into_iter().find(|q| q.shortcut() == c)
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Quadrant {
    type Err = String;

    /// Accepts the wire literals case-insensitively, plus the shortcut keys
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(q) = Quadrant::ALL
            .into_iter()
            .find(|q| q.as_str().eq_ignore_ascii_case(trimmed))
        {
            return Ok(q);
        }
        let mut chars = trimmed.chars();
        if let (Some(c), None) = (chars.next(), chars.next())
            && let Some(q) = Quadrant::from_shortcut(c)
        {
            return Ok(q);
        }
        Err(format!(
            "invalid quadrant: {} (expected Q1, Q2, Q3, Q4, or Backlog)",
            s
        ))
    }
}

/// A single task record. Field names on the wire are camelCase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub quadrant: Quadrant,
    pub completed: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Epoch milliseconds
    pub created_at: i64,
    /// Epoch milliseconds; only the local calendar day is meaningful
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<i64>,
    /// Present iff `completed`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
}

impl Task {
    /// Create an incomplete task with no tags, description, or due date
    pub fn new(id: String, title: String, quadrant: Quadrant, created_at: i64) -> Self {
        Task {
            id,
            title,
            description: None,
            quadrant,
            completed: false,
            tags: Vec::new(),
            created_at,
            due_date: None,
            completed_at: None,
        }
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_due_date(mut self, due_date: i64) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// Partial update for `update_task`. `None` leaves a field untouched; the
/// nested options on `description`/`due_date` distinguish "clear" from "keep".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub quadrant: Option<Quadrant>,
    pub tags: Option<Vec<String>>,
    pub due_date: Option<Option<i64>>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        *self == TaskPatch::default()
    }

    /// Shallow-merge into `task`
    pub fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(quadrant) = self.quadrant {
            task.quadrant = quadrant;
        }
        if let Some(tags) = self.tags {
            task.tags = tags;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
    }
}

/// A task as proposed by the AI import
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportItem {
    pub title: String,
    pub quadrant: Quadrant,
    #[serde(default)]
    pub tags: Vec<String>,
}
