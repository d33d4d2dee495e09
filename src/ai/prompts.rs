use serde_json::{Value, json};

use crate::model::task::{Quadrant, Task};
use crate::ops::views::stats;

const IMPORT_INSTRUCTIONS: &str = "\
Analyze the following text which contains a list of tasks or meeting notes.
Break it down into individual actionable tasks.
For each task, estimate its Eisenhower Matrix quadrant based on urgency and importance:
- Q1: Urgent & Important (Crises, deadlines)
- Q2: Not Urgent & Important (Planning, growth, health)
- Q3: Urgent & Not Important (Interruptions, some calls/emails)
- Q4: Not Urgent & Not Important (Time wasters)

If it's unclear, default to Q2 or Backlog.
Extract relevant short tags (max 2) like \"Work\", \"Home\", \"Finance\".";

const REVIEW_INSTRUCTIONS: &str = "\
You are a productivity coach. Review this user's weekly performance based on their Eisenhower Matrix usage.
Give a concise, encouraging, but analytical summary (max 3 sentences).
Suggest one specific focus adjustment for next week.";

pub fn import_prompt(text: &str) -> String {
    format!("{}\n\nInput Text:\n{}", IMPORT_INSTRUCTIONS, text)
}

/// Array of `{title, quadrant, tags}`, every field required.
pub fn import_response_schema() -> Value {
    let quadrants: Vec<&str> = Quadrant::ALL.iter().map(|q| q.as_str()).collect();
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "title": { "type": "STRING" },
                "quadrant": { "type": "STRING", "enum": quadrants },
                "tags": { "type": "ARRAY", "items": { "type": "STRING" } },
            },
            "required": ["title", "quadrant", "tags"],
        },
    })
}

/// The numbers the weekly review is based on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReviewCounts {
    pub completed_q1: usize,
    pub completed_q2: usize,
    pub pending_q1: usize,
    pub pending_backlog: usize,
    pub total: usize,
}

impl ReviewCounts {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let s = stats(tasks);
        ReviewCounts {
            completed_q1: s.get(Quadrant::Q1).done,
            completed_q2: s.get(Quadrant::Q2).done,
            pending_q1: s.get(Quadrant::Q1).open,
            pending_backlog: s.get(Quadrant::Backlog).open,
            total: s.total,
        }
    }
}

pub fn review_prompt(counts: &ReviewCounts) -> String {
    format!(
        "{}\n\nData:\nCompleted Q1: {}\nCompleted Q2: {}\nPending Q1: {}\nPending Backlog: {}\nTotal Tasks: {}\n",
        REVIEW_INSTRUCTIONS,
        counts.completed_q1,
        counts.completed_q2,
        counts.pending_q1,
        counts.pending_backlog,
        counts.total,
    )
}
