use super::task::Task;

/// The task store: one ordered sequence of tasks plus the active selection.
///
/// Order is only meaningful within a quadrant, where it is the manual
/// ranking. Every view is derived from `tasks`; nothing else holds task data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    pub tasks: Vec<Task>,
    /// ID of the selected task, if any
    pub selected: Option<String>,
}

impl Board {
    pub fn new(tasks: Vec<Task>) -> Self {
        Board {
            tasks,
            selected: None,
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Absolute index of a task in the backing sequence
    pub fn position(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    pub fn find(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.selected.as_deref().and_then(|id| self.find(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::Quadrant;

    fn board() -> Board {
        let mut done = Task::new("c".into(), "Done".into(), Quadrant::Q1, 0);
        done.completed = true;
        done.completed_at = Some(1);
        Board::new(vec![
            Task::new("a".into(), "A".into(), Quadrant::Q1, 0),
            Task::new("b".into(), "B".into(), Quadrant::Q2, 0),
            done,
            Task::new("d".into(), "D".into(), Quadrant::Q1, 0),
        ])
    }

    #[test]
    fn position_and_find() {
        let b = board();
        assert_eq!(b.position("d"), Some(3));
        assert_eq!(b.position("zzz"), None);
        assert_eq!(b.find("b").map(|t| t.title.as_str()), Some("B"));
    }

    #[test]
    fn selected_task_tracks_stale_ids() {
        let mut b = board();
        b.selected = Some("gone".into());
        assert!(b.selected_task().is_none());
        b.selected = Some("a".into());
        assert_eq!(b.selected_task().unwrap().title, "A");
    }
}
