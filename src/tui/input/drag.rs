use crate::model::task::Quadrant;

/// Mouse drag of a task card toward a quadrant pane or the backlog panel.
///
/// Press on a card starts the drag, motion records the pane under the
/// pointer, release yields the move to apply. A drag only ever changes a
/// task's quadrant; it never reorders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DragState {
    dragged: Option<String>,
    over: Option<Quadrant>,
}

impl DragState {
    pub fn start(&mut self, id: impl Into<String>) {
        self.dragged = Some(id.into());
        self.over = None;
    }

    /// Pointer moved. Every pane accepts a drop, so this just remembers it.
    pub fn hover(&mut self, target: Option<Quadrant>) {
        if self.dragged.is_some() {
            self.over = target;
        }
    }

    /// Pointer released over `target`. Always ends the drag; returns the
    /// task and destination when released over a pane.
    pub fn release(&mut self, target: Option<Quadrant>) -> Option<(String, Quadrant)> {
        let dragged = self.dragged.take();
        self.over = None;
        Some((dragged?, target?))
    }

    pub fn cancel(&mut self) {
        self.dragged = None;
        self.over = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragged.is_some()
    }

    pub fn dragged(&self) -> Option<&str> {
        self.dragged.as_deref()
    }

    /// Pane the pointer is over while dragging
    pub fn over(&self) -> Option<Quadrant> {
        self.over
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_over_pane_yields_move() {
        let mut drag = DragState::default();
        drag.start("t1");
        drag.hover(Some(Quadrant::Q3));
        assert_eq!(drag.over(), Some(Quadrant::Q3));
        assert_eq!(
            drag.release(Some(Quadrant::Q2)),
            Some(("t1".to_string(), Quadrant::Q2))
        );
        assert!(!drag.is_dragging());
        assert_eq!(drag.over(), None);
    }

    #[test]
    fn release_elsewhere_just_clears() {
        let mut drag = DragState::default();
        drag.start("t1");
        assert_eq!(drag.release(None), None);
        assert!(!drag.is_dragging());
    }

    #[test]
    fn release_without_drag_is_nothing() {
        let mut drag = DragState::default();
        assert_eq!(drag.release(Some(Quadrant::Q1)), None);
    }

    #[test]
    fn hover_ignored_when_idle() {
        let mut drag = DragState::default();
        drag.hover(Some(Quadrant::Q4));
        assert_eq!(drag.over(), None);
    }

    #[test]
    fn backlog_panel_is_a_drop_target() {
        let mut drag = DragState::default();
        drag.start("t9");
        assert_eq!(
            drag.release(Some(Quadrant::Backlog)),
            Some(("t9".to_string(), Quadrant::Backlog))
        );
    }
}
