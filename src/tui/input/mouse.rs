use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::model::task::Quadrant;
use crate::ops::task_ops;
use crate::tui::app::{App, HitTarget, Mode};

/// Topmost region under the pointer in the last rendered frame
fn hit_test(app: &App, column: u16, row: u16) -> Option<HitTarget> {
    app.hit_map
        .iter()
        .rev()
        .find(|(r, _)| {
            column >= r.x && column < r.x + r.width && row >= r.y && row < r.y + r.height
        })
        .map(|(_, target)| target.clone())
}

/// Pane a hit belongs to, for dropping
fn drop_target(hit: Option<&HitTarget>) -> Option<Quadrant> {
    match hit? {
        HitTarget::Pane(q) => Some(*q),
        HitTarget::Task { quadrant, .. } => Some(*quadrant),
        _ => None,
    }
}

/// Handle a mouse event. Only active while navigating without overlays.
pub fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.mode != Mode::Navigate || app.show_help {
        app.drag.cancel();
        return;
    }
    let hit = hit_test(app, mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => match hit {
            Some(HitTarget::Task { id, .. }) => {
                app.select_task(&id);
                app.drag.start(id);
            }
            Some(HitTarget::Pane(q)) => {
                app.pane = q;
                app.board.selected = None;
            }
            Some(HitTarget::Tab(view)) => app.switch_view(view),
            Some(HitTarget::Day(day)) => {
                app.calendar_day = day;
                app.calendar_task = 0;
            }
            Some(HitTarget::HistoryRow(i)) => app.history_cursor = i,
            None => {}
        },
        MouseEventKind::Drag(MouseButton::Left) => app.drag.hover(drop_target(hit.as_ref())),
        MouseEventKind::Up(MouseButton::Left) => {
            let Some((id, target)) = app.drag.release(drop_target(hit.as_ref())) else {
                return;
            };
            if task_ops::move_task(&mut app.board, &id, target) {
                app.persist();
                app.set_status(format!("Moved to {} ({})", target, target.label()));
            }
            let fallback = app.pane_index();
            app.reconcile_selection(fallback);
        }
        MouseEventKind::ScrollDown | MouseEventKind::ScrollUp => {
            let down = mouse.kind == MouseEventKind::ScrollDown;
            scroll(app, down);
        }
        _ => {}
    }
}

fn scroll(app: &mut App, down: bool) {
    use crate::tui::app::View;
    match app.view {
        View::Matrix => {
            let idx = app.pane_index().unwrap_or(0);
            let next = if down { idx + 1 } else { idx.saturating_sub(1) };
            app.select_in_pane(app.pane, next);
        }
        View::History => {
            let len = app.history_ids().len();
            if down {
                app.history_cursor = (app.history_cursor + 1).min(len.saturating_sub(1));
            } else {
                app.history_cursor = app.history_cursor.saturating_sub(1);
            }
        }
        View::Calendar => {
            let len = app.calendar_day_tasks().len();
            if down {
                app.calendar_task = (app.calendar_task + 1).min(len.saturating_sub(1));
            } else {
                app.calendar_task = app.calendar_task.saturating_sub(1);
            }
        }
    }
}
