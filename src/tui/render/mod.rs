pub mod ai_modal;
pub mod calendar_view;
pub mod edit_popup;
pub mod help_overlay;
mod helpers;
pub mod history_view;
pub mod matrix_view;
pub mod status_row;
pub mod tab_bar;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::Block;

use super::app::{App, HitTarget, View};

/// Mouse regions collected while drawing one frame
pub type HitMap = Vec<(Rect, HitTarget)>;

/// Main render function, dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: tab bar (2 rows) | content | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // tab bar + separator
            Constraint::Min(1),    // content area
            Constraint::Length(1), // status row
        ])
        .split(area);

    let mut hits: HitMap = Vec::new();

    tab_bar::render_tab_bar(frame, app, chunks[0], &mut hits);

    match app.view {
        View::Matrix => matrix_view::render_matrix_view(frame, app, chunks[1], &mut hits),
        View::Calendar => calendar_view::render_calendar_view(frame, app, chunks[1], &mut hits),
        View::History => history_view::render_history_view(frame, app, chunks[1], &mut hits),
    }

    // Popups (rendered on top of content)
    if app.edit.is_some() {
        edit_popup::render_edit_popup(frame, app, chunks[1]);
    }
    if app.ai_modal.is_some() {
        ai_modal::render_ai_modal(frame, app, chunks[1]);
    }
    if app.show_help {
        help_overlay::render_help_overlay(frame, app, frame.area());
    }

    status_row::render_status_row(frame, app, chunks[2]);

    app.hit_map = hits;
}
