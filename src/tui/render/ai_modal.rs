use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};

use crate::tui::app::{AiModal, AiModalKind, App};

use super::helpers::{CURSOR, centered_rect, input_lines};

const IMPORT_HELP: &str = "Paste a messy list of tasks, emails, or meeting notes below. \
Gemini will split them, tag them, and sort them into the Matrix for you.";

const IMPORT_PLACEHOLDER: [&str; 3] = [
    "- Buy milk",
    "- Call Mom about weekend",
    "- Finish the Q3 report by Friday...",
];

/// Render the AI assistant popup (import or weekly review)
pub fn render_ai_modal(frame: &mut Frame, app: &App, area: Rect) {
    let Some(modal) = &app.ai_modal else {
        return;
    };
    let popup = centered_rect(70, 80, area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(app.theme.highlight))
        .title(Line::from(vec![
            Span::styled(" \u{2726} ", Style::default().fg(app.theme.highlight)),
            Span::styled(
                "Gemini AI Assistant ",
                Style::default()
                    .fg(app.theme.text_bright)
                    .add_modifier(Modifier::BOLD),
            ),
        ]))
        .style(Style::default().bg(app.theme.background));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    match modal.kind {
        AiModalKind::Import => render_import(frame, app, modal, inner),
        AiModalKind::Review => render_review(frame, app, modal, inner),
    }
}

fn render_import(frame: &mut Frame, app: &App, modal: &AiModal, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // description
            Constraint::Min(3),    // input box
            Constraint::Length(1), // error
            Constraint::Length(1), // footer
        ])
        .split(area);

    let help = Paragraph::new(Span::styled(IMPORT_HELP, Style::default().fg(app.theme.text)))
        .wrap(Wrap { trim: true });
    frame.render_widget(help, chunks[0]);

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(if modal.loading {
            app.theme.dim
        } else {
            app.theme.selection_border
        }));
    let input_area = input_block.inner(chunks[1]);
    frame.render_widget(input_block, chunks[1]);

    let text_style = Style::default().fg(app.theme.text_bright);
    let cursor_style = Style::default().fg(app.theme.highlight);
    let lines: Vec<Line> = if modal.input.is_empty() {
        let placeholder = Style::default()
            .fg(app.theme.dim)
            .add_modifier(Modifier::ITALIC);
        let mut lines = vec![Line::from(vec![
            Span::styled(CURSOR, cursor_style),
            Span::styled(IMPORT_PLACEHOLDER[0], placeholder),
        ])];
        lines.extend(
            IMPORT_PLACEHOLDER[1..]
                .iter()
                .map(|l| Line::from(Span::styled(*l, placeholder))),
        );
        lines
    } else {
        input_lines(&modal.input, modal.cursor, text_style, cursor_style)
    };

    // Keep the cursor line in view
    let cursor_line = modal.input[..modal.cursor.min(modal.input.len())]
        .matches('\n')
        .count() as u16;
    let scroll = cursor_line.saturating_sub(input_area.height.saturating_sub(1));
    frame.render_widget(Paragraph::new(lines).scroll((scroll, 0)), input_area);

    if let Some(err) = &modal.error {
        frame.render_widget(
            Paragraph::new(Span::styled(err.as_str(), Style::default().fg(app.theme.red))),
            chunks[2],
        );
    }

    let footer = if modal.loading {
        Line::from(Span::styled(
            "\u{2026} Sorting with Gemini",
            Style::default().fg(app.theme.highlight),
        ))
    } else {
        Line::from(vec![
            Span::styled(
                "Ctrl+S",
                Style::default()
                    .fg(app.theme.highlight)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" Sort & Import   ", Style::default().fg(app.theme.text)),
            Span::styled(
                "Esc",
                Style::default()
                    .fg(app.theme.highlight)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" close", Style::default().fg(app.theme.text)),
        ])
    };
    frame.render_widget(Paragraph::new(footer.right_aligned()), chunks[3]);
}

fn render_review(frame: &mut Frame, app: &App, modal: &AiModal, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // heading
            Constraint::Min(1),    // review text
            Constraint::Length(1), // footer
        ])
        .split(area);

    frame.render_widget(
        Paragraph::new(Span::styled(
            "Weekly Review",
            Style::default()
                .fg(app.theme.text_bright)
                .add_modifier(Modifier::BOLD),
        )),
        chunks[0],
    );

    let body = match &modal.review {
        Some(text) => Paragraph::new(text.as_str()).style(Style::default().fg(app.theme.text)),
        None => Paragraph::new("Analyzing your productivity...")
            .style(Style::default().fg(app.theme.dim)),
    };
    frame.render_widget(body.wrap(Wrap { trim: false }), chunks[1]);

    let footer = Line::from(vec![
        Span::styled(
            "Enter",
            Style::default()
                .fg(app.theme.highlight)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" close", Style::default().fg(app.theme.text)),
    ]);
    frame.render_widget(Paragraph::new(footer.right_aligned()), chunks[2]);
}
