use std::sync::Arc;
use std::time::{Duration, Instant};

use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use tempfile::TempDir;

use crate::ai::fake::FakeModel;
use crate::ai::{AiError, LanguageModel};
use crate::cli::Context;
use crate::model::board::Board;
use crate::model::config::Config;
use crate::model::task::Task;
use crate::tui::app::App;

pub const TERM_W: u16 = 100;
pub const TERM_H: u16 = 30;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// Render the whole app at the default test size
pub fn render_app(app: &mut App) -> String {
    render_to_string(TERM_W, TERM_H, |frame, _| super::render(frame, app))
}

/// A context whose store, sidecar files, and config live in `dir`
pub fn test_context(dir: &TempDir) -> Context {
    Context {
        config: Config::default(),
        config_path: dir.path().join("config.toml"),
        store_path: dir.path().join("tasks.json"),
    }
}

/// An App over `tasks` backed by a temp store, talking to `model`
pub fn app_with_model(tasks: Vec<Task>, model: Arc<dyn LanguageModel>) -> (TempDir, App) {
    let dir = TempDir::new().unwrap();
    let app = App::new(test_context(&dir), Board::new(tasks), model);
    (dir, app)
}

/// An App over `tasks` whose AI calls fail as if no key were configured
pub fn app_with_tasks(tasks: Vec<Task>) -> (TempDir, App) {
    let model = FakeModel::new(|_| Err(AiError::MissingApiKey("API_KEY".into())));
    app_with_model(tasks, Arc::new(model))
}

/// Poll until the AI worker has delivered its result
pub fn wait_for_ai(app: &mut App) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while app.ai.is_busy() {
        app.poll_ai();
        assert!(Instant::now() < deadline, "timed out waiting for AI worker");
        std::thread::sleep(Duration::from_millis(5));
    }
}
