use std::io;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Datelike, Local, NaiveDate};
use crossterm::event::{
    self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    Event, KeyEventKind, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
    PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
    supports_keyboard_enhancement,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;

use crate::ai::bridge::IMPORT_FAILED_MESSAGE;
use crate::ai::worker::{AiJob, AiOutcome, AiWorker};
use crate::ai::{AiError, GeminiClient, LanguageModel};
use crate::cli::Context;
use crate::io::recovery::{RecoveryCategory, RecoveryEntry, log_recovery};
use crate::io::store_io::save_or_recover;
use crate::model::board::Board;
use crate::model::task::{Quadrant, Task, TaskPatch};
use crate::ops::task_ops::{self, DEFAULT_TITLE};
use crate::ops::views::{self, YearMonth};
use crate::util::dates::{format_day, now_millis, parse_due_date};

use super::input;
use super::input::drag::DragState;
use super::render;
use super::theme::Theme;

/// Which view is currently displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Matrix,
    Calendar,
    History,
}

impl View {
    pub const ALL: [View; 3] = [View::Matrix, View::Calendar, View::History];

    /// Name persisted in ui-state.json
    pub fn as_str(self) -> &'static str {
        match self {
            View::Matrix => "matrix",
            View::Calendar => "calendar",
            View::History => "history",
        }
    }

    pub fn parse(s: &str) -> Option<View> {
        View::ALL.into_iter().find(|v| v.as_str() == s)
    }

    pub fn label(self) -> &'static str {
        match self {
            View::Matrix => "Matrix",
            View::Calendar => "Calendar",
            View::History => "History",
        }
    }

    pub fn next(self) -> View {
        match self {
            View::Matrix => View::Calendar,
            View::Calendar => View::History,
            View::History => View::Matrix,
        }
    }

    pub fn prev(self) -> View {
        match self {
            View::Matrix => View::History,
            View::Calendar => View::Matrix,
            View::History => View::Calendar,
        }
    }
}

/// Current interaction mode. Edit and Modal own the keyboard as text input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    Edit,
    Modal,
    Confirm,
}

/// Field of the edit popup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Title,
    Description,
    Due,
    Tags,
}

impl EditField {
    pub const ALL: [EditField; 4] = [
        EditField::Title,
        EditField::Description,
        EditField::Due,
        EditField::Tags,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EditField::Title => "Title",
            EditField::Description => "Notes",
            EditField::Due => "Due",
            EditField::Tags => "Tags",
        }
    }

    pub fn next(self) -> EditField {
        match self {
            EditField::Title => EditField::Description,
            EditField::Description => EditField::Due,
            EditField::Due => EditField::Tags,
            EditField::Tags => EditField::Title,
        }
    }

    pub fn prev(self) -> EditField {
        match self {
            EditField::Title => EditField::Tags,
            EditField::Description => EditField::Title,
            EditField::Due => EditField::Description,
            EditField::Tags => EditField::Due,
        }
    }
}

/// Buffers of the edit popup, one per field. `cursor` is a byte offset into
/// the active field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditState {
    pub task_id: String,
    pub field: EditField,
    pub title: String,
    pub description: String,
    pub due: String,
    pub tags: String,
    pub cursor: usize,
    pub error: Option<String>,
}

impl EditState {
    pub fn for_task(task: &Task) -> Self {
        let title = task.title.clone();
        EditState {
            task_id: task.id.clone(),
            field: EditField::Title,
            cursor: title.len(),
            title,
            description: task.description.clone().unwrap_or_default(),
            due: task.due_date.map(format_day).unwrap_or_default(),
            tags: task.tags.join(", "),
            error: None,
        }
    }

    pub fn buffer(&self, field: EditField) -> &str {
        match field {
            EditField::Title => &self.title,
            EditField::Description => &self.description,
            EditField::Due => &self.due,
            EditField::Tags => &self.tags,
        }
    }

    /// Active buffer and cursor, borrowed together for editing
    pub fn active_mut(&mut self) -> (&mut String, &mut usize) {
        let buf = match self.field {
            EditField::Title => &mut self.title,
            EditField::Description => &mut self.description,
            EditField::Due => &mut self.due,
            EditField::Tags => &mut self.tags,
        };
        (buf, &mut self.cursor)
    }

    pub fn focus(&mut self, field: EditField) {
        self.field = field;
        self.cursor = self.buffer(field).len();
    }

    /// Diff the buffers against `task`. A blank title keeps the old one;
    /// an unparseable due date is an error and nothing is applied.
    pub fn to_patch(&self, task: &Task) -> Result<TaskPatch, String> {
        let mut patch = TaskPatch::default();

        if let Ok(title) = task_ops::validate_title(&self.title)
            && title != task.title
        {
            patch.title = Some(title);
        }

        let description = Some(self.description.trim())
            .filter(|d| !d.is_empty())
            .map(str::to_string);
        if description != task.description {
            patch.description = Some(description);
        }

        let due = match self.due.trim() {
            "" => None,
            s => Some(parse_due_date(s)?),
        };
        if due.map(format_day) != task.due_date.map(format_day) {
            patch.due_date = Some(due);
        }

        let tags: Vec<String> = self
            .tags
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        if tags != task.tags {
            patch.tags = Some(tags);
        }

        Ok(patch)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiModalKind {
    Import,
    Review,
}

/// The AI assistant popup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiModal {
    pub kind: AiModalKind,
    /// Import text (byte cursor in `cursor`)
    pub input: String,
    pub cursor: usize,
    pub loading: bool,
    pub review: Option<String>,
    pub error: Option<String>,
}

impl AiModal {
    fn new(kind: AiModalKind) -> Self {
        AiModal {
            kind,
            input: String::new(),
            cursor: 0,
            loading: false,
            review: None,
            error: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    ClearHistory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmState {
    pub message: String,
    pub action: ConfirmAction,
}

/// What a screen region stands for, recorded at render time for mouse input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitTarget {
    Tab(View),
    /// A quadrant pane or the backlog panel
    Pane(Quadrant),
    Task { id: String, quadrant: Quadrant },
    Day(u32),
    HistoryRow(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

/// Main application state
pub struct App {
    pub ctx: Context,
    pub board: Board,
    pub view: View,
    pub mode: Mode,
    /// Matrix shows Q1 alone
    pub focus_mode: bool,
    pub should_quit: bool,
    pub theme: Theme,
    pub show_help: bool,
    /// Pane under the matrix cursor
    pub pane: Quadrant,
    pub calendar_month: YearMonth,
    /// Day of `calendar_month` under the cursor
    pub calendar_day: u32,
    /// Index into the cursor day's tasks
    pub calendar_task: usize,
    /// Index into the flattened history list
    pub history_cursor: usize,
    pub edit: Option<EditState>,
    pub ai_modal: Option<AiModal>,
    pub confirm: Option<ConfirmState>,
    pub drag: DragState,
    /// Regions from the last frame, topmost last
    pub hit_map: Vec<(Rect, HitTarget)>,
    pub status: Option<StatusMessage>,
    pub ai: AiWorker,
}

impl App {
    pub fn new(ctx: Context, board: Board, model: Arc<dyn LanguageModel>) -> Self {
        let theme = Theme::from_config(&ctx.config.ui);
        let today = Local::now().date_naive();
        App {
            ctx,
            board,
            view: View::Matrix,
            mode: Mode::Navigate,
            focus_mode: false,
            should_quit: false,
            theme,
            show_help: false,
            pane: Quadrant::Q1,
            calendar_month: YearMonth::of(today),
            calendar_day: today.day(),
            calendar_task: 0,
            history_cursor: 0,
            edit: None,
            ai_modal: None,
            confirm: None,
            drag: DragState::default(),
            hit_map: Vec::new(),
            status: None,
            ai: AiWorker::new(model),
        }
    }

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error: false,
        });
    }

    pub fn set_error(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error: true,
        });
    }

    /// Write the store through after a mutation
    pub fn persist(&mut self) {
        if !save_or_recover(&self.ctx.store_path, &self.board.tasks) {
            self.set_error("Could not save tasks; see `ph recovery`");
        }
    }

    pub fn switch_view(&mut self, view: View) {
        self.view = view;
        self.drag.cancel();
        // The selection may have been completed from another view
        if view == View::Matrix {
            self.reconcile_selection(None);
        }
    }

    // -----------------------------------------------------------------------
    // Matrix cursor
    // -----------------------------------------------------------------------

    /// Open tasks of a pane, as shown
    pub fn pane_tasks(&self, quadrant: Quadrant) -> Vec<&Task> {
        views::matrix_view(&self.board.tasks, quadrant)
    }

    /// Position of the selection within the cursor pane
    pub fn pane_index(&self) -> Option<usize> {
        let id = self.board.selected.as_deref()?;
        self.pane_tasks(self.pane).iter().position(|t| t.id == id)
    }

    /// Move the cursor to `quadrant`, selecting the task at `index` (clamped)
    pub fn select_in_pane(&mut self, quadrant: Quadrant, index: usize) {
        self.pane = quadrant;
        let tasks = self.pane_tasks(quadrant);
        let id = tasks
            .get(index.min(tasks.len().saturating_sub(1)))
            .map(|t| t.id.clone());
        self.board.selected = id;
    }

    /// Select a task, moving the cursor to its pane
    pub fn select_task(&mut self, id: &str) {
        if let Some(task) = self.board.find(id) {
            self.pane = task.quadrant;
            self.board.selected = Some(task.id.clone());
        }
    }

    /// After a mutation: follow the selection to its pane, or if it is no
    /// longer visible select whatever now sits at `fallback` in the pane.
    pub fn reconcile_selection(&mut self, fallback: Option<usize>) {
        let visible = self
            .board
            .selected_task()
            .filter(|t| !t.completed && (!self.focus_mode || t.quadrant == Quadrant::Q1))
            .map(|t| t.quadrant);
        if self.focus_mode {
            self.pane = Quadrant::Q1;
        }
        match visible {
            Some(q) => self.pane = q,
            None => match fallback {
                Some(idx) => self.select_in_pane(self.pane, idx),
                None => self.board.selected = None,
            },
        }
    }

    pub fn toggle_focus_mode(&mut self) {
        self.focus_mode = !self.focus_mode;
        let fallback = self.pane_index();
        self.reconcile_selection(fallback.or(Some(0)));
    }

    // -----------------------------------------------------------------------
    // Calendar cursor
    // -----------------------------------------------------------------------

    pub fn calendar_date(&self) -> Option<NaiveDate> {
        let m = self.calendar_month;
        NaiveDate::from_ymd_opt(m.year, m.month, self.calendar_day)
    }

    pub fn set_calendar_date(&mut self, date: NaiveDate) {
        self.calendar_month = YearMonth::of(date);
        self.calendar_day = date.day();
        self.calendar_task = 0;
    }

    /// Jump to another month, keeping the day where it exists
    pub fn set_calendar_month(&mut self, month: YearMonth) {
        self.calendar_month = month;
        self.calendar_day = self.calendar_day.clamp(1, month.days_in_month().max(1));
        self.calendar_task = 0;
    }

    /// IDs of the tasks due on the cursor day
    pub fn calendar_day_tasks(&self) -> Vec<String> {
        let cal = views::calendar_month(&self.board.tasks, self.calendar_month);
        cal.day(self.calendar_day)
            .map(|cell| cell.tasks.iter().map(|t| t.id.clone()).collect())
            .unwrap_or_default()
    }

    // -----------------------------------------------------------------------
    // History cursor
    // -----------------------------------------------------------------------

    /// Completed task IDs in history order
    pub fn history_ids(&self) -> Vec<String> {
        views::history_view(&self.board.tasks, now_millis())
            .iter()
            .flat_map(|g| g.tasks.iter().map(|t| t.id.clone()))
            .collect()
    }

    pub fn clamp_history_cursor(&mut self) {
        let len = self.history_ids().len();
        self.history_cursor = self.history_cursor.min(len.saturating_sub(1));
    }

    // -----------------------------------------------------------------------
    // Edit popup
    // -----------------------------------------------------------------------

    pub fn start_edit(&mut self, id: &str) {
        if let Some(task) = self.board.find(id) {
            self.edit = Some(EditState::for_task(task));
            self.mode = Mode::Edit;
        }
    }

    /// Add a task and open it for editing with an empty title buffer, so a
    /// blank save keeps the default title.
    pub fn add_and_edit(&mut self, quadrant: Quadrant) {
        let id = task_ops::add_task(&mut self.board, quadrant, now_millis());
        self.persist();
        if self.view == View::Matrix && (!self.focus_mode || quadrant == Quadrant::Q1) {
            self.pane = quadrant;
        }
        self.start_edit(&id);
        if let Some(edit) = &mut self.edit {
            edit.title.clear();
            edit.cursor = 0;
        }
    }

    pub fn cancel_edit(&mut self) {
        self.edit = None;
        self.mode = Mode::Navigate;
    }

    pub fn commit_edit(&mut self) {
        let Some(mut edit) = self.edit.take() else {
            self.mode = Mode::Navigate;
            return;
        };
        let Some(task) = self.board.find(&edit.task_id) else {
            self.mode = Mode::Navigate;
            return;
        };
        match edit.to_patch(task) {
            Ok(patch) => {
                let blank_title = edit.title.trim().is_empty() && task.title != DEFAULT_TITLE;
                if task_ops::update_task(&mut self.board, &edit.task_id, patch) {
                    self.persist();
                }
                if blank_title {
                    self.set_status("Title cannot be empty; kept the previous title");
                }
                self.mode = Mode::Navigate;
                let fallback = self.pane_index();
                self.reconcile_selection(fallback);
            }
            Err(msg) => {
                edit.error = Some(msg);
                edit.focus(EditField::Due);
                self.edit = Some(edit);
            }
        }
    }

    // -----------------------------------------------------------------------
    // AI
    // -----------------------------------------------------------------------

    pub fn open_import(&mut self) {
        self.ai.cancel();
        self.ai_modal = Some(AiModal::new(AiModalKind::Import));
        self.mode = Mode::Modal;
    }

    pub fn open_review(&mut self) {
        let mut modal = AiModal::new(AiModalKind::Review);
        modal.loading = true;
        self.ai_modal = Some(modal);
        self.mode = Mode::Modal;
        self.ai.submit(AiJob::Review(self.board.tasks.clone()));
    }

    /// Send the import text; ignored while a request runs or the text is blank
    pub fn submit_import(&mut self) {
        let Some(modal) = &mut self.ai_modal else {
            return;
        };
        if modal.kind != AiModalKind::Import || modal.loading || modal.input.trim().is_empty() {
            return;
        }
        modal.loading = true;
        modal.error = None;
        let text = modal.input.clone();
        self.ai.submit(AiJob::Import(text));
    }

    /// Close the popup; a request still running is abandoned
    pub fn close_modal(&mut self) {
        self.ai.cancel();
        self.ai_modal = None;
        self.mode = Mode::Navigate;
    }

    /// Apply a finished AI request, if one has arrived
    pub fn poll_ai(&mut self) {
        let Some(outcome) = self.ai.poll() else {
            return;
        };
        match outcome {
            AiOutcome::Imported(Ok(items)) => {
                let ids = task_ops::import_items(&mut self.board, items, now_millis());
                self.persist();
                self.ai_modal = None;
                self.mode = Mode::Navigate;
                self.set_status(format!("Imported {} task(s)", ids.len()));
            }
            AiOutcome::Imported(Err(e)) => {
                tracing::warn!(error = %e, "AI import failed");
                if let AiError::Parse { raw, .. } = &e {
                    log_recovery(
                        &self.ctx.sidecar_dir(),
                        RecoveryEntry::new(RecoveryCategory::Import, "unparseable AI import response")
                            .field("Error", &e)
                            .body(raw.clone()),
                    );
                }
                if let Some(modal) = &mut self.ai_modal {
                    modal.loading = false;
                    modal.error = Some(IMPORT_FAILED_MESSAGE.to_string());
                }
            }
            AiOutcome::Reviewed(text) => {
                if let Some(modal) = &mut self.ai_modal {
                    modal.loading = false;
                    modal.review = Some(text);
                }
            }
        }
    }
}

/// Restore UI state from ui-state.json
pub fn restore_ui_state(app: &mut App) {
    use crate::io::state::read_ui_state;

    let Some(ui_state) = read_ui_state(&app.ctx.sidecar_dir()) else {
        return;
    };

    if let Some(view) = View::parse(&ui_state.view) {
        app.view = view;
    }
    app.focus_mode = ui_state.focus_mode;
    if let Some(id) = ui_state.selected.as_deref() {
        app.select_task(id);
    }
    if let Some(month) = ui_state
        .calendar_month
        .as_deref()
        .and_then(|m| YearMonth::parse(m).ok())
    {
        app.set_calendar_month(month);
    }
    app.reconcile_selection(None);
}

/// Save UI state to ui-state.json
pub fn save_ui_state(app: &App) {
    use crate::io::state::{UiState, write_ui_state};

    let ui_state = UiState {
        view: app.view.as_str().to_string(),
        focus_mode: app.focus_mode,
        selected: app.board.selected.clone(),
        calendar_month: Some(format!(
            "{:04}-{:02}",
            app.calendar_month.year, app.calendar_month.month
        )),
    };

    if let Err(e) = write_ui_state(&app.ctx.sidecar_dir(), &ui_state) {
        tracing::debug!(error = %e, "could not save UI state");
    }
}

/// Run the TUI application
pub fn run(ctx: Context) -> Result<(), Box<dyn std::error::Error>> {
    let board = ctx.load_board();
    let model: Arc<dyn LanguageModel> = Arc::new(GeminiClient::from_config(&ctx.config.ai));
    let kitty_wanted = ctx.config.ui.kitty_keyboard != Some(false);

    let mut app = App::new(ctx, board, model);

    // Restore saved UI state
    restore_ui_state(&mut app);
    tracing::info!(
        store = %app.ctx.store_path.display(),
        tasks = app.board.len(),
        "tui start"
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let kitty = kitty_wanted && supports_keyboard_enhancement().unwrap_or(false);
    if kitty {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        )?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        if kitty {
            let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
        }
        let _ = execute!(
            io::stdout(),
            DisableBracketedPaste,
            DisableMouseCapture,
            LeaveAlternateScreen
        );
        original_hook(panic_info);
    }));

    // Run event loop
    let result = run_event_loop(&mut terminal, &mut app);

    app.ai.cancel();
    save_ui_state(&app);

    // Restore terminal
    disable_raw_mode()?;
    if kitty {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;
    tracing::info!("tui exit");

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut save_counter = 0u32;
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    input::handle_key(app, key);
                    // Debounced state save: every ~5 key presses
                    save_counter += 1;
                    if save_counter >= 5 {
                        save_ui_state(app);
                        save_counter = 0;
                    }
                }
                Event::Mouse(mouse) => input::handle_mouse(app, mouse),
                Event::Paste(text) => input::handle_paste(app, &text),
                _ => {}
            }
        }

        app.poll_ai();

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
