use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ph", about = concat!("planhub v", env!("CARGO_PKG_VERSION"), " - an Eisenhower matrix for your terminal"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Task store file (default: $PLANHUB_STORE, config, or the XDG data dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Config file (default: $PLANHUB_CONFIG or the XDG config dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List open tasks per quadrant
    List(ListArgs),
    /// Add a task
    Add(AddArgs),
    /// Show task details
    Show(IdArg),
    /// Change a task's title, description, due date, or tags
    Edit(EditArgs),
    /// Toggle a task between open and completed
    Toggle(IdArg),
    /// Move a task to another quadrant
    Mv(MvArgs),
    /// Move a task up or down within its quadrant
    Reorder(ReorderArgs),
    /// Permanently delete a task
    Rm(IdArg),
    /// Show a month of due dates
    Calendar(CalendarArgs),
    /// Show completed tasks grouped by day
    History(HistoryArgs),
    /// Delete every completed task
    ClearHistory(ClearHistoryArgs),
    /// Show task counts per quadrant
    Stats,
    /// Turn free-form notes into tasks with the AI assistant
    Import(ImportArgs),
    /// Ask the AI assistant for a weekly review
    Review,
    /// View or change configuration
    Config(ConfigCmd),
    /// View or manage the recovery log
    Recovery(RecoveryCmd),
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ListArgs {
    /// Quadrant to list (Q1-Q4, Backlog; default: all)
    pub quadrant: Option<String>,
    /// Include completed tasks
    #[arg(long)]
    pub all: bool,
}

#[derive(Args)]
pub struct IdArg {
    /// Task ID (a unique prefix is enough)
    pub id: String,
}

#[derive(Args)]
pub struct CalendarArgs {
    /// Month to show as YYYY-MM (default: current month)
    #[arg(long)]
    pub month: Option<String>,
}

#[derive(Args)]
pub struct HistoryArgs {
    /// Maximum number of tasks to show
    #[arg(long)]
    pub limit: Option<usize>,
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Task title (default: "New Task")
    pub title: Option<String>,
    /// Quadrant (Q1-Q4, Backlog)
    #[arg(long, short = 'q', default_value = "Backlog")]
    pub quadrant: String,
    /// Tag (repeatable)
    #[arg(long = "tag", short = 't')]
    pub tags: Vec<String>,
    /// Due date as YYYY-MM-DD
    #[arg(long)]
    pub due: Option<String>,
    /// Description
    #[arg(long)]
    pub desc: Option<String>,
}

#[derive(Args)]
pub struct EditArgs {
    /// Task ID
    pub id: String,
    /// New title
    #[arg(long)]
    pub title: Option<String>,
    /// New description
    #[arg(long, conflicts_with = "clear_desc")]
    pub desc: Option<String>,
    /// Remove the description
    #[arg(long)]
    pub clear_desc: bool,
    /// New due date as YYYY-MM-DD
    #[arg(long, conflicts_with = "clear_due")]
    pub due: Option<String>,
    /// Remove the due date
    #[arg(long)]
    pub clear_due: bool,
    /// Replace tags (repeatable)
    #[arg(long = "tag", short = 't', conflicts_with = "clear_tags")]
    pub tags: Vec<String>,
    /// Remove all tags
    #[arg(long)]
    pub clear_tags: bool,
}

#[derive(Args)]
pub struct MvArgs {
    /// Task ID
    pub id: String,
    /// Target quadrant (Q1-Q4, Backlog)
    pub quadrant: String,
}

#[derive(Args)]
pub struct ReorderArgs {
    /// Task ID
    pub id: String,
    /// up or down
    pub direction: String,
}

#[derive(Args)]
pub struct ClearHistoryArgs {
    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Args)]
pub struct ImportArgs {
    /// File with notes to import (default: stdin; "-" also reads stdin)
    pub file: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ConfigCmd {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Set a value, e.g. `ph config set ai.model gemini-2.5-pro`
    Set(ConfigSetArgs),
    /// Print the config file path
    Path,
}

#[derive(Args)]
pub struct ConfigSetArgs {
    /// Dotted key (storage.path, ai.model, ui.colors.q1, ...)
    pub key: String,
    /// Value
    pub value: String,
}

// ---------------------------------------------------------------------------
// Recovery
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct RecoveryCmd {
    #[command(subcommand)]
    pub action: Option<RecoveryAction>,
    /// Maximum number of entries to show (default: 10)
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Subcommand)]
pub enum RecoveryAction {
    /// Remove old entries
    Prune(RecoveryPruneArgs),
    /// Print the path to the recovery log
    Path,
}

#[derive(Args)]
pub struct RecoveryPruneArgs {
    /// Remove entries older than this timestamp (RFC 3339; default: 30 days ago)
    #[arg(long)]
    pub before: Option<String>,
    /// Remove all entries
    #[arg(long)]
    pub all: bool,
}
