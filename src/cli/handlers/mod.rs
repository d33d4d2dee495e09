mod ai;
mod settings;

use std::io::{BufRead, Write};
use std::path::Path;

use crate::cli::Context;
use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::paths::resolve_config_path;
use crate::model::board::Board;
use crate::model::task::{Quadrant, Task, TaskPatch};
use crate::ops::task_ops::{self, Direction};
use crate::ops::views::{self, YearMonth};
use crate::util::dates::{now_millis, parse_due_date};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let Some(cmd) = cli.command else {
        return Err("no subcommand given (run `ph` without arguments for the TUI)".into());
    };

    // Config commands must work even when the config file is broken
    if let Commands::Config(args) = cmd {
        let path = resolve_config_path(cli.config.as_deref());
        return settings::cmd_config(args, &path, cli.store.as_deref(), json);
    }

    let ctx = Context::from_flags(cli.store.as_deref(), cli.config.as_deref())?;
    crate::logging::init(&ctx.log_dir(), &ctx.config.log.level);
    tracing::debug!(store = %ctx.store_path.display(), "cli start");

    match cmd {
        // Read commands
        Commands::List(args) => cmd_list(&ctx, args, json),
        Commands::Show(args) => cmd_show(&ctx, args, json),
        Commands::Calendar(args) => cmd_calendar(&ctx, args, json),
        Commands::History(args) => cmd_history(&ctx, args, json),
        Commands::Stats => cmd_stats(&ctx, json),

        // Write commands
        Commands::Add(args) => cmd_add(&ctx, args, json),
        Commands::Edit(args) => cmd_edit(&ctx, args, json),
        Commands::Toggle(args) => cmd_toggle(&ctx, args, json),
        Commands::Mv(args) => cmd_mv(&ctx, args, json),
        Commands::Reorder(args) => cmd_reorder(&ctx, args),
        Commands::Rm(args) => cmd_rm(&ctx, args),
        Commands::ClearHistory(args) => cmd_clear_history(&ctx, args),

        // AI
        Commands::Import(args) => ai::cmd_import(&ctx, args, json),
        Commands::Review => ai::cmd_review(&ctx, json),

        // Maintenance
        Commands::Recovery(args) => settings::cmd_recovery(&ctx, args, json),
        Commands::Config(_) => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_quadrant(s: &str) -> Result<Quadrant, Box<dyn std::error::Error>> {
    s.parse::<Quadrant>().map_err(Box::<dyn std::error::Error>::from)
}

fn parse_due(s: &str) -> Result<i64, Box<dyn std::error::Error>> {
    parse_due_date(s).map_err(Box::<dyn std::error::Error>::from)
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn find_task<'a>(board: &'a Board, id: &str) -> Result<&'a Task, Box<dyn std::error::Error>> {
    board
        .find(id)
        .ok_or_else(|| task_ops::TaskError::NotFound(id.to_string()).into())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(ctx: &Context, args: ListArgs, json: bool) -> CmdResult {
    let board = ctx.load_board();
    let quadrants: Vec<Quadrant> = match args.quadrant.as_deref() {
        Some(q) => vec![parse_quadrant(q)?],
        None => Quadrant::ALL.to_vec(),
    };

    let listings: Vec<(Quadrant, Vec<&Task>)> = quadrants
        .into_iter()
        .map(|q| {
            let tasks = if args.all {
                board.tasks.iter().filter(|t| t.quadrant == q).collect()
            } else {
                views::matrix_view(&board.tasks, q)
            };
            (q, tasks)
        })
        .collect();

    if json {
        let out: Vec<QuadrantListJson> = listings
            .into_iter()
            .map(|(quadrant, tasks)| QuadrantListJson {
                quadrant,
                label: quadrant.label(),
                tasks,
            })
            .collect();
        return print_json(&out);
    }

    for (i, (quadrant, tasks)) in listings.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print_lines(&format_quadrant_listing(*quadrant, tasks));
    }
    Ok(())
}

fn cmd_show(ctx: &Context, args: IdArg, json: bool) -> CmdResult {
    let board = ctx.load_board();
    let id = task_ops::resolve_id(&board, &args.id)?;
    let task = find_task(&board, &id)?;
    if json {
        return print_json(task);
    }
    print_lines(&format_task_detail(task));
    Ok(())
}

fn cmd_calendar(ctx: &Context, args: CalendarArgs, json: bool) -> CmdResult {
    let month = match args.month.as_deref() {
        Some(m) => YearMonth::parse(m)?,
        None => YearMonth::current(),
    };
    let board = ctx.load_board();
    let cal = views::calendar_month(&board.tasks, month);
    if json {
        return print_json(&calendar_to_json(&cal));
    }
    print_lines(&format_calendar(&cal));
    Ok(())
}

fn cmd_history(ctx: &Context, args: HistoryArgs, json: bool) -> CmdResult {
    let board = ctx.load_board();
    let mut groups = views::history_view(&board.tasks, now_millis());

    if let Some(limit) = args.limit {
        let mut remaining = limit;
        groups.retain_mut(|g| {
            g.tasks.truncate(remaining);
            remaining -= g.tasks.len();
            !g.tasks.is_empty()
        });
    }

    if json {
        return print_json(&history_to_json(&groups));
    }
    if groups.is_empty() {
        println!("No completed tasks.");
        return Ok(());
    }
    print_lines(&format_history(&groups));
    Ok(())
}

fn cmd_stats(ctx: &Context, json: bool) -> CmdResult {
    let board = ctx.load_board();
    let stats = views::stats(&board.tasks);
    if json {
        return print_json(&stats_to_json(&stats));
    }
    print_lines(&format_stats(&stats));
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(ctx: &Context, args: AddArgs, json: bool) -> CmdResult {
    let quadrant = parse_quadrant(&args.quadrant)?;
    let title = args
        .title
        .as_deref()
        .map(task_ops::validate_title)
        .transpose()?;
    let due_date = args.due.as_deref().map(parse_due).transpose()?;

    let mut board = ctx.load_board();
    let id = task_ops::add_task(&mut board, quadrant, now_millis());
    task_ops::update_task(
        &mut board,
        &id,
        TaskPatch {
            title,
            description: args.desc.map(Some),
            tags: (!args.tags.is_empty()).then_some(args.tags),
            due_date: due_date.map(Some),
            ..TaskPatch::default()
        },
    );
    ctx.save_board(&board)?;

    let task = find_task(&board, &id)?;
    if json {
        return print_json(task);
    }
    println!(
        "Added {} to {} ({})",
        short_id(&task.id),
        task.quadrant,
        task.quadrant.label()
    );
    Ok(())
}

fn cmd_edit(ctx: &Context, args: EditArgs, json: bool) -> CmdResult {
    let title = args
        .title
        .as_deref()
        .map(task_ops::validate_title)
        .transpose()?;
    let description = if args.clear_desc {
        Some(None)
    } else {
        args.desc.map(Some)
    };
    let due_date = if args.clear_due {
        Some(None)
    } else {
        args.due.as_deref().map(parse_due).transpose()?.map(Some)
    };
    let tags = if args.clear_tags {
        Some(Vec::new())
    } else {
        (!args.tags.is_empty()).then_some(args.tags)
    };
    let patch = TaskPatch {
        title,
        description,
        quadrant: None,
        tags,
        due_date,
    };
    if patch.is_empty() {
        return Err("nothing to change (see `ph edit --help`)".into());
    }

    let mut board = ctx.load_board();
    let id = task_ops::resolve_id(&board, &args.id)?;
    task_ops::update_task(&mut board, &id, patch);
    ctx.save_board(&board)?;

    let task = find_task(&board, &id)?;
    if json {
        return print_json(task);
    }
    println!("{}", format_task_line(task));
    Ok(())
}

fn cmd_toggle(ctx: &Context, args: IdArg, json: bool) -> CmdResult {
    let mut board = ctx.load_board();
    let id = task_ops::resolve_id(&board, &args.id)?;
    task_ops::toggle_task(&mut board, &id, now_millis());
    ctx.save_board(&board)?;

    let task = find_task(&board, &id)?;
    if json {
        return print_json(task);
    }
    let verb = if task.completed { "Completed" } else { "Reopened" };
    println!("{} {}: {}", verb, short_id(&task.id), task.title);
    Ok(())
}

fn cmd_mv(ctx: &Context, args: MvArgs, json: bool) -> CmdResult {
    let quadrant = parse_quadrant(&args.quadrant)?;
    let mut board = ctx.load_board();
    let id = task_ops::resolve_id(&board, &args.id)?;
    let moved = task_ops::move_task(&mut board, &id, quadrant);
    if moved {
        ctx.save_board(&board)?;
    }

    let task = find_task(&board, &id)?;
    if json {
        return print_json(task);
    }
    if moved {
        println!("Moved {} to {} ({})", short_id(&id), quadrant, quadrant.label());
    } else {
        println!("{} is already in {}", short_id(&id), quadrant);
    }
    Ok(())
}

fn cmd_reorder(ctx: &Context, args: ReorderArgs) -> CmdResult {
    let direction: Direction = args.direction.parse()?;
    let mut board = ctx.load_board();
    let id = task_ops::resolve_id(&board, &args.id)?;
    if task_ops::reorder_task(&mut board, &id, direction) {
        ctx.save_board(&board)?;
        let task = find_task(&board, &id)?;
        let rank = views::matrix_view(&board.tasks, task.quadrant)
            .iter()
            .position(|t| t.id == id)
            .map_or(0, |p| p + 1);
        println!("{} is now #{} in {}", short_id(&id), rank, task.quadrant);
    } else {
        println!("{} cannot move {}", short_id(&id), args.direction.to_ascii_lowercase());
    }
    Ok(())
}

fn cmd_rm(ctx: &Context, args: IdArg) -> CmdResult {
    let mut board = ctx.load_board();
    let id = task_ops::resolve_id(&board, &args.id)?;
    let title = find_task(&board, &id)?.title.clone();
    task_ops::delete_task(&mut board, &id);
    ctx.save_board(&board)?;
    println!("Deleted {}: {}", short_id(&id), title);
    Ok(())
}

fn cmd_clear_history(ctx: &Context, args: ClearHistoryArgs) -> CmdResult {
    let mut board = ctx.load_board();
    let count = board.tasks.iter().filter(|t| t.completed).count();
    if count == 0 {
        println!("No completed tasks.");
        return Ok(());
    }
    if !args.yes && !confirm(&format!("Delete {} completed task(s)?", count))? {
        println!("Aborted.");
        return Ok(());
    }
    let removed = task_ops::clear_history(&mut board);
    ctx.save_board(&board)?;
    println!("Removed {} completed task(s).", removed);
    Ok(())
}

/// Ask a yes/no question on stdin; anything but y/yes is no.
fn confirm(question: &str) -> Result<bool, std::io::Error> {
    print!("{} [y/N] ", question);
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

/// Read the whole of `path`, or stdin when it is absent or `-`.
fn read_input(path: Option<&Path>) -> Result<String, std::io::Error> {
    match path {
        Some(p) if p != Path::new("-") => std::fs::read_to_string(p),
        _ => std::io::read_to_string(std::io::stdin()),
    }
}
