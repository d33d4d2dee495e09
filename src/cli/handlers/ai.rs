use crate::ai::bridge::IMPORT_FAILED_MESSAGE;
use crate::ai::{AiError, GeminiClient, LanguageModel, generate_weekly_review, parse_tasks_from_text};
use crate::cli::Context;
use crate::cli::commands::ImportArgs;
use crate::cli::output::{ImportJson, ReviewJson, format_task_line};
use crate::io::recovery::{RecoveryCategory, RecoveryEntry, log_recovery};
use crate::model::board::Board;
use crate::ops::task_ops;
use crate::util::dates::now_millis;

use super::{CmdResult, print_json, read_input};

pub(super) fn cmd_import(ctx: &Context, args: ImportArgs, json: bool) -> CmdResult {
    let text = read_input(args.file.as_deref())?;
    if text.trim().is_empty() {
        return Err("nothing to import: input is empty".into());
    }

    let client = GeminiClient::from_config(&ctx.config.ai);
    let mut board = ctx.load_board();
    let ids = import_into(ctx, &client, &mut board, &text)?;
    ctx.save_board(&board)?;

    let imported: Vec<_> = ids.iter().filter_map(|id| board.find(id)).collect();
    if json {
        return print_json(&ImportJson { imported });
    }
    println!("Imported {} task(s).", imported.len());
    for task in imported {
        println!("  {}  [{}]", format_task_line(task), task.quadrant.label());
    }
    Ok(())
}

/// All-or-nothing: the board is only touched after a fully parsed answer.
fn import_into(
    ctx: &Context,
    model: &dyn LanguageModel,
    board: &mut Board,
    text: &str,
) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    match parse_tasks_from_text(model, text) {
        Ok(items) => Ok(task_ops::import_items(board, items, now_millis())),
        Err(e) => {
            tracing::warn!(error = %e, "AI import failed");
            if let AiError::Parse { raw, .. } = &e {
                log_recovery(
                    &ctx.sidecar_dir(),
                    RecoveryEntry::new(RecoveryCategory::Import, "unparseable AI import response")
                        .field("Error", &e)
                        .body(raw.clone()),
                );
            }
            Err(format!("{} ({})", IMPORT_FAILED_MESSAGE, e).into())
        }
    }
}

pub(super) fn cmd_review(ctx: &Context, json: bool) -> CmdResult {
    let client = GeminiClient::from_config(&ctx.config.ai);
    let board = ctx.load_board();
    let review = generate_weekly_review(&client, &board.tasks);
    if json {
        return print_json(&ReviewJson { review: &review });
    }
    println!("{}", review);
    Ok(())
}
