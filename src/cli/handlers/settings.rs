use std::path::Path;

use chrono::{DateTime, Utc};

use crate::cli::Context;
use crate::cli::commands::{ConfigAction, ConfigCmd, RecoveryAction, RecoveryCmd};
use crate::cli::output::{format_recovery_entry, recovery_to_json};
use crate::io::config_io;
use crate::io::paths::{abbreviate_path, resolve_store_path};
use crate::io::recovery::{self, recovery_log_path};

use super::{CmdResult, print_json};

/// Default number of recovery entries shown
const RECOVERY_LIMIT: usize = 10;

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

pub(super) fn cmd_config(
    args: ConfigCmd,
    config_path: &Path,
    store_flag: Option<&Path>,
    json: bool,
) -> CmdResult {
    match args.action {
        ConfigAction::Path => {
            println!("{}", config_path.display());
            Ok(())
        }
        ConfigAction::Show => {
            let config = config_io::read_config(config_path)?;
            let store = resolve_store_path(store_flag, &config);
            if json {
                return print_json(&serde_json::json!({
                    "config_path": config_path,
                    "store_path": store,
                    "config": config,
                }));
            }
            println!("# config: {}", abbreviate_path(config_path));
            println!("# store:  {}", abbreviate_path(&store));
            print!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
        ConfigAction::Set(set) => {
            let mut doc = config_io::read_config_doc(config_path)?;
            config_io::set_value(&mut doc, &set.key, &set.value)?;
            config_io::write_config_doc(config_path, &doc)?;
            tracing::info!(key = %set.key, "config updated");
            println!("{} = {}", set.key, set.value);
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// recovery
// ---------------------------------------------------------------------------

pub(super) fn cmd_recovery(ctx: &Context, args: RecoveryCmd, json: bool) -> CmdResult {
    let dir = ctx.sidecar_dir();
    match args.action {
        Some(RecoveryAction::Path) => {
            println!("{}", recovery_log_path(&dir).display());
            Ok(())
        }
        Some(RecoveryAction::Prune(prune)) => {
            let before = prune
                .before
                .as_deref()
                .map(|s| {
                    DateTime::parse_from_rfc3339(s)
                        .map(|dt| dt.with_timezone(&Utc))
                        .map_err(|_| format!("invalid timestamp: {} (expected RFC 3339)", s))
                })
                .transpose()?;
            let removed = recovery::prune_recovery(&dir, before, prune.all)?;
            println!("Pruned {} recovery entr{}.", removed, if removed == 1 { "y" } else { "ies" });
            Ok(())
        }
        None => {
            let limit = args.limit.unwrap_or(RECOVERY_LIMIT);
            let entries = recovery::read_recovery_entries(&dir, Some(limit));
            if json {
                let out: Vec<_> = entries.iter().map(recovery_to_json).collect();
                return print_json(&out);
            }
            if entries.is_empty() {
                println!("Recovery log is empty.");
                return Ok(());
            }
            for (i, entry) in entries.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                for line in format_recovery_entry(entry) {
                    println!("{}", line);
                }
            }
            Ok(())
        }
    }
}
