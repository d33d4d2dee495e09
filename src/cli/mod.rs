pub mod commands;
pub mod handlers;
pub mod output;

use std::path::{Path, PathBuf};

use crate::io::config_io::{self, ConfigError};
use crate::io::paths::{data_dir, resolve_config_path, resolve_store_path, sidecar_dir};
use crate::io::store_io::{self, StoreError};
use crate::model::board::Board;
use crate::model::config::Config;
use crate::util::dates::now_millis;

/// Resolved locations and settings shared by the CLI and the TUI
#[derive(Debug, Clone)]
pub struct Context {
    pub config: Config,
    pub config_path: PathBuf,
    pub store_path: PathBuf,
}

impl Context {
    /// Resolve the config file, read it, then resolve the store path.
    pub fn from_flags(store: Option<&Path>, config: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = resolve_config_path(config);
        let config = config_io::read_config(&config_path)?;
        let store_path = resolve_store_path(store, &config);
        Ok(Context {
            config,
            config_path,
            store_path,
        })
    }

    /// Where the recovery log and UI state live
    pub fn sidecar_dir(&self) -> PathBuf {
        sidecar_dir(&self.store_path)
    }

    /// Where `planhub.log` goes
    pub fn log_dir(&self) -> PathBuf {
        data_dir()
    }

    pub fn load_board(&self) -> Board {
        Board::new(store_io::load_tasks(&self.store_path, now_millis()))
    }

    pub fn save_board(&self, board: &Board) -> Result<(), StoreError> {
        store_io::save_tasks(&self.store_path, &board.tasks)
    }
}
