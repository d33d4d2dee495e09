use std::fs;
use std::path::{Path, PathBuf};

use crate::io::recovery::atomic_write;
use crate::model::config::Config;

/// Error type for config I/O
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("could not parse config document: {0}")]
    DocumentError(#[from] toml_edit::TomlError),
    #[error("unknown config key: {0}")]
    UnknownKey(String),
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Keys `ph config set` accepts, with the kind of value each takes.
const SETTABLE_KEYS: &[(&str, ValueKind)] = &[
    ("storage.path", ValueKind::Str),
    ("ai.model", ValueKind::Str),
    ("ai.endpoint", ValueKind::Str),
    ("ai.api_key_env", ValueKind::Str),
    ("ai.timeout_secs", ValueKind::Int),
    ("ui.show_key_hints", ValueKind::Bool),
    ("ui.kitty_keyboard", ValueKind::Bool),
    ("log.level", ValueKind::Str),
];

#[derive(Debug, Clone, Copy)]
enum ValueKind {
    Str,
    Int,
    Bool,
}

/// Read the config file. A missing file yields the defaults.
pub fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    Ok(toml::from_str(&text)?)
}

/// Read the raw toml_edit document for round-trip-safe editing.
/// A missing file yields an empty document.
pub fn read_config_doc(path: &Path) -> Result<toml_edit::DocumentMut, ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    Ok(text.parse()?)
}

/// Write the config document back to disk, preserving formatting.
pub fn write_config_doc(path: &Path, doc: &toml_edit::DocumentMut) -> Result<(), ConfigError> {
    atomic_write(path, doc.to_string().as_bytes()).map_err(|e| ConfigError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Set a dotted key (`ai.model`, `ui.colors.q1`, ...) in the document.
/// The result is re-parsed as a `Config` so a bad value never reaches disk.
pub fn set_value(
    doc: &mut toml_edit::DocumentMut,
    key: &str,
    raw: &str,
) -> Result<(), ConfigError> {
    let (section, field) = key
        .split_once('.')
        .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

    let value = if let Some(map) = field
        .strip_prefix("colors.")
        .or_else(|| field.strip_prefix("tag_colors."))
        && section == "ui"
    {
        if map.is_empty() {
            return Err(ConfigError::UnknownKey(key.to_string()));
        }
        toml_edit::value(raw)
    } else {
        let kind = SETTABLE_KEYS
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, kind)| *kind)
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        typed_value(key, raw, kind)?
    };

    let mut parts = key.split('.').peekable();
    let mut table = doc.as_table_mut();
    while let Some(part) = parts.next() {
        if parts.peek().is_none() {
            table[part] = value;
            break;
        }
        if !table.contains_key(part) {
            let mut sub = toml_edit::Table::new();
            sub.set_implicit(true);
            table[part] = toml_edit::Item::Table(sub);
        }
        table = table[part]
            .as_table_mut()
            .ok_or_else(|| ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("{} is not a table", part),
            })?;
    }

    toml::from_str::<Config>(&doc.to_string())?;
    Ok(())
}

fn typed_value(key: &str, raw: &str, kind: ValueKind) -> Result<toml_edit::Item, ConfigError> {
    let invalid = |message: &str| ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.to_string(),
    };
    match kind {
        ValueKind::Str => Ok(toml_edit::value(raw)),
        ValueKind::Int => raw
            .parse::<i64>()
            .ok()
            .filter(|n| *n > 0)
            .map(toml_edit::value)
            .ok_or_else(|| invalid("expected a positive integer")),
        ValueKind::Bool => match raw {
            "true" => Ok(toml_edit::value(true)),
            "false" => Ok(toml_edit::value(false)),
            _ => Err(invalid("expected true or false")),
        },
    }
}
