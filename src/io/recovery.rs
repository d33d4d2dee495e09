use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;

/// Size above which old entries are trimmed on append (1 MB).
const MAX_LOG_SIZE: u64 = 1_048_576;

/// Default number of days before entries are prunable.
pub const PRUNE_AGE_DAYS: i64 = 30;

const FILE_HEADER: &str = "\
<!-- planhub recovery log: data that could not be loaded or saved normally.
     If tasks went missing, look here.
     View with: ph recovery
     Prune old entries: ph recovery prune
     Safe to delete if empty or stale. -->

---
";

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryCategory {
    /// Store file could not be parsed and was replaced by the seed set
    Load,
    /// Store file could not be written
    Write,
    /// AI response that could not be turned into tasks
    Import,
}

impl fmt::Display for RecoveryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryCategory::Load => write!(f, "load"),
            RecoveryCategory::Write => write!(f, "write"),
            RecoveryCategory::Import => write!(f, "import"),
        }
    }
}

impl RecoveryCategory {
    pub fn parse_category(s: &str) -> Option<Self> {
        match s {
            "load" => Some(RecoveryCategory::Load),
            "write" => Some(RecoveryCategory::Write),
            "import" => Some(RecoveryCategory::Import),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecoveryEntry {
    pub timestamp: DateTime<Utc>,
    pub category: RecoveryCategory,
    pub description: String,
    pub fields: Vec<(String, String)>,
    pub body: String,
}

impl RecoveryEntry {
    pub fn new(category: RecoveryCategory, description: impl Into<String>) -> Self {
        RecoveryEntry {
            timestamp: Utc::now(),
            category,
            description: description.into(),
            fields: Vec::new(),
            body: String::new(),
        }
    }

    pub fn field(mut self, key: &str, value: impl fmt::Display) -> Self {
        self.fields.push((key.to_string(), value.to_string()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    fn to_markdown(&self) -> String {
        let mut out = format!(
            "## {} {}: {}\n\n",
            self.timestamp
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            self.category,
            self.description,
        );
        for (key, value) in &self.fields {
            out.push_str(&format!("{}: {}\n", key, value));
        }
        if !self.body.is_empty() {
            out.push_str("\n```text\n");
            out.push_str(&self.body);
            if !self.body.ends_with('\n') {
                out.push('\n');
            }
            out.push_str("```\n");
        }
        out.push_str("\n---\n");
        out
    }
}

pub fn recovery_log_path(data_dir: &Path) -> PathBuf {
    data_dir.join("recovery.log")
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Appending
// ---------------------------------------------------------------------------

/// Append an entry. Failures are logged and otherwise swallowed.
pub fn log_recovery(data_dir: &Path, entry: RecoveryEntry) {
    if let Err(e) = log_recovery_inner(data_dir, &entry) {
        tracing::warn!(error = %e, "could not write to recovery log");
    }
}

fn log_recovery_inner(data_dir: &Path, entry: &RecoveryEntry) -> io::Result<()> {
    std::fs::create_dir_all(data_dir)?;
    let path = recovery_log_path(data_dir);

    if let Ok(meta) = std::fs::metadata(&path)
        && meta.len() > MAX_LOG_SIZE
    {
        let cutoff = Utc::now() - chrono::Duration::days(PRUNE_AGE_DAYS);
        if let Ok(content) = std::fs::read_to_string(&path) {
            atomic_write(&path, prune_entries_before(&content, &cutoff).as_bytes())?;
        }
    }

    let needs_header = std::fs::metadata(&path).map_or(true, |m| m.len() == 0);
    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    if needs_header {
        file.write_all(FILE_HEADER.as_bytes())?;
    }
    file.write_all(entry.to_markdown().as_bytes())?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// Read entries, most recent first, keeping at most `limit`.
pub fn read_recovery_entries(data_dir: &Path, limit: Option<usize>) -> Vec<RecoveryEntry> {
    let Ok(content) = std::fs::read_to_string(recovery_log_path(data_dir)) else {
        return Vec::new();
    };
    let mut entries = parse_entries(&content);
    entries.reverse();
    if let Some(n) = limit {
        entries.truncate(n);
    }
    entries
}

fn parse_entries(content: &str) -> Vec<RecoveryEntry> {
    let mut entries = Vec::new();
    let mut lines = content.lines();

    while let Some(line) = lines.next() {
        let Some((timestamp, category, description)) =
            line.strip_prefix("## ").and_then(parse_entry_header)
        else {
            continue;
        };

        let mut fields = Vec::new();
        let mut body = String::new();
        let mut in_code_block = false;

        for line in lines.by_ref() {
            if in_code_block {
                if line == "```" {
                    in_code_block = false;
                } else {
                    if !body.is_empty() {
                        body.push('\n');
                    }
                    body.push_str(line);
                }
                continue;
            }
            if line == "---" {
                break;
            }
            if line.starts_with("```") {
                in_code_block = true;
                continue;
            }
            if let Some((key, value)) = line.trim().split_once(": ") {
                fields.push((key.to_string(), value.to_string()));
            }
        }

        entries.push(RecoveryEntry {
            timestamp,
            category,
            description,
            fields,
            body,
        });
    }

    entries
}

/// `<rfc3339> <category>: <description>`
fn parse_entry_header(header: &str) -> Option<(DateTime<Utc>, RecoveryCategory, String)> {
    let (ts, rest) = header.split_once(' ')?;
    let timestamp = DateTime::parse_from_rfc3339(ts).ok()?.with_timezone(&Utc);
    let (category, description) = rest.split_once(": ")?;
    let category = RecoveryCategory::parse_category(category)?;
    Some((timestamp, category, description.to_string()))
}

// ---------------------------------------------------------------------------
// Pruning
// ---------------------------------------------------------------------------

/// Remove entries older than `before` (default: 30 days), or all of them.
/// Returns the number removed.
pub fn prune_recovery(
    data_dir: &Path,
    before: Option<DateTime<Utc>>,
    all: bool,
) -> io::Result<usize> {
    let path = recovery_log_path(data_dir);
    if !path.exists() {
        return Ok(0);
    }
    let content = std::fs::read_to_string(&path)?;
    let original = parse_entries(&content).len();

    if all {
        atomic_write(&path, FILE_HEADER.as_bytes())?;
        return Ok(original);
    }

    let cutoff = before.unwrap_or_else(|| Utc::now() - chrono::Duration::days(PRUNE_AGE_DAYS));
    let trimmed = prune_entries_before(&content, &cutoff);
    let remaining = parse_entries(&trimmed).len();
    atomic_write(&path, trimmed.as_bytes())?;
    Ok(original - remaining)
}

/// Drop entries stamped before `cutoff`, keeping the file header
fn prune_entries_before(content: &str, cutoff: &DateTime<Utc>) -> String {
    let mut result = String::new();
    let mut current = String::new();
    let mut current_ts: Option<DateTime<Utc>> = None;
    let mut in_header = true;

    let flush = |entry: &mut String, ts: Option<DateTime<Utc>>, out: &mut String| {
        if ts.is_some_and(|t| t >= *cutoff) {
            out.push_str(entry);
        }
        entry.clear();
    };

    for line in content.lines() {
        if in_header {
            result.push_str(line);
            result.push('\n');
            if line == "---" {
                in_header = false;
            }
            continue;
        }
        if let Some(header) = line.strip_prefix("## ") {
            flush(&mut current, current_ts, &mut result);
            current_ts = parse_entry_header(header).map(|(ts, _, _)| ts);
        }
        current.push_str(line);
        current.push('\n');
    }
    flush(&mut current, current_ts, &mut result);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry_at(days_ago: i64, desc: &str) -> RecoveryEntry {
        let mut e = RecoveryEntry::new(RecoveryCategory::Load, desc)
            .field("Source", "planning-hub-tasks.json")
            .body("[{\"id\": broken");
        e.timestamp = Utc::now() - chrono::Duration::days(days_ago);
        e
    }

    #[test]
    fn append_and_read_back() {
        let dir = TempDir::new().unwrap();
        log_recovery(dir.path(), entry_at(0, "first"));
        log_recovery(
            dir.path(),
            RecoveryEntry::new(RecoveryCategory::Write, "second").field("Error", "disk full"),
        );

        let content = std::fs::read_to_string(recovery_log_path(dir.path())).unwrap();
        assert!(content.starts_with("<!-- planhub recovery log"));

        let entries = read_recovery_entries(dir.path(), None);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].description, "second");
        assert_eq!(entries[0].category, RecoveryCategory::Write);
        assert_eq!(entries[0].fields, vec![("Error".into(), "disk full".into())]);
        assert_eq!(entries[1].description, "first");
        assert_eq!(entries[1].body, "[{\"id\": broken");
    }

    #[test]
    fn read_limit_keeps_most_recent() {
        let dir = TempDir::new().unwrap();
        for i in 0..3 {
            log_recovery(dir.path(), entry_at(0, &format!("e{}", i)));
        }
        let entries = read_recovery_entries(dir.path(), Some(1));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].description, "e2");
    }

    #[test]
    fn read_missing_log_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(read_recovery_entries(dir.path(), None).is_empty());
    }

    #[test]
    fn prune_drops_old_entries_only() {
        let dir = TempDir::new().unwrap();
        log_recovery(dir.path(), entry_at(60, "old"));
        log_recovery(dir.path(), entry_at(1, "fresh"));

        let removed = prune_recovery(dir.path(), None, false).unwrap();
        assert_eq!(removed, 1);
        let entries = read_recovery_entries(dir.path(), None);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].description, "fresh");
    }

    #[test]
    fn prune_all_keeps_header() {
        let dir = TempDir::new().unwrap();
        log_recovery(dir.path(), entry_at(1, "a"));
        log_recovery(dir.path(), entry_at(1, "b"));
        assert_eq!(prune_recovery(dir.path(), None, true).unwrap(), 2);
        let content = std::fs::read_to_string(recovery_log_path(dir.path())).unwrap();
        assert_eq!(content, FILE_HEADER);
    }

    #[test]
    fn atomic_write_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deeper/file.json");
        atomic_write(&path, b"[]").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }
}
