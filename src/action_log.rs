//! Action logging for ananke commands.
//!
//! When enabled through config (`action-log #true`), every invocation is
//! appended as one JSON line to `.ananke/logs/actions.jsonl`. Logging never
//! fails a command: problems are reported through `tracing` and swallowed.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::storage::WorkspacePaths;

/// Strings longer than this (in characters) are truncated before logging.
const MAX_ARG_CHARS: usize = 100;

/// Arrays longer than this are summarized before logging.
const MAX_ARG_ITEMS: usize = 10;

/// Represents a single action log entry.
#[derive(Debug, Serialize, Deserialize)]
pub struct ActionLog {
    pub timestamp: DateTime<Utc>,

    /// Command name (e.g., "task create", "ready")
    pub command: String,

    /// Command arguments as JSON, after sanitizing
    pub args: Value,

    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    pub duration_ms: u64,

    /// User who executed the command
    pub user: String,
}

/// Path of the JSONL log for a workspace.
pub fn log_path(paths: &WorkspacePaths) -> PathBuf {
    paths.logs_dir.join("actions.jsonl")
}

/// Append one entry to the workspace action log.
///
/// Does nothing when the workspace has no `.ananke` directory, so a failed
/// `init` or a command run outside a workspace never creates one.
pub fn log_action(
    paths: &WorkspacePaths,
    command: &str,
    args: &Value,
    success: bool,
    error: Option<String>,
    duration_ms: u64,
) {
    if !paths.ananke_dir.is_dir() {
        debug!("no workspace; skipping action log");
        return;
    }

    let entry = ActionLog {
        timestamp: Utc::now(),
        command: command.to_string(),
        args: sanitize_args(args),
        success,
        error,
        duration_ms,
        user: current_user(),
    };

    let path = log_path(paths);
    if let Err(e) = write_log_entry(&path, &entry) {
        warn!(path = %path.display(), error = %e, "failed to write action log");
    }
}

fn write_log_entry(path: &Path, entry: &ActionLog) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string(entry)?;
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", json)
}

fn is_sensitive_key(key: &str) -> bool {
    let key = key.to_lowercase();
    ["password", "token", "secret", "credential"]
        .iter()
        .any(|needle| key.contains(needle))
}

/// Redact secret-looking keys and shorten long values.
fn sanitize_args(args: &Value) -> Value {
    match args {
        Value::Object(map) => {
            let sanitized: Map<String, Value> = map
                .iter()
                .map(|(key, value)| {
                    let value = if is_sensitive_key(key) {
                        Value::String("[REDACTED]".to_string())
                    } else {
                        sanitize_args(value)
                    };
                    (key.clone(), value)
                })
                .collect();
            Value::Object(sanitized)
        }
        Value::Array(items) if items.len() > MAX_ARG_ITEMS => {
            Value::String(format!("[Array with {} items]", items.len()))
        }
        Value::Array(items) => Value::Array(items.iter().map(sanitize_args).collect()),
        Value::String(s) => {
            let chars = s.chars().count();
            if chars > MAX_ARG_CHARS {
                let head: String = s.chars().take(MAX_ARG_CHARS - 3).collect();
                Value::String(format!("{}... ({} chars)", head, chars))
            } else {
                Value::String(s.clone())
            }
        }
        _ => args.clone(),
    }
}

fn current_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}
