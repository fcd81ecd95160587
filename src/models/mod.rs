//! Data models for ananke entities.
//!
//! This module defines the core data structures:
//! - `Epic` - A grouping of tasks with its own lifecycle status
//! - `Task` - A unit of work owned by exactly one epic
//! - `BlockEdge` - A "must finish before" relationship between two tasks
//! - `WorkspaceIndex` - ID allocation counters
//!
//! Timestamps are kept as fixed-width ISO-8601 strings so that the ready
//! queue can order them with a plain string comparison.

pub mod graph;
pub mod pack;
pub mod ready;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Prefix of epic identifiers (`EPC-001`).
pub const EPIC_PREFIX: &str = "EPC";

/// Prefix of task identifiers (`TSK-001`).
pub const TASK_PREFIX: &str = "TSK";

/// Lowest-urgency priority value; 0 is the most urgent.
pub const MAX_PRIORITY: u8 = 4;

/// Priority assigned to new tasks when neither the caller nor config picks one.
pub const DEFAULT_PRIORITY: u8 = 2;

/// Task status in the workflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    Doing,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::Doing => "doing",
            TaskStatus::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "todo" => Ok(TaskStatus::Todo),
            "doing" => Ok(TaskStatus::Doing),
            "done" => Ok(TaskStatus::Done),
            _ => Err(format!("Invalid task status: {}", s)),
        }
    }
}

/// Epic status in the workflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpicStatus {
    #[default]
    Active,
    Paused,
    Done,
}

impl EpicStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EpicStatus::Active => "active",
            EpicStatus::Paused => "paused",
            EpicStatus::Done => "done",
        }
    }
}

impl fmt::Display for EpicStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EpicStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "active" => Ok(EpicStatus::Active),
            "paused" => Ok(EpicStatus::Paused),
            "done" => Ok(EpicStatus::Done),
            _ => Err(format!("Invalid epic status: {}", s)),
        }
    }
}

/// A grouping of related tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Epic {
    /// Unique identifier (e.g., "EPC-001")
    pub id: String,

    pub title: String,

    /// What finishing this epic achieves
    pub goal: String,

    #[serde(default)]
    pub status: EpicStatus,

    #[serde(default)]
    pub constraints: Vec<String>,

    #[serde(default)]
    pub decisions: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    /// Condensed learnings recorded while working the epic
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,

    pub created_at: String,

    pub updated_at: String,

    /// Fields this version does not know about, preserved on rewrite
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Epic {
    /// Create a new active epic.
    pub fn new(id: String, title: String, goal: String) -> Self {
        let now = now_timestamp();
        Self {
            id,
            title,
            goal,
            status: EpicStatus::default(),
            constraints: Vec::new(),
            decisions: Vec::new(),
            context: None,
            digest: None,
            created_at: now.clone(),
            updated_at: now,
            extra: Map::new(),
        }
    }

    /// Check the document-level rules a stored epic must satisfy.
    pub fn validate(&self) -> Result<(), String> {
        require_non_empty("id", &self.id)?;
        require_non_empty("title", &self.title)?;
        require_non_empty("goal", &self.goal)?;
        require_non_empty("created_at", &self.created_at)?;
        require_non_empty("updated_at", &self.updated_at)?;
        Ok(())
    }
}

/// A unit of work tracked by ananke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier (e.g., "TSK-001")
    pub id: String,

    /// Owning epic (back-reference)
    pub epic_id: String,

    pub title: String,

    pub description: String,

    #[serde(default)]
    pub status: TaskStatus,

    /// Priority level (0-4, lower is more urgent)
    pub priority: u8,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Acceptance criteria
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acceptance: Option<Vec<String>>,

    /// Durable summary recorded when the task is closed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome_summary: Option<String>,

    pub created_at: String,

    pub updated_at: String,

    /// Fields this version does not know about, preserved on rewrite
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    /// Create a new `todo` task.
    pub fn new(id: String, epic_id: String, title: String, description: String, priority: u8) -> Self {
        let now = now_timestamp();
        Self {
            id,
            epic_id,
            title,
            description,
            status: TaskStatus::default(),
            priority,
            notes: None,
            acceptance: None,
            outcome_summary: None,
            created_at: now.clone(),
            updated_at: now,
            extra: Map::new(),
        }
    }

    /// Check the document-level rules a stored task must satisfy.
    pub fn validate(&self) -> Result<(), String> {
        require_non_empty("id", &self.id)?;
        require_non_empty("epic_id", &self.epic_id)?;
        require_non_empty("title", &self.title)?;
        require_non_empty("description", &self.description)?;
        if self.priority > MAX_PRIORITY {
            return Err(format!(
                "priority must be 0-{}, got {}",
                MAX_PRIORITY, self.priority
            ));
        }
        if let Some(summary) = &self.outcome_summary {
            require_non_empty("outcome_summary", summary)?;
        }
        require_non_empty("created_at", &self.created_at)?;
        require_non_empty("updated_at", &self.updated_at)?;
        Ok(())
    }

    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }
}

/// `from` blocks `to`: `to` is not ready until `from` is done.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockEdge {
    pub from: String,
    pub to: String,
}

impl BlockEdge {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Returns true if this edge is exactly `from -> to`.
    pub fn matches(&self, from: &str, to: &str) -> bool {
        self.from == from && self.to == to
    }

    pub fn validate(&self) -> Result<(), String> {
        require_non_empty("from", &self.from)?;
        require_non_empty("to", &self.to)
    }
}

impl fmt::Display for BlockEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// ID allocation counters stored in `.ananke/index.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceIndex {
    pub next_epic: u64,
    pub next_task: u64,
    pub updated_at: String,
}

impl WorkspaceIndex {
    pub fn new() -> Self {
        Self {
            next_epic: 1,
            next_task: 1,
            updated_at: now_timestamp(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.next_epic < 1 || self.next_task < 1 {
            return Err("next_epic and next_task must be >= 1".to_string());
        }
        require_non_empty("updated_at", &self.updated_at)
    }
}

impl Default for WorkspaceIndex {
    fn default() -> Self {
        Self::new()
    }
}

/// Current time as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Timestamp for a mutation of a record last touched at `previous`.
///
/// Never goes backwards, even if the wall clock does.
pub fn next_timestamp(previous: &str) -> String {
    let now = now_timestamp();
    if now.as_str() < previous {
        previous.to_string()
    } else {
        now
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} must be a non-empty string", field));
    }
    Ok(())
}
