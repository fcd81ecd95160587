//! Ananke - durable task memory for AI agents and humans.
//!
//! This library provides the core functionality for the `ananke` CLI tool:
//! epics and tasks stored as JSON documents, a "blocks" dependency graph with
//! cycle rejection, and a deterministic ready-work queue.

pub mod action_log;
pub mod cli;
pub mod commands;
pub mod config;
pub mod models;
pub mod storage;

/// Test utilities for isolated test environments.
#[cfg(test)]
pub(crate) mod test_utils {
    use std::path::Path;
    use tempfile::TempDir;

    use crate::models::{Epic, Task};
    use crate::storage::{InitMode, Storage};

    /// Test environment backed by a throwaway workspace root.
    pub struct TestEnv {
        /// Simulated workspace root
        pub root: TempDir,
    }

    impl TestEnv {
        /// Create an empty, uninitialized workspace root.
        pub fn new() -> Self {
            Self {
                root: TempDir::new().unwrap(),
            }
        }

        /// Create a workspace root and scaffold `.ananke` in it.
        pub fn init() -> Self {
            let env = Self::new();
            Storage::init(env.path(), InitMode::Create).unwrap();
            env
        }

        /// Get the path to the workspace root.
        pub fn path(&self) -> &Path {
            self.root.path()
        }

        /// Open storage for this test environment.
        pub fn storage(&self) -> Storage {
            Storage::open(self.path()).unwrap()
        }

        /// Create an epic with the given title and return its id.
        pub fn epic(&self, title: &str) -> String {
            let epic = Epic::new(String::new(), title.to_string(), format!("{} goal", title));
            let (epic, _) = self.storage().create_epic(epic).unwrap();
            epic.id
        }

        /// Create a task in `epic_id` with the given priority and return its id.
        pub fn task(&self, epic_id: &str, title: &str, priority: u8) -> String {
            let task = Task::new(
                String::new(),
                epic_id.to_string(),
                title.to_string(),
                format!("{} description", title),
                priority,
            );
            let (task, _) = self.storage().create_task(task).unwrap();
            task.id
        }
    }

    impl Default for TestEnv {
        fn default() -> Self {
            Self::new()
        }
    }
}

/// Library-level error type for ananke operations.
///
/// Every variant maps onto one of the stable error codes reported to callers
/// (see [`Error::code`]).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Workspace not initialized. Run `ananke init` first.")]
    NotInitialized,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidId(String),

    #[error("{0}")]
    InvalidArgs(String),

    #[error("Cannot add dependency from task to itself: {0}")]
    SelfDependency(String),

    #[error("Dependency would introduce cycle: {from} -> {to}")]
    CycleDetected { from: String, to: String },

    #[error("Task references missing epic: {task} -> {epic}")]
    MissingEpic { task: String, epic: String },

    #[error("Dependency references missing task: {from} -> {to}")]
    MissingDependency { from: String, to: String },

    #[error("Invalid {document} contents: {reason}")]
    InvalidDocument { document: String, reason: String },

    #[error("{0}")]
    Conflict(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidId(_) | Error::InvalidArgs(_) | Error::SelfDependency(_) => {
                "INVALID_ARGS"
            }
            Error::NotInitialized | Error::NotFound(_) => "NOT_FOUND",
            Error::CycleDetected { .. }
            | Error::MissingEpic { .. }
            | Error::MissingDependency { .. }
            | Error::InvalidDocument { .. }
            | Error::Conflict(_) => "CONFLICT",
            Error::Io(_) | Error::Json(_) | Error::Config(_) => "UNEXPECTED_ERROR",
        }
    }

    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self.code() {
            "INVALID_ARGS" => 2,
            "NOT_FOUND" => 3,
            "CONFLICT" => 4,
            _ => 1,
        }
    }
}

/// Result type alias for ananke operations.
pub type Result<T> = std::result::Result<T, Error>;
