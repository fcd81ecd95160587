use std::path::Path;

use serde::Serialize;

use super::Output;
use crate::Result;
use crate::storage::{InitMode, Storage};

#[derive(Debug, Serialize)]
pub struct InitResult {
    /// Workspace-relative paths created or refilled
    pub created: Vec<String>,
}

impl Output for InitResult {
    fn message(&self) -> String {
        "Initialized .ananke workspace".to_string()
    }

    fn to_human(&self) -> String {
        if self.created.is_empty() {
            return "Nothing to create".to_string();
        }
        let lines: Vec<String> = self.created.iter().map(|p| format!("  created {}", p)).collect();
        lines.join("\n")
    }
}

/// Scaffold `.ananke` under `repo_path`.
pub fn init(repo_path: &Path, update: bool, reset: bool) -> Result<InitResult> {
    let mode = match (update, reset) {
        (_, true) => InitMode::Reset,
        (true, false) => InitMode::Update,
        (false, false) => InitMode::Create,
    };
    let report = Storage::init(repo_path, mode)?;
    Ok(InitResult {
        created: report.created,
    })
}
