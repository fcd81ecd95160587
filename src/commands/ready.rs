use std::path::Path;

use serde::Serialize;

use super::Output;
use crate::Result;
use crate::models::ready::{ReadyQuery, ReadyTask, ready_tasks};
use crate::storage::Storage;

#[derive(Debug, Serialize)]
pub struct ReadyResult {
    pub tasks: Vec<ReadyTask>,
}

impl Output for ReadyResult {
    fn message(&self) -> String {
        "Computed ready tasks".to_string()
    }

    fn to_human(&self) -> String {
        if self.tasks.is_empty() {
            return "No ready tasks.".to_string();
        }
        let lines: Vec<String> = self
            .tasks
            .iter()
            .map(|t| format!("  [P{}] {} {} ({})", t.priority, t.id, t.title, t.epic_id))
            .collect();
        lines.join("\n")
    }
}

/// List the tasks that can be started now, most urgent first.
pub fn ready(repo_path: &Path, epic_id: Option<String>, limit: Option<usize>) -> Result<ReadyResult> {
    let storage = Storage::open(repo_path)?;

    if let Some(epic_id) = &epic_id {
        storage.read_epic(epic_id)?;
    }

    let tasks = storage.list_tasks()?;
    let epics = storage.list_epics()?;
    let edges = storage.read_blocks()?;

    let query = ReadyQuery { epic_id, limit };
    let tasks = ready_tasks(&tasks, &epics, &edges, &query)?;
    Ok(ReadyResult { tasks })
}
