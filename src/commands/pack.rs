use std::path::Path;

use serde::Serialize;
use tracing::info;

use super::Output;
use crate::Result;
use crate::models::pack::{PackFormat, build_pack};
use crate::storage::Storage;

#[derive(Debug, Serialize)]
pub struct PackResult {
    pub task_id: String,
    pub format: PackFormat,
    /// Workspace-relative file written, unless printed instead
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Rendered pack when `--stdout` was requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl Output for PackResult {
    fn message(&self) -> String {
        match &self.path {
            Some(path) => format!("Wrote context pack for {} to {}", self.task_id, path),
            None => format!("Generated context pack for {}", self.task_id),
        }
    }

    fn to_human(&self) -> String {
        self.content.clone().unwrap_or_default()
    }
}

/// Build the context pack for a task and either write it under
/// `.ananke/packs/` or return it inline.
pub fn pack(
    repo_path: &Path,
    id: &str,
    format: PackFormat,
    recent: usize,
    stdout: bool,
) -> Result<PackResult> {
    let storage = Storage::open(repo_path)?;

    let task = storage.read_task(id)?;
    let epic = storage.read_epic(&task.epic_id)?;
    let tasks = storage.list_tasks()?;
    let edges = storage.read_blocks()?;

    let content = build_pack(&task, &epic, &tasks, &edges, recent)?.render(format)?;

    if stdout {
        return Ok(PackResult {
            task_id: task.id,
            format,
            path: None,
            content: Some(content),
        });
    }

    let path = storage.write_pack(&task.id, format.extension(), &content)?;
    info!(id = %task.id, %format, "wrote context pack");
    Ok(PackResult {
        task_id: task.id,
        format,
        path: Some(storage.paths().relative(&path)),
        content: None,
    })
}
