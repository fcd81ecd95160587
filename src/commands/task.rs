use std::path::Path;

use serde::Serialize;
use tracing::info;

use super::{Output, append_unique, assign_if_changed, assign_optional_if_changed, bullet_list};
use crate::models::{EpicStatus, Task, TaskStatus, next_timestamp};
use crate::storage::Storage;
use crate::{Error, Result};

#[derive(Debug, Serialize)]
pub struct TaskCreatedRef {
    pub id: String,
    pub epic_id: String,
    pub status: TaskStatus,
    pub priority: u8,
}

#[derive(Debug, Serialize)]
pub struct TaskCreated {
    pub task: TaskCreatedRef,
    pub path: String,
}

impl Output for TaskCreated {
    fn message(&self) -> String {
        format!("Created task {}", self.task.id)
    }

    fn to_human(&self) -> String {
        format!(
            "  epic: {}\n  priority: P{}\n  path: {}",
            self.task.epic_id, self.task.priority, self.path
        )
    }
}

#[derive(Debug, Serialize)]
pub struct TaskShown {
    pub task: Task,
    pub path: String,
}

impl Output for TaskShown {
    fn message(&self) -> String {
        format!("Loaded task {}", self.task.id)
    }

    fn to_human(&self) -> String {
        let task = &self.task;
        let mut lines = vec![
            format!("{} [{}] P{} {}", task.id, task.status, task.priority, task.title),
            format!("  Epic: {}", task.epic_id),
            format!("  Description: {}", task.description),
        ];
        if let Some(acceptance) = task.acceptance.as_ref().filter(|a| !a.is_empty()) {
            lines.push("  Acceptance:".to_string());
            lines.push(bullet_list(acceptance));
        }
        if let Some(notes) = &task.notes {
            lines.push(format!("  Notes: {}", notes));
        }
        if let Some(summary) = &task.outcome_summary {
            lines.push(format!("  Outcome: {}", summary));
        }
        lines.push(format!("  Updated: {}", task.updated_at));
        lines.join("\n")
    }
}

#[derive(Debug, Serialize)]
pub struct TaskRef {
    pub id: String,
    pub status: TaskStatus,
    pub priority: u8,
}

#[derive(Debug, Serialize)]
pub struct TaskApplied {
    pub acceptance_added: usize,
}

/// Result of `task update` and `task close`.
#[derive(Debug, Serialize)]
pub struct TaskMutated {
    pub task: TaskRef,
    pub path: String,
    pub applied: TaskApplied,
    #[serde(skip)]
    pub changed: bool,
    #[serde(skip)]
    pub verb: &'static str,
}

impl Output for TaskMutated {
    fn message(&self) -> String {
        if self.changed {
            format!("{} task {}", self.verb, self.task.id)
        } else {
            format!("No changes applied to task {}", self.task.id)
        }
    }

    fn to_human(&self) -> String {
        format!(
            "  status: {}\n  priority: P{}\n  acceptance added: {}",
            self.task.status, self.task.priority, self.applied.acceptance_added
        )
    }
}

/// Requested changes to a task. `None` and empty lists mean "leave as is".
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<u8>,
    pub notes: Option<String>,
    pub outcome_summary: Option<String>,
    pub add_acceptance: Vec<String>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.notes.is_none()
            && self.outcome_summary.is_none()
            && self.add_acceptance.is_empty()
    }
}

/// Create a `todo` task under an epic that is not done.
pub fn task_create(
    repo_path: &Path,
    epic_id: &str,
    title: String,
    description: String,
    priority: u8,
    acceptance: Vec<String>,
) -> Result<TaskCreated> {
    let storage = Storage::open(repo_path)?;

    let epic = storage.read_epic(epic_id)?;
    if epic.status == EpicStatus::Done {
        return Err(Error::Conflict(format!(
            "Cannot create task under done epic: {}. Reopen with `ananke epic update {} --status active`",
            epic_id, epic_id
        )));
    }

    let mut task = Task::new(
        String::new(),
        epic_id.to_string(),
        title,
        description,
        priority,
    );
    if !acceptance.is_empty() {
        let mut criteria = Vec::new();
        append_unique(&mut criteria, acceptance);
        task.acceptance = Some(criteria);
    }

    let (task, path) = storage.create_task(task)?;
    Ok(TaskCreated {
        task: TaskCreatedRef {
            id: task.id.clone(),
            epic_id: task.epic_id.clone(),
            status: task.status,
            priority: task.priority,
        },
        path: storage.paths().relative(&path),
    })
}

pub fn task_show(repo_path: &Path, id: &str) -> Result<TaskShown> {
    let storage = Storage::open(repo_path)?;
    let task = storage.read_task(id)?;
    let path = storage.paths().relative(&storage.paths().task_file(id));
    Ok(TaskShown { task, path })
}

/// Apply `patch` to a task. Moving to `done` requires an outcome summary.
pub fn task_update(repo_path: &Path, id: &str, patch: TaskPatch) -> Result<TaskMutated> {
    if patch.is_empty() {
        return Err(Error::InvalidArgs("No updates provided".to_string()));
    }
    if patch.status == Some(TaskStatus::Done) && patch.outcome_summary.is_none() {
        return Err(Error::InvalidArgs(
            "--outcome-summary is required when --status is done".to_string(),
        ));
    }
    apply_patch(repo_path, id, patch, "Updated")
}

/// Mark a task done and record what came of it.
pub fn task_close(repo_path: &Path, id: &str, summary: String) -> Result<TaskMutated> {
    let patch = TaskPatch {
        status: Some(TaskStatus::Done),
        outcome_summary: Some(summary),
        ..Default::default()
    };
    apply_patch(repo_path, id, patch, "Closed")
}

fn apply_patch(
    repo_path: &Path,
    id: &str,
    patch: TaskPatch,
    verb: &'static str,
) -> Result<TaskMutated> {
    let storage = Storage::open(repo_path)?;
    let mut task = storage.read_task(id)?;

    let mut changed = false;
    changed |= assign_if_changed(&mut task.title, patch.title);
    changed |= assign_if_changed(&mut task.description, patch.description);
    changed |= assign_if_changed(&mut task.status, patch.status);
    changed |= assign_if_changed(&mut task.priority, patch.priority);
    changed |= assign_optional_if_changed(&mut task.notes, patch.notes);
    changed |= assign_optional_if_changed(&mut task.outcome_summary, patch.outcome_summary);

    let mut acceptance_added = 0;
    if !patch.add_acceptance.is_empty() {
        let criteria = task.acceptance.get_or_insert_with(Vec::new);
        acceptance_added = append_unique(criteria, patch.add_acceptance);
        changed |= acceptance_added > 0;
    }

    let path = storage.paths().task_file(id);
    if changed {
        task.updated_at = next_timestamp(&task.updated_at);
        storage.write_task(&task)?;
        info!(id, status = %task.status, "{} task", verb.to_lowercase());
    }

    Ok(TaskMutated {
        task: TaskRef {
            id: task.id.clone(),
            status: task.status,
            priority: task.priority,
        },
        path: storage.paths().relative(&path),
        applied: TaskApplied { acceptance_added },
        changed,
        verb,
    })
}
