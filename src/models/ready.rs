//! Ready-work queue.
//!
//! A task is ready when it is `todo`, its epic is not `done`, and every task
//! blocking it is `done`. The result is ordered by priority, then by
//! `updated_at` (string order, oldest first), then by id, which gives a total
//! order even when priority and timestamp tie.
//!
//! Paused epics do not gate their tasks; only done epics do.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{BlockEdge, Epic, EpicStatus, Task, TaskStatus};
use crate::{Error, Result};

/// Filters applied to the ready queue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadyQuery {
    /// Only consider tasks owned by this epic. Blockers are still looked up
    /// across all epics.
    pub epic_id: Option<String>,
    /// Keep at most this many entries of the ordered result.
    pub limit: Option<usize>,
}

/// A ready task as reported to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadyTask {
    pub id: String,
    pub epic_id: String,
    pub title: String,
    pub priority: u8,
}

impl From<&Task> for ReadyTask {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            epic_id: task.epic_id.clone(),
            title: task.title.clone(),
            priority: task.priority,
        }
    }
}

/// Compute the ordered ready queue.
///
/// A dangling epic or blocker reference on any evaluated task fails the whole
/// call with [`Error::MissingEpic`] or [`Error::MissingDependency`]; there is
/// no partial result.
pub fn ready_tasks(
    tasks: &[Task],
    epics: &[Epic],
    edges: &[BlockEdge],
    query: &ReadyQuery,
) -> Result<Vec<ReadyTask>> {
    let task_by_id: HashMap<&str, &Task> = tasks.iter().map(|t| (t.id.as_str(), t)).collect();
    let epic_by_id: HashMap<&str, &Epic> = epics.iter().map(|e| (e.id.as_str(), e)).collect();

    // Incoming edges per task, in stored order.
    let mut blockers: HashMap<&str, Vec<&BlockEdge>> = HashMap::new();
    for edge in edges {
        blockers.entry(edge.to.as_str()).or_default().push(edge);
    }

    let candidates = tasks.iter().filter(|task| match &query.epic_id {
        Some(epic_id) => &task.epic_id == epic_id,
        None => true,
    });

    let mut ready = Vec::new();
    for task in candidates {
        let incoming = blockers.get(task.id.as_str()).map(Vec::as_slice).unwrap_or(&[]);
        if is_ready(task, &epic_by_id, &task_by_id, incoming)? {
            ready.push(task);
        }
    }

    ready.sort_by(|a, b| compare_ready(a, b));

    if let Some(limit) = query.limit {
        ready.truncate(limit);
    }

    Ok(ready.into_iter().map(ReadyTask::from).collect())
}

fn is_ready(
    task: &Task,
    epic_by_id: &HashMap<&str, &Epic>,
    task_by_id: &HashMap<&str, &Task>,
    incoming: &[&BlockEdge],
) -> Result<bool> {
    if task.status != TaskStatus::Todo {
        return Ok(false);
    }

    let epic = epic_by_id
        .get(task.epic_id.as_str())
        .ok_or_else(|| Error::MissingEpic {
            task: task.id.clone(),
            epic: task.epic_id.clone(),
        })?;

    if epic.status == EpicStatus::Done {
        return Ok(false);
    }

    for edge in incoming {
        let blocker = task_by_id
            .get(edge.from.as_str())
            .ok_or_else(|| Error::MissingDependency {
                from: edge.from.clone(),
                to: edge.to.clone(),
            })?;

        if !blocker.is_done() {
            return Ok(false);
        }
    }

    Ok(true)
}

fn compare_ready(a: &Task, b: &Task) -> Ordering {
    a.priority
        .cmp(&b.priority)
        .then_with(|| a.updated_at.cmp(&b.updated_at))
        .then_with(|| a.id.cmp(&b.id))
}
