//! Context packs: everything an agent needs to pick up one task.
//!
//! A pack bundles the task, a summary of its epic, the tasks on either side of
//! it in the "blocks" graph, and the outcome summaries of recently finished
//! work in the same epic. Output is deterministic for a given workspace state.

use std::collections::HashMap;
use std::fmt::{self, Write as _};

use serde::Serialize;

use crate::models::graph::{blockers_of, dependents_of};
use crate::models::{BlockEdge, Epic, EpicStatus, Task, TaskStatus};
use crate::{Error, Result};

/// Rendering format of a pack.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PackFormat {
    #[default]
    Md,
    Json,
}

impl PackFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackFormat::Md => "md",
            PackFormat::Json => "json",
        }
    }

    /// File extension used under `.ananke/packs/`.
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for PackFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PackFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "md" => Ok(PackFormat::Md),
            "json" => Ok(PackFormat::Json),
            _ => Err(format!("Invalid pack format: {}", s)),
        }
    }
}

/// Epic fields carried into a pack.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackEpic {
    pub id: String,
    pub title: String,
    pub goal: String,
    pub status: EpicStatus,
    pub constraints: Vec<String>,
    pub decisions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

impl From<&Epic> for PackEpic {
    fn from(epic: &Epic) -> Self {
        Self {
            id: epic.id.clone(),
            title: epic.title.clone(),
            goal: epic.goal.clone(),
            status: epic.status,
            constraints: epic.constraints.clone(),
            decisions: epic.decisions.clone(),
            context: epic.context.clone(),
            digest: epic.digest.clone(),
        }
    }
}

/// A neighbouring task in the dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackTaskRef {
    pub id: String,
    pub title: String,
    pub status: TaskStatus,
}

/// Outcome of a finished task in the same epic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackOutcome {
    pub id: String,
    pub title: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome_summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextPack {
    pub task: Task,
    pub epic: PackEpic,
    pub blockers: Vec<PackTaskRef>,
    pub dependents: Vec<PackTaskRef>,
    pub recent_outcomes: Vec<PackOutcome>,
}

/// Assemble the pack for `task`.
///
/// `epic` must be the task's owning epic. `recent` caps the number of finished
/// sibling tasks included. An edge naming a task that does not exist fails
/// with [`Error::MissingDependency`].
pub fn build_pack(
    task: &Task,
    epic: &Epic,
    tasks: &[Task],
    edges: &[BlockEdge],
    recent: usize,
) -> Result<ContextPack> {
    let task_by_id: HashMap<&str, &Task> = tasks.iter().map(|t| (t.id.as_str(), t)).collect();

    let blockers = blockers_of(edges, &task.id)
        .into_iter()
        .map(|from| {
            task_ref(&task_by_id, from).ok_or_else(|| Error::MissingDependency {
                from: from.to_string(),
                to: task.id.clone(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let dependents = dependents_of(edges, &task.id)
        .into_iter()
        .map(|to| {
            task_ref(&task_by_id, to).ok_or_else(|| Error::MissingDependency {
                from: task.id.clone(),
                to: to.to_string(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut finished: Vec<&Task> = tasks
        .iter()
        .filter(|t| t.epic_id == epic.id && t.id != task.id && t.is_done())
        .collect();
    finished.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.id.cmp(&b.id)));
    finished.truncate(recent);

    let recent_outcomes = finished
        .into_iter()
        .map(|t| PackOutcome {
            id: t.id.clone(),
            title: t.title.clone(),
            updated_at: t.updated_at.clone(),
            outcome_summary: t.outcome_summary.clone(),
        })
        .collect();

    Ok(ContextPack {
        task: task.clone(),
        epic: PackEpic::from(epic),
        blockers,
        dependents,
        recent_outcomes,
    })
}

fn task_ref(task_by_id: &HashMap<&str, &Task>, id: &str) -> Option<PackTaskRef> {
    task_by_id.get(id).map(|t| PackTaskRef {
        id: t.id.clone(),
        title: t.title.clone(),
        status: t.status,
    })
}

impl ContextPack {
    /// Render in the requested format. JSON output ends with a newline.
    pub fn render(&self, format: PackFormat) -> Result<String> {
        match format {
            PackFormat::Md => Ok(self.render_markdown()),
            PackFormat::Json => {
                let mut out = serde_json::to_string_pretty(self)?;
                out.push('\n');
                Ok(out)
            }
        }
    }

    pub fn render_markdown(&self) -> String {
        let task = &self.task;
        let epic = &self.epic;
        let mut out = String::new();

        // Writing into a String cannot fail.
        let _ = writeln!(out, "# {}: {}", task.id, task.title);
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "- Status: {}\n- Priority: {}\n- Epic: {} ({})",
            task.status, task.priority, epic.id, epic.status
        );
        let _ = writeln!(out);
        let _ = writeln!(out, "## Description\n\n{}\n", task.description);

        if let Some(acceptance) = task.acceptance.as_ref().filter(|a| !a.is_empty()) {
            let _ = writeln!(out, "## Acceptance\n");
            for item in acceptance {
                let _ = writeln!(out, "- [ ] {}", item);
            }
            let _ = writeln!(out);
        }

        if let Some(notes) = &task.notes {
            let _ = writeln!(out, "## Notes\n\n{}\n", notes);
        }

        let _ = writeln!(out, "## Epic {}: {}\n", epic.id, epic.title);
        let _ = writeln!(out, "Goal: {}\n", epic.goal);
        write_list(&mut out, "### Constraints", &epic.constraints);
        write_list(&mut out, "### Decisions", &epic.decisions);
        if let Some(context) = &epic.context {
            let _ = writeln!(out, "### Context\n\n{}\n", context);
        }
        if let Some(digest) = &epic.digest {
            let _ = writeln!(out, "### Digest\n\n{}\n", digest);
        }

        write_refs(&mut out, "## Blocked by", &self.blockers);
        write_refs(&mut out, "## Blocks", &self.dependents);

        if !self.recent_outcomes.is_empty() {
            let _ = writeln!(out, "## Recent outcomes\n");
            for outcome in &self.recent_outcomes {
                let summary = outcome.outcome_summary.as_deref().unwrap_or("(no summary)");
                let _ = writeln!(out, "- {} {}: {}", outcome.id, outcome.title, summary);
            }
            let _ = writeln!(out);
        }

        // Exactly one trailing newline.
        while out.ends_with("\n\n") {
            out.pop();
        }
        out
    }
}

fn write_list(out: &mut String, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "{}\n", heading);
    for item in items {
        let _ = writeln!(out, "- {}", item);
    }
    let _ = writeln!(out);
}

fn write_refs(out: &mut String, heading: &str, refs: &[PackTaskRef]) {
    if refs.is_empty() {
        return;
    }
    let _ = writeln!(out, "{}\n", heading);
    for r in refs {
        let _ = writeln!(out, "- {} [{}] {}", r.id, r.status, r.title);
    }
    let _ = writeln!(out);
}
