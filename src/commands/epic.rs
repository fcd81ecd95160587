use std::path::Path;

use serde::Serialize;
use tracing::info;

use super::{Output, append_unique, assign_if_changed, assign_optional_if_changed, bullet_list};
use crate::models::{Epic, EpicStatus, next_timestamp};
use crate::storage::Storage;
use crate::{Error, Result};

/// Id and status of an epic, as echoed by mutations.
#[derive(Debug, Serialize)]
pub struct EpicRef {
    pub id: String,
    pub status: EpicStatus,
}

impl From<&Epic> for EpicRef {
    fn from(epic: &Epic) -> Self {
        Self {
            id: epic.id.clone(),
            status: epic.status,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EpicCreated {
    pub epic: EpicRef,
    pub path: String,
}

impl Output for EpicCreated {
    fn message(&self) -> String {
        format!("Created epic {}", self.epic.id)
    }

    fn to_human(&self) -> String {
        format!("  path: {}", self.path)
    }
}

#[derive(Debug, Serialize)]
pub struct EpicShown {
    pub epic: Epic,
    pub path: String,
}

impl Output for EpicShown {
    fn message(&self) -> String {
        format!("Loaded epic {}", self.epic.id)
    }

    fn to_human(&self) -> String {
        let epic = &self.epic;
        let mut lines = vec![
            format!("{} [{}] {}", epic.id, epic.status, epic.title),
            format!("  Goal: {}", epic.goal),
        ];
        if !epic.constraints.is_empty() {
            lines.push("  Constraints:".to_string());
            lines.push(bullet_list(&epic.constraints));
        }
        if !epic.decisions.is_empty() {
            lines.push("  Decisions:".to_string());
            lines.push(bullet_list(&epic.decisions));
        }
        if let Some(context) = &epic.context {
            lines.push(format!("  Context: {}", context));
        }
        if let Some(digest) = &epic.digest {
            lines.push(format!("  Digest: {}", digest));
        }
        lines.push(format!("  Updated: {}", epic.updated_at));
        lines.join("\n")
    }
}

#[derive(Debug, Serialize)]
pub struct EpicApplied {
    pub constraints_added: usize,
    pub decisions_added: usize,
}

#[derive(Debug, Serialize)]
pub struct EpicUpdated {
    pub epic: EpicRef,
    pub path: String,
    pub applied: EpicApplied,
    #[serde(skip)]
    pub changed: bool,
}

impl Output for EpicUpdated {
    fn message(&self) -> String {
        if self.changed {
            format!("Updated epic {}", self.epic.id)
        } else {
            format!("No changes applied to epic {}", self.epic.id)
        }
    }

    fn to_human(&self) -> String {
        format!(
            "  status: {}\n  constraints added: {}\n  decisions added: {}",
            self.epic.status, self.applied.constraints_added, self.applied.decisions_added
        )
    }
}

/// Requested changes to an epic. `None` and empty lists mean "leave as is".
#[derive(Debug, Clone, Default)]
pub struct EpicPatch {
    pub title: Option<String>,
    pub goal: Option<String>,
    pub status: Option<EpicStatus>,
    pub context: Option<String>,
    pub digest: Option<String>,
    pub add_constraints: Vec<String>,
    pub add_decisions: Vec<String>,
}

impl EpicPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.goal.is_none()
            && self.status.is_none()
            && self.context.is_none()
            && self.digest.is_none()
            && self.add_constraints.is_empty()
            && self.add_decisions.is_empty()
    }
}

/// Create a new active epic.
pub fn epic_create(
    repo_path: &Path,
    title: String,
    goal: String,
    constraints: Vec<String>,
    decisions: Vec<String>,
    context: Option<String>,
) -> Result<EpicCreated> {
    let storage = Storage::open(repo_path)?;

    let mut epic = Epic::new(String::new(), title, goal);
    append_unique(&mut epic.constraints, constraints);
    append_unique(&mut epic.decisions, decisions);
    epic.context = context;

    let (epic, path) = storage.create_epic(epic)?;
    Ok(EpicCreated {
        epic: EpicRef::from(&epic),
        path: storage.paths().relative(&path),
    })
}

pub fn epic_show(repo_path: &Path, id: &str) -> Result<EpicShown> {
    let storage = Storage::open(repo_path)?;
    let epic = storage.read_epic(id)?;
    let path = storage.paths().relative(&storage.paths().epic_file(id));
    Ok(EpicShown { epic, path })
}

/// Apply `patch` to an epic. Nothing is written when no field changes.
pub fn epic_update(repo_path: &Path, id: &str, patch: EpicPatch) -> Result<EpicUpdated> {
    if patch.is_empty() {
        return Err(Error::InvalidArgs("No updates provided".to_string()));
    }

    let storage = Storage::open(repo_path)?;
    let mut epic = storage.read_epic(id)?;

    let mut changed = false;
    changed |= assign_if_changed(&mut epic.title, patch.title);
    changed |= assign_if_changed(&mut epic.goal, patch.goal);
    changed |= assign_if_changed(&mut epic.status, patch.status);
    changed |= assign_optional_if_changed(&mut epic.context, patch.context);
    changed |= assign_optional_if_changed(&mut epic.digest, patch.digest);

    let constraints_added = append_unique(&mut epic.constraints, patch.add_constraints);
    let decisions_added = append_unique(&mut epic.decisions, patch.add_decisions);
    changed |= constraints_added > 0 || decisions_added > 0;

    let path = storage.paths().epic_file(id);
    if changed {
        epic.updated_at = next_timestamp(&epic.updated_at);
        storage.write_epic(&epic)?;
        info!(id, status = %epic.status, "updated epic");
    }

    Ok(EpicUpdated {
        epic: EpicRef::from(&epic),
        path: storage.paths().relative(&path),
        applied: EpicApplied {
            constraints_added,
            decisions_added,
        },
        changed,
    })
}
