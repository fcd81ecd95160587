use std::path::Path;

use serde::Serialize;
use tracing::info;

use super::Output;
use crate::Result;
use crate::models::BlockEdge;
use crate::models::graph::{add_edge, ensure_distinct, remove_edge};
use crate::storage::Storage;

#[derive(Debug, Serialize)]
pub struct DepAddApplied {
    pub added: usize,
}

#[derive(Debug, Serialize)]
pub struct DepAdded {
    pub edge: BlockEdge,
    pub applied: DepAddApplied,
}

impl Output for DepAdded {
    fn message(&self) -> String {
        if self.applied.added > 0 {
            format!("Added dependency {}", self.edge)
        } else {
            format!("Dependency already exists: {}", self.edge)
        }
    }

    fn to_human(&self) -> String {
        format!("  {} blocks {}", self.edge.from, self.edge.to)
    }
}

#[derive(Debug, Serialize)]
pub struct DepRmApplied {
    pub removed: usize,
}

#[derive(Debug, Serialize)]
pub struct DepRemoved {
    pub edge: BlockEdge,
    pub applied: DepRmApplied,
}

impl Output for DepRemoved {
    fn message(&self) -> String {
        if self.applied.removed > 0 {
            format!("Removed dependency {}", self.edge)
        } else {
            format!("Dependency did not exist: {}", self.edge)
        }
    }

    fn to_human(&self) -> String {
        String::new()
    }
}

/// Record that `from` must be done before `to` is ready.
///
/// Both tasks must exist. Re-adding an existing edge is a no-op; an edge that
/// would close a cycle is rejected and nothing is written.
pub fn dep_add(repo_path: &Path, from: &str, to: &str) -> Result<DepAdded> {
    ensure_distinct(from, to)?;

    let storage = Storage::open(repo_path)?;
    storage.read_task(from)?;
    storage.read_task(to)?;

    let edges = storage.read_blocks()?;
    let change = add_edge(&edges, from, to)?;
    if change.is_changed() {
        storage.write_blocks(&change.edges)?;
        info!(from, to, "added dependency");
    }

    Ok(DepAdded {
        edge: BlockEdge::new(from, to),
        applied: DepAddApplied {
            added: change.applied(),
        },
    })
}

/// Drop the `from -> to` edge. Removing an absent edge is a no-op.
pub fn dep_rm(repo_path: &Path, from: &str, to: &str) -> Result<DepRemoved> {
    let storage = Storage::open(repo_path)?;

    let edges = storage.read_blocks()?;
    let change = remove_edge(&edges, from, to);
    if change.is_changed() {
        storage.write_blocks(&change.edges)?;
        info!(from, to, "removed dependency");
    }

    Ok(DepRemoved {
        edge: BlockEdge::new(from, to),
        applied: DepRmApplied {
            removed: change.applied(),
        },
    })
}
