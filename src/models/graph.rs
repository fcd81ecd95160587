//! Dependency graph engine for the "blocks" relation.
//!
//! The edge set is a flat list of [`BlockEdge`]s. Nothing here keeps a
//! persistent adjacency structure: each insert rebuilds a forward adjacency
//! view from the list, which is fine for workspaces with hundreds of tasks and
//! keeps the stored format trivial.
//!
//! Stored edges are trusted to be acyclic; only new inserts are checked.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::models::BlockEdge;
use crate::{Error, Result};

/// What an add or remove did to the edge set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeOutcome {
    /// The edge was inserted
    Added,
    /// The edge was already present; nothing changed
    AlreadyPresent,
    /// Every matching edge was dropped
    Removed,
    /// No matching edge existed; nothing changed
    Absent,
}

impl EdgeOutcome {
    /// Number of edges added or removed (0 or 1).
    pub fn applied(&self) -> usize {
        match self {
            EdgeOutcome::Added | EdgeOutcome::Removed => 1,
            EdgeOutcome::AlreadyPresent | EdgeOutcome::Absent => 0,
        }
    }
}

/// The next edge set together with the outcome that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeChange {
    pub edges: Vec<BlockEdge>,
    pub outcome: EdgeOutcome,
}

impl EdgeChange {
    fn unchanged(edges: &[BlockEdge], outcome: EdgeOutcome) -> Self {
        Self {
            edges: edges.to_vec(),
            outcome,
        }
    }

    pub fn applied(&self) -> usize {
        self.outcome.applied()
    }

    /// True when the edge set needs to be written back.
    pub fn is_changed(&self) -> bool {
        self.applied() > 0
    }
}

/// Reject a self-loop request.
pub fn ensure_distinct(from: &str, to: &str) -> Result<()> {
    if from == to {
        return Err(Error::SelfDependency(from.to_string()));
    }
    Ok(())
}

/// Add `from -> to` to `edges`.
///
/// Adding an edge that already exists is a no-op. Fails with
/// [`Error::SelfDependency`] for `from == to` and with
/// [`Error::CycleDetected`] when `from` is reachable from `to`; in both cases
/// `edges` is left as it was.
pub fn add_edge(edges: &[BlockEdge], from: &str, to: &str) -> Result<EdgeChange> {
    ensure_distinct(from, to)?;

    if edges.iter().any(|edge| edge.matches(from, to)) {
        debug!(%from, %to, "dependency already present");
        return Ok(EdgeChange::unchanged(edges, EdgeOutcome::AlreadyPresent));
    }

    let mut candidate = Vec::with_capacity(edges.len() + 1);
    candidate.extend_from_slice(edges);
    candidate.push(BlockEdge::new(from, to));

    // The new edge closes a cycle iff `to` can already reach `from`.
    if reaches(&candidate, to, from) {
        debug!(%from, %to, "dependency rejected: would close a cycle");
        return Err(Error::CycleDetected {
            from: from.to_string(),
            to: to.to_string(),
        });
    }

    Ok(EdgeChange {
        edges: candidate,
        outcome: EdgeOutcome::Added,
    })
}

/// Remove every `from -> to` edge from `edges`.
///
/// Removing an edge that does not exist is a no-op.
pub fn remove_edge(edges: &[BlockEdge], from: &str, to: &str) -> EdgeChange {
    let remaining: Vec<BlockEdge> = edges
        .iter()
        .filter(|edge| !edge.matches(from, to))
        .cloned()
        .collect();

    if remaining.len() == edges.len() {
        return EdgeChange::unchanged(edges, EdgeOutcome::Absent);
    }

    EdgeChange {
        edges: remaining,
        outcome: EdgeOutcome::Removed,
    }
}

/// Whether `target` is reachable from `start` following edges forward.
///
/// Iterative DFS; each node is expanded at most once.
pub fn reaches(edges: &[BlockEdge], start: &str, target: &str) -> bool {
    let adjacency = forward_adjacency(edges);
    let mut visited: HashSet<&str> = HashSet::new();
    let mut stack = vec![start];

    while let Some(current) = stack.pop() {
        if current == target {
            return true;
        }
        if !visited.insert(current) {
            continue;
        }
        if let Some(next) = adjacency.get(current) {
            stack.extend(next.iter().copied().filter(|id| !visited.contains(id)));
        }
    }

    false
}

/// Tasks that block `task_id`, in stored edge order.
pub fn blockers_of<'a>(edges: &'a [BlockEdge], task_id: &str) -> Vec<&'a str> {
    edges
        .iter()
        .filter(|edge| edge.to == task_id)
        .map(|edge| edge.from.as_str())
        .collect()
}

/// Tasks blocked by `task_id`, in stored edge order.
pub fn dependents_of<'a>(edges: &'a [BlockEdge], task_id: &str) -> Vec<&'a str> {
    edges
        .iter()
        .filter(|edge| edge.from == task_id)
        .map(|edge| edge.to.as_str())
        .collect()
}

fn forward_adjacency(edges: &[BlockEdge]) -> HashMap<&str, Vec<&str>> {
    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in edges {
        adjacency
            .entry(edge.from.as_str())
            .or_default()
            .push(edge.to.as_str());
    }
    adjacency
}
