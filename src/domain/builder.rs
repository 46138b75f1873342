//! Tree builder assembling a sub-category forest from a flat list.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::domain::arena::NodeArena;
use crate::domain::entities::Node;
use crate::domain::error::{DomainError, DomainResult};

/// What to do with a node whose parent id is not in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrphanPolicy {
    /// Fail the whole build.
    #[default]
    Reject,
    /// Attach the node as a root and drop its parent reference.
    Promote,
}

impl fmt::Display for OrphanPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrphanPolicy::Reject => write!(f, "reject"),
            OrphanPolicy::Promote => write!(f, "promote"),
        }
    }
}

impl FromStr for OrphanPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(OrphanPolicy::Reject),
            "promote" => Ok(OrphanPolicy::Promote),
            other => Err(format!("unknown orphan policy: {other} (expected reject|promote)")),
        }
    }
}

/// Constructs hierarchical trees from flat sub-category lists.
pub struct TreeBuilder {
    policy: OrphanPolicy,
    /// parent id -> positions of its children in the input
    relationship_cache: HashMap<String, Vec<usize>>,
    visited_ids: HashSet<String>,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::with_policy(OrphanPolicy::default())
    }

    pub fn with_policy(policy: OrphanPolicy) -> Self {
        Self {
            policy,
            relationship_cache: HashMap::new(),
            visited_ids: HashSet::new(),
        }
    }

    /// Build the forest for a flat node list.
    ///
    /// Parent ids are authoritative: children pre-populated on the input
    /// are discarded. Roots and siblings keep their input order.
    #[instrument(level = "debug", skip(self, flat), fields(nodes = flat.len(), policy = %self.policy))]
    pub fn build(&mut self, flat: &[Node]) -> DomainResult<Vec<Node>> {
        // Reset state for a fresh build
        self.relationship_cache.clear();
        self.visited_ids.clear();

        let positions = Self::index_ids(flat)?;
        let root_positions = self.link(flat, &positions)?;

        let mut arena = NodeArena::with_capacity(flat.len());
        for root in root_positions {
            self.attach_tree(flat, root, &mut arena)?;
        }

        // Nodes never reached from a root sit on a parent cycle
        if let Some(node) = flat.iter().find(|n| !self.visited_ids.contains(&n.id)) {
            return Err(DomainError::CycleDetected(node.id.clone()));
        }

        debug!(
            "built forest: roots={}, depth={}",
            arena.roots().len(),
            arena.depth()
        );
        Ok(arena.into_forest())
    }

    fn index_ids(flat: &[Node]) -> DomainResult<HashMap<&str, usize>> {
        let mut positions = HashMap::with_capacity(flat.len());
        for (pos, node) in flat.iter().enumerate() {
            if positions.insert(node.id.as_str(), pos).is_some() {
                return Err(DomainError::DuplicateId(node.id.clone()));
            }
        }
        Ok(positions)
    }

    /// Fill the relationship cache and return root positions in input order.
    fn link(&mut self, flat: &[Node], positions: &HashMap<&str, usize>) -> DomainResult<Vec<usize>> {
        let mut roots = Vec::new();

        for (pos, node) in flat.iter().enumerate() {
            match node.parent_id() {
                None => roots.push(pos),
                Some(parent_id) if positions.contains_key(parent_id) => {
                    self.relationship_cache
                        .entry(parent_id.to_string())
                        .or_default()
                        .push(pos);
                }
                Some(parent_id) => match self.policy {
                    OrphanPolicy::Reject => {
                        return Err(DomainError::OrphanParent {
                            id: node.id.clone(),
                            parent_id: parent_id.to_string(),
                        });
                    }
                    OrphanPolicy::Promote => {
                        warn!(
                            "promoting orphan {} to root: parent {} not found",
                            node.id, parent_id
                        );
                        roots.push(pos);
                    }
                },
            }
        }

        Ok(roots)
    }

    fn attach_tree(&mut self, flat: &[Node], root: usize, arena: &mut NodeArena) -> DomainResult<()> {
        let mut stack = vec![(root, None)];

        while let Some((pos, parent_idx)) = stack.pop() {
            let node = &flat[pos];
            if !self.visited_ids.insert(node.id.clone()) {
                return Err(DomainError::CycleDetected(node.id.clone()));
            }

            let mut data = node.detached();
            if parent_idx.is_none() {
                data.declared_parent_id = None;
                data.parent = None;
            }
            let current_idx = arena.insert_node(data, parent_idx);

            // Reverse so children pop in input order
            if let Some(children) = self.relationship_cache.get(&node.id) {
                for &child in children.iter().rev() {
                    stack.push((child, Some(current_idx)));
                }
            }
        }

        Ok(())
    }
}
