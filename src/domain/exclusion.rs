//! Reparent targets: a node can move under anything except itself and its descendants.

use std::collections::{HashMap, HashSet};

use itertools::Itertools;

use crate::domain::entities::Node;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::flatten::PreOrder;

/// Ids that must not be offered as a new parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exclusion {
    /// No current node (creating a new one): everything is a candidate.
    Unrestricted,
    /// A current id was given but does not occur in the collection.
    NotFound(String),
    /// The current id plus all of its transitive descendants.
    Ids(HashSet<String>),
}

impl Exclusion {
    pub fn excludes(&self, id: &str) -> bool {
        match self {
            Exclusion::Ids(ids) => ids.contains(id),
            Exclusion::Unrestricted | Exclusion::NotFound(_) => false,
        }
    }
}

/// Every node of the collection once, first occurrence wins.
///
/// Top-level entries come first in input order, then nodes reachable only
/// through nested `children`, in pre-order. A nested forest therefore
/// lists in pre-order, a flat list keeps its own order.
pub fn unique_nodes(all: &[Node]) -> Vec<&Node> {
    all.iter()
        .chain(PreOrder::new(all, 0).map(|e| e.node))
        .unique_by(|n| n.id.as_str())
        .collect()
}

/// Compute the exclusion set for `current_id`.
///
/// Descendants are found through nested `children` and through parent
/// references, so flat lists without children exclude correctly too.
pub fn exclusion_set(all: &[Node], current_id: Option<&str>) -> Exclusion {
    let Some(current_id) = current_id else {
        return Exclusion::Unrestricted;
    };

    let mut child_index: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut known: HashSet<&str> = HashSet::new();
    for entry in PreOrder::new(all, 0) {
        let node = entry.node;
        known.insert(node.id.as_str());
        for child in &node.children {
            child_index.entry(node.id.as_str()).or_default().push(child.id.as_str());
        }
        if let Some(parent_id) = node.parent_id() {
            child_index.entry(parent_id).or_default().push(node.id.as_str());
        }
    }

    if !known.contains(current_id) {
        return Exclusion::NotFound(current_id.to_string());
    }

    let mut excluded: HashSet<String> = HashSet::new();
    let mut stack = vec![current_id];
    while let Some(id) = stack.pop() {
        if !excluded.insert(id.to_string()) {
            continue;
        }
        if let Some(children) = child_index.get(id) {
            stack.extend(children.iter().copied());
        }
    }

    Exclusion::Ids(excluded)
}

/// Nodes that may become the parent of `current_id`.
///
/// An absent or unknown `current_id` applies no restriction.
pub fn available_parents(all: &[Node], current_id: Option<&str>) -> Vec<Node> {
    let exclusion = exclusion_set(all, current_id);
    filter_candidates(all, &exclusion)
}

/// Like [`available_parents`], but an unknown `current_id` is an error.
pub fn available_parents_strict(all: &[Node], current_id: Option<&str>) -> DomainResult<Vec<Node>> {
    match exclusion_set(all, current_id) {
        Exclusion::NotFound(id) => Err(DomainError::sub_category_not_found(id)),
        exclusion => Ok(filter_candidates(all, &exclusion)),
    }
}

/// Check that `id` may move under `new_parent_id` (`None`: to the root level).
pub fn validate_reparent(all: &[Node], id: &str, new_parent_id: Option<&str>) -> DomainResult<()> {
    let exclusion = match exclusion_set(all, Some(id)) {
        Exclusion::NotFound(id) => return Err(DomainError::sub_category_not_found(id)),
        exclusion => exclusion,
    };
    let Some(parent_id) = new_parent_id else {
        return Ok(());
    };
    if exclusion.excludes(parent_id) {
        return Err(DomainError::InvalidParent {
            id: id.to_string(),
            parent_id: parent_id.to_string(),
        });
    }
    if !unique_nodes(all).iter().any(|n| n.id == parent_id) {
        return Err(DomainError::sub_category_not_found(parent_id));
    }
    Ok(())
}

fn filter_candidates(all: &[Node], exclusion: &Exclusion) -> Vec<Node> {
    unique_nodes(all)
        .into_iter()
        .filter(|n| !exclusion.excludes(&n.id))
        .cloned()
        .collect()
}
