use std::collections::HashMap;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::entities::Node;

/// Arena slot: a detached sub-category plus its links.
#[derive(Debug)]
pub struct ArenaNode {
    /// Node payload; its own `children` are ignored, links live in the arena
    pub data: Node,
    /// Index of parent node in the arena, None for root nodes
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, in display order
    pub children: Vec<Index>,
}

/// Arena-backed forest used while assembling a hierarchy.
///
/// Links are indices, so nodes can be attached in any order without
/// shared ownership. `into_forest` materializes the nested `Node` form.
#[derive(Debug)]
pub struct NodeArena {
    arena: Arena<ArenaNode>,
    roots: Vec<Index>,
}

impl Default for NodeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            roots: Vec::new(),
        }
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            arena: Arena::with_capacity(n),
            roots: Vec::new(),
        }
    }

    /// Insert a node as the last child of `parent`, or as the last root.
    #[instrument(level = "trace", skip(self, data), fields(id = %data.id))]
    pub fn insert_node(&mut self, data: Node, parent: Option<Index>) -> Index {
        let node = ArenaNode {
            data,
            parent,
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);

        match parent.and_then(|p| self.arena.get_mut(p)) {
            Some(parent) => parent.children.push(node_idx),
            None => self.roots.push(node_idx),
        }

        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&ArenaNode> {
        self.arena.get(idx)
    }

    pub fn roots(&self) -> &[Index] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Number of levels of the deepest tree; 0 for an empty forest.
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack: Vec<(Index, usize)> = self.roots.iter().map(|&r| (r, 1)).collect();

        while let Some((idx, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            if let Some(node) = self.get_node(idx) {
                stack.extend(node.children.iter().map(|&c| (c, depth + 1)));
            }
        }
        max_depth
    }

    #[instrument(level = "trace", skip(self))]
    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self)
    }

    /// Materialize the nested forest.
    ///
    /// Every child's `parent` points back at the node it was attached to.
    #[instrument(level = "debug", skip(self), fields(nodes = self.len()))]
    pub fn into_forest(self) -> Vec<Node> {
        let order: Vec<Index> = self.iter_postorder().map(|(idx, _)| idx).collect();
        let NodeArena { mut arena, roots } = self;
        let mut built: HashMap<Index, Node> = HashMap::with_capacity(order.len());

        for idx in order {
            let Some(slot) = arena.remove(idx) else {
                continue;
            };
            let mut node = slot.data;
            let parent_ref = node.as_parent_ref();
            node.children = slot
                .children
                .iter()
                .filter_map(|child_idx| built.remove(child_idx))
                .map(|mut child| {
                    child.declared_parent_id = Some(parent_ref.id.clone());
                    child.parent = Some(parent_ref.clone());
                    child
                })
                .collect();
            built.insert(idx, node);
        }

        roots
            .iter()
            .filter_map(|root| built.remove(root))
            .collect()
    }
}

pub struct PostOrderIterator<'a> {
    arena: &'a NodeArena,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(arena: &'a NodeArena) -> Self {
        let stack = arena.roots.iter().rev().map(|&r| (r, false)).collect();
        Self { arena, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a ArenaNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                if visited {
                    return Some((current_idx, node));
                }
                self.stack.push((current_idx, true));
                for &child in node.children.iter().rev() {
                    self.stack.push((child, false));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NodeArena {
        let mut arena = NodeArena::new();
        let a = arena.insert_node(Node::new("a", "A"), None);
        let b = arena.insert_node(Node::new("b", "B"), Some(a));
        arena.insert_node(Node::new("c", "C"), Some(b));
        arena.insert_node(Node::new("d", "D"), Some(a));
        arena.insert_node(Node::new("e", "E"), None);
        arena
    }

    #[test]
    fn postorder_visits_children_before_parents() {
        let arena = sample();
        let ids: Vec<_> = arena
            .iter_postorder()
            .map(|(_, n)| n.data.id.as_str())
            .collect();
        assert_eq!(ids, vec!["c", "b", "d", "a", "e"]);
    }

    #[test]
    fn depth_is_longest_root_to_leaf_chain() {
        assert_eq!(sample().depth(), 3);
        assert_eq!(NodeArena::new().depth(), 0);
    }

    #[test]
    fn into_forest_links_children_back_to_parent() {
        let forest = sample().into_forest();

        assert_eq!(forest.len(), 2);
        let a = &forest[0];
        assert_eq!(a.children.len(), 2);
        assert_eq!(a.children[0].id, "b");
        assert_eq!(a.children[0].parent_id(), Some("a"));
        assert_eq!(a.children[0].children[0].id, "c");
        assert_eq!(a.children[1].id, "d");
        assert!(forest[1].is_leaf());
    }

    #[test]
    fn into_forest_replaces_payload_children_with_arena_links() {
        let mut arena = NodeArena::new();
        let stale = Node::new("a", "A").with_children(vec![Node::new("x", "X")]);
        let a = arena.insert_node(stale, None);
        arena.insert_node(Node::new("b", "B"), Some(a));

        let forest = arena.into_forest();

        assert_eq!(forest[0].children.len(), 1);
        assert_eq!(forest[0].children[0].id, "b");
    }
}
