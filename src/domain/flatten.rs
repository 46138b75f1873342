//! Pre-order linearization of a forest for indented display.

use serde::Serialize;

use crate::domain::entities::Node;

/// Default indentation unit: two spaces per level.
pub const DEFAULT_INDENT: &str = "  ";

/// A node together with its distance from the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FlatEntry<'a> {
    pub node: &'a Node,
    pub depth: usize,
}

impl FlatEntry<'_> {
    pub fn indent(&self, unit: &str) -> String {
        unit.repeat(self.depth)
    }

    /// Display label: indentation followed by the node name.
    pub fn label(&self, unit: &str) -> String {
        format!("{}{}", self.indent(unit), self.node.name)
    }
}

/// Depth-first pre-order walk over a forest with an explicit stack.
pub struct PreOrder<'a> {
    stack: Vec<(&'a Node, usize)>,
}

impl<'a> PreOrder<'a> {
    pub fn new(forest: &'a [Node], start_depth: usize) -> Self {
        let stack = forest.iter().rev().map(|n| (n, start_depth)).collect();
        Self { stack }
    }
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = FlatEntry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (node, depth) = self.stack.pop()?;
        // Push children in reverse order for left-to-right traversal
        for child in node.children.iter().rev() {
            self.stack.push((child, depth + 1));
        }
        Some(FlatEntry { node, depth })
    }
}

/// Flatten a forest in pre-order, annotating each node with its depth.
///
/// Roots get `start_depth`, every child one more than its parent. The
/// server-supplied `level` is ignored.
pub fn flatten(forest: &[Node], start_depth: usize) -> Vec<FlatEntry<'_>> {
    PreOrder::new(forest, start_depth).collect()
}

/// Render flattened entries as indented labels, one per line.
pub fn render_lines(entries: &[FlatEntry<'_>], unit: &str) -> Vec<String> {
    entries.iter().map(|e| e.label(unit)).collect()
}
