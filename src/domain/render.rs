//! Terminal tree rendering via termtree.

use termtree::Tree;

use crate::domain::entities::Node;

pub trait TreeDisplay {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeDisplay for Node {
    fn to_tree_string(&self) -> Tree<String> {
        let leaves: Vec<_> = self.children.iter().map(|c| c.to_tree_string()).collect();
        Tree::new(self.name.clone()).with_leaves(leaves)
    }
}

/// Render a whole forest under a single labelled root.
pub fn forest_to_tree(label: &str, forest: &[Node]) -> Tree<String> {
    let leaves: Vec<_> = forest.iter().map(|n| n.to_tree_string()).collect();
    Tree::new(label.to_string()).with_leaves(leaves)
}
