use crate::domain::entities::Node;

/// Path from a root down to `id`, inclusive.
///
/// Returns `None` when `id` does not occur in the forest.
pub fn breadcrumb<'a>(forest: &'a [Node], id: &str) -> Option<Vec<&'a Node>> {
    let mut stack: Vec<(&Node, Vec<&Node>)> =
        forest.iter().rev().map(|root| (root, vec![root])).collect();

    while let Some((node, path)) = stack.pop() {
        if node.id == id {
            return Some(path);
        }
        for child in node.children.iter().rev() {
            let mut child_path = path.clone();
            child_path.push(child);
            stack.push((child, child_path));
        }
    }

    None
}
