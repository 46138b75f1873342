//! Sub-category source reading an exported JSON file.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::{Node, PreOrder, SubCategoryUpdate};
use crate::infrastructure::api::decode_nodes;
use crate::infrastructure::traits::{SourceError, SourceResult, SubCategorySource};

/// Reads a JSON file holding an API envelope or a bare node array.
///
/// The file is re-read on every fetch, so each call sees a fresh snapshot.
#[derive(Debug)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> SourceResult<Vec<Node>> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| SourceError::Io {
            context: format!("read {}", self.path.display()),
            source: e,
        })?;
        let nodes = decode_nodes(&content, &self.path.display().to_string())?;
        debug!("loaded {} top-level nodes from {}", nodes.len(), self.path.display());
        Ok(nodes)
    }

    /// True when walking down from the top-level roots reaches every id.
    fn is_complete_forest(nodes: &[Node]) -> bool {
        let all: HashSet<&str> = PreOrder::new(nodes, 0)
            .map(|e| e.node.id.as_str())
            .collect();
        let reached: HashSet<&str> = nodes
            .iter()
            .filter(|n| n.parent_id().is_none())
            .flat_map(|root| PreOrder::new(std::slice::from_ref(root), 0))
            .map(|e| e.node.id.as_str())
            .collect();
        debug!("nested coverage: {} of {} ids", reached.len(), all.len());
        all.iter().all(|id| reached.contains(id))
    }

    fn belongs_to(node: &Node, category_id: &str) -> bool {
        node.category_id() == Some(category_id)
    }
}

impl SubCategorySource for JsonFileSource {
    /// Nested only if the roots' subtrees hold every node of the file.
    ///
    /// Exports where each entry lists just its direct children are
    /// reported as unsupported so the caller assembles them instead.
    fn fetch_hierarchy(&self, category_id: &str) -> SourceResult<Vec<Node>> {
        let nodes = self.load()?;
        if !Self::is_complete_forest(&nodes) {
            return Err(SourceError::HierarchyUnsupported);
        }
        let roots: Vec<Node> = nodes
            .into_iter()
            .filter(|n| n.parent_id().is_none() && Self::belongs_to(n, category_id))
            .collect();
        if roots.is_empty() {
            return Err(SourceError::CategoryNotFound(category_id.to_string()));
        }
        Ok(roots)
    }

    /// Every node of the file, nested ones included, children stripped.
    ///
    /// Nested children inherit the parent link and category of the node
    /// they are nested in when they do not declare their own.
    fn fetch_flat_list(&self, category_id: Option<&str>) -> SourceResult<Vec<Node>> {
        let nodes = self.load()?;
        let mut seen = HashSet::new();
        let mut flat = Vec::new();
        let mut stack: Vec<(&Node, Option<&str>, Option<&str>)> =
            nodes.iter().rev().map(|n| (n, None, None)).collect();

        while let Some((node, nested_in, inherited_category)) = stack.pop() {
            let effective_category = node.category_id().or(inherited_category);
            for child in node.children.iter().rev() {
                stack.push((child, Some(node.id.as_str()), effective_category));
            }

            if !category_id.map_or(true, |id| effective_category == Some(id)) {
                continue;
            }
            if !seen.insert(node.id.as_str()) {
                continue;
            }
            let mut detached = node.detached();
            if detached.parent_id().is_none() {
                detached.declared_parent_id = nested_in.map(str::to_string);
            }
            flat.push(detached);
        }

        if let Some(id) = category_id {
            if flat.is_empty() {
                return Err(SourceError::CategoryNotFound(id.to_string()));
            }
        }
        Ok(flat)
    }

    /// First node with this id, searched through nested children too.
    fn fetch_one(&self, id: &str) -> SourceResult<Node> {
        let nodes = self.load()?;
        PreOrder::new(&nodes, 0)
            .find(|e| e.node.id == id)
            .map(|e| e.node.clone())
            .ok_or_else(|| SourceError::SubCategoryNotFound(id.to_string()))
    }

    fn update(&self, id: &str, _payload: &SubCategoryUpdate) -> SourceResult<()> {
        debug!("refusing update of {} in {}", id, self.path.display());
        Err(SourceError::ReadOnly(self.path.display().to_string()))
    }
}
