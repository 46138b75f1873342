//! Domain entities: core data structures

use serde::{Deserialize, Deserializer, Serialize};

/// Owning category of a sub-category, with its capability flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub has_location: bool,
    #[serde(default)]
    pub has_maintenance: bool,
    #[serde(default)]
    pub has_holder: bool,
}

/// Value type of an asset property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyDataType {
    String,
    Number,
}

/// Property definition attached to a sub-category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetProperty {
    pub id: String,
    pub name: String,
    pub data_type: PropertyDataType,
}

/// Back-reference to a parent node.
///
/// Only identifies the parent; a node never owns its parent. A nested
/// `parent` object on the wire collapses to its `id` and `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentRef {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// A sub-category, one vertex of the hierarchy forest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    pub name: String,
    /// Depth hint from the server; flattening recomputes depth.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<i64>,
    /// Flat payloads may carry the parent as a bare id.
    #[serde(
        default,
        rename = "parentId",
        skip_serializing_if = "Option::is_none"
    )]
    pub declared_parent_id: Option<String>,
    #[serde(default)]
    pub parent: Option<ParentRef>,
    /// Ordered children; order is display order.
    #[serde(default, deserialize_with = "nullable_vec")]
    pub children: Vec<Node>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub asset_properties: Vec<AssetProperty>,
}

impl Node {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            level: None,
            declared_parent_id: None,
            parent: None,
            children: Vec::new(),
            category: None,
            asset_properties: Vec::new(),
        }
    }

    /// Set the parent by id, as a flat API payload would.
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.declared_parent_id = Some(parent_id.into());
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Parent id of this node: `parentId` wins over a nested `parent` object.
    pub fn parent_id(&self) -> Option<&str> {
        self.declared_parent_id
            .as_deref()
            .or_else(|| self.parent.as_ref().map(|p| p.id.as_str()))
    }

    pub fn category_id(&self) -> Option<&str> {
        self.category.as_ref().map(|c| c.id.as_str())
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Reference to this node, suitable as a child's `parent`.
    pub fn as_parent_ref(&self) -> ParentRef {
        ParentRef {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }

    /// Copy of this node without its children.
    pub fn detached(&self) -> Self {
        Self {
            children: Vec::new(),
            ..self.clone()
        }
    }

    /// Number of nodes in this subtree, including self.
    pub fn subtree_len(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }
}

/// Body of a sub-category update.
///
/// `parent_id` is always sent; `null` moves the node to the root level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubCategoryUpdate {
    pub name: String,
    pub category_id: String,
    pub parent_id: Option<String>,
}

/// Total number of nodes across a forest.
pub fn forest_len(forest: &[Node]) -> usize {
    forest.iter().map(Node::subtree_len).sum()
}

/// Accept `null` where a list is expected.
fn nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
