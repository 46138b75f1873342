//! Sub-category hierarchy service
//!
//! Fetches sub-categories through a `SubCategorySource` and runs the
//! domain tree operations on the fetched snapshot.

use std::sync::Arc;

use tracing::{debug, info};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{
    available_parents_strict, breadcrumb, unique_nodes, validate_reparent, DomainError, Node,
    OrphanPolicy, SubCategoryUpdate, TreeBuilder,
};
use crate::infrastructure::traits::{Notifier, SourceError, SubCategorySource};

/// Service for retrieving and shaping sub-category hierarchies.
pub struct HierarchyService {
    source: Arc<dyn SubCategorySource>,
    notifier: Arc<dyn Notifier>,
    policy: OrphanPolicy,
}

impl HierarchyService {
    pub fn new(
        source: Arc<dyn SubCategorySource>,
        notifier: Arc<dyn Notifier>,
        policy: OrphanPolicy,
    ) -> Self {
        Self {
            source,
            notifier,
            policy,
        }
    }

    /// Roots of a category's hierarchy with children populated.
    ///
    /// Uses the server-side hierarchy when the source provides one,
    /// otherwise assembles the flat list locally.
    pub fn hierarchy(&self, category_id: &str) -> ApplicationResult<Vec<Node>> {
        debug!("hierarchy: category={}", category_id);
        self.report("Fetch failed", self.fetch_hierarchy(category_id))
    }

    /// Flat sub-category list, optionally for one category.
    pub fn flat_list(&self, category_id: Option<&str>) -> ApplicationResult<Vec<Node>> {
        debug!("flat_list: category={:?}", category_id);
        let result = match category_id {
            Some(id) => validate_category_id(id).and_then(|id| self.fetch_flat(Some(id))),
            None => self.fetch_flat(None),
        };
        self.report("Fetch failed", result)
    }

    /// Assemble a forest from an already fetched flat list.
    pub fn build_tree(&self, flat: &[Node]) -> ApplicationResult<Vec<Node>> {
        debug!("build_tree: nodes={}", flat.len());
        self.report("Build failed", self.assemble(flat))
    }

    /// Valid new parents for `current_id` within a category.
    ///
    /// Without `current_id` (a node being created) every sub-category of
    /// the category qualifies. An unknown `current_id` is an error.
    pub fn available_parents(
        &self,
        category_id: &str,
        current_id: Option<&str>,
    ) -> ApplicationResult<Vec<Node>> {
        debug!(
            "available_parents: category={}, current={:?}",
            category_id, current_id
        );
        let result = validate_category_id(category_id)
            .and_then(|id| self.fetch_flat(Some(id)))
            .and_then(|flat| {
                available_parents_strict(&flat, current_id).map_err(ApplicationError::from)
            });
        self.report("Fetch failed", result)
    }

    /// Root-to-node path of sub-category `id`.
    pub fn breadcrumb(&self, category_id: &str, id: &str) -> ApplicationResult<Vec<Node>> {
        debug!("breadcrumb: category={}, id={}", category_id, id);
        let result = self.fetch_hierarchy(category_id).and_then(|forest| {
            breadcrumb(&forest, id)
                .map(|path| path.into_iter().map(Node::detached).collect())
                .ok_or_else(|| DomainError::sub_category_not_found(id).into())
        });
        self.report("Fetch failed", result)
    }

    /// One sub-category with its children and properties.
    pub fn get(&self, id: &str) -> ApplicationResult<Node> {
        debug!("get: id={}", id);
        let result = validate_sub_category_id(id)
            .and_then(|id| self.source.fetch_one(id).map_err(from_source));
        self.report("Fetch failed", result)
    }

    /// Move sub-category `id` under `new_parent_id`, or to the root level.
    ///
    /// The move is validated against the current snapshot of the category
    /// before anything is sent: a node cannot become a child of itself or
    /// of one of its descendants.
    pub fn reparent(
        &self,
        category_id: &str,
        id: &str,
        new_parent_id: Option<&str>,
    ) -> ApplicationResult<Node> {
        debug!(
            "reparent: category={}, id={}, parent={:?}",
            category_id, id, new_parent_id
        );
        let result = self.move_node(category_id, id, new_parent_id);
        if result.is_ok() {
            self.notifier
                .success("Updated", "Sub category updated successfully");
        }
        self.report("Update failed", result)
    }

    fn move_node(
        &self,
        category_id: &str,
        id: &str,
        new_parent_id: Option<&str>,
    ) -> ApplicationResult<Node> {
        let category_id = validate_category_id(category_id)?;
        let id = validate_sub_category_id(id)?;
        let flat = self.fetch_flat(Some(category_id))?;
        validate_reparent(&flat, id, new_parent_id)?;

        let known = unique_nodes(&flat);
        let find = |wanted: &str| known.iter().copied().find(|n| n.id == wanted);
        let current = find(id).ok_or_else(|| DomainError::sub_category_not_found(id))?;
        let payload = SubCategoryUpdate {
            name: current.name.clone(),
            category_id: category_id.to_string(),
            parent_id: new_parent_id.map(str::to_string),
        };
        self.source.update(id, &payload).map_err(from_source)?;
        info!("moved {} under {:?}", id, new_parent_id);

        let mut moved = current.detached();
        moved.parent = new_parent_id.and_then(find).map(Node::as_parent_ref);
        moved.declared_parent_id = payload.parent_id;
        Ok(moved)
    }

    fn fetch_hierarchy(&self, category_id: &str) -> ApplicationResult<Vec<Node>> {
        let category_id = validate_category_id(category_id)?;
        match self.source.fetch_hierarchy(category_id) {
            Ok(roots) => Ok(roots),
            Err(SourceError::HierarchyUnsupported) => {
                debug!("source has no nested hierarchy, assembling locally");
                let flat = self.fetch_flat(Some(category_id))?;
                self.assemble(&flat)
            }
            Err(e) => Err(from_source(e)),
        }
    }

    fn fetch_flat(&self, category_id: Option<&str>) -> ApplicationResult<Vec<Node>> {
        self.source.fetch_flat_list(category_id).map_err(from_source)
    }

    fn assemble(&self, flat: &[Node]) -> ApplicationResult<Vec<Node>> {
        Ok(TreeBuilder::with_policy(self.policy).build(flat)?)
    }

    /// Surface a failure to the user once, then hand it back unchanged.
    fn report<T>(&self, title: &str, result: ApplicationResult<T>) -> ApplicationResult<T> {
        if let Err(e) = &result {
            self.notifier.error(title, &e.to_string());
        }
        result
    }
}

fn validate_category_id(category_id: &str) -> ApplicationResult<&str> {
    let trimmed = category_id.trim();
    if trimmed.is_empty() {
        return Err(DomainError::EmptyCategoryId.into());
    }
    Ok(trimmed)
}

fn validate_sub_category_id(id: &str) -> ApplicationResult<&str> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(DomainError::EmptySubCategoryId.into());
    }
    Ok(trimmed)
}

/// Unknown categories and sub-categories surface as domain NotFound errors.
fn from_source(e: SourceError) -> ApplicationError {
    match e {
        SourceError::CategoryNotFound(id) => DomainError::category_not_found(id).into(),
        SourceError::SubCategoryNotFound(id) => DomainError::sub_category_not_found(id).into(),
        other => other.into(),
    }
}
