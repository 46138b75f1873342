//! Domain-level errors (no external dependencies)

use std::fmt;

use thiserror::Error;

/// Coarse classification callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Validation,
}

/// What an unresolved id was supposed to name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Category,
    SubCategory,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Category => write!(f, "category"),
            EntityKind::SubCategory => write!(f, "sub-category"),
        }
    }
}

/// Domain errors represent malformed hierarchy input or unresolved ids.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    #[error("category id must not be empty")]
    EmptyCategoryId,

    #[error("sub-category id must not be empty")]
    EmptySubCategoryId,

    #[error("duplicate sub-category id: {0}")]
    DuplicateId(String),

    #[error("sub-category {id} references unknown parent {parent_id}")]
    OrphanParent { id: String, parent_id: String },

    #[error("cycle detected in hierarchy at: {0}")]
    CycleDetected(String),

    #[error("cannot move {id} under {parent_id}: it is the node itself or one of its descendants")]
    InvalidParent { id: String, parent_id: String },
}

impl DomainError {
    pub fn category_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: EntityKind::Category,
            id: id.into(),
        }
    }

    pub fn sub_category_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: EntityKind::SubCategory,
            id: id.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::NotFound { .. } => ErrorKind::NotFound,
            _ => ErrorKind::Validation,
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
