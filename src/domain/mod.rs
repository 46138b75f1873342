//! Domain layer: entities and hierarchy logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod breadcrumb;
pub mod builder;
pub mod entities;
pub mod error;
pub mod exclusion;
pub mod flatten;
pub mod render;

pub use arena::NodeArena;
pub use breadcrumb::breadcrumb;
pub use builder::{OrphanPolicy, TreeBuilder};
pub use entities::*;
pub use error::{DomainError, DomainResult, EntityKind, ErrorKind};
pub use exclusion::{
    available_parents, available_parents_strict, exclusion_set, unique_nodes, validate_reparent,
    Exclusion,
};
pub use flatten::{flatten, render_lines, FlatEntry, PreOrder, DEFAULT_INDENT};
pub use render::{forest_to_tree, TreeDisplay};
