//! Application services

pub mod hierarchy;

pub use hierarchy::HierarchyService;
