//! cattree: sub-category hierarchy toolkit
//!
//! Layers, innermost first:
//! - `domain`: nodes, tree assembly, exclusion, flattening (pure)
//! - `application`: services orchestrating fetches and domain operations
//! - `infrastructure`: HTTP and JSON sources, stores, notifier, DI container
//! - `cli`: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
