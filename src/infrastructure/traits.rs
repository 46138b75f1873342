//! I/O boundary traits for testability
//!
//! These traits abstract the sub-category backend, user notifications and
//! session storage, allowing services to be tested with fake implementations.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use colored::Colorize;
use thiserror::Error;

use crate::domain::{Node, SubCategoryUpdate};

/// Failure of a sub-category fetch or update.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("category not found: {0}")]
    CategoryNotFound(String),

    #[error("sub-category not found: {0}")]
    SubCategoryNotFound(String),

    #[error("{0} is read-only")]
    ReadOnly(String),

    #[error("source cannot provide a nested hierarchy")]
    HierarchyUnsupported,

    #[error("API returned {status}: {body}")]
    Http { status: u16, body: String },

    #[error("invalid API base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("cannot decode {context}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

/// Result type for sub-category fetches.
pub type SourceResult<T> = Result<T, SourceError>;

/// The sub-category service consumed by the application layer.
pub trait SubCategorySource: Send + Sync {
    /// Roots of one category's hierarchy, children nested.
    fn fetch_hierarchy(&self, category_id: &str) -> SourceResult<Vec<Node>>;

    /// Flat sub-category list, optionally restricted to one category.
    /// Parent references may be populated, children may not.
    fn fetch_flat_list(&self, category_id: Option<&str>) -> SourceResult<Vec<Node>>;

    /// A single sub-category with its children and properties.
    fn fetch_one(&self, id: &str) -> SourceResult<Node>;

    /// Replace name, category and parent of sub-category `id`.
    fn update(&self, id: &str, payload: &SubCategoryUpdate) -> SourceResult<()>;
}

/// User-facing notification sink (toasts in a browser, stderr here).
pub trait Notifier: Send + Sync {
    fn success(&self, title: &str, message: &str);
    fn error(&self, title: &str, message: &str);
}

/// String key-value store for session data such as the access token.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> io::Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> io::Result<()>;
    fn remove(&self, key: &str) -> io::Result<()>;
}

/// Store key holding the bearer token.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Notifier printing colored messages to stderr.
#[derive(Debug, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn success(&self, title: &str, message: &str) {
        eprintln!("{} {}: {}", "✓".green(), title.green(), message);
    }

    fn error(&self, title: &str, message: &str) {
        eprintln!("{}: {}", title.red().bold(), message);
    }
}

/// Notifier that drops everything.
#[derive(Debug, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn success(&self, _title: &str, _message: &str) {}
    fn error(&self, _title: &str, _message: &str) {}
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> io::Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "memory store lock poisoned"))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// Store persisted as a flat TOML table.
///
/// A missing file reads as empty; writes create parent directories.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> io::Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        toml::from_str(&content).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("parse {}: {}", self.path.display(), e),
            )
        })
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = toml::to_string(entries)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(&self.path, content)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        let mut entries = self.load()?;
        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }
}
