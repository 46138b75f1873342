//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::domain::OrphanPolicy;

/// Sub-category hierarchy toolkit: tree assembly, reparent targets, flattened display
#[derive(Parser, Debug)]
#[command(name = "cattree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log verbosity: -d info, -dd debug, -ddd trace
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub debug: u8,

    /// Read sub-categories from a JSON file instead of the API
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub file: Option<PathBuf>,

    /// Unknown parent ids: reject the build or promote to root
    #[arg(long, global = true)]
    pub orphans: Option<OrphanPolicy>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show hierarchy as tree
    Tree {
        /// Category id (default: all sub-categories)
        #[arg(short, long)]
        category: Option<String>,
    },

    /// List hierarchy in pre-order with indentation
    Flatten {
        /// Category id (default: all sub-categories)
        #[arg(short, long)]
        category: Option<String>,
        /// Depth of the roots
        #[arg(long, default_value_t = 0)]
        start_depth: usize,
        /// Indentation unit (default from config)
        #[arg(long)]
        indent: Option<String>,
    },

    /// List valid new parents for a sub-category
    Parents {
        /// Category id
        #[arg(short, long)]
        category: String,
        /// Sub-category being moved (omit when creating a new one)
        #[arg(long)]
        current: Option<String>,
    },

    /// Assemble tree from flat list, print as JSON
    Build {
        /// Category id (default: all sub-categories)
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Show root-to-node path
    Path {
        /// Category id
        #[arg(short, long)]
        category: String,
        /// Sub-category id
        id: String,
    },

    /// Show one sub-category with children and properties
    Get {
        /// Sub-category id
        id: String,
    },

    /// Move a sub-category under a new parent
    Reparent {
        /// Category id
        #[arg(short, long)]
        category: String,
        /// Sub-category to move
        id: String,
        /// New parent id (omit to move to root level)
        #[arg(long)]
        parent: Option<String>,
    },

    /// Manage the API access token
    Token {
        #[command(subcommand)]
        command: TokenCommands,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum TokenCommands {
    /// Store bearer token
    Set {
        /// Access token
        token: String,
    },
    /// Show whether a token is stored
    Show,
    /// Remove stored token
    Clear,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config (default: ./.cattree.toml)
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}
