//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/cattree/cattree.toml`
//! 3. Local config: `<dir>/.cattree.toml` (usually the working directory)
//! 4. Environment variables: `CATTREE_*` prefix, `__` between sections

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{OrphanPolicy, DEFAULT_INDENT};

/// Default API base, matching the frontend's fallback.
pub const DEFAULT_API_BASE: &str = "http://localhost:4000/api";

/// Backend API connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL, e.g. `http://localhost:4000/api`
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.into(),
            timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Raw settings for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawApiConfig {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub api: RawApiConfig,
    pub orphan_policy: Option<OrphanPolicy>,
    pub indent_unit: Option<String>,
    pub store_path: Option<PathBuf>,
}

/// Unified configuration for cattree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// How local tree assembly treats unknown parent ids
    pub orphan_policy: OrphanPolicy,
    /// Indentation unit for flattened output
    pub indent_unit: String,
    /// Session store file (access token)
    pub store_path: PathBuf,
    pub api: ApiConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            orphan_policy: OrphanPolicy::default(),
            indent_unit: DEFAULT_INDENT.into(),
            store_path: default_store_path(),
        }
    }
}

fn default_store_path() -> PathBuf {
    ProjectDirs::from("", "", "cattree")
        .map(|dirs| dirs.data_dir().join("session.toml"))
        .unwrap_or_else(|| PathBuf::from("~/.cattree/session.toml"))
}

/// Get the XDG config directory for cattree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "cattree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("cattree.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".cattree.toml")
}

/// Expand `~`, `$VAR` and `${VAR}`; unknown variables leave the input as is.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// `local_dir` is searched for `.cattree.toml`.
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_from(global_config_path().as_deref(), local_dir)
    }

    /// Load settings from an explicit global config file.
    pub fn load_from(global: Option<&Path>, local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global {
            if global_path.exists() {
                current = current.merge_with(&load_raw_settings(global_path)?);
            }
        }

        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                current = current.merge_with(&load_raw_settings(&local_path)?);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Overlay wins for every field it specifies.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            api: ApiConfig {
                base_url: overlay
                    .api
                    .base_url
                    .clone()
                    .unwrap_or_else(|| self.api.base_url.clone()),
                timeout_secs: overlay.api.timeout_secs.unwrap_or(self.api.timeout_secs),
            },
            orphan_policy: overlay.orphan_policy.unwrap_or(self.orphan_policy),
            indent_unit: overlay
                .indent_unit
                .clone()
                .unwrap_or_else(|| self.indent_unit.clone()),
            store_path: overlay
                .store_path
                .clone()
                .unwrap_or_else(|| self.store_path.clone()),
        }
    }

    /// Apply CATTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("CATTREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("api.base_url") {
            settings.api.base_url = val;
        }
        if let Ok(val) = config.get_string("api.timeout_secs") {
            settings.api.timeout_secs = val.parse().map_err(|_| ApplicationError::Config {
                message: format!("CATTREE_API__TIMEOUT_SECS is not a number: {val}"),
            })?;
        }
        if let Ok(val) = config.get_string("orphan_policy") {
            settings.orphan_policy = val
                .parse()
                .map_err(|message| ApplicationError::Config { message })?;
        }
        if let Ok(val) = config.get_string("indent_unit") {
            settings.indent_unit = val;
        }
        if let Ok(val) = config.get_string("store_path") {
            settings.store_path = PathBuf::from(val);
        }

        Ok(settings)
    }

    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.store_path.to_string_lossy().as_ref());
        self.store_path = PathBuf::from(expanded);
    }

    /// Render settings as TOML, e.g. for `config init`.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: e.to_string(),
        })
    }
}

/// Commented template for a fresh config file.
pub fn config_template() -> String {
    format!(
        r#"# cattree configuration

# orphan_policy = "reject"   # or "promote"
# indent_unit = "  "
# store_path = "~/.local/share/cattree/session.toml"

[api]
# base_url = "{DEFAULT_API_BASE}"
# timeout_secs = 30
"#
    )
}
