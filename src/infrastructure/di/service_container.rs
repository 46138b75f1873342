//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::path::Path;
use std::sync::Arc;

use crate::application::services::HierarchyService;
use crate::config::Settings;
use crate::infrastructure::api::HttpSubCategorySource;
use crate::infrastructure::json_source::JsonFileSource;
use crate::infrastructure::traits::{
    FileStore, KeyValueStore, Notifier, SubCategorySource, TerminalNotifier,
};
use crate::infrastructure::InfraResult;

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Where sub-categories come from (API or JSON file)
    pub source: Arc<dyn SubCategorySource>,

    /// User-facing notifications
    pub notifier: Arc<dyn Notifier>,

    /// Session storage (access token)
    pub store: Arc<dyn KeyValueStore>,
}

impl ServiceContainer {
    /// Create a container with real implementations.
    ///
    /// With `file` set, sub-categories are read from that JSON file instead
    /// of the API.
    pub fn new(settings: Settings, file: Option<&Path>) -> InfraResult<Self> {
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(&settings.store_path));
        let source: Arc<dyn SubCategorySource> = match file {
            Some(path) => Arc::new(JsonFileSource::new(path)),
            None => Arc::new(HttpSubCategorySource::new(
                &settings.api.base_url,
                settings.api.timeout(),
                store.clone(),
            )?),
        };

        Ok(Self::with_deps(
            settings,
            source,
            Arc::new(TerminalNotifier),
            store,
        ))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        source: Arc<dyn SubCategorySource>,
        notifier: Arc<dyn Notifier>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            source,
            notifier,
            store,
        }
    }

    pub fn hierarchy_service(&self) -> HierarchyService {
        HierarchyService::new(
            self.source.clone(),
            self.notifier.clone(),
            self.settings.orphan_policy,
        )
    }
}
