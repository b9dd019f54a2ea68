use std::sync::Arc;

use batdeck_core::catalog_config::CatalogConfig;
use batdeck_core::codepage::DiagnosticCodepage;
use batdeck_core::content::ContentService;
use batdeck_core::registry::Registry;
use batdeck_core::scripting::executor::ScriptExecutor;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (everything is behind `Arc`). The registry is
/// built once here and never mutated, so handlers read it without locks.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Immutable key -> entry catalogue.
    pub registry: Arc<Registry>,
    /// Whole-document read/replace of backing files.
    pub content: Arc<ContentService>,
    /// Attached or detached launcher, per catalogue configuration.
    pub executor: Arc<dyn ScriptExecutor>,
}

impl AppState {
    /// Composition root: load the catalogue document and build every service.
    ///
    /// A missing or invalid catalogue document is not fatal; the server
    /// starts with defaults so the document can be created through the
    /// self-configuration entry.
    pub fn from_config(config: ServerConfig) -> Self {
        let catalog = match CatalogConfig::load(&config.catalog_path) {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::warn!(
                    path = %config.catalog_path.display(),
                    error = %e,
                    "Catalogue configuration unavailable, using defaults"
                );
                CatalogConfig::default()
            }
        };
        tracing::info!(
            roots = ?catalog.discovery.roots,
            max_depth = catalog.discovery.max_depth,
            declared = catalog.scripts.len(),
            mode = ?catalog.execution.mode,
            "Loaded catalogue configuration"
        );

        let self_config = config
            .expose_self_config
            .then_some(config.catalog_path.as_path());
        let registry = Registry::from_config(&catalog, self_config);

        let codepage = DiagnosticCodepage::from_label(&catalog.execution.codepage);
        let executor = batdeck_core::scripting::executor_for(catalog.execution.mode, codepage);

        Self {
            config: Arc::new(config),
            registry: Arc::new(registry),
            content: Arc::new(ContentService::default()),
            executor,
        }
    }
}
