//! Application state shared across handlers.

use std::sync::Arc;

use leekspin_core::Catalog;

use crate::claude::{ChatModel, ClaudeClient, ClaudeError};
use crate::config::ServerConfig;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; all clones see the same catalog and model
/// client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    catalog: Catalog,
    model: Arc<dyn ChatModel>,
}

impl AppState {
    /// Create application state backed by the real Claude client.
    ///
    /// # Errors
    ///
    /// Returns an error if the Claude client cannot be built from the
    /// configuration.
    pub fn new(config: ServerConfig, catalog: Catalog) -> Result<Self, ClaudeError> {
        let claude = ClaudeClient::new(&config.claude)?;
        Ok(Self::with_model(config, catalog, Arc::new(claude)))
    }

    /// Create application state with an explicit model implementation.
    ///
    /// Used by tests to substitute a scripted model for the live API.
    #[must_use]
    pub fn with_model(config: ServerConfig, catalog: Catalog, model: Arc<dyn ChatModel>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                model,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get the chat model client.
    #[must_use]
    pub fn model(&self) -> Arc<dyn ChatModel> {
        Arc::clone(&self.inner.model)
    }
}
