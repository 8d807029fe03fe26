//! Application state with store-backed resources.
//!
//! The state is cloned for each request and holds the configuration and one
//! store trait object per resource. Handlers build a request-scoped service
//! on top of the store.

use std::sync::Arc;

use resourcekit_core::storage::Store;

use crate::config::{Config, StorageBackend};
use crate::models::Item;
use crate::storage::InMemoryStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Item store (in-memory or SQLite).
    pub items: Arc<dyn Store<Item>>,
}

impl AppState {
    /// Creates AppState from explicit parts.
    pub fn from_parts(config: Config, items: Arc<dyn Store<Item>>) -> Self {
        Self { config, items }
    }

    /// Creates AppState with in-memory stores.
    pub fn in_memory(config: Config) -> Self {
        Self::from_parts(config, Arc::new(InMemoryStore::<Item>::new()))
    }

    /// Creates AppState with the store backend selected by `config`.
    pub async fn new(config: Config) -> Result<Self, anyhow::Error> {
        match config.storage_backend {
            StorageBackend::Memory => {
                tracing::info!("Using in-memory storage");
                Ok(Self::in_memory(config))
            }
            StorageBackend::Sqlite => Self::sqlite(config).await,
        }
    }

    #[cfg(feature = "sqlite")]
    async fn sqlite(config: Config) -> Result<Self, anyhow::Error> {
        use crate::storage::SqliteStore;

        tracing::info!(path = %config.sqlite_path, "Using SQLite storage");
        let items = SqliteStore::<Item>::new(&config.sqlite_path).await?;
        Ok(Self::from_parts(config, Arc::new(items)))
    }

    #[cfg(not(feature = "sqlite"))]
    async fn sqlite(_config: Config) -> Result<Self, anyhow::Error> {
        anyhow::bail!("STORAGE_BACKEND=sqlite requires the 'sqlite' feature")
    }
}

#[cfg(test)]
impl Default for AppState {
    /// In-memory state with fixed pagination, independent of the environment.
    fn default() -> Self {
        Self::in_memory(crate::config::tests::test_config())
    }
}
