//! Application state - shared across all handlers.

use std::sync::Arc;

use scribe_core::PostStore;
use scribe_core::ports::PostRepository;
use scribe_infra::{DatabaseConfig, InMemoryPostRepository};

#[cfg(feature = "postgres")]
use scribe_infra::PostgresPostRepository;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostStore,
}

/// Failure to open the configured store.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("Failed to connect to database: {0}")]
    Database(String),

    #[error("DATABASE_URL is set but the server was built without the `postgres` feature")]
    DatabaseUnsupported,
}

impl AppState {
    /// Build the application state with the appropriate repository.
    ///
    /// Without a database configuration the in-memory repository is used.
    /// A configured database that cannot be reached is an error.
    pub async fn new(db_config: Option<&DatabaseConfig>) -> Result<Self, StateError> {
        let repo: Arc<dyn PostRepository> = match db_config {
            Some(config) => Self::database_repository(config).await?,
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                Arc::new(InMemoryPostRepository::new())
            }
        };

        tracing::info!("Application state initialized");

        Ok(Self::with_repository(repo))
    }

    pub fn with_repository(repo: Arc<dyn PostRepository>) -> Self {
        Self {
            posts: PostStore::new(repo),
        }
    }

    /// State backed by a fresh, empty in-memory store.
    pub fn in_memory() -> Self {
        Self::with_repository(Arc::new(InMemoryPostRepository::new()))
    }

    #[cfg(feature = "postgres")]
    async fn database_repository(
        config: &DatabaseConfig,
    ) -> Result<Arc<dyn PostRepository>, StateError> {
        let conn = scribe_infra::database::connect(config)
            .await
            .map_err(|e| StateError::Database(e.to_string()))?;
        Ok(Arc::new(PostgresPostRepository::new(conn)))
    }

    #[cfg(not(feature = "postgres"))]
    async fn database_repository(
        _config: &DatabaseConfig,
    ) -> Result<Arc<dyn PostRepository>, StateError> {
        tracing::error!("Running without postgres feature - cannot use DATABASE_URL");
        Err(StateError::DatabaseUnsupported)
    }
}
