//! Application state management.
//!
//! Holds the shared storage backend and settings handed to every route
//! handler. Storage is PostgreSQL when DATABASE_URL is configured and the
//! in-memory backend otherwise (development and tests).

use crate::config::Settings;
use crate::storage::{
    MemoryStorageBackend, PostgresStorageBackend, StorageBackend, StorageError,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Application state shared across all route handlers.
#[derive(Clone)]
pub struct AppState {
    /// Storage backend for forms and responses
    pub storage: Arc<dyn StorageBackend>,
    /// Runtime settings
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Create state backed by the in-memory storage backend.
    pub fn in_memory() -> Self {
        Self::with_storage(Arc::new(MemoryStorageBackend::new()), Settings::from_env())
    }

    /// Create state with an explicit backend and settings.
    pub fn with_storage(storage: Arc<dyn StorageBackend>, settings: Settings) -> Self {
        Self {
            storage,
            settings: Arc::new(settings),
        }
    }

    /// Initialize state from settings: connect to PostgreSQL and run
    /// migrations when DATABASE_URL is set, otherwise fall back to the
    /// in-memory backend.
    pub async fn from_settings(settings: Settings) -> Result<Self, StorageError> {
        let Some(database_url) = settings.database_url.clone() else {
            warn!("DATABASE_URL not set, using in-memory storage");
            return Ok(Self::with_storage(
                Arc::new(MemoryStorageBackend::new()),
                settings,
            ));
        };

        let pool = sqlx::PgPool::connect(&database_url).await.map_err(|e| {
            StorageError::ConnectionError(format!("Failed to connect to database: {}", e))
        })?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| StorageError::ConnectionError(format!("Migration failed: {}", e)))?;

        info!("connected to PostgreSQL, migrations applied");
        Ok(Self::with_storage(
            Arc::new(PostgresStorageBackend::new(pool)),
            settings,
        ))
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::in_memory()
    }
}
