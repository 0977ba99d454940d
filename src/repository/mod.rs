//! Persistence layer for registry state

pub mod equipment;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;

use crate::{
    config::{StorageBackend, StorageConfig},
    error::AppResult,
    models::equipment::OwnerId,
    registry::{Commit, LedgerSnapshot},
};

pub use equipment::EquipmentRepository;
pub use memory::MemoryRepository;

/// Durable home of the registry state.
///
/// `commit` must persist the whole commit or nothing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Read back everything committed so far
    async fn load(&self) -> AppResult<LedgerSnapshot>;

    /// Persist one planned mutation
    async fn commit(&self, commit: &Commit) -> AppResult<()>;

    /// Overwrite owner counters that drifted from the records
    async fn repair_counts(&self, counts: &[(OwnerId, i64)]) -> AppResult<()>;

    /// Check that the store is reachable
    async fn ping(&self) -> AppResult<()>;
}

/// Open the store selected by configuration
pub async fn connect(config: &StorageConfig) -> AppResult<Arc<dyn LedgerStore>> {
    match config.backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, registry state will not survive a restart");
            Ok(Arc::new(MemoryRepository::new()))
        }
        StorageBackend::Postgres => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .min_connections(config.database.min_connections)
                .connect(&config.database.url)
                .await?;

            tracing::info!("Connected to database");

            sqlx::migrate!("./migrations").run(&pool).await?;

            tracing::info!("Database migrations completed");

            Ok(Arc::new(EquipmentRepository::new(pool)))
        }
    }
}
