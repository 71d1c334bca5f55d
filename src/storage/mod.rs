//! Storage backends for StayKey
//!
//! Provides multiple storage backends with a unified trait interface. The
//! store is the component that enforces the two identity uniqueness
//! invariants: one record per phone, one record per linked chat account.

pub mod memory;
pub mod postgres;
pub mod sql_common;
pub mod sqlite;

use crate::model::Identity;
use crate::{Result, StayKeyError};
use async_trait::async_trait;
use std::sync::Arc;

/// Durable record store for identity records
///
/// Point lookups by either unique key, plus insert and whole-record update.
/// Each call is a single commit; the store does not serialize concurrent
/// operations on the same record beyond that.
#[async_trait]
pub trait IdentityStorage: Send + Sync {
    /// Look up a record by its identity key (phone)
    async fn find_by_phone(&self, phone: &str) -> Result<Option<Identity>>;

    /// Look up a record by its linked chat account id
    async fn find_by_chat_id(&self, chat_id: i64) -> Result<Option<Identity>>;

    /// Insert a new record
    ///
    /// Fails with a conflict error when the phone or chat id is already
    /// taken by another record.
    async fn insert_identity(&self, identity: &Identity) -> Result<()>;

    /// Persist all mutable fields of an existing record (matched by id)
    async fn update_identity(&self, identity: &Identity) -> Result<()>;
}

pub use memory::MemoryStorage;
pub use postgres::PostgresStorage;
pub use sqlite::SqliteStorage;

/// Create a storage backend from configuration
pub async fn create_storage_from_config(
    config: &crate::config::StorageConfig,
) -> Result<Arc<dyn IdentityStorage>> {
    match config.driver.as_str() {
        "memory" => Ok(Arc::new(MemoryStorage::new())),
        "sqlite" => Ok(Arc::new(SqliteStorage::new(&config.dsn).await?)),
        "postgres" => Ok(Arc::new(PostgresStorage::new(&config.dsn).await?)),
        _ => Err(StayKeyError::config(format!(
            "Unknown storage driver: {}. Supported: memory, sqlite, postgres",
            config.driver
        ))),
    }
}
