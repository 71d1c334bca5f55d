//! Utility functions and helpers
//!
//! Common utilities used throughout StayKey.

use crate::config::{Config, StorageConfig};
use crate::otc::CodeManager;
use crate::storage::SqliteStorage;
use std::sync::Arc;
use tempfile::TempDir;

/// Test environment with an isolated temporary database
///
/// Mirrors production wiring: a SQLite database in a temp directory (auto
/// cleaned on drop), a storage handle, and a ready-to-use code manager with
/// the production clock and generator.
pub struct TestEnvironment {
    /// Temporary directory - kept alive for test duration
    _temp_dir: TempDir,

    /// Storage backend pointing at the temp database
    pub storage: Arc<SqliteStorage>,

    /// Code manager wired to that storage
    pub manager: Arc<CodeManager>,

    /// Config pointing at the temp database
    pub config: Config,
}

impl TestEnvironment {
    /// Create a new isolated test environment
    pub async fn new() -> Self {
        Self::with_db_name("staykey.db").await
    }

    /// Create a test environment with a custom database name
    ///
    /// Useful when you need multiple isolated environments in the same test
    pub async fn with_db_name(db_name: &str) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join(db_name);
        let dsn = db_path.to_str().expect("temp path is valid utf-8").to_string();

        let storage = Arc::new(
            SqliteStorage::new(&dsn)
                .await
                .expect("Failed to create SQLite storage"),
        );

        let manager = Arc::new(CodeManager::new(storage.clone()));

        let config = Config {
            storage: StorageConfig {
                driver: crate::constants::STORAGE_DRIVER_SQLITE.to_string(),
                dsn,
            },
            ..Config::default()
        };

        TestEnvironment {
            _temp_dir: temp_dir,
            storage,
            manager,
            config,
        }
    }
}
