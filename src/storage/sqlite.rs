//! SQLite storage implementation
//!
//! Provides persistent storage for identity records using SQLite.

use crate::model::Identity;
use crate::storage::{IdentityStorage, sql_common::*};
use crate::{Result, StayKeyError};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use std::path::Path;
use uuid::Uuid;

/// SQLite storage backend
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Create a new SQLite storage
    ///
    /// # Arguments
    /// * `dsn` - Database path (e.g., ".staykey/staykey.db" or ":memory:" for in-memory)
    pub async fn new(dsn: &str) -> Result<Self> {
        // Prepend sqlite: prefix if not present and add create-if-missing option
        let connection_string = if dsn.starts_with("sqlite:") {
            if dsn.contains('?') {
                dsn.to_string()
            } else {
                format!("{}?mode=rwc", dsn)
            }
        } else {
            format!("sqlite:{}?mode=rwc", dsn)
        };

        // Extract actual file path for directory creation
        let file_path = dsn.strip_prefix("sqlite:").unwrap_or(dsn);

        // Validate path to prevent directory traversal attacks
        if file_path.contains("..") {
            return Err(StayKeyError::config(
                "Database path cannot contain '..' (path traversal not allowed)",
            ));
        }

        // Create parent directory if needed (unless it's :memory:)
        if file_path != ":memory:"
            && let Some(parent) = Path::new(file_path).parent()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Create connection pool
        let pool = SqlitePool::connect(&connection_string)
            .await
            .map_err(|e| StayKeyError::storage(format!("Failed to connect to SQLite: {}", e)))?;

        // Configure SQLite for better performance
        sqlx::query("PRAGMA journal_mode = WAL")
            .execute(&pool)
            .await?;
        sqlx::query("PRAGMA synchronous = NORMAL")
            .execute(&pool)
            .await?;
        sqlx::query("PRAGMA busy_timeout = 5000")
            .execute(&pool)
            .await?;
        sqlx::query("PRAGMA foreign_keys = ON")
            .execute(&pool)
            .await?;

        // Run SQLite-specific migrations
        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .map_err(|e| StayKeyError::storage(format!("Failed to run migrations: {}", e)))?;

        Ok(Self { pool })
    }

    fn parse_identity(row: &SqliteRow) -> Result<Identity> {
        Ok(Identity {
            id: Uuid::parse_str(&row.try_get::<String, _>("id")?)?,
            phone: row.try_get("phone")?,
            chat_id: row.try_get("chat_id")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            login_code: row.try_get("login_code")?,
            code_expires_at: opt_datetime_from_unix(row.try_get("code_expires_at")?),
            created_at: datetime_from_unix(row.try_get("created_at")?),
            updated_at: datetime_from_unix(row.try_get("updated_at")?),
        })
    }
}

const IDENTITY_COLUMNS: &str = "id, phone, chat_id, first_name, last_name, login_code, \
                                code_expires_at, created_at, updated_at";

#[async_trait]
impl IdentityStorage for SqliteStorage {
    async fn find_by_phone(&self, phone: &str) -> Result<Option<Identity>> {
        let row = sqlx::query(&format!(
            "SELECT {IDENTITY_COLUMNS} FROM identities WHERE phone = ?"
        ))
        .bind(phone)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(Self::parse_identity(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_by_chat_id(&self, chat_id: i64) -> Result<Option<Identity>> {
        let row = sqlx::query(&format!(
            "SELECT {IDENTITY_COLUMNS} FROM identities WHERE chat_id = ?"
        ))
        .bind(chat_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(Self::parse_identity(&row)?)),
            None => Ok(None),
        }
    }

    async fn insert_identity(&self, identity: &Identity) -> Result<()> {
        sqlx::query(
            "INSERT INTO identities (id, phone, chat_id, first_name, last_name, login_code,
                                     code_expires_at, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(identity.id.to_string())
        .bind(identity.phone.as_str())
        .bind(identity.chat_id)
        .bind(identity.first_name.as_deref())
        .bind(identity.last_name.as_deref())
        .bind(identity.login_code.as_deref())
        .bind(identity.code_expires_at.map(datetime_to_unix))
        .bind(datetime_to_unix(identity.created_at))
        .bind(datetime_to_unix(identity.updated_at))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_identity(&self, identity: &Identity) -> Result<()> {
        sqlx::query(
            "UPDATE identities
             SET phone = ?, chat_id = ?, first_name = ?, last_name = ?, login_code = ?,
                 code_expires_at = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(identity.phone.as_str())
        .bind(identity.chat_id)
        .bind(identity.first_name.as_deref())
        .bind(identity.last_name.as_deref())
        .bind(identity.login_code.as_deref())
        .bind(identity.code_expires_at.map(datetime_to_unix))
        .bind(datetime_to_unix(identity.updated_at))
        .bind(identity.id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
