//! In-memory storage implementation
//!
//! Fast, non-persistent storage for development and testing.
//! Uses DashMap for lock-free concurrent access.
//!
//! **WARNING:** MemoryStorage is NOT recommended for production use:
//! - Data is lost on process restart
//! - Does not coordinate state across multiple process instances
//! - Uniqueness checks use DashMap iteration, not database-level indexes
//!
//! For production deployments, use SqliteStorage or PostgresStorage.

use super::*;
use crate::error::StorageError;
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

/// In-memory storage implementation - uses DashMap for lock-free concurrent access
#[derive(Clone, Default)]
pub struct MemoryStorage {
    identities: Arc<DashMap<Uuid, Identity>>,
}

impl MemoryStorage {
    /// Create a new in-memory storage
    pub fn new() -> Self {
        Self {
            identities: Arc::new(DashMap::new()),
        }
    }

    fn phone_taken(&self, phone: &str, exclude: Uuid) -> bool {
        self.identities
            .iter()
            .any(|entry| entry.key() != &exclude && entry.value().phone == phone)
    }

    fn chat_id_taken(&self, chat_id: i64, exclude: Uuid) -> bool {
        self.identities
            .iter()
            .any(|entry| entry.key() != &exclude && entry.value().chat_id == Some(chat_id))
    }
}

#[async_trait]
impl IdentityStorage for MemoryStorage {
    async fn find_by_phone(&self, phone: &str) -> Result<Option<Identity>> {
        Ok(self
            .identities
            .iter()
            .find(|entry| entry.value().phone == phone)
            .map(|entry| entry.value().clone()))
    }

    async fn find_by_chat_id(&self, chat_id: i64) -> Result<Option<Identity>> {
        Ok(self
            .identities
            .iter()
            .find(|entry| entry.value().chat_id == Some(chat_id))
            .map(|entry| entry.value().clone()))
    }

    async fn insert_identity(&self, identity: &Identity) -> Result<()> {
        if self.phone_taken(&identity.phone, identity.id) {
            return Err(StorageError::Conflict(format!(
                "phone already registered: {}",
                identity.phone
            ))
            .into());
        }
        if let Some(chat_id) = identity.chat_id
            && self.chat_id_taken(chat_id, identity.id)
        {
            return Err(StorageError::Conflict(format!(
                "chat account already linked: {chat_id}"
            ))
            .into());
        }

        self.identities.insert(identity.id, identity.clone());
        Ok(())
    }

    async fn update_identity(&self, identity: &Identity) -> Result<()> {
        if !self.identities.contains_key(&identity.id) {
            return Err(
                StorageError::NotFound(format!("identity record {}", identity.id)).into(),
            );
        }
        if self.phone_taken(&identity.phone, identity.id) {
            return Err(StorageError::Conflict(format!(
                "phone already registered: {}",
                identity.phone
            ))
            .into());
        }
        if let Some(chat_id) = identity.chat_id
            && self.chat_id_taken(chat_id, identity.id)
        {
            return Err(StorageError::Conflict(format!(
                "chat account already linked: {chat_id}"
            ))
            .into());
        }

        self.identities.insert(identity.id, identity.clone());
        Ok(())
    }
}
