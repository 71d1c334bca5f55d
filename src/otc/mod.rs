//! One-time login codes
//!
//! The manager generates, stores, expires, and hands out short-lived numeric
//! login codes bound to an identity record (phone and/or chat account id).
//! At most one code is valid per identity at any time; expiry is evaluated
//! lazily at read time, so there is no background sweeper. Redemption and
//! verification belong to the login endpoint, not to this component - the
//! only guarantee here is that a code read through [`CodeManager`] is correct
//! and inside its validity window at that moment.

pub mod code;

use std::sync::Arc;

use chrono::Duration;

use crate::constants::CODE_TTL_SECS;
use crate::error::AuthError;
use crate::model::{EnsureUserRequest, Identity, Profile};
use crate::storage::IdentityStorage;
use crate::{Result, StayKeyError};

pub use code::{Clock, CodeGenerator, RandomCodeGenerator, SystemClock};

/// Instruction returned from a successful code request. The code itself is
/// intentionally absent - delivery happens out-of-band through the bot.
pub const CODE_REQUESTED_MESSAGE: &str =
    "Code generated. Open the chat bot and press /start to receive your code.";

/// Orchestrates the login-code lifecycle against the identity store
///
/// Every operation is one request-scoped read-modify-write; concurrent
/// operations on the same record resolve last-write-wins, which is acceptable
/// because a lost update only means the user has to request a code again.
pub struct CodeManager {
    storage: Arc<dyn IdentityStorage>,
    clock: Arc<dyn Clock>,
    generator: Arc<dyn CodeGenerator>,
    code_ttl: Duration,
}

impl CodeManager {
    /// Create a manager with the production clock and random generator
    pub fn new(storage: Arc<dyn IdentityStorage>) -> Self {
        Self::with_parts(storage, Arc::new(SystemClock), Arc::new(RandomCodeGenerator))
    }

    /// Create a manager with explicit clock and generator (tests)
    pub fn with_parts(
        storage: Arc<dyn IdentityStorage>,
        clock: Arc<dyn Clock>,
        generator: Arc<dyn CodeGenerator>,
    ) -> Self {
        Self {
            storage,
            clock,
            generator,
            code_ttl: Duration::seconds(CODE_TTL_SECS),
        }
    }

    /// Register a new identity by phone, or relink an existing one
    ///
    /// Last-write-wins on `chat_id`: linking does not check whether the chat
    /// account was already linked elsewhere; the storage uniqueness index
    /// rejects a duplicate link instead of silently unlinking the other
    /// record.
    pub async fn register_or_link(&self, phone: &str, chat_id: i64) -> Result<()> {
        let phone = normalize_required_phone(phone)?;
        let now = self.clock.now();

        match self.storage.find_by_phone(phone).await? {
            None => {
                let mut identity = Identity::new(phone, now);
                identity.chat_id = Some(chat_id);
                self.storage.insert_identity(&identity).await?;
            }
            Some(mut identity) => {
                identity.chat_id = Some(chat_id);
                identity.updated_at = now;
                self.storage.update_identity(&identity).await?;
            }
        }

        Ok(())
    }

    /// Issue a fresh code for a registered phone
    ///
    /// Always rotates: a still-valid previous code is overwritten. Returns an
    /// instruction string only; never creates a record as a side effect.
    pub async fn request_code(&self, phone: &str, chat_id: i64) -> Result<String> {
        let phone = normalize_required_phone(phone)?;

        let Some(mut identity) = self.storage.find_by_phone(phone).await? else {
            return Err(StayKeyError::Auth(AuthError::UserNotFound));
        };

        let now = self.clock.now();
        identity.login_code = Some(self.generator.generate());
        identity.code_expires_at = Some(now + self.code_ttl);
        identity.chat_id = Some(chat_id);
        identity.updated_at = now;
        self.storage.update_identity(&identity).await?;

        Ok(CODE_REQUESTED_MESSAGE.to_string())
    }

    /// The plaintext code the bot should deliver for this chat account
    ///
    /// Idempotent within the validity window: repeated calls return the same
    /// still-valid code, so a user mid-typing is never invalidated. Once the
    /// window has passed a fresh code and a fresh window are issued.
    pub async fn code_for_delivery(&self, chat_id: i64) -> Result<String> {
        let Some(mut identity) = self.storage.find_by_chat_id(chat_id).await? else {
            return Err(StayKeyError::Auth(AuthError::NotLinked));
        };

        let now = self.clock.now();
        if let Some(code) = identity.valid_code(now) {
            return Ok(code.to_string());
        }

        let code = self.generator.generate();
        identity.login_code = Some(code.clone());
        identity.code_expires_at = Some(now + self.code_ttl);
        identity.updated_at = now;
        self.storage.update_identity(&identity).await?;

        Ok(code)
    }

    /// Upsert an identity record keyed by chat account id
    ///
    /// On create, the username (or the stringified chat id) stands in as the
    /// identity key until a real phone number arrives. On update, non-empty
    /// fields win and empty fields never downgrade known values. Calling
    /// repeatedly with the same inputs converges to the same stored record.
    pub async fn ensure_linked_profile(&self, req: &EnsureUserRequest) -> Result<()> {
        let now = self.clock.now();

        match self.storage.find_by_chat_id(req.chat_id).await? {
            None => {
                let identity_key = non_empty(req.phone.as_deref())
                    .or_else(|| non_empty(req.username.as_deref()))
                    .map(str::to_string)
                    .unwrap_or_else(|| req.chat_id.to_string());

                let mut identity = Identity::new(identity_key, now);
                identity.chat_id = Some(req.chat_id);
                identity.first_name = non_empty(req.first_name.as_deref()).map(str::to_string);
                identity.last_name = non_empty(req.last_name.as_deref()).map(str::to_string);
                self.storage.insert_identity(&identity).await?;
            }
            Some(mut identity) => {
                if let Some(first_name) = non_empty(req.first_name.as_deref()) {
                    identity.first_name = Some(first_name.to_string());
                }
                if let Some(last_name) = non_empty(req.last_name.as_deref()) {
                    identity.last_name = Some(last_name.to_string());
                }
                if let Some(phone) = non_empty(req.phone.as_deref()) {
                    identity.phone = phone.to_string();
                }
                identity.updated_at = now;
                self.storage.update_identity(&identity).await?;
            }
        }

        Ok(())
    }

    /// Read-only profile projection for a linked chat account
    pub async fn profile(&self, chat_id: i64) -> Result<Profile> {
        let Some(identity) = self.storage.find_by_chat_id(chat_id).await? else {
            return Err(StayKeyError::Auth(AuthError::UserNotFound));
        };

        Ok(Profile {
            first_name: identity.first_name,
            last_name: identity.last_name,
            phone: Some(identity.phone),
            chat_id,
        })
    }
}

/// Reject blank identity keys, trimming surrounding whitespace
fn normalize_required_phone(phone: &str) -> Result<&str> {
    let trimmed = phone.trim();
    if trimmed.is_empty() {
        return Err(StayKeyError::Auth(AuthError::InvalidPhone));
    }
    Ok(trimmed)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod code_test;
