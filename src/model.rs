//! Core data models for StayKey
//!
//! This module contains the identity record that backs the login-code flow,
//! the request/response DTOs for the HTTP surface, and the structured API
//! response envelope shared by every endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A person who can log in, keyed by phone and/or chat account id
///
/// `phone` is the stable identity key. Until the user has shared a real
/// phone number it may hold a placeholder (the chat username or stringified
/// chat id); a later profile sync upgrades it but never blanks it.
/// `login_code` and `code_expires_at` are always set together - an expired
/// pair is treated as absent wherever the code is consulted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    /// Surrogate record id
    pub id: Uuid,

    /// Identity key (phone number, unique; placeholder until known)
    pub phone: String,

    /// Linked chat account id (unique when present)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    /// Current one-time login code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login_code: Option<String>,

    /// When `login_code` stops being valid (UTC)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_expires_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Identity {
    /// Create a fresh record with the given identity key
    pub fn new(phone: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            phone: phone.into(),
            chat_id: None,
            first_name: None,
            last_name: None,
            login_code: None,
            code_expires_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// The currently valid login code, if any (lazy expiry)
    pub fn valid_code(&self, now: DateTime<Utc>) -> Option<&str> {
        match (&self.login_code, self.code_expires_at) {
            (Some(code), Some(expires_at)) if !code.is_empty() && now < expires_at => {
                Some(code.as_str())
            }
            _ => None,
        }
    }
}

/// Read-only profile projection returned to the bot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    pub chat_id: i64,
}

// ============================================================================
// REQUEST / RESPONSE DTOS (HTTP surface)
// ============================================================================

/// Mini App start: register or link user by phone and chat id
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub phone: String,
    pub chat_id: i64,
}

/// Mini App: request a login code (phone + chat id)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestCodeRequest {
    pub phone: String,
    pub chat_id: i64,
}

/// Bot: fetch the deliverable code for a chat account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotCodeRequest {
    pub chat_id: i64,
}

/// Bot: the plaintext code to deliver in chat
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotCodeResponse {
    pub code: String,
}

/// Bot /start: save or update profile info (phone optional, can arrive later)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnsureUserRequest {
    pub chat_id: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

// ============================================================================
// RESPONSE ENVELOPE
// ============================================================================

/// Structured result envelope shared by every endpoint
///
/// Domain rejections are data, not faults: `success` plus a stable numeric
/// `errorCode` lets callers branch without parsing messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<u32>,
}

impl ApiResponse {
    /// Plain success with no payload
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
            error: None,
            error_code: None,
        }
    }

    /// Success carrying a human-readable instruction
    pub fn ok_with_message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            error: None,
            error_code: None,
        }
    }

    /// Failure with message and numeric code
    pub fn error(error: impl Into<String>, error_code: u32) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
            error_code: Some(error_code),
        }
    }
}

impl From<&crate::error::AuthError> for ApiResponse {
    fn from(err: &crate::error::AuthError) -> Self {
        ApiResponse::error(err.to_string(), err.code())
    }
}
