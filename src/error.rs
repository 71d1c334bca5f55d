//! Error types for StayKey
//!
//! This module provides a comprehensive error hierarchy using thiserror.
//! All errors can be converted to StayKeyError for unified error handling.

use thiserror::Error;

/// Main error type for StayKey operations
#[derive(Error, Debug)]
pub enum StayKeyError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Domain rejections from the login-code flow
///
/// These are the structured, caller-branchable outcomes: every variant maps
/// to a stable numeric code carried in API responses, so clients switch on
/// the code rather than parsing messages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Phone number is required.")]
    InvalidPhone,

    #[error("User with this phone number not found.")]
    UserNotFound,

    #[error("No user linked to this chat account. Ask the user to register from the Mini App first.")]
    NotLinked,
}

impl AuthError {
    /// Stable numeric code carried in API responses
    pub fn code(&self) -> u32 {
        match self {
            AuthError::InvalidPhone => crate::constants::ERR_INVALID_PHONE,
            AuthError::UserNotFound => crate::constants::ERR_USER_NOT_FOUND,
            AuthError::NotLinked => crate::constants::ERR_NOT_LINKED,
        }
    }
}

/// Storage-specific errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unique constraint violated: {0}")]
    Conflict(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("UUID parse error: {0}")]
    UuidParse(#[from] uuid::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

// Implement From for sqlx::Error
impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err
            && db_err.is_unique_violation()
        {
            return StorageError::Conflict(db_err.to_string());
        }
        StorageError::Database(err.to_string())
    }
}

impl From<sqlx::Error> for StayKeyError {
    fn from(err: sqlx::Error) -> Self {
        StayKeyError::Storage(StorageError::from(err))
    }
}

// Implement From for uuid::Error through StorageError
impl From<uuid::Error> for StayKeyError {
    fn from(err: uuid::Error) -> Self {
        StayKeyError::Storage(StorageError::UuidParse(err))
    }
}

impl From<reqwest::Error> for StayKeyError {
    fn from(err: reqwest::Error) -> Self {
        StayKeyError::Network(NetworkError::Reqwest(err))
    }
}

/// Network-specific errors
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Connection timeout")]
    Timeout,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Convenient result type for StayKey operations
pub type Result<T> = std::result::Result<T, StayKeyError>;

impl StayKeyError {
    /// Create a validation error
    #[inline]
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        StayKeyError::Validation(msg.into())
    }

    /// Create a config error
    #[inline]
    pub fn config<S: Into<String>>(msg: S) -> Self {
        StayKeyError::Config(msg.into())
    }

    /// Create a storage error
    #[inline]
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        StayKeyError::Storage(StorageError::Database(msg.into()))
    }

    /// Create a network error
    #[inline]
    pub fn network<S: Into<String>>(msg: S) -> Self {
        StayKeyError::Network(NetworkError::Http(msg.into()))
    }

    /// The domain rejection inside this error, if any
    pub fn as_auth(&self) -> Option<&AuthError> {
        match self {
            StayKeyError::Auth(e) => Some(e),
            _ => None,
        }
    }
}
