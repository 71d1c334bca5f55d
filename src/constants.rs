//! Constants used throughout StayKey
//!
//! This module contains all constant values used in the StayKey runtime,
//! including configuration paths, login-code policy, and API error codes.

use once_cell::sync::Lazy;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Get the home directory with fallback to current directory
pub fn get_home_dir() -> &'static str {
    static HOME_DIR: Lazy<String> = Lazy::new(|| {
        std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string())
    });
    &HOME_DIR
}

/// Default config directory (~/.staykey)
pub fn default_config_dir() -> &'static str {
    static CONFIG_DIR: Lazy<String> = Lazy::new(|| format!("{}/.staykey", get_home_dir()));
    &CONFIG_DIR
}

/// Default SQLite DSN (~/.staykey/staykey.db)
pub fn default_sqlite_dsn() -> &'static str {
    static SQLITE_DSN: Lazy<String> = Lazy::new(|| format!("{}/staykey.db", default_config_dir()));
    &SQLITE_DSN
}

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = "staykey.config.json";

/// Storage driver: in-memory
pub const STORAGE_DRIVER_MEMORY: &str = "memory";

/// Storage driver: SQLite
pub const STORAGE_DRIVER_SQLITE: &str = "sqlite";

/// Storage driver: PostgreSQL
pub const STORAGE_DRIVER_POSTGRES: &str = "postgres";

/// Environment variable: bot shared secret (overrides config)
pub const ENV_BOT_SECRET: &str = "STAYKEY_BOT_SECRET";

/// Default HTTP port
pub const DEFAULT_HTTP_PORT: u16 = 3330;

/// Default HTTP host
pub const DEFAULT_HTTP_HOST: &str = "127.0.0.1";

// ============================================================================
// LOGIN CODE POLICY
// ============================================================================

/// Number of decimal digits in a login code
pub const CODE_LENGTH: usize = 4;

/// How long a freshly issued login code stays valid
pub const CODE_TTL_SECS: i64 = 120;

/// Minimum digit count for a string to be treated as a phone number
pub const MIN_PHONE_DIGITS: usize = 9;

// ============================================================================
// API ERROR CODES
// ============================================================================

/// Phone number missing or blank
pub const ERR_INVALID_PHONE: u32 = 40001;

/// No identity record for the given phone or chat id
pub const ERR_USER_NOT_FOUND: u32 = 40401;

/// Chat account was never linked to an identity record
pub const ERR_NOT_LINKED: u32 = 40402;

// ============================================================================
// HTTP ROUTES
// ============================================================================

/// Mini App: register or link by phone + chat id
pub const ROUTE_REGISTER: &str = "/api/auth/register";

/// Mini App: request a login code
pub const ROUTE_REQUEST_CODE: &str = "/api/auth/request-code";

/// Bot: fetch the deliverable code (secret-gated)
pub const ROUTE_BOT_CODE: &str = "/api/auth/bot/code";

/// Bot: upsert profile info (secret-gated)
pub const ROUTE_BOT_ENSURE_USER: &str = "/api/auth/bot/ensure-user";

/// Bot: read profile projection (secret-gated)
pub const ROUTE_BOT_PROFILE: &str = "/api/auth/bot/profile";

/// Header carrying the bot shared secret
pub const BOT_SECRET_HEADER: &str = "x-bot-secret";
