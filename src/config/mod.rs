//! Configuration management for StayKey
//!
//! Loads and manages StayKey configuration from staykey.config.json

use crate::{Result, StayKeyError};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Complete StayKey configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Storage configuration (required)
    pub storage: StorageConfig,

    /// HTTP server configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http: Option<HttpConfig>,

    /// Bot configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bot: Option<BotConfig>,

    /// Logging configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log: Option<LogConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            http: None,
            bot: None,
            log: None,
        }
    }
}

/// Storage backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Driver name (sqlite, postgres, memory)
    pub driver: String,

    /// Data source name / connection string
    pub dsn: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            driver: crate::constants::STORAGE_DRIVER_SQLITE.to_string(),
            dsn: crate::constants::default_sqlite_dsn().to_string(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    crate::constants::DEFAULT_HTTP_HOST.to_string()
}

fn default_port() -> u16 {
    crate::constants::DEFAULT_HTTP_PORT
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Bot configuration
///
/// `secret_key` gates the bot-facing API endpoints; the STAYKEY_BOT_SECRET
/// environment variable overrides the file value so the secret can stay out
/// of checked-in config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotConfig {
    /// Base URL of the StayKey API, used by the bot-side client
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,

    /// Shared secret expected in the X-Bot-Secret header
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
}

impl BotConfig {
    /// Resolve the shared secret: environment variable wins over the file
    pub fn resolved_secret(&self) -> Option<String> {
        env::var(crate::constants::ENV_BOT_SECRET)
            .ok()
            .filter(|s| !s.is_empty())
            .or_else(|| self.secret_key.clone().filter(|s| !s.is_empty()))
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (debug, info, warn, error)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

impl Config {
    /// Load configuration from the default file
    pub fn load() -> Result<Self> {
        Self::load_from_path(crate::constants::CONFIG_FILE_NAME)
    }

    /// Load configuration from specific path
    ///
    /// Supports both JSON and YAML formats based on file extension:
    /// - `.json` files are parsed as JSON
    /// - `.yaml` or `.yml` files are parsed as YAML
    /// - Files without extension default to JSON parsing
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            // Return default config if file doesn't exist
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;

        let config: Config = match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content).map_err(|e| {
                StayKeyError::config(format!("Failed to parse YAML config: {}", e))
            })?,
            _ => serde_json::from_str(&content).map_err(|e| {
                StayKeyError::config(format!("Failed to parse JSON config: {}", e))
            })?,
        };

        config.validate()?;

        Ok(config)
    }

    /// Save configuration to specific path
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path_ref = path.as_ref();

        if let Some(parent) = path_ref.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = match path_ref.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::to_string(self).map_err(|e| {
                StayKeyError::config(format!("Failed to serialize to YAML: {}", e))
            })?,
            _ => serde_json::to_string_pretty(self)?,
        };

        std::fs::write(path_ref, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.storage.driver.is_empty() {
            return Err(StayKeyError::config("storage.driver is required"));
        }

        match self.storage.driver.as_str() {
            "sqlite" | "postgres" | "memory" => {}
            _ => {
                return Err(StayKeyError::config(format!(
                    "Unsupported storage driver: '{}'. Supported: sqlite, postgres, memory",
                    self.storage.driver
                )));
            }
        }

        // The memory driver ignores the DSN; the SQL drivers need one
        if self.storage.driver != "memory" && self.storage.dsn.is_empty() {
            return Err(StayKeyError::config("storage.dsn is required"));
        }

        if let Some(ref http) = self.http {
            // Validate port is not zero (upper bound is enforced by u16 type)
            if http.port == 0 {
                return Err(StayKeyError::config("http.port must be nonzero (1-65535)"));
            }

            if http.host.is_empty() {
                return Err(StayKeyError::config("http.host cannot be empty"));
            }
        }

        if let Some(ref bot) = self.bot
            && let Some(ref url) = bot.api_base_url
            && !url.starts_with("http://")
            && !url.starts_with("https://")
        {
            return Err(StayKeyError::config(format!(
                "Invalid bot.apiBaseUrl '{}': must start with http:// or https://",
                url
            )));
        }

        Ok(())
    }
}
