//! StayKey - rental platform login backend
//!
//! This library implements the login-code half of a rental platform:
//! - Short-lived 4-digit login codes bound to an identity record
//! - Dual-key identities (phone number and/or chat account id)
//! - An HTTP API for the Mini App and for the chat bot
//! - A bot dispatcher that routes chat updates and delivers codes
//!
//! # Architecture
//!
//! The code manager is the core: it generates, stores, expires (lazily, at
//! read time), and hands out codes against a pluggable identity store
//! (in-memory, SQLite, PostgreSQL). The HTTP layer exposes the operations;
//! the bot layer consumes them through an API client. Redeeming a code is
//! the login endpoint's job and is out of scope here.
//!
//! # Example
//!
//! ```rust,no_run
//! use staykey::otc::CodeManager;
//! use staykey::storage::MemoryStorage;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let manager = CodeManager::new(Arc::new(MemoryStorage::new()));
//!
//!     manager.register_or_link("+15551234567", 42).await?;
//!     manager.request_code("+15551234567", 42).await?;
//!     let code = manager.code_for_delivery(42).await?;
//!     println!("deliver {code} over chat");
//!
//!     Ok(())
//! }
//! ```

// Core modules
pub mod constants;
pub mod error;
pub mod model;

// The login-code component
pub mod otc;

// Infrastructure
pub mod config;
pub mod storage;

// Interface layers
pub mod bot;
pub mod cli;
pub mod http;

// Utilities
pub mod utils;

// Re-exports for convenience
pub use error::{AuthError, Result, StayKeyError};
pub use model::{Identity, Profile};
pub use otc::CodeManager;

/// Initialize logging for the application
pub fn init_logging() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "staykey=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
