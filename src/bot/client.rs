//! HTTP client the bot uses to talk to the StayKey API
//!
//! Every call carries the X-Bot-Secret header. Non-success statuses are
//! surfaced as absent values rather than faults - the dispatcher renders a
//! user-facing fallback and the transport keeps polling.

use crate::constants::{
    BOT_SECRET_HEADER, ROUTE_BOT_CODE, ROUTE_BOT_ENSURE_USER, ROUTE_BOT_PROFILE,
};
use crate::model::{BotCodeRequest, BotCodeResponse, EnsureUserRequest, Profile};
use crate::{Result, StayKeyError};
use async_trait::async_trait;

/// Bot-side view of the StayKey API
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Upsert profile info; true when the API accepted it
    async fn ensure_user(&self, req: &EnsureUserRequest) -> Result<bool>;

    /// The deliverable code, or None when the chat account is not linked
    async fn code(&self, chat_id: i64) -> Result<Option<String>>;

    /// Profile projection, or None when the chat account is unknown
    async fn profile(&self, chat_id: i64) -> Result<Option<Profile>>;
}

/// reqwest-backed API client
pub struct HttpApiClient {
    http: reqwest::Client,
    base_url: String,
    secret: String,
}

impl HttpApiClient {
    pub fn new(base_url: impl Into<String>, secret: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| StayKeyError::network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            secret: secret.into(),
        })
    }

    fn url(&self, route: &str) -> String {
        format!("{}{}", self.base_url, route)
    }
}

#[async_trait]
impl AuthApi for HttpApiClient {
    async fn ensure_user(&self, req: &EnsureUserRequest) -> Result<bool> {
        let response = self
            .http
            .post(self.url(ROUTE_BOT_ENSURE_USER))
            .header(BOT_SECRET_HEADER, &self.secret)
            .json(req)
            .send()
            .await?;

        Ok(response.status().is_success())
    }

    async fn code(&self, chat_id: i64) -> Result<Option<String>> {
        let response = self
            .http
            .post(self.url(ROUTE_BOT_CODE))
            .header(BOT_SECRET_HEADER, &self.secret)
            .json(&BotCodeRequest { chat_id })
            .send()
            .await?;

        if !response.status().is_success() {
            return Ok(None);
        }

        let body: BotCodeResponse = response.json().await?;
        Ok(Some(body.code))
    }

    async fn profile(&self, chat_id: i64) -> Result<Option<Profile>> {
        let response = self
            .http
            .get(self.url(ROUTE_BOT_PROFILE))
            .header(BOT_SECRET_HEADER, &self.secret)
            .query(&[("chatId", chat_id)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Ok(None);
        }

        Ok(Some(response.json().await?))
    }
}
