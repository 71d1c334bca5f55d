//! HTTP server for StayKey
//!
//! Exposes the login-code operations as a REST API. The Mini App endpoints
//! (register, request-code) are public; the bot endpoints are gated by the
//! X-Bot-Secret shared-secret header. The gate lives here, at the boundary -
//! the code manager itself never sees the secret.

use crate::config::Config;
use crate::constants::{
    BOT_SECRET_HEADER, ROUTE_BOT_CODE, ROUTE_BOT_ENSURE_USER, ROUTE_BOT_PROFILE, ROUTE_REGISTER,
    ROUTE_REQUEST_CODE,
};
use crate::error::{AuthError, StorageError};
use crate::model::{
    ApiResponse, BotCodeRequest, BotCodeResponse, EnsureUserRequest, Profile, RegisterRequest,
    RequestCodeRequest,
};
use crate::otc::CodeManager;
use crate::{Result, StayKeyError};
use axum::{
    Json, Router,
    extract::{Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    LatencyUnit,
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    manager: Arc<CodeManager>,
    bot_secret: Option<String>,
}

impl AppState {
    pub fn new(manager: Arc<CodeManager>, bot_secret: Option<String>) -> Self {
        Self {
            manager,
            bot_secret,
        }
    }
}

/// Error type for HTTP handlers
///
/// Domain rejections map to the structured envelope with their numeric code;
/// everything else is sanitized to avoid leaking internals.
#[derive(Debug)]
pub struct AppError(StayKeyError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self.0 {
            StayKeyError::Auth(err) => {
                let status = match err {
                    AuthError::InvalidPhone => StatusCode::BAD_REQUEST,
                    AuthError::UserNotFound | AuthError::NotLinked => StatusCode::NOT_FOUND,
                };
                (status, ApiResponse::from(err))
            }
            StayKeyError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ApiResponse::error(msg.clone(), StatusCode::BAD_REQUEST.as_u16() as u32),
            ),
            StayKeyError::Storage(StorageError::Conflict(_)) => (
                StatusCode::CONFLICT,
                ApiResponse::error(
                    "The request conflicts with an existing record",
                    StatusCode::CONFLICT.as_u16() as u32,
                ),
            ),
            StayKeyError::Storage(e) => {
                // Log full error details internally
                tracing::error!("Storage error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiResponse::error(
                        "An internal storage error occurred",
                        StatusCode::INTERNAL_SERVER_ERROR.as_u16() as u32,
                    ),
                )
            }
            _ => {
                // Log full error details internally
                tracing::error!("Internal error: {:?}", self.0);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiResponse::error(
                        "An internal error occurred",
                        StatusCode::INTERNAL_SERVER_ERROR.as_u16() as u32,
                    ),
                )
            }
        };

        tracing::debug!(status = %status, "HTTP request error response");

        (status, Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<StayKeyError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// Start the HTTP server
pub async fn start_server(config: Config) -> Result<()> {
    let http_config = config.http.clone().unwrap_or_default();

    let storage = crate::storage::create_storage_from_config(&config.storage).await?;
    let manager = Arc::new(CodeManager::new(storage));

    let bot_secret = config.bot.clone().unwrap_or_default().resolved_secret();
    if bot_secret.is_none() {
        tracing::warn!("No bot secret configured; bot endpoints will reject every request");
    }

    let state = AppState::new(manager, bot_secret);
    let app = build_router(state);

    let addr = format!("{}:{}", http_config.host, http_config.port);
    let socket_addr: SocketAddr = addr
        .parse()
        .map_err(|e| StayKeyError::config(format!("Invalid address {}: {}", addr, e)))?;

    tracing::info!("Starting HTTP server on {}", socket_addr);

    let listener = tokio::net::TcpListener::bind(socket_addr).await?;
    axum::serve(listener, app)
        .await
        .map_err(|e| StayKeyError::config(format!("Server error: {}", e)))?;

    Ok(())
}

/// Build the router with all endpoints
pub fn build_router(state: AppState) -> Router {
    // Bot endpoints sit behind the shared-secret gate
    let bot_routes = Router::new()
        .route(ROUTE_BOT_CODE, post(bot_code_handler))
        .route(ROUTE_BOT_ENSURE_USER, post(ensure_user_handler))
        .route(ROUTE_BOT_PROFILE, get(profile_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            bot_secret_guard,
        ));

    Router::new()
        .route("/healthz", get(health_handler))
        .route(ROUTE_REGISTER, post(register_handler))
        .route(ROUTE_REQUEST_CODE, post(request_code_handler))
        .merge(bot_routes)
        .layer(
            ServiceBuilder::new()
                // Tracing layer for request/response logging
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new())
                        .on_response(
                            DefaultOnResponse::new()
                                .level(tracing::Level::INFO)
                                .latency_unit(LatencyUnit::Micros),
                        ),
                )
                // The Mini App calls register/request-code cross-origin
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
                        .allow_headers([axum::http::header::CONTENT_TYPE]),
                ),
        )
        .with_state(state)
}

/// Shared-secret gate for bot endpoints
///
/// Fails closed: with no secret configured every request is rejected. The
/// comparison is constant-time so the header never becomes a timing oracle.
async fn bot_secret_guard(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let provided = req
        .headers()
        .get(BOT_SECRET_HEADER)
        .and_then(|v| v.to_str().ok());

    let authorized = match (&state.bot_secret, provided) {
        (Some(expected), Some(provided)) => secrets_match(provided, expected),
        _ => false,
    };

    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::error(
                "Invalid or missing bot secret",
                StatusCode::UNAUTHORIZED.as_u16() as u32,
            )),
        )
            .into_response();
    }

    next.run(req).await
}

fn secrets_match(provided: &str, expected: &str) -> bool {
    use subtle::ConstantTimeEq;
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}

// ============================================================================
// HANDLERS
// ============================================================================

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Mini App start: register or link user by phone and chat id
async fn register_handler(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> std::result::Result<Json<ApiResponse>, AppError> {
    state
        .manager
        .register_or_link(&req.phone, req.chat_id)
        .await?;
    Ok(Json(ApiResponse::ok()))
}

/// Mini App: request a login code; delivery happens through the bot
async fn request_code_handler(
    State(state): State<AppState>,
    Json(req): Json<RequestCodeRequest>,
) -> std::result::Result<Json<ApiResponse>, AppError> {
    let message = state.manager.request_code(&req.phone, req.chat_id).await?;
    Ok(Json(ApiResponse::ok_with_message(message)))
}

/// Bot: fetch the deliverable code for a chat account
async fn bot_code_handler(
    State(state): State<AppState>,
    Json(req): Json<BotCodeRequest>,
) -> std::result::Result<Json<BotCodeResponse>, AppError> {
    let code = state.manager.code_for_delivery(req.chat_id).await?;
    Ok(Json(BotCodeResponse { code }))
}

/// Bot /start: upsert profile info from the chat platform
async fn ensure_user_handler(
    State(state): State<AppState>,
    Json(req): Json<EnsureUserRequest>,
) -> std::result::Result<Json<ApiResponse>, AppError> {
    state.manager.ensure_linked_profile(&req).await?;
    Ok(Json(ApiResponse::ok()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileQuery {
    chat_id: i64,
}

/// Bot: profile projection for a chat account
async fn profile_handler(
    State(state): State<AppState>,
    Query(query): Query<ProfileQuery>,
) -> std::result::Result<Json<Profile>, AppError> {
    let profile = state.manager.profile(query.chat_id).await?;
    Ok(Json(profile))
}
