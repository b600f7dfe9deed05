//! HTTP request handlers for the films API.
//!
//! # Endpoints
//!
//! - `GET /api/films/` - The listed film (protected)
//! - `GET /login` - Redirect to the identity provider
//! - `GET /implicit/callback` - Landing point after login (no-op)
//! - `GET /health` - Health check endpoint

use axum::{
    extract::{RawQuery, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{debug, error, warn};
use url::form_urlencoded;

use crate::auth::{generate_nonce, LoginSettings};
use crate::error::FilmError;
use crate::films::{FilmRepository, FilmsEnvelope};

// =============================================================================
// Application State
// =============================================================================

/// Shared application state.
///
/// This is passed to all handlers via Axum's State extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Film persistence
    pub films: FilmRepository,

    /// Fixed parts of the login redirect
    pub login: LoginSettings,
}

impl AppState {
    pub fn new(films: FilmRepository, login: LoginSettings) -> Self {
        Self { films, login }
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// JSON error response returned for all error conditions.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error type identifier (e.g., "not_found", "invalid_token")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code (included for convenience)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ErrorResponse {
    /// Create a new error response with status code.
    pub fn with_status(
        error: impl Into<String>,
        message: impl Into<String>,
        status: StatusCode,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: Some(status.as_u16()),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Every repository failure is reported to the client as "not found".
/// Database failures are still logged at ERROR level.
impl IntoResponse for FilmError {
    fn into_response(self) -> Response {
        match &self {
            FilmError::Database(e) => error!(error = %e, "Film lookup failed"),
            _ => debug!("Film lookup: {}", self),
        }

        let status = StatusCode::NOT_FOUND;
        let body = ErrorResponse::with_status("not_found", "invalid param", status);
        (status, Json(body)).into_response()
    }
}

/// Failure to build the login redirect.
#[derive(Debug, thiserror::Error)]
#[error("Invalid authorize endpoint: {0}")]
pub struct LoginError(#[from] url::ParseError);

impl IntoResponse for LoginError {
    fn into_response(self) -> Response {
        error!("{}", self);
        let status = StatusCode::INTERNAL_SERVER_ERROR;
        let body = ErrorResponse::with_status("login_unavailable", self.to_string(), status);
        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle `GET /api/films/`.
///
/// Responds with `{"films": {"title": ...}}` for the film with id 1.
pub async fn list_films_handler(State(state): State<AppState>) -> Result<Response, FilmError> {
    let film = state.films.find_one().await?;
    Ok((StatusCode::OK, Json(FilmsEnvelope::new(film))).into_response())
}

/// Handle `GET /login`.
///
/// Redirects (301) to the identity provider's authorize endpoint with a
/// fresh nonce. Query parameters on the incoming request are carried over.
pub async fn login_handler(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Response, LoginError> {
    let passthrough: Vec<(String, String)> = query
        .as_deref()
        .map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default();

    let nonce = generate_nonce();
    let target = state.login.authorize_url(&nonce, &passthrough)?;

    debug!(target = %target, "Redirecting to identity provider");
    Ok((
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, target.to_string())],
    )
        .into_response())
}

/// Handle `GET /implicit/callback`.
///
/// The token arrives in the URL fragment and never reaches the server, so
/// there is nothing to do here.
pub async fn callback_handler(RawQuery(query): RawQuery) -> StatusCode {
    if query.is_some() {
        warn!("Ignoring query parameters on login callback");
    }
    StatusCode::OK
}

/// Handle `GET /health`.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// Tests
// =============================================================================
