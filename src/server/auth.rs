//! Bearer token gate for protected routes.
//!
//! Protected requests must carry `Authorization: Bearer <token>`, where the
//! token is accepted by the configured [`TokenVerifier`]. Every failure,
//! whether the header is missing, malformed, or the token is rejected,
//! ends the request with `401 Unauthorized`.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use axum::{middleware, routing::get, Router};
//! use film_api::auth::JwtVerifier;
//! use film_api::server::auth::{auth_middleware, SharedVerifier};
//!
//! let verifier: SharedVerifier = Arc::new(JwtVerifier::new(expectations));
//! let app = Router::new()
//!     .route("/api/films/", get(list_films))
//!     .route_layer(middleware::from_fn_with_state(verifier, auth_middleware));
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, warn};

use super::handlers::ErrorResponse;
use crate::auth::TokenVerifier;
use crate::error::VerifyError;

/// Verifier shared by all requests.
pub type SharedVerifier = Arc<dyn TokenVerifier>;

// =============================================================================
// Types
// =============================================================================

/// Authentication error types.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No `Authorization` header
    #[error("Missing authorization header")]
    MissingHeader,

    /// Header present but not of the form `Bearer <token>`
    #[error("Malformed authorization header")]
    MalformedHeader,

    /// Token was rejected by the verifier
    #[error("Invalid token: {0}")]
    InvalidToken(#[from] VerifyError),
}

impl AuthError {
    fn error_type(&self) -> &'static str {
        match self {
            AuthError::MissingHeader => "missing_token",
            AuthError::MalformedHeader => "malformed_authorization",
            AuthError::InvalidToken(_) => "invalid_token",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = StatusCode::UNAUTHORIZED;
        let error_type = self.error_type();
        let message = self.to_string();

        // A rejected token may be an attack; the rest is routine.
        match &self {
            AuthError::InvalidToken(_) => {
                warn!(
                    error_type = error_type,
                    status = status.as_u16(),
                    "Authentication failed: {}",
                    message
                );
            }
            _ => {
                debug!(
                    error_type = error_type,
                    status = status.as_u16(),
                    "Authentication failed: {}",
                    message
                );
            }
        }

        let error_response = ErrorResponse::with_status(error_type, message, status);
        (status, Json(error_response)).into_response()
    }
}

// =============================================================================
// Header Parsing
// =============================================================================

/// Extract the bearer token from request headers.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingHeader)?;
    let value = value.to_str().map_err(|_| AuthError::MalformedHeader)?;
    if value.trim().is_empty() {
        return Err(AuthError::MissingHeader);
    }
    parse_bearer(value)
}

/// Parse `Bearer <token>`. The scheme is case-insensitive; the token must be
/// a single non-empty word.
pub fn parse_bearer(value: &str) -> Result<&str, AuthError> {
    let (scheme, token) = value
        .trim()
        .split_once(' ')
        .ok_or(AuthError::MalformedHeader)?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::MalformedHeader);
    }

    let token = token.trim();
    if token.is_empty() || token.contains(char::is_whitespace) {
        return Err(AuthError::MalformedHeader);
    }

    Ok(token)
}

// =============================================================================
// Axum Middleware
// =============================================================================

/// Axum middleware that admits only requests with a verified bearer token.
///
/// The request is passed on unchanged; no identity is attached to it.
pub async fn auth_middleware(
    State(verifier): State<SharedVerifier>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = bearer_token(request.headers())?;
    let claims = verifier.verify(token).await?;

    debug!(sub = ?claims.sub, "Request authenticated");

    Ok(next.run(request).await)
}

// =============================================================================
// Tests
// =============================================================================
