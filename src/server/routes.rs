//! Router configuration for the films API.
//!
//! This module defines the HTTP routes and applies middleware for authentication
//! and CORS.
//!
//! # Route Structure
//!
//! ```text
//! /health                - Health check (public)
//! /login                 - Redirect to identity provider (public)
//! /implicit/callback     - Login landing point (public)
//! /api/films/            - The listed film (bearer token required)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use film_api::server::{create_router, AppState, RouterConfig};
//!
//! let state = AppState::new(FilmRepository::new(storage), config.login());
//! let verifier = Arc::new(JwtVerifier::new(config.claim_expectations()));
//!
//! let router = create_router(state, verifier, RouterConfig::new());
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::time::Duration;

use axum::{middleware, routing::get, Router};
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::auth::{auth_middleware, SharedVerifier};
use super::handlers::{
    callback_handler, health_handler, list_films_handler, login_handler, AppState,
};

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RouterConfig {
    /// Create a new router configuration.
    ///
    /// By default CORS allows any origin and tracing is enabled.
    pub fn new() -> Self {
        Self {
            cors_origins: None,
            enable_tracing: true,
        }
    }

    /// Set specific allowed CORS origins.
    ///
    /// Pass an empty vec to disallow all cross-origin requests.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
///
/// `/api/films/` sits behind the bearer token gate; everything else is
/// public.
pub fn create_router(state: AppState, verifier: SharedVerifier, config: RouterConfig) -> Router {
    let cors = build_cors_layer(&config);

    // route_layer so that unknown paths still 404 instead of 401
    let protected_routes = Router::new()
        .route("/api/films/", get(list_films_handler))
        .route_layer(middleware::from_fn_with_state(verifier, auth_middleware));

    let public_routes = Router::new()
        .route("/health", get(health_handler))
        .route("/login", get(login_handler))
        .route("/implicit/callback", get(callback_handler));

    let router = Router::new()
        .merge(protected_routes)
        .merge(public_routes)
        .with_state(state)
        .layer(cors);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .max_age(Duration::from_secs(86400));

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) if origins.is_empty() => cors,
        Some(origins) => {
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
