//! HTTP server layer for the films API.
//!
//! # Architecture
//!
//! ```text
//! request ──► TraceLayer ──► CORS ──► router
//!                                       │
//!               /api/films/ ──► auth gate ──► handler ──► FilmRepository
//!               /login, /implicit/callback, /health ──► handler
//! ```

pub mod auth;
pub mod handlers;
pub mod routes;

pub use auth::{auth_middleware, bearer_token, parse_bearer, AuthError, SharedVerifier};
pub use handlers::{
    callback_handler, health_handler, list_films_handler, login_handler, AppState, ErrorResponse,
    HealthResponse, LoginError,
};
pub use routes::{create_router, RouterConfig};
