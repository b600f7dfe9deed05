//! # Film API
//!
//! A small HTTP backend serving films to holders of a valid access token.
//!
//! Tokens are issued by an external OAuth identity provider; the API checks
//! them against the provider's published signing keys and the expected
//! issuer, audience and client id. `/login` sends the browser to the
//! provider's authorize endpoint to obtain one.
//!
//! ## Architecture
//!
//! - [`storage`] - owns the database handle and creates the schema
//! - [`films`] - film entity, repository and public response shape
//! - [`auth`] - token verification and login redirect construction
//! - [`server`] - Axum routes, handlers and the auth gate middleware
//! - [`config`] - CLI and environment configuration
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use film_api::{
//!     create_router, AppState, ClaimExpectations, FilmRepository, JwtVerifier, LoginSettings,
//!     RouterConfig, Storage, StorageConfig,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let storage = Storage::open(&StorageConfig::new("sqlite::memory:").with_max_connections(1)).await?;
//!     storage.migrate().await?;
//!
//!     let state = AppState::new(
//!         FilmRepository::new(storage.clone()),
//!         LoginSettings {
//!             issuer: "https://idp.example.com/oauth2/default".to_string(),
//!             client_id: "web-client".to_string(),
//!             redirect_uri: "http://localhost:8080/implicit/callback".to_string(),
//!             state: "ApplicationState".to_string(),
//!         },
//!     );
//!     let verifier = Arc::new(JwtVerifier::new(ClaimExpectations {
//!         issuer: "https://idp.example.com/oauth2/default".to_string(),
//!         audience: "api://default".to_string(),
//!         client_id: "spa-client".to_string(),
//!     }));
//!
//!     let router = create_router(state, verifier, RouterConfig::new());
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//!     axum::serve(listener, router).await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod films;
pub mod server;
pub mod storage;

// Re-export commonly used types
pub use auth::{
    AccessClaims, ClaimExpectations, JwtVerifier, KeySource, LoginSettings, RemoteKeys,
    TokenVerifier,
};
pub use config::Config;
pub use error::{FilmError, StorageError, VerifyError};
pub use films::{Film, FilmRepository, FilmResponse, FilmsEnvelope, NewFilm};
pub use server::{create_router, AppState, AuthError, ErrorResponse, RouterConfig, SharedVerifier};
pub use storage::{Storage, StorageConfig};
