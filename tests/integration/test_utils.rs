//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;

use film_api::{
    create_router, AppState, ClaimExpectations, FilmRepository, JwtVerifier, LoginSettings,
    NewFilm, RouterConfig, SharedVerifier, Storage, StorageConfig,
};

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-token-signing";
pub const ISSUER: &str = "https://idp.example.com/oauth2/default";
pub const AUDIENCE: &str = "api://default";
pub const SPA_CLIENT_ID: &str = "spa-client";
pub const WEB_CLIENT_ID: &str = "web-client";
pub const REDIRECT_URI: &str = "http://localhost:8080/implicit/callback";
pub const SEED_TITLE: &str = "AAAAAAAAAAAAAAAA";

/// In-memory SQLite storage with the schema in place.
pub async fn memory_storage() -> Storage {
    let storage = Storage::open(&StorageConfig::new("sqlite::memory:").with_max_connections(1))
        .await
        .unwrap();
    storage.migrate().await.unwrap();
    storage
}

/// Storage holding the default seed film.
pub async fn seeded_storage() -> Storage {
    let storage = memory_storage().await;
    FilmRepository::new(storage.clone())
        .seed(NewFilm::default())
        .await
        .unwrap();
    storage
}

pub fn expectations() -> ClaimExpectations {
    ClaimExpectations {
        issuer: ISSUER.to_string(),
        audience: AUDIENCE.to_string(),
        client_id: SPA_CLIENT_ID.to_string(),
    }
}

pub fn login_settings() -> LoginSettings {
    LoginSettings {
        issuer: ISSUER.to_string(),
        client_id: WEB_CLIENT_ID.to_string(),
        redirect_uri: REDIRECT_URI.to_string(),
        state: "ApplicationState".to_string(),
    }
}

/// Router over `storage` that accepts HS256 tokens signed with [`TEST_SECRET`].
pub fn test_router(storage: Storage) -> Router {
    let verifier: SharedVerifier = Arc::new(JwtVerifier::with_secret(expectations(), TEST_SECRET));
    let state = AppState::new(FilmRepository::new(storage), login_settings());
    create_router(state, verifier, RouterConfig::new().with_tracing(false))
}

pub fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

/// Claims accepted by [`test_router`].
pub fn valid_claims() -> Value {
    json!({
        "iss": ISSUER,
        "aud": AUDIENCE,
        "cid": SPA_CLIENT_ID,
        "sub": "viewer@example.com",
        "scp": ["openid"],
        "iat": now(),
        "exp": now() + 3600,
    })
}

pub fn sign(claims: &Value, secret: &[u8]) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret),
    )
    .unwrap()
}

pub fn valid_token() -> String {
    sign(&valid_claims(), TEST_SECRET)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn get_with_auth(uri: &str, authorization: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("authorization", authorization)
        .body(Body::empty())
        .unwrap()
}

pub async fn send(router: Router, request: Request<Body>) -> Response<Body> {
    router.oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
