//! API integration tests for the films endpoint.
//!
//! Tests verify:
//! - The seeded film is returned with only its title
//! - Missing film and broken database both answer 404
//! - Unknown routes and public routes behave as expected

use axum::http::StatusCode;
use serde_json::json;

use film_api::{FilmRepository, NewFilm, Storage};

use super::test_utils::{
    body_bytes, body_json, get, get_with_auth, memory_storage, seeded_storage, send, test_router,
    valid_token, SEED_TITLE,
};

// =============================================================================
// Films Endpoint
// =============================================================================

#[tokio::test]
async fn test_films_returns_seeded_title() {
    let router = test_router(seeded_storage().await);

    let request = get_with_auth("/api/films/", &format!("Bearer {}", valid_token()));
    let response = send(router, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/json"
    );

    let body = body_json(response).await;
    assert_eq!(body, json!({"films": {"title": SEED_TITLE}}));
}

#[tokio::test]
async fn test_films_body_is_exact() {
    let router = test_router(seeded_storage().await);

    let request = get_with_auth("/api/films/", &format!("Bearer {}", valid_token()));
    let body = body_bytes(send(router, request).await).await;

    assert_eq!(body, br#"{"films":{"title":"AAAAAAAAAAAAAAAA"}}"#.to_vec());
}

#[tokio::test]
async fn test_films_only_returns_first_record() {
    let storage = memory_storage().await;
    let repo = FilmRepository::new(storage.clone());
    repo.create(NewFilm::new("Heat", "1995", "Cops and robbers"))
        .await
        .unwrap();
    repo.create(NewFilm::new("Ronin", "1998", "Car chases"))
        .await
        .unwrap();

    let router = test_router(storage);
    let request = get_with_auth("/api/films/", &format!("Bearer {}", valid_token()));
    let body = body_json(send(router, request).await).await;

    assert_eq!(body["films"]["title"], "Heat");
    assert!(body["films"].get("year").is_none());
    assert!(body["films"].get("plot").is_none());
    assert!(body["films"].get("id").is_none());
}

#[tokio::test]
async fn test_films_not_found_when_empty() {
    let router = test_router(memory_storage().await);

    let request = get_with_auth("/api/films/", &format!("Bearer {}", valid_token()));
    let response = send(router, request).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "not_found");
    assert_eq!(body["status"], 404);
}

#[tokio::test]
async fn test_films_not_found_when_disconnected() {
    let router = test_router(Storage::disconnected());

    let request = get_with_auth("/api/films/", &format!("Bearer {}", valid_token()));
    let response = send(router, request).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_repeated_requests_share_storage() {
    let router = test_router(seeded_storage().await);

    for _ in 0..3 {
        let request = get_with_auth("/api/films/", &format!("Bearer {}", valid_token()));
        let response = send(router.clone(), request).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}

// =============================================================================
// Other Routes
// =============================================================================

#[tokio::test]
async fn test_health_is_public() {
    let router = test_router(memory_storage().await);

    let response = send(router, get("/health")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let router = test_router(memory_storage().await);

    let response = send(router, get("/api/unknown")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_post_to_films_not_allowed() {
    let router = test_router(seeded_storage().await);

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/films/")
        .header("authorization", format!("Bearer {}", valid_token()))
        .body(axum::body::Body::empty())
        .unwrap();
    let response = send(router, request).await;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
