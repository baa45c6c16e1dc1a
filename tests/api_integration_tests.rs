//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each admin endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use luckydraw_cache::cache::{CacheEntry, MemoryStorage, StorageBackend};
use luckydraw_cache::{api::create_router, AppState, CacheStore};
use serde_json::{json, Value};
use tower::ServiceExt;

// == Helper Functions ==

const PREFIX: &str = "luckydraw_cache_";

fn create_test_app() -> (Arc<MemoryStorage>, AppState, Router) {
    let backend = Arc::new(MemoryStorage::new());
    let store = CacheStore::new(backend.clone(), PREFIX, Duration::from_secs(300));
    let state = AppState::new(store);
    let app = create_router(state.clone());
    (backend, state, app)
}

async fn put_expired(backend: &MemoryStorage, key: &str, data: Value) {
    let now = luckydraw_cache::cache::current_timestamp_ms();
    let entry = CacheEntry {
        data,
        created_at: now - 2_000,
        expires_at: now - 1_000,
    };
    backend
        .set_item(
            &format!("{}{}", PREFIX, key),
            &serde_json::to_string(&entry).unwrap(),
        )
        .await
        .unwrap();
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn request(method: &str, uri: &str, body: Body) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body)
        .unwrap()
}

// == Inspect Endpoint Tests ==

#[tokio::test]
async fn test_get_entry_fresh() {
    let (_, state, app) = create_test_app();
    state
        .store()
        .set("events_all", &json!([{"id": 1}]), None)
        .await;

    let response = app
        .oneshot(request("GET", "/cache/events_all", Body::empty()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["key"], "events_all");
    assert_eq!(json["data"], json!([{"id": 1}]));
    assert_eq!(json["fresh"], true);
}

#[tokio::test]
async fn test_get_entry_expired_is_reported_not_evicted() {
    let (backend, _, app) = create_test_app();
    put_expired(&backend, "stats", json!({"participants": 10})).await;

    let response = app
        .oneshot(request("GET", "/cache/stats", Body::empty()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["fresh"], false);
    assert!(backend
        .get_item("luckydraw_cache_stats")
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_get_entry_not_found() {
    let (_, _, app) = create_test_app();

    let response = app
        .oneshot(request("GET", "/cache/nonexistent", Body::empty()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("nonexistent"));
}

// == Invalidation Endpoint Tests ==

#[tokio::test]
async fn test_invalidate_key_endpoint() {
    let (_, state, app) = create_test_app();
    state.store().set("user_u-1", &json!({"name": "A"}), None).await;

    let response = app
        .oneshot(request("DELETE", "/cache/user_u-1", Body::empty()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["cleared"], json!(["user_u-1"]));
    assert!(!state.store().is_valid("user_u-1").await);
}

#[tokio::test]
async fn test_invalidate_events_endpoint() {
    let (_, state, app) = create_test_app();
    for key in ["event_evt-7", "events_all", "events_running", "hero_events", "stats"] {
        state.store().set(key, &json!(1), None).await;
    }

    let response = app
        .oneshot(request(
            "POST",
            "/cache/events/invalidate",
            Body::from(r#"{"event_id":"evt-7"}"#),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    let cleared = json["cleared"].as_array().unwrap();
    assert_eq!(cleared.len(), 9);
    assert!(cleared.contains(&json!("event_prizes_evt-7")));
    assert!(state.store().is_empty().await);
}

#[tokio::test]
async fn test_invalidate_events_endpoint_without_id() {
    let (_, _, app) = create_test_app();

    let response = app
        .oneshot(request("POST", "/cache/events/invalidate", Body::from("{}")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["cleared"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_invalidate_events_blank_id_rejected() {
    let (_, _, app) = create_test_app();

    let response = app
        .oneshot(request(
            "POST",
            "/cache/events/invalidate",
            Body::from(r#"{"event_id":""}"#),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalidate_events_invalid_json() {
    let (_, _, app) = create_test_app();

    let response = app
        .oneshot(request(
            "POST",
            "/cache/events/invalidate",
            Body::from("not json"),
        ))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

// == Maintenance Endpoint Tests ==

#[tokio::test]
async fn test_evict_endpoint() {
    let (backend, state, app) = create_test_app();
    put_expired(&backend, "old", json!(1)).await;
    state.store().set("fresh", &json!(2), None).await;

    let response = app
        .oneshot(request("POST", "/cache/evict", Body::empty()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["removed"], 1);
    assert_eq!(state.store().len().await, 1);
}

#[tokio::test]
async fn test_clear_all_endpoint_keeps_foreign_keys() {
    let (backend, state, app) = create_test_app();
    backend.set_item("theme", "dark").await.unwrap();
    state.store().set("a", &json!(1), None).await;
    state.store().set("b", &json!(2), None).await;

    let response = app
        .oneshot(request("DELETE", "/cache", Body::empty()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["removed"], 2);
    assert!(backend.get_item("theme").await.unwrap().is_some());
}

// == Stats / Health Endpoint Tests ==

#[tokio::test]
async fn test_stats_endpoint_after_operations() {
    let (_, state, app) = create_test_app();
    state.store().set("stats", &json!(1), None).await;
    let _ = state.store().get::<Value>("stats").await; // hit
    let _ = state.store().get::<Value>("missing").await; // miss

    let response = app
        .oneshot(request("GET", "/stats", Body::empty()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["hits"], 1);
    assert_eq!(json["misses"], 1);
    assert_eq!(json["total_entries"], 1);
    assert_eq!(json["hit_rate"], 0.5);
}

#[tokio::test]
async fn test_health_endpoint() {
    let (_, _, app) = create_test_app();

    let response = app
        .oneshot(request("GET", "/health", Body::empty()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["storage_available"], true);
    assert!(json.get("timestamp").is_some());
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let (_, _, app) = create_test_app();

    let response = app
        .oneshot(request("GET", "/unknown", Body::empty()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
