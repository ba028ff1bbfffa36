//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use redis_ledger::{api::create_router, AppState, Fetcher, MemoryStore, Result};
use serde_json::Value;
use tower::ServiceExt;

// == Helper Functions ==

/// Fetcher standing in for the network; counts how often it is hit.
#[derive(Default)]
struct StubFetcher {
    calls: AtomicUsize,
}

#[async_trait]
impl Fetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("<html>{url} v{n}</html>"))
    }
}

fn create_test_app_with_ttl(ttl: Duration) -> Router {
    let state = AppState::new(
        Arc::new(MemoryStore::new()),
        Arc::new(StubFetcher::default()),
        ttl,
    );
    create_router(state)
}

fn create_test_app() -> Router {
    create_test_app_with_ttl(Duration::from_secs(10))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn store(value_json: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/store")
        .header("content-type", "application/json")
        .body(Body::from(format!(r#"{{"value":{value_json}}}"#)))
        .unwrap()
}

// == STORE / GET Endpoint Tests ==

#[tokio::test]
async fn test_store_returns_uuid_key() {
    let app = create_test_app();

    let (status, json) = send(&app, store(r#""hello""#)).await;

    assert_eq!(status, StatusCode::OK);
    let key = json["key"].as_str().unwrap();
    assert_eq!(key.len(), 36);
    assert_eq!(key.matches('-').count(), 4);
}

#[tokio::test]
async fn test_store_then_get_each_type() {
    let app = create_test_app();

    let cases = [
        (r#""text""#, "str", serde_json::json!("text")),
        ("123", "int", serde_json::json!(123)),
        ("-0.5", "float", serde_json::json!(-0.5)),
        ("[0,255]", "bytes", serde_json::json!([0, 255])),
    ];

    for (value_json, kind, expected) in cases {
        let (_, stored) = send(&app, store(value_json)).await;
        let key = stored["key"].as_str().unwrap();

        let (status, json) = send(&app, get(&format!("/get/{key}?as={kind}"))).await;
        assert_eq!(status, StatusCode::OK, "reading {kind}");
        assert_eq!(json["key"].as_str().unwrap(), key);
        assert_eq!(json["value"], expected);
    }
}

#[tokio::test]
async fn test_get_defaults_to_string() {
    let app = create_test_app();

    let (_, stored) = send(&app, store(r#""plain""#)).await;
    let key = stored["key"].as_str().unwrap();

    let (status, json) = send(&app, get(&format!("/get/{key}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["value"], "plain");
}

#[tokio::test]
async fn test_get_wrong_decoder_is_unprocessable() {
    let app = create_test_app();

    let (_, stored) = send(&app, store(r#""not eight bytes""#)).await;
    let key = stored["key"].as_str().unwrap();

    let (status, json) = send(&app, get(&format!("/get/{key}?as=int"))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["error"].as_str().unwrap().contains("Decode failure"));
}

#[tokio::test]
async fn test_get_missing_key() {
    let app = create_test_app();

    let (status, json) = send(&app, get("/get/does-not-exist")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json.get("error").is_some());
}

#[tokio::test]
async fn test_store_rejects_non_scalar() {
    let app = create_test_app();

    let response = app.oneshot(store(r#"{"nested":true}"#)).await.unwrap();

    assert!(response.status().is_client_error());
}

// == REPLAY Endpoint Tests ==

#[tokio::test]
async fn test_replay_before_any_store() {
    let app = create_test_app();

    let (status, json) = send(&app, get("/replay/Cache.store")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("Cache.store"));
}

#[tokio::test]
async fn test_replay_after_stores() {
    let app = create_test_app();

    let (_, first) = send(&app, store(r#""foo""#)).await;
    let (_, second) = send(&app, store("42")).await;
    let (_, third) = send(&app, store(r#""bar""#)).await;

    let (status, json) = send(&app, get("/replay/Cache.store")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["operation"], "Cache.store");
    assert_eq!(json["calls"], 3);

    let entries = json["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0]["input"], r#""foo""#);
    assert_eq!(entries[1]["input"], "42");
    assert_eq!(
        entries[2]["output"].as_str().unwrap(),
        format!("\"{}\"", third["key"].as_str().unwrap())
    );

    let trace = json["trace"].as_str().unwrap();
    let mut lines = trace.lines();
    assert_eq!(lines.next(), Some("Cache.store was called 3 times:"));
    assert_eq!(
        lines.next().map(str::to_string),
        Some(format!(
            "Cache.store(\"foo\") -> \"{}\"",
            first["key"].as_str().unwrap()
        ))
    );
    assert_eq!(
        lines.next().map(str::to_string),
        Some(format!(
            "Cache.store(42) -> \"{}\"",
            second["key"].as_str().unwrap()
        ))
    );
}

#[tokio::test]
async fn test_reads_are_not_recorded() {
    let app = create_test_app();

    let (_, stored) = send(&app, store(r#""x""#)).await;
    let key = stored["key"].as_str().unwrap();
    send(&app, get(&format!("/get/{key}"))).await;
    send(&app, get(&format!("/get/{key}"))).await;

    let (_, json) = send(&app, get("/replay/Cache.store")).await;
    assert_eq!(json["calls"], 1);
}

// == PAGE / COUNT Endpoint Tests ==

#[tokio::test]
async fn test_page_is_cached_within_ttl() {
    let app = create_test_app();

    let (status, first) = send(&app, get("/page?url=http%3A%2F%2Fexample.com")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["content"], "<html>http://example.com v1</html>");
    assert_eq!(first["access_count"], 1);

    let (_, second) = send(&app, get("/page?url=http%3A%2F%2Fexample.com")).await;
    assert_eq!(second["content"], "<html>http://example.com v1</html>");
    assert_eq!(second["access_count"], 1);

    let (_, count) = send(&app, get("/count?url=http%3A%2F%2Fexample.com")).await;
    assert_eq!(count["access_count"], 1);
}

#[tokio::test]
async fn test_page_is_refetched_after_ttl() {
    let app = create_test_app_with_ttl(Duration::from_secs(1));

    send(&app, get("/page?url=slow")).await;

    // Wait for expiration
    tokio::time::sleep(Duration::from_millis(1100)).await;

    let (_, json) = send(&app, get("/page?url=slow")).await;
    assert_eq!(json["content"], "<html>slow v2</html>");
    assert_eq!(json["access_count"], 2);
}

#[tokio::test]
async fn test_count_for_unfetched_page() {
    let app = create_test_app();

    let (status, json) = send(&app, get("/count?url=never")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["access_count"], 0);
}

#[tokio::test]
async fn test_page_with_empty_url() {
    let app = create_test_app();

    let (status, json) = send(&app, get("/page?url=")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json.get("error").is_some());
}

// == HEALTH Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let (status, json) = send(&app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}
