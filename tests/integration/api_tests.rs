//! Integration tests for the HTTP API
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`; crawl
//! requests go to a wiremock server.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use mezzofy_crawler::api::{build_router, AppState};
use mezzofy_crawler::config::Config;
use mezzofy_crawler::crawler::Coordinator;
use mezzofy_crawler::storage::{Page, PageStore, SqliteStorage, UnavailableStorage};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config() -> Config {
    let mut config = Config::default();
    config.crawler.fetch_timeout_secs = 1;
    config
}

fn app_with(config: &Config, store: Arc<dyn PageStore>) -> Router {
    let coordinator = Coordinator::from_config(config, store).expect("Failed to build coordinator");
    build_router(
        AppState::new(&config.server, coordinator),
        &config.server.allowed_origins,
    )
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("Request failed");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let body = serde_json::from_slice(&bytes).expect("Body is not JSON");
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn stored_page(url: &str, title: &str, keywords: &[&str]) -> Page {
    let mut page = Page::new(url, "mezzofy");
    page.title = Some(title.to_string());
    page.keywords_matched = keywords.iter().map(|k| k.to_string()).collect();
    page
}

#[tokio::test]
async fn test_health() {
    let config = test_config();
    let app = app_with(&config, Arc::new(UnavailableStorage::new("test")));

    let (status, body) = send(app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "status": "ok", "app": "Mezzofy SME Content Crawler" })
    );
}

#[tokio::test]
async fn test_crawl_rejects_out_of_scope_start_url() {
    let config = test_config();
    let app = app_with(&config, Arc::new(UnavailableStorage::new("test")));

    let (status, body) = send(
        app,
        post_json("/crawl", json!({ "start_url": "https://notmezzofy.com" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"]
        .as_str()
        .unwrap_or_default()
        .contains("mezzofy.com"));
}

#[tokio::test]
async fn test_crawl_returns_summary() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<title>Coupons</title><a href="/next">Next</a>"#)
                .insert_header("content-type", "text/html"),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/next"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let mut config = test_config();
    config.crawler.root_domain = "127.0.0.1".to_string();
    let store = Arc::new(SqliteStorage::new_in_memory().unwrap());
    let app = app_with(&config, store.clone());

    let (status, body) = send(
        app,
        post_json(
            "/crawl",
            json!({ "start_url": mock_server.uri(), "max_pages": 5 }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "visited": 2, "saved": 1 }));
    assert_eq!(store.count().unwrap(), 1);
}

#[tokio::test]
async fn test_pages_empty_when_storage_unavailable() {
    let config = test_config();
    let app = app_with(&config, Arc::new(UnavailableStorage::new("no database")));

    let (status, body) = send(app, get("/pages")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_pages_search_and_limit() {
    let config = test_config();
    let store = Arc::new(SqliteStorage::new_in_memory().unwrap());
    store
        .insert(&stored_page("https://www.mezzofy.com/a", "Coupon engine", &["coupon"]))
        .unwrap();
    store
        .insert(&stored_page("https://www.mezzofy.com/b", "Loyalty", &["loyalty"]))
        .unwrap();
    store
        .insert(&stored_page("https://www.mezzofy.com/c", "More coupons", &["coupon"]))
        .unwrap();

    let (status, body) = send(app_with(&config, store.clone()), get("/pages?q=COUPON")).await;
    assert_eq!(status, StatusCode::OK);
    let pages = body.as_array().expect("Expected a JSON array");
    assert_eq!(pages.len(), 2);
    assert!(pages
        .iter()
        .all(|p| p["keywords_matched"] == json!(["coupon"])));
    assert!(pages.iter().all(|p| p["source"] == "mezzofy"));

    let (_, body) = send(app_with(&config, store.clone()), get("/pages?limit=1")).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    let (_, body) = send(app_with(&config, store), get("/pages")).await;
    assert_eq!(body.as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn test_cors_allows_any_origin_by_default() {
    let config = test_config();
    let app = app_with(&config, Arc::new(UnavailableStorage::new("test")));

    let request = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
        Some(&header::HeaderValue::from_static("*"))
    );
}

#[tokio::test]
async fn test_cors_restricted_to_configured_origins() {
    let mut config = test_config();
    config.server.allowed_origins = vec!["https://app.mezzofy.com".to_string()];
    let app = app_with(&config, Arc::new(UnavailableStorage::new("test")));

    let allowed = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "https://app.mezzofy.com")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(allowed).await.unwrap();
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
        Some(&header::HeaderValue::from_static("https://app.mezzofy.com"))
    );

    let denied = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "https://evil.example")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(denied).await.unwrap();
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}
