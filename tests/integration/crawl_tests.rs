//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! fetch, extract, store cycle over real HTTP into SQLite.

use mezzofy_crawler::config::{Config, StorageConfig, UserAgentConfig};
use mezzofy_crawler::crawler::{self, Coordinator};
use mezzofy_crawler::storage::{PageFilter, PageStore, SqliteStorage};
use mezzofy_crawler::CrawlError;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration scoped to the mock server's host
fn create_test_config(base_url: &str, db_path: Option<String>) -> Config {
    let mut config = Config::default();
    config.crawler.root_domain = "127.0.0.1".to_string();
    config.crawler.default_start_url = base_url.to_string();
    config.crawler.fetch_timeout_secs = 1;
    config.crawler.keywords = vec!["coupon".to_string(), "voucher".to_string()];
    config.user_agent = UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: "https://example.com/bot".to_string(),
    };
    config.storage = StorageConfig {
        database_path: db_path,
    };
    config
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body.to_string())
        .insert_header("content-type", "text/html")
}

async fn mount_page(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
}

fn coordinator(config: &Config) -> (Coordinator, Arc<SqliteStorage>) {
    let store = Arc::new(SqliteStorage::new_in_memory().expect("Failed to open in-memory db"));
    let coordinator =
        Coordinator::from_config(config, store.clone()).expect("Failed to build coordinator");
    (coordinator, store)
}

#[tokio::test]
async fn test_full_crawl_single_domain() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        html(
            r#"<html><head><title>Home</title></head><body>
            <a href="/deals">Deals</a>
            <a href="/about">About</a>
            <a href="/missing">Missing</a>
            <a href="https://example.com/elsewhere">Elsewhere</a>
            </body></html>"#,
        ),
    )
    .await;
    mount_page(
        &mock_server,
        "/deals",
        html(
            r#"<html><head><title>Deals</title>
            <meta name="description" content="Digital coupon campaigns">
            </head><body><p>Run a coupon or voucher drive in minutes.</p></body></html>"#,
        ),
    )
    .await;
    mount_page(
        &mock_server,
        "/about",
        html("<html><body><p>We are a small team.</p></body></html>"),
    )
    .await;
    mount_page(&mock_server, "/missing", ResponseTemplate::new(404)).await;

    let config = create_test_config(&base_url, None);
    let (coordinator, store) = coordinator(&config);

    let summary = coordinator.crawl(None, None).await.expect("Crawl failed");

    assert_eq!(summary.visited, 4);
    assert_eq!(summary.saved, 1);

    let pages = store.query(&PageFilter::all(), 10).expect("Query failed");
    assert_eq!(pages.len(), 1);

    let deals = &pages[0].page;
    assert_eq!(deals.url, format!("{}/deals", base_url));
    assert_eq!(deals.title.as_deref(), Some("Deals"));
    assert_eq!(deals.description.as_deref(), Some("Digital coupon campaigns"));
    assert_eq!(deals.snippet.as_deref(), Some("Run a coupon or voucher drive in minutes."));
    assert_eq!(deals.keywords_matched, vec!["coupon", "voucher"]);
    assert_eq!(deals.source, "mezzofy");
}

#[tokio::test]
async fn test_server_error_on_seed_is_not_fatal() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", ResponseTemplate::new(500)).await;

    let config = create_test_config(&mock_server.uri(), None);
    let (coordinator, store) = coordinator(&config);

    let summary = coordinator.crawl(None, None).await.expect("Crawl failed");

    assert_eq!(summary.visited, 1);
    assert_eq!(summary.saved, 0);
    assert_eq!(store.count().unwrap(), 0);
}

#[tokio::test]
async fn test_slow_page_times_out() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/",
        html("<p>coupon</p>").set_delay(std::time::Duration::from_secs(3)),
    )
    .await;

    let config = create_test_config(&mock_server.uri(), None);
    let (coordinator, store) = coordinator(&config);

    let summary = coordinator.crawl(None, None).await.expect("Crawl failed");

    assert_eq!(summary.visited, 1);
    assert_eq!(summary.saved, 0);
    assert_eq!(store.count().unwrap(), 0);
}

#[tokio::test]
async fn test_page_budget_is_respected() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        html(r#"<a href="/a">A</a><a href="/b">B</a><a href="/c">C</a><p>coupon</p>"#),
    )
    .await;
    for route in ["/a", "/b", "/c"] {
        mount_page(&mock_server, route, html("<p>voucher</p>")).await;
    }

    let config = create_test_config(&mock_server.uri(), None);
    let (coordinator, store) = coordinator(&config);

    let summary = coordinator.crawl(None, Some(2)).await.expect("Crawl failed");

    assert_eq!(summary.visited, 2);
    assert_eq!(summary.saved, 2);
    assert_eq!(store.count().unwrap(), 2);

    let requests = mock_server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn test_out_of_scope_start_url_fetches_nothing() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", html("<p>coupon</p>")).await;

    let config = create_test_config(&mock_server.uri(), None);
    let (coordinator, _store) = coordinator(&config);

    let result = coordinator.crawl(Some("https://notmezzofy.com"), None).await;

    assert!(matches!(result, Err(CrawlError::InvalidInput(_))));
    let requests = mock_server.received_requests().await.unwrap_or_default();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn test_requests_carry_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "TestBot/1.0.0 (+https://example.com/bot)"))
        .respond_with(html("<p>coupon</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), None);
    let (coordinator, _store) = coordinator(&config);

    let summary = coordinator.crawl(None, None).await.expect("Crawl failed");

    assert_eq!(summary.saved, 1);
}

#[tokio::test]
async fn test_redirect_is_stored_under_requested_url() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/old",
        ResponseTemplate::new(301).insert_header("location", format!("{}/new", base_url).as_str()),
    )
    .await;
    mount_page(&mock_server, "/new", html("<p>Coupon wallet</p>")).await;

    let config = create_test_config(&base_url, None);
    let (coordinator, store) = coordinator(&config);

    let start = format!("{}/old", base_url);
    let summary = coordinator.crawl(Some(&start), None).await.expect("Crawl failed");

    assert_eq!(summary.visited, 1);
    assert_eq!(summary.saved, 1);

    let pages = store.query(&PageFilter::all(), 10).unwrap();
    assert_eq!(pages[0].page.url, start);
}

#[tokio::test]
async fn test_crawl_persists_to_configured_database() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("pages.db");

    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/",
        html(r#"<title>Coupons</title><a href="/more">More</a>"#),
    )
    .await;
    mount_page(&mock_server, "/more", html("<p>Nothing to see</p>")).await;

    let config = create_test_config(
        &mock_server.uri(),
        Some(db_path.to_string_lossy().into_owned()),
    );

    let summary = crawler::crawl(&config, None, None).await.expect("Crawl failed");
    assert_eq!(summary.visited, 2);
    assert_eq!(summary.saved, 1);

    let storage = SqliteStorage::new(&db_path).expect("Failed to reopen database");
    let pages = storage
        .query(&PageFilter::search(Some("coupon")), 10)
        .expect("Query failed");
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].page.title.as_deref(), Some("Coupons"));
}

#[tokio::test]
async fn test_crawl_without_database_still_counts() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", html("<p>coupon</p>")).await;

    let config = create_test_config(&mock_server.uri(), None);

    let summary = crawler::crawl(&config, None, None).await.expect("Crawl failed");

    assert_eq!(summary.visited, 1);
    assert_eq!(summary.saved, 0);
}
