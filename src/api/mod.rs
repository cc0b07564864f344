//! HTTP API
//!
//! Routes:
//! - `GET /health` - liveness and app name
//! - `POST /crawl` - run a crawl, returns visited/saved counts
//! - `GET /pages` - list stored pages with an optional search filter

mod handlers;

pub use handlers::{CrawlRequest, PagesQuery};

use crate::config::{Config, ServerConfig};
use crate::crawler::Coordinator;
use crate::storage::PageStore;
use crate::CrawlerError;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub app_name: String,
    pub coordinator: Coordinator,
    pub default_page_limit: usize,
}

impl AppState {
    pub fn new(config: &ServerConfig, coordinator: Coordinator) -> Self {
        Self {
            app_name: config.app_name.clone(),
            coordinator,
            default_page_limit: config.default_page_limit,
        }
    }

    pub fn store(&self) -> &Arc<dyn PageStore> {
        self.coordinator.store()
    }
}

/// Builds the router; an empty origin list allows any origin
pub fn build_router(state: AppState, allowed_origins: &[String]) -> Router {
    let cors = if allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .route("/health", get(handlers::health))
        .route("/crawl", post(handlers::crawl))
        .route("/pages", get(handlers::list_pages))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Serves the API until Ctrl-C
pub async fn serve(config: &Config, store: Arc<dyn PageStore>) -> Result<(), CrawlerError> {
    let coordinator = Coordinator::from_config(config, store)?;
    let app = build_router(
        AppState::new(&config.server, coordinator),
        &config.server.allowed_origins,
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("{} listening on {}", config.server.app_name, addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
