use crate::api::AppState;
use crate::crawler::CrawlSummary;
use crate::storage::{PageFilter, PageRecord};
use crate::CrawlError;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

/// Body of `POST /crawl`
#[derive(Debug, Default, Deserialize)]
pub struct CrawlRequest {
    pub start_url: Option<String>,
    pub max_pages: Option<usize>,
}

/// Query string of `GET /pages`
#[derive(Debug, Default, Deserialize)]
pub struct PagesQuery {
    pub q: Option<String>,
    pub limit: Option<usize>,
}

impl IntoResponse for CrawlError {
    fn into_response(self) -> Response {
        let status = match &self {
            CrawlError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            CrawlError::Client(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "status": "ok", "app": state.app_name }))
}

pub async fn crawl(
    State(state): State<AppState>,
    Json(req): Json<CrawlRequest>,
) -> Result<Json<CrawlSummary>, CrawlError> {
    let summary = state
        .coordinator
        .crawl(req.start_url.as_deref(), req.max_pages)
        .await
        .inspect_err(|e| tracing::info!("Rejected crawl request: {}", e))?;
    Ok(Json(summary))
}

/// Lists stored pages; a storage failure yields an empty list
pub async fn list_pages(
    State(state): State<AppState>,
    Query(params): Query<PagesQuery>,
) -> Json<Vec<PageRecord>> {
    let filter = PageFilter::search(params.q.as_deref());
    let limit = params.limit.unwrap_or(state.default_page_limit);

    match state.store().query(&filter, limit) {
        Ok(pages) => Json(pages),
        Err(e) => {
            tracing::warn!("Page query failed, returning no pages: {}", e);
            Json(Vec::new())
        }
    }
}
