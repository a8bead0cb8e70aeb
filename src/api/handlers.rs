//! API Handlers
//!
//! HTTP request handlers for each search proxy endpoint.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use tokio_util::sync::CancellationToken;

use crate::error::{Result, SearchError};
use crate::limiter::client_identity;
use crate::models::{
    CacheStatsResponse, ClearCacheResponse, HealthResponse, SearchParams, SearchResponse,
};
use crate::search::SearchService;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Rate-limited, cached search front
    pub search: SearchService,
}

impl AppState {
    /// Creates a new AppState around a search service.
    pub fn new(search: SearchService) -> Self {
        Self { search }
    }
}

/// Handler for GET /api/proxy/youtube-search
///
/// Runs a rate-limited, cached search. Successful responses carry
/// `X-Cache: HIT|MISS` and a public `Cache-Control` matching the cache TTL.
pub async fn search_handler(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    Query(params): Query<SearchParams>,
) -> Result<Response> {
    if let Some(error_msg) = params.validate() {
        return Err(SearchError::InvalidRequest(error_msg));
    }

    let client = client_identity(connect_info.map(|ConnectInfo(addr)| addr.ip()));

    // A client disconnect drops this future, which also drops the
    // provider call. The token covers explicit cancellation paths.
    let cancel = CancellationToken::new();
    let outcome = state
        .search
        .search(params.query(), params.max_results(), &client, &cancel)
        .await?;

    let headers = [
        ("x-cache", outcome.cache.as_header().to_string()),
        (
            "cache-control",
            format!("public, max-age={}", state.search.cache_ttl().as_secs()),
        ),
    ];

    Ok((
        headers,
        Json(SearchResponse {
            videos: outcome.videos,
        }),
    )
        .into_response())
}

/// Handler for GET /api/proxy/health
///
/// Returns health status plus search cache occupancy.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::ok(state.search.cache_status().await))
}

/// Handler for GET /api/proxy/cache
///
/// Returns search cache counters and the number of rate-limited clients.
pub async fn cache_stats_handler(State(state): State<AppState>) -> Json<CacheStatsResponse> {
    let report = state.search.cache_status().await;
    let stats = state.search.cache_stats().await;
    let tracked = state.search.tracked_clients().await;

    Json(CacheStatsResponse::new(report, &stats, tracked))
}

/// Handler for DELETE /api/proxy/cache
///
/// Drops every cached search so the next requests hit the provider.
pub async fn clear_cache_handler(State(state): State<AppState>) -> Json<ClearCacheResponse> {
    Json(ClearCacheResponse::new(state.search.clear_cache().await))
}
