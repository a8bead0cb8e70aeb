//! API Routes
//!
//! Configures the Axum router with all search proxy endpoints.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cache_stats_handler, clear_cache_handler, health_handler, search_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /api/proxy/youtube-search` - Rate-limited, cached video search
/// - `GET /api/proxy/health` - Health check with cache occupancy
/// - `GET /api/proxy/cache` - Cache and limiter statistics
/// - `DELETE /api/proxy/cache` - Drop all cached searches
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/proxy/youtube-search", get(search_handler))
        .route("/api/proxy/health", get(health_handler))
        .route(
            "/api/proxy/cache",
            get(cache_stats_handler).delete(clear_cache_handler),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
