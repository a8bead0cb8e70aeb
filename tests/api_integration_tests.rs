//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint against a stub
//! search provider.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use muzik_search::{
    api::create_router,
    cache::ExpiringCache,
    limiter::RateLimiter,
    search::{ProviderError, SearchItem, SearchProvider, SearchService},
    AppState,
};
use serde_json::{json, Value};
use tower::ServiceExt;

// == Helper Functions ==

/// Provider returning a fixed answer and counting calls.
struct StubProvider {
    result: Result<Vec<SearchItem>, ProviderError>,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl SearchProvider for StubProvider {
    async fn search(
        &self,
        _query: &str,
        _max_results: u32,
    ) -> Result<Vec<SearchItem>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

fn item(video_id: &str, title: &str) -> SearchItem {
    serde_json::from_value(json!({
        "id": { "videoId": video_id },
        "snippet": {
            "title": title,
            "description": "",
            "channelTitle": "Lofi Girl",
            "publishedAt": "2024-01-01T00:00:00Z",
            "thumbnails": { "medium": { "url": format!("https://i.ytimg.com/vi/{}/mqdefault.jpg", video_id) } }
        }
    }))
    .unwrap()
}

fn create_test_app(result: Result<Vec<SearchItem>, ProviderError>) -> (Router, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let provider = StubProvider {
        result,
        calls: calls.clone(),
    };
    let service = SearchService::new(
        ExpiringCache::new(200, Duration::from_secs(600)),
        RateLimiter::new(10, Duration::from_secs(60)),
        Arc::new(provider),
    );
    (create_router(AppState::new(service)), calls)
}

fn lofi_app() -> (Router, Arc<AtomicUsize>) {
    create_test_app(Ok(vec![
        item("v1", "lofi beats"),
        item("v2", "lofi rain"),
        item("v3", "lofi study"),
    ]))
}

fn search_request(query: &str, ip: [u8; 4]) -> Request<Body> {
    Request::builder()
        .uri(format!("/api/proxy/youtube-search?q={}&maxResults=5", query))
        .extension(ConnectInfo(SocketAddr::from((ip, 40_000))))
        .body(Body::empty())
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

async fn body_to_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// == Search Endpoint Tests ==

#[tokio::test]
async fn test_search_miss_then_hit() {
    let (app, calls) = lofi_app();

    let first = send(&app, search_request("lofi", [1, 2, 3, 4])).await;
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(first.headers()["x-cache"], "MISS");
    assert_eq!(first.headers()[header::CACHE_CONTROL], "public, max-age=600");

    let json = body_to_json(first).await;
    let videos = json["videos"].as_array().unwrap();
    assert_eq!(videos.len(), 3);
    assert_eq!(videos[0]["videoId"], "v1");
    assert_eq!(videos[0]["channelTitle"], "Lofi Girl");
    assert_eq!(
        videos[0]["thumbnail"],
        "https://i.ytimg.com/vi/v1/mqdefault.jpg"
    );

    // Same key after trimming and lowercasing
    let second = send(&app, search_request("%20LOFI%20", [1, 2, 3, 4])).await;
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(second.headers()["x-cache"], "HIT");
    assert_eq!(body_to_json(second).await["videos"].as_array().unwrap().len(), 3);

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_eleventh_request_is_rate_limited() {
    let (app, calls) = lofi_app();

    for i in 0..10 {
        let response = send(&app, search_request("lofi", [1, 2, 3, 4])).await;
        assert_eq!(response.status(), StatusCode::OK, "request {} should pass", i + 1);
    }

    let response = send(&app, search_request("lofi", [1, 2, 3, 4])).await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.headers()[header::RETRY_AFTER], "60");

    let json = body_to_json(response).await;
    assert_eq!(json["error"], "Too many requests");
    assert_eq!(
        json["message"],
        "Please wait before searching again. Max 10 searches per minute."
    );

    // Another client still has its full budget
    let other = send(&app, search_request("lofi", [5, 6, 7, 8])).await;
    assert_eq!(other.status(), StatusCode::OK);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_missing_query_is_rejected() {
    let (app, calls) = lofi_app();

    let response = send(
        &app,
        Request::builder()
            .uri("/api/proxy/youtube-search?maxResults=5")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_to_json(response).await["error"], "Search query is required");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_provider_error_is_not_cached() {
    let (app, calls) = create_test_app(Err(ProviderError::Api("quota exceeded".to_string())));

    for _ in 0..2 {
        let response = send(&app, search_request("lofi", [1, 2, 3, 4])).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_to_json(response).await;
        assert_eq!(json["error"], "YouTube API error");
        assert_eq!(json["message"], "quota exceeded");
    }

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_missing_api_key() {
    let (app, _) = create_test_app(Err(ProviderError::MissingApiKey));

    let response = send(&app, search_request("lofi", [1, 2, 3, 4])).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_to_json(response).await["error"],
        "YouTube API key not configured"
    );
}

#[tokio::test]
async fn test_requests_without_peer_share_unknown_identity() {
    let (app, _) = lofi_app();
    let request = || {
        Request::builder()
            .uri("/api/proxy/youtube-search?q=lofi")
            .body(Body::empty())
            .unwrap()
    };

    for _ in 0..10 {
        assert_eq!(send(&app, request()).await.status(), StatusCode::OK);
    }
    assert_eq!(
        send(&app, request()).await.status(),
        StatusCode::TOO_MANY_REQUESTS
    );
}

// == Health And Cache Endpoint Tests ==

#[tokio::test]
async fn test_health_reports_cache_occupancy() {
    let (app, _) = lofi_app();
    send(&app, search_request("lofi", [1, 2, 3, 4])).await;

    let response = send(
        &app,
        Request::builder()
            .uri("/api/proxy/health")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["service"], "proxy");
    assert!(json["timestamp"].is_string());
    assert_eq!(json["cache"]["searchEntries"], 1);
    assert_eq!(json["cache"]["maxSize"], 200);
}

#[tokio::test]
async fn test_cache_stats_endpoint() {
    let (app, _) = lofi_app();
    send(&app, search_request("lofi", [1, 2, 3, 4])).await;
    send(&app, search_request("lofi", [1, 2, 3, 4])).await;

    let response = send(
        &app,
        Request::builder()
            .uri("/api/proxy/cache")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response).await;
    assert_eq!(json["searchEntries"], 1);
    assert_eq!(json["hits"], 1);
    assert_eq!(json["misses"], 1);
    assert_eq!(json["trackedClients"], 1);
}

#[tokio::test]
async fn test_clear_cache_forces_refetch() {
    let (app, calls) = lofi_app();
    send(&app, search_request("lofi", [1, 2, 3, 4])).await;

    let response = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri("/api/proxy/cache")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_to_json(response).await["cleared"], 1);

    let response = send(&app, search_request("lofi", [1, 2, 3, 4])).await;
    assert_eq!(response.headers()["x-cache"], "MISS");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let (app, _) = lofi_app();

    let response = send(
        &app,
        Request::builder()
            .uri("/api/proxy/unknown")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
