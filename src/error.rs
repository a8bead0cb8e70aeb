//! Error types for the search proxy
//!
//! Provides unified error handling using thiserror.

use std::time::Duration;

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::search::ProviderError;

/// Non-standard status used when the caller went away mid-request.
const CLIENT_CLOSED_REQUEST: u16 = 499;

// == Search Error Enum ==
/// Unified error type for search requests.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// Invalid request data
    #[error("{0}")]
    InvalidRequest(String),

    /// Client exhausted its request budget for the current window
    #[error("Too many requests")]
    RateLimited {
        retry_after: Duration,
        max_requests: u32,
    },

    /// The search provider failed or answered with an error
    #[error("YouTube API error: {0}")]
    Provider(String),

    /// A required credential is missing
    #[error("{0}")]
    Configuration(String),

    /// The caller withdrew interest before the provider answered
    #[error("Request cancelled")]
    Cancelled,
}

impl From<ProviderError> for SearchError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::MissingApiKey => SearchError::Configuration(err.to_string()),
            ProviderError::Api(message) => SearchError::Provider(message),
            other => SearchError::Provider(other.to_string()),
        }
    }
}

/// Human label for a rate-limit window, e.g. "minute" or "90 seconds".
fn window_label(window: Duration) -> String {
    match window.as_secs() {
        60 => "minute".to_string(),
        secs if secs % 60 == 0 => format!("{} minutes", secs / 60),
        secs => format!("{} seconds", secs),
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        match self {
            SearchError::RateLimited {
                retry_after,
                max_requests,
            } => {
                let body = Json(json!({
                    "error": "Too many requests",
                    "message": format!(
                        "Please wait before searching again. Max {} searches per {}.",
                        max_requests,
                        window_label(retry_after)
                    ),
                }));
                let mut response = (StatusCode::TOO_MANY_REQUESTS, body).into_response();
                response.headers_mut().insert(
                    header::RETRY_AFTER,
                    HeaderValue::from(retry_after.as_secs().max(1)),
                );
                response
            }
            SearchError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
            SearchError::Provider(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "YouTube API error", "message": msg })),
            )
                .into_response(),
            SearchError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": msg })),
            )
                .into_response(),
            SearchError::Cancelled => {
                let status = StatusCode::from_u16(CLIENT_CLOSED_REQUEST)
                    .unwrap_or(StatusCode::REQUEST_TIMEOUT);
                (status, Json(json!({ "error": "Request cancelled" }))).into_response()
            }
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the search proxy.
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_rate_limited_response() {
        let response = SearchError::RateLimited {
            retry_after: Duration::from_secs(60),
            max_requests: 10,
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "60");

        let json = body_json(response).await;
        assert_eq!(json["error"], "Too many requests");
        assert_eq!(
            json["message"],
            "Please wait before searching again. Max 10 searches per minute."
        );
    }

    #[tokio::test]
    async fn test_provider_error_response() {
        let response = SearchError::Provider("quota exceeded".to_string()).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"], "YouTube API error");
        assert_eq!(json["message"], "quota exceeded");
    }

    #[tokio::test]
    async fn test_missing_key_maps_to_configuration_error() {
        let err = SearchError::from(ProviderError::MissingApiKey);
        assert_eq!(
            err,
            SearchError::Configuration("YouTube API key not configured".to_string())
        );

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await["error"],
            "YouTube API key not configured"
        );
    }

    #[tokio::test]
    async fn test_invalid_request_response() {
        let response = SearchError::InvalidRequest("Search query is required".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_cancelled_status() {
        let response = SearchError::Cancelled.into_response();
        assert_eq!(response.status().as_u16(), 499);
    }

    #[test]
    fn test_window_label() {
        assert_eq!(window_label(Duration::from_secs(60)), "minute");
        assert_eq!(window_label(Duration::from_secs(300)), "5 minutes");
        assert_eq!(window_label(Duration::from_secs(90)), "90 seconds");
    }
}
