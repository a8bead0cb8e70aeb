//! YouTube Data API v3 search provider.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::search::{ProviderError, SearchItem, SearchProvider};

/// Default base URL of the YouTube Data API.
pub const YOUTUBE_API_BASE: &str = "https://www.googleapis.com/youtube/v3";

#[derive(Debug, Deserialize)]
struct SearchListResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: Option<String>,
}

impl ApiError {
    fn into_provider_error(self) -> ProviderError {
        ProviderError::Api(self.message.unwrap_or_else(|| "Unknown error".to_string()))
    }
}

// == YouTube Provider ==
/// Calls `GET {base}/search?part=snippet&type=video`.
#[derive(Debug, Clone)]
pub struct YouTubeProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl YouTubeProvider {
    /// Creates a provider against the public API.
    ///
    /// A missing key is not an error here: every search then fails with
    /// [`ProviderError::MissingApiKey`] so the server can still start.
    pub fn new(api_key: Option<String>) -> Result<Self, ProviderError> {
        Self::with_base_url(api_key, YOUTUBE_API_BASE)
    }

    /// Creates a provider against an alternative API root.
    pub fn with_base_url(
        api_key: Option<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl SearchProvider for YouTubeProvider {
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<SearchItem>, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or(ProviderError::MissingApiKey)?;
        let url = format!("{}/search", self.base_url);
        let max_results = max_results.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("part", "snippet"),
                ("type", "video"),
                ("q", query),
                ("maxResults", max_results.as_str()),
                ("key", api_key),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ProviderError::Transport(e.without_url().to_string()))?;

        if !status.is_success() {
            return Err(match serde_json::from_slice::<ErrorEnvelope>(&body) {
                Ok(envelope) => envelope.error.into_provider_error(),
                Err(_) => ProviderError::Status(status.as_u16()),
            });
        }

        let parsed: SearchListResponse = serde_json::from_slice(&body)
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        if let Some(error) = parsed.error {
            return Err(error.into_provider_error());
        }

        debug!(items = parsed.items.len(), "YouTube search returned");
        Ok(parsed.items)
    }
}
