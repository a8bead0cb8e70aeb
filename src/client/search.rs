//! Client Search Module
//!
//! Client-side mirror of the search cache: a short-lived memo in front of
//! the proxy's search endpoint. It has no rate limiter of its own.

use std::time::Duration;

use reqwest::{header, Client, StatusCode};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::cache::ExpiringCache;
use crate::client::ClientError;
use crate::config::ClientConfig;
use crate::models::{ErrorResponse, SearchResponse};
use crate::search::{cache_key, Video};

/// Retry delay assumed when a 429 carries no usable `Retry-After`.
const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(60);

// == Search Client ==
/// Searches through the proxy, memoizing non-empty results.
///
/// Meant to be driven from a single task, hence `&mut self` everywhere.
#[derive(Debug)]
pub struct SearchClient {
    http: Client,
    search_url: String,
    cache: ExpiringCache<String, Vec<Video>>,
    default_max_results: u32,
}

impl SearchClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let http = Client::builder()
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            search_url: format!(
                "{}/proxy/youtube-search",
                config.api_base.trim_end_matches('/')
            ),
            cache: ExpiringCache::new(config.search_cache_max_entries, config.search_cache_ttl),
            default_max_results: config.default_max_results,
        })
    }

    // == Search ==
    /// Returns videos for `query`, from the local cache when possible.
    ///
    /// Cancelling `cancel` aborts the request and leaves the cache as it
    /// was. Empty result lists are returned but not cached.
    pub async fn search(
        &mut self,
        query: &str,
        max_results: Option<u32>,
        cancel: &CancellationToken,
    ) -> Result<Vec<Video>, ClientError> {
        let max_results = max_results.unwrap_or(self.default_max_results);
        let key = cache_key(query, max_results);

        if let Some(videos) = self.cache.get(&key) {
            debug!(key = %key, "Client cache hit");
            return Ok(videos);
        }

        let request = self.fetch(query, max_results);
        let videos = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ClientError::Cancelled),
            result = request => result?,
        };

        if !videos.is_empty() {
            self.cache.set(key, videos.clone());
        }
        Ok(videos)
    }

    async fn fetch(&self, query: &str, max_results: u32) -> Result<Vec<Video>, ClientError> {
        let max_results = max_results.to_string();
        let response = self
            .http
            .get(&self.search_url)
            .query(&[("q", query), ("maxResults", max_results.as_str())])
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            let body: SearchResponse = response
                .json()
                .await
                .map_err(|e| ClientError::Malformed(e.to_string()))?;
            return Ok(body.videos);
        }

        let retry_after = response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs);
        let message = match response.json::<ErrorResponse>().await {
            Ok(body) => body.message.unwrap_or(body.error),
            Err(_) => "Search failed".to_string(),
        };

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ClientError::RateLimited {
                retry_after: retry_after.unwrap_or(DEFAULT_RETRY_AFTER),
                message,
            });
        }
        Err(ClientError::Server(message))
    }

    // == Cache Control ==
    /// Forgets every cached search so the next ones go to the server.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cached_searches(&self) -> usize {
        self.cache.len()
    }
}
