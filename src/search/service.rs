//! Search Service Module
//!
//! Answers "top N videos for query Q" by composing the per-client rate
//! limiter, the search-result cache and the outbound provider.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::cache::{CacheStats, ExpiringCache};
use crate::config::Config;
use crate::error::{Result, SearchError};
use crate::limiter::RateLimiter;
use crate::search::{cache_key, normalize, SearchProvider, Video};

/// Longest prefix of a user query written to logs.
const LOGGED_QUERY_CHARS: usize = 64;

/// Upper bound on a single provider call unless configured otherwise.
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

pub type SharedCache = Arc<RwLock<ExpiringCache<String, Vec<Video>>>>;
pub type SharedLimiter = Arc<RwLock<RateLimiter<String>>>;

// == Rate Limit Policy ==
/// Where the limiter sits relative to the cache lookup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateLimitPolicy {
    /// Every request is charged, hits included.
    #[default]
    LimitFirst,
    /// Cache hits are served without charging the limiter.
    CacheHitsBypass,
}

// == Cache Status ==
/// Whether a search was answered from the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl CacheStatus {
    /// Value of the `X-Cache` response header.
    pub fn as_header(&self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
        }
    }
}

/// Videos plus how they were obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub videos: Vec<Video>,
    pub cache: CacheStatus,
}

/// Size and capacity of the search cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatusReport {
    pub search_entries: usize,
    pub max_size: usize,
}

// == Search Service ==
/// Rate-limited, cached front for a [`SearchProvider`].
///
/// Cloning is cheap: clones share the same cache, limiter and provider.
#[derive(Clone)]
pub struct SearchService {
    cache: SharedCache,
    limiter: SharedLimiter,
    provider: Arc<dyn SearchProvider>,
    policy: RateLimitPolicy,
    provider_timeout: Duration,
    cache_ttl: Duration,
}

impl SearchService {
    // == Constructor ==
    pub fn new(
        cache: ExpiringCache<String, Vec<Video>>,
        limiter: RateLimiter<String>,
        provider: Arc<dyn SearchProvider>,
    ) -> Self {
        Self {
            cache_ttl: cache.ttl(),
            cache: Arc::new(RwLock::new(cache)),
            limiter: Arc::new(RwLock::new(limiter)),
            provider,
            policy: RateLimitPolicy::default(),
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }

    /// Builds the cache and limiter from configuration.
    pub fn from_config(config: &Config, provider: Arc<dyn SearchProvider>) -> Self {
        let cache = ExpiringCache::new(config.search_cache_max_entries, config.search_cache_ttl());
        let limiter = RateLimiter::new(config.rate_limit_max_requests, config.rate_limit_window());

        Self::new(cache, limiter, provider)
            .with_policy(config.rate_limit_policy())
            .with_provider_timeout(config.provider_timeout())
    }

    pub fn with_policy(mut self, policy: RateLimitPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }

    // == Search ==
    /// Answers a search, consulting the provider only on a cache miss.
    ///
    /// The rate check and key computation finish before the provider call,
    /// and no lock is held while the provider is in flight. Failed and
    /// cancelled fetches leave the cache untouched; the rate-limit charge
    /// already taken stands.
    pub async fn search(
        &self,
        query: &str,
        max_results: u32,
        client: &str,
        cancel: &CancellationToken,
    ) -> Result<SearchOutcome> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::InvalidRequest(
                "Search query is required".to_string(),
            ));
        }

        let key = cache_key(query, max_results);

        match self.policy {
            RateLimitPolicy::LimitFirst => {
                self.check_rate(client).await?;
                if let Some(videos) = self.lookup(&key).await {
                    return Ok(SearchOutcome::hit(videos));
                }
            }
            RateLimitPolicy::CacheHitsBypass => {
                if let Some(videos) = self.lookup(&key).await {
                    return Ok(SearchOutcome::hit(videos));
                }
                self.check_rate(client).await?;
            }
        }

        debug!(key = %key, "Search cache miss");
        let videos = self.fetch(query, max_results, cancel).await?;

        self.cache.write().await.set(key, videos.clone());
        Ok(SearchOutcome {
            videos,
            cache: CacheStatus::Miss,
        })
    }

    async fn check_rate(&self, client: &str) -> Result<()> {
        let mut limiter = self.limiter.write().await;
        if limiter.allow(client.to_string()) {
            return Ok(());
        }

        info!(client, "Search rate limited");
        Err(SearchError::RateLimited {
            retry_after: limiter.window(),
            max_requests: limiter.max_requests(),
        })
    }

    async fn lookup(&self, key: &str) -> Option<Vec<Video>> {
        let hit = self.cache.write().await.get(key);
        if hit.is_some() {
            debug!(key, "Search cache hit");
        }
        hit
    }

    async fn fetch(
        &self,
        query: &str,
        max_results: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<Video>> {
        let call = tokio::time::timeout(
            self.provider_timeout,
            self.provider.search(query, max_results),
        );

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(query = %loggable(query), "Search cancelled by caller");
                return Err(SearchError::Cancelled);
            }
            outcome = call => outcome,
        };

        let result = match outcome {
            Ok(result) => result.map_err(SearchError::from),
            Err(_) => Err(SearchError::Provider(format!(
                "search timed out after {} seconds",
                self.provider_timeout.as_secs()
            ))),
        };

        match result {
            Ok(items) => Ok(normalize(items)),
            Err(SearchError::Configuration(msg)) => {
                error!("{}", msg);
                Err(SearchError::Configuration(msg))
            }
            Err(err) => {
                warn!(query = %loggable(query), error = %err, "Search provider failed");
                Err(err)
            }
        }
    }

    // == Diagnostics ==
    pub async fn cache_status(&self) -> CacheStatusReport {
        let cache = self.cache.read().await;
        CacheStatusReport {
            search_entries: cache.len(),
            max_size: cache.capacity(),
        }
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.read().await.stats()
    }

    /// Drops every cached search so later requests go to the provider.
    pub async fn clear_cache(&self) -> usize {
        let mut cache = self.cache.write().await;
        let cleared = cache.len();
        cache.clear();
        info!(cleared, "Search cache cleared");
        cleared
    }

    /// Number of client identities the limiter is tracking.
    pub async fn tracked_clients(&self) -> usize {
        self.limiter.read().await.tracked()
    }

    /// Shared limiter handle, for the background sweep.
    pub fn limiter(&self) -> SharedLimiter {
        self.limiter.clone()
    }

    pub fn cache_ttl(&self) -> Duration {
        self.cache_ttl
    }

    pub fn policy(&self) -> RateLimitPolicy {
        self.policy
    }
}

impl SearchOutcome {
    fn hit(videos: Vec<Video>) -> Self {
        Self {
            videos,
            cache: CacheStatus::Hit,
        }
    }
}

/// Truncates and escapes a user query for logging.
fn loggable(query: &str) -> String {
    let truncated: String = query.chars().take(LOGGED_QUERY_CHARS).collect();
    let mut escaped = truncated.escape_debug().to_string();
    if query.chars().count() > LOGGED_QUERY_CHARS {
        escaped.push_str("...");
    }
    escaped
}
