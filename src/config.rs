//! Configuration Module
//!
//! Handles loading and managing server configuration from environment
//! variables, plus the fixed settings of the client-side mirrors.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::search::{RateLimitPolicy, YOUTUBE_API_BASE};

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible
/// defaults. Durations are stored in whole seconds.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Credential for the YouTube Data API
    pub youtube_api_key: Option<String>,
    /// Root URL of the YouTube Data API
    pub youtube_api_base: String,
    /// Search cache TTL in seconds
    pub search_cache_ttl: u64,
    /// Maximum number of cached searches
    pub search_cache_max_entries: usize,
    /// Requests allowed per client per window
    pub rate_limit_max_requests: u32,
    /// Rate limit window in seconds
    pub rate_limit_window: u64,
    /// Interval in seconds between stale-client sweeps
    pub rate_limit_sweep_interval: u64,
    /// Upper bound in seconds on a single provider call
    pub provider_timeout: u64,
    /// Serve cache hits without charging the rate limiter
    pub cache_hits_bypass_limit: bool,
}

/// Reads `name` and parses it, keeping only positive values.
fn positive_env<T>(name: &str, default: T) -> T
where
    T: FromStr + PartialOrd + Default,
{
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .filter(|v| *v > T::default())
        .unwrap_or(default)
}

fn bool_env(name: &str, default: bool) -> bool {
    match env::var(name) {
        Ok(v) => matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// Missing, unparsable and zero values fall back to the defaults.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3001)
    /// - `YOUTUBE_API_KEY` - YouTube Data API key (default: none)
    /// - `YOUTUBE_API_BASE` - YouTube Data API root URL
    /// - `SEARCH_CACHE_TTL` - Search cache TTL in seconds (default: 600)
    /// - `SEARCH_CACHE_MAX_ENTRIES` - Search cache capacity (default: 200)
    /// - `RATE_LIMIT_MAX_REQUESTS` - Searches per client per window (default: 10)
    /// - `RATE_LIMIT_WINDOW` - Window length in seconds (default: 60)
    /// - `RATE_LIMIT_SWEEP_INTERVAL` - Sweep frequency in seconds (default: 300)
    /// - `PROVIDER_TIMEOUT` - Provider call timeout in seconds (default: 10)
    /// - `CACHE_HITS_BYPASS_LIMIT` - Serve hits without charging (default: false)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            server_port: positive_env("SERVER_PORT", defaults.server_port),
            youtube_api_key: env::var("YOUTUBE_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            youtube_api_base: env::var("YOUTUBE_API_BASE")
                .ok()
                .filter(|url| !url.trim().is_empty())
                .unwrap_or(defaults.youtube_api_base),
            search_cache_ttl: positive_env("SEARCH_CACHE_TTL", defaults.search_cache_ttl),
            search_cache_max_entries: positive_env(
                "SEARCH_CACHE_MAX_ENTRIES",
                defaults.search_cache_max_entries,
            ),
            rate_limit_max_requests: positive_env(
                "RATE_LIMIT_MAX_REQUESTS",
                defaults.rate_limit_max_requests,
            ),
            rate_limit_window: positive_env("RATE_LIMIT_WINDOW", defaults.rate_limit_window),
            rate_limit_sweep_interval: positive_env(
                "RATE_LIMIT_SWEEP_INTERVAL",
                defaults.rate_limit_sweep_interval,
            ),
            provider_timeout: positive_env("PROVIDER_TIMEOUT", defaults.provider_timeout),
            cache_hits_bypass_limit: bool_env(
                "CACHE_HITS_BYPASS_LIMIT",
                defaults.cache_hits_bypass_limit,
            ),
        }
    }

    pub fn search_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.search_cache_ttl)
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window)
    }

    pub fn rate_limit_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.rate_limit_sweep_interval)
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout)
    }

    pub fn rate_limit_policy(&self) -> RateLimitPolicy {
        if self.cache_hits_bypass_limit {
            RateLimitPolicy::CacheHitsBypass
        } else {
            RateLimitPolicy::LimitFirst
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3001,
            youtube_api_key: None,
            youtube_api_base: YOUTUBE_API_BASE.to_string(),
            search_cache_ttl: 600,
            search_cache_max_entries: 200,
            rate_limit_max_requests: 10,
            rate_limit_window: 60,
            rate_limit_sweep_interval: 300,
            provider_timeout: 10,
            cache_hits_bypass_limit: false,
        }
    }
}

// == Client Config ==
/// Settings of the client-side search and network-speed caches.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the proxy API, e.g. `http://localhost:3001/api`
    pub api_base: String,
    pub search_cache_ttl: Duration,
    pub search_cache_max_entries: usize,
    /// Result count used when the caller does not ask for one
    pub default_max_results: u32,
    pub network_cache_ttl: Duration,
    /// Hard limit on one latency probe
    pub probe_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:3001/api".to_string(),
            search_cache_ttl: Duration::from_secs(300),
            search_cache_max_entries: 50,
            default_max_results: 20,
            network_cache_ttl: Duration::from_secs(120),
            probe_timeout: Duration::from_secs(3),
        }
    }
}
