//! Response DTOs for the search proxy API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::{Deserialize, Serialize};

use crate::cache::CacheStats;
use crate::search::{CacheStatusReport, Video};

/// Response body of `GET /api/proxy/youtube-search`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub videos: Vec<Video>,
}

/// Response body of `GET /api/proxy/health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status ("ok")
    pub status: String,
    /// Service name
    pub service: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
    /// Search cache occupancy
    pub cache: CacheStatusReport,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn ok(cache: CacheStatusReport) -> Self {
        Self {
            status: "ok".to_string(),
            service: "proxy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            cache,
        }
    }
}

/// Response body of `GET /api/proxy/cache`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatsResponse {
    pub search_entries: usize,
    pub max_size: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    /// Client identities tracked by the rate limiter
    pub tracked_clients: usize,
}

impl CacheStatsResponse {
    pub fn new(report: CacheStatusReport, stats: &CacheStats, tracked_clients: usize) -> Self {
        Self {
            search_entries: report.search_entries,
            max_size: report.max_size,
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expirations: stats.expirations,
            hit_rate: stats.hit_rate(),
            tracked_clients,
        }
    }
}

/// Response body of `DELETE /api/proxy/cache`
#[derive(Debug, Clone, Serialize)]
pub struct ClearCacheResponse {
    pub message: String,
    pub cleared: usize,
}

impl ClearCacheResponse {
    pub fn new(cleared: usize) -> Self {
        Self {
            message: format!("Cleared {} cached searches", cleared),
            cleared,
        }
    }
}

/// Error body shared by every failing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short error description
    pub error: String,
    /// Optional detail, e.g. the provider's message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
