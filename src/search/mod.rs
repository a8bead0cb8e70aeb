//! Search Module
//!
//! Orchestrates video searches: cache key normalization, the outbound
//! provider seam and its YouTube implementation, and the rate-limited,
//! cached service that ties them together.

mod key;
mod provider;
mod service;
mod video;
mod youtube;

pub use key::{cache_key, KEY_SEPARATOR};
pub use provider::{ProviderError, SearchProvider};
pub use service::{
    CacheStatus, CacheStatusReport, RateLimitPolicy, SearchOutcome, SearchService, SharedCache,
    SharedLimiter, DEFAULT_PROVIDER_TIMEOUT,
};
pub use video::{normalize, ItemId, SearchItem, Snippet, Thumbnail, Thumbnails, Video};
pub use youtube::{YouTubeProvider, YOUTUBE_API_BASE};
