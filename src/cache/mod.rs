//! Cache Module
//!
//! Provides a generic in-memory cache with lazy TTL expiration and
//! oldest-insertion eviction.

mod entry;
mod order;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use order::InsertionOrder;
pub use stats::CacheStats;
pub use store::ExpiringCache;
