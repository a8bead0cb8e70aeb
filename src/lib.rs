//! Muzik Search - YouTube search proxy with caching and rate limiting
//!
//! Provides a TTL-bounded search cache, a per-client fixed-window rate
//! limiter, and client-side mirrors of both caches.

pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod limiter;
pub mod models;
pub mod search;
pub mod tasks;

pub use api::AppState;
pub use config::{ClientConfig, Config};
pub use error::SearchError;
pub use tasks::spawn_sweep_task;
