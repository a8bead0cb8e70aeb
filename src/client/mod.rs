//! Client Module
//!
//! Client-side mirrors of the proxy: a search cache in front of the HTTP API
//! and a memoized network quality estimate.

mod error;
mod network;
mod search;

pub use error::ClientError;
pub use network::{
    classify_link, optimal_quality, quality_from_latency, thumbnail_url, HttpProbe, LatencyProbe,
    LinkInfo, NetworkMonitor, NetworkQuality, NetworkStatus, ProbeError, PROBE_URL,
};
pub use search::SearchClient;
