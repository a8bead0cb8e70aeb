//! Search Provider Module
//!
//! The outbound seam of the orchestrator: anything that can turn a query
//! into raw search items.

use async_trait::async_trait;
use thiserror::Error;

use crate::search::SearchItem;

// == Provider Error ==
/// Failures of an outbound search call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// No API credential is configured
    #[error("YouTube API key not configured")]
    MissingApiKey,

    /// The provider answered with an error payload
    #[error("{0}")]
    Api(String),

    /// Non-2xx status without a usable error payload
    #[error("provider returned HTTP {0}")]
    Status(u16),

    /// The response body could not be parsed
    #[error("malformed provider response: {0}")]
    Malformed(String),

    /// The request never produced a response
    #[error("provider request failed: {0}")]
    Transport(String),
}

// == Search Provider ==
/// External video search service queried on a cache miss.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Runs a search and returns the raw items in provider order.
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<SearchItem>, ProviderError>;
}
