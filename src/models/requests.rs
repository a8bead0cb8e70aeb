//! Request DTOs for the search proxy API
//!
//! Defines the structure of incoming query strings.

use serde::Deserialize;

/// Result count used when `maxResults` is omitted.
pub const DEFAULT_MAX_RESULTS: u32 = 10;
/// Largest page the YouTube search endpoint accepts.
pub const MAX_RESULTS_LIMIT: u32 = 50;

/// Query string of `GET /api/proxy/youtube-search`
///
/// # Fields
/// - `q`: Search keywords
/// - `maxResults`: Optional number of results (default 10)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub max_results: Option<u32>,
}

impl SearchParams {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        match self.q.as_deref().map(str::trim) {
            None | Some("") => Some("Search query is required".to_string()),
            Some(_) => None,
        }
    }

    /// Requested result count, defaulted and clamped to `1..=50`.
    pub fn max_results(&self) -> u32 {
        self.max_results
            .unwrap_or(DEFAULT_MAX_RESULTS)
            .clamp(1, MAX_RESULTS_LIMIT)
    }

    pub fn query(&self) -> &str {
        self.q.as_deref().unwrap_or_default()
    }
}
