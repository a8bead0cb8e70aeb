//! Cache key construction for search results.

/// Separator between the normalized query and the result count.
pub const KEY_SEPARATOR: &str = "::";

/// Builds the cache key for a search.
///
/// Queries that differ only in case or surrounding whitespace map to the
/// same key.
pub fn cache_key(query: &str, max_results: u32) -> String {
    format!(
        "{}{}{}",
        query.trim().to_lowercase(),
        KEY_SEPARATOR,
        max_results
    )
}
