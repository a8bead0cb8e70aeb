//! Errors surfaced by the client-side search mirror.

use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The server refused the search; retry after the given delay
    #[error("{message}")]
    RateLimited {
        retry_after: Duration,
        message: String,
    },

    /// The server answered with an error status
    #[error("{0}")]
    Server(String),

    /// The request never produced a response
    #[error("search request failed: {0}")]
    Transport(String),

    /// The response body could not be parsed
    #[error("malformed search response: {0}")]
    Malformed(String),

    /// The caller cancelled the search
    #[error("search cancelled")]
    Cancelled,
}
