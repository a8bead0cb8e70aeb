//! Rate Limiter Module
//!
//! Fixed-window request budgets per client identity, plus the helper that
//! turns a peer address into an identity.

mod window;


use std::net::IpAddr;

pub use window::{RateLimitEntry, RateLimiter};

// == Public Constants ==
/// Shared bucket for requests whose peer address is unavailable.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Maps an optional peer address to a rate-limit identity.
///
/// Requests without an address all share the [`UNKNOWN_CLIENT`] bucket,
/// so they are limited together rather than not at all.
pub fn client_identity(addr: Option<IpAddr>) -> String {
    match addr {
        Some(ip) => ip.to_string(),
        None => UNKNOWN_CLIENT.to_string(),
    }
}
