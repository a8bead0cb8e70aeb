//! API Module
//!
//! HTTP handlers and routing for the search proxy REST API.
//!
//! # Endpoints
//! - `GET /api/proxy/youtube-search?q=&maxResults=` - Cached video search
//! - `GET /api/proxy/health` - Health check endpoint
//! - `GET /api/proxy/cache` - Cache statistics
//! - `DELETE /api/proxy/cache` - Clear the search cache

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
