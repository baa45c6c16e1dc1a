//! API Module
//!
//! HTTP handlers and routing for the cache admin API, used to inspect the
//! cache and force-evict entries after known data changes.
//!
//! # Endpoints
//! - `GET /health` - Health check endpoint
//! - `GET /stats` - Cache statistics
//! - `GET /cache/:key` - Inspect an entry
//! - `DELETE /cache/:key` - Invalidate one key
//! - `DELETE /cache` - Clear the namespace
//! - `POST /cache/evict` - Sweep expired entries
//! - `POST /cache/events/invalidate` - Invalidate event-derived keys

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
