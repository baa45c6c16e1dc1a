//! LuckyDraw Cache - client-side data caching for a prize-drawing site
//!
//! Provides a namespaced, expiring key-value cache over durable storage,
//! cache-first and stale-while-revalidate fetching over async producers,
//! and paged row helpers for the remote data store.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheKey, CacheStore, CacheTtl, EventStatus};
pub use config::Config;
pub use fetch::{CachedFetcher, FetchPolicy};
pub use tasks::spawn_cleanup_task;
