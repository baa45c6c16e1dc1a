//! Fetch Module
//!
//! Cache-aware reads over async producers, and the paged row helpers those
//! producers are built from.

mod fetcher;
mod pagination;

pub use fetcher::{CachedFetcher, FetchPolicy};
pub use pagination::{
    accurate_count, fetch_all_rows, PaginationError, RowSource, DEFAULT_PAGE_SIZE,
};
