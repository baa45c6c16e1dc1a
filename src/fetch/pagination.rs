//! Paged row fetching.
//!
//! The remote data store caps every response at a fixed number of rows, so
//! producers that need a complete result set walk the range page by page.

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

// == Public Constants ==
/// Maximum rows the remote store returns for a single ranged request
pub const DEFAULT_PAGE_SIZE: usize = 1000;

// == Row Source ==
/// A query that can be read in inclusive row ranges.
#[async_trait]
pub trait RowSource: Send + Sync {
    type Row: Send;
    type Error: fmt::Display + Send;

    /// Returns rows `from..=to` in query order. Fewer rows than requested
    /// means the end of the result set was reached.
    async fn fetch_range(&self, from: usize, to: usize) -> Result<Vec<Self::Row>, Self::Error>;

    /// Returns the exact row count if the source can compute it without
    /// reading rows. `Ok(None)` means the count is not available.
    async fn exact_count(&self) -> Result<Option<u64>, Self::Error> {
        Ok(None)
    }
}

// == Pagination Error ==
#[derive(Error, Debug, PartialEq)]
pub enum PaginationError<E> {
    #[error("Page size must be greater than zero")]
    InvalidPageSize,

    #[error("Row source error: {0}")]
    Source(E),
}

// == Fetch All Rows ==
/// Reads every row of `source`, `page_size` rows at a time, stopping at the
/// first short page. Rows are returned in query order.
pub async fn fetch_all_rows<S>(
    source: &S,
    page_size: usize,
) -> Result<Vec<S::Row>, PaginationError<S::Error>>
where
    S: RowSource + ?Sized,
{
    if page_size == 0 {
        return Err(PaginationError::InvalidPageSize);
    }

    let mut rows = Vec::new();
    let mut from = 0;
    let mut pages = 0;

    loop {
        let to = from + page_size - 1;
        let page = source
            .fetch_range(from, to)
            .await
            .map_err(PaginationError::Source)?;
        pages += 1;

        let len = page.len();
        rows.extend(page);
        if len < page_size {
            break;
        }
        from += page_size;
    }

    debug!("Fetched {} rows in {} pages", rows.len(), pages);
    Ok(rows)
}

// == Accurate Count ==
/// Returns the number of rows in `source`.
///
/// Uses the source's exact count when it has one, and otherwise (or when the
/// count query fails) reads every row and counts them.
pub async fn accurate_count<S>(source: &S) -> Result<u64, PaginationError<S::Error>>
where
    S: RowSource + ?Sized,
{
    match source.exact_count().await {
        Ok(Some(count)) => return Ok(count),
        Ok(None) => debug!("Exact count unavailable, counting rows"),
        Err(err) => debug!("Exact count failed, counting rows: {}", err),
    }

    let rows = fetch_all_rows(source, DEFAULT_PAGE_SIZE).await?;
    Ok(rows.len() as u64)
}
