//! Fetch boundary between the pagination core and the network.

use super::cache::Cursor;
use async_trait::async_trait;
use thiserror::Error;

/// One batch of records as returned by the server
#[derive(Debug, Clone, PartialEq)]
pub struct PageBatch<R> {
    pub records: Vec<R>,
    pub next_cursor: Option<Cursor>,
    pub reported_count: usize,
}

impl<R> PageBatch<R> {
    pub fn new(records: Vec<R>, next_cursor: Option<Cursor>, reported_count: usize) -> Self {
        Self {
            records,
            next_cursor,
            reported_count,
        }
    }
}

/// A page could not be loaded.
///
/// Transport errors, non-2xx responses and malformed payloads all collapse
/// into this one type; the controller never inspects the reason.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("page failed to load: {reason}")]
pub struct FetchFailure {
    reason: String,
}

impl FetchFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Source of cursor-paginated records
#[async_trait]
pub trait PageSource<R>: Send + Sync {
    /// Fetch the batch following `cursor`, or the first batch when `None`
    async fn fetch_page(&self, cursor: Option<&Cursor>) -> Result<PageBatch<R>, FetchFailure>;
}
