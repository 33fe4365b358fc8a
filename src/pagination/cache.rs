//! Append-only record cache backing the paginated user list.
//!
//! The cache is the single source of truth for everything the list view can
//! show without touching the network. It only grows; a scope change replaces
//! the whole cache through [`RecordCache::clear`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque continuation token issued by the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Cursor {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

/// What the cache knows about records beyond the ones it holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CursorState {
    /// Nothing fetched yet for the current scope
    Unfetched,
    /// The server handed back a token for the next batch
    Next(Cursor),
    /// The server signalled the end of the list
    Exhausted,
}

/// In-memory sequence of fetched records plus server pagination state
#[derive(Debug, Clone)]
pub struct RecordCache<R> {
    records: Vec<R>,
    cursor: CursorState,
    reported_count: usize,
}

impl<R> RecordCache<R> {
    /// Create an empty cache for a fresh query scope
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            cursor: CursorState::Unfetched,
            reported_count: 0,
        }
    }

    /// Extend the cache with a batch in received order.
    ///
    /// Cursor and reported count are overwritten with the latest values from
    /// the server; previously cached records are never touched.
    pub fn append(&mut self, batch: Vec<R>, cursor: Option<Cursor>, reported_count: usize) {
        self.records.extend(batch);
        self.cursor = match cursor {
            Some(cursor) => CursorState::Next(cursor),
            None => CursorState::Exhausted,
        };
        self.reported_count = reported_count;
    }

    /// Records in `[offset, offset + limit)`, clipped to what is resident
    pub fn slice(&self, offset: usize, limit: usize) -> &[R] {
        let start = offset.min(self.records.len());
        let end = offset.saturating_add(limit).min(self.records.len());
        &self.records[start..end]
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True iff the server handed back a continuation token
    pub fn has_more(&self) -> bool {
        matches!(self.cursor, CursorState::Next(_))
    }

    /// True unless the server has confirmed the end of the list.
    ///
    /// Differs from [`has_more`](Self::has_more) before the first fetch, when
    /// the cursor is not yet determined.
    pub fn may_have_more(&self) -> bool {
        !matches!(self.cursor, CursorState::Exhausted)
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self.cursor, CursorState::Exhausted)
    }

    /// The token to replay for the next batch, if any
    pub fn cursor(&self) -> Option<&Cursor> {
        match &self.cursor {
            CursorState::Next(cursor) => Some(cursor),
            _ => None,
        }
    }

    pub fn cursor_state(&self) -> &CursorState {
        &self.cursor
    }

    pub fn reported_count(&self) -> usize {
        self.reported_count
    }

    /// Drop everything and return to the unfetched state
    pub fn clear(&mut self) {
        self.records.clear();
        self.cursor = CursorState::Unfetched;
        self.reported_count = 0;
    }
}

impl<R> Default for RecordCache<R> {
    fn default() -> Self {
        Self::new()
    }
}
