//! Offset-style page controls over a cursor-paginated source.
//!
//! The controller never performs I/O itself. Navigation methods either move
//! the window over resident records ([`Navigation::Local`]) or hand back a
//! [`PageRequest`] that the caller executes against a
//! [`PageSource`](super::PageSource) and reports through
//! [`PaginationController::complete`]. This keeps the UI loop free to render
//! placeholder rows while a fetch is in flight.

use super::cache::{Cursor, RecordCache};
use super::estimator::estimate_count;
use super::source::{FetchFailure, PageBatch};
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, warn};

/// Page size used when none is configured
pub const DEFAULT_PAGE_LIMIT: usize = 10;

/// A fetch the caller must perform on behalf of the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    generation: u64,
    cursor: Option<Cursor>,
    offset: usize,
}

impl PageRequest {
    /// Cache generation the request was issued against
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Cursor to replay, `None` for the first batch
    pub fn cursor(&self) -> Option<&Cursor> {
        self.cursor.as_ref()
    }

    /// Window offset that becomes visible once the fetch succeeds
    pub fn offset(&self) -> usize {
        self.offset
    }
}

/// Outcome of a navigation call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Served from resident records, no network involved
    Local,
    /// The caller must run this fetch and report back
    Fetch(PageRequest),
    /// Rejected because a fetch is already in flight
    Busy,
    /// The server has no further records
    EndOfList,
}

impl Navigation {
    pub fn is_fetch(&self) -> bool {
        matches!(self, Navigation::Fetch(_))
    }
}

/// What happened when a fetch outcome was reported
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Records were appended and the window moved to `offset`
    Applied { offset: usize, received: usize },
    /// The fetch failed; `offset` was recorded as an error offset
    Failed { offset: usize },
    /// The outcome belonged to an older scope or no fetch was pending
    Discarded,
}

/// Immutable view of the controller handed to observers
#[derive(Debug, Clone, PartialEq)]
pub struct ListSnapshot<R> {
    pub window: Vec<R>,
    pub offset: usize,
    pub limit: usize,
    pub cached_len: usize,
    pub estimated_count: usize,
    pub is_loading: bool,
    pub error_offsets: BTreeSet<usize>,
    pub can_go_next: bool,
    pub can_go_previous: bool,
}

impl<R> ListSnapshot<R> {
    /// Whether the most recent fetch for the visible offset failed
    pub fn current_page_failed(&self) -> bool {
        self.error_offsets.contains(&self.offset)
    }

    /// 1-based inclusive bounds for an "X - Y of Z" label
    pub fn display_range(&self) -> (usize, usize) {
        let last = (self.offset + self.window.len()).min(self.estimated_count);
        (self.offset + 1, last)
    }
}

type Listener<R> = Box<dyn Fn(&ListSnapshot<R>) + Send + Sync>;

/// Pagination state machine over `{offset, limit, is_loading, error_offsets}`
pub struct PaginationController<R> {
    cache: RecordCache<R>,
    offset: usize,
    limit: usize,
    is_loading: bool,
    error_offsets: BTreeSet<usize>,
    generation: u64,
    listeners: Vec<Listener<R>>,
}

impl<R: Clone> PaginationController<R> {
    /// Create a controller with an empty cache
    pub fn new(limit: usize) -> Self {
        Self {
            cache: RecordCache::new(),
            offset: 0,
            limit: limit.max(1),
            is_loading: false,
            error_offsets: BTreeSet::new(),
            generation: 0,
            listeners: Vec::new(),
        }
    }

    /// Register an observer notified after every state change
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: Fn(&ListSnapshot<R>) + Send + Sync + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error_offsets(&self) -> &BTreeSet<usize> {
        &self.error_offsets
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn cache(&self) -> &RecordCache<R> {
        &self.cache
    }

    pub fn has_more(&self) -> bool {
        self.cache.has_more()
    }

    /// Records currently visible
    pub fn visible_window(&self) -> &[R] {
        self.cache.slice(self.offset, self.limit)
    }

    pub fn estimated_count(&self) -> usize {
        estimate_count(
            self.cache.reported_count(),
            self.cache.len(),
            self.cache.has_more(),
            self.limit,
        )
    }

    pub fn can_go_next(&self) -> bool {
        if self.is_loading || self.visible_window().is_empty() {
            return false;
        }
        let next = self.offset + self.limit;
        if self.cache.is_exhausted() {
            // Once the server confirmed the end the cache is authoritative.
            return next < self.cache.len();
        }
        next < self.estimated_count() || self.cache.has_more()
    }

    pub fn can_go_previous(&self) -> bool {
        self.offset > 0 && !self.is_loading
    }

    pub fn snapshot(&self) -> ListSnapshot<R> {
        ListSnapshot {
            window: self.visible_window().to_vec(),
            offset: self.offset,
            limit: self.limit,
            cached_len: self.cache.len(),
            estimated_count: self.estimated_count(),
            is_loading: self.is_loading,
            error_offsets: self.error_offsets.clone(),
            can_go_next: self.can_go_next(),
            can_go_previous: self.can_go_previous(),
        }
    }

    /// Load the first page of the current scope, or show it if resident
    pub fn load(&mut self) -> Navigation {
        self.go_to_offset(0)
    }

    /// Move the window to `offset`, fetching only if it is not resident
    pub fn go_to_offset(&mut self, offset: usize) -> Navigation {
        if self.is_loading {
            debug!(offset, "navigation rejected while a page is loading");
            return Navigation::Busy;
        }

        if self.is_resident(offset) {
            debug!(offset, limit = self.limit, "serving window from cache");
            self.offset = offset;
            self.notify();
            return Navigation::Local;
        }

        self.begin_fetch(offset)
    }

    /// Advance one page, fetching the next batch when the cache runs out
    pub fn go_to_next(&mut self) -> Navigation {
        if self.is_loading {
            debug!("next page rejected while a page is loading");
            return Navigation::Busy;
        }

        let next = self.offset + self.limit;
        if next < self.cache.len() {
            return self.go_to_offset(next);
        }

        if self.cache.is_empty() && self.cache.may_have_more() {
            // Nothing fetched for this scope yet: the first batch lands at the
            // current offset.
            return self.begin_fetch(self.offset);
        }

        if self.cache.has_more() {
            self.begin_fetch(next)
        } else {
            debug!(offset = self.offset, "already at the end of the list");
            Navigation::EndOfList
        }
    }

    /// Step back one page; earlier pages are always resident
    pub fn go_to_previous(&mut self) -> Navigation {
        self.go_to_offset(self.offset.saturating_sub(self.limit))
    }

    /// Change the page size, realigning the offset to the new boundary
    pub fn set_limit(&mut self, limit: usize) -> Navigation {
        if self.is_loading {
            debug!(limit, "page size change rejected while a page is loading");
            return Navigation::Busy;
        }

        let limit = limit.max(1);
        let aligned = (self.offset / limit) * limit;
        debug!(
            old_limit = self.limit,
            new_limit = limit,
            offset = aligned,
            "page size changed"
        );
        self.limit = limit;
        self.offset = aligned;

        if self.is_resident(aligned) {
            self.notify();
            Navigation::Local
        } else {
            self.begin_fetch(aligned)
        }
    }

    /// Report the outcome of a fetch issued through [`Navigation::Fetch`]
    pub fn complete(
        &mut self,
        request: PageRequest,
        outcome: Result<PageBatch<R>, FetchFailure>,
    ) -> Completion {
        if request.generation != self.generation {
            debug!(
                request_generation = request.generation,
                current_generation = self.generation,
                "discarding page from a previous scope"
            );
            return Completion::Discarded;
        }
        if !self.is_loading {
            debug!(offset = request.offset, "discarding page with no fetch pending");
            return Completion::Discarded;
        }

        self.is_loading = false;
        let completion = match outcome {
            Ok(batch) => {
                let received = batch.records.len();
                self.cache
                    .append(batch.records, batch.next_cursor, batch.reported_count);
                if self.cache.is_exhausted() && self.cache.reported_count() < self.cache.len() {
                    warn!(
                        reported = self.cache.reported_count(),
                        cached = self.cache.len(),
                        "server reported fewer records than it delivered"
                    );
                }
                self.error_offsets.remove(&request.offset);
                self.offset = request.offset;
                debug!(
                    offset = self.offset,
                    received,
                    cached = self.cache.len(),
                    has_more = self.cache.has_more(),
                    "page loaded"
                );
                Completion::Applied {
                    offset: request.offset,
                    received,
                }
            }
            Err(failure) => {
                warn!(offset = request.offset, error = %failure, "page fetch failed");
                self.error_offsets.insert(request.offset);
                Completion::Failed {
                    offset: request.offset,
                }
            }
        };

        self.notify();
        completion
    }

    /// Drop all cached records and invalidate in-flight fetches
    pub fn reset(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.cache.clear();
        self.offset = 0;
        self.is_loading = false;
        self.error_offsets.clear();
        debug!(generation = self.generation, "pagination scope reset");
        self.notify();
    }

    fn is_resident(&self, offset: usize) -> bool {
        offset.saturating_add(self.limit) <= self.cache.len() || !self.cache.may_have_more()
    }

    fn begin_fetch(&mut self, offset: usize) -> Navigation {
        let request = PageRequest {
            generation: self.generation,
            cursor: self.cache.cursor().cloned(),
            offset,
        };
        debug!(
            offset,
            cursor = request.cursor.as_ref().map(Cursor::as_str),
            "fetching page"
        );
        self.is_loading = true;
        self.notify();
        Navigation::Fetch(request)
    }

    fn notify(&self) {
        if self.listeners.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for listener in &self.listeners {
            listener(&snapshot);
        }
    }
}

impl<R: Clone> Default for PaginationController<R> {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_LIMIT)
    }
}

impl<R> fmt::Debug for PaginationController<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaginationController")
            .field("offset", &self.offset)
            .field("limit", &self.limit)
            .field("cached", &self.cache.len())
            .field("is_loading", &self.is_loading)
            .field("error_offsets", &self.error_offsets)
            .field("generation", &self.generation)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn batch(range: std::ops::Range<u32>, cursor: Option<&str>, count: usize) -> PageBatch<u32> {
        PageBatch::new(range.collect(), cursor.map(Cursor::from), count)
    }

    fn expect_fetch(navigation: Navigation) -> PageRequest {
        match navigation {
            Navigation::Fetch(request) => request,
            other => panic!("expected a fetch, got {:?}", other),
        }
    }

    /// Controller with `pages` full pages of 10 loaded and a live cursor
    fn loaded(pages: u32, count: usize) -> PaginationController<u32> {
        let mut controller = PaginationController::new(10);
        for page in 0..pages {
            let request = expect_fetch(controller.go_to_next());
            let cursor = format!("c{}", page + 1);
            controller.complete(
                request,
                Ok(batch(page * 10..page * 10 + 10, Some(&cursor), count)),
            );
        }
        controller
    }

    #[test]
    fn test_first_next_fetches_without_cursor() {
        let mut controller: PaginationController<u32> = PaginationController::new(10);
        let request = expect_fetch(controller.go_to_next());
        assert_eq!(request.cursor(), None);
        assert_eq!(request.offset(), 0);
        assert!(controller.is_loading());
    }

    #[test]
    fn test_next_replays_stored_cursor() {
        let mut controller = loaded(1, 25);
        let request = expect_fetch(controller.go_to_next());
        assert_eq!(request.cursor().map(Cursor::as_str), Some("c1"));
        assert_eq!(request.offset(), 10);
    }

    #[test]
    fn test_revisiting_resident_page_is_local() {
        let mut controller = loaded(2, 25);
        assert_eq!(controller.offset(), 10);

        assert_eq!(controller.go_to_offset(0), Navigation::Local);
        let first = controller.visible_window().to_vec();
        assert_eq!(controller.go_to_offset(0), Navigation::Local);
        assert_eq!(controller.visible_window(), first.as_slice());
        assert_eq!(first, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_partially_resident_window_fetches() {
        let mut controller = PaginationController::new(10);
        let request = expect_fetch(controller.load());
        controller.complete(request, Ok(batch(0..15, Some("c1"), 40)));

        let request = expect_fetch(controller.go_to_next());
        assert_eq!(request.offset(), 10);
        assert_eq!(request.cursor().map(Cursor::as_str), Some("c1"));
    }

    #[test]
    fn test_exhausted_cache_serves_short_window_locally() {
        let mut controller = PaginationController::new(10);
        let request = expect_fetch(controller.load());
        controller.complete(request, Ok(batch(0..15, None, 15)));

        assert_eq!(controller.go_to_next(), Navigation::Local);
        assert_eq!(controller.visible_window(), (10..15).collect::<Vec<_>>().as_slice());
        assert!(!controller.can_go_next());
        assert_eq!(controller.go_to_next(), Navigation::EndOfList);
    }

    #[test]
    fn test_previous_clamps_at_zero() {
        let mut controller = loaded(1, 25);
        assert_eq!(controller.go_to_previous(), Navigation::Local);
        assert_eq!(controller.offset(), 0);
        assert!(!controller.can_go_previous());
    }

    #[test]
    fn test_navigation_while_loading_is_rejected() {
        let mut controller = loaded(1, 25);
        controller.error_offsets.insert(30);
        let _pending = expect_fetch(controller.go_to_next());

        let errors_before = controller.error_offsets().clone();
        assert_eq!(controller.go_to_next(), Navigation::Busy);
        assert_eq!(controller.go_to_offset(0), Navigation::Busy);
        assert_eq!(controller.go_to_previous(), Navigation::Busy);
        assert_eq!(controller.set_limit(20), Navigation::Busy);
        assert_eq!(controller.offset(), 0);
        assert_eq!(controller.limit(), 10);
        assert_eq!(controller.error_offsets(), &errors_before);
        assert!(!controller.can_go_next());
        assert!(!controller.can_go_previous());
    }

    #[test]
    fn test_failure_records_offset_and_keeps_position() {
        let mut controller = loaded(1, 25);
        let request = expect_fetch(controller.go_to_next());
        let completion = controller.complete(request, Err(FetchFailure::new("502")));

        assert_eq!(completion, Completion::Failed { offset: 10 });
        assert!(controller.error_offsets().contains(&10));
        assert_eq!(controller.offset(), 0);
        assert!(!controller.is_loading());
    }

    #[test]
    fn test_successful_retry_clears_error_offset() {
        let mut controller = loaded(1, 25);
        let request = expect_fetch(controller.go_to_next());
        controller.complete(request, Err(FetchFailure::new("timeout")));

        let retry = expect_fetch(controller.go_to_next());
        assert_eq!(retry.cursor().map(Cursor::as_str), Some("c1"));
        controller.complete(retry, Ok(batch(10..20, Some("c2"), 25)));

        assert!(controller.error_offsets().is_empty());
        assert_eq!(controller.offset(), 10);
    }

    #[test]
    fn test_stale_count_keeps_next_enabled() {
        let mut controller = PaginationController::new(10);
        let request = expect_fetch(controller.load());
        controller.complete(request, Ok(batch(0..10, Some("c1"), 5)));

        assert_eq!(controller.estimated_count(), 20);
        assert!(controller.can_go_next());
    }

    #[test]
    fn test_terminal_cursor_disables_next() {
        let mut controller = loaded(1, 25);
        let request = expect_fetch(controller.go_to_next());
        controller.complete(request, Ok(batch(10..18, None, 25)));

        assert!(!controller.has_more());
        assert_eq!(controller.offset(), 10);
        assert!(!controller.can_go_next());
        assert_eq!(controller.go_to_next(), Navigation::EndOfList);
    }

    #[test]
    fn test_empty_page_is_end_of_data() {
        let mut controller = loaded(1, 10);
        let request = expect_fetch(controller.go_to_next());
        let completion = controller.complete(request, Ok(batch(0..0, Some("c2"), 10)));

        assert_eq!(completion, Completion::Applied { offset: 10, received: 0 });
        assert!(controller.visible_window().is_empty());
        assert!(controller.estimated_count() > controller.offset());
        assert!(!controller.can_go_next());
    }

    #[test]
    fn test_reset_discards_late_completion() {
        let mut controller = loaded(1, 25);
        let stale = expect_fetch(controller.go_to_next());
        controller.reset();

        let completion = controller.complete(stale, Ok(batch(10..20, Some("c2"), 25)));
        assert_eq!(completion, Completion::Discarded);
        assert!(controller.cache().is_empty());
        assert!(!controller.is_loading());

        let fresh = expect_fetch(controller.load());
        assert_eq!(fresh.cursor(), None);
        assert_eq!(fresh.generation(), 1);
    }

    #[test]
    fn test_late_completion_does_not_unblock_new_fetch() {
        let mut controller = loaded(1, 25);
        let stale = expect_fetch(controller.go_to_next());
        controller.reset();
        let _fresh = expect_fetch(controller.load());

        controller.complete(stale, Err(FetchFailure::new("late")));
        assert!(controller.is_loading());
        assert!(controller.error_offsets().is_empty());
    }

    #[test]
    fn test_duplicate_completion_is_ignored() {
        let mut controller = PaginationController::new(10);
        let request = expect_fetch(controller.load());
        controller.complete(request.clone(), Ok(batch(0..10, Some("c1"), 25)));
        let again = controller.complete(request, Ok(batch(0..10, Some("c1"), 25)));

        assert_eq!(again, Completion::Discarded);
        assert_eq!(controller.cache().len(), 10);
    }

    #[test]
    fn test_set_limit_realigns_offset() {
        let mut controller = loaded(3, 50);
        controller.go_to_offset(20);

        assert_eq!(controller.set_limit(15), Navigation::Local);
        assert_eq!(controller.offset(), 15);
        assert_eq!(controller.visible_window(), (15..30).collect::<Vec<_>>().as_slice());
    }

    #[test]
    fn test_set_limit_fetches_when_window_not_resident() {
        let mut controller = loaded(2, 50);
        let request = expect_fetch(controller.set_limit(30));
        assert_eq!(controller.offset(), 0);
        assert_eq!(request.offset(), 0);
        assert_eq!(request.cursor().map(Cursor::as_str), Some("c2"));

        let mut grown = loaded(2, 50);
        assert_eq!(grown.set_limit(20), Navigation::Local);
        assert_eq!(grown.offset(), 0);
        assert_eq!(grown.visible_window().len(), 20);
    }

    #[test]
    fn test_set_limit_failure_marks_aligned_offset() {
        let mut controller = loaded(3, 50);
        assert_eq!(controller.offset(), 20);

        let request = expect_fetch(controller.set_limit(40));
        assert_eq!(request.offset(), 0);
        let completion = controller.complete(request, Err(FetchFailure::new("timeout")));
        assert_eq!(completion, Completion::Failed { offset: 0 });
        assert!(!controller.is_loading());
        assert_eq!(controller.limit(), 40);
        assert_eq!(controller.offset(), 0);
        assert!(controller.error_offsets().contains(&0));
        assert_eq!(controller.cache().len(), 30);

        // The realigned page can be retried with the stored cursor
        let retry = expect_fetch(controller.go_to_offset(0));
        assert_eq!(retry.cursor().map(Cursor::as_str), Some("c3"));
    }

    #[test]
    fn test_cache_never_shrinks_across_navigation() {
        fn settle(controller: &mut PaginationController<u32>, navigation: Navigation) {
            if let Navigation::Fetch(request) = navigation {
                let start = controller.cache().len() as u32;
                controller.complete(request, Ok(batch(start..start + 10, Some("cx"), 40)));
            }
        }

        let mut controller = loaded(2, 40);
        let mut last = controller.cache().len();
        for step in 0..5 {
            let navigation = match step {
                0 => controller.go_to_previous(),
                1 | 2 => controller.go_to_next(),
                3 => controller.set_limit(25),
                _ => controller.go_to_offset(5),
            };
            settle(&mut controller, navigation);
            assert!(controller.cache().len() >= last);
            last = controller.cache().len();
        }
    }

    #[test]
    fn test_subscribers_receive_snapshots() {
        let seen: Arc<Mutex<Vec<(usize, bool)>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let mut controller: PaginationController<u32> = PaginationController::new(10);
        controller.subscribe(move |snapshot| {
            sink.lock().unwrap().push((snapshot.offset, snapshot.is_loading));
        });

        let request = expect_fetch(controller.load());
        controller.complete(request, Ok(batch(0..10, Some("c1"), 25)));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.as_slice(), &[(0, true), (0, false)]);
    }

    #[test]
    fn test_snapshot_display_range() {
        let controller = loaded(2, 25);
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.display_range(), (11, 20));
        assert!(!snapshot.current_page_failed());
        assert!(snapshot.can_go_next);
        assert!(snapshot.can_go_previous);
    }
}
