//! Offset-style pagination over cursor-paginated sources.
//!
//! The server only understands "give me the batch after this token" while
//! the console shows "X - Y of Z" with previous/next controls. This module
//! bridges the two: [`RecordCache`] keeps everything fetched so far,
//! [`estimate_count`] keeps an approximate server total usable, and
//! [`PaginationController`] decides when a page can be served locally and
//! when a fetch is required.

mod cache;
mod controller;
mod estimator;
mod source;

pub use cache::*;
pub use controller::*;
pub use estimator::*;
pub use source::*;

#[cfg(test)]
pub(crate) mod testing;

/// Execute the fetch a navigation call asked for, if any.
///
/// Convenience for callers that can afford to await the fetch inline, such
/// as the non-interactive CLI. The TUI instead spawns the fetch and feeds the
/// result back through its event loop.
pub async fn drive<R, S>(
    controller: &mut PaginationController<R>,
    source: &S,
    navigation: Navigation,
) -> Option<Completion>
where
    R: Clone,
    S: PageSource<R> + ?Sized,
{
    match navigation {
        Navigation::Fetch(request) => {
            let outcome = source.fetch_page(request.cursor()).await;
            Some(controller.complete(request, outcome))
        }
        Navigation::Local | Navigation::Busy | Navigation::EndOfList => None,
    }
}
