//! In-memory page sources for tests.

use super::{Cursor, FetchFailure, PageBatch, PageSource};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Replays queued outcomes and records every cursor it was asked for
pub(crate) struct ScriptedSource<R> {
    outcomes: Mutex<VecDeque<Result<PageBatch<R>, FetchFailure>>>,
    calls: Mutex<Vec<Option<Cursor>>>,
}

impl<R> ScriptedSource<R> {
    pub(crate) fn new() -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn push_page(&self, records: Vec<R>, next_cursor: Option<&str>, count: usize) {
        self.outcomes.lock().unwrap().push_back(Ok(PageBatch::new(
            records,
            next_cursor.map(Cursor::from),
            count,
        )));
    }

    pub(crate) fn push_failure(&self, reason: &str) {
        self.outcomes
            .lock()
            .unwrap()
            .push_back(Err(FetchFailure::new(reason)));
    }

    pub(crate) fn calls(&self) -> Vec<Option<Cursor>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl<R: Send> PageSource<R> for ScriptedSource<R> {
    async fn fetch_page(&self, cursor: Option<&Cursor>) -> Result<PageBatch<R>, FetchFailure> {
        self.calls.lock().unwrap().push(cursor.cloned());
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(FetchFailure::new("no scripted outcome")))
    }
}
