//! Consumer-side paging state for an endless list
//!
//! A [`Feed`] owns the "is a page loading" and "is there another page" flags
//! a scrolling list needs. It lets one page load through at a time and stops
//! asking once the source returns an empty page.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use super::paging::{CharacterSync, InitialLoad};
use crate::error::MortyResult;
use crate::models::Character;

/// One row of a rendered list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListRow {
    Item(Character),
    /// Placeholder shown at the bottom while a later page loads
    LoadingFooter,
}

/// What a call to [`Feed::load_more`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A page was fetched and persisted
    Loaded { page: u32, count: usize },
    /// The source returned an empty page; no further pages will be requested
    EndOfData,
    /// Another load is already in flight
    Busy,
    /// End-of-data was reached earlier
    Exhausted,
}

#[derive(Default)]
struct FeedState {
    loading: AtomicBool,
    /// Page currently loading, 0 when idle
    loading_page: AtomicU32,
    exhausted: AtomicBool,
}

/// Clears the loading flag however the load ends, including cancellation
struct LoadingGuard<'a>(&'a FeedState);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.loading_page.store(0, Ordering::Release);
        self.0.loading.store(false, Ordering::Release);
    }
}

/// Single-flight paging over a [`CharacterSync`]
#[derive(Clone)]
pub struct Feed {
    sync: CharacterSync,
    state: Arc<FeedState>,
}

impl Feed {
    pub fn new(sync: CharacterSync) -> Self {
        Self {
            sync,
            state: Arc::new(FeedState::default()),
        }
    }

    pub fn sync(&self) -> &CharacterSync {
        &self.sync
    }

    pub fn is_loading(&self) -> bool {
        self.state.loading.load(Ordering::Acquire)
    }

    pub fn has_next_page(&self) -> bool {
        !self.state.exhausted.load(Ordering::Acquire)
    }

    /// Cold or warm start
    ///
    /// Returns [`InitialLoad::Busy`] without touching the store when another
    /// load is in flight.
    pub async fn start(&self) -> MortyResult<InitialLoad> {
        let Some(_guard) = self.begin(1) else {
            tracing::debug!("start skipped, a page load is in flight");
            return Ok(InitialLoad::Busy);
        };
        let initial = self.sync.load_initial().await?;
        if initial == InitialLoad::Fetched(0) {
            self.state.exhausted.store(true, Ordering::Release);
        }
        Ok(initial)
    }

    /// Load the page after the last persisted one
    ///
    /// Errors leave the feed retryable: the same page is requested again on
    /// the next call.
    pub async fn load_more(&self) -> MortyResult<LoadOutcome> {
        if !self.has_next_page() {
            return Ok(LoadOutcome::Exhausted);
        }

        let Some(_guard) = self.begin(0) else {
            tracing::debug!("page load already in flight");
            return Ok(LoadOutcome::Busy);
        };

        let page = self.sync.cursor().await?;
        self.state.loading_page.store(page, Ordering::Release);

        let fetched = self.sync.fetch_and_persist(page).await?;
        if fetched.is_empty() {
            tracing::info!(page, "reached end of character list");
            self.state.exhausted.store(true, Ordering::Release);
            return Ok(LoadOutcome::EndOfData);
        }

        Ok(LoadOutcome::Loaded {
            page,
            count: fetched.len(),
        })
    }

    /// Refresh from page 1 and allow paging again
    pub async fn refresh(&self) -> MortyResult<()> {
        self.state.exhausted.store(false, Ordering::Release);
        self.sync.refresh().await
    }

    /// Rows to display for `snapshot`, with a footer while a later page loads
    pub fn rows(&self, snapshot: &[Character]) -> Vec<ListRow> {
        let mut rows: Vec<ListRow> = snapshot.iter().cloned().map(ListRow::Item).collect();
        if self.is_loading() && self.state.loading_page.load(Ordering::Acquire) > 1 {
            rows.push(ListRow::LoadingFooter);
        }
        rows
    }

    fn begin(&self, page: u32) -> Option<LoadingGuard<'_>> {
        self.state
            .loading
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        self.state.loading_page.store(page, Ordering::Release);
        Some(LoadingGuard(self.state.as_ref()))
    }
}
