//! Page-by-page sync of the remote character list into the local store
//!
//! The next page to fetch is always derived from the store (highest
//! persisted page + 1), so a failed fetch leaves it where it was and the
//! next call retries the same page. Store access runs on the blocking pool.

use std::sync::Arc;

use tokio::sync::watch;

use crate::error::{MortyError, MortyResult};
use crate::models::{Character, PersistedCharacter};
use crate::remote::CharacterSource;
use crate::storage::CharacterRepository;

/// Result of a cold or warm start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitialLoad {
    /// The store already had rows; nothing was fetched
    Cached(usize),
    /// The store was empty and page 1 was fetched
    Fetched(usize),
    /// Another load was already in flight; nothing was read or fetched
    Busy,
}

/// Coordinates the remote source with the local character store
#[derive(Clone)]
pub struct CharacterSync {
    source: Arc<dyn CharacterSource>,
    repo: Arc<CharacterRepository>,
}

impl CharacterSync {
    pub fn new(source: Arc<dyn CharacterSource>, repo: Arc<CharacterRepository>) -> Self {
        Self { source, repo }
    }

    /// Run a store operation off the async workers
    async fn with_repo<T, F>(&self, op: F) -> MortyResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&CharacterRepository) -> MortyResult<T> + Send + 'static,
    {
        let repo = Arc::clone(&self.repo);
        tokio::task::spawn_blocking(move || op(&repo))
            .await
            .map_err(|e| MortyError::Storage(format!("Store task failed: {}", e)))?
    }

    /// True iff no characters are persisted
    pub async fn is_empty(&self) -> MortyResult<bool> {
        self.with_repo(|repo| repo.count().map(|n| n == 0)).await
    }

    /// The next page to fetch: highest persisted page + 1, or 1 when empty
    pub async fn cursor(&self) -> MortyResult<u32> {
        self.with_repo(|repo| repo.max_page().map(|max| max.unwrap_or(0) + 1))
            .await
    }

    /// Fetch `page` and insert-or-replace its characters tagged with `page`
    ///
    /// Nothing is persisted when the fetch fails or the page is empty.
    pub async fn fetch_and_persist(&self, page: u32) -> MortyResult<Vec<Character>> {
        let fetched = match self.source.fetch_page(page).await {
            Ok(fetched) => fetched,
            Err(e) => {
                tracing::warn!(page, error = %e, "failed to fetch character page");
                return Err(e);
            }
        };

        let characters = fetched.results;
        if characters.is_empty() {
            tracing::info!(page, "empty character page, nothing to persist");
            return Ok(characters);
        }

        let rows: Vec<PersistedCharacter> = characters
            .iter()
            .cloned()
            .map(|c| c.on_page(page))
            .collect();

        if let Err(e) = self.with_repo(move |repo| repo.insert_all(&rows)).await {
            tracing::error!(page, error = %e, "failed to persist character page");
            return Err(e);
        }

        tracing::info!(page, count = characters.len(), "persisted character page");
        Ok(characters)
    }

    /// Fetch and persist the page at the cursor; returns the page fetched
    ///
    /// Callers must not overlap calls: two concurrent calls compute the same
    /// cursor and fetch the same page twice (harmless, since persistence
    /// replaces by id, but wasteful). [`Feed`](super::Feed) gates this.
    pub async fn load_next_page(&self) -> MortyResult<u32> {
        let page = self.cursor().await?;
        self.fetch_and_persist(page).await?;
        Ok(page)
    }

    /// Drop every cached page and fetch page 1 again
    ///
    /// There is no rollback: if the fetch fails the store stays empty.
    pub async fn refresh(&self) -> MortyResult<()> {
        let removed = self.clear().await?;
        tracing::info!(removed, "cleared character cache for refresh");
        self.fetch_and_persist(1).await.map(|_| ())
    }

    /// Fetch page 1 on an empty store, otherwise serve what is cached
    pub async fn load_initial(&self) -> MortyResult<InitialLoad> {
        if self.is_empty().await? {
            let fetched = self.fetch_and_persist(1).await?;
            Ok(InitialLoad::Fetched(fetched.len()))
        } else {
            let count = self.with_repo(|repo| repo.count()).await?;
            tracing::debug!(count, "serving characters from cache");
            Ok(InitialLoad::Cached(count))
        }
    }

    /// One-shot snapshot ordered by id
    pub async fn cached(&self) -> MortyResult<Vec<Character>> {
        self.with_repo(|repo| repo.get_all()).await
    }

    pub async fn get(&self, id: u32) -> MortyResult<Option<PersistedCharacter>> {
        self.with_repo(move |repo| repo.get(id)).await
    }

    /// Overwrite a stored character; returns false if the id is not stored
    pub async fn update(&self, character: Character, page: u32) -> MortyResult<bool> {
        self.with_repo(move |repo| repo.update(&character.on_page(page)))
            .await
    }

    pub async fn delete(&self, id: u32) -> MortyResult<bool> {
        self.with_repo(move |repo| repo.delete(id)).await
    }

    pub async fn delete_page(&self, page: u32) -> MortyResult<usize> {
        self.with_repo(move |repo| repo.delete_page(page)).await
    }

    /// Remove every cached character; returns the number removed
    pub async fn clear(&self) -> MortyResult<usize> {
        self.with_repo(|repo| repo.clear()).await
    }

    /// Subscribe to full snapshots of the store
    pub fn live_view(&self) -> LiveView {
        LiveView::new(self.repo.subscribe())
    }
}

/// A subscription to full, id-ordered snapshots of the character store
///
/// Each emission is the authoritative full state; intermediate snapshots may
/// be coalesced. The view is its own cancellation handle: dropping it ends
/// the subscription. Call [`CharacterSync::live_view`] again to restart.
pub struct LiveView {
    rx: watch::Receiver<Vec<Character>>,
    started: bool,
}

impl LiveView {
    fn new(rx: watch::Receiver<Vec<Character>>) -> Self {
        Self { rx, started: false }
    }

    /// The most recent snapshot, without waiting
    pub fn latest(&self) -> Vec<Character> {
        self.rx.borrow().clone()
    }

    /// Wait for the next snapshot
    ///
    /// The first call yields the current snapshot immediately. Returns
    /// `None` once the store has been dropped.
    pub async fn next(&mut self) -> Option<Vec<Character>> {
        if !self.started {
            self.started = true;
            return Some(self.rx.borrow_and_update().clone());
        }

        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}
