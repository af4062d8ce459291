//! Remote character source
//!
//! The paged list endpoint is modelled as a trait so the sync layer can be
//! driven by the real HTTP client or by an in-memory source in tests.

mod http;

pub use http::{check_base_url, parse_page, HttpCharacterSource};

use async_trait::async_trait;

use crate::error::MortyResult;
use crate::models::CharacterPage;

/// A paged list of characters, numbered from 1
///
/// An empty page signals end-of-data. Errors carry no retry-after semantics.
#[async_trait]
pub trait CharacterSource: Send + Sync {
    async fn fetch_page(&self, page: u32) -> MortyResult<CharacterPage>;
}

#[cfg(test)]
pub(crate) mod fake {
    use std::collections::HashSet;
    use std::sync::Mutex;

    use super::*;
    use crate::error::MortyError;
    use crate::models::{Character, CharacterStatus};

    /// In-memory source serving `page_size` characters per page with
    /// sequential ids, up to `total` characters
    pub struct FakeSource {
        page_size: u32,
        total: u32,
        failing: Mutex<HashSet<u32>>,
        requests: Mutex<Vec<u32>>,
    }

    impl FakeSource {
        pub fn new(page_size: u32, total: u32) -> Self {
            Self {
                page_size,
                total,
                failing: Mutex::new(HashSet::new()),
                requests: Mutex::new(Vec::new()),
            }
        }

        /// Make every request for `page` fail until `heal` is called
        pub fn fail_on(&self, page: u32) {
            self.failing.lock().unwrap().insert(page);
        }

        pub fn heal(&self, page: u32) {
            self.failing.lock().unwrap().remove(&page);
        }

        /// Pages requested so far, in order
        pub fn requests(&self) -> Vec<u32> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CharacterSource for FakeSource {
        async fn fetch_page(&self, page: u32) -> MortyResult<CharacterPage> {
            self.requests.lock().unwrap().push(page);

            if self.failing.lock().unwrap().contains(&page) {
                return Err(MortyError::Network("connection reset".into()));
            }
            if page == 0 {
                return Ok(CharacterPage::empty());
            }

            let start = (page - 1) * self.page_size + 1;
            let end = (page * self.page_size).min(self.total);
            let results = (start..=end)
                .map(|id| {
                    Character::new(
                        id,
                        format!("Character {}", id),
                        CharacterStatus::Alive,
                        "Human",
                        format!("https://example.test/avatar/{}.jpeg", id),
                    )
                })
                .collect();

            Ok(CharacterPage {
                results,
                ..CharacterPage::default()
            })
        }
    }
}
