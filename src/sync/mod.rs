//! Paginated sync of the remote character list
//!
//! - `CharacterSync`: fetches pages, persists them keyed by page, and
//!   exposes the merged store as a live stream of snapshots
//! - `Feed`: the paging state a scrolling consumer drives, one load at a time
//!
//! # Example
//!
//! ```rust,ignore
//! let sync = CharacterSync::new(Arc::new(source), Arc::new(repo));
//! let mut view = sync.live_view();
//!
//! sync.load_initial().await?;
//! sync.load_next_page().await?;
//!
//! while let Some(snapshot) = view.next().await {
//!     render(&snapshot);
//! }
//! ```

mod feed;
mod paging;

pub use feed::{Feed, ListRow, LoadOutcome};
pub use paging::{CharacterSync, InitialLoad, LiveView};
