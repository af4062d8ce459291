//! Activity log for morty-cache
//!
//! Records user-triggered actions (page fetches, refreshes, file operations,
//! settings changes) with their outcome in an append-only JSONL file, so the
//! recent history can be shown back to the user.
//!
//! Diagnostic logging goes through `tracing`; this log is user-facing.

mod entry;
mod logger;

pub use entry::{Action, ActivityEntry, Outcome};
pub use logger::ActivityLogger;
