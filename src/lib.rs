//! morty-cache - offline-first cache of the Rick and Morty character list
//!
//! This library pages through the remote character API, persists every page
//! in a local SQLite store, and publishes the merged store as a live stream
//! of snapshots. It also manages a user-visible data file with a private
//! backup copy that can be restored once.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Paths and user settings
//! - `error`: Custom error types
//! - `models`: Character data models
//! - `remote`: The character API client
//! - `storage`: SQLite character store and JSON file helpers
//! - `sync`: Paginated sync and the consumer paging feed
//! - `backup`: Public data file and its private backup copy
//! - `export`: Rendering character snapshots to file content
//! - `activity`: User-facing activity log
//! - `display`: Terminal formatting
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use morty::config::{paths::MortyPaths, settings::Settings};
//! use morty::remote::HttpCharacterSource;
//! use morty::storage::open_repository;
//! use morty::sync::CharacterSync;
//!
//! let paths = MortyPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let source = HttpCharacterSource::new(&settings.api_base_url, settings.request_timeout())?;
//! let sync = CharacterSync::new(Arc::new(source), Arc::new(open_repository(&paths)?));
//!
//! sync.load_initial().await?;
//! ```

pub mod activity;
pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod remote;
pub mod storage;
pub mod sync;

pub use error::{MortyError, MortyResult};
