//! Configuration module for morty-cache
//!
//! This module provides configuration management including:
//! - Private and public path resolution
//! - User preference persistence

pub mod paths;
pub mod settings;

pub use paths::MortyPaths;
pub use settings::{Settings, Theme};
