//! Storage layer for morty-cache
//!
//! The SQLite character repository and where it lives on disk.

pub mod characters;

pub use characters::CharacterRepository;

use crate::config::paths::MortyPaths;
use crate::error::MortyError;

/// Open the character repository at its default location
pub fn open_repository(paths: &MortyPaths) -> Result<CharacterRepository, MortyError> {
    paths.ensure_directories()?;
    CharacterRepository::open(&paths.database_file())
}
