//! Core data models for morty-cache

pub mod character;

pub use character::{Character, CharacterPage, CharacterStatus, PageInfo, PersistedCharacter};
