//! Character model
//!
//! A character as returned by the remote API, and the persisted form that
//! also remembers which page it was fetched under.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Life status of a character
///
/// The API sends `"Alive"`, `"Dead"` or `"unknown"`; anything unrecognised
/// is treated as unknown rather than failing the whole page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum CharacterStatus {
    Alive,
    Dead,
    #[default]
    Unknown,
}

impl CharacterStatus {
    /// Parse a status string (case-insensitive)
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "alive" => Self::Alive,
            "dead" => Self::Dead,
            _ => Self::Unknown,
        }
    }

    /// The wire/storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alive => "Alive",
            Self::Dead => "Dead",
            Self::Unknown => "unknown",
        }
    }
}

impl From<String> for CharacterStatus {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<CharacterStatus> for String {
    fn from(status: CharacterStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for CharacterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A character from the remote list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    /// Source-assigned unique identifier
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub status: CharacterStatus,
    #[serde(default)]
    pub species: String,
    #[serde(default)]
    pub gender: String,
    /// Avatar image URL
    #[serde(default)]
    pub image: String,
}

impl Character {
    /// Create a character with the fields every list row shows
    pub fn new(
        id: u32,
        name: impl Into<String>,
        status: CharacterStatus,
        species: impl Into<String>,
        image: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            status,
            species: species.into(),
            gender: String::new(),
            image: image.into(),
        }
    }

    /// Tag this character with the page it was fetched under
    pub fn on_page(self, page: u32) -> PersistedCharacter {
        PersistedCharacter {
            character: self,
            page,
        }
    }
}

impl fmt::Display for Character {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {} ({}, {})", self.id, self.name, self.species, self.status)
    }
}

/// A character row in the local store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedCharacter {
    pub character: Character,
    /// Page number (1-based) the character was fetched under
    pub page: u32,
}

/// Paging metadata sent alongside each page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub pages: u32,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub prev: Option<String>,
}

/// One page of the remote character list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterPage {
    #[serde(default)]
    pub info: PageInfo,
    #[serde(default)]
    pub results: Vec<Character>,
}

impl CharacterPage {
    /// The empty page that signals end-of-data
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!(CharacterStatus::parse("Alive"), CharacterStatus::Alive);
        assert_eq!(CharacterStatus::parse("DEAD"), CharacterStatus::Dead);
        assert_eq!(CharacterStatus::parse("unknown"), CharacterStatus::Unknown);
        assert_eq!(CharacterStatus::parse("schrodinger"), CharacterStatus::Unknown);
    }

    #[test]
    fn test_deserialize_api_page() {
        let body = r#"{
            "info": {"count": 826, "pages": 42, "next": "https://rickandmortyapi.com/api/character?page=2", "prev": null},
            "results": [
                {"id": 1, "name": "Rick Sanchez", "status": "Alive", "species": "Human",
                 "type": "", "gender": "Male", "origin": {"name": "Earth (C-137)", "url": ""},
                 "image": "https://rickandmortyapi.com/api/character/avatar/1.jpeg"},
                {"id": 8, "name": "Adjudicator Rick", "status": "Dead", "species": "Human",
                 "gender": "Male", "image": "https://rickandmortyapi.com/api/character/avatar/8.jpeg"}
            ]
        }"#;

        let page: CharacterPage = serde_json::from_str(body).unwrap();
        assert_eq!(page.info.pages, 42);
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[0].name, "Rick Sanchez");
        assert_eq!(page.results[0].gender, "Male");
        assert_eq!(page.results[1].status, CharacterStatus::Dead);
    }

    #[test]
    fn test_status_serializes_as_wire_string() {
        let json = serde_json::to_string(&CharacterStatus::Unknown).unwrap();
        assert_eq!(json, "\"unknown\"");
    }

    #[test]
    fn test_on_page() {
        let rick = Character::new(1, "Rick Sanchez", CharacterStatus::Alive, "Human", "");
        let row = rick.clone().on_page(3);
        assert_eq!(row.page, 3);
        assert_eq!(row.character, rick);
    }
}
