//! Export module for morty-cache
//!
//! Renders a snapshot of cached characters into the content of the
//! user-visible data file:
//! - Text: human-readable listing, one block per character
//! - JSON: machine-readable export with schema versioning
//! - CSV: one row per character (spreadsheet-compatible)
//! - YAML: human-readable structured export

pub mod csv;
pub mod json;
pub mod text;
pub mod yaml;

use std::fmt;

use chrono::{DateTime, Utc};

use crate::error::{MortyError, MortyResult};
use crate::models::Character;

pub use self::csv::export_characters_csv;
pub use json::{export_characters_json, CharacterExport, EXPORT_SCHEMA_VERSION};
pub use text::export_characters_text;
pub use yaml::export_characters_yaml;

/// Output format of the data file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Text,
    Json,
    Csv,
    Yaml,
}

impl ExportFormat {
    pub fn parse(s: &str) -> MortyResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(MortyError::Validation(format!(
                "Unknown export format '{}'. Use text, json, csv or yaml",
                other
            ))),
        }
    }

    /// Render `characters` in this format, stamped with `created_at`
    pub fn render(
        &self,
        characters: &[Character],
        created_at: DateTime<Utc>,
    ) -> MortyResult<Vec<u8>> {
        let mut buffer = Vec::new();
        match self {
            Self::Text => export_characters_text(characters, created_at, &mut buffer)?,
            Self::Json => export_characters_json(characters, created_at, &mut buffer)?,
            Self::Csv => export_characters_csv(characters, &mut buffer)?,
            Self::Yaml => export_characters_yaml(characters, created_at, &mut buffer)?,
        }
        Ok(buffer)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Yaml => "yaml",
        };
        write!(f, "{}", name)
    }
}

fn export_err(e: impl fmt::Display) -> MortyError {
    MortyError::Export(e.to_string())
}
