//! JSON export
//!
//! Exports a character snapshot with schema versioning.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::MortyResult;
use crate::models::Character;

use super::export_err;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Structured export document shared by JSON and YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub total: usize,

    pub characters: Vec<Character>,
}

impl CharacterExport {
    pub fn new(characters: &[Character], exported_at: DateTime<Utc>) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at,
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            total: characters.len(),
            characters: characters.to_vec(),
        }
    }
}

pub fn export_characters_json<W: Write>(
    characters: &[Character],
    exported_at: DateTime<Utc>,
    writer: &mut W,
) -> MortyResult<()> {
    let export = CharacterExport::new(characters, exported_at);
    serde_json::to_writer_pretty(&mut *writer, &export).map_err(export_err)?;
    writeln!(writer).map_err(export_err)?;
    Ok(())
}
