//! Plain text export
//!
//! The default data file layout: a header with the total and the creation
//! time, followed by one indented block per character.

use std::io::Write;

use chrono::{DateTime, Local, Utc};

use crate::error::MortyResult;
use crate::models::Character;

use super::export_err;

/// Width of the header rule
const RULE_WIDTH: usize = 40;

pub fn export_characters_text<W: Write>(
    characters: &[Character],
    created_at: DateTime<Utc>,
    writer: &mut W,
) -> MortyResult<()> {
    let created = created_at.with_timezone(&Local);

    writeln!(writer, "=== Rick and Morty Characters Data ===").map_err(export_err)?;
    writeln!(writer, "Total characters: {}", characters.len()).map_err(export_err)?;
    writeln!(writer, "Created: {}", created.format("%d.%m.%Y %H:%M:%S")).map_err(export_err)?;
    writeln!(writer, "{}", "=".repeat(RULE_WIDTH)).map_err(export_err)?;
    writeln!(writer).map_err(export_err)?;

    for (index, character) in characters.iter().enumerate() {
        writeln!(writer, "Character {}:", index + 1).map_err(export_err)?;
        writeln!(writer, "  Name: {}", character.name).map_err(export_err)?;
        writeln!(writer, "  Status: {}", character.status).map_err(export_err)?;
        writeln!(writer, "  Species: {}", character.species).map_err(export_err)?;
        writeln!(writer, "  Image: {}", character.image).map_err(export_err)?;
        writeln!(writer).map_err(export_err)?;
    }

    Ok(())
}
