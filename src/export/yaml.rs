//! YAML export

use std::io::Write;

use chrono::{DateTime, Utc};

use crate::error::MortyResult;
use crate::export::json::CharacterExport;
use crate::models::Character;

use super::export_err;

pub fn export_characters_yaml<W: Write>(
    characters: &[Character],
    exported_at: DateTime<Utc>,
    writer: &mut W,
) -> MortyResult<()> {
    let export = CharacterExport::new(characters, exported_at);

    writeln!(writer, "# Rick and Morty characters export").map_err(export_err)?;
    writeln!(writer, "# Generated: {}", export.exported_at).map_err(export_err)?;
    writeln!(writer).map_err(export_err)?;

    serde_yaml::to_writer(writer, &export).map_err(export_err)?;

    Ok(())
}
