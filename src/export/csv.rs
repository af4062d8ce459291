//! CSV export
//!
//! One row per character, header row first.

use std::io::Write;

use crate::error::MortyResult;
use crate::models::Character;

use super::export_err;

pub fn export_characters_csv<W: Write>(characters: &[Character], writer: &mut W) -> MortyResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(["id", "name", "status", "species", "gender", "image"])
        .map_err(export_err)?;

    for character in characters {
        let id = character.id.to_string();
        csv_writer
            .write_record([
                id.as_str(),
                character.name.as_str(),
                character.status.as_str(),
                character.species.as_str(),
                character.gender.as_str(),
                character.image.as_str(),
            ])
            .map_err(export_err)?;
    }

    csv_writer.flush().map_err(export_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CharacterStatus;

    #[test]
    fn test_csv_rows_and_quoting() {
        let characters = vec![
            Character::new(1, "Rick Sanchez", CharacterStatus::Alive, "Human", "img/1.jpeg"),
            Character::new(2, "Mr. Poopybutthole, Jr.", CharacterStatus::Alive, "Alien", ""),
        ];

        let mut out = Vec::new();
        export_characters_csv(&characters, &mut out).unwrap();

        let mut reader = csv::Reader::from_reader(out.as_slice());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[1], "name");

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[1][1], "Mr. Poopybutthole, Jr.");
        assert_eq!(&rows[1][3], "Alien");
    }
}
