//! Character display formatting
//!
//! Formats characters for terminal output in table and detail views.

use crate::models::Character;
use crate::sync::ListRow;

/// Text shown in place of the loading footer row
const LOADING_FOOTER: &str = "  ... loading more ...";

/// Format a snapshot of characters as a table
pub fn format_character_list(characters: &[Character]) -> String {
    if characters.is_empty() {
        return "No characters cached.".to_string();
    }

    let name_width = characters
        .iter()
        .map(|c| c.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let species_width = characters
        .iter()
        .map(|c| c.species.chars().count())
        .max()
        .unwrap_or(7)
        .max(7);

    let mut output = String::new();
    output.push_str(&format!(
        "{:>5}  {:<name_width$}  {:<species_width$}  {}\n",
        "ID",
        "Name",
        "Species",
        "Status",
        name_width = name_width,
        species_width = species_width,
    ));

    output.push_str(&format!(
        "{:->5}  {:-<name_width$}  {:-<species_width$}  {:-<7}\n",
        "",
        "",
        "",
        "",
        name_width = name_width,
        species_width = species_width,
    ));

    for character in characters {
        output.push_str(&format!(
            "{:>5}  {:<name_width$}  {:<species_width$}  {}\n",
            character.id,
            character.name,
            character.species,
            character.status,
            name_width = name_width,
            species_width = species_width,
        ));
    }

    output.push_str(&format!("\n{} character(s)", characters.len()));
    output
}

/// Format a single character with every field
pub fn format_character_details(character: &Character) -> String {
    let mut output = String::new();

    output.push_str(&format!("Character #{}\n", character.id));
    output.push_str(&format!("  Name:    {}\n", character.name));
    output.push_str(&format!("  Status:  {}\n", character.status));
    output.push_str(&format!("  Species: {}\n", character.species));
    if !character.gender.is_empty() {
        output.push_str(&format!("  Gender:  {}\n", character.gender));
    }
    output.push_str(&format!("  Image:   {}", character.image));

    output
}

/// Render one row of the scrolling list
pub fn render_row(row: &ListRow) -> String {
    match row {
        ListRow::Item(character) => format!(
            "{:>5}  {} - {} ({})",
            character.id, character.name, character.species, character.status
        ),
        ListRow::LoadingFooter => LOADING_FOOTER.to_string(),
    }
}

/// Render every row, one per line
pub fn render_rows(rows: &[ListRow]) -> String {
    rows.iter().map(render_row).collect::<Vec<_>>().join("\n")
}
