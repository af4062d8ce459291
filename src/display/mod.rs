//! Display formatting for terminal output
//!
//! Formats characters, list rows and file metadata for the CLI.

pub mod character;
pub mod file;

pub use character::{format_character_details, format_character_list, render_row, render_rows};
pub use file::{format_duration, format_file_info, format_size};
