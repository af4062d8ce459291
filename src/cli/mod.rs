//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the sync and backup layers.

pub mod characters;
pub mod file;
pub mod log;
pub mod settings;

pub use characters::{handle_characters_command, CharacterCommands};
pub use file::{handle_file_command, FileArgs, FileCommands};
pub use log::handle_log_command;
pub use settings::{handle_settings_command, SettingsCommands};
