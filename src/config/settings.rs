//! User settings for morty-cache
//!
//! The preference store: backup filename, notification flag, user email,
//! theme selection and font size, plus where to reach the character API.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::paths::MortyPaths;
use crate::error::{MortyError, MortyResult};
use crate::remote::check_base_url;

/// Smallest accepted font size
pub const MIN_FONT_SIZE: u8 = 8;
/// Largest accepted font size
pub const MAX_FONT_SIZE: u8 = 32;

/// Theme selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
    /// Follow the operating system preference
    System,
}

impl Theme {
    /// Parse a theme name (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            "system" => Some(Self::System),
            _ => None,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Theme::Dark => write!(f, "dark"),
            Theme::Light => write!(f, "light"),
            Theme::System => write!(f, "system"),
        }
    }
}

/// User settings for morty-cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Name of the public data file (and of its private backup copy)
    #[serde(default = "default_backup_filename")]
    pub backup_filename: String,

    /// Whether notifications are enabled
    #[serde(default = "default_true")]
    pub notifications_enabled: bool,

    /// User email, empty when unset
    #[serde(default)]
    pub user_email: String,

    /// Theme selection
    #[serde(default)]
    pub theme: Theme,

    /// Font size in points
    #[serde(default = "default_font_size")]
    pub font_size: u8,

    /// Base URL of the character API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Request timeout for the character API, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_schema_version() -> u32 {
    1
}

fn default_backup_filename() -> String {
    "backup_data.txt".to_string()
}

fn default_true() -> bool {
    true
}

fn default_font_size() -> u8 {
    14
}

fn default_api_base_url() -> String {
    "https://rickandmortyapi.com/api/".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            backup_filename: default_backup_filename(),
            notifications_enabled: true,
            user_email: String::new(),
            theme: Theme::default(),
            font_size: default_font_size(),
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Normalize a user-supplied backup filename
///
/// Trims whitespace and appends `.txt` when the name has no such extension.
/// Returns `None` for empty input or names containing path separators.
pub fn normalize_backup_filename(input: &str) -> Option<String> {
    let name = input.trim();
    if name.is_empty() || name.contains('/') || name.contains('\\') || name == "." || name == ".."
    {
        return None;
    }

    if name.ends_with(".txt") {
        Some(name.to_string())
    } else {
        Some(format!("{}.txt", name))
    }
}

impl Settings {
    /// Load settings from disk, or default settings if the file doesn't exist
    ///
    /// Nothing is written; the caller decides when to persist.
    pub fn load_or_create(paths: &MortyPaths) -> MortyResult<Self> {
        let path = paths.settings_file();
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path).map_err(|e| {
            MortyError::Config(format!(
                "Failed to read preference file {}: {}",
                path.display(),
                e
            ))
        })?;

        serde_json::from_str(&contents).map_err(|e| {
            MortyError::Config(format!(
                "Preference file {} is not valid: {}",
                path.display(),
                e
            ))
        })
    }

    /// Save settings to disk
    ///
    /// The preference file is replaced in one rename, so a crash leaves
    /// either the old or the new preferences.
    pub fn save(&self, paths: &MortyPaths) -> MortyResult<()> {
        paths.ensure_directories()?;
        self.write_preference_file(&paths.settings_file())
    }

    fn write_preference_file(&self, path: &Path) -> MortyResult<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| MortyError::Config(format!("Failed to encode preferences: {}", e)))?;

        // Same directory as the target, otherwise the rename is not atomic
        let staging = path.with_extension("json.tmp");
        let written = File::create(&staging).and_then(|mut file| {
            file.write_all(json.as_bytes())?;
            file.sync_all()
        });

        if let Err(e) = written.and_then(|()| fs::rename(&staging, path)) {
            let _ = fs::remove_file(&staging);
            return Err(MortyError::Config(format!(
                "Failed to save preference file {}: {}",
                path.display(),
                e
            )));
        }

        tracing::debug!(path = %path.display(), "preferences saved");
        Ok(())
    }

    /// Set the backup filename, normalizing it first
    pub fn set_backup_filename(&mut self, input: &str) -> MortyResult<()> {
        let name = normalize_backup_filename(input).ok_or_else(|| {
            MortyError::Validation(format!("Invalid backup filename: '{}'", input))
        })?;
        self.backup_filename = name;
        Ok(())
    }

    /// Set the font size, rejecting values outside the supported range
    pub fn set_font_size(&mut self, size: u8) -> MortyResult<()> {
        if !(MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(&size) {
            return Err(MortyError::Validation(format!(
                "Font size must be between {} and {}, got {}",
                MIN_FONT_SIZE, MAX_FONT_SIZE, size
            )));
        }
        self.font_size = size;
        Ok(())
    }

    /// Set the character API base URL, rejecting anything but http(s)
    pub fn set_api_base_url(&mut self, url: &str) -> MortyResult<()> {
        self.api_base_url = check_base_url(url)?.to_string();
        Ok(())
    }

    /// Request timeout for the character API
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Set the user email (trimmed)
    pub fn set_user_email(&mut self, email: &str) {
        self.user_email = email.trim().to_string();
    }
}
