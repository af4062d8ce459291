//! Settings CLI commands

use clap::Subcommand;

use crate::activity::{Action, ActivityEntry, ActivityLogger};
use crate::config::paths::MortyPaths;
use crate::config::settings::{Settings, Theme};
use crate::error::{MortyError, MortyResult};

/// Settings subcommands
#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Show current settings
    Show,

    /// Change one or more settings
    Set {
        /// Name of the data file (".txt" is appended when missing)
        #[arg(long)]
        backup_filename: Option<String>,

        /// Enable or disable notifications
        #[arg(long)]
        notifications: Option<bool>,

        /// User email (empty to clear)
        #[arg(long)]
        email: Option<String>,

        /// Theme: dark, light or system
        #[arg(long)]
        theme: Option<String>,

        /// Font size in points
        #[arg(long)]
        font_size: Option<u8>,

        /// Base URL of the character API
        #[arg(long)]
        api_base_url: Option<String>,

        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Restore default settings
    Reset,
}

/// Handle a settings command
pub fn handle_settings_command(
    paths: &MortyPaths,
    settings: &mut Settings,
    activity: &ActivityLogger,
    cmd: SettingsCommands,
) -> MortyResult<()> {
    match cmd {
        SettingsCommands::Show => print_settings(settings),

        SettingsCommands::Set {
            backup_filename,
            notifications,
            email,
            theme,
            font_size,
            api_base_url,
            timeout,
        } => {
            let mut updated = settings.clone();

            if let Some(name) = backup_filename {
                updated.set_backup_filename(&name)?;
            }
            if let Some(enabled) = notifications {
                updated.notifications_enabled = enabled;
            }
            if let Some(email) = email {
                updated.set_user_email(&email);
            }
            if let Some(theme) = theme {
                updated.theme = Theme::parse(&theme).ok_or_else(|| {
                    MortyError::Validation(format!(
                        "Unknown theme '{}'. Use dark, light or system",
                        theme
                    ))
                })?;
            }
            if let Some(size) = font_size {
                updated.set_font_size(size)?;
            }
            if let Some(url) = api_base_url {
                updated.set_api_base_url(&url)?;
            }
            if let Some(secs) = timeout {
                if secs == 0 {
                    return Err(MortyError::Validation(
                        "Timeout must be at least 1 second".into(),
                    ));
                }
                updated.request_timeout_secs = secs;
            }

            save(paths, activity, &updated)?;
            *settings = updated;
            println!("Settings saved.");
            print_settings(settings);
        }

        SettingsCommands::Reset => {
            let defaults = Settings::default();
            save(paths, activity, &defaults)?;
            *settings = defaults;
            println!("Settings reset to defaults.");
        }
    }

    Ok(())
}

fn save(paths: &MortyPaths, activity: &ActivityLogger, settings: &Settings) -> MortyResult<()> {
    let result = settings.save(paths);
    let entry = match &result {
        Ok(()) => ActivityEntry::success(Action::SaveSettings, "settings"),
        Err(e) => ActivityEntry::failure(Action::SaveSettings, "settings", e.to_string()),
    };
    activity.record(entry);
    result
}

fn print_settings(settings: &Settings) {
    let email = if settings.user_email.is_empty() {
        "(not set)"
    } else {
        settings.user_email.as_str()
    };

    println!("Backup filename: {}", settings.backup_filename);
    println!("Notifications:   {}", settings.notifications_enabled);
    println!("Email:           {}", email);
    println!("Theme:           {}", settings.theme);
    println!("Font size:       {}", settings.font_size);
    println!("API base URL:    {}", settings.api_base_url);
    println!("Timeout:         {}s", settings.request_timeout_secs);
}
