//! Data file CLI commands
//!
//! Writes the cached characters to the public data file and moves that file
//! to and from its private backup copy.

use chrono::Utc;
use clap::{Args, Subcommand};

use crate::activity::{Action, ActivityEntry, ActivityLogger};
use crate::backup::{BackupManager, Location};
use crate::config::paths::MortyPaths;
use crate::config::settings::{normalize_backup_filename, Settings};
use crate::display::format_file_info;
use crate::error::{MortyError, MortyResult};
use crate::export::ExportFormat;
use crate::sync::CharacterSync;

/// Arguments shared by every file subcommand
#[derive(Args)]
pub struct FileArgs {
    /// File name to act on instead of the configured backup filename
    #[arg(short, long, global = true)]
    pub name: Option<String>,

    #[command(subcommand)]
    pub command: FileCommands,
}

/// File subcommands
#[derive(Subcommand)]
pub enum FileCommands {
    /// Write the cached characters to the public file
    Create {
        /// Output format (text, json, csv, yaml)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show the public and private copies of the file
    Info,

    /// Copy the public file to the private backup
    Backup,

    /// Back up the public file, then delete it
    Delete,

    /// Copy the private backup over the public file and drop the backup
    Restore,

    /// Delete the private backup
    DeleteCache,
}

/// Handle a file command
pub async fn handle_file_command(
    paths: &MortyPaths,
    settings: &Settings,
    sync: &CharacterSync,
    activity: &ActivityLogger,
    args: FileArgs,
) -> MortyResult<()> {
    let name = match args.name.as_deref() {
        Some(raw) => normalize_backup_filename(raw).ok_or_else(|| {
            MortyError::Validation(format!("Invalid file name '{}'", raw.trim()))
        })?,
        None => settings.backup_filename.clone(),
    };
    let manager = BackupManager::new(paths);

    match args.command {
        FileCommands::Create { format } => {
            let format = ExportFormat::parse(&format)?;
            let characters = sync.cached().await?;
            let content = format.render(&characters, Utc::now())?;

            let ok = run(&manager, &name, move |m, n| m.create(n, &content)).await?;
            finish(activity, Action::CreateFile, &name, ok, "write")?;
            println!(
                "Saved {} characters to {} ({})",
                characters.len(),
                manager.public_path(&name).display(),
                format
            );
        }

        FileCommands::Info => {
            let (public, private) = run(&manager, &name, |m, n| {
                (m.info(n, Location::Public), m.info(n, Location::Private))
            })
            .await?;
            println!("{}", format_file_info(Location::Public, &public));
            println!("{}", format_file_info(Location::Private, &private));
        }

        FileCommands::Backup => {
            let ok = run(&manager, &name, |m, n| m.backup(n)).await?;
            finish(activity, Action::Backup, &name, ok, "back up")?;
            println!("Backed up {} to {}", name, manager.private_path(&name).display());
        }

        FileCommands::Delete => {
            let ok = run(&manager, &name, |m, n| m.delete_with_backup(n)).await?;
            finish(activity, Action::DeleteWithBackup, &name, ok, "back up and delete")?;
            println!("Deleted {} (a backup copy was kept)", name);
        }

        FileCommands::Restore => {
            let ok = run(&manager, &name, |m, n| m.restore(n)).await?;
            finish(activity, Action::Restore, &name, ok, "restore")?;
            println!("Restored {} to {}", name, manager.public_path(&name).display());
        }

        FileCommands::DeleteCache => {
            let ok = run(&manager, &name, |m, n| m.delete_cache(n)).await?;
            finish(activity, Action::DeleteCache, &name, ok, "delete the backup of")?;
            println!("Deleted the backup copy of {}", name);
        }
    }

    Ok(())
}

/// Run a file operation on the blocking pool
async fn run<T, F>(manager: &BackupManager, name: &str, op: F) -> MortyResult<T>
where
    T: Send + 'static,
    F: FnOnce(&BackupManager, &str) -> T + Send + 'static,
{
    let manager = manager.clone();
    let name = name.to_string();
    tokio::task::spawn_blocking(move || op(&manager, &name))
        .await
        .map_err(|e| MortyError::Io(format!("File task failed: {}", e)))
}

/// Record the outcome and turn a failed operation into an error
fn finish(
    activity: &ActivityLogger,
    action: Action,
    name: &str,
    ok: bool,
    verb: &str,
) -> MortyResult<()> {
    activity.record(ActivityEntry::from_flag(action, name, ok));
    if ok {
        Ok(())
    } else {
        Err(MortyError::Io(format!(
            "Could not {} '{}'; see the log for details",
            verb, name
        )))
    }
}
