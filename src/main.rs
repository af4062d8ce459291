use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use morty::activity::ActivityLogger;
use morty::cli::{
    handle_characters_command, handle_file_command, handle_log_command, handle_settings_command,
};
use morty::config::{paths::MortyPaths, settings::Settings};
use morty::remote::HttpCharacterSource;
use morty::storage::open_repository;
use morty::sync::{CharacterSync, Feed};

#[derive(Parser)]
#[command(
    name = "morty",
    version,
    about = "Offline-first cache of the Rick and Morty character list",
    long_about = "morty pages through the Rick and Morty character API, caches every \
                  page locally, and keeps a user-visible data file with a private \
                  backup copy that can be restored."
)]
struct Cli {
    /// Log verbosity when MORTY_LOG is unset (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Character cache commands
    #[command(subcommand, alias = "chars")]
    Characters(morty::cli::CharacterCommands),

    /// Data file and backup commands
    File(morty::cli::FileArgs),

    /// Settings commands
    #[command(subcommand)]
    Settings(morty::cli::SettingsCommands),

    /// Show recent activity
    Log {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        count: usize,
    },

    /// Show current configuration and paths
    Config,
}

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_env("MORTY_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_sync(paths: &MortyPaths, settings: &Settings) -> Result<CharacterSync> {
    let source = HttpCharacterSource::new(&settings.api_base_url, settings.request_timeout())
        .context("Failed to build the character API client")?;
    let repo = open_repository(paths).context("Failed to open the character store")?;
    Ok(CharacterSync::new(Arc::new(source), Arc::new(repo)))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    // Initialize paths and settings
    let paths = MortyPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;
    let activity = ActivityLogger::new(paths.activity_log());

    match cli.command {
        Some(Commands::Characters(cmd)) => {
            let feed = Feed::new(build_sync(&paths, &settings)?);
            handle_characters_command(&feed, &activity, cmd).await?;
        }
        Some(Commands::File(args)) => {
            let sync = build_sync(&paths, &settings)?;
            handle_file_command(&paths, &settings, &sync, &activity, args).await?;
        }
        Some(Commands::Settings(cmd)) => {
            handle_settings_command(&paths, &mut settings, &activity, cmd)?;
        }
        Some(Commands::Log { count }) => {
            handle_log_command(&activity, count)?;
        }
        Some(Commands::Config) => {
            println!("morty Configuration");
            println!("===================");
            println!("Data directory:   {}", paths.base_dir().display());
            println!("Public directory: {}", paths.public_dir().display());
            println!("Backup directory: {}", paths.private_backup_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Character store:  {}", paths.database_file().display());
            println!("Activity log:     {}", paths.activity_log().display());
            println!();
            println!("Settings:");
            println!("  Backup filename: {}", settings.backup_filename);
            println!("  API base URL:    {}", settings.api_base_url);
        }
        None => {
            println!("morty - offline-first Rick and Morty character cache");
            println!();
            println!("Run 'morty --help' for usage information.");
            println!("Run 'morty characters list' to load the first page.");
        }
    }

    Ok(())
}
