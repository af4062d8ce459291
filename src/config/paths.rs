//! Path management for morty-cache
//!
//! Two roots are involved: the private application directory (database,
//! settings, activity log, cached backup copies) and the public directory
//! where the user-visible data file lives.
//!
//! ## Path Resolution Order
//!
//! Private directory:
//! 1. `MORTY_DATA_DIR` environment variable (if set)
//! 2. The platform data directory for `morty-cache` (via `directories`)
//!
//! Public directory:
//! 1. `MORTY_PUBLIC_DIR` environment variable (if set)
//! 2. The user's documents directory
//! 3. `<private>/public` as a last resort

use std::path::PathBuf;

use directories::{ProjectDirs, UserDirs};

use crate::error::MortyError;

/// Subdirectory of private storage that holds cached backup copies
pub const PRIVATE_BACKUP_SUBDIR: &str = "backups";

/// Manages all paths used by morty-cache
#[derive(Debug, Clone)]
pub struct MortyPaths {
    /// Private application directory
    base_dir: PathBuf,
    /// Public, user-visible directory for the data file
    public_dir: PathBuf,
}

impl MortyPaths {
    /// Create a new MortyPaths instance from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if no platform data directory can be determined and
    /// no override is set.
    pub fn new() -> Result<Self, MortyError> {
        let base_dir = match std::env::var("MORTY_DATA_DIR") {
            Ok(custom) => PathBuf::from(custom),
            Err(_) => resolve_default_base()?,
        };

        let public_dir = match std::env::var("MORTY_PUBLIC_DIR") {
            Ok(custom) => PathBuf::from(custom),
            Err(_) => UserDirs::new()
                .and_then(|dirs| dirs.document_dir().map(PathBuf::from))
                .unwrap_or_else(|| base_dir.join("public")),
        };

        Ok(Self {
            base_dir,
            public_dir,
        })
    }

    /// Create MortyPaths with explicit directories (useful for testing)
    pub fn with_dirs(base_dir: PathBuf, public_dir: PathBuf) -> Self {
        Self {
            base_dir,
            public_dir,
        }
    }

    /// Create MortyPaths with a single root, public files under `<root>/public`
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        let public_dir = base_dir.join("public");
        Self::with_dirs(base_dir, public_dir)
    }

    /// Get the private base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the public directory holding the user-visible data file
    pub fn public_dir(&self) -> &PathBuf {
        &self.public_dir
    }

    /// Get the private directory that holds cached backup copies
    pub fn private_backup_dir(&self) -> PathBuf {
        self.base_dir.join(PRIVATE_BACKUP_SUBDIR)
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the character database
    pub fn database_file(&self) -> PathBuf {
        self.base_dir.join("characters.db")
    }

    /// Get the path to the activity log
    pub fn activity_log(&self) -> PathBuf {
        self.base_dir.join("activity.log")
    }

    /// Ensure the private directories exist
    ///
    /// The public directory is created lazily when a file is written there.
    pub fn ensure_directories(&self) -> Result<(), MortyError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| MortyError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.private_backup_dir())
            .map_err(|e| MortyError::Io(format!("Failed to create backup directory: {}", e)))?;

        Ok(())
    }
}

fn resolve_default_base() -> Result<PathBuf, MortyError> {
    ProjectDirs::from("com", "example", "morty-cache")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| MortyError::Config("Could not determine a data directory".into()))
}
