//! Backup and restore of the user-visible data file
//!
//! A file has two possible copies:
//!
//! - the **public** copy in the user's documents directory
//! - the **private** copy under `<data dir>/backups/backup_<name>`
//!
//! A restore is single-use: it copies the private copy back over the public
//! one and then deletes the private copy.
//!
//! # Example
//!
//! ```rust,ignore
//! use morty::backup::{BackupManager, Location};
//! use morty::config::MortyPaths;
//!
//! let manager = BackupManager::new(&MortyPaths::new()?);
//!
//! manager.create("backup_data.txt", b"...");
//! if manager.delete_with_backup("backup_data.txt") {
//!     // later
//!     manager.restore("backup_data.txt");
//! }
//! println!("{:?}", manager.info("backup_data.txt", Location::Public));
//! ```

mod manager;

pub use manager::{BackupManager, FileInfo, Location};
