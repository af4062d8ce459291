//! Backup manager for the user-visible data file
//!
//! Moves a named file between its public location and a private cached copy.
//! Every operation reports a plain `bool` (or a [`FileInfo`]) and logs the
//! underlying error; nothing is propagated to the caller.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::paths::MortyPaths;
use crate::error::{MortyError, MortyResult};

/// Prefix of private copies, so they never collide with other private files
const PRIVATE_PREFIX: &str = "backup_";

/// Which copy of a file an operation refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    /// Public, user-visible location
    Public,
    /// Private, hidden cache location
    Private,
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::Public => write!(f, "public"),
            Location::Private => write!(f, "private"),
        }
    }
}

/// Metadata about one copy of a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum FileInfo {
    Absent,
    Present {
        /// File name on disk
        name: String,
        /// Full path
        path: PathBuf,
        /// Size in bytes
        size: u64,
        /// Last modification time
        modified: DateTime<Utc>,
    },
}

impl FileInfo {
    pub fn exists(&self) -> bool {
        matches!(self, FileInfo::Present { .. })
    }

    pub fn size(&self) -> Option<u64> {
        match self {
            FileInfo::Present { size, .. } => Some(*size),
            FileInfo::Absent => None,
        }
    }
}

/// Manages the public file and its private cached copy
#[derive(Debug, Clone)]
pub struct BackupManager {
    public_dir: PathBuf,
    private_dir: PathBuf,
}

impl BackupManager {
    /// Create a manager over the configured public and private directories
    pub fn new(paths: &MortyPaths) -> Self {
        Self::with_dirs(paths.public_dir().clone(), paths.private_backup_dir())
    }

    /// Create a manager over explicit directories
    pub fn with_dirs(public_dir: PathBuf, private_dir: PathBuf) -> Self {
        Self {
            public_dir,
            private_dir,
        }
    }

    /// Path of the public copy of `name`
    pub fn public_path(&self, name: &str) -> PathBuf {
        self.public_dir.join(name)
    }

    /// Path of the private copy of `name`
    pub fn private_path(&self, name: &str) -> PathBuf {
        self.private_dir.join(format!("{}{}", PRIVATE_PREFIX, name))
    }

    fn path_for(&self, name: &str, location: Location) -> PathBuf {
        match location {
            Location::Public => self.public_path(name),
            Location::Private => self.private_path(name),
        }
    }

    /// Write `content` to the public location, creating directories as needed
    ///
    /// Returns whether the file exists afterwards.
    pub fn create(&self, name: &str, content: &[u8]) -> bool {
        report("create", name, self.try_create(name, content))
    }

    /// Describe the public or private copy of `name`
    pub fn info(&self, name: &str, location: Location) -> FileInfo {
        if validate_name(name).is_err() {
            return FileInfo::Absent;
        }

        let path = self.path_for(name, location);
        match file_info(&path) {
            Ok(info) => info,
            Err(e) => {
                tracing::warn!(name, %location, error = %e, "failed to read file info");
                FileInfo::Absent
            }
        }
    }

    /// Copy public to private, overwriting any existing private copy
    pub fn backup(&self, name: &str) -> bool {
        report("backup", name, self.try_backup(name))
    }

    /// Delete the public copy
    pub fn delete_public(&self, name: &str) -> bool {
        report(
            "delete_public",
            name,
            validate_name(name).and_then(|_| remove(&self.public_path(name))),
        )
    }

    /// Back the public file up, then delete it
    ///
    /// If the backup fails the public file is left alone. If the delete fails
    /// the fresh private copy is removed again and `false` is returned.
    pub fn delete_with_backup(&self, name: &str) -> bool {
        self.delete_with_backup_using(name, |path| fs::remove_file(path))
    }

    fn delete_with_backup_using<F>(&self, name: &str, remove_public: F) -> bool
    where
        F: FnOnce(&Path) -> io::Result<()>,
    {
        if !self.backup(name) {
            tracing::warn!(name, "backup failed, public file left untouched");
            return false;
        }

        let public = self.public_path(name);
        match remove_public(&public) {
            Ok(()) => {
                tracing::info!(name, "public file deleted, private copy kept");
                true
            }
            Err(e) => {
                tracing::error!(name, error = %e, "failed to delete public file, rolling back private copy");
                if let Err(e) = remove(&self.private_path(name)) {
                    tracing::error!(name, error = %e, "failed to roll back private copy");
                }
                false
            }
        }
    }

    /// Copy private to public and consume the private copy
    ///
    /// Returns false when there is no private copy.
    pub fn restore(&self, name: &str) -> bool {
        report("restore", name, self.try_restore(name))
    }

    /// Delete the private copy if present
    pub fn delete_cache(&self, name: &str) -> bool {
        report(
            "delete_cache",
            name,
            validate_name(name).and_then(|_| remove(&self.private_path(name))),
        )
    }

    fn try_create(&self, name: &str, content: &[u8]) -> MortyResult<()> {
        validate_name(name)?;
        let path = self.public_path(name);
        ensure_parent(&path)?;
        fs::write(&path, content)?;

        if path.exists() {
            Ok(())
        } else {
            Err(MortyError::file_not_found(path.display().to_string()))
        }
    }

    fn try_backup(&self, name: &str) -> MortyResult<()> {
        validate_name(name)?;
        let public = self.public_path(name);
        let private = self.private_path(name);

        if !public.exists() {
            return Err(MortyError::file_not_found(public.display().to_string()));
        }

        ensure_parent(&private)?;
        fs::copy(&public, &private)?;
        Ok(())
    }

    fn try_restore(&self, name: &str) -> MortyResult<()> {
        validate_name(name)?;
        let private = self.private_path(name);
        let public = self.public_path(name);

        if !private.exists() {
            return Err(MortyError::file_not_found(private.display().to_string()));
        }

        ensure_parent(&public)?;
        fs::copy(&private, &public)?;

        // The public copy is back; a stale private copy is only a warning
        if let Err(e) = remove(&private) {
            tracing::warn!(name, error = %e, "restored, but could not remove private copy");
        }
        Ok(())
    }
}

/// Log the outcome of an operation and flatten it to a flag
fn report(operation: &str, name: &str, result: MortyResult<()>) -> bool {
    match result {
        Ok(()) => {
            tracing::info!(operation, name, "file operation succeeded");
            true
        }
        Err(e) if e.is_not_found() => {
            tracing::warn!(operation, name, error = %e, "file operation skipped");
            false
        }
        Err(e) => {
            tracing::error!(operation, name, error = %e, "file operation failed");
            false
        }
    }
}

/// File names must be a single path component
fn validate_name(name: &str) -> MortyResult<()> {
    let valid = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\');

    if valid {
        Ok(())
    } else {
        Err(MortyError::Validation(format!("Invalid file name: '{}'", name)))
    }
}

fn ensure_parent(path: &Path) -> MortyResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn remove(path: &Path) -> MortyResult<()> {
    if !path.exists() {
        return Err(MortyError::file_not_found(path.display().to_string()));
    }
    fs::remove_file(path)?;
    Ok(())
}

fn file_info(path: &Path) -> MortyResult<FileInfo> {
    if !path.is_file() {
        return Ok(FileInfo::Absent);
    }

    let metadata = fs::metadata(path)?;
    let modified = metadata
        .modified()
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(|_| Utc::now());

    Ok(FileInfo::Present {
        name: path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default(),
        path: path.to_path_buf(),
        size: metadata.len(),
        modified,
    })
}
