//! Append-only activity log
//!
//! Each entry is one JSON line, flushed immediately.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use crate::error::{MortyError, MortyResult};

use super::entry::ActivityEntry;

/// Writes and reads the line-delimited JSON activity log
pub struct ActivityLogger {
    log_path: PathBuf,
}

impl ActivityLogger {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Append an entry
    pub fn log(&self, entry: &ActivityEntry) -> MortyResult<()> {
        if let Some(parent) = self.log_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| MortyError::Io(format!("Failed to create log directory: {}", e)))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| MortyError::Io(format!("Failed to open activity log: {}", e)))?;

        let json = serde_json::to_string(entry)
            .map_err(|e| MortyError::Json(format!("Failed to serialize activity entry: {}", e)))?;

        writeln!(file, "{}", json)
            .map_err(|e| MortyError::Io(format!("Failed to write activity entry: {}", e)))?;

        file.flush()
            .map_err(|e| MortyError::Io(format!("Failed to flush activity log: {}", e)))?;

        Ok(())
    }

    /// Append an entry, logging rather than returning any failure
    ///
    /// The activity log is informational; a failed write must not fail the
    /// operation being recorded.
    pub fn record(&self, entry: ActivityEntry) {
        if let Err(e) = self.log(&entry) {
            tracing::warn!(error = %e, action = %entry.action, "failed to record activity");
        }
    }

    /// Read all entries, oldest first
    ///
    /// Lines that do not parse are skipped.
    pub fn read_all(&self) -> MortyResult<Vec<ActivityEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| MortyError::Io(format!("Failed to open activity log: {}", e)))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| {
                MortyError::Io(format!(
                    "Failed to read activity log line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;

            if line.trim().is_empty() {
                continue;
            }

            // A torn append leaves one bad line; the rest of the log is still good
            match serde_json::from_str::<ActivityEntry>(&line) {
                Ok(entry) => entries.push(entry),
                Err(e) => tracing::warn!(
                    line = line_num + 1,
                    error = %e,
                    "skipping unreadable activity entry"
                ),
            }
        }

        Ok(entries)
    }

    /// Read the most recent `count` entries, oldest first
    pub fn read_recent(&self, count: usize) -> MortyResult<Vec<ActivityEntry>> {
        let all_entries = self.read_all()?;
        let start = all_entries.len().saturating_sub(count);
        Ok(all_entries[start..].to_vec())
    }
}
