//! File metadata display formatting

use chrono::Utc;

use crate::backup::{FileInfo, Location};

/// Format what is known about one copy of the data file
pub fn format_file_info(location: Location, info: &FileInfo) -> String {
    match info {
        FileInfo::Absent => format!("{} copy: not found", location),
        FileInfo::Present {
            name,
            path,
            size,
            modified,
        } => {
            let age = Utc::now().signed_duration_since(*modified);
            format!(
                "{} copy: {}\n  Path:     {}\n  Size:     {}\n  Modified: {} ({} ago)",
                location,
                name,
                path.display(),
                format_size(*size),
                modified.format("%Y-%m-%d %H:%M:%S UTC"),
                format_duration(age),
            )
        }
    }
}

/// Format a duration as a short human-readable age
pub fn format_duration(duration: chrono::Duration) -> String {
    let total_seconds = duration.num_seconds().max(0);

    if total_seconds < 60 {
        return format!("{}s", total_seconds);
    }

    let minutes = total_seconds / 60;
    if minutes < 60 {
        return format!("{}m", minutes);
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h", hours);
    }

    let days = hours / 24;
    if days < 30 {
        return format!("{}d", days);
    }

    format!("{}mo", days / 30)
}

/// Format a byte count as a human-readable size
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(chrono::Duration::seconds(42)), "42s");
        assert_eq!(format_duration(chrono::Duration::minutes(5)), "5m");
        assert_eq!(format_duration(chrono::Duration::hours(3)), "3h");
        assert_eq!(format_duration(chrono::Duration::days(2)), "2d");
        assert_eq!(format_duration(chrono::Duration::days(65)), "2mo");
        assert_eq!(format_duration(chrono::Duration::seconds(-5)), "0s");
    }

    #[test]
    fn test_format_file_info() {
        assert_eq!(
            format_file_info(Location::Private, &FileInfo::Absent),
            "private copy: not found"
        );

        let info = FileInfo::Present {
            name: "backup_data.txt".into(),
            path: PathBuf::from("/tmp/backup_data.txt"),
            size: 100,
            modified: Utc::now(),
        };
        let output = format_file_info(Location::Public, &info);
        assert!(output.starts_with("public copy: backup_data.txt"));
        assert!(output.contains("100 B"));
    }
}
