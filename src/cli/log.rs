//! Activity log CLI command

use crate::activity::ActivityLogger;
use crate::error::MortyResult;

/// Print the most recent activity entries
pub fn handle_log_command(activity: &ActivityLogger, count: usize) -> MortyResult<()> {
    let entries = activity.read_recent(count)?;

    if entries.is_empty() {
        println!("No activity recorded yet.");
        return Ok(());
    }

    for entry in entries.iter().rev() {
        println!("{}", entry.format_human_readable());
    }

    Ok(())
}
