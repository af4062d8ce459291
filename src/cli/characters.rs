//! Character CLI commands
//!
//! Drives the paginated sync: initial load, next page, explicit pages,
//! refresh, and a live view of the store while pages load.

use std::io::Write;

use clap::Subcommand;
use tokio::sync::oneshot;

use crate::activity::{Action, ActivityEntry, ActivityLogger};
use crate::display::{format_character_details, format_character_list, render_row};
use crate::error::{MortyError, MortyResult};
use crate::models::Character;
use crate::sync::{Feed, InitialLoad, LiveView, LoadOutcome};

/// Character subcommands
#[derive(Subcommand)]
pub enum CharacterCommands {
    /// Show cached characters, fetching the first page on an empty cache
    List,

    /// Fetch the page after the last cached one
    Next,

    /// Fetch a specific page
    Page {
        /// Page number (starting at 1)
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
    },

    /// Drop the cache and fetch the first page again
    Refresh,

    /// Remove every cached character
    Clear,

    /// Show one cached character
    Show {
        /// Character ID
        id: u32,
    },

    /// Load pages while printing every snapshot of the cache
    Watch {
        /// Number of pages to load
        #[arg(short, long, default_value = "2")]
        pages: u32,
    },
}

/// Handle a character command
pub async fn handle_characters_command(
    feed: &Feed,
    activity: &ActivityLogger,
    cmd: CharacterCommands,
) -> MortyResult<()> {
    let sync = feed.sync();

    match cmd {
        CharacterCommands::List => {
            match record_start(activity, feed.start().await)? {
                InitialLoad::Fetched(count) => println!("Fetched page 1 ({} characters)", count),
                InitialLoad::Cached(count) => println!("Serving {} cached characters", count),
                InitialLoad::Busy => println!("A page load is already in progress"),
            }
            println!();
            println!("{}", format_character_list(&sync.cached().await?));
        }

        CharacterCommands::Next => {
            let target = sync.cursor().await?.to_string();
            let page = record(activity, Action::FetchPage, target, sync.load_next_page().await)?;
            let total = sync.cached().await?.len();
            println!("Fetched page {}; {} characters cached", page, total);
        }

        CharacterCommands::Page { page } => {
            let fetched = record(
                activity,
                Action::FetchPage,
                page.to_string(),
                sync.fetch_and_persist(page).await,
            )?;
            if fetched.is_empty() {
                println!("Page {} is past the end of the list", page);
            } else {
                println!("Fetched page {} ({} characters)", page, fetched.len());
            }
        }

        CharacterCommands::Refresh => {
            record(activity, Action::Refresh, "1", feed.refresh().await)?;
            let total = sync.cached().await?.len();
            println!("Refreshed; {} characters cached", total);
        }

        CharacterCommands::Clear => {
            let removed = record(activity, Action::ClearCache, "all", sync.clear().await)?;
            println!("Removed {} cached characters", removed);
        }

        CharacterCommands::Show { id } => {
            let stored = sync
                .get(id)
                .await?
                .ok_or_else(|| MortyError::character_not_found(id.to_string()))?;
            println!("{}", format_character_details(&stored.character));
            println!("  Page:    {}", stored.page);
        }

        CharacterCommands::Watch { pages } => watch(feed, activity, pages).await?,
    }

    Ok(())
}

async fn watch(feed: &Feed, activity: &ActivityLogger, pages: u32) -> MortyResult<()> {
    let mut out = std::io::stdout();
    watch_to(feed, activity, pages, &mut out).await
}

/// Load `pages` pages while writing every live-view emission to `out`
async fn watch_to<W: Write>(
    feed: &Feed,
    activity: &ActivityLogger,
    pages: u32,
    out: &mut W,
) -> MortyResult<()> {
    let view = feed.sync().live_view();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    let load = async {
        let result = load_pages(feed, activity, pages).await;
        let _ = stop_tx.send(());
        result
    };

    let (loaded, printed) = tokio::join!(load, print_snapshots(feed, view, stop_rx, &mut *out));
    let loaded = loaded?;
    printed?;

    let total = feed.sync().cached().await?.len();
    writeln!(out, "Loaded {} page(s); {} characters cached", loaded, total)?;
    if !feed.has_next_page() {
        writeln!(out, "Reached the end of the character list")?;
    }
    Ok(())
}

/// Print snapshots until `stop` fires, then print the final state if unseen
async fn print_snapshots<W: Write>(
    feed: &Feed,
    mut view: LiveView,
    mut stop: oneshot::Receiver<()>,
    out: &mut W,
) -> MortyResult<()> {
    let mut emissions = 0usize;
    let mut last_seen: Option<Vec<Character>> = None;

    loop {
        tokio::select! {
            biased;
            snapshot = view.next() => {
                let Some(snapshot) = snapshot else { break };
                emissions += 1;
                print_snapshot(feed, emissions, &snapshot, out)?;
                last_seen = Some(snapshot);
            }
            _ = &mut stop => break,
        }
    }

    let latest = view.latest();
    if last_seen.as_ref() != Some(&latest) {
        print_snapshot(feed, emissions + 1, &latest, out)?;
    }
    Ok(())
}

fn print_snapshot<W: Write>(
    feed: &Feed,
    number: usize,
    snapshot: &[Character],
    out: &mut W,
) -> MortyResult<()> {
    writeln!(out, "[snapshot {}] {} characters", number, snapshot.len())?;
    if let Some(last) = feed.rows(snapshot).last() {
        writeln!(out, "{}", render_row(last))?;
    }
    Ok(())
}

async fn load_pages(feed: &Feed, activity: &ActivityLogger, pages: u32) -> MortyResult<u32> {
    if pages == 0 {
        return Ok(0);
    }

    let mut loaded = 0;
    if let InitialLoad::Fetched(_) = record_start(activity, feed.start().await)? {
        loaded += 1;
    }

    while loaded < pages {
        let target = feed.sync().cursor().await?.to_string();
        match record(activity, Action::FetchPage, target, feed.load_more().await)? {
            LoadOutcome::Loaded { .. } => loaded += 1,
            LoadOutcome::EndOfData | LoadOutcome::Exhausted => break,
            LoadOutcome::Busy => tokio::task::yield_now().await,
        }
    }

    Ok(loaded)
}

/// Record a start only when it went to the network
fn record_start(
    activity: &ActivityLogger,
    result: MortyResult<InitialLoad>,
) -> MortyResult<InitialLoad> {
    match result {
        Ok(InitialLoad::Cached(count)) => Ok(InitialLoad::Cached(count)),
        Ok(InitialLoad::Busy) => Ok(InitialLoad::Busy),
        other => record(activity, Action::FetchPage, "1", other),
    }
}

/// Record the outcome of an action and pass the result through
fn record<T>(
    activity: &ActivityLogger,
    action: Action,
    target: impl Into<String>,
    result: MortyResult<T>,
) -> MortyResult<T> {
    let entry = match &result {
        Ok(_) => ActivityEntry::success(action, target),
        Err(e) => ActivityEntry::failure(action, target, e.to_string()),
    };
    activity.record(entry);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use tempfile::TempDir;

    use crate::remote::fake::FakeSource;
    use crate::storage::CharacterRepository;
    use crate::sync::CharacterSync;

    fn setup(page_size: u32, total: u32) -> (Feed, ActivityLogger, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let source = Arc::new(FakeSource::new(page_size, total));
        let repo = Arc::new(CharacterRepository::in_memory().unwrap());
        let feed = Feed::new(CharacterSync::new(source, repo));
        let activity = ActivityLogger::new(temp_dir.path().join("activity.log"));
        (feed, activity, temp_dir)
    }

    fn snapshot_lines(output: &str) -> Vec<&str> {
        output
            .lines()
            .filter(|line| line.starts_with("[snapshot"))
            .collect()
    }

    #[tokio::test]
    async fn test_watch_prints_final_snapshot() {
        for _ in 0..50 {
            let (feed, activity, _temp) = setup(10, 100);
            let mut out = Vec::new();

            watch_to(&feed, &activity, 3, &mut out).await.unwrap();

            let output = String::from_utf8(out).unwrap();
            let snapshots = snapshot_lines(&output);
            assert!(snapshots[0].ends_with(" 0 characters"));
            assert!(snapshots.last().unwrap().ends_with(" 30 characters"), "{}", output);
            assert!(output.contains("Loaded 3 page(s); 30 characters cached"));
        }
    }

    #[tokio::test]
    async fn test_watch_stops_at_end_of_data() {
        let (feed, activity, _temp) = setup(10, 15);
        let mut out = Vec::new();

        watch_to(&feed, &activity, 5, &mut out).await.unwrap();

        let output = String::from_utf8(out).unwrap();
        assert!(snapshot_lines(&output).last().unwrap().ends_with(" 15 characters"));
        assert!(output.contains("Loaded 2 page(s); 15 characters cached"));
        assert!(output.contains("Reached the end of the character list"));

        let fetches = activity.read_all().unwrap();
        assert_eq!(fetches.len(), 3);
    }
}
