//! Character repository backed by SQLite
//!
//! Rows are keyed by character id; re-inserting an id replaces the row.
//! Every mutation republishes the full ordered snapshot on a watch channel,
//! which is what the live view subscribes to.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension, Row};
use tokio::sync::watch;

use crate::error::{MortyError, MortyResult};
use crate::models::{Character, CharacterStatus, PersistedCharacter};

const SELECT_COLUMNS: &str = "id, name, status, species, gender, image, page";

/// Repository for persisted characters
pub struct CharacterRepository {
    conn: Mutex<Connection>,
    snapshots: watch::Sender<Vec<Character>>,
}

impl CharacterRepository {
    /// Open (or create) the database file at `path`
    pub fn open(path: &Path) -> MortyResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                MortyError::Storage(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let conn = Connection::open(path)?;
        tracing::debug!(path = %path.display(), "opened character database");
        Self::from_connection(conn)
    }

    /// Open a throwaway in-memory database
    pub fn in_memory() -> MortyResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> MortyResult<Self> {
        init_schema(&conn)?;
        let initial = scan_all(&conn)?;
        let (snapshots, _) = watch::channel(initial);

        Ok(Self {
            conn: Mutex::new(conn),
            snapshots,
        })
    }

    fn lock(&self) -> MortyResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| MortyError::Storage(format!("Failed to acquire database lock: {}", e)))
    }

    /// Subscribe to full ordered snapshots of the table
    ///
    /// The receiver already holds the current snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Character>> {
        self.snapshots.subscribe()
    }

    /// Number of stored characters
    pub fn count(&self) -> MortyResult<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM characters", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Highest page number stored, `None` when the table is empty
    pub fn max_page(&self) -> MortyResult<Option<u32>> {
        let conn = self.lock()?;
        let max: Option<u32> =
            conn.query_row("SELECT MAX(page) FROM characters", [], |row| row.get(0))?;
        Ok(max)
    }

    /// Insert or replace a batch of rows in one transaction
    pub fn insert_all(&self, rows: &[PersistedCharacter]) -> MortyResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO characters (id, name, status, species, gender, image, page)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for row in rows {
                let c = &row.character;
                stmt.execute(params![
                    c.id,
                    c.name,
                    c.status.as_str(),
                    c.species,
                    c.gender,
                    c.image,
                    row.page
                ])?;
            }
        }
        tx.commit()?;

        self.publish(&conn)
    }

    /// All characters ordered by id ascending
    pub fn get_all(&self) -> MortyResult<Vec<Character>> {
        let conn = self.lock()?;
        Ok(scan_all(&conn)?)
    }

    /// Characters fetched under `page`, ordered by id ascending
    pub fn get_page(&self, page: u32) -> MortyResult<Vec<Character>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM characters WHERE page = ?1 ORDER BY id ASC",
            SELECT_COLUMNS
        ))?;
        let rows = stmt.query_map([page], |row| read_row(row).map(|p| p.character))?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// A single row by character id
    pub fn get(&self, id: u32) -> MortyResult<Option<PersistedCharacter>> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                &format!("SELECT {} FROM characters WHERE id = ?1", SELECT_COLUMNS),
                [id],
                read_row,
            )
            .optional()?;
        Ok(row)
    }

    /// Update an existing row; returns false when the id is not stored
    pub fn update(&self, row: &PersistedCharacter) -> MortyResult<bool> {
        let c = &row.character;
        self.mutate(|conn| {
            conn.execute(
                "UPDATE characters
                 SET name = ?2, status = ?3, species = ?4, gender = ?5, image = ?6, page = ?7
                 WHERE id = ?1",
                params![c.id, c.name, c.status.as_str(), c.species, c.gender, c.image, row.page],
            )
        })
        .map(|changed| changed > 0)
    }

    /// Delete one row by id; returns whether it existed
    pub fn delete(&self, id: u32) -> MortyResult<bool> {
        self.mutate(|conn| conn.execute("DELETE FROM characters WHERE id = ?1", [id]))
            .map(|changed| changed > 0)
    }

    /// Delete every row fetched under `page`; returns the number removed
    pub fn delete_page(&self, page: u32) -> MortyResult<usize> {
        self.mutate(|conn| conn.execute("DELETE FROM characters WHERE page = ?1", [page]))
    }

    /// Delete every row; returns the number removed
    pub fn clear(&self) -> MortyResult<usize> {
        self.mutate(|conn| conn.execute("DELETE FROM characters", []))
    }

    /// Run a single statement and republish when it changed anything
    fn mutate<F>(&self, op: F) -> MortyResult<usize>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<usize>,
    {
        let conn = self.lock()?;
        let changed = op(&*conn)?;
        if changed > 0 {
            self.publish(&conn)?;
        }
        Ok(changed)
    }

    /// Send the current table contents to subscribers
    ///
    /// Callers hold the connection lock, so snapshots go out in commit order
    /// and the last one sent always matches the table.
    fn publish(&self, conn: &Connection) -> MortyResult<()> {
        let snapshot = scan_all(conn)?;
        self.snapshots.send_replace(snapshot);
        Ok(())
    }
}

fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS characters (
            id       INTEGER PRIMARY KEY,
            name     TEXT NOT NULL,
            status   TEXT NOT NULL,
            species  TEXT NOT NULL,
            gender   TEXT NOT NULL DEFAULT '',
            image    TEXT NOT NULL,
            page     INTEGER NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_characters_page ON characters(page)",
        [],
    )?;

    Ok(())
}

fn scan_all(conn: &Connection) -> rusqlite::Result<Vec<Character>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM characters ORDER BY id ASC",
        SELECT_COLUMNS
    ))?;
    let rows = stmt.query_map([], |row| read_row(row).map(|p| p.character))?;
    rows.collect()
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<PersistedCharacter> {
    let status: String = row.get(2)?;
    Ok(PersistedCharacter {
        character: Character {
            id: row.get(0)?,
            name: row.get(1)?,
            status: CharacterStatus::parse(&status),
            species: row.get(3)?,
            gender: row.get(4)?,
            image: row.get(5)?,
        },
        page: row.get(6)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn character(id: u32) -> Character {
        Character::new(
            id,
            format!("Character {}", id),
            CharacterStatus::Alive,
            "Human",
            format!("https://example.test/{}.jpeg", id),
        )
    }

    fn page_rows(page: u32, ids: &[u32]) -> Vec<PersistedCharacter> {
        ids.iter().map(|&id| character(id).on_page(page)).collect()
    }

    #[test]
    fn test_empty_store() {
        let repo = CharacterRepository::in_memory().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
        assert_eq!(repo.max_page().unwrap(), None);
        assert!(repo.get_all().unwrap().is_empty());
    }

    #[test]
    fn test_insert_and_scan_ordered_by_id() {
        let repo = CharacterRepository::in_memory().unwrap();
        repo.insert_all(&page_rows(2, &[30, 10])).unwrap();
        repo.insert_all(&page_rows(1, &[20, 5])).unwrap();

        let ids: Vec<u32> = repo.get_all().unwrap().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![5, 10, 20, 30]);
        assert_eq!(repo.max_page().unwrap(), Some(2));
    }

    #[test]
    fn test_reinsert_replaces() {
        let repo = CharacterRepository::in_memory().unwrap();
        repo.insert_all(&page_rows(1, &[1, 2, 3])).unwrap();
        repo.insert_all(&page_rows(1, &[1, 2, 3])).unwrap();
        assert_eq!(repo.count().unwrap(), 3);

        // Same id under a later page moves the row
        repo.insert_all(&page_rows(4, &[2])).unwrap();
        assert_eq!(repo.count().unwrap(), 3);
        assert_eq!(repo.get(2).unwrap().unwrap().page, 4);
    }

    #[test]
    fn test_delete_page_and_clear() {
        let repo = CharacterRepository::in_memory().unwrap();
        repo.insert_all(&page_rows(1, &[1, 2])).unwrap();
        repo.insert_all(&page_rows(2, &[3, 4, 5])).unwrap();

        assert_eq!(repo.delete_page(2).unwrap(), 3);
        assert_eq!(repo.get_page(1).unwrap().len(), 2);
        assert!(repo.get_page(2).unwrap().is_empty());

        assert_eq!(repo.clear().unwrap(), 2);
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_update_and_delete() {
        let repo = CharacterRepository::in_memory().unwrap();
        repo.insert_all(&page_rows(1, &[7])).unwrap();

        let mut row = repo.get(7).unwrap().unwrap();
        row.character.status = CharacterStatus::Dead;
        assert!(repo.update(&row).unwrap());
        assert_eq!(
            repo.get(7).unwrap().unwrap().character.status,
            CharacterStatus::Dead
        );

        let missing = character(99).on_page(1);
        assert!(!repo.update(&missing).unwrap());

        assert!(repo.delete(7).unwrap());
        assert!(!repo.delete(7).unwrap());
    }

    #[test]
    fn test_subscribe_sees_every_change() {
        let repo = CharacterRepository::in_memory().unwrap();
        let mut rx = repo.subscribe();
        assert!(rx.borrow_and_update().is_empty());

        repo.insert_all(&page_rows(1, &[2, 1])).unwrap();
        assert!(rx.has_changed().unwrap());
        let ids: Vec<u32> = rx.borrow_and_update().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2]);

        repo.clear().unwrap();
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_empty());
    }

    #[test]
    fn test_noop_delete_does_not_publish() {
        let repo = CharacterRepository::in_memory().unwrap();
        let mut rx = repo.subscribe();
        rx.borrow_and_update();

        repo.delete_page(9).unwrap();
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_overlapping_inserts_leave_latest_snapshot() {
        use std::sync::{Arc, Barrier};
        use std::thread;

        for _ in 0..200 {
            let repo = Arc::new(CharacterRepository::in_memory().unwrap());
            let barrier = Arc::new(Barrier::new(2));

            let handles: Vec<_> = [(1u32, 1u32..=20), (2, 21..=40)]
                .into_iter()
                .map(|(page, ids)| {
                    let repo = Arc::clone(&repo);
                    let barrier = Arc::clone(&barrier);
                    thread::spawn(move || {
                        let rows: Vec<PersistedCharacter> =
                            ids.map(|id| character(id).on_page(page)).collect();
                        barrier.wait();
                        repo.insert_all(&rows).unwrap();
                    })
                })
                .collect();

            for handle in handles {
                handle.join().unwrap();
            }

            assert_eq!(*repo.subscribe().borrow(), repo.get_all().unwrap());
            assert_eq!(repo.subscribe().borrow().len(), 40);
        }
    }

    #[test]
    fn test_persists_across_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("db").join("characters.db");

        {
            let repo = CharacterRepository::open(&path).unwrap();
            repo.insert_all(&page_rows(1, &[1, 2])).unwrap();
        }

        let repo = CharacterRepository::open(&path).unwrap();
        assert_eq!(repo.count().unwrap(), 2);
        assert_eq!(repo.subscribe().borrow().len(), 2);
    }
}
