// pwmsg — SQLite-backed storage slots
//
// A single `slots` table maps a string key to a text value, mirroring the
// browser's local storage: each schema owns one key, and the value is
// overwritten wholesale on every save.

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};

use super::slot::SlotStorage;
use super::StoreError;

/// Wrapper around the SQLite connection that holds the storage slots.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the slot database at the given path.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;

        let db = Self { conn };
        db.run_migrations()?;

        Ok(db)
    }

    /// Open an in-memory database (for testing only).
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.run_migrations()?;
        Ok(db)
    }

    /// Get a reference to the underlying connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    fn run_migrations(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS slots (
                key         TEXT PRIMARY KEY,
                value       TEXT NOT NULL
            );
            ",
        )?;

        tracing::debug!("Slot table ready");
        Ok(())
    }
}

impl SlotStorage for Database {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM slots WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO slots (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
