use super::StorageDriver;
use crate::{error::SaveResult, types::StorageKey};
use rusqlite::{params, Connection, OptionalExtension};
use std::rc::Rc;

/// Key-value records in a single SQLite table, the way a browser's
/// local storage holds them: one string key, one opaque value.
///
/// Siblings share the connection, so a backup written through a
/// sibling lands in the same database as the primary record.
pub struct SqliteDriver {
    conn: Rc<Connection>,
    key: StorageKey,
}

impl SqliteDriver {
    /// Open (or create) the store at `path`, bound to `key`.
    pub fn open(path: &str, key: impl Into<StorageKey>) -> SaveResult<Self> {
        let conn = Connection::open(path)?;
        // WAL is ignored for :memory: databases.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        Self::with_connection(conn, key)
    }

    /// Open an in-memory store (used in tests).
    pub fn in_memory(key: impl Into<StorageKey>) -> SaveResult<Self> {
        Self::with_connection(Connection::open_in_memory()?, key)
    }

    fn with_connection(conn: Connection, key: impl Into<StorageKey>) -> SaveResult<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv_store (
                key   TEXT PRIMARY KEY,
                value BLOB NOT NULL
            );",
        )?;
        Ok(Self { conn: Rc::new(conn), key: key.into() })
    }

    /// Every key in the store, sorted.
    pub fn keys(&self) -> SaveResult<Vec<StorageKey>> {
        let mut stmt = self.conn.prepare("SELECT key FROM kv_store ORDER BY key ASC")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(keys)
    }

    /// Same store, different key.
    pub fn rebind(&self, key: impl Into<StorageKey>) -> Self {
        Self { conn: Rc::clone(&self.conn), key: key.into() }
    }
}

impl StorageDriver for SqliteDriver {
    fn save_data(&self, data: &[u8]) -> SaveResult<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![self.key, data],
        )?;
        Ok(())
    }

    fn load_data(&self) -> SaveResult<Option<Vec<u8>>> {
        let data = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![self.key],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()?;
        Ok(data)
    }

    fn key_name(&self) -> &str {
        &self.key
    }

    fn sibling(&self, key: &str) -> SaveResult<Box<dyn StorageDriver>> {
        Ok(Box::new(self.rebind(key)))
    }
}
