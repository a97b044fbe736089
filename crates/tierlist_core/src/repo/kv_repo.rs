//! Key-value byte store contracts and implementations.
//!
//! # Responsibility
//! - Store opaque byte values under string keys.
//! - Provide a SQLite implementation that survives restarts and an
//!   in-memory double for tests.
//!
//! # Invariants
//! - `put_value` replaces any previous value for the same key.
//! - `get_value` returns `None` for absent keys, never an error.

use crate::db::{open_db, open_db_in_memory};
use crate::repo::{RepoError, RepoResult};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;

/// Byte-level storage port.
pub trait KvRepository {
    fn get_value(&self, key: &str) -> RepoResult<Option<Vec<u8>>>;
    fn put_value(&self, key: &str, value: &[u8]) -> RepoResult<()>;
    fn delete_value(&self, key: &str) -> RepoResult<()>;
}

/// SQLite-backed key-value store.
pub struct SqliteKvRepository {
    conn: Connection,
}

impl SqliteKvRepository {
    /// Wraps a connection returned by [`open_db`] or [`open_db_in_memory`].
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    pub fn open_in_memory() -> RepoResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl KvRepository for SqliteKvRepository {
    fn get_value(&self, key: &str) -> RepoResult<Option<Vec<u8>>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn put_value(&self, key: &str, value: &[u8]) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }

    fn delete_value(&self, key: &str) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [key])?;
        Ok(())
    }
}

/// In-memory key-value store.
///
/// Can be switched to an unavailable mode where every call fails, which is
/// how storage outages are exercised in tests.
#[derive(Debug, Default)]
pub struct MemoryKvRepository {
    entries: Mutex<HashMap<String, Vec<u8>>>,
    unavailable: Mutex<bool>,
}

impl MemoryKvRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds raw bytes, bypassing availability checks.
    pub fn with_entry(key: &str, value: impl Into<Vec<u8>>) -> Self {
        let repo = Self::new();
        repo.entries.lock().insert(key.to_string(), value.into());
        repo
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.lock() = unavailable;
    }

    /// Raw bytes currently held for `key`, bypassing availability checks.
    pub fn raw_value(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.lock().get(key).cloned()
    }

    fn ensure_available(&self) -> RepoResult<()> {
        if *self.unavailable.lock() {
            return Err(RepoError::Unavailable("memory store switched off".to_string()));
        }
        Ok(())
    }
}

impl KvRepository for MemoryKvRepository {
    fn get_value(&self, key: &str) -> RepoResult<Option<Vec<u8>>> {
        self.ensure_available()?;
        Ok(self.entries.lock().get(key).cloned())
    }

    fn put_value(&self, key: &str, value: &[u8]) -> RepoResult<()> {
        self.ensure_available()?;
        self.entries.lock().insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete_value(&self, key: &str) -> RepoResult<()> {
        self.ensure_available()?;
        self.entries.lock().remove(key);
        Ok(())
    }
}

impl<K: KvRepository + ?Sized> KvRepository for std::sync::Arc<K> {
    fn get_value(&self, key: &str) -> RepoResult<Option<Vec<u8>>> {
        (**self).get_value(key)
    }

    fn put_value(&self, key: &str, value: &[u8]) -> RepoResult<()> {
        (**self).put_value(key, value)
    }

    fn delete_value(&self, key: &str) -> RepoResult<()> {
        (**self).delete_value(key)
    }
}

#[cfg(test)]
mod tests {
    use super::{KvRepository, MemoryKvRepository, SqliteKvRepository};

    #[test]
    fn sqlite_put_replaces_previous_value() {
        let repo = SqliteKvRepository::open_in_memory().unwrap();
        assert_eq!(repo.get_value("k").unwrap(), None);

        repo.put_value("k", b"one").unwrap();
        repo.put_value("k", b"two").unwrap();
        assert_eq!(repo.get_value("k").unwrap().as_deref(), Some(&b"two"[..]));

        repo.delete_value("k").unwrap();
        assert_eq!(repo.get_value("k").unwrap(), None);
    }

    #[test]
    fn memory_store_fails_while_unavailable() {
        let repo = MemoryKvRepository::new();
        repo.set_unavailable(true);
        assert!(repo.put_value("k", b"v").is_err());
        assert!(repo.get_value("k").is_err());

        repo.set_unavailable(false);
        repo.put_value("k", b"v").unwrap();
        assert_eq!(repo.raw_value("k").as_deref(), Some(&b"v"[..]));
    }
}
