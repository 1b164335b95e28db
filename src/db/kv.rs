//! Key-value persistence collaborator.
//!
//! The consultation store only needs `get`/`set` on string payloads.
//! `SqliteKvStore` is the on-device implementation; `MemoryKvStore`
//! backs tests and throwaway sessions.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension};

use super::{open_database, open_memory_database, StorageError};

/// Opaque string key-value storage. Both operations may fail.
pub trait KeyValueStore: Send + Sync {
    /// Raw payload stored under `key`, or `None` when the key is unset.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the payload stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

// ═══════════════════════════════════════════════════════════
// SQLite
// ═══════════════════════════════════════════════════════════

/// SQLite-backed key-value store (`kv_store` table).
pub struct SqliteKvStore {
    conn: Mutex<Connection>,
}

impl SqliteKvStore {
    /// Open (or create) the database file at `path`.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        Ok(Self::from_connection(open_database(path)?))
    }

    /// In-memory database, gone when the store is dropped.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        Ok(Self::from_connection(open_memory_database()?))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

impl KeyValueStore for SqliteKvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let conn = self.conn.lock().map_err(|_| StorageError::LockPoisoned)?;
        let value = conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let conn = self.conn.lock().map_err(|_| StorageError::LockPoisoned)?;
        conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, datetime('now'))
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value],
        )?;
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════
// In-memory
// ═══════════════════════════════════════════════════════════

/// `HashMap`-backed store.
#[derive(Default)]
pub struct MemoryKvStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().map_err(|_| StorageError::LockPoisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::LockPoisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_get_missing_returns_none() {
        let kv = MemoryKvStore::new();
        assert!(kv.get("nothing").unwrap().is_none());
    }

    #[test]
    fn memory_set_overwrites() {
        let kv = MemoryKvStore::new();
        kv.set("k", "one").unwrap();
        kv.set("k", "two").unwrap();
        assert_eq!(kv.get("k").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn sqlite_get_missing_returns_none() {
        let kv = SqliteKvStore::open_in_memory().unwrap();
        assert!(kv.get("consultations").unwrap().is_none());
    }

    #[test]
    fn sqlite_set_is_upsert() {
        let kv = SqliteKvStore::open_in_memory().unwrap();
        kv.set("consultations", "[]").unwrap();
        kv.set("consultations", "[{\"id\":\"1\"}]").unwrap();
        assert_eq!(
            kv.get("consultations").unwrap().as_deref(),
            Some("[{\"id\":\"1\"}]")
        );

        let rows: i64 = kv
            .conn
            .lock()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM kv_store", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn sqlite_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kv.db");
        {
            let kv = SqliteKvStore::open(&path).unwrap();
            kv.set("consultations_initialized", "true").unwrap();
        }
        let kv = SqliteKvStore::open(&path).unwrap();
        assert_eq!(
            kv.get("consultations_initialized").unwrap().as_deref(),
            Some("true")
        );
    }
}
