pub mod kv;
pub mod sqlite;

pub use kv::*;
pub use sqlite::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },

    #[error("Storage lock poisoned")]
    LockPoisoned,

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}
