//! Application state shared by every screen.
//!
//! `CoreState` is created once at startup and handed to consumers by
//! reference. It starts empty; `start` opens storage and installs the
//! initialized `ConsultationStore`. Reaching for the store before that
//! is a wiring bug and surfaces as `CoreError::StoreNotInitialized`.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use crate::config;
use crate::db::{KeyValueStore, SqliteKvStore, StorageError};
use crate::store::ConsultationStore;

// ═══════════════════════════════════════════════════════════
// CoreState
// ═══════════════════════════════════════════════════════════

pub struct CoreState {
    /// Initialized store. `None` until `start`/`start_with` completes.
    store: RwLock<Option<Arc<ConsultationStore>>>,
    /// File backing the key-value store.
    pub database_path: PathBuf,
}

impl CoreState {
    /// Create a new CoreState pointing at the default database path.
    pub fn new() -> Self {
        Self::with_database_path(config::database_path())
    }

    pub fn with_database_path(database_path: PathBuf) -> Self {
        Self {
            store: RwLock::new(None),
            database_path,
        }
    }

    /// Open the SQLite key-value store and initialize the consultation store.
    ///
    /// Only opening the database can fail; loading itself never does.
    pub async fn start(&self) -> Result<Arc<ConsultationStore>, CoreError> {
        let path = self.database_path.clone();
        let kv = tokio::task::spawn_blocking(move || SqliteKvStore::open(&path))
            .await
            .map_err(|e| CoreError::Startup(e.to_string()))??;
        tracing::info!(path = %self.database_path.display(), "Consultation database opened");
        self.start_with(Arc::new(kv)).await
    }

    /// Initialize against an arbitrary persistence collaborator.
    pub async fn start_with(
        &self,
        kv: Arc<dyn KeyValueStore>,
    ) -> Result<Arc<ConsultationStore>, CoreError> {
        if let Some(existing) = self.store.read().map_err(|_| CoreError::LockPoisoned)?.as_ref() {
            tracing::debug!("Consultation store already started");
            return Ok(Arc::clone(existing));
        }

        let store = Arc::new(ConsultationStore::initialize(kv).await);

        let mut guard = self.store.write().map_err(|_| CoreError::LockPoisoned)?;
        // A concurrent start may have won the race; keep the first store.
        let installed = guard.get_or_insert_with(|| Arc::clone(&store));
        Ok(Arc::clone(installed))
    }

    /// The initialized store.
    pub fn store(&self) -> Result<Arc<ConsultationStore>, CoreError> {
        let guard = self.store.read().map_err(|_| CoreError::LockPoisoned)?;
        guard.as_ref().cloned().ok_or(CoreError::StoreNotInitialized)
    }

    pub fn is_started(&self) -> bool {
        self.store
            .read()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }

    /// Wait for pending writes, then drop the store.
    pub async fn shutdown(&self) {
        let store = match self.store.write() {
            Ok(mut guard) => guard.take(),
            Err(_) => None,
        };
        if let Some(store) = store {
            store.flush().await;
            tracing::info!("Consultation store stopped");
        }
    }
}

impl Default for CoreState {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════
// CoreError
// ═══════════════════════════════════════════════════════════

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Consultation store used before initialization")]
    StoreNotInitialized,

    #[error("Internal lock error")]
    LockPoisoned,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Startup failed: {0}")]
    Startup(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryKvStore;
    use crate::seed::seed_consultations;

    #[test]
    fn store_before_start_is_an_error() {
        let state = CoreState::with_database_path(PathBuf::from("unused.db"));
        assert!(!state.is_started());
        assert!(matches!(state.store(), Err(CoreError::StoreNotInitialized)));
    }

    #[tokio::test]
    async fn start_with_installs_store() {
        let state = CoreState::with_database_path(PathBuf::from("unused.db"));
        state.start_with(Arc::new(MemoryKvStore::new())).await.unwrap();
        assert!(state.is_started());
        assert_eq!(state.store().unwrap().len(), seed_consultations().len());
    }

    #[tokio::test]
    async fn second_start_reuses_first_store() {
        let state = CoreState::with_database_path(PathBuf::from("unused.db"));
        let first = state.start_with(Arc::new(MemoryKvStore::new())).await.unwrap();
        first.remove("1");
        let second = state.start_with(Arc::new(MemoryKvStore::new())).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn start_opens_database_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("mediconsult.db");
        let state = CoreState::with_database_path(path.clone());
        state.start().await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn shutdown_clears_store() {
        let state = CoreState::with_database_path(PathBuf::from("unused.db"));
        state.start_with(Arc::new(MemoryKvStore::new())).await.unwrap();
        state.shutdown().await;
        assert!(matches!(state.store(), Err(CoreError::StoreNotInitialized)));
    }
}
