//! Consultation store: the single source of truth for consultations.
//!
//! State lives in a `watch` channel so consumers can subscribe and
//! re-render on every change. Every mutation that changes the collection
//! serializes the full list and queues it for a single writer task, so
//! snapshots reach storage in mutation order. Storage failures are logged
//! and never reach callers; in-memory state stays authoritative.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDateTime;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use uuid::Uuid;

use crate::config::{CONSULTATIONS_KEY, INITIALIZED_KEY, INITIALIZED_SENTINEL};
use crate::db::KeyValueStore;
use crate::models::{Consultation, ConsultationInput, DateValue, TimeValue};
use crate::seed::seed_consultations;
use crate::views::{self, ConsultationTabs};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Invalid date (expected YYYY-MM-DD): {0}")]
    InvalidDate(String),

    #[error("Invalid time (expected HH:MM): {0}")]
    InvalidTime(String),

    #[error("Consultation {id} is canceled and cannot be rescheduled")]
    CanceledConsultation { id: String },

    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },
}

enum WriteCommand {
    Save(String),
    Flush(oneshot::Sender<()>),
}

pub type Snapshot = Arc<Vec<Consultation>>;

pub struct ConsultationStore {
    state: watch::Sender<Snapshot>,
    writes: mpsc::UnboundedSender<WriteCommand>,
}

impl ConsultationStore {
    /// Load (or bootstrap) the collection and start the writer task.
    ///
    /// Never fails: any storage problem yields an empty collection.
    /// Must be called from within a Tokio runtime.
    pub async fn initialize(kv: Arc<dyn KeyValueStore>) -> Self {
        let loader = Arc::clone(&kv);
        let initial = match tokio::task::spawn_blocking(move || load_or_seed(loader.as_ref())).await
        {
            Ok(consultations) => consultations,
            Err(e) => {
                tracing::error!("Consultation load task failed: {e}");
                Vec::new()
            }
        };

        let (state, _) = watch::channel(Arc::new(initial));
        let (writes, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_writer(kv, rx));

        Self { state, writes }
    }

    // ── Reads ───────────────────────────────────────────────

    /// Current snapshot (insertion order).
    pub fn consultations(&self) -> Snapshot {
        Arc::clone(&self.state.borrow())
    }

    /// Receiver notified after every successful mutation.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.state.subscribe()
    }

    pub fn get_by_id(&self, id: &str) -> Option<Consultation> {
        self.state.borrow().iter().find(|c| c.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.state.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().is_empty()
    }

    // ── Derived views ───────────────────────────────────────

    pub fn sorted(&self) -> Vec<Consultation> {
        views::sorted(&self.state.borrow())
    }

    pub fn tabs(&self, now: NaiveDateTime) -> ConsultationTabs {
        views::tabs(&self.state.borrow(), now)
    }

    pub fn upcoming_count(&self, now: NaiveDateTime) -> Option<usize> {
        views::upcoming_count(&self.state.borrow(), now)
    }

    // ── Mutations ───────────────────────────────────────────

    /// Append a new consultation and return its freshly assigned id.
    pub fn add(&self, input: ConsultationInput) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        let consultation = input.into_consultation(id.clone())?;
        self.mutate(|list| {
            list.push(consultation);
            true
        });
        tracing::debug!(id = %id, "Consultation added");
        Ok(id)
    }

    /// Delete by id. Returns false (no-op) when absent.
    pub fn remove(&self, id: &str) -> bool {
        let removed = self.mutate(|list| {
            let before = list.len();
            list.retain(|c| c.id != id);
            list.len() != before
        });
        if removed {
            tracing::debug!(id, "Consultation removed");
        }
        removed
    }

    /// Mark as canceled. Returns false when absent or already canceled.
    pub fn cancel(&self, id: &str) -> bool {
        let canceled = self.mutate(|list| match list.iter_mut().find(|c| c.id == id) {
            Some(c) if !c.canceled => {
                c.canceled = true;
                true
            }
            _ => false,
        });
        if canceled {
            tracing::debug!(id, "Consultation canceled");
        }
        canceled
    }

    /// Move to a new date/time. Returns `Ok(false)` when absent or unchanged.
    ///
    /// Canceled consultations are rejected with `CanceledConsultation`.
    pub fn reschedule(
        &self,
        id: &str,
        date: impl Into<DateValue>,
        time: impl Into<TimeValue>,
    ) -> Result<bool, StoreError> {
        let date = date.into().normalize()?;
        let time = time.into().normalize()?;

        let mut outcome = Ok(false);
        self.mutate(|list| match list.iter_mut().find(|c| c.id == id) {
            None => false,
            Some(c) if c.canceled => {
                outcome = Err(StoreError::CanceledConsultation { id: id.to_string() });
                false
            }
            Some(c) if c.date == date && c.time == time => false,
            Some(c) => {
                c.date = date;
                c.time = time;
                outcome = Ok(true);
                true
            }
        });

        match &outcome {
            Ok(true) => tracing::debug!(id, "Consultation rescheduled"),
            Err(e) => tracing::warn!(id, "Reschedule rejected: {e}"),
            Ok(false) => {}
        }
        outcome
    }

    /// Wait until every write queued so far has been attempted.
    pub async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        if self.writes.send(WriteCommand::Flush(done)).is_err() {
            return;
        }
        let _ = wait.await;
    }

    // ── Internals ───────────────────────────────────────────

    /// Apply `f` under the state lock; on change, publish and queue a save.
    fn mutate<F>(&self, f: F) -> bool
    where
        F: FnOnce(&mut Vec<Consultation>) -> bool,
    {
        self.state.send_if_modified(|snapshot| {
            let list = Arc::make_mut(snapshot);
            if !f(list) {
                return false;
            }
            self.enqueue_save(list);
            true
        })
    }

    fn enqueue_save(&self, list: &[Consultation]) {
        let payload = match serde_json::to_string(list) {
            Ok(p) => p,
            Err(e) => {
                tracing::error!("Failed to serialize consultations: {e}");
                return;
            }
        };
        if self.writes.send(WriteCommand::Save(payload)).is_err() {
            tracing::warn!("Consultation writer stopped; change kept in memory only");
        }
    }
}

async fn run_writer(kv: Arc<dyn KeyValueStore>, mut rx: mpsc::UnboundedReceiver<WriteCommand>) {
    while let Some(command) = rx.recv().await {
        match command {
            WriteCommand::Save(payload) => {
                let kv = Arc::clone(&kv);
                let bytes = payload.len();
                let result =
                    tokio::task::spawn_blocking(move || kv.set(CONSULTATIONS_KEY, &payload)).await;
                match result {
                    Ok(Ok(())) => tracing::debug!(bytes, "Consultations persisted"),
                    Ok(Err(e)) => tracing::warn!("Failed to persist consultations: {e}"),
                    Err(e) => tracing::error!("Consultation write task failed: {e}"),
                }
            }
            WriteCommand::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    tracing::debug!("Consultation writer stopped");
}

// ═══════════════════════════════════════════════════════════
// Initialization protocol
// ═══════════════════════════════════════════════════════════

/// First run: write the seed dataset plus the marker and adopt the seed.
/// Later runs: adopt the saved collection, or an empty one when it is
/// missing, unreadable or corrupt. Never returns the seed on a failed read.
pub(crate) fn load_or_seed(kv: &dyn KeyValueStore) -> Vec<Consultation> {
    match kv.get(INITIALIZED_KEY) {
        Ok(Some(_)) => load_saved(kv),
        Ok(None) => bootstrap(kv),
        Err(e) => {
            tracing::warn!("Cannot read initialization marker, starting empty: {e}");
            Vec::new()
        }
    }
}

fn bootstrap(kv: &dyn KeyValueStore) -> Vec<Consultation> {
    let seed = seed_consultations();
    match serde_json::to_string(&seed) {
        Ok(payload) => {
            if let Err(e) = kv.set(CONSULTATIONS_KEY, &payload) {
                tracing::warn!("Failed to write seed consultations: {e}");
            } else if let Err(e) = kv.set(INITIALIZED_KEY, INITIALIZED_SENTINEL) {
                tracing::warn!("Failed to write initialization marker: {e}");
            }
        }
        Err(e) => tracing::error!("Failed to serialize seed consultations: {e}"),
    }
    tracing::info!(count = seed.len(), "First run: seeded consultations");
    seed
}

fn load_saved(kv: &dyn KeyValueStore) -> Vec<Consultation> {
    let raw = match kv.get(CONSULTATIONS_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::info!("No saved consultations, starting empty");
            return Vec::new();
        }
        Err(e) => {
            tracing::warn!("Cannot read saved consultations, starting empty: {e}");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<Consultation>>(&raw) {
        Ok(consultations) => {
            let consultations = dedupe_ids(consultations)
                .into_iter()
                .map(normalize_loaded)
                .collect::<Vec<_>>();
            tracing::info!(count = consultations.len(), "Loaded saved consultations");
            consultations
        }
        Err(e) => {
            tracing::warn!("Saved consultations are corrupt, starting empty: {e}");
            Vec::new()
        }
    }
}

/// Re-encode stored date/time in canonical form; unparseable fields stay raw.
fn normalize_loaded(mut c: Consultation) -> Consultation {
    if let Ok(date) = DateValue::Text(c.date.clone()).normalize() {
        c.date = date;
    }
    if let Ok(time) = TimeValue::Text(c.time.clone()).normalize() {
        c.time = time;
    }
    c
}

/// Keep the first record for each id.
fn dedupe_ids(consultations: Vec<Consultation>) -> Vec<Consultation> {
    let mut seen = HashSet::new();
    let total = consultations.len();
    let unique: Vec<Consultation> = consultations
        .into_iter()
        .filter(|c| seen.insert(c.id.clone()))
        .collect();
    if unique.len() != total {
        tracing::warn!(dropped = total - unique.len(), "Dropped consultations with duplicate ids");
    }
    unique
}
