//! Local history of analysis results.
//!
//! The whole history is one JSON array stored under [`HISTORY_KEY`],
//! newest entry first. Every operation reads the full collection, changes
//! it, and writes it back. That is a single read-then-write against one
//! key. Writers in other processes are not coordinated: the last write
//! wins.
//!
//! Persistence is best-effort. Backend failures are logged with `tracing`
//! and never returned to the caller, so a full disk or a locked database
//! cannot block the analyze workflow. Stored data that fails to decode is
//! treated as an empty history.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{debug, warn};

use crate::models::{AnalysisResult, SavedEntry};
use crate::store::KeyValueStore;

/// Storage key of the serialized history collection.
pub const HISTORY_KEY: &str = "ai_feedback_results";

/// Why a stored collection could not be loaded.
enum LoadError {
    /// The backend itself failed; the stored bytes are unknown.
    Backend(anyhow::Error),
    /// The stored bytes are not a valid collection.
    Corrupt(serde_json::Error),
}

/// Persistent, ordered history of [`SavedEntry`] values.
#[derive(Clone)]
pub struct HistoryStore {
    backend: Arc<dyn KeyValueStore>,
    key: String,
}

impl HistoryStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(backend, HISTORY_KEY)
    }

    /// A history stored under a non-default key.
    pub fn with_key(backend: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Record a successful analysis at the head of the history.
    ///
    /// The returned entry is produced even when the durable write fails.
    /// Callers that need durability must read it back with
    /// [`get_result`](Self::get_result).
    pub async fn save_result(&self, text: &str, result: &AnalysisResult) -> SavedEntry {
        let loaded = self.load().await;

        let existing = match &loaded {
            Ok(entries) => entries.as_slice(),
            Err(_) => &[],
        };
        let entry = SavedEntry {
            id: fresh_id(existing),
            text: text.to_string(),
            result: result.clone(),
            timestamp: Utc::now().timestamp_millis(),
        };

        let mut entries = match loaded {
            Ok(entries) => entries,
            Err(LoadError::Corrupt(e)) => {
                warn!(key = %self.key, error = %e, "discarding unreadable history");
                Vec::new()
            }
            Err(LoadError::Backend(e)) => {
                // Writing now could overwrite history we failed to read.
                warn!(key = %self.key, error = %e, "history read failed; result not saved");
                return entry;
            }
        };

        entries.insert(0, entry.clone());
        if let Err(e) = self.persist(&entries).await {
            warn!(key = %self.key, error = %e, "failed to save result to history");
        } else {
            debug!(id = %entry.id, total = entries.len(), "saved result to history");
        }
        entry
    }

    /// All saved entries, newest first. Empty when nothing is stored or the
    /// stored data cannot be read.
    pub async fn get_results(&self) -> Vec<SavedEntry> {
        match self.load().await {
            Ok(entries) => entries,
            Err(LoadError::Backend(e)) => {
                warn!(key = %self.key, error = %e, "failed to read history");
                Vec::new()
            }
            Err(LoadError::Corrupt(e)) => {
                warn!(key = %self.key, error = %e, "stored history is unreadable; treating as empty");
                Vec::new()
            }
        }
    }

    /// Look up one entry by id.
    pub async fn get_result(&self, id: &str) -> Option<SavedEntry> {
        self.get_results().await.into_iter().find(|e| e.id == id)
    }

    /// Remove the entry with `id`. Removing an id that is not present
    /// changes nothing and is not an error.
    pub async fn delete_result(&self, id: &str) {
        let mut entries = self.get_results().await;
        let before = entries.len();
        entries.retain(|e| e.id != id);
        if entries.len() == before {
            debug!(id, "delete: no matching history entry");
            return;
        }
        if let Err(e) = self.persist(&entries).await {
            warn!(key = %self.key, id, error = %e, "failed to delete result from history");
        }
    }

    /// Remove the whole stored collection.
    pub async fn clear_results(&self) {
        if let Err(e) = self.backend.remove(&self.key).await {
            warn!(key = %self.key, error = %e, "failed to clear history");
        }
    }

    async fn load(&self) -> std::result::Result<Vec<SavedEntry>, LoadError> {
        let raw = self
            .backend
            .get(&self.key)
            .await
            .map_err(LoadError::Backend)?;
        match raw {
            None => Ok(Vec::new()),
            Some(raw) => serde_json::from_str(&raw).map_err(LoadError::Corrupt),
        }
    }

    async fn persist(&self, entries: &[SavedEntry]) -> Result<()> {
        let json = serde_json::to_string(entries).context("failed to serialize history")?;
        self.backend.set(&self.key, &json).await
    }
}

/// A random id not used by any entry in `existing`.
fn fresh_id(existing: &[SavedEntry]) -> String {
    loop {
        let id = uuid::Uuid::new_v4().simple().to_string();
        if !existing.iter().any(|e| e.id == id) {
            return id;
        }
    }
}
