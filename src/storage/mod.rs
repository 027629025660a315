//! Storage layer for decision history persistence.
//!
//! History is one JSON array, most-recent-first, kept under a single named
//! slot of a key-value store. It is read once at startup and rewritten in
//! full on every change.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStorage;

use async_trait::async_trait;
use tracing::warn;

use crate::error::StorageResult;
use crate::model::HistoryItem;

/// Slot name the history list is stored under.
pub const HISTORY_KEY: &str = "moral_tracks_history";

/// Persistence port for the history list.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Read the whole list. A missing slot is an empty list.
    async fn load_history(&self) -> StorageResult<Vec<HistoryItem>>;
    /// Overwrite the whole list.
    async fn save_history(&self, items: &[HistoryItem]) -> StorageResult<()>;
}

pub(crate) fn encode_history(items: &[HistoryItem]) -> StorageResult<String> {
    Ok(serde_json::to_string(items)?)
}

/// Unreadable history is reported and treated as empty.
pub(crate) fn decode_history(raw: &str) -> Vec<HistoryItem> {
    match serde_json::from_str(raw) {
        Ok(items) => items,
        Err(e) => {
            warn!(error = %e, "Failed to parse stored history, starting empty");
            Vec::new()
        }
    }
}
