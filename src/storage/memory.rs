use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{decode_history, encode_history, HistoryStore};
use crate::error::StorageResult;
use crate::model::HistoryItem;

/// In-process history store.
///
/// Keeps the serialized slot rather than the items so that reads go through
/// the same JSON encoding as the SQLite store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: RwLock<Option<String>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose slot already holds `raw`.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: RwLock::new(Some(raw.into())),
        }
    }

    /// Current raw slot contents.
    pub async fn raw(&self) -> Option<String> {
        self.slot.read().await.clone()
    }
}

#[async_trait]
impl HistoryStore for MemoryStore {
    async fn load_history(&self) -> StorageResult<Vec<HistoryItem>> {
        Ok(self
            .slot
            .read()
            .await
            .as_deref()
            .map(decode_history)
            .unwrap_or_default())
    }

    async fn save_history(&self, items: &[HistoryItem]) -> StorageResult<()> {
        let raw = encode_history(items)?;
        *self.slot.write().await = Some(raw);
        Ok(())
    }
}
