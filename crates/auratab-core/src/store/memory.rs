//! In-memory store hub
//!
//! Clones of a `MemoryStore` share one document and one change channel,
//! which is exactly the shape of the host's synchronized storage area as
//! seen from several execution contexts of the same profile. Used by the
//! test harness and by in-process simulation.

use super::{diff_entries, ChangeBatch, KeyChange, SettingsStore, StoreArea};
use crate::error::Result;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::broadcast;

const CHANGE_CHANNEL_CAPACITY: usize = 256;

struct MemoryStoreInner {
    values: RwLock<serde_json::Map<String, Value>>,
    changes: broadcast::Sender<ChangeBatch>,
}

/// Shared in-memory settings store.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<MemoryStoreInner>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        MemoryStore {
            inner: Arc::new(MemoryStoreInner {
                values: RwLock::new(serde_json::Map::new()),
                changes,
            }),
        }
    }

    /// Seed the store with existing entries (a profile that has synced
    /// before). No change events are emitted for seeding.
    pub fn with_entries(entries: serde_json::Map<String, Value>) -> MemoryStore {
        let store = MemoryStore::new();
        *store.inner.values.write() = entries;
        store
    }

    fn publish(&self, changes: Vec<KeyChange>) {
        if changes.is_empty() {
            return;
        }
        // Send only fails when no context is listening yet; that is fine.
        let _ = self.inner.changes.send(ChangeBatch {
            area: StoreArea::Sync,
            changes,
        });
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        MemoryStore::new()
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn get_all(&self) -> Result<serde_json::Map<String, Value>> {
        Ok(self.inner.values.read().clone())
    }

    async fn set(&self, entries: serde_json::Map<String, Value>) -> Result<()> {
        let changes = {
            let mut values = self.inner.values.write();
            let changes = diff_entries(&values, &entries);
            for change in &changes {
                if let Some(new_value) = &change.new_value {
                    values.insert(change.key.clone(), new_value.clone());
                }
            }
            changes
        };
        self.publish(changes);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let changes = {
            let mut values = self.inner.values.write();
            let changes: Vec<KeyChange> = values
                .iter()
                .map(|(key, old_value)| KeyChange {
                    key: key.clone(),
                    old_value: Some(old_value.clone()),
                    new_value: None,
                })
                .collect();
            values.clear();
            changes
        };
        self.publish(changes);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<ChangeBatch> {
        self.inner.changes.subscribe()
    }
}
