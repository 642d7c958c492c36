//! Persistent store boundary
//!
//! This module provides:
//! - The `SettingsStore` adapter trait every host implements once
//! - Change-event types delivered to every listening context
//! - In-memory and file-backed adapters
//!
//! The store is the only resource shared across execution contexts. It is
//! a flat key-value document with last-writer-wins semantics per key; no
//! transactions span multiple keys.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::broadcast;

/// Storage namespace. Only `Sync` participates in settings replication;
/// changes in other areas are ignored by the settings manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreArea {
    Sync,
    Local,
}

/// One key transition inside a change batch.
///
/// `new_value: None` means the key was removed (the merge invariant then
/// sends readers back to the compiled default).
#[derive(Debug, Clone, PartialEq)]
pub struct KeyChange {
    pub key: String,
    pub old_value: Option<Value>,
    pub new_value: Option<Value>,
}

/// A batch of key transitions committed together.
///
/// Per-key ordering follows store commit order; there is no ordering
/// guarantee across keys inside one batch.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeBatch {
    pub area: StoreArea,
    pub changes: Vec<KeyChange>,
}

/// Host-agnostic asynchronous store adapter.
///
/// Implemented once per host; everything else consumes this interface.
/// Writes that change nothing must not emit change events.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Read the full document.
    async fn get_all(&self) -> Result<serde_json::Map<String, Value>>;

    /// Write the given entries (merge, not replace). A `Null` value is
    /// stored as-is - it is a real value, not a removal.
    async fn set(&self, entries: serde_json::Map<String, Value>) -> Result<()>;

    /// Remove every key.
    async fn clear(&self) -> Result<()>;

    /// Subscribe to change batches. Every open receiver sees every batch,
    /// including batches caused by this handle's own writes.
    fn subscribe(&self) -> broadcast::Receiver<ChangeBatch>;
}

/// Diff two documents into the key changes an overwrite of `entries`
/// produces over `current`. Unchanged values yield no entry.
pub(crate) fn diff_entries(
    current: &serde_json::Map<String, Value>,
    entries: &serde_json::Map<String, Value>,
) -> Vec<KeyChange> {
    let mut changes = Vec::new();
    for (key, new_value) in entries {
        let old_value = current.get(key);
        if old_value == Some(new_value) {
            continue;
        }
        changes.push(KeyChange {
            key: key.clone(),
            old_value: old_value.cloned(),
            new_value: Some(new_value.clone()),
        });
    }
    changes
}
