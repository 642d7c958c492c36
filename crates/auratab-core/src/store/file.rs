//! File-backed store adapter
//!
//! Persists the settings document as a JSON file and watches it for
//! external writes, so another process sharing the file (another running
//! instance) is observed exactly like a remote change batch from the
//! host's synchronized storage.

use super::{diff_entries, ChangeBatch, KeyChange, SettingsStore, StoreArea};
use crate::error::{Error, Result, StoreError};
use async_trait::async_trait;
use notify_debouncer_mini::{
    new_debouncer, notify::RecommendedWatcher, notify::RecursiveMode, DebounceEventResult,
    Debouncer,
};
use parking_lot::Mutex;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

const CHANGE_CHANNEL_CAPACITY: usize = 256;

/// Debounce interval for file change events. Editors and other writers
/// often produce several events per save; this batches them into one
/// reload.
const FILE_CHANGE_DEBOUNCE_MS: u64 = 250;

struct FileStoreInner {
    path: PathBuf,
    values: Mutex<serde_json::Map<String, Value>>,
    changes: broadcast::Sender<ChangeBatch>,
}

/// Settings store persisted as a single JSON document on disk.
#[derive(Clone)]
pub struct FileStore {
    inner: Arc<FileStoreInner>,
    _debouncer: Arc<Mutex<Debouncer<RecommendedWatcher>>>,
}

impl FileStore {
    /// Open (or create) the store at `path` and start watching it.
    ///
    /// An existing file that fails to parse is an error, not a silent
    /// fallback - callers decide whether to degrade to defaults.
    pub fn open(path: impl AsRef<Path>) -> Result<FileStore> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let values = if path.exists() {
            read_document(&path)?
        } else {
            serde_json::Map::new()
        };

        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        let inner = Arc::new(FileStoreInner {
            path: path.clone(),
            values: Mutex::new(values),
            changes,
        });

        let debouncer = Self::start_watcher(Arc::clone(&inner))?;
        info!("settings store opened at {}", path.display());

        Ok(FileStore {
            inner,
            _debouncer: Arc::new(Mutex::new(debouncer)),
        })
    }

    /// Default per-user location for the settings document.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("auratab/settings.json")
    }

    fn start_watcher(inner: Arc<FileStoreInner>) -> Result<Debouncer<RecommendedWatcher>> {
        // Canonicalize via the parent directory (the file itself may not
        // exist yet) so event paths from the watcher compare equal.
        let watch_dir = inner
            .path
            .parent()
            .map(|parent| parent.canonicalize().unwrap_or_else(|_| parent.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."));
        let watched_file = match inner.path.file_name() {
            Some(name) => watch_dir.join(name),
            None => inner.path.clone(),
        };

        let handler_inner = Arc::clone(&inner);
        let handler_file = watched_file.clone();
        let mut debouncer = new_debouncer(
            Duration::from_millis(FILE_CHANGE_DEBOUNCE_MS),
            move |result: DebounceEventResult| match result {
                Ok(events) => {
                    if events.iter().any(|e| e.path == handler_file) {
                        debug!("settings file change detected");
                        Self::reload_from_disk(&handler_inner);
                    }
                }
                Err(err) => warn!("settings file watcher error: {err}"),
            },
        )
        .map_err(|e| Error::Store(StoreError::Watch(e.to_string())))?;

        debouncer
            .watcher()
            .watch(&watch_dir, RecursiveMode::NonRecursive)
            .map_err(|e| Error::Store(StoreError::Watch(e.to_string())))?;

        Ok(debouncer)
    }

    /// Reload after an on-disk change, diffing against the cached view.
    /// Our own writes update the cache first, so they diff to nothing here.
    fn reload_from_disk(inner: &Arc<FileStoreInner>) {
        let document = match read_document(&inner.path) {
            Ok(document) => document,
            Err(err) => {
                warn!("ignoring unreadable settings file: {err}");
                return;
            }
        };

        let changes = {
            let mut values = inner.values.lock();
            let mut changes = diff_entries(&values, &document);
            for (key, old_value) in values.iter() {
                if !document.contains_key(key) {
                    changes.push(KeyChange {
                        key: key.clone(),
                        old_value: Some(old_value.clone()),
                        new_value: None,
                    });
                }
            }
            *values = document;
            changes
        };

        if !changes.is_empty() {
            let _ = inner.changes.send(ChangeBatch {
                area: StoreArea::Sync,
                changes,
            });
        }
    }

    fn publish(&self, changes: Vec<KeyChange>) {
        if changes.is_empty() {
            return;
        }
        let _ = self.inner.changes.send(ChangeBatch {
            area: StoreArea::Sync,
            changes,
        });
    }
}

fn read_document(path: &Path) -> Result<serde_json::Map<String, Value>> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| Error::Store(StoreError::ReadFailed(e.to_string())))?;
    if raw.trim().is_empty() {
        return Ok(serde_json::Map::new());
    }
    let value: Value = serde_json::from_str(&raw)
        .map_err(|e| Error::Store(StoreError::ReadFailed(e.to_string())))?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(Error::Store(StoreError::ReadFailed(format!(
            "settings document must be a JSON object, found {other}"
        )))),
    }
}

async fn write_document(path: &Path, document: &serde_json::Map<String, Value>) -> Result<()> {
    let serialized = serde_json::to_string_pretty(&Value::Object(document.clone()))?;
    tokio::fs::write(path, serialized)
        .await
        .map_err(|e| Error::Store(StoreError::WriteFailed(e.to_string())))
}

#[async_trait]
impl SettingsStore for FileStore {
    async fn get_all(&self) -> Result<serde_json::Map<String, Value>> {
        Ok(self.inner.values.lock().clone())
    }

    async fn set(&self, entries: serde_json::Map<String, Value>) -> Result<()> {
        let (changes, document, previous) = {
            let mut values = self.inner.values.lock();
            let changes = diff_entries(&values, &entries);
            if changes.is_empty() {
                return Ok(());
            }
            let previous = values.clone();
            for change in &changes {
                if let Some(new_value) = &change.new_value {
                    values.insert(change.key.clone(), new_value.clone());
                }
            }
            (changes, values.clone(), previous)
        };

        match write_document(&self.inner.path, &document).await {
            Ok(()) => {
                self.publish(changes);
                Ok(())
            }
            Err(err) => {
                *self.inner.values.lock() = previous;
                Err(err)
            }
        }
    }

    async fn clear(&self) -> Result<()> {
        let (changes, previous) = {
            let mut values = self.inner.values.lock();
            let changes: Vec<KeyChange> = values
                .iter()
                .map(|(key, old_value)| KeyChange {
                    key: key.clone(),
                    old_value: Some(old_value.clone()),
                    new_value: None,
                })
                .collect();
            let previous = std::mem::take(&mut *values);
            (changes, previous)
        };

        match write_document(&self.inner.path, &serde_json::Map::new()).await {
            Ok(()) => {
                self.publish(changes);
                Ok(())
            }
            Err(err) => {
                *self.inner.values.lock() = previous;
                Err(err)
            }
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<ChangeBatch> {
        self.inner.changes.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entries(value: serde_json::Value) -> serde_json::Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        {
            let store = FileStore::open(&path).unwrap();
            store
                .set(entries(serde_json::json!({"theme": "aurora"})))
                .await
                .unwrap();
        }

        let reopened = FileStore::open(&path).unwrap();
        let all = reopened.get_all().await.unwrap();
        assert_eq!(all.get("theme"), Some(&serde_json::json!("aurora")));
    }

    #[tokio::test]
    async fn test_open_rejects_corrupt_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "not json at all").unwrap();

        assert!(FileStore::open(&path).is_err());
    }

    #[tokio::test]
    async fn test_own_writes_emit_one_local_batch() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("settings.json")).unwrap();

        let mut rx = store.subscribe();
        store
            .set(entries(serde_json::json!({"showDate": false})))
            .await
            .unwrap();

        let batch = rx.recv().await.unwrap();
        assert_eq!(batch.changes.len(), 1);
        assert_eq!(batch.changes[0].key, "showDate");
    }

    #[tokio::test]
    async fn test_external_edit_surfaces_as_change_batch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let store = FileStore::open(&path).unwrap();
        store
            .set(entries(serde_json::json!({"theme": "mint", "showDay": true})))
            .await
            .unwrap();

        let mut rx = store.subscribe();

        // Another process rewrites the document: one key changed, one kept.
        std::fs::write(
            &path,
            serde_json::to_string_pretty(&serde_json::json!({
                "theme": "ocean",
                "showDay": true
            }))
            .unwrap(),
        )
        .unwrap();

        let batch = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("watcher should report the external edit")
            .unwrap();
        assert_eq!(batch.changes.len(), 1);
        assert_eq!(batch.changes[0].key, "theme");
        assert_eq!(batch.changes[0].new_value, Some(serde_json::json!("ocean")));

        let all = store.get_all().await.unwrap();
        assert_eq!(all.get("theme"), Some(&serde_json::json!("ocean")));
    }
}
