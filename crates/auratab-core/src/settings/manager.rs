//! Per-context settings manager
//!
//! One `SettingsManager` is constructed per execution context over an
//! injected store adapter, and is the only component allowed to mutate
//! that context's snapshot. Mutations arrive through the local write API
//! (`set`/`update`/`reset`) or by folding remote change batches from the
//! store; both paths notify local subscribers exactly once per batch.

use super::schema;
use super::snapshot::SettingsSnapshot;
use crate::error::{Result, SettingsError};
use crate::store::{ChangeBatch, SettingsStore, StoreArea};
use crate::types::{SettingKey, SettingValue};
use parking_lot::{Mutex, RwLock};
use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::broadcast;
use tracing::{debug, error, warn};

/// Notification delivered to subscribers after every applied change.
///
/// Carries both the full merged snapshot and the changed subset, so
/// consumers can either re-derive everything or react per key. A batched
/// `update` produces exactly one event covering all of its keys.
#[derive(Debug, Clone)]
pub struct SettingsEvent {
    pub snapshot: SettingsSnapshot,
    pub changed: BTreeMap<SettingKey, SettingValue>,
}

type ListenerCallback = Box<dyn Fn(&SettingsEvent) + Send + Sync>;

struct ListenerSet {
    entries: Mutex<Vec<(u64, Arc<ListenerCallback>)>>,
    next_id: AtomicU64,
}

impl ListenerSet {
    fn new() -> Arc<ListenerSet> {
        Arc::new(ListenerSet {
            entries: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        })
    }

    fn add(self: &Arc<Self>, callback: ListenerCallback) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.entries.lock().push((id, Arc::new(callback)));
        Subscription {
            set: Arc::downgrade(self),
            id,
        }
    }

    fn remove(&self, id: u64) {
        self.entries.lock().retain(|(entry_id, _)| *entry_id != id);
    }

    fn notify(&self, event: &SettingsEvent) {
        // Snapshot the callback list so subscribers can unsubscribe (or
        // subscribe) from inside a notification without deadlocking.
        let callbacks: Vec<Arc<ListenerCallback>> = self
            .entries
            .lock()
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();

        for callback in callbacks {
            // A panicking subscriber must not prevent the others from
            // seeing the change or corrupt the snapshot.
            if catch_unwind(AssertUnwindSafe(|| (callback.as_ref())(event))).is_err() {
                error!("settings subscriber panicked; continuing with remaining subscribers");
            }
        }
    }
}

/// Subscription guard returned by `SettingsManager::subscribe`.
/// Dropping it unregisters the callback.
pub struct Subscription {
    set: Weak<ListenerSet>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(set) = self.set.upgrade() {
            set.remove(self.id);
        }
    }
}

struct ManagerState {
    snapshot: SettingsSnapshot,
    ready: bool,
}

/// Single source of truth, per execution context, for the current
/// settings snapshot.
pub struct SettingsManager {
    store: Arc<dyn SettingsStore>,
    state: RwLock<ManagerState>,
    listeners: Arc<ListenerSet>,
    init_lock: tokio::sync::Mutex<bool>,
    fold_task: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl SettingsManager {
    pub fn new(store: Arc<dyn SettingsStore>) -> SettingsManager {
        SettingsManager {
            store,
            state: RwLock::new(ManagerState {
                snapshot: SettingsSnapshot::defaults(),
                ready: false,
            }),
            listeners: ListenerSet::new(),
            init_lock: tokio::sync::Mutex::new(false),
            fold_task: Mutex::new(None),
        }
    }

    /// Read the store once, merge with compiled defaults, and begin
    /// folding remote change batches.
    ///
    /// Idempotent: a second call returns the cached snapshot. Fails soft:
    /// if the store read fails the manager still becomes ready on pure
    /// defaults, so the context is never left half-initialized.
    pub async fn init(self: &Arc<Self>) -> SettingsSnapshot {
        let mut initialized = self.init_lock.lock().await;
        if *initialized {
            return self.snapshot();
        }

        let snapshot = match self.store.get_all().await {
            Ok(raw) => SettingsSnapshot::from_stored(&raw),
            Err(err) => {
                warn!("settings store read failed, falling back to defaults: {err}");
                SettingsSnapshot::defaults()
            }
        };

        {
            let mut state = self.state.write();
            state.snapshot = snapshot.clone();
            state.ready = true;
        }

        self.spawn_fold_task();
        *initialized = true;
        debug!("settings manager initialized");
        snapshot
    }

    fn spawn_fold_task(self: &Arc<Self>) {
        let weak = Arc::downgrade(self);
        let mut rx = self.store.subscribe();

        let handle = tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(batch) => {
                        let Some(manager) = weak.upgrade() else { break };
                        manager.fold_remote_batch(batch);
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("settings change stream lagged, resyncing ({skipped} batches lost)");
                        let Some(manager) = weak.upgrade() else { break };
                        manager.resync().await;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        *self.fold_task.lock() = Some(handle);
    }

    /// Stop folding remote changes. Also invoked on drop.
    pub fn shutdown(&self) {
        if let Some(handle) = self.fold_task.lock().take() {
            handle.abort();
        }
    }

    pub fn is_ready(&self) -> bool {
        self.state.read().ready
    }

    /// Cached value for `key`; the compiled default before `init`.
    /// Never touches the store.
    pub fn get(&self, key: SettingKey) -> SettingValue {
        let state = self.state.read();
        if state.ready {
            state.snapshot.get(key).clone()
        } else {
            schema::default_value(key)
        }
    }

    /// Cached value for `key`, or `fallback` if the manager is not yet
    /// initialized.
    pub fn get_or(&self, key: SettingKey, fallback: SettingValue) -> SettingValue {
        let state = self.state.read();
        if state.ready {
            state.snapshot.get(key).clone()
        } else {
            fallback
        }
    }

    /// Clone of the current snapshot (defaults before `init`).
    pub fn snapshot(&self) -> SettingsSnapshot {
        self.state.read().snapshot.clone()
    }

    /// Write a single setting. See `update` for the batched contract.
    pub async fn set(&self, key: SettingKey, value: impl Into<SettingValue>) -> Result<()> {
        let mut updates = BTreeMap::new();
        updates.insert(key, value.into());
        self.update(updates).await
    }

    /// Write a batch of settings.
    ///
    /// Keys whose new value equals the cached value are filtered out; if
    /// nothing remains this is a complete no-op (zero store writes, zero
    /// notifications). Otherwise the cache is updated optimistically,
    /// subscribers are notified once with the changed subset, and the
    /// subset is written through. On write failure the optimistic update
    /// is rolled back, subscribers are notified again with the restored
    /// values, and the error propagates.
    pub async fn update(&self, updates: BTreeMap<SettingKey, SettingValue>) -> Result<()> {
        self.ensure_ready()?;

        let (event, entries, previous) = {
            let mut state = self.state.write();
            let mut changed = BTreeMap::new();
            let mut previous = BTreeMap::new();
            for (key, value) in updates {
                let value = schema::normalize(key, value);
                let current = state.snapshot.get(key);
                if current == &value {
                    continue;
                }
                previous.insert(key, current.clone());
                state.snapshot.set(key, value.clone());
                changed.insert(key, value);
            }
            if changed.is_empty() {
                return Ok(());
            }
            let entries: serde_json::Map<String, serde_json::Value> = changed
                .iter()
                .map(|(key, value)| (key.as_str().to_string(), value.to_json()))
                .collect();
            (
                SettingsEvent {
                    snapshot: state.snapshot.clone(),
                    changed,
                },
                entries,
                previous,
            )
        };

        self.listeners.notify(&event);

        match self.store.set(entries).await {
            Ok(()) => Ok(()),
            Err(err) => {
                warn!("settings write failed, rolling back optimistic update: {err}");
                let event = {
                    let mut state = self.state.write();
                    for (key, value) in &previous {
                        state.snapshot.set(*key, value.clone());
                    }
                    SettingsEvent {
                        snapshot: state.snapshot.clone(),
                        changed: previous,
                    }
                };
                self.listeners.notify(&event);
                Err(err)
            }
        }
    }

    /// Restore every key to its compiled default: clears the store,
    /// rewrites the full defaults, and notifies subscribers with the
    /// complete default map.
    pub async fn reset(&self) -> Result<()> {
        self.ensure_ready()?;

        let defaults = SettingsSnapshot::defaults();
        let previous = {
            let mut state = self.state.write();
            let previous = state.snapshot.clone();
            state.snapshot = defaults.clone();
            previous
        };

        self.listeners.notify(&SettingsEvent {
            snapshot: defaults.clone(),
            changed: defaults.iter().map(|(k, v)| (k, v.clone())).collect(),
        });

        let write = async {
            self.store.clear().await?;
            self.store.set(defaults.to_store_document()).await
        };

        match write.await {
            Ok(()) => Ok(()),
            Err(err) => {
                warn!("settings reset failed, restoring previous snapshot: {err}");
                let event = {
                    let mut state = self.state.write();
                    state.snapshot = previous.clone();
                    SettingsEvent {
                        snapshot: previous.clone(),
                        changed: previous.iter().map(|(k, v)| (k, v.clone())).collect(),
                    }
                };
                self.listeners.notify(&event);
                Err(err)
            }
        }
    }

    /// Register a change subscriber; the guard unregisters on drop.
    ///
    /// Subscribers run synchronously after each applied batch, local or
    /// remote in origin. A panicking subscriber is isolated and logged.
    pub fn subscribe(
        &self,
        callback: impl Fn(&SettingsEvent) + Send + Sync + 'static,
    ) -> Subscription {
        self.listeners.add(Box::new(callback))
    }

    /// Fold a store change batch into the local snapshot.
    ///
    /// Only `Sync`-area batches are relevant. Unrecognized keys are
    /// ignored, values are normalized, and entries equal to the cached
    /// value (our own optimistic writes echoed back) are skipped. One
    /// notification covers the whole batch; an empty accumulation emits
    /// nothing.
    fn fold_remote_batch(&self, batch: ChangeBatch) {
        if batch.area != StoreArea::Sync {
            return;
        }

        let event = {
            let mut state = self.state.write();
            if !state.ready {
                return;
            }
            let mut changed = BTreeMap::new();
            for change in &batch.changes {
                let Some(key) = schema::resolve_key(&change.key) else {
                    continue;
                };
                let value = match &change.new_value {
                    Some(raw) => match SettingValue::from_json(raw) {
                        Some(value) => schema::normalize(key, value),
                        None => continue,
                    },
                    // Key removed: the merge invariant sends it back to
                    // the compiled default.
                    None => schema::default_value(key),
                };
                if state.snapshot.get(key) != &value {
                    state.snapshot.set(key, value.clone());
                    changed.insert(key, value);
                }
            }
            if changed.is_empty() {
                return;
            }
            SettingsEvent {
                snapshot: state.snapshot.clone(),
                changed,
            }
        };

        self.listeners.notify(&event);
    }

    /// Re-read the full store after the change stream lagged, so a missed
    /// batch cannot leave the mirror stale forever.
    async fn resync(&self) {
        let raw = match self.store.get_all().await {
            Ok(raw) => raw,
            Err(err) => {
                warn!("settings resync failed: {err}");
                return;
            }
        };

        let rebuilt = SettingsSnapshot::from_stored(&raw);
        let event = {
            let mut state = self.state.write();
            let mut changed = BTreeMap::new();
            for (key, value) in rebuilt.iter() {
                if state.snapshot.get(key) != value {
                    changed.insert(key, value.clone());
                }
            }
            if changed.is_empty() {
                return;
            }
            state.snapshot = rebuilt.clone();
            SettingsEvent {
                snapshot: rebuilt,
                changed,
            }
        };
        self.listeners.notify(&event);
    }

    fn ensure_ready(&self) -> Result<()> {
        if self.is_ready() {
            Ok(())
        } else {
            Err(SettingsError::NotInitialized.into())
        }
    }
}

impl Drop for SettingsManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}
