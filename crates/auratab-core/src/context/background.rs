//! Background execution context
//!
//! The authoritative instance: answers theme-data requests from tabs,
//! and watches its settings mirror so that changes landing in the store
//! (from the popup or another device) are fanned out to every open tab
//! as `settingsChanged` / `requestDynamicThemeUpdate` broadcasts.

use super::SharedClock;
use crate::bus::{BusHandle, Envelope, MessageRouter};
use crate::settings::{SettingsEvent, SettingsManager, Subscription};
use crate::store::SettingsStore;
use crate::theme::{affects_theme, resolve_theme, DYNAMIC_CRITICAL_KEYS};
use crate::types::{Message, SettingsChangedPayload, ThemePayload};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

const EVENT_QUEUE_CAPACITY: usize = 32;

pub struct BackgroundContext {
    settings: Arc<SettingsManager>,
    run_task: tokio::task::JoinHandle<()>,
    _subscription: Subscription,
}

impl BackgroundContext {
    pub async fn start(
        store: Arc<dyn SettingsStore>,
        router: &MessageRouter,
    ) -> Arc<BackgroundContext> {
        Self::start_with_clock(store, router, SharedClock::system()).await
    }

    pub async fn start_with_clock(
        store: Arc<dyn SettingsStore>,
        router: &MessageRouter,
        clock: SharedClock,
    ) -> Arc<BackgroundContext> {
        let settings = Arc::new(SettingsManager::new(store));
        settings.init().await;

        let (bus, mut inbox) = router.register_background();

        // Bridge synchronous settings notifications into the event loop.
        let (event_tx, mut event_rx) = mpsc::channel::<SettingsEvent>(EVENT_QUEUE_CAPACITY);
        let subscription = settings.subscribe(move |event| {
            if event_tx.try_send(event.clone()).is_err() {
                warn!("background event queue full; dropping settings event");
            }
        });

        let task_settings = Arc::clone(&settings);
        let run_task = tokio::spawn(async move {
            info!("background context started");
            loop {
                tokio::select! {
                    envelope = inbox.recv() => {
                        let Some(envelope) = envelope else { break };
                        handle_envelope(&task_settings, &bus, &clock, envelope);
                    }
                    event = event_rx.recv() => {
                        let Some(event) = event else { break };
                        handle_settings_event(&bus, event);
                    }
                }
            }
            debug!("background context event loop ended");
        });

        Arc::new(BackgroundContext {
            settings,
            run_task,
            _subscription: subscription,
        })
    }

    pub fn settings(&self) -> &Arc<SettingsManager> {
        &self.settings
    }
}

impl Drop for BackgroundContext {
    fn drop(&mut self) {
        self.run_task.abort();
    }
}

fn current_theme_payload(settings: &SettingsManager, clock: &SharedClock) -> ThemePayload {
    let resolved = resolve_theme(&settings.snapshot(), clock.now());
    ThemePayload {
        theme_data: resolved.data,
        effective_theme_name: resolved.effective_theme,
    }
}

fn handle_envelope(
    settings: &SettingsManager,
    bus: &BusHandle,
    clock: &SharedClock,
    envelope: Envelope,
) {
    match Message::from_value(&envelope.message) {
        Ok(Message::RequestCurrentThemeData) => {
            let payload = current_theme_payload(settings, clock);
            if let Some(reply) = envelope.reply {
                let response =
                    serde_json::to_value(&payload).unwrap_or(serde_json::Value::Null);
                let _ = reply.send(response);
            }
        }
        Ok(Message::RequestDynamicThemeUpdate { theme_name }) => {
            debug!("re-resolving dynamic theme (hint: {theme_name:?})");
            let payload = current_theme_payload(settings, clock);
            bus.broadcast(&Message::ThemeUpdate { data: payload });
            // Reply slot dropped: senders see "no response" promptly.
        }
        Ok(other) => {
            debug!("background ignoring message: {other:?}");
        }
        Err(unknown) => {
            warn!(
                "background received unhandled message type: {:?}",
                unknown.type_tag
            );
            if let Some(reply) = envelope.reply {
                let _ = reply.send(unknown.rejection());
            }
        }
    }
}

/// Fan a settings change out to the open tabs: one `settingsChanged` per
/// theme-affecting key, plus a single `requestDynamicThemeUpdate` when
/// any key in the batch can change the outcome of dynamic resolution.
fn handle_settings_event(bus: &BusHandle, event: SettingsEvent) {
    let mut dynamic_update_needed = false;

    for (key, value) in &event.changed {
        if !affects_theme(*key) {
            continue;
        }
        bus.broadcast(&Message::SettingsChanged {
            payload: SettingsChangedPayload {
                changed_key: key.as_str().to_string(),
                new_value: value.to_json(),
            },
        });
        if DYNAMIC_CRITICAL_KEYS.contains(key) {
            dynamic_update_needed = true;
        }
    }

    if dynamic_update_needed {
        bus.broadcast(&Message::RequestDynamicThemeUpdate { theme_name: None });
    }
}
