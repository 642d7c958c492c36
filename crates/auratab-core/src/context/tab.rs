//! Tab execution context
//!
//! A tab builds its own settings mirror, renders the clock faces, and
//! applies resolved themes. Theme resolution is the background's job:
//! the tab requests it on startup, whenever a theme-affecting change is
//! announced, and when its own dynamic ticker crosses a bucket boundary.
//! If the background cannot be reached the tab degrades to the fallback
//! theme rather than showing a blank page.

use super::SharedClock;
use crate::bus::{BusHandle, Envelope, MessageRouter};
use crate::render::{ClockRenderer, Surface, ThemeApplier};
use crate::settings::{schema, SettingsEvent, SettingsManager, Subscription};
use crate::store::SettingsStore;
use crate::theme::{affects_theme, DynamicThemeTicker};
use crate::types::{Message, ResolvedTheme, ThemeName, ThemePayload};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;
use tracing::{debug, info, warn};

const EVENT_QUEUE_CAPACITY: usize = 32;

/// Clock face refresh period.
const CLOCK_TICK_PERIOD: Duration = Duration::from_secs(1);

pub struct TabContext {
    settings: Arc<SettingsManager>,
    run_task: tokio::task::JoinHandle<()>,
    _ticker: DynamicThemeTicker,
    _subscription: Subscription,
}

impl TabContext {
    pub async fn start(
        store: Arc<dyn SettingsStore>,
        router: &MessageRouter,
        surface: Arc<dyn Surface>,
    ) -> Arc<TabContext> {
        Self::start_with_clock(store, router, surface, SharedClock::system()).await
    }

    pub async fn start_with_clock(
        store: Arc<dyn SettingsStore>,
        router: &MessageRouter,
        surface: Arc<dyn Surface>,
        clock: SharedClock,
    ) -> Arc<TabContext> {
        let settings = Arc::new(SettingsManager::new(store));
        settings.init().await;

        let (bus, mut inbox) = router.register_tab();

        let (event_tx, mut event_rx) = mpsc::channel::<SettingsEvent>(EVENT_QUEUE_CAPACITY);
        let subscription = settings.subscribe(move |event| {
            if event_tx.try_send(event.clone()).is_err() {
                warn!("tab event queue full; dropping settings event");
            }
        });

        // The dynamic ticker feeds bucket transitions into the event loop.
        let (bucket_tx, mut bucket_rx) = mpsc::channel::<ThemeName>(4);
        let ticker_clock = clock.clone();
        let ticker = DynamicThemeTicker::spawn_with_clock(
            Arc::clone(&settings),
            crate::theme::DYNAMIC_TICK_PERIOD,
            move || ticker_clock.now(),
            move |bucket| {
                let _ = bucket_tx.try_send(bucket);
            },
        );

        let task_settings = Arc::clone(&settings);
        let run_task = tokio::spawn(async move {
            info!("tab context started");
            let renderer = ClockRenderer::new(Arc::clone(&surface));
            let mut applier = ThemeApplier::new(surface);

            // Initial render from the merged snapshot, then ask the
            // background for the authoritative theme.
            let snapshot = task_settings.snapshot();
            renderer.update_clock(&snapshot, clock.now());
            renderer.update_visibility(&snapshot);
            request_theme(&bus, &mut applier).await;

            let mut ticks = interval(CLOCK_TICK_PERIOD);
            loop {
                tokio::select! {
                    envelope = inbox.recv() => {
                        let Some(envelope) = envelope else { break };
                        handle_envelope(&bus, &mut applier, envelope).await;
                    }
                    event = event_rx.recv() => {
                        let Some(event) = event else { break };
                        renderer.update_clock(&event.snapshot, clock.now());
                        renderer.update_visibility(&event.snapshot);
                    }
                    _ = ticks.tick() => {
                        renderer.update_clock(&task_settings.snapshot(), clock.now());
                    }
                    bucket = bucket_rx.recv() => {
                        let Some(bucket) = bucket else { break };
                        debug!("dynamic bucket changed to {bucket}; refreshing theme");
                        request_theme(&bus, &mut applier).await;
                    }
                }
            }
            debug!("tab context event loop ended");
        });

        Arc::new(TabContext {
            settings,
            run_task,
            _ticker: ticker,
            _subscription: subscription,
        })
    }

    pub fn settings(&self) -> &Arc<SettingsManager> {
        &self.settings
    }
}

impl Drop for TabContext {
    fn drop(&mut self) {
        self.run_task.abort();
    }
}

async fn handle_envelope(bus: &BusHandle, applier: &mut ThemeApplier, envelope: Envelope) {
    match Message::from_value(&envelope.message) {
        Ok(Message::ThemeUpdate { data }) => {
            applier.apply(ResolvedTheme {
                effective_theme: data.effective_theme_name,
                data: data.theme_data,
            });
        }
        Ok(Message::SettingsChanged { payload }) => {
            let affects = schema::resolve_key(&payload.changed_key)
                .map(affects_theme)
                .unwrap_or(false);
            if affects {
                request_theme(bus, applier).await;
            }
        }
        Ok(Message::RequestDynamicThemeUpdate { .. }) => {
            request_theme(bus, applier).await;
        }
        Ok(other) => {
            debug!("tab ignoring message: {other:?}");
        }
        Err(unknown) => {
            warn!("tab received unhandled message type: {:?}", unknown.type_tag);
            if let Some(reply) = envelope.reply {
                let _ = reply.send(unknown.rejection());
            }
        }
    }
}

/// Fetch and apply the authoritative theme. A missing, errored, or
/// malformed response degrades to the fallback theme - the page must
/// stay readable even with no background listening.
async fn request_theme(bus: &BusHandle, applier: &mut ThemeApplier) {
    match bus.send(&Message::RequestCurrentThemeData).await {
        Some(response) => match serde_json::from_value::<ThemePayload>(response) {
            Ok(payload) => applier.apply(ResolvedTheme {
                effective_theme: payload.effective_theme_name,
                data: payload.theme_data,
            }),
            Err(err) => {
                warn!("malformed theme data response ({err}); applying fallback theme");
                applier.apply_fallback();
            }
        },
        None => {
            warn!("no response to theme data request; applying fallback theme");
            applier.apply_fallback();
        }
    }
}
