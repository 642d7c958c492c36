//! Periodic dynamic-theme re-evaluation

use super::resolve::time_bucket;
use crate::settings::SettingsManager;
use crate::types::ThemeName;
use chrono::{Local, NaiveDateTime, Timelike};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::debug;

/// Default re-evaluation period.
pub const DYNAMIC_TICK_PERIOD: Duration = Duration::from_secs(60);

/// Background timer that re-evaluates the dynamic time bucket.
///
/// Fires its callback only when the snapshot's theme is `dynamic` (or
/// `system`) and the computed bucket differs from the last one it applied
/// - crossing from sunrise into horizon triggers exactly one firing, and
/// nothing happens while the bucket is stable. The spawned task is
/// aborted when the ticker is dropped, so no timers leak into a torn-down
/// context.
pub struct DynamicThemeTicker {
    handle: tokio::task::JoinHandle<()>,
}

impl DynamicThemeTicker {
    /// Spawn with the wall clock and the default 60s period.
    pub fn spawn(
        settings: Arc<SettingsManager>,
        on_bucket_change: impl Fn(ThemeName) + Send + 'static,
    ) -> DynamicThemeTicker {
        Self::spawn_with_clock(
            settings,
            DYNAMIC_TICK_PERIOD,
            || Local::now().naive_local(),
            on_bucket_change,
        )
    }

    /// Spawn with an injected clock and period (used by tests).
    pub fn spawn_with_clock(
        settings: Arc<SettingsManager>,
        period: Duration,
        clock: impl Fn() -> NaiveDateTime + Send + 'static,
        on_bucket_change: impl Fn(ThemeName) + Send + 'static,
    ) -> DynamicThemeTicker {
        let handle = tokio::spawn(async move {
            let mut ticks = interval(period);
            // The immediate first tick is skipped; startup resolution is
            // the context's own responsibility.
            ticks.tick().await;

            let mut last_applied: Option<ThemeName> = None;
            loop {
                ticks.tick().await;

                if !settings.snapshot().theme().is_time_resolved() {
                    // Leaving dynamic mode forgets the bucket, so
                    // re-entering it re-applies whatever is current.
                    last_applied = None;
                    continue;
                }

                let bucket = time_bucket(clock().hour());
                if last_applied != Some(bucket) {
                    debug!("dynamic theme bucket changed to {bucket}");
                    last_applied = Some(bucket);
                    on_bucket_change(bucket);
                }
            }
        });

        DynamicThemeTicker { handle }
    }
}

impl Drop for DynamicThemeTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::types::SettingKey;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fake_clock(hour: Arc<AtomicU32>) -> impl Fn() -> NaiveDateTime + Send + 'static {
        move || {
            chrono::NaiveDate::from_ymd_opt(2024, 3, 14)
                .unwrap()
                .and_hms_opt(hour.load(Ordering::SeqCst), 30, 0)
                .unwrap()
        }
    }

    async fn init_manager(theme: &str) -> Arc<SettingsManager> {
        let manager = Arc::new(SettingsManager::new(Arc::new(MemoryStore::new())));
        manager.init().await;
        manager.set(SettingKey::Theme, theme).await.unwrap();
        manager
    }

    #[tokio::test]
    async fn test_fires_once_per_bucket_transition() {
        let manager = init_manager("dynamic").await;
        let hour = Arc::new(AtomicU32::new(10));
        let fired: Arc<Mutex<Vec<ThemeName>>> = Arc::new(Mutex::new(Vec::new()));

        let fired_in = Arc::clone(&fired);
        let _ticker = DynamicThemeTicker::spawn_with_clock(
            Arc::clone(&manager),
            Duration::from_millis(10),
            fake_clock(Arc::clone(&hour)),
            move |bucket| fired_in.lock().push(bucket),
        );

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(
            fired.lock().clone(),
            vec![ThemeName::Sunrise],
            "stable bucket fires exactly once"
        );

        hour.store(13, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(fired.lock().clone(), vec![ThemeName::Sunrise, ThemeName::Horizon]);
    }

    #[tokio::test]
    async fn test_silent_when_theme_is_explicit() {
        let manager = init_manager("forest").await;
        let hour = Arc::new(AtomicU32::new(10));
        let fired = Arc::new(AtomicU32::new(0));

        let fired_in = Arc::clone(&fired);
        let _ticker = DynamicThemeTicker::spawn_with_clock(
            Arc::clone(&manager),
            Duration::from_millis(10),
            fake_clock(Arc::clone(&hour)),
            move |_| {
                fired_in.fetch_add(1, Ordering::SeqCst);
            },
        );

        hour.store(13, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_stops_when_dropped() {
        let manager = init_manager("dynamic").await;
        let hour = Arc::new(AtomicU32::new(10));
        let fired = Arc::new(AtomicU32::new(0));

        let fired_in = Arc::clone(&fired);
        let ticker = DynamicThemeTicker::spawn_with_clock(
            Arc::clone(&manager),
            Duration::from_millis(10),
            fake_clock(Arc::clone(&hour)),
            move |_| {
                fired_in.fetch_add(1, Ordering::SeqCst);
            },
        );

        tokio::time::sleep(Duration::from_millis(50)).await;
        drop(ticker);
        let fired_before = fired.load(Ordering::SeqCst);

        hour.store(13, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(fired.load(Ordering::SeqCst), fired_before, "no leaked timer");
    }
}
