//! Cross-context integration tests
//!
//! Full-stack scenarios: background, tab and popup contexts running over
//! one shared store and one message router, the way the host wires them.

use auratab_core::context::SharedClock;
use auratab_core::{
    BackgroundContext, MemoryStore, MemorySurface, MessageRouter, PopupContext, PopupForm,
    ResolvedTheme, SurfaceElement, TabContext, ThemeName,
};
use chrono::{NaiveDate, NaiveDateTime};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn fixed_clock(hour: Arc<AtomicU32>) -> SharedClock {
    SharedClock::new(move || -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 14)
            .unwrap()
            .and_hms_opt(hour.load(Ordering::SeqCst), 30, 0)
            .unwrap()
    })
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(150)).await;
}

struct Rig {
    store: MemoryStore,
    router: MessageRouter,
    hour: Arc<AtomicU32>,
    surface: Arc<MemorySurface>,
    _background: Arc<BackgroundContext>,
    _tab: Arc<TabContext>,
}

impl Rig {
    /// One background and one tab over a shared store, clock pinned to
    /// the given hour.
    async fn start(hour_of_day: u32) -> Rig {
        let store = MemoryStore::new();
        let router = MessageRouter::new();
        let hour = Arc::new(AtomicU32::new(hour_of_day));
        let clock = fixed_clock(Arc::clone(&hour));

        let background = BackgroundContext::start_with_clock(
            Arc::new(store.clone()),
            &router,
            clock.clone(),
        )
        .await;

        let surface = Arc::new(MemorySurface::new());
        let tab = TabContext::start_with_clock(
            Arc::new(store.clone()),
            &router,
            surface.clone(),
            clock,
        )
        .await;
        settle().await;

        Rig {
            store,
            router,
            hour,
            surface,
            _background: background,
            _tab: tab,
        }
    }

    async fn popup(&self) -> PopupContext {
        PopupContext::start(Arc::new(self.store.clone())).await
    }
}

#[tokio::test]
async fn test_tab_startup_applies_dynamic_theme_from_background() {
    let rig = Rig::start(10).await;

    let applied = rig.surface.last_theme().expect("startup theme applied");
    assert_eq!(applied.effective_theme, ThemeName::Sunrise);
}

#[tokio::test]
async fn test_popup_visibility_change_reaches_the_tab_surface() {
    let rig = Rig::start(10).await;
    let popup = rig.popup().await;

    popup
        .apply(PopupForm {
            show_date: Some(false),
            show_day: Some(false),
            ..PopupForm::default()
        })
        .await
        .unwrap();
    settle().await;

    assert_eq!(
        rig.surface.is_visible(SurfaceElement::DateText),
        Some(false)
    );
    assert_eq!(rig.surface.is_visible(SurfaceElement::DayText), Some(false));
    assert_eq!(rig.surface.is_visible(SurfaceElement::DateRow), Some(false));

    // The tab's own mirror folded the same change.
    assert!(!rig._tab.settings().snapshot().show_date());
}

#[tokio::test]
async fn test_popup_theme_change_is_rebroadcast_and_applied() {
    let rig = Rig::start(10).await;
    let popup = rig.popup().await;

    popup.set_theme(ThemeName::Forest).await.unwrap();
    settle().await;

    let applied = rig.surface.last_theme().expect("theme applied");
    assert_eq!(applied.effective_theme, ThemeName::Forest);
}

#[tokio::test]
async fn test_popup_reset_restores_tab_to_defaults() {
    let rig = Rig::start(10).await;
    let popup = rig.popup().await;

    popup
        .apply(PopupForm {
            show_date: Some(false),
            theme: Some(ThemeName::Midnight),
            ..PopupForm::default()
        })
        .await
        .unwrap();
    settle().await;
    assert_eq!(
        rig.surface.is_visible(SurfaceElement::DateText),
        Some(false)
    );

    popup.reset().await.unwrap();
    settle().await;

    assert_eq!(rig.surface.is_visible(SurfaceElement::DateText), Some(true));
    let tab_settings = rig._tab.settings();
    assert!(tab_settings.snapshot().show_date());
    assert_eq!(tab_settings.snapshot().theme(), ThemeName::Dynamic);
    // Dynamic at 10:30 resolves back to sunrise.
    assert_eq!(
        rig.surface.last_theme().unwrap().effective_theme,
        ThemeName::Sunrise
    );
}

#[tokio::test]
async fn test_tab_without_background_falls_back_to_safe_theme() {
    let store = MemoryStore::new();
    let router = MessageRouter::with_timeout(Duration::from_millis(200));
    let surface = Arc::new(MemorySurface::new());

    let _tab = TabContext::start(Arc::new(store), &router, surface.clone()).await;
    settle().await;

    assert_eq!(surface.last_theme(), Some(ResolvedTheme::fallback()));
}

#[tokio::test]
async fn test_unknown_message_type_gets_structured_rejection() {
    let rig = Rig::start(10).await;
    let (sender, _inbox) = rig.router.register_tab();

    let response = sender
        .send_raw(serde_json::json!({"type": "bogusType"}))
        .await;

    assert_eq!(
        response,
        Some(serde_json::json!({"error": "unhandled message type: bogusType"}))
    );
}

#[tokio::test]
async fn test_second_tab_sees_the_same_replicated_state() {
    let rig = Rig::start(10).await;

    let second_surface = Arc::new(MemorySurface::new());
    let _second_tab = TabContext::start_with_clock(
        Arc::new(rig.store.clone()),
        &rig.router,
        second_surface.clone(),
        fixed_clock(Arc::clone(&rig.hour)),
    )
    .await;
    settle().await;

    let popup = rig.popup().await;
    popup.set_theme(ThemeName::Lavender).await.unwrap();
    settle().await;

    for surface in [&rig.surface, &second_surface] {
        assert_eq!(
            surface.last_theme().unwrap().effective_theme,
            ThemeName::Lavender
        );
    }
}

#[tokio::test]
async fn test_hour_change_resolves_new_bucket_on_request() {
    let rig = Rig::start(11).await;
    assert_eq!(
        rig.surface.last_theme().unwrap().effective_theme,
        ThemeName::Sunrise
    );

    // The clock crosses noon; the next explicit re-request resolves to
    // the horizon bucket. (The 60s ticker covers this in production; it
    // is driven directly here.)
    rig.hour.store(13, Ordering::SeqCst);
    let (sender, _inbox) = rig.router.register_tab();
    sender
        .send(&auratab_core::Message::RequestDynamicThemeUpdate { theme_name: None })
        .await;
    settle().await;

    assert_eq!(
        rig.surface.last_theme().unwrap().effective_theme,
        ThemeName::Horizon
    );
}
