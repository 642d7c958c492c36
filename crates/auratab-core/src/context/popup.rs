//! Popup execution context
//!
//! The settings surface - the only component with a write path into the
//! store. Form controls map onto batched updates so a save touches the
//! store once and downstream recomputation runs once per batch.

use crate::error::Result;
use crate::settings::SettingsManager;
use crate::store::SettingsStore;
use crate::types::{ClockStyle, SettingKey, SettingValue, ThemeName, TimeFormat};
use std::collections::BTreeMap;
use std::sync::Arc;

pub struct PopupContext {
    settings: Arc<SettingsManager>,
}

impl PopupContext {
    pub async fn start(store: Arc<dyn SettingsStore>) -> PopupContext {
        let settings = Arc::new(SettingsManager::new(store));
        settings.init().await;
        PopupContext { settings }
    }

    pub fn settings(&self) -> &Arc<SettingsManager> {
        &self.settings
    }

    /// Persist every control the form touched as one batch.
    pub async fn apply(&self, form: PopupForm) -> Result<()> {
        self.settings.update(form.into_updates()).await
    }

    pub async fn set_theme(&self, theme: ThemeName) -> Result<()> {
        self.settings.set(SettingKey::Theme, theme.as_str()).await
    }

    pub async fn set_time_format(&self, format: TimeFormat) -> Result<()> {
        self.settings
            .set(SettingKey::TimeFormat, format.as_str())
            .await
    }

    pub async fn set_clock_style(&self, style: ClockStyle) -> Result<()> {
        self.settings
            .set(SettingKey::ClockStyle, style.as_str())
            .await
    }

    pub async fn reset(&self) -> Result<()> {
        self.settings.reset().await
    }
}

/// The popup's form controls, each absent until the user touched it.
#[derive(Debug, Default, Clone)]
pub struct PopupForm {
    pub time_format: Option<TimeFormat>,
    pub show_am_pm: Option<bool>,
    pub show_date: Option<bool>,
    pub show_day: Option<bool>,
    pub clock_style: Option<ClockStyle>,
    pub font_family: Option<String>,
    pub theme: Option<ThemeName>,
    pub enable_animations: Option<bool>,
    pub show_grain: Option<bool>,
    pub show_markers: Option<bool>,
    pub smooth_motion: Option<bool>,
}

impl PopupForm {
    fn into_updates(self) -> BTreeMap<SettingKey, SettingValue> {
        let mut updates = BTreeMap::new();

        if let Some(format) = self.time_format {
            updates.insert(SettingKey::TimeFormat, format.as_str().into());
        }
        if let Some(show) = self.show_am_pm {
            updates.insert(SettingKey::ShowAmPm, show.into());
        }
        if let Some(show) = self.show_date {
            updates.insert(SettingKey::ShowDate, show.into());
        }
        if let Some(show) = self.show_day {
            updates.insert(SettingKey::ShowDay, show.into());
        }
        if let Some(style) = self.clock_style {
            updates.insert(SettingKey::ClockStyle, style.as_str().into());
        }
        if let Some(family) = self.font_family {
            updates.insert(SettingKey::FontFamily, family.into());
        }
        if let Some(theme) = self.theme {
            updates.insert(SettingKey::Theme, theme.as_str().into());
        }
        if let Some(enabled) = self.enable_animations {
            updates.insert(SettingKey::EnableAnimations, enabled.into());
        }
        if let Some(show) = self.show_grain {
            updates.insert(SettingKey::ShowGrain, show.into());
        }
        if let Some(show) = self.show_markers {
            updates.insert(SettingKey::ShowMarkers, show.into());
        }
        if let Some(smooth) = self.smooth_motion {
            updates.insert(SettingKey::SmoothMotion, smooth.into());
        }

        updates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_form_maps_to_schema_keys() {
        let form = PopupForm {
            time_format: Some(TimeFormat::TwentyFourHour),
            show_date: Some(false),
            theme: Some(ThemeName::Ocean),
            ..PopupForm::default()
        };
        let updates = form.into_updates();

        assert_eq!(updates.len(), 3);
        assert_eq!(
            updates.get(&SettingKey::TimeFormat),
            Some(&SettingValue::Text("24".into()))
        );
        assert_eq!(
            updates.get(&SettingKey::ShowDate),
            Some(&SettingValue::Bool(false))
        );
        assert_eq!(
            updates.get(&SettingKey::Theme),
            Some(&SettingValue::Text("ocean".into()))
        );
    }

    #[tokio::test]
    async fn test_apply_writes_through_to_the_store() {
        let store = MemoryStore::new();
        let popup = PopupContext::start(Arc::new(store.clone())).await;

        popup
            .apply(PopupForm {
                clock_style: Some(ClockStyle::Analog),
                show_markers: Some(false),
                ..PopupForm::default()
            })
            .await
            .unwrap();

        let stored = store.get_all().await.unwrap();
        assert_eq!(stored.get("clockStyle"), Some(&serde_json::json!("analog")));
        assert_eq!(stored.get("showMarkers"), Some(&serde_json::json!(false)));
    }

    #[tokio::test]
    async fn test_untouched_controls_write_nothing() {
        let store = MemoryStore::new();
        let popup = PopupContext::start(Arc::new(store.clone())).await;

        popup.apply(PopupForm::default()).await.unwrap();
        assert!(store.get_all().await.unwrap().is_empty());
    }
}
