//! The merged settings view held by one execution context

use super::schema;
use crate::types::{
    AnimationSpeed, AnimationType, BackgroundType, ClockStyle, SettingKey, SettingValue, ThemeName,
    TimeFormat,
};
use std::collections::BTreeMap;

/// Full key-value view of the settings at a point in time.
///
/// Invariant: `snapshot = defaults ⊕ stored` - every recognized key is
/// present, stored values override defaults only where the store had a
/// representable entry. Snapshots are rebuilt from the store on every
/// context start and are only mutated by the owning `SettingsManager`.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsSnapshot {
    values: BTreeMap<SettingKey, SettingValue>,
}

impl SettingsSnapshot {
    /// Snapshot holding only the compiled defaults.
    pub fn defaults() -> SettingsSnapshot {
        SettingsSnapshot {
            values: schema::DEFAULTS.clone(),
        }
    }

    /// Build from a raw store document, right-biased over the defaults.
    pub fn from_stored(raw: &serde_json::Map<String, serde_json::Value>) -> SettingsSnapshot {
        let mut snapshot = SettingsSnapshot::defaults();
        for (key, value) in schema::sanitize_stored(raw) {
            snapshot.values.insert(key, value);
        }
        snapshot
    }

    pub fn get(&self, key: SettingKey) -> &SettingValue {
        // Every key is present by construction; the defaults map is total.
        self.values
            .get(&key)
            .unwrap_or_else(|| panic!("snapshot missing schema key {key}"))
    }

    pub(crate) fn set(&mut self, key: SettingKey, value: SettingValue) {
        self.values.insert(key, value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (SettingKey, &SettingValue)> + '_ {
        self.values.iter().map(|(k, v)| (*k, v))
    }

    /// Serialize the full snapshot as a store document (used by `reset`).
    pub fn to_store_document(&self) -> serde_json::Map<String, serde_json::Value> {
        self.values
            .iter()
            .map(|(key, value)| (key.as_str().to_string(), value.to_json()))
            .collect()
    }

    fn text(&self, key: SettingKey) -> Option<&str> {
        self.get(key).as_str()
    }

    fn flag(&self, key: SettingKey) -> bool {
        self.get(key)
            .as_bool()
            .or_else(|| schema::default_value(key).as_bool())
            .unwrap_or(false)
    }

    // ---- typed accessors -------------------------------------------------

    pub fn time_format(&self) -> TimeFormat {
        self.text(SettingKey::TimeFormat)
            .and_then(TimeFormat::parse)
            .unwrap_or(TimeFormat::TwelveHour)
    }

    pub fn clock_style(&self) -> ClockStyle {
        self.text(SettingKey::ClockStyle)
            .and_then(ClockStyle::parse)
            .unwrap_or(ClockStyle::Digital)
    }

    pub fn theme(&self) -> ThemeName {
        self.text(SettingKey::Theme)
            .and_then(ThemeName::parse)
            .unwrap_or(ThemeName::Dynamic)
    }

    pub fn animation_speed(&self) -> AnimationSpeed {
        self.text(SettingKey::AnimationSpeed)
            .and_then(AnimationSpeed::parse)
            .unwrap_or(AnimationSpeed::Normal)
    }

    pub fn animation_type(&self) -> AnimationType {
        self.text(SettingKey::AnimationType)
            .and_then(AnimationType::parse)
            .unwrap_or(AnimationType::Fade)
    }

    pub fn background_type(&self) -> BackgroundType {
        self.text(SettingKey::BackgroundType)
            .and_then(BackgroundType::parse)
            .unwrap_or(BackgroundType::Solid)
    }

    pub fn show_am_pm(&self) -> bool {
        self.flag(SettingKey::ShowAmPm)
    }

    pub fn show_date(&self) -> bool {
        self.flag(SettingKey::ShowDate)
    }

    pub fn show_day(&self) -> bool {
        self.flag(SettingKey::ShowDay)
    }

    pub fn enable_animations(&self) -> bool {
        self.flag(SettingKey::EnableAnimations)
    }

    pub fn show_grain(&self) -> bool {
        self.flag(SettingKey::ShowGrain)
    }

    pub fn show_markers(&self) -> bool {
        self.flag(SettingKey::ShowMarkers)
    }

    pub fn smooth_motion(&self) -> bool {
        self.flag(SettingKey::SmoothMotion)
    }

    pub fn font_family(&self) -> &str {
        self.text(SettingKey::FontFamily).unwrap_or("Inter")
    }

    // ---- per-field overrides (None until the user sets them) -------------

    pub fn text_color(&self) -> Option<&str> {
        self.text(SettingKey::TextColor)
    }

    pub fn background_color(&self) -> Option<&str> {
        self.text(SettingKey::BackgroundColor)
    }

    pub fn gradient_colors(&self) -> Option<&[String]> {
        self.get(SettingKey::GradientColors).as_list()
    }

    pub fn gradient_angle(&self) -> Option<f64> {
        self.get(SettingKey::GradientAngle).as_f64()
    }

    pub fn background_image(&self) -> Option<&str> {
        self.text(SettingKey::BackgroundImage)
    }

    pub fn background_blur(&self) -> Option<f64> {
        self.get(SettingKey::BackgroundBlur).as_f64()
    }
}

impl Default for SettingsSnapshot {
    fn default() -> Self {
        SettingsSnapshot::defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_snapshot_is_total() {
        let snapshot = SettingsSnapshot::defaults();
        assert_eq!(snapshot.iter().count(), SettingKey::ALL.len());
    }

    #[test]
    fn test_stored_values_override_defaults() {
        let raw = serde_json::json!({
            "showDate": false,
            "theme": "ocean",
            "timeFormat": "24h"
        });
        let snapshot = SettingsSnapshot::from_stored(raw.as_object().unwrap());

        assert!(!snapshot.show_date());
        assert!(snapshot.show_day(), "untouched keys keep defaults");
        assert_eq!(snapshot.theme(), ThemeName::Ocean);
        assert_eq!(snapshot.time_format(), TimeFormat::TwentyFourHour);
        assert_eq!(
            snapshot.get(SettingKey::TimeFormat),
            &SettingValue::Text("24".into()),
            "legacy encoding migrated on read"
        );
    }

    #[test]
    fn test_unrecognized_stored_keys_are_ignored() {
        let raw = serde_json::json!({"futureSetting": 7, "showDay": false});
        let snapshot = SettingsSnapshot::from_stored(raw.as_object().unwrap());
        assert!(!snapshot.show_day());
        assert_eq!(snapshot.iter().count(), SettingKey::ALL.len());
    }

    #[test]
    fn test_garbled_typed_value_degrades_to_default() {
        let raw = serde_json::json!({"clockStyle": "holographic"});
        let snapshot = SettingsSnapshot::from_stored(raw.as_object().unwrap());
        assert_eq!(snapshot.clock_style(), ClockStyle::Digital);
    }

    #[test]
    fn test_override_accessors_absent_by_default() {
        let snapshot = SettingsSnapshot::defaults();
        assert_eq!(snapshot.text_color(), None);
        assert_eq!(snapshot.gradient_colors(), None);
        assert_eq!(snapshot.gradient_angle(), None);
        assert_eq!(snapshot.background_blur(), None);
    }

    #[test]
    fn test_store_document_round_trip() {
        let mut snapshot = SettingsSnapshot::defaults();
        snapshot.set(SettingKey::Theme, SettingValue::Text("rose".into()));
        let document = snapshot.to_store_document();
        let rebuilt = SettingsSnapshot::from_stored(&document);
        assert_eq!(rebuilt, snapshot);
    }
}
