//! Compiled-in settings schema: defaults, key aliasing, normalization
//!
//! The store is the only place legacy spellings survive; everything past
//! this module sees canonical keys and values. Every recognized key has
//! exactly one compiled default.

use crate::types::{SettingKey, SettingValue, TimeFormat};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use tracing::debug;

/// Compiled default for a single key.
///
/// Override-style keys (text color, gradient fields, background image)
/// default to `Null`: they have no effect until the user sets them, and
/// theme resolution falls back to the palette table for them.
pub fn default_value(key: SettingKey) -> SettingValue {
    match key {
        SettingKey::TimeFormat => SettingValue::Text("12".into()),
        SettingKey::ShowAmPm => SettingValue::Bool(false),
        SettingKey::ShowDate => SettingValue::Bool(true),
        SettingKey::ShowDay => SettingValue::Bool(true),
        SettingKey::ClockStyle => SettingValue::Text("digital".into()),
        SettingKey::FontFamily => SettingValue::Text("Inter".into()),
        SettingKey::FontSize => SettingValue::Text("1em".into()),
        SettingKey::FontWeight => SettingValue::Text("400".into()),
        SettingKey::TextColor => SettingValue::Null,
        SettingKey::BackgroundColor => SettingValue::Null,
        SettingKey::BackgroundType => SettingValue::Text("solid".into()),
        SettingKey::GradientColors => SettingValue::Null,
        SettingKey::GradientAngle => SettingValue::Null,
        SettingKey::Theme => SettingValue::Text("dynamic".into()),
        SettingKey::BackgroundImage => SettingValue::Null,
        SettingKey::BackgroundBlur => SettingValue::Null,
        SettingKey::BackgroundBrightness => SettingValue::Number(100.0),
        SettingKey::BackgroundContrast => SettingValue::Number(100.0),
        SettingKey::BackgroundSaturation => SettingValue::Number(100.0),
        SettingKey::BackgroundHue => SettingValue::Number(0.0),
        SettingKey::BackgroundGrayscale => SettingValue::Bool(false),
        SettingKey::BackgroundInvert => SettingValue::Bool(false),
        SettingKey::BackgroundSepia => SettingValue::Bool(false),
        SettingKey::BackgroundOpacity => SettingValue::Number(100.0),
        SettingKey::AnimationSpeed => SettingValue::Text("normal".into()),
        SettingKey::AnimationType => SettingValue::Text("fade".into()),
        SettingKey::EnableAnimations => SettingValue::Bool(true),
        SettingKey::ShowGrain => SettingValue::Bool(true),
        SettingKey::GrainIntensity => SettingValue::Number(50.0),
        SettingKey::GrainOpacity => SettingValue::Number(0.08),
        SettingKey::GrainSize => SettingValue::Number(2.0),
        SettingKey::GrainSpeed => SettingValue::Number(1.0),
        SettingKey::GrainColor => SettingValue::Text("#ffffff".into()),
        SettingKey::GrainBlendMode => SettingValue::Text("overlay".into()),
        SettingKey::ShowMarkers => SettingValue::Bool(true),
        SettingKey::SmoothMotion => SettingValue::Bool(true),
    }
}

/// The full default map, built once.
pub static DEFAULTS: Lazy<BTreeMap<SettingKey, SettingValue>> = Lazy::new(|| {
    SettingKey::ALL
        .iter()
        .map(|&key| (key, default_value(key)))
        .collect()
});

/// Resolve a raw store key to a schema key, accepting the legacy aliases
/// older writers used for the same conceptual setting.
pub fn resolve_key(raw: &str) -> Option<SettingKey> {
    match raw {
        "fontStyle" => Some(SettingKey::FontFamily),
        "gradientStyle" => Some(SettingKey::Theme),
        other => SettingKey::parse(other),
    }
}

/// Normalize a value read from the store into its canonical encoding.
///
/// Currently only `timeFormat` needs migration (`"12h"`/`"12hr"`/`"24h"`
/// collapse to `"12"`/`"24"`). Values that cannot be normalized pass
/// through unchanged; typed accessors degrade them to defaults.
pub fn normalize(key: SettingKey, value: SettingValue) -> SettingValue {
    match (key, &value) {
        (SettingKey::TimeFormat, SettingValue::Text(raw)) => match TimeFormat::parse(raw) {
            Some(format) => SettingValue::Text(format.as_str().into()),
            None => value,
        },
        _ => value,
    }
}

/// Convert a raw store document into recognized, normalized entries.
///
/// Unrecognized keys and unrepresentable value shapes are dropped with a
/// debug log - readers stay forward compatible with newer writers.
pub fn sanitize_stored(
    raw: &serde_json::Map<String, serde_json::Value>,
) -> BTreeMap<SettingKey, SettingValue> {
    let mut entries = BTreeMap::new();
    for (raw_key, raw_value) in raw {
        let Some(key) = resolve_key(raw_key) else {
            debug!("ignoring unrecognized stored key: {raw_key}");
            continue;
        };
        let Some(value) = SettingValue::from_json(raw_value) else {
            debug!("ignoring unrepresentable stored value for {raw_key}");
            continue;
        };
        entries.insert(key, normalize(key, value));
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_every_key_has_one_default() {
        assert_eq!(DEFAULTS.len(), SettingKey::ALL.len());
    }

    #[test]
    fn test_override_keys_default_to_null() {
        for key in [
            SettingKey::TextColor,
            SettingKey::BackgroundColor,
            SettingKey::GradientColors,
            SettingKey::GradientAngle,
            SettingKey::BackgroundImage,
            SettingKey::BackgroundBlur,
        ] {
            assert!(default_value(key).is_null(), "{key} should default to null");
        }
    }

    #[test]
    fn test_resolve_key_aliases() {
        assert_eq!(resolve_key("fontStyle"), Some(SettingKey::FontFamily));
        assert_eq!(resolve_key("gradientStyle"), Some(SettingKey::Theme));
        assert_eq!(resolve_key("theme"), Some(SettingKey::Theme));
        assert_eq!(resolve_key("bogus"), None);
    }

    #[test]
    fn test_normalize_time_format_synonyms() {
        for (legacy, canonical) in [("12h", "12"), ("12hr", "12"), ("24h", "24"), ("24", "24")] {
            assert_eq!(
                normalize(SettingKey::TimeFormat, SettingValue::Text(legacy.into())),
                SettingValue::Text(canonical.into())
            );
        }
    }

    #[test]
    fn test_normalize_leaves_other_keys_alone() {
        let value = SettingValue::Text("12h".into());
        assert_eq!(
            normalize(SettingKey::FontSize, value.clone()),
            value,
            "only timeFormat is migrated"
        );
    }

    #[test]
    fn test_sanitize_stored_filters_and_normalizes() {
        let raw = serde_json::json!({
            "timeFormat": "12hr",
            "gradientStyle": "forest",
            "notASetting": true,
            "showDate": {"nested": "object"},
            "showDay": false
        });
        let entries = sanitize_stored(raw.as_object().unwrap());

        assert_eq!(
            entries.get(&SettingKey::TimeFormat),
            Some(&SettingValue::Text("12".into()))
        );
        assert_eq!(
            entries.get(&SettingKey::Theme),
            Some(&SettingValue::Text("forest".into()))
        );
        assert_eq!(entries.get(&SettingKey::ShowDate), None);
        assert_eq!(
            entries.get(&SettingKey::ShowDay),
            Some(&SettingValue::Bool(false))
        );
        assert_eq!(entries.len(), 3);
    }
}
