//! Pure theme resolution
//!
//! `resolve_theme` maps a settings snapshot plus a timestamp to a
//! `ResolvedTheme`. No hidden state: the same snapshot and the same time
//! bucket always produce the same result.

use super::palette::{base_style, ThemeStyle};
use crate::settings::SettingsSnapshot;
use crate::types::{ResolvedTheme, ThemeData, ThemeName};
use chrono::{NaiveDateTime, Timelike};

/// Map an hour of day to its dynamic theme bucket:
/// [6,12) sunrise, [12,18) horizon, [18,21) twilight, otherwise midnight.
pub fn time_bucket(hour: u32) -> ThemeName {
    match hour {
        6..=11 => ThemeName::Sunrise,
        12..=17 => ThemeName::Horizon,
        18..=20 => ThemeName::Twilight,
        _ => ThemeName::Midnight,
    }
}

/// Resolve the effective theme name: an explicit named theme wins
/// outright; `dynamic` and `system` resolve against the clock.
pub fn effective_theme_name(snapshot: &SettingsSnapshot, now: NaiveDateTime) -> ThemeName {
    let configured = snapshot.theme();
    if configured.is_time_resolved() {
        time_bucket(now.hour())
    } else {
        configured
    }
}

/// Resolve the full theme for a snapshot at a point in time.
///
/// The effective name selects a palette entry (falling back to the
/// current time bucket's entry when the name has none, e.g. `custom`),
/// then each style field the snapshot explicitly defines overrides the
/// table value.
pub fn resolve_theme(snapshot: &SettingsSnapshot, now: NaiveDateTime) -> ResolvedTheme {
    let effective = effective_theme_name(snapshot, now);

    let style: &ThemeStyle = base_style(effective)
        .or_else(|| base_style(time_bucket(now.hour())))
        .expect("time buckets always map to palette entries");

    let data = ThemeData {
        text_color: snapshot
            .text_color()
            .unwrap_or(style.text_color)
            .to_string(),
        background_color: snapshot
            .background_color()
            .unwrap_or(style.background_color)
            .to_string(),
        gradient_colors: snapshot
            .gradient_colors()
            .map(<[String]>::to_vec)
            .or_else(|| {
                style
                    .gradient_colors
                    .map(|colors| colors.iter().map(|c| c.to_string()).collect())
            }),
        gradient_angle: snapshot.gradient_angle().or(style.gradient_angle),
        background_image: snapshot.background_image().map(str::to_string),
        background_blur: snapshot.background_blur(),
    };

    ResolvedTheme {
        effective_theme: effective,
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SettingsSnapshot;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 14)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn snapshot_with(entries: serde_json::Value) -> SettingsSnapshot {
        SettingsSnapshot::from_stored(entries.as_object().unwrap())
    }

    #[test]
    fn test_bucket_boundaries() {
        // 5:59 is still night; 6:00 flips to sunrise, and so on around
        // the clock.
        assert_eq!(time_bucket(5), ThemeName::Midnight);
        assert_eq!(time_bucket(6), ThemeName::Sunrise);
        assert_eq!(time_bucket(11), ThemeName::Sunrise);
        assert_eq!(time_bucket(12), ThemeName::Horizon);
        assert_eq!(time_bucket(17), ThemeName::Horizon);
        assert_eq!(time_bucket(18), ThemeName::Twilight);
        assert_eq!(time_bucket(20), ThemeName::Twilight);
        assert_eq!(time_bucket(21), ThemeName::Midnight);
        assert_eq!(time_bucket(0), ThemeName::Midnight);
    }

    #[test]
    fn test_dynamic_theme_follows_the_clock() {
        let snapshot = SettingsSnapshot::defaults(); // theme = dynamic

        assert_eq!(
            resolve_theme(&snapshot, at(5, 59)).effective_theme,
            ThemeName::Midnight
        );
        assert_eq!(
            resolve_theme(&snapshot, at(11, 59)).effective_theme,
            ThemeName::Sunrise
        );
        assert_eq!(
            resolve_theme(&snapshot, at(17, 59)).effective_theme,
            ThemeName::Horizon
        );
        assert_eq!(
            resolve_theme(&snapshot, at(20, 59)).effective_theme,
            ThemeName::Twilight
        );
        assert_eq!(
            resolve_theme(&snapshot, at(21, 0)).effective_theme,
            ThemeName::Midnight
        );
    }

    #[test]
    fn test_explicit_theme_overrides_the_clock() {
        let snapshot = snapshot_with(serde_json::json!({"theme": "forest"}));

        for hour in [0, 6, 12, 18, 21] {
            let resolved = resolve_theme(&snapshot, at(hour, 30));
            assert_eq!(resolved.effective_theme, ThemeName::Forest);
        }
    }

    #[test]
    fn test_system_theme_resolves_like_dynamic() {
        let snapshot = snapshot_with(serde_json::json!({"theme": "system"}));
        assert_eq!(
            resolve_theme(&snapshot, at(13, 0)).effective_theme,
            ThemeName::Horizon
        );
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let snapshot = snapshot_with(serde_json::json!({"theme": "dynamic"}));
        let first = resolve_theme(&snapshot, at(10, 15));
        let second = resolve_theme(&snapshot, at(10, 45));
        assert_eq!(first, second, "same snapshot + same bucket => same theme");
    }

    #[test]
    fn test_snapshot_overrides_win_per_field() {
        let snapshot = snapshot_with(serde_json::json!({
            "theme": "forest",
            "textColor": "#123456",
            "backgroundBlur": 4
        }));
        let resolved = resolve_theme(&snapshot, at(10, 0));

        assert_eq!(resolved.data.text_color, "#123456");
        assert_eq!(resolved.data.background_blur, Some(4.0));
        // Fields the snapshot leaves null come from the palette.
        assert_eq!(
            resolved.data.background_color,
            base_style(ThemeName::Forest).unwrap().background_color
        );
        assert!(resolved.data.gradient_colors.is_some());
    }

    #[test]
    fn test_custom_theme_falls_back_to_bucket_style() {
        let snapshot = snapshot_with(serde_json::json!({
            "theme": "custom",
            "backgroundColor": "#101010"
        }));
        let resolved = resolve_theme(&snapshot, at(13, 0));

        assert_eq!(resolved.effective_theme, ThemeName::Custom);
        assert_eq!(resolved.data.background_color, "#101010");
        // Unset fields fall back to the horizon (13:00) entry.
        assert_eq!(
            resolved.data.text_color,
            base_style(ThemeName::Horizon).unwrap().text_color
        );
    }
}
