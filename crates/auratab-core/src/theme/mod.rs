//! Theme resolution
//!
//! A pure mapping from {settings snapshot, wall-clock time} to a
//! `ResolvedTheme`, plus the periodic ticker that re-evaluates the
//! dynamic time bucket.

mod palette;
mod resolve;
mod ticker;

pub use palette::{base_style, ThemeStyle};
pub use resolve::{effective_theme_name, resolve_theme, time_bucket};
pub use ticker::{DynamicThemeTicker, DYNAMIC_TICK_PERIOD};

use crate::types::SettingKey;

/// Keys whose change mandates theme re-resolution in open tabs.
pub const THEME_AFFECTING_KEYS: &[SettingKey] = &[
    SettingKey::Theme,
    SettingKey::ClockStyle,
    SettingKey::FontFamily,
    SettingKey::ShowAmPm,
    SettingKey::TimeFormat,
    SettingKey::EnableAnimations,
    SettingKey::ShowGrain,
    SettingKey::ShowMarkers,
    SettingKey::SmoothMotion,
];

/// Subset of the theme-affecting keys that can change the outcome of
/// dynamic resolution itself and therefore force an immediate
/// re-evaluation broadcast.
pub const DYNAMIC_CRITICAL_KEYS: &[SettingKey] = &[
    SettingKey::Theme,
    SettingKey::TimeFormat,
    SettingKey::EnableAnimations,
];

/// True when `key` belongs to the theme-affecting set.
pub fn affects_theme(key: SettingKey) -> bool {
    THEME_AFFECTING_KEYS.contains(&key)
}
