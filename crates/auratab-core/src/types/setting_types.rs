//! Setting keys, values, and typed views over raw values
//!
//! The persisted schema is a closed set of keys (`SettingKey`) mapping to
//! loosely-typed JSON-compatible values (`SettingValue`). Typed enums
//! (`TimeFormat`, `ClockStyle`, ...) parse leniently so that stale or
//! hand-edited store contents degrade to defaults instead of failing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Every recognized setting key, in wire (camelCase) spelling.
///
/// Keys absent from this enum but present in the store are ignored by
/// readers - forward compatibility with newer writers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SettingKey {
    TimeFormat,
    ShowAmPm,
    ShowDate,
    ShowDay,
    ClockStyle,
    FontFamily,
    FontSize,
    FontWeight,
    TextColor,
    BackgroundColor,
    BackgroundType,
    GradientColors,
    GradientAngle,
    Theme,
    BackgroundImage,
    BackgroundBlur,
    BackgroundBrightness,
    BackgroundContrast,
    BackgroundSaturation,
    BackgroundHue,
    BackgroundGrayscale,
    BackgroundInvert,
    BackgroundSepia,
    BackgroundOpacity,
    AnimationSpeed,
    AnimationType,
    EnableAnimations,
    ShowGrain,
    GrainIntensity,
    GrainOpacity,
    GrainSize,
    GrainSpeed,
    GrainColor,
    GrainBlendMode,
    ShowMarkers,
    SmoothMotion,
}

impl SettingKey {
    /// All recognized keys. The order matches the persisted schema listing.
    pub const ALL: [SettingKey; 36] = [
        SettingKey::TimeFormat,
        SettingKey::ShowAmPm,
        SettingKey::ShowDate,
        SettingKey::ShowDay,
        SettingKey::ClockStyle,
        SettingKey::FontFamily,
        SettingKey::FontSize,
        SettingKey::FontWeight,
        SettingKey::TextColor,
        SettingKey::BackgroundColor,
        SettingKey::BackgroundType,
        SettingKey::GradientColors,
        SettingKey::GradientAngle,
        SettingKey::Theme,
        SettingKey::BackgroundImage,
        SettingKey::BackgroundBlur,
        SettingKey::BackgroundBrightness,
        SettingKey::BackgroundContrast,
        SettingKey::BackgroundSaturation,
        SettingKey::BackgroundHue,
        SettingKey::BackgroundGrayscale,
        SettingKey::BackgroundInvert,
        SettingKey::BackgroundSepia,
        SettingKey::BackgroundOpacity,
        SettingKey::AnimationSpeed,
        SettingKey::AnimationType,
        SettingKey::EnableAnimations,
        SettingKey::ShowGrain,
        SettingKey::GrainIntensity,
        SettingKey::GrainOpacity,
        SettingKey::GrainSize,
        SettingKey::GrainSpeed,
        SettingKey::GrainColor,
        SettingKey::GrainBlendMode,
        SettingKey::ShowMarkers,
        SettingKey::SmoothMotion,
    ];

    /// Wire spelling of the key.
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::TimeFormat => "timeFormat",
            SettingKey::ShowAmPm => "showAmPm",
            SettingKey::ShowDate => "showDate",
            SettingKey::ShowDay => "showDay",
            SettingKey::ClockStyle => "clockStyle",
            SettingKey::FontFamily => "fontFamily",
            SettingKey::FontSize => "fontSize",
            SettingKey::FontWeight => "fontWeight",
            SettingKey::TextColor => "textColor",
            SettingKey::BackgroundColor => "backgroundColor",
            SettingKey::BackgroundType => "backgroundType",
            SettingKey::GradientColors => "gradientColors",
            SettingKey::GradientAngle => "gradientAngle",
            SettingKey::Theme => "theme",
            SettingKey::BackgroundImage => "backgroundImage",
            SettingKey::BackgroundBlur => "backgroundBlur",
            SettingKey::BackgroundBrightness => "backgroundBrightness",
            SettingKey::BackgroundContrast => "backgroundContrast",
            SettingKey::BackgroundSaturation => "backgroundSaturation",
            SettingKey::BackgroundHue => "backgroundHue",
            SettingKey::BackgroundGrayscale => "backgroundGrayscale",
            SettingKey::BackgroundInvert => "backgroundInvert",
            SettingKey::BackgroundSepia => "backgroundSepia",
            SettingKey::BackgroundOpacity => "backgroundOpacity",
            SettingKey::AnimationSpeed => "animationSpeed",
            SettingKey::AnimationType => "animationType",
            SettingKey::EnableAnimations => "enableAnimations",
            SettingKey::ShowGrain => "showGrain",
            SettingKey::GrainIntensity => "grainIntensity",
            SettingKey::GrainOpacity => "grainOpacity",
            SettingKey::GrainSize => "grainSize",
            SettingKey::GrainSpeed => "grainSpeed",
            SettingKey::GrainColor => "grainColor",
            SettingKey::GrainBlendMode => "grainBlendMode",
            SettingKey::ShowMarkers => "showMarkers",
            SettingKey::SmoothMotion => "smoothMotion",
        }
    }

    /// Parse a canonical wire spelling. Legacy aliases are handled one
    /// level up, in `settings::schema::resolve_key`.
    pub fn parse(raw: &str) -> Option<SettingKey> {
        SettingKey::ALL.iter().copied().find(|k| k.as_str() == raw)
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored setting value.
///
/// `Null` is a legitimate persisted value: per-field overrides (text color,
/// background image, ...) default to `Null` and only take effect once the
/// user sets them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl SettingValue {
    /// Convert a raw JSON value from the store into a setting value.
    ///
    /// Returns `None` for shapes the schema cannot represent (objects,
    /// mixed arrays); callers treat those entries as absent.
    pub fn from_json(value: &serde_json::Value) -> Option<SettingValue> {
        match value {
            serde_json::Value::Null => Some(SettingValue::Null),
            serde_json::Value::Bool(b) => Some(SettingValue::Bool(*b)),
            serde_json::Value::Number(n) => n.as_f64().map(SettingValue::Number),
            serde_json::Value::String(s) => Some(SettingValue::Text(s.clone())),
            serde_json::Value::Array(items) => {
                let strings: Option<Vec<String>> = items
                    .iter()
                    .map(|v| v.as_str().map(str::to_string))
                    .collect();
                strings.map(SettingValue::List)
            }
            serde_json::Value::Object(_) => None,
        }
    }

    /// Convert back to a raw JSON value for the store.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            SettingValue::Null => serde_json::Value::Null,
            SettingValue::Bool(b) => serde_json::Value::Bool(*b),
            SettingValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            SettingValue::Text(s) => serde_json::Value::String(s.clone()),
            SettingValue::List(items) => serde_json::Value::Array(
                items.iter().cloned().map(serde_json::Value::String).collect(),
            ),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SettingValue::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SettingValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SettingValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            SettingValue::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }
}

impl From<bool> for SettingValue {
    fn from(b: bool) -> Self {
        SettingValue::Bool(b)
    }
}

impl From<f64> for SettingValue {
    fn from(n: f64) -> Self {
        SettingValue::Number(n)
    }
}

impl From<i64> for SettingValue {
    fn from(n: i64) -> Self {
        SettingValue::Number(n as f64)
    }
}

impl From<&str> for SettingValue {
    fn from(s: &str) -> Self {
        SettingValue::Text(s.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(s: String) -> Self {
        SettingValue::Text(s)
    }
}

impl From<Vec<String>> for SettingValue {
    fn from(items: Vec<String>) -> Self {
        SettingValue::List(items)
    }
}

/// Canonical time format encoding: `"12"` or `"24"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFormat {
    TwelveHour,
    TwentyFourHour,
}

impl TimeFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeFormat::TwelveHour => "12",
            TimeFormat::TwentyFourHour => "24",
        }
    }

    /// Lenient parse accepting the legacy synonyms found in old stores.
    pub fn parse(raw: &str) -> Option<TimeFormat> {
        match raw {
            "12" | "12h" | "12hr" => Some(TimeFormat::TwelveHour),
            "24" | "24h" => Some(TimeFormat::TwentyFourHour),
            _ => None,
        }
    }
}

/// Which clock faces are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockStyle {
    Digital,
    Analog,
    Both,
}

impl ClockStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClockStyle::Digital => "digital",
            ClockStyle::Analog => "analog",
            ClockStyle::Both => "both",
        }
    }

    pub fn parse(raw: &str) -> Option<ClockStyle> {
        match raw {
            "digital" => Some(ClockStyle::Digital),
            "analog" => Some(ClockStyle::Analog),
            "both" => Some(ClockStyle::Both),
            _ => None,
        }
    }

    pub fn shows_digital(&self) -> bool {
        matches!(self, ClockStyle::Digital | ClockStyle::Both)
    }

    pub fn shows_analog(&self) -> bool {
        matches!(self, ClockStyle::Analog | ClockStyle::Both)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationSpeed {
    Slow,
    Normal,
    Fast,
}

impl AnimationSpeed {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimationSpeed::Slow => "slow",
            AnimationSpeed::Normal => "normal",
            AnimationSpeed::Fast => "fast",
        }
    }

    pub fn parse(raw: &str) -> Option<AnimationSpeed> {
        match raw {
            "slow" => Some(AnimationSpeed::Slow),
            "normal" => Some(AnimationSpeed::Normal),
            "fast" => Some(AnimationSpeed::Fast),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationType {
    Fade,
    Slide,
    Zoom,
    None,
}

impl AnimationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimationType::Fade => "fade",
            AnimationType::Slide => "slide",
            AnimationType::Zoom => "zoom",
            AnimationType::None => "none",
        }
    }

    pub fn parse(raw: &str) -> Option<AnimationType> {
        match raw {
            "fade" => Some(AnimationType::Fade),
            "slide" => Some(AnimationType::Slide),
            "zoom" => Some(AnimationType::Zoom),
            "none" => Some(AnimationType::None),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundType {
    Solid,
    Gradient,
    Image,
}

impl BackgroundType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackgroundType::Solid => "solid",
            BackgroundType::Gradient => "gradient",
            BackgroundType::Image => "image",
        }
    }

    pub fn parse(raw: &str) -> Option<BackgroundType> {
        match raw {
            "solid" => Some(BackgroundType::Solid),
            "gradient" => Some(BackgroundType::Gradient),
            "image" => Some(BackgroundType::Image),
            _ => None,
        }
    }
}
