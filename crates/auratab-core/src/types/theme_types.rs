//! Theme naming and resolved theme data

use serde::{Deserialize, Serialize};
use std::fmt;

/// Every theme identifier a snapshot can carry.
///
/// `Dynamic` and `System` are indirections resolved against the clock;
/// `Custom` takes all of its style from per-field overrides; the rest are
/// concrete entries in the palette table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    Light,
    Dark,
    System,
    Dynamic,
    Custom,
    Graphite,
    Sunrise,
    Horizon,
    Twilight,
    Midnight,
    Aurora,
    Pacific,
    Sierra,
    Rose,
    Forest,
    Ocean,
    Desert,
    Lavender,
    Mint,
}

impl ThemeName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeName::Light => "light",
            ThemeName::Dark => "dark",
            ThemeName::System => "system",
            ThemeName::Dynamic => "dynamic",
            ThemeName::Custom => "custom",
            ThemeName::Graphite => "graphite",
            ThemeName::Sunrise => "sunrise",
            ThemeName::Horizon => "horizon",
            ThemeName::Twilight => "twilight",
            ThemeName::Midnight => "midnight",
            ThemeName::Aurora => "aurora",
            ThemeName::Pacific => "pacific",
            ThemeName::Sierra => "sierra",
            ThemeName::Rose => "rose",
            ThemeName::Forest => "forest",
            ThemeName::Ocean => "ocean",
            ThemeName::Desert => "desert",
            ThemeName::Lavender => "lavender",
            ThemeName::Mint => "mint",
        }
    }

    pub fn parse(raw: &str) -> Option<ThemeName> {
        match raw {
            "light" => Some(ThemeName::Light),
            "dark" => Some(ThemeName::Dark),
            "system" => Some(ThemeName::System),
            "dynamic" => Some(ThemeName::Dynamic),
            "custom" => Some(ThemeName::Custom),
            "graphite" => Some(ThemeName::Graphite),
            "sunrise" => Some(ThemeName::Sunrise),
            "horizon" => Some(ThemeName::Horizon),
            "twilight" => Some(ThemeName::Twilight),
            "midnight" => Some(ThemeName::Midnight),
            "aurora" => Some(ThemeName::Aurora),
            "pacific" => Some(ThemeName::Pacific),
            "sierra" => Some(ThemeName::Sierra),
            "rose" => Some(ThemeName::Rose),
            "forest" => Some(ThemeName::Forest),
            "ocean" => Some(ThemeName::Ocean),
            "desert" => Some(ThemeName::Desert),
            "lavender" => Some(ThemeName::Lavender),
            "mint" => Some(ThemeName::Mint),
            _ => None,
        }
    }

    /// True for the indirections that must be resolved against the clock
    /// before a palette entry can be looked up.
    pub fn is_time_resolved(&self) -> bool {
        matches!(self, ThemeName::Dynamic | ThemeName::System)
    }
}

impl fmt::Display for ThemeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Style fields of a resolved theme, in the wire shape the tab applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeData {
    pub text_color: String,
    pub background_color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gradient_colors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gradient_angle: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_blur: Option<f64>,
}

/// Output of theme resolution: the concrete theme identity plus its style.
///
/// Never persisted - recomputed on demand from a snapshot and a timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTheme {
    pub effective_theme: ThemeName,
    pub data: ThemeData,
}

impl ResolvedTheme {
    /// Safe theme applied when resolution or delivery fails: plain readable
    /// text on a dark background, so the surface is never left blank.
    pub fn fallback() -> ResolvedTheme {
        ResolvedTheme {
            effective_theme: ThemeName::Dark,
            data: ThemeData {
                text_color: "#ffffff".to_string(),
                background_color: "#1a1a1a".to_string(),
                gradient_colors: None,
                gradient_angle: None,
                background_image: None,
                background_blur: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_name_round_trips() {
        for raw in [
            "light", "dark", "system", "dynamic", "custom", "graphite", "sunrise", "horizon",
            "twilight", "midnight", "aurora", "pacific", "sierra", "rose", "forest", "ocean",
            "desert", "lavender", "mint",
        ] {
            let name = ThemeName::parse(raw).unwrap();
            assert_eq!(name.as_str(), raw);
        }
        assert_eq!(ThemeName::parse("sepia"), None);
    }

    #[test]
    fn test_time_resolved_markers() {
        assert!(ThemeName::Dynamic.is_time_resolved());
        assert!(ThemeName::System.is_time_resolved());
        assert!(!ThemeName::Forest.is_time_resolved());
        assert!(!ThemeName::Custom.is_time_resolved());
    }

    #[test]
    fn test_theme_data_wire_shape_omits_absent_fields() {
        let data = ThemeData {
            text_color: "#fff".into(),
            background_color: "#000".into(),
            gradient_colors: None,
            gradient_angle: None,
            background_image: None,
            background_blur: None,
        };
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"textColor": "#fff", "backgroundColor": "#000"})
        );
    }
}
