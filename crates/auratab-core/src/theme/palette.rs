//! Static theme palette table

use crate::types::ThemeName;

/// Base style for a named theme. Snapshot-level overrides are applied on
/// top of these during resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeStyle {
    pub text_color: &'static str,
    pub background_color: &'static str,
    pub gradient_colors: Option<&'static [&'static str]>,
    pub gradient_angle: Option<f64>,
}

static LIGHT: ThemeStyle = ThemeStyle {
    text_color: "#000000",
    background_color: "#ffffff",
    gradient_colors: Some(&["#e0e0e0", "#f5f5f5"]),
    gradient_angle: Some(90.0),
};

static DARK: ThemeStyle = ThemeStyle {
    text_color: "#ffffff",
    background_color: "#000000",
    gradient_colors: Some(&["#141E30", "#243B55"]),
    gradient_angle: Some(90.0),
};

static GRAPHITE: ThemeStyle = ThemeStyle {
    text_color: "#ffffff",
    background_color: "#333333",
    gradient_colors: Some(&["#222222", "#444444"]),
    gradient_angle: Some(135.0),
};

static SUNRISE: ThemeStyle = ThemeStyle {
    text_color: "#3b2f2f",
    background_color: "#ffd89b",
    gradient_colors: Some(&["#ff9a8b", "#ffd89b"]),
    gradient_angle: Some(45.0),
};

static HORIZON: ThemeStyle = ThemeStyle {
    text_color: "#102a43",
    background_color: "#a6d8ff",
    gradient_colors: Some(&["#56ccf2", "#a6d8ff"]),
    gradient_angle: Some(180.0),
};

static TWILIGHT: ThemeStyle = ThemeStyle {
    text_color: "#f3e8ff",
    background_color: "#4a3b78",
    gradient_colors: Some(&["#2b2250", "#6b4f9e"]),
    gradient_angle: Some(200.0),
};

static MIDNIGHT: ThemeStyle = ThemeStyle {
    text_color: "#e6ecff",
    background_color: "#0b1026",
    gradient_colors: Some(&["#0b1026", "#1c2541"]),
    gradient_angle: Some(160.0),
};

static AURORA: ThemeStyle = ThemeStyle {
    text_color: "#e8fff4",
    background_color: "#0f3d3e",
    gradient_colors: Some(&["#0f3d3e", "#39a380"]),
    gradient_angle: Some(120.0),
};

static PACIFIC: ThemeStyle = ThemeStyle {
    text_color: "#eafdff",
    background_color: "#0f4c5c",
    gradient_colors: Some(&["#0f4c5c", "#1b7f8e"]),
    gradient_angle: Some(150.0),
};

static SIERRA: ThemeStyle = ThemeStyle {
    text_color: "#fff4e6",
    background_color: "#7a4a2b",
    gradient_colors: Some(&["#5a3620", "#a06a3f"]),
    gradient_angle: Some(135.0),
};

static ROSE: ThemeStyle = ThemeStyle {
    text_color: "#4a1228",
    background_color: "#ffd1dc",
    gradient_colors: Some(&["#ff9aad", "#ffd1dc"]),
    gradient_angle: Some(60.0),
};

static FOREST: ThemeStyle = ThemeStyle {
    text_color: "#eaf7ea",
    background_color: "#1d3b24",
    gradient_colors: Some(&["#14281a", "#2f5d3a"]),
    gradient_angle: Some(140.0),
};

static OCEAN: ThemeStyle = ThemeStyle {
    text_color: "#e6f7ff",
    background_color: "#033860",
    gradient_colors: Some(&["#022b4a", "#0a5c8c"]),
    gradient_angle: Some(170.0),
};

static DESERT: ThemeStyle = ThemeStyle {
    text_color: "#4a3517",
    background_color: "#f0d9a8",
    gradient_colors: Some(&["#e8c07a", "#f0d9a8"]),
    gradient_angle: Some(75.0),
};

static LAVENDER: ThemeStyle = ThemeStyle {
    text_color: "#3c2a52",
    background_color: "#e6e0f8",
    gradient_colors: Some(&["#c3b5e8", "#e6e0f8"]),
    gradient_angle: Some(110.0),
};

static MINT: ThemeStyle = ThemeStyle {
    text_color: "#0e3d2c",
    background_color: "#d8f5e3",
    gradient_colors: Some(&["#a8e6c3", "#d8f5e3"]),
    gradient_angle: Some(100.0),
};

/// Look up the base style for a theme name.
///
/// `Dynamic`, `System` and `Custom` have no entry of their own:
/// the first two resolve to a concrete name first, and `Custom` is built
/// entirely from snapshot overrides over the resolution-time fallback.
pub fn base_style(name: ThemeName) -> Option<&'static ThemeStyle> {
    match name {
        ThemeName::Light => Some(&LIGHT),
        ThemeName::Dark => Some(&DARK),
        ThemeName::Graphite => Some(&GRAPHITE),
        ThemeName::Sunrise => Some(&SUNRISE),
        ThemeName::Horizon => Some(&HORIZON),
        ThemeName::Twilight => Some(&TWILIGHT),
        ThemeName::Midnight => Some(&MIDNIGHT),
        ThemeName::Aurora => Some(&AURORA),
        ThemeName::Pacific => Some(&PACIFIC),
        ThemeName::Sierra => Some(&SIERRA),
        ThemeName::Rose => Some(&ROSE),
        ThemeName::Forest => Some(&FOREST),
        ThemeName::Ocean => Some(&OCEAN),
        ThemeName::Desert => Some(&DESERT),
        ThemeName::Lavender => Some(&LAVENDER),
        ThemeName::Mint => Some(&MINT),
        ThemeName::Dynamic | ThemeName::System | ThemeName::Custom => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concrete_themes_have_entries() {
        for name in [
            ThemeName::Light,
            ThemeName::Dark,
            ThemeName::Graphite,
            ThemeName::Sunrise,
            ThemeName::Horizon,
            ThemeName::Twilight,
            ThemeName::Midnight,
            ThemeName::Aurora,
            ThemeName::Pacific,
            ThemeName::Sierra,
            ThemeName::Rose,
            ThemeName::Forest,
            ThemeName::Ocean,
            ThemeName::Desert,
            ThemeName::Lavender,
            ThemeName::Mint,
        ] {
            assert!(base_style(name).is_some(), "{name} missing palette entry");
        }
    }

    #[test]
    fn test_indirections_have_no_entries() {
        assert!(base_style(ThemeName::Dynamic).is_none());
        assert!(base_style(ThemeName::System).is_none());
        assert!(base_style(ThemeName::Custom).is_none());
    }
}
