//! Surface contract and the in-memory implementation

use crate::types::ResolvedTheme;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// Addressable pieces of the page the reactors mutate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceElement {
    DigitalFace,
    DigitalTime,
    AmPm,
    DateRow,
    DateText,
    DayText,
    AnalogFace,
    HourHand,
    MinuteHand,
    SecondHand,
    HourMarkers,
    Grain,
}

/// The excluded presentation layer, seen from the reactors.
///
/// Implementations must tolerate being driven before their elements
/// exist: a missing element is a warn-and-return, never a panic, and a
/// failure here degrades to a safe visible state rather than a blank
/// page.
pub trait Surface: Send + Sync {
    fn set_text(&self, element: SurfaceElement, text: &str);
    fn set_visible(&self, element: SurfaceElement, visible: bool);
    fn set_rotation(&self, element: SurfaceElement, degrees: f64);
    fn apply_theme(&self, theme: &ResolvedTheme);
}

#[derive(Default)]
struct MemorySurfaceState {
    texts: HashMap<SurfaceElement, String>,
    visible: HashMap<SurfaceElement, bool>,
    rotations: HashMap<SurfaceElement, f64>,
    applied_themes: Vec<ResolvedTheme>,
}

/// Recording surface used by tests and the host shell.
///
/// By default every element exists; `detached` simulates a page whose
/// elements are not mounted yet (calls are logged and dropped).
pub struct MemorySurface {
    state: Mutex<MemorySurfaceState>,
    missing: HashSet<SurfaceElement>,
}

impl MemorySurface {
    pub fn new() -> MemorySurface {
        MemorySurface {
            state: Mutex::new(MemorySurfaceState::default()),
            missing: HashSet::new(),
        }
    }

    /// A surface on which the given elements do not exist.
    pub fn with_missing(missing: impl IntoIterator<Item = SurfaceElement>) -> MemorySurface {
        MemorySurface {
            state: Mutex::new(MemorySurfaceState::default()),
            missing: missing.into_iter().collect(),
        }
    }

    fn exists(&self, element: SurfaceElement) -> bool {
        if self.missing.contains(&element) {
            warn!("surface element {element:?} does not exist yet; ignoring update");
            return false;
        }
        true
    }

    pub fn text(&self, element: SurfaceElement) -> Option<String> {
        self.state.lock().texts.get(&element).cloned()
    }

    pub fn is_visible(&self, element: SurfaceElement) -> Option<bool> {
        self.state.lock().visible.get(&element).copied()
    }

    pub fn rotation(&self, element: SurfaceElement) -> Option<f64> {
        self.state.lock().rotations.get(&element).copied()
    }

    pub fn applied_theme_count(&self) -> usize {
        self.state.lock().applied_themes.len()
    }

    pub fn last_theme(&self) -> Option<ResolvedTheme> {
        self.state.lock().applied_themes.last().cloned()
    }
}

impl Default for MemorySurface {
    fn default() -> Self {
        MemorySurface::new()
    }
}

impl Surface for MemorySurface {
    fn set_text(&self, element: SurfaceElement, text: &str) {
        if self.exists(element) {
            self.state.lock().texts.insert(element, text.to_string());
        }
    }

    fn set_visible(&self, element: SurfaceElement, visible: bool) {
        if self.exists(element) {
            self.state.lock().visible.insert(element, visible);
        }
    }

    fn set_rotation(&self, element: SurfaceElement, degrees: f64) {
        if self.exists(element) {
            self.state.lock().rotations.insert(element, degrees);
        }
    }

    fn apply_theme(&self, theme: &ResolvedTheme) {
        self.state.lock().applied_themes.push(theme.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_updates() {
        let surface = MemorySurface::new();
        surface.set_text(SurfaceElement::DigitalTime, "3:07");
        surface.set_visible(SurfaceElement::Grain, false);
        surface.set_rotation(SurfaceElement::HourHand, 90.0);

        assert_eq!(
            surface.text(SurfaceElement::DigitalTime).as_deref(),
            Some("3:07")
        );
        assert_eq!(surface.is_visible(SurfaceElement::Grain), Some(false));
        assert_eq!(surface.rotation(SurfaceElement::HourHand), Some(90.0));
    }

    #[test]
    fn test_missing_elements_are_tolerated() {
        let surface = MemorySurface::with_missing([SurfaceElement::AmPm]);
        // Must not panic, must not record.
        surface.set_text(SurfaceElement::AmPm, "PM");
        surface.set_visible(SurfaceElement::AmPm, true);
        assert_eq!(surface.text(SurfaceElement::AmPm), None);
        assert_eq!(surface.is_visible(SurfaceElement::AmPm), None);
    }
}
