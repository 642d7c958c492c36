//! Clock face reactor

use super::surface::{Surface, SurfaceElement};
use crate::clock::{hand_angles, ClockReading};
use crate::settings::SettingsSnapshot;
use chrono::NaiveDateTime;
use std::sync::Arc;

/// Drives the digital and analog clock faces from a snapshot.
pub struct ClockRenderer {
    surface: Arc<dyn Surface>,
}

impl ClockRenderer {
    pub fn new(surface: Arc<dyn Surface>) -> ClockRenderer {
        ClockRenderer { surface }
    }

    /// Render the faces for a point in time: which faces are shown, the
    /// digital text, and the analog hand rotations.
    pub fn update_clock(&self, snapshot: &SettingsSnapshot, now: NaiveDateTime) {
        let style = snapshot.clock_style();
        self.surface
            .set_visible(SurfaceElement::DigitalFace, style.shows_digital());
        self.surface
            .set_visible(SurfaceElement::AnalogFace, style.shows_analog());

        let reading = ClockReading::compute(snapshot, now);
        if style.shows_digital() {
            self.surface
                .set_text(SurfaceElement::DigitalTime, &reading.time_text);
            match &reading.am_pm {
                Some(suffix) => {
                    self.surface.set_text(SurfaceElement::AmPm, suffix);
                    self.surface.set_visible(SurfaceElement::AmPm, true);
                }
                None => self.surface.set_visible(SurfaceElement::AmPm, false),
            }
        }

        if snapshot.show_date() {
            self.surface
                .set_text(SurfaceElement::DateText, &reading.date_text);
        }
        if snapshot.show_day() {
            self.surface
                .set_text(SurfaceElement::DayText, &reading.day_text);
        }

        if style.shows_analog() {
            let angles = hand_angles(now, snapshot.smooth_motion());
            self.surface
                .set_rotation(SurfaceElement::HourHand, angles.hour);
            self.surface
                .set_rotation(SurfaceElement::MinuteHand, angles.minute);
            self.surface
                .set_rotation(SurfaceElement::SecondHand, angles.second);
            self.surface
                .set_visible(SurfaceElement::HourMarkers, snapshot.show_markers());
        }

        self.surface
            .set_visible(SurfaceElement::Grain, snapshot.show_grain());
    }

    /// Show or hide the date row elements. The row itself collapses when
    /// both the date and the day are hidden.
    pub fn update_visibility(&self, snapshot: &SettingsSnapshot) {
        let date_visible = snapshot.show_date();
        let day_visible = snapshot.show_day();

        self.surface
            .set_visible(SurfaceElement::DateText, date_visible);
        self.surface.set_visible(SurfaceElement::DayText, day_visible);
        self.surface
            .set_visible(SurfaceElement::DateRow, date_visible || day_visible);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::MemorySurface;
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
    fn test_digital_style_hides_analog_face() {
        let surface = Arc::new(MemorySurface::new());
        let renderer = ClockRenderer::new(surface.clone());

        let snapshot = snapshot_with(serde_json::json!({
            "clockStyle": "digital",
            "timeFormat": "24"
        }));
        renderer.update_clock(&snapshot, at(9, 30));

        assert_eq!(surface.is_visible(SurfaceElement::DigitalFace), Some(true));
        assert_eq!(surface.is_visible(SurfaceElement::AnalogFace), Some(false));
        assert_eq!(
            surface.text(SurfaceElement::DigitalTime).as_deref(),
            Some("09:30")
        );
    }

    #[test]
    fn test_both_style_drives_both_faces() {
        let surface = Arc::new(MemorySurface::new());
        let renderer = ClockRenderer::new(surface.clone());

        let snapshot = snapshot_with(serde_json::json!({
            "clockStyle": "both",
            "timeFormat": "12",
            "showAmPm": true
        }));
        renderer.update_clock(&snapshot, at(15, 0));

        assert_eq!(surface.is_visible(SurfaceElement::DigitalFace), Some(true));
        assert_eq!(surface.is_visible(SurfaceElement::AnalogFace), Some(true));
        assert_eq!(surface.text(SurfaceElement::AmPm).as_deref(), Some("PM"));
        assert_eq!(surface.rotation(SurfaceElement::HourHand), Some(90.0));
    }

    #[test]
    fn test_markers_follow_setting() {
        let surface = Arc::new(MemorySurface::new());
        let renderer = ClockRenderer::new(surface.clone());

        let snapshot = snapshot_with(serde_json::json!({
            "clockStyle": "analog",
            "showMarkers": false
        }));
        renderer.update_clock(&snapshot, at(9, 0));
        assert_eq!(surface.is_visible(SurfaceElement::HourMarkers), Some(false));
    }

    #[test]
    fn test_visibility_row_collapses_when_both_hidden() {
        let surface = Arc::new(MemorySurface::new());
        let renderer = ClockRenderer::new(surface.clone());

        renderer.update_visibility(&snapshot_with(serde_json::json!({
            "showDate": false,
            "showDay": false
        })));
        assert_eq!(surface.is_visible(SurfaceElement::DateText), Some(false));
        assert_eq!(surface.is_visible(SurfaceElement::DayText), Some(false));
        assert_eq!(surface.is_visible(SurfaceElement::DateRow), Some(false));

        renderer.update_visibility(&snapshot_with(serde_json::json!({
            "showDate": true,
            "showDay": false
        })));
        assert_eq!(surface.is_visible(SurfaceElement::DateRow), Some(true));
    }

    #[test]
    fn test_detached_surface_never_panics() {
        let surface = Arc::new(MemorySurface::with_missing([
            SurfaceElement::DigitalTime,
            SurfaceElement::DateRow,
        ]));
        let renderer = ClockRenderer::new(surface.clone());

        let snapshot = SettingsSnapshot::defaults();
        renderer.update_clock(&snapshot, at(10, 0));
        renderer.update_visibility(&snapshot);

        assert_eq!(surface.text(SurfaceElement::DigitalTime), None);
    }
}
