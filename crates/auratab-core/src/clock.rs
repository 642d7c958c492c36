//! Pure clock derivations
//!
//! Everything the clock faces display is derived here from a snapshot
//! plus a timestamp, so the presentation reactors stay trivial and the
//! formatting is testable without a running timer.

use crate::settings::SettingsSnapshot;
use crate::types::TimeFormat;
use chrono::{Datelike, NaiveDateTime, Timelike};

/// Text content of the digital face and the date row.
#[derive(Debug, Clone, PartialEq)]
pub struct ClockReading {
    /// "H:MM" in 12-hour mode, "HH:MM" in 24-hour mode.
    pub time_text: String,
    /// "AM"/"PM", present only in 12-hour mode with `showAmPm` on.
    pub am_pm: Option<String>,
    /// E.g. "Mar 14".
    pub date_text: String,
    /// E.g. "Thursday".
    pub day_text: String,
}

impl ClockReading {
    pub fn compute(snapshot: &SettingsSnapshot, now: NaiveDateTime) -> ClockReading {
        let minute = now.minute();
        let (time_text, am_pm) = match snapshot.time_format() {
            TimeFormat::TwelveHour => {
                let (is_pm, hour12) = now.hour12();
                let suffix = if is_pm { "PM" } else { "AM" };
                (
                    format!("{hour12}:{minute:02}"),
                    snapshot.show_am_pm().then(|| suffix.to_string()),
                )
            }
            TimeFormat::TwentyFourHour => (format!("{:02}:{minute:02}", now.hour()), None),
        };

        ClockReading {
            time_text,
            am_pm,
            date_text: format!("{} {}", month_abbrev(now.month()), now.day()),
            day_text: weekday_name(now.weekday()).to_string(),
        }
    }
}

fn month_abbrev(month: u32) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        _ => "Dec",
    }
}

fn weekday_name(weekday: chrono::Weekday) -> &'static str {
    match weekday {
        chrono::Weekday::Mon => "Monday",
        chrono::Weekday::Tue => "Tuesday",
        chrono::Weekday::Wed => "Wednesday",
        chrono::Weekday::Thu => "Thursday",
        chrono::Weekday::Fri => "Friday",
        chrono::Weekday::Sat => "Saturday",
        chrono::Weekday::Sun => "Sunday",
    }
}

/// Rotations of the analog hands, in degrees clockwise from 12 o'clock.
#[derive(Debug, Clone, PartialEq)]
pub struct HandAngles {
    pub hour: f64,
    pub minute: f64,
    pub second: f64,
}

/// Compute hand rotations for a point in time.
///
/// With `smooth` the hands carry their sub-unit fraction (milliseconds
/// into the second hand, seconds into the minute hand, minutes into the
/// hour hand) so they sweep instead of stepping.
pub fn hand_angles(now: NaiveDateTime, smooth: bool) -> HandAngles {
    let seconds = now.second() as f64;
    let minutes = now.minute() as f64;
    let hours = (now.hour() % 12) as f64;
    let millis = f64::from(now.and_utc().timestamp_subsec_millis());

    let (seconds, minutes, hours) = if smooth {
        let seconds = seconds + millis / 1000.0;
        let minutes = minutes + seconds / 60.0;
        let hours = hours + minutes / 60.0;
        (seconds, minutes, hours)
    } else {
        (seconds, minutes, hours + minutes / 60.0)
    };

    HandAngles {
        hour: hours / 12.0 * 360.0,
        minute: minutes / 60.0 * 360.0,
        second: seconds / 60.0 * 360.0,
    }
}
