//! Countdown arithmetic and clock formatting.
//!
//! Everything here is a pure function of its inputs: the caller supplies the
//! reference instant on every tick.

use std::fmt;

use chrono::{DateTime, TimeZone};
use serde::Serialize;

use crate::i18n::{Language, localize_digits};
use crate::schedule::parse_time_of_day;

/// Shown in place of a time that is missing from the schedule.
pub const TIME_PLACEHOLDER: &str = "--:--";

const MILLIS_PER_SECOND: i64 = 1000;

/// Time left until a target, split into clock fields.
///
/// `hours` wraps at 24; use `total_seconds` for longer spans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TimeRemaining {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub total_seconds: u64,
}

impl TimeRemaining {
    fn from_total_seconds(total: u64) -> Self {
        Self {
            hours: ((total / 3600) % 24) as u32,
            minutes: ((total / 60) % 60) as u32,
            seconds: (total % 60) as u32,
            total_seconds: total,
        }
    }

    /// True when the target has been reached.
    pub fn is_zero(&self) -> bool {
        self.total_seconds == 0
    }

    /// Zero-padded `HH:MM:SS`.
    pub fn to_clock(&self) -> String {
        format!("{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

impl fmt::Display for TimeRemaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_clock())
    }
}

/// Countdown to a date that may be weeks away, without the 24-hour wrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeasonCountdown {
    pub days: u64,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

fn millis_until<Tz: TimeZone, Tz2: TimeZone>(target: &DateTime<Tz>, now: &DateTime<Tz2>) -> i64 {
    target.timestamp_millis() - now.timestamp_millis()
}

/// Time remaining from `now` until `target`, clamped at zero.
pub fn remaining<Tz: TimeZone, Tz2: TimeZone>(
    target: &DateTime<Tz>,
    now: &DateTime<Tz2>,
) -> TimeRemaining {
    let diff = millis_until(target, now);
    if diff <= 0 {
        return TimeRemaining::default();
    }
    TimeRemaining::from_total_seconds((diff / MILLIS_PER_SECOND) as u64)
}

/// Days/hours/minutes/seconds until `target`, or `None` once it has passed.
pub fn countdown_to<Tz: TimeZone, Tz2: TimeZone>(
    target: &DateTime<Tz>,
    now: &DateTime<Tz2>,
) -> Option<SeasonCountdown> {
    let diff = millis_until(target, now);
    if diff <= 0 {
        return None;
    }
    let total = (diff / MILLIS_PER_SECOND) as u64;
    Some(SeasonCountdown {
        days: total / 86_400,
        hours: ((total / 3600) % 24) as u32,
        minutes: ((total / 60) % 60) as u32,
        seconds: (total % 60) as u32,
    })
}

/// True when `event` is less than one second away, or exactly now.
pub fn is_due<Tz: TimeZone, Tz2: TimeZone>(event: &DateTime<Tz>, now: &DateTime<Tz2>) -> bool {
    (0..MILLIS_PER_SECOND).contains(&millis_until(event, now))
}

/// 12-hour clock string such as `6:10 PM`, in the instant's own time zone.
pub fn format_clock_string<Tz>(instant: &DateTime<Tz>, language: Language) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    localize_digits(&instant.format("%-I:%M %p").to_string(), language)
}

/// Render a 24-hour `HH:MM` string as `H:MM AM/PM`.
pub fn format_time_of_day(value: &str) -> String {
    if value.is_empty() {
        return TIME_PLACEHOLDER.to_string();
    }
    match parse_time_of_day(value) {
        Some(time) => time.format("%-I:%M %p").to_string(),
        None => TIME_PLACEHOLDER.to_string(),
    }
}
