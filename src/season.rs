//! Pre-Ramadan / Ramadan mode and the lookup of today's schedule row.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone};

use crate::provider::ScheduleSource;
use crate::schedule::{PrayerDay, localize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode<Tz: TimeZone> {
    /// Ramadan has not started; `starts_at` is known when a start date lies
    /// ahead.
    PreRamadan { starts_at: Option<DateTime<Tz>> },
    Ramadan,
}

impl<Tz: TimeZone> Mode<Tz> {
    pub fn is_pre_ramadan(&self) -> bool {
        matches!(self, Mode::PreRamadan { .. })
    }
}

/// Season state derived from the schedule and the current date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Season<Tz: TimeZone> {
    pub mode: Mode<Tz>,
    /// Index of today's row in the schedule, if there is one.
    pub today_index: Option<usize>,
}

impl<Tz: TimeZone> Season<Tz> {
    /// Schedule rows starting at today, as [`crate::schedule::next_event`]
    /// expects.
    pub fn aligned<'a>(&self, days: &'a [PrayerDay]) -> &'a [PrayerDay] {
        match self.today_index {
            Some(index) => &days[index.min(days.len())..],
            None => &[],
        }
    }

    pub fn today<'a>(&self, days: &'a [PrayerDay]) -> Option<&'a PrayerDay> {
        self.today_index.and_then(|index| days.get(index))
    }
}

fn midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Option<DateTime<Tz>> {
    localize(tz, date.and_time(NaiveTime::MIN))
}

/// Work out the season for `now`.
///
/// Custom schedules carry Ramadan's own dates: the first row is the first day
/// of fasting. Live schedules are ordinary timetables, so the start date comes
/// from `estimated_start`; today's row is the one dated today, or for undated
/// rows the one numbered with today's day of month.
pub fn determine<Tz: TimeZone>(
    days: &[PrayerDay],
    source: ScheduleSource,
    estimated_start: NaiveDate,
    now: &DateTime<Tz>,
) -> Season<Tz> {
    let tz = now.timezone();
    let today = now.date_naive();

    let first_date = days.first().and_then(PrayerDay::date);
    if let (ScheduleSource::Custom, Some(first)) = (source, first_date) {
        if today < first {
            return Season {
                mode: Mode::PreRamadan {
                    starts_at: midnight(&tz, first),
                },
                today_index: None,
            };
        }
        return Season {
            mode: Mode::Ramadan,
            today_index: days.iter().position(|d| d.date() == Some(today)),
        };
    }

    let starts_at = if today < estimated_start {
        midnight(&tz, estimated_start)
    } else {
        None
    };
    Season {
        mode: Mode::PreRamadan { starts_at },
        today_index: find_today(days, today),
    }
}

/// Dated rows are matched on their date; undated rows fall back to day of month.
fn find_today(days: &[PrayerDay], today: NaiveDate) -> Option<usize> {
    days.iter().position(|d| match d.date() {
        Some(date) => date == today,
        None => d.day_number == today.day(),
    })
}
