//! Generated schedule used when no real schedule source is reachable.
//!
//! The times are illustrative, not astronomical: sehri drifts earlier and iftar
//! later over a 15-day cycle, and the midday prayers cycle every five days.

use chrono::{Days, NaiveDate};

use crate::schedule::PrayerDay;

/// Format used for generated date labels, e.g. `Sun Mar 02 2025`.
pub const DATE_LABEL_FORMAT: &str = "%a %b %d %Y";

/// Generate `days` consecutive schedule days starting at `start`.
pub fn generate_schedule(start: NaiveDate, days: u32) -> Vec<PrayerDay> {
    (0..days)
        .map_while(|i| {
            let date = start.checked_add_days(Days::new(u64::from(i)))?;
            Some(PrayerDay {
                day_number: i + 1,
                date_label: date.format(DATE_LABEL_FORMAT).to_string(),
                sehri_end: format!("04:{:02}", 30 - i % 15),
                dhuhr: format!("13:{:02}", 15 + i % 5),
                asr: format!("16:{:02}", 30 + i % 5),
                iftar_start: format!("18:{:02}", 30 + i % 15),
                isha: format!("20:{:02}", 15 + i % 5),
            })
        })
        .collect()
}
