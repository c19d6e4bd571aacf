use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Date label formats seen in schedule data, tried in order.
const DATE_LABEL_FORMATS: [&str; 3] = ["%a %b %d %Y", "%d %b %Y", "%Y-%m-%d"];

/// One of the five daily prayer / fast boundaries.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Sehri,
    Dhuhr,
    Asr,
    Iftar,
    Isha,
}

impl EventKind {
    /// All kinds in the order they occur during a day.
    pub const ALL: [EventKind; 5] = [
        EventKind::Sehri,
        EventKind::Dhuhr,
        EventKind::Asr,
        EventKind::Iftar,
        EventKind::Isha,
    ];

    /// Key used for this kind in stored schedules and settings.
    pub fn key(&self) -> &'static str {
        match self {
            EventKind::Sehri => "sehri",
            EventKind::Dhuhr => "dhuhr",
            EventKind::Asr => "asr",
            EventKind::Iftar => "iftar",
            EventKind::Isha => "isha",
        }
    }
}

/// A single day of the prayer schedule.
///
/// Times are kept as the `HH:MM` strings the schedule sources deliver; they are
/// only interpreted when combined with a calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrayerDay {
    #[serde(rename = "day")]
    pub day_number: u32,
    #[serde(rename = "date")]
    pub date_label: String,
    #[serde(rename = "sehri")]
    pub sehri_end: String,
    pub dhuhr: String,
    pub asr: String,
    #[serde(rename = "iftar")]
    pub iftar_start: String,
    pub isha: String,
}

impl PrayerDay {
    /// Time-of-day string for the given event.
    pub fn time_of(&self, kind: EventKind) -> &str {
        match kind {
            EventKind::Sehri => &self.sehri_end,
            EventKind::Dhuhr => &self.dhuhr,
            EventKind::Asr => &self.asr,
            EventKind::Iftar => &self.iftar_start,
            EventKind::Isha => &self.isha,
        }
    }

    /// The five events of this day in canonical order.
    pub fn events(&self) -> impl Iterator<Item = (EventKind, &str)> + '_ {
        EventKind::ALL.into_iter().map(|kind| (kind, self.time_of(kind)))
    }

    /// Parse the calendar date out of `date_label`.
    pub fn date(&self) -> Option<NaiveDate> {
        parse_date_label(&self.date_label)
    }
}

/// The next upcoming event found in a schedule.
#[derive(Debug, Clone)]
pub struct ResolvedEvent<Tz: TimeZone> {
    pub kind: EventKind,
    pub instant: DateTime<Tz>,
    /// Index of the day in the input sequence this event belongs to.
    pub day_offset: usize,
}

impl<Tz: TimeZone> PartialEq for ResolvedEvent<Tz> {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.instant == other.instant
            && self.day_offset == other.day_offset
    }
}

impl<Tz: TimeZone> Eq for ResolvedEvent<Tz> {}

/// Parse a 24-hour `HH:MM` time of day.
pub fn parse_time_of_day(value: &str) -> Option<NaiveTime> {
    let (hours, minutes) = value.trim().split_once(':')?;
    let hours: u32 = hours.trim().parse().ok()?;
    let minutes: u32 = minutes.trim().parse().ok()?;
    NaiveTime::from_hms_opt(hours, minutes, 0)
}

/// Parse a schedule date label such as `Sun Mar 02 2025`, `02 Mar 2025` or
/// `2025-03-02`.
pub fn parse_date_label(label: &str) -> Option<NaiveDate> {
    let label = label.trim();
    DATE_LABEL_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(label, format).ok())
}

/// Find the next event strictly after `now`.
///
/// `days[0]` is taken to be the calendar date of `now`, `days[1]` the day
/// after, and so on. Date labels are not consulted.
pub fn next_event<Tz: TimeZone>(
    days: &[PrayerDay],
    now: &DateTime<Tz>,
) -> Option<ResolvedEvent<Tz>> {
    let today = now.date_naive();

    days.iter().enumerate().find_map(|(offset, day)| {
        let date = today.checked_add_days(Days::new(offset as u64))?;
        first_after(day, date, offset, now)
    })
}

/// Like [`next_event`], but positions each day by its own date label.
///
/// Days whose label cannot be parsed are skipped. The input should be in
/// chronological order; the first matching event in sequence order wins.
pub fn next_event_by_date<Tz: TimeZone>(
    days: &[PrayerDay],
    now: &DateTime<Tz>,
) -> Option<ResolvedEvent<Tz>> {
    let today = now.date_naive();

    days.iter()
        .enumerate()
        .filter_map(|(offset, day)| day.date().map(|date| (offset, day, date)))
        .filter(|(_, _, date)| *date >= today)
        .find_map(|(offset, day, date)| first_after(day, date, offset, now))
}

/// First event of `day`, placed on `date`, that lies strictly after `now`.
fn first_after<Tz: TimeZone>(
    day: &PrayerDay,
    date: NaiveDate,
    offset: usize,
    now: &DateTime<Tz>,
) -> Option<ResolvedEvent<Tz>> {
    let tz = now.timezone();

    day.events().find_map(|(kind, value)| {
        let time = parse_time_of_day(value)?;
        let instant = localize(&tz, date.and_time(time))?;
        (*now < instant).then_some(ResolvedEvent {
            kind,
            instant,
            day_offset: offset,
        })
    })
}

/// Resolve a wall-clock time in `tz`.
///
/// Ambiguous times take the earlier instant. Times inside a DST gap move forward
/// by an hour.
pub(crate) fn localize<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(&local).earliest().or_else(|| {
        let shifted = local.checked_add_signed(TimeDelta::hours(1))?;
        tz.from_local_datetime(&shifted).earliest()
    })
}
