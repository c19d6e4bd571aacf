//! Schedule providers.
//!
//! A provider yields an ordered list of [`PrayerDay`] records, or `None` when
//! it has nothing to offer. Providers are tried in order by
//! [`load_first_available`]; the generated fallback always succeeds.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;

use crate::config::{ScheduleConfig, ScheduleFormat};
use crate::error::ScheduleError;
use crate::fallback;
use crate::schedule::{EventKind, PrayerDay, parse_time_of_day};

/// Where a schedule came from.
///
/// Custom schedules carry real calendar dates for the month of Ramadan; live
/// schedules are plain prayer timetables for the current month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleSource {
    Custom,
    Live,
}

/// A schedule together with the provider that supplied it.
#[derive(Debug, Clone)]
pub struct LoadedSchedule {
    pub days: Vec<PrayerDay>,
    pub source: ScheduleSource,
    pub provider: String,
}

pub trait ScheduleProvider {
    fn name(&self) -> &str;

    fn source(&self) -> ScheduleSource;

    /// Load the schedule. An empty schedule is reported as `Ok(None)`.
    fn load(&self) -> Result<Option<Vec<PrayerDay>>, ScheduleError>;
}

fn non_empty(days: Vec<PrayerDay>) -> Option<Vec<PrayerDay>> {
    (!days.is_empty()).then_some(days)
}

// ==================== File Providers ====================

/// JSON array of schedule records, as kept in the shared schedule store.
#[derive(Debug, Clone)]
pub struct JsonScheduleFile {
    path: PathBuf,
}

impl JsonScheduleFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ScheduleProvider for JsonScheduleFile {
    fn name(&self) -> &str {
        "json-file"
    }

    fn source(&self) -> ScheduleSource {
        ScheduleSource::Custom
    }

    fn load(&self) -> Result<Option<Vec<PrayerDay>>, ScheduleError> {
        let data = fs::read(&self.path)?;
        let days: Vec<PrayerDay> = serde_json::from_slice(&data)?;
        Ok(non_empty(days))
    }
}

/// CSV file with the header `day,date,sehri,dhuhr,asr,iftar,isha`.
#[derive(Debug, Clone)]
pub struct CsvScheduleFile {
    path: PathBuf,
}

impl CsvScheduleFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ScheduleProvider for CsvScheduleFile {
    fn name(&self) -> &str {
        "csv-file"
    }

    fn source(&self) -> ScheduleSource {
        ScheduleSource::Custom
    }

    fn load(&self) -> Result<Option<Vec<PrayerDay>>, ScheduleError> {
        let mut reader = csv::Reader::from_path(&self.path)?;
        let days = reader
            .deserialize()
            .collect::<Result<Vec<PrayerDay>, csv::Error>>()?;
        Ok(non_empty(days))
    }
}

// ==================== Prayer Times API Calendar ====================

#[derive(Debug, Deserialize)]
struct CalendarEnvelope {
    code: i64,
    data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct CalendarDay {
    timings: CalendarTimings,
    date: CalendarDate,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CalendarTimings {
    fajr: String,
    dhuhr: String,
    asr: String,
    maghrib: String,
    isha: String,
}

#[derive(Debug, Deserialize)]
struct CalendarDate {
    readable: String,
}

/// Drop the zone annotation the API appends, e.g. `04:55 (+06)`.
fn strip_zone(value: &str) -> String {
    value.split_whitespace().next().unwrap_or_default().to_string()
}

/// Decode a monthly calendar response from the prayer times API.
///
/// Fajr is mapped to sehri and Maghrib to iftar; days are numbered from 1.
pub fn decode_calendar(json: &[u8]) -> Result<Vec<PrayerDay>, ScheduleError> {
    let envelope: CalendarEnvelope = serde_json::from_slice(json)?;
    if envelope.code != 200 {
        return Err(ScheduleError::UpstreamCode(envelope.code));
    }
    let days: Vec<CalendarDay> = serde_json::from_value(envelope.data)?;

    Ok(days
        .into_iter()
        .enumerate()
        .map(|(i, d)| PrayerDay {
            day_number: i as u32 + 1,
            date_label: d.date.readable,
            sehri_end: strip_zone(&d.timings.fajr),
            dhuhr: strip_zone(&d.timings.dhuhr),
            asr: strip_zone(&d.timings.asr),
            iftar_start: strip_zone(&d.timings.maghrib),
            isha: strip_zone(&d.timings.isha),
        })
        .collect())
}

/// A saved calendar response from the prayer times API.
#[derive(Debug, Clone)]
pub struct AladhanCalendarFile {
    path: PathBuf,
}

impl AladhanCalendarFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ScheduleProvider for AladhanCalendarFile {
    fn name(&self) -> &str {
        "aladhan-calendar"
    }

    fn source(&self) -> ScheduleSource {
        ScheduleSource::Live
    }

    fn load(&self) -> Result<Option<Vec<PrayerDay>>, ScheduleError> {
        let data = fs::read(&self.path)?;
        Ok(non_empty(decode_calendar(&data)?))
    }
}

// ==================== Generated Fallback ====================

#[derive(Debug, Clone)]
pub struct GeneratedSchedule {
    start: NaiveDate,
    days: u32,
}

impl GeneratedSchedule {
    pub fn new(start: NaiveDate, days: u32) -> Self {
        Self { start, days }
    }
}

impl ScheduleProvider for GeneratedSchedule {
    fn name(&self) -> &str {
        "generated"
    }

    fn source(&self) -> ScheduleSource {
        ScheduleSource::Live
    }

    fn load(&self) -> Result<Option<Vec<PrayerDay>>, ScheduleError> {
        Ok(non_empty(fallback::generate_schedule(self.start, self.days)))
    }
}

// ==================== Validation & Selection ====================

/// Check that every time parses and that each day's events are strictly
/// increasing.
pub fn validate_schedule(days: &[PrayerDay]) -> Result<(), ScheduleError> {
    for day in days {
        let mut previous: Option<(EventKind, chrono::NaiveTime)> = None;
        for (kind, value) in day.events() {
            let time = parse_time_of_day(value).ok_or_else(|| ScheduleError::InvalidTime {
                day: day.day_number,
                kind,
                value: value.to_string(),
            })?;
            if let Some((earlier, earlier_time)) = previous {
                if time <= earlier_time {
                    return Err(ScheduleError::OutOfOrder {
                        day: day.day_number,
                        earlier,
                        later: kind,
                    });
                }
            }
            previous = Some((kind, time));
        }
    }
    Ok(())
}

/// Try each provider in order and return the first valid, non-empty schedule.
pub fn load_first_available(providers: &[Box<dyn ScheduleProvider>]) -> Option<LoadedSchedule> {
    for provider in providers {
        let days = match provider.load() {
            Ok(Some(days)) => days,
            Ok(None) => {
                tracing::debug!("Provider {} has no schedule", provider.name());
                continue;
            }
            Err(e) => {
                tracing::warn!("Provider {} failed: {}", provider.name(), e);
                continue;
            }
        };

        if let Err(e) = validate_schedule(&days) {
            tracing::warn!("Provider {} returned an invalid schedule: {}", provider.name(), e);
            continue;
        }

        tracing::info!("Loaded {} days from {}", days.len(), provider.name());
        return Some(LoadedSchedule {
            days,
            source: provider.source(),
            provider: provider.name().to_string(),
        });
    }
    None
}

fn file_provider(path: &Path, format: ScheduleFormat) -> Box<dyn ScheduleProvider> {
    match format {
        ScheduleFormat::Json => Box::new(JsonScheduleFile::new(path)),
        ScheduleFormat::Csv => Box::new(CsvScheduleFile::new(path)),
        ScheduleFormat::Aladhan => Box::new(AladhanCalendarFile::new(path)),
    }
}

/// Providers described by the configuration, ending with the generated
/// fallback starting at `today`.
pub fn providers_for(config: &ScheduleConfig, today: NaiveDate) -> Vec<Box<dyn ScheduleProvider>> {
    let mut providers = Vec::new();
    if let Some(path) = &config.path {
        providers.push(file_provider(Path::new(path), config.format));
    }
    providers.push(Box::new(GeneratedSchedule::new(today, config.fallback_days)));
    providers
}
