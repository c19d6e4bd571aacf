use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::i18n::Language;
use crate::tracker::NotificationSettings;

const APP_DIR: &str = "ramadan-companion";

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub location: LocationConfig,
    pub schedule: ScheduleConfig,
    pub ramadan: RamadanConfig,
    pub refresh: RefreshConfig,
    pub notifications: NotificationSettings,
    pub display: DisplayConfig,
    pub profiles: ProfilesConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LocationConfig {
    pub city: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            city: "Dhaka".to_string(),
            country: "Bangladesh".to_string(),
            latitude: 23.8103,
            longitude: 90.4125,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleFormat {
    #[default]
    Json,
    Csv,
    Aladhan,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScheduleConfig {
    /// Schedule file; when absent only the generated fallback is used.
    pub path: Option<String>,
    pub format: ScheduleFormat,
    pub fallback_days: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            path: None,
            format: ScheduleFormat::Json,
            fallback_days: 30,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RamadanConfig {
    /// Start date assumed when the schedule carries no Ramadan dates.
    pub estimated_start: NaiveDate,
    pub total_days: u32,
}

impl Default for RamadanConfig {
    fn default() -> Self {
        Self {
            estimated_start: NaiveDate::from_ymd_opt(2025, 3, 2).unwrap_or_default(),
            total_days: 30,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RefreshConfig {
    pub tick_interval_ms: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DisplayConfig {
    pub language: Language,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ProfilesConfig {
    pub dir: Option<String>,
}

impl ProfilesConfig {
    /// Directory holding user profiles.
    pub fn resolve_dir(&self) -> PathBuf {
        match &self.dir {
            Some(dir) => PathBuf::from(dir),
            None => dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR)
                .join("profiles"),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        // Load .env file (silently ignore if not present)
        let _ = dotenvy::dotenv();

        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR);

        let builder = Config::builder()
            // 1. Load default values
            // Location
            .set_default("location.city", "Dhaka")?
            .set_default("location.country", "Bangladesh")?
            .set_default("location.latitude", 23.8103)?
            .set_default("location.longitude", 90.4125)?
            // Schedule
            .set_default("schedule.path", None::<String>)?
            .set_default("schedule.format", "json")?
            .set_default("schedule.fallback_days", 30)?
            // Ramadan
            .set_default("ramadan.estimated_start", "2025-03-02")?
            .set_default("ramadan.total_days", 30)?
            // Refresh
            .set_default("refresh.tick_interval_ms", 1000)?
            // Notifications
            .set_default("notifications.sehri", true)?
            .set_default("notifications.dhuhr", true)?
            .set_default("notifications.asr", true)?
            .set_default("notifications.iftar", true)?
            .set_default("notifications.isha", true)?
            // Display
            .set_default("display.language", "en")?
            // Profiles
            .set_default("profiles.dir", None::<String>)?

            // 2. Load from local config file (optional, lowest priority)
            .add_source(File::from(PathBuf::from("config.toml")).required(false))

            // 3. Load from user config directory (optional, overrides local)
            .add_source(File::from(config_dir.join("config.toml")).required(false))

            // 4. Load from Environment variables (RAMADAN__REFRESH__TICK_INTERVAL_MS=...)
            .add_source(Environment::with_prefix("RAMADAN").separator("__"));

        let s = builder.build().context("Failed to build configuration")?;
        Ok(s.try_deserialize()?)
    }
}
