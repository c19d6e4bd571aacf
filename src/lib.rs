//! Ramadan Companion Library
//!
//! Prayer schedule loading, next-event resolution and countdowns, plus the
//! fasting tracker, daily duas and Qibla bearing used by the command-line
//! companion.

pub mod config;
pub mod countdown;
pub mod dashboard;
pub mod duas;
pub mod error;
pub mod fallback;
pub mod i18n;
pub mod provider;
pub mod qibla;
pub mod schedule;
pub mod season;
pub mod tracker;
pub mod traits;

// Re-export commonly used types
pub use config::AppConfig;
pub use countdown::{
    SeasonCountdown, TimeRemaining, countdown_to, format_clock_string, format_time_of_day, is_due,
    remaining,
};
pub use dashboard::{AlertGate, Dashboard, TickSnapshot};
pub use duas::{DAILY_DUAS, Dua, dua_at};
pub use error::{ProfileError, ScheduleError};
pub use fallback::generate_schedule;
pub use i18n::{Language, event_label, localize_digits};
pub use provider::{
    AladhanCalendarFile, CsvScheduleFile, GeneratedSchedule, JsonScheduleFile, LoadedSchedule,
    ScheduleProvider, ScheduleSource, load_first_available, providers_for, validate_schedule,
};
pub use qibla::qibla_bearing;
pub use schedule::{EventKind, PrayerDay, ResolvedEvent, next_event, next_event_by_date};
pub use season::{Mode, Season};
pub use tracker::{FastingTracker, NotificationSettings, ProfileStore, UserProfile};
pub use traits::{Clock, MockClock, MockNotifier, Notifier, SystemClock, TracingNotifier};
