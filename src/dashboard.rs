//! The per-tick view model a host polls once a second.

use anyhow::Result;
use chrono::{DateTime, Local, NaiveDate, TimeZone};

use crate::countdown::{SeasonCountdown, TimeRemaining, countdown_to, is_due, remaining};
use crate::i18n::{Language, event_label};
use crate::provider::LoadedSchedule;
use crate::schedule::{ResolvedEvent, next_event};
use crate::season::{self, Mode, Season};
use crate::traits::{Clock, Notifier};
use crate::tracker::NotificationSettings;

/// Everything needed to render one tick.
#[derive(Debug, Clone)]
pub struct TickSnapshot<Tz: TimeZone> {
    pub season: Season<Tz>,
    pub next: Option<ResolvedEvent<Tz>>,
    pub remaining: Option<TimeRemaining>,
    /// Countdown to the start of Ramadan, while one is ahead.
    pub season_countdown: Option<SeasonCountdown>,
    /// The next event is less than a second away.
    pub due: bool,
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    schedule: LoadedSchedule,
    estimated_start: NaiveDate,
    notifications: NotificationSettings,
    language: Language,
}

impl Dashboard {
    pub fn new(
        schedule: LoadedSchedule,
        estimated_start: NaiveDate,
        notifications: NotificationSettings,
        language: Language,
    ) -> Self {
        Self {
            schedule,
            estimated_start,
            notifications,
            language,
        }
    }

    pub fn schedule(&self) -> &LoadedSchedule {
        &self.schedule
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Compute the snapshot for `now`.
    pub fn tick<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> TickSnapshot<Tz> {
        let days = &self.schedule.days;
        let season = season::determine(days, self.schedule.source, self.estimated_start, now);

        let next = next_event(season.aligned(days), now);
        let remaining = next.as_ref().map(|event| remaining(&event.instant, now));
        let due = next.as_ref().is_some_and(|event| is_due(&event.instant, now));
        let season_countdown = match &season.mode {
            Mode::PreRamadan {
                starts_at: Some(start),
            } => countdown_to(start, now),
            _ => None,
        };

        TickSnapshot {
            season,
            next,
            remaining,
            season_countdown,
            due,
        }
    }

    /// Snapshot for the clock's current local time.
    pub fn tick_with_clock<C: Clock>(&self, clock: &C) -> TickSnapshot<Local> {
        self.tick(&clock.now_local())
    }

    /// Display name for the snapshot's next event.
    pub fn next_label<Tz: TimeZone>(&self, snapshot: &TickSnapshot<Tz>) -> Option<&'static str> {
        let pre_ramadan = snapshot.season.mode.is_pre_ramadan();
        snapshot
            .next
            .as_ref()
            .map(|event| event_label(event.kind, self.language, pre_ramadan))
    }

    /// Send an alert if the next event is due and enabled. Returns whether a
    /// notification went out.
    pub fn alert_if_due<Tz: TimeZone, N: Notifier + ?Sized>(
        &self,
        gate: &mut AlertGate,
        snapshot: &TickSnapshot<Tz>,
        notifier: &N,
    ) -> Result<bool> {
        let Some(event) = snapshot.next.as_ref().filter(|_| snapshot.due) else {
            return Ok(false);
        };
        if !self.notifications.is_enabled(event.kind) || !gate.should_fire(&event.instant) {
            return Ok(false);
        }

        let label = self.next_label(snapshot).unwrap_or_default();
        let body = match self.language {
            Language::En => format!("It's time for {}", label),
            Language::Bn => format!("এখন সময় {}", label),
        };
        notifier.notify(label, &body)?;
        Ok(true)
    }
}

/// Latch that lets each event instant fire at most once.
#[derive(Debug, Clone, Default)]
pub struct AlertGate {
    last_fired: Option<i64>,
}

impl AlertGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// True the first time it sees `instant`.
    pub fn should_fire<Tz: TimeZone>(&mut self, instant: &DateTime<Tz>) -> bool {
        let stamp = instant.timestamp();
        if self.last_fired == Some(stamp) {
            return false;
        }
        self.last_fired = Some(stamp);
        true
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeDelta};

    use super::*;
    use crate::provider::ScheduleSource;
    use crate::schedule::{EventKind, PrayerDay};
    use crate::traits::MockNotifier;

    fn dhaka() -> FixedOffset {
        FixedOffset::east_opt(6 * 3600).unwrap()
    }

    fn at(d: u32, h: u32, m: u32, s: u32) -> DateTime<FixedOffset> {
        dhaka().with_ymd_and_hms(2025, 3, d, h, m, s).unwrap()
    }

    fn day(number: u32, date: &str) -> PrayerDay {
        PrayerDay {
            day_number: number,
            date_label: date.to_string(),
            sehri_end: "04:30".to_string(),
            dhuhr: "12:15".to_string(),
            asr: "15:45".to_string(),
            iftar_start: "18:10".to_string(),
            isha: "19:30".to_string(),
        }
    }

    fn dashboard(notifications: NotificationSettings) -> Dashboard {
        let schedule = LoadedSchedule {
            days: vec![day(1, "2025-03-02"), day(2, "2025-03-03"), day(3, "2025-03-04")],
            source: ScheduleSource::Custom,
            provider: "test".to_string(),
        };
        Dashboard::new(
            schedule,
            NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(),
            notifications,
            Language::En,
        )
    }

    #[test]
    fn test_tick_resolves_against_today() {
        let dash = dashboard(NotificationSettings::default());
        let snap = dash.tick(&at(3, 17, 0, 0));

        let next = snap.next.as_ref().unwrap();
        assert_eq!(next.kind, EventKind::Iftar);
        assert_eq!(next.instant, at(3, 18, 10, 0));
        // Offset is relative to today's row.
        assert_eq!(next.day_offset, 0);
        assert_eq!(snap.remaining.unwrap().to_clock(), "01:10:00");
        assert_eq!(snap.season.today_index, Some(1));
        assert!(!snap.due);
        assert_eq!(dash.next_label(&snap), Some("Iftar"));
    }

    #[test]
    fn test_tick_after_isha_moves_to_next_day() {
        let dash = dashboard(NotificationSettings::default());
        let snap = dash.tick(&at(3, 21, 0, 0));

        let next = snap.next.unwrap();
        assert_eq!(next.kind, EventKind::Sehri);
        assert_eq!(next.instant, at(4, 4, 30, 0));
        assert_eq!(next.day_offset, 1);
    }

    #[test]
    fn test_tick_after_schedule_ends() {
        let dash = dashboard(NotificationSettings::default());
        let snap = dash.tick(&at(4, 20, 0, 0));
        assert!(snap.next.is_none());
        assert!(snap.remaining.is_none());
        assert!(!snap.due);
    }

    #[test]
    fn test_tick_before_ramadan_counts_down() {
        let dash = dashboard(NotificationSettings::default());
        let now = dhaka().with_ymd_and_hms(2025, 2, 28, 12, 0, 0).unwrap();
        let snap = dash.tick(&now);

        assert!(snap.season.mode.is_pre_ramadan());
        let countdown = snap.season_countdown.unwrap();
        assert_eq!((countdown.days, countdown.hours), (1, 12));
        assert!(snap.next.is_none());
    }

    #[test]
    fn test_alert_fires_once_per_event() {
        let dash = dashboard(NotificationSettings::default());
        let notifier = MockNotifier::new();
        let mut gate = AlertGate::new();

        let snap = dash.tick(&(at(3, 18, 10, 0) - TimeDelta::milliseconds(500)));
        assert!(snap.due);
        assert!(dash.alert_if_due(&mut gate, &snap, &notifier).unwrap());
        assert!(!dash.alert_if_due(&mut gate, &snap, &notifier).unwrap());

        assert_eq!(notifier.notification_count(), 1);
        assert_eq!(
            notifier.get_notifications()[0],
            ("Iftar".to_string(), "It's time for Iftar".to_string())
        );
    }

    #[test]
    fn test_alert_respects_settings() {
        let mut settings = NotificationSettings::default();
        settings.toggle(EventKind::Iftar);
        let dash = dashboard(settings);
        let notifier = MockNotifier::new();
        let mut gate = AlertGate::new();

        let snap = dash.tick(&(at(3, 18, 10, 0) - TimeDelta::milliseconds(200)));
        assert!(!dash.alert_if_due(&mut gate, &snap, &notifier).unwrap());
        assert!(!notifier.was_called());
    }

    #[test]
    fn test_alert_gate_distinguishes_instants() {
        let mut gate = AlertGate::new();
        assert!(gate.should_fire(&at(3, 12, 15, 0)));
        assert!(!gate.should_fire(&at(3, 12, 15, 0)));
        assert!(gate.should_fire(&at(3, 15, 45, 0)));
    }
}
