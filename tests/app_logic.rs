//! Integration tests for the countdown dashboard using mock dependencies.
//!
//! These tests drive the dashboard with MockClock and MockNotifier so the
//! resolver, countdown and alert logic are checked at fixed instants.

use chrono::{Duration as ChronoDuration, NaiveDate, TimeZone, Utc};
use ramadan_companion::{
    AlertGate, Clock, Dashboard, EventKind, Language, LoadedSchedule, MockClock, MockNotifier,
    Mode, NotificationSettings, PrayerDay, ProfileStore, ScheduleSource, generate_schedule,
    next_event, remaining,
};
use tempfile::TempDir;

fn ramadan_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 2).unwrap()
}

/// Thirty generated days starting on the first of Ramadan.
fn create_dashboard(source: ScheduleSource, language: Language) -> Dashboard {
    let schedule = LoadedSchedule {
        days: generate_schedule(ramadan_start(), 30),
        source,
        provider: "generated".to_string(),
    };
    Dashboard::new(
        schedule,
        ramadan_start(),
        NotificationSettings::default(),
        language,
    )
}

// ==================== Resolver + Formatter Tests ====================

#[test]
fn test_end_to_end_iftar_countdown() {
    let day = PrayerDay {
        day_number: 1,
        date_label: "Mon Mar 10 2025".to_string(),
        sehri_end: "04:30".to_string(),
        dhuhr: "12:15".to_string(),
        asr: "15:45".to_string(),
        iftar_start: "18:10".to_string(),
        isha: "19:30".to_string(),
    };
    let now = Utc.with_ymd_and_hms(2025, 3, 10, 17, 0, 0).unwrap();

    let event = next_event(&[day], &now).unwrap();
    assert_eq!(event.kind, EventKind::Iftar);
    assert_eq!(event.instant, Utc.with_ymd_and_hms(2025, 3, 10, 18, 10, 0).unwrap());
    assert_eq!(event.day_offset, 0);

    let left = remaining(&event.instant, &now);
    assert_eq!((left.hours, left.minutes, left.seconds), (1, 10, 0));
}

#[test]
fn test_empty_schedule_has_no_event() {
    let now = Utc.with_ymd_and_hms(2025, 3, 10, 17, 0, 0).unwrap();
    assert!(next_event(&[], &now).is_none());
}

// ==================== Dashboard + Clock Tests ====================

#[test]
fn test_dashboard_uses_mock_clock_time() {
    let clock = MockClock::new(Utc.with_ymd_and_hms(2025, 3, 10, 17, 0, 0).unwrap());
    let dashboard = create_dashboard(ScheduleSource::Custom, Language::En);

    let snapshot = dashboard.tick(&clock.now_utc());

    assert_eq!(snapshot.season.mode, Mode::Ramadan);
    // March 10 is the ninth generated day.
    assert_eq!(snapshot.season.today_index, Some(8));
    let next = snapshot.next.as_ref().unwrap();
    assert_eq!(next.kind, EventKind::Iftar);
    assert_eq!(next.instant, Utc.with_ymd_and_hms(2025, 3, 10, 18, 38, 0).unwrap());
    assert_eq!(snapshot.remaining.unwrap().to_clock(), "01:38:00");
}

#[test]
fn test_dashboard_updates_as_time_advances() {
    let clock = MockClock::new(Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap());
    let dashboard = create_dashboard(ScheduleSource::Custom, Language::En);

    let first = dashboard.tick(&clock.now_utc());
    assert_eq!(first.next.unwrap().kind, EventKind::Dhuhr);

    clock.advance(ChronoDuration::hours(2));
    let second = dashboard.tick(&clock.now_utc());
    assert_eq!(second.next.unwrap().kind, EventKind::Asr);

    // Past isha the next event is tomorrow's sehri.
    clock.advance(ChronoDuration::hours(8));
    let third = dashboard.tick(&clock.now_utc());
    let next = third.next.unwrap();
    assert_eq!(next.kind, EventKind::Sehri);
    assert_eq!(next.day_offset, 1);
    assert_eq!(next.instant, Utc.with_ymd_and_hms(2025, 3, 11, 4, 21, 0).unwrap());
}

#[test]
fn test_dashboard_counts_down_before_ramadan() {
    let clock = MockClock::new(Utc.with_ymd_and_hms(2025, 2, 27, 18, 30, 15).unwrap());
    let dashboard = create_dashboard(ScheduleSource::Custom, Language::En);

    let snapshot = dashboard.tick(&clock.now_utc());

    assert!(snapshot.season.mode.is_pre_ramadan());
    let countdown = snapshot.season_countdown.unwrap();
    assert_eq!(
        (countdown.days, countdown.hours, countdown.minutes, countdown.seconds),
        (2, 5, 29, 45)
    );
}

#[test]
fn test_live_schedule_labels_use_prayer_names() {
    let clock = MockClock::new(Utc.with_ymd_and_hms(2025, 3, 5, 17, 0, 0).unwrap());
    let dashboard = create_dashboard(ScheduleSource::Live, Language::En);

    let snapshot = dashboard.tick(&clock.now_utc());

    assert!(snapshot.season.mode.is_pre_ramadan());
    assert_eq!(snapshot.next.as_ref().unwrap().kind, EventKind::Iftar);
    assert_eq!(dashboard.next_label(&snapshot), Some("Maghrib"));
}

// ==================== Alert Debouncing Tests ====================

#[test]
fn test_alert_fires_once_while_due() {
    let iftar = Utc.with_ymd_and_hms(2025, 3, 10, 18, 38, 0).unwrap();
    let clock = MockClock::new(iftar - ChronoDuration::milliseconds(900));
    let dashboard = create_dashboard(ScheduleSource::Custom, Language::En);
    let notifier = MockNotifier::new();
    let mut gate = AlertGate::new();

    for _ in 0..3 {
        let snapshot = dashboard.tick(&clock.now_utc());
        dashboard.alert_if_due(&mut gate, &snapshot, &notifier).unwrap();
        clock.advance(ChronoDuration::milliseconds(250));
    }

    assert_eq!(notifier.notification_count(), 1, "Due event should alert once");
}

#[test]
fn test_no_alert_before_event_is_due() {
    let iftar = Utc.with_ymd_and_hms(2025, 3, 10, 18, 38, 0).unwrap();
    let clock = MockClock::new(iftar - ChronoDuration::seconds(5));
    let dashboard = create_dashboard(ScheduleSource::Custom, Language::En);
    let notifier = MockNotifier::new();
    let mut gate = AlertGate::new();

    let snapshot = dashboard.tick(&clock.now_utc());
    assert!(!snapshot.due);
    assert!(!dashboard.alert_if_due(&mut gate, &snapshot, &notifier).unwrap());
    assert!(!notifier.was_called());
}

#[test]
fn test_consecutive_events_each_alert() {
    let clock = MockClock::new(Utc.with_ymd_and_hms(2025, 3, 10, 13, 17, 59).unwrap());
    let dashboard = create_dashboard(ScheduleSource::Custom, Language::En);
    let notifier = MockNotifier::new();
    let mut gate = AlertGate::new();

    // Day index 8 has dhuhr at 13:18 and asr at 16:33.
    let snapshot = dashboard.tick(&(clock.now_utc() + ChronoDuration::milliseconds(500)));
    assert!(dashboard.alert_if_due(&mut gate, &snapshot, &notifier).unwrap());

    clock.set_time(Utc.with_ymd_and_hms(2025, 3, 10, 16, 32, 59).unwrap());
    let snapshot = dashboard.tick(&(clock.now_utc() + ChronoDuration::milliseconds(500)));
    assert!(dashboard.alert_if_due(&mut gate, &snapshot, &notifier).unwrap());

    let titles: Vec<String> = notifier
        .get_notifications()
        .into_iter()
        .map(|(title, _)| title)
        .collect();
    assert_eq!(titles, vec!["Dhuhr", "Asr"]);
}

#[test]
fn test_saved_user_settings_silence_alert() {
    let dir = TempDir::new().unwrap();
    let store = ProfileStore::new(dir.path());
    store.toggle_alert("amina", EventKind::Iftar).unwrap();
    let settings = store
        .notification_settings("amina", NotificationSettings::default())
        .unwrap();

    let schedule = LoadedSchedule {
        days: generate_schedule(ramadan_start(), 30),
        source: ScheduleSource::Custom,
        provider: "generated".to_string(),
    };
    let dashboard = Dashboard::new(schedule, ramadan_start(), settings, Language::En);
    let notifier = MockNotifier::new();
    let mut gate = AlertGate::new();

    let iftar = Utc.with_ymd_and_hms(2025, 3, 10, 18, 38, 0).unwrap();
    let snapshot = dashboard.tick(&(iftar - ChronoDuration::milliseconds(300)));
    assert!(snapshot.due);
    assert!(!dashboard.alert_if_due(&mut gate, &snapshot, &notifier).unwrap());

    // Isha is still enabled for this user.
    let isha = Utc.with_ymd_and_hms(2025, 3, 10, 20, 18, 0).unwrap();
    let snapshot = dashboard.tick(&(isha - ChronoDuration::milliseconds(300)));
    assert!(dashboard.alert_if_due(&mut gate, &snapshot, &notifier).unwrap());
    assert_eq!(notifier.get_notifications()[0].0, "Isha");
}

#[test]
fn test_alert_message_in_bengali() {
    let iftar = Utc.with_ymd_and_hms(2025, 3, 10, 18, 38, 0).unwrap();
    let clock = MockClock::new(iftar - ChronoDuration::milliseconds(100));
    let dashboard = create_dashboard(ScheduleSource::Custom, Language::Bn);
    let notifier = MockNotifier::new();
    let mut gate = AlertGate::new();

    let snapshot = dashboard.tick(&clock.now_utc());
    dashboard.alert_if_due(&mut gate, &snapshot, &notifier).unwrap();

    let (title, body) = &notifier.get_notifications()[0];
    assert_eq!(title, "ইফতার");
    assert!(body.contains("ইফতার"));
}
