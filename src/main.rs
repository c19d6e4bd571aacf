use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use ramadan_companion::{
    AlertGate, AppConfig, Clock, Dashboard, EventKind, Language, NotificationSettings, PrayerDay,
    ProfileStore, SystemClock, TickSnapshot, TracingNotifier, dua_at, event_label,
    format_clock_string, format_time_of_day, load_first_available, localize_digits,
    providers_for, qibla_bearing,
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(name = "ramadan-companion")]
#[command(about = "Sehri/Iftar countdowns, prayer times and fasting tracker")]
struct Args {
    /// Display language, overriding the configured one
    #[arg(long, global = true, value_enum)]
    language: Option<Language>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the next prayer event and the time left until it
    Next {
        /// Use this user's saved alert settings
        #[arg(long)]
        user: Option<String>,
    },
    /// Run a live countdown with alerts until interrupted
    Watch {
        /// Use this user's saved alert settings
        #[arg(long)]
        user: Option<String>,
    },
    /// Print prayer times
    Schedule {
        /// Print every day instead of only today
        #[arg(long)]
        all: bool,
    },
    /// Show the countdown to the start of Ramadan
    Countdown,
    /// Print the Qibla bearing
    Qibla {
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        lon: Option<f64>,
    },
    /// Show or update a user's fasting tracker
    Track {
        user: String,
        /// Mark or unmark a day as fasted
        #[arg(long)]
        toggle: Option<u32>,
        /// Turn the alert for one prayer on or off
        #[arg(long, value_enum)]
        alert: Option<EventKind>,
    },
    /// Print one of the daily duas
    Dua {
        /// Position in the list; wraps around in both directions
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        index: i64,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::level_filters::LevelFilter::INFO.into())
        .parse_lossy("ramadan_companion=debug");

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;
    let language = args.language.unwrap_or(config.display.language);

    match args.command {
        Command::Next { user } => {
            let settings = alert_settings(&config, user.as_deref())?;
            run_next(&config, language, settings)
        }
        Command::Watch { user } => {
            let settings = alert_settings(&config, user.as_deref())?;
            let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
            run_watch(rt, &config, language, settings)
        }
        Command::Schedule { all } => run_schedule(&config, language, all),
        Command::Countdown => run_countdown(&config, language),
        Command::Qibla { lat, lon } => {
            let lat = lat.unwrap_or(config.location.latitude);
            let lon = lon.unwrap_or(config.location.longitude);
            let bearing = format!("{:.1}", qibla_bearing(lat, lon));
            println!("Qibla: {}° from true north", localize_digits(&bearing, language));
            Ok(())
        }
        Command::Track {
            user,
            toggle,
            alert,
        } => run_track(&config, language, &user, toggle, alert),
        Command::Dua { index } => {
            let dua = dua_at(index);
            println!("{}\n", dua.title(language));
            println!("{}", dua.arabic);
            println!("{}\n", dua.transliteration);
            println!("{}", dua.translation(language));
            Ok(())
        }
    }
}

/// Alert settings from the user's profile, or the configured ones.
fn alert_settings(config: &AppConfig, user: Option<&str>) -> Result<NotificationSettings> {
    let Some(user) = user else {
        return Ok(config.notifications);
    };
    let store = ProfileStore::new(config.profiles.resolve_dir());
    store
        .notification_settings(user, config.notifications)
        .with_context(|| format!("Failed to load profile for {}", user))
}

/// Load the schedule and build the dashboard around it.
fn build_dashboard(
    config: &AppConfig,
    language: Language,
    notifications: NotificationSettings,
) -> Result<Dashboard> {
    let today = SystemClock.now_local().date_naive();
    let providers = providers_for(&config.schedule, today);
    let schedule = load_first_available(&providers).context("No schedule available")?;
    tracing::info!(
        "Using {} schedule from {} for {}, {}",
        schedule.days.len(),
        schedule.provider,
        config.location.city,
        config.location.country
    );
    Ok(Dashboard::new(
        schedule,
        config.ramadan.estimated_start,
        notifications,
        language,
    ))
}

fn describe_next(dashboard: &Dashboard, snapshot: &TickSnapshot<Local>) -> Option<String> {
    let event = snapshot.next.as_ref()?;
    let label = dashboard.next_label(snapshot)?;
    let remaining = snapshot.remaining.unwrap_or_default().to_clock();
    Some(format!(
        "{} at {} (in {})",
        label,
        format_clock_string(&event.instant, dashboard.language()),
        localize_digits(&remaining, dashboard.language())
    ))
}

fn run_next(config: &AppConfig, language: Language, settings: NotificationSettings) -> Result<()> {
    let dashboard = build_dashboard(config, language, settings)?;
    let snapshot = dashboard.tick_with_clock(&SystemClock);
    match describe_next(&dashboard, &snapshot) {
        Some(line) => println!("{}", line),
        None => println!("No upcoming events in the schedule"),
    }
    Ok(())
}

/// Tick once per interval, redrawing the countdown and raising alerts.
fn run_watch(
    rt: tokio::runtime::Runtime,
    config: &AppConfig,
    language: Language,
    settings: NotificationSettings,
) -> Result<()> {
    let dashboard = build_dashboard(config, language, settings)?;
    let notifier = TracingNotifier;
    let interval_ms = config.refresh.tick_interval_ms.max(1);

    rt.block_on(async {
        tracing::info!("Starting countdown with interval: {} ms", interval_ms);

        let mut interval = tokio::time::interval(Duration::from_millis(interval_ms));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut gate = AlertGate::new();
        let mut stdout = std::io::stdout();

        loop {
            tokio::select! {
                _ = interval.tick() => {}
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Interrupted, stopping countdown");
                    break;
                }
            }

            let snapshot = dashboard.tick_with_clock(&SystemClock);
            let line = describe_next(&dashboard, &snapshot)
                .unwrap_or_else(|| "No upcoming events in the schedule".to_string());
            write!(stdout, "\r\x1b[2K{}", line)?;
            stdout.flush()?;

            if let Err(e) = dashboard.alert_if_due(&mut gate, &snapshot, &notifier) {
                tracing::error!("Failed to send alert: {}", e);
            }
        }
        writeln!(stdout)?;
        Ok::<_, anyhow::Error>(())
    })
}

fn print_day(day: &PrayerDay, language: Language, pre_ramadan: bool) {
    let times: Vec<String> = EventKind::ALL
        .iter()
        .map(|kind| {
            format!(
                "{} {}",
                event_label(*kind, language, pre_ramadan),
                format_time_of_day(day.time_of(*kind))
            )
        })
        .collect();
    let header = format!("Day {} ({})", day.day_number, day.date_label);
    println!(
        "{}: {}",
        localize_digits(&header, language),
        localize_digits(&times.join(" | "), language)
    );
}

fn run_schedule(config: &AppConfig, language: Language, all: bool) -> Result<()> {
    let dashboard = build_dashboard(config, language, config.notifications)?;
    let snapshot = dashboard.tick_with_clock(&SystemClock);
    let days = &dashboard.schedule().days;
    let pre_ramadan = snapshot.season.mode.is_pre_ramadan();

    if all {
        for day in days {
            print_day(day, language, pre_ramadan);
        }
        return Ok(());
    }
    match snapshot.season.today(days) {
        Some(day) => print_day(day, language, pre_ramadan),
        None => println!("No schedule entry for today"),
    }
    Ok(())
}

fn run_countdown(config: &AppConfig, language: Language) -> Result<()> {
    let dashboard = build_dashboard(config, language, config.notifications)?;
    let snapshot = dashboard.tick_with_clock(&SystemClock);
    match snapshot.season_countdown {
        Some(c) => {
            let text = format!(
                "Ramadan starts in {} days {:02}:{:02}:{:02}",
                c.days, c.hours, c.minutes, c.seconds
            );
            println!("{}", localize_digits(&text, language));
        }
        None if snapshot.season.mode.is_pre_ramadan() => {
            println!("Start of Ramadan is not known for this schedule")
        }
        None => println!("Ramadan Mubarak! Ramadan is underway"),
    }
    Ok(())
}

fn run_track(
    config: &AppConfig,
    language: Language,
    user: &str,
    toggle: Option<u32>,
    alert: Option<EventKind>,
) -> Result<()> {
    let store = ProfileStore::new(config.profiles.resolve_dir());
    tracing::debug!("Profiles stored in {}", store.dir().display());

    if let Some(kind) = alert {
        let enabled = store.toggle_alert(user, kind)?;
        println!(
            "{} alert {}",
            event_label(kind, language, false),
            if enabled { "on" } else { "off" }
        );
    }

    let mut profile = store
        .load_or_create(user)
        .with_context(|| format!("Failed to load profile for {}", user))?;
    let mut tracker = profile.tracker(config.ramadan.total_days);

    if let Some(day) = toggle {
        let completed = tracker.toggle(day).with_context(|| {
            format!("Day {} is outside 1..={}", day, tracker.total_days())
        })?;
        tracing::info!("Day {} marked {}", day, if completed { "fasted" } else { "not fasted" });
        profile.set_tracker(&tracker);
        store.save(user, &profile)?;
    }

    let marks: String = (1..=tracker.total_days())
        .map(|d| if tracker.is_completed(d) { '#' } else { '.' })
        .collect();
    println!("{}: {} [{}]", user, tracker.progress_label(), marks);

    let alerts: Vec<&str> = EventKind::ALL
        .iter()
        .filter(|kind| profile.notification_settings.is_enabled(**kind))
        .map(|kind| event_label(*kind, language, false))
        .collect();
    println!("Alerts: {}", alerts.join(", "));
    Ok(())
}
