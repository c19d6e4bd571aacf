//! Display language support: digit rendering and event names.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::schedule::EventKind;

const BENGALI_DIGITS: [char; 10] = ['০', '১', '২', '৩', '৪', '৫', '৬', '৭', '৮', '৯'];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Bn,
}

/// Replace ASCII digits with the digits of `language`.
pub fn localize_digits(text: &str, language: Language) -> String {
    match language {
        Language::En => text.to_string(),
        Language::Bn => text
            .chars()
            .map(|c| match c.to_digit(10) {
                Some(d) if c.is_ascii_digit() => BENGALI_DIGITS[d as usize],
                _ => c,
            })
            .collect(),
    }
}

/// Display name of an event.
///
/// Before Ramadan starts the fast boundaries are shown under their prayer names
/// (Fajr, Maghrib).
pub fn event_label(kind: EventKind, language: Language, pre_ramadan: bool) -> &'static str {
    match (language, kind, pre_ramadan) {
        (Language::En, EventKind::Sehri, false) => "Sehri",
        (Language::En, EventKind::Sehri, true) => "Fajr",
        (Language::En, EventKind::Dhuhr, _) => "Dhuhr",
        (Language::En, EventKind::Asr, _) => "Asr",
        (Language::En, EventKind::Iftar, false) => "Iftar",
        (Language::En, EventKind::Iftar, true) => "Maghrib",
        (Language::En, EventKind::Isha, _) => "Isha",
        (Language::Bn, EventKind::Sehri, false) => "সেহরি",
        (Language::Bn, EventKind::Sehri, true) => "ফজর",
        (Language::Bn, EventKind::Dhuhr, _) => "জোহর",
        (Language::Bn, EventKind::Asr, _) => "আসর",
        (Language::Bn, EventKind::Iftar, false) => "ইফতার",
        (Language::Bn, EventKind::Iftar, true) => "মাগরিব",
        (Language::Bn, EventKind::Isha, _) => "ইশা",
    }
}
