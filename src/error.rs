use std::io;

use thiserror::Error;

use crate::schedule::EventKind;

/// Errors raised while loading or validating a prayer schedule.
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("day {day}: invalid {kind:?} time {value:?}")]
    InvalidTime {
        day: u32,
        kind: EventKind,
        value: String,
    },

    #[error("day {day}: {later:?} is not after {earlier:?}")]
    OutOfOrder {
        day: u32,
        earlier: EventKind,
        later: EventKind,
    },

    #[error("calendar response returned code {0}")]
    UpstreamCode(i64),
}

/// Errors raised by the profile store.
#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid user name: {0:?}")]
    InvalidName(String),
}
