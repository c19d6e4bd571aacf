//! Per-user fasting progress, alert preferences and their on-disk store.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ProfileError;
use crate::schedule::EventKind;

pub const DEFAULT_TOTAL_DAYS: u32 = 30;

/// Which prayers raise an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSettings {
    pub sehri: bool,
    pub dhuhr: bool,
    pub asr: bool,
    pub iftar: bool,
    pub isha: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            sehri: true,
            dhuhr: true,
            asr: true,
            iftar: true,
            isha: true,
        }
    }
}

impl NotificationSettings {
    fn slot(&mut self, kind: EventKind) -> &mut bool {
        match kind {
            EventKind::Sehri => &mut self.sehri,
            EventKind::Dhuhr => &mut self.dhuhr,
            EventKind::Asr => &mut self.asr,
            EventKind::Iftar => &mut self.iftar,
            EventKind::Isha => &mut self.isha,
        }
    }

    pub fn is_enabled(&self, kind: EventKind) -> bool {
        match kind {
            EventKind::Sehri => self.sehri,
            EventKind::Dhuhr => self.dhuhr,
            EventKind::Asr => self.asr,
            EventKind::Iftar => self.iftar,
            EventKind::Isha => self.isha,
        }
    }

    /// Flip the setting for `kind` and return the new value.
    pub fn toggle(&mut self, kind: EventKind) -> bool {
        let slot = self.slot(kind);
        *slot = !*slot;
        *slot
    }
}

/// Completed fast days out of the month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastingTracker {
    completed: BTreeSet<u32>,
    total_days: u32,
}

impl Default for FastingTracker {
    fn default() -> Self {
        Self::new(DEFAULT_TOTAL_DAYS)
    }
}

impl FastingTracker {
    pub fn new(total_days: u32) -> Self {
        Self {
            completed: BTreeSet::new(),
            total_days,
        }
    }

    /// Build a tracker from stored day numbers, dropping any out of range.
    pub fn from_days(days: &[u32], total_days: u32) -> Self {
        let completed = days
            .iter()
            .copied()
            .filter(|d| (1..=total_days).contains(d))
            .collect();
        Self {
            completed,
            total_days,
        }
    }

    /// Flip completion of `day`. Returns the new state, or `None` if the day is
    /// outside the month.
    pub fn toggle(&mut self, day: u32) -> Option<bool> {
        if !(1..=self.total_days).contains(&day) {
            return None;
        }
        if self.completed.remove(&day) {
            Some(false)
        } else {
            self.completed.insert(day);
            Some(true)
        }
    }

    pub fn is_completed(&self, day: u32) -> bool {
        self.completed.contains(&day)
    }

    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    pub fn total_days(&self) -> u32 {
        self.total_days
    }

    /// Completed days in ascending order.
    pub fn days(&self) -> Vec<u32> {
        self.completed.iter().copied().collect()
    }

    /// e.g. `12 / 30`
    pub fn progress_label(&self) -> String {
        format!("{} / {}", self.completed_count(), self.total_days)
    }
}

/// Stored user data. Missing fields fall back to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub completed_days: Vec<u32>,
    pub notification_settings: NotificationSettings,
    pub tutorial_completed: bool,
}

impl UserProfile {
    pub fn tracker(&self, total_days: u32) -> FastingTracker {
        FastingTracker::from_days(&self.completed_days, total_days)
    }

    pub fn set_tracker(&mut self, tracker: &FastingTracker) {
        self.completed_days = tracker.days();
    }
}

/// One JSON file per user in a directory.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, ProfileError> {
        let valid = !name.is_empty()
            && name.len() <= 64
            && name
                .chars()
                .all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == ' ');
        if !valid || name.trim().is_empty() {
            return Err(ProfileError::InvalidName(name.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", name)))
    }

    /// Load a profile, or `Ok(None)` for an unknown user.
    pub fn load(&self, name: &str) -> Result<Option<UserProfile>, ProfileError> {
        let path = self.path_for(name)?;
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&data)?))
    }

    /// Load a profile, creating and saving a default one for a new user.
    pub fn load_or_create(&self, name: &str) -> Result<UserProfile, ProfileError> {
        if let Some(profile) = self.load(name)? {
            return Ok(profile);
        }
        tracing::info!("Creating profile for {}", name);
        let profile = UserProfile::default();
        self.save(name, &profile)?;
        Ok(profile)
    }

    /// Alert settings saved for `name`, or `fallback` for an unknown user.
    pub fn notification_settings(
        &self,
        name: &str,
        fallback: NotificationSettings,
    ) -> Result<NotificationSettings, ProfileError> {
        Ok(self
            .load(name)?
            .map_or(fallback, |profile| profile.notification_settings))
    }

    /// Flip one of the user's prayer alerts and persist it. Returns the new value.
    pub fn toggle_alert(&self, name: &str, kind: EventKind) -> Result<bool, ProfileError> {
        let mut profile = self.load_or_create(name)?;
        let enabled = profile.notification_settings.toggle(kind);
        self.save(name, &profile)?;
        Ok(enabled)
    }

    pub fn save(&self, name: &str, profile: &UserProfile) -> Result<(), ProfileError> {
        let path = self.path_for(name)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(&path, serde_json::to_vec_pretty(profile)?)?;
        tracing::debug!("Saved profile to {}", path.display());
        Ok(())
    }
}
