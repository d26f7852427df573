use chrono::{NaiveTime, Weekday};

use crate::error::{RbackupError, Result};
use crate::types::{BackupType, CompressionType, DeleteType};
use crate::util::paths::is_safe_name;

pub mod command;
pub mod render;

pub use render::RenderContext;

/// Short day names used in calendar specs and job descriptions, Monday first.
pub const DAY_ABBREVIATIONS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

pub const TIME_FORMAT: &str = "%H:%M";

/// Weekdays a recurring job fires on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Schedule {
    days: [bool; 7],
}

impl Schedule {
    pub fn from_days(days: &[Weekday]) -> Self {
        let mut schedule = Schedule::default();
        for day in days {
            schedule.days[day.num_days_from_monday() as usize] = true;
        }
        schedule
    }

    pub fn from_flags(days: [bool; 7]) -> Self {
        Schedule { days }
    }

    pub fn flags(&self) -> [bool; 7] {
        self.days
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.days[day.num_days_from_monday() as usize]
    }

    pub fn is_empty(&self) -> bool {
        !self.days.iter().any(|d| *d)
    }

    /// Abbreviations of the active days in Monday-first order.
    pub fn active_abbreviations(&self) -> Vec<&'static str> {
        DAY_ABBREVIATIONS
            .iter()
            .zip(self.days.iter())
            .filter(|(_, set)| **set)
            .map(|(name, _)| *name)
            .collect()
    }

    /// Parses a comma separated day list such as `mon,wed,fri`.
    pub fn parse(value: &str) -> std::result::Result<Self, String> {
        let mut days = Vec::new();
        for part in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let day = part
                .parse::<Weekday>()
                .map_err(|_| format!("invalid weekday {}", part))?;
            days.push(day);
        }
        Ok(Schedule::from_days(&days))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JobFlags {
    pub transfer_compression: bool,
    pub delta: bool,
    pub backup_compression: bool,
    pub recurring: bool,
    pub delete_type: DeleteType,
    pub compression_type: CompressionType,
    pub backup_type: BackupType,
}

/// One configured backup job.
///
/// Records have no setters; an edit replaces the whole record through
/// [`crate::store::JobStore::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRecord {
    name: String,
    source: String,
    destination: String,
    command: String,
    schedule: Schedule,
    time_of_day: String,
    flags: JobFlags,
    enabled: bool,
}

impl JobRecord {
    pub fn new(
        name: impl Into<String>,
        source: impl Into<String>,
        destination: impl Into<String>,
        command: impl Into<String>,
        schedule: Schedule,
        time_of_day: impl Into<String>,
        flags: JobFlags,
    ) -> Self {
        JobRecord {
            name: name.into(),
            source: source.into(),
            destination: destination.into(),
            command: command.into(),
            schedule,
            time_of_day: time_of_day.into(),
            flags,
            enabled: false,
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn schedule(&self) -> Schedule {
        self.schedule
    }

    pub fn time_of_day(&self) -> &str {
        &self.time_of_day
    }

    pub fn flags(&self) -> JobFlags {
        self.flags
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// True when the record has everything needed to produce unit files.
    pub fn is_renderable(&self) -> bool {
        !self.command.is_empty() && !self.source.is_empty() && !self.destination.is_empty()
    }

    pub fn service_unit_name(&self) -> String {
        format!("{}.service", self.name)
    }

    pub fn timer_unit_name(&self) -> String {
        format!("{}.timer", self.name)
    }

    pub fn script_name(&self) -> String {
        format!("{}.sh", self.name)
    }

    /// The unit whose enablement controls whether the job is scheduled.
    pub fn schedule_unit_name(&self) -> String {
        if self.flags.recurring {
            self.timer_unit_name()
        } else {
            self.service_unit_name()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !is_safe_name(&self.name) {
            return Err(RbackupError::InvalidJob(format!(
                "job {} name must use only letters, digits, '.', '-', '_'",
                self.name
            )));
        }
        if NaiveTime::parse_from_str(&self.time_of_day, TIME_FORMAT).is_err() {
            return Err(RbackupError::InvalidJob(format!(
                "job {}: time {:?} is not HH:MM",
                self.name, self.time_of_day
            )));
        }
        Ok(())
    }
}
