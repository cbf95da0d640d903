//! Calendar event and person records read by the conflict engine.
//!
//! # Responsibility
//! - Define the caller-owned event shape the engine inspects.
//! - Validate that an event resolves to a well-defined time interval.
//!
//! # Invariants
//! - `duration_minutes > 0`.
//! - `date` + `time` parse to exactly one local start instant.
//! - The engine never mutates events; it only borrows them.

use crate::schedule::interval::{parse_date, parse_time_of_day, to_interval, EventInterval};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Caller-assigned event identifier.
pub type EventId = String;

/// Caller-assigned person identifier.
pub type PersonId = String;

/// Person identifier that marks an event as applying to the whole family.
pub const DEFAULT_FAMILY_SENTINEL: &str = "all";

/// Event confirmation state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    #[default]
    Confirmed,
    Tentative,
    Cancelled,
}

/// Caller-provided importance hint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventPriority {
    Low,
    #[default]
    Medium,
    High,
}

/// Recurrence marker. Only the single occurrence on `date` is checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recurrence {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
}

/// One calendar entry as stored by the calling application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    /// Assigned person, or the family sentinel.
    pub person_id: PersonId,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    /// Start time of day, `HH:MM` or `HH:MM:SS`.
    pub time: String,
    pub duration_minutes: i64,
    #[serde(default)]
    pub location: Option<String>,
    /// Free-form category tag (`sport`, `school`, ...).
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub recurrence: Recurrence,
    #[serde(default)]
    pub priority: EventPriority,
    #[serde(default)]
    pub status: EventStatus,
}

impl Event {
    /// Creates a confirmed, location-less, zero-cost event.
    pub fn new(
        id: impl Into<EventId>,
        title: impl Into<String>,
        person_id: impl Into<PersonId>,
        date: impl Into<String>,
        time: impl Into<String>,
        duration_minutes: i64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            person_id: person_id.into(),
            date: date.into(),
            time: time.into(),
            duration_minutes,
            location: None,
            category: String::new(),
            cost: 0.0,
            recurrence: Recurrence::None,
            priority: EventPriority::Medium,
            status: EventStatus::Confirmed,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_status(mut self, status: EventStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = cost;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Checks the scheduling invariants the engine depends on.
    ///
    /// # Errors
    /// - `EmptyId` when `id` is blank.
    /// - `NonPositiveDuration` when `duration_minutes <= 0`.
    /// - `InvalidDate` / `InvalidTime` when the strings do not parse.
    pub fn validate(&self) -> Result<(), EventValidationError> {
        self.interval().map(|_| ())
    }

    /// Resolves this event to its half-open `[start, end)` interval.
    pub fn interval(&self) -> Result<EventInterval, EventValidationError> {
        if self.id.trim().is_empty() {
            return Err(EventValidationError::EmptyId);
        }
        if self.duration_minutes <= 0 {
            return Err(EventValidationError::NonPositiveDuration {
                minutes: self.duration_minutes,
            });
        }
        let date = parse_date(&self.date)
            .ok_or_else(|| EventValidationError::InvalidDate(self.date.clone()))?;
        let time = parse_time_of_day(&self.time)
            .ok_or_else(|| EventValidationError::InvalidTime(self.time.clone()))?;
        to_interval(date.and_time(time), self.duration_minutes).ok_or(
            EventValidationError::DurationOutOfRange {
                minutes: self.duration_minutes,
            },
        )
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == EventStatus::Cancelled
    }

    pub fn is_confirmed(&self) -> bool {
        self.status == EventStatus::Confirmed
    }

    pub fn is_family(&self, sentinel: &str) -> bool {
        self.person_id == sentinel
    }

    /// Trimmed, lowercased location; `None` when absent or blank.
    pub fn normalized_location(&self) -> Option<String> {
        self.location
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_lowercase)
    }
}

/// Family member used to attribute conflicts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    /// Display color, e.g. `#3b82f6`.
    pub color: String,
}

impl Person {
    pub fn new(
        id: impl Into<PersonId>,
        name: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
        }
    }
}

/// Reasons an event cannot be placed on the timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventValidationError {
    EmptyId,
    NonPositiveDuration { minutes: i64 },
    DurationOutOfRange { minutes: i64 },
    InvalidDate(String),
    InvalidTime(String),
}

impl Display for EventValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "event id must not be empty"),
            Self::NonPositiveDuration { minutes } => {
                write!(f, "event duration must be positive, got {minutes} minutes")
            }
            Self::DurationOutOfRange { minutes } => {
                write!(f, "event duration is out of range: {minutes} minutes")
            }
            Self::InvalidDate(value) => {
                write!(f, "event date `{value}` is not a valid YYYY-MM-DD date")
            }
            Self::InvalidTime(value) => {
                write!(f, "event time `{value}` is not a valid HH:MM time")
            }
        }
    }
}

impl Error for EventValidationError {}
