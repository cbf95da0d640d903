//! Interval and overlap arithmetic over event time windows.
//!
//! # Invariants
//! - Intervals are half-open `[start, end)`: back-to-back events do not overlap.
//! - All functions are pure and never panic on caller input.

use crate::model::event::Event;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMATS: &[&str] = &["%H:%M", "%H:%M:%S"];

/// Half-open local time window `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventInterval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl EventInterval {
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// Event paired with its resolved interval.
///
/// Built once per detection call so classifiers never re-parse dates.
#[derive(Debug, Clone, Copy)]
pub struct ScheduledEvent<'a> {
    pub event: &'a Event,
    pub interval: EventInterval,
}

impl<'a> ScheduledEvent<'a> {
    pub fn new(event: &'a Event, interval: EventInterval) -> Self {
        Self { event, interval }
    }
}

/// Parses a `YYYY-MM-DD` calendar date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// Parses an `HH:MM` or `HH:MM:SS` time of day.
pub fn parse_time_of_day(value: &str) -> Option<NaiveTime> {
    let trimmed = value.trim();
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(trimmed, format).ok())
}

/// Builds `[start, start + duration)`. `None` when the end is unrepresentable.
pub fn to_interval(start: NaiveDateTime, duration_minutes: i64) -> Option<EventInterval> {
    let duration = TimeDelta::try_minutes(duration_minutes)?;
    let end = start.checked_add_signed(duration)?;
    Some(EventInterval { start, end })
}

/// True iff `a.start < b.end && b.start < a.end`.
pub fn overlaps(a: &EventInterval, b: &EventInterval) -> bool {
    a.start < b.end && b.start < a.end
}

/// Signed minutes from the earlier interval's end to the later one's start.
///
/// Negative when the intervals overlap, zero when back-to-back.
pub fn gap_minutes(a: &EventInterval, b: &EventInterval) -> i64 {
    let (first, second) = if a.start <= b.start { (a, b) } else { (b, a) };
    (second.start - first.end).num_minutes()
}

/// True when `inner` lies entirely within `outer` (bounds inclusive).
pub fn contains(outer: &EventInterval, inner: &EventInterval) -> bool {
    outer.start <= inner.start && inner.end <= outer.end
}
