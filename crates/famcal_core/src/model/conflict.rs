//! Conflict rule, detected conflict and resolution records.
//!
//! # Responsibility
//! - Define the rule configuration shape owned by the rule registry.
//! - Define the per-call output handed back to callers.
//!
//! # Invariants
//! - `ConflictType` declaration order is the fixed classifier order.
//! - `Severity` and `ImpactLevel` order from least to most disruptive.
//! - `DetectedConflict.priority` is always within `1..=10`.

use crate::model::event::{Event, EventId, PersonId};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Conflict classifier kind. Declaration order is evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictType {
    TimeOverlap,
    DoubleBooking,
    LocationConflict,
    TravelTime,
    FamilyConflict,
}

impl ConflictType {
    /// Every kind, in classifier order.
    pub const ALL: [ConflictType; 5] = [
        Self::TimeOverlap,
        Self::DoubleBooking,
        Self::LocationConflict,
        Self::TravelTime,
        Self::FamilyConflict,
    ];

    /// Stable string id used in rule ids and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TimeOverlap => "time_overlap",
            Self::DoubleBooking => "double_booking",
            Self::LocationConflict => "location_conflict",
            Self::TravelTime => "travel_time",
            Self::FamilyConflict => "family_conflict",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::TimeOverlap => "Time overlap",
            Self::DoubleBooking => "Double booking",
            Self::LocationConflict => "Location conflict",
            Self::TravelTime => "Travel time",
            Self::FamilyConflict => "Family conflict",
        }
    }

    /// User-facing short description.
    pub fn description(self) -> &'static str {
        match self {
            Self::TimeOverlap => "Warn when a person has two events at the same time.",
            Self::DoubleBooking => {
                "Warn when a new event duplicates or sits entirely inside an existing one."
            }
            Self::LocationConflict => {
                "Warn when two people need the same place at the same time."
            }
            Self::TravelTime => {
                "Warn when there is not enough time to travel between back-to-back events."
            }
            Self::FamilyConflict => "Warn when a family event collides with a personal one.",
        }
    }

    /// Rule id assigned to this kind's rule at registry initialization.
    pub fn default_rule_id(self) -> String {
        format!("rule_{}", self.as_str())
    }

    pub fn default_severity(self) -> Severity {
        match self {
            Self::TimeOverlap => Severity::Major,
            Self::DoubleBooking => Severity::Critical,
            Self::LocationConflict => Severity::Major,
            Self::TravelTime => Severity::Minor,
            Self::FamilyConflict => Severity::Major,
        }
    }
}

/// How disruptive a conflict is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Minor,
    Major,
    Critical,
}

impl Severity {
    /// One level up, saturating at `Critical`.
    pub fn upgraded(self) -> Self {
        match self {
            Self::Minor => Self::Major,
            Self::Major | Self::Critical => Self::Critical,
        }
    }

    /// Priority contribution before cost/status weights.
    pub fn base_priority(self) -> u8 {
        match self {
            Self::Minor => 3,
            Self::Major => 6,
            Self::Critical => 9,
        }
    }
}

/// Configuration record for one classifier.
///
/// Only `enabled` and `severity` change after initialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictRule {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ConflictType,
    pub name: String,
    pub description: String,
    pub enabled: bool,
    pub severity: Severity,
}

impl ConflictRule {
    /// Initial rule for one kind: enabled, default severity.
    pub fn default_for(kind: ConflictType) -> Self {
        Self {
            id: kind.default_rule_id(),
            kind,
            name: kind.label().to_string(),
            description: kind.description().to_string(),
            enabled: true,
            severity: kind.default_severity(),
        }
    }
}

/// Suggested structural fix kind.
///
/// `Ignore` and `Other` exist for callers; the generator never emits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionType {
    Reschedule,
    Cancel,
    Relocate,
    Ignore,
    AcceptOverlap,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactLevel {
    Low,
    Medium,
    High,
}

/// One suggested fix for a detected conflict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictResolution {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: ResolutionType,
    pub description: String,
    pub impact: ImpactLevel,
    /// Signals the fix needs no extra input. Never auto-applied by the engine.
    pub automated: bool,
    /// Free start instant found for `Reschedule`, when one exists.
    pub suggested_start: Option<NaiveDateTime>,
}

/// One conflict record per rule kind that fired for a candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedConflict {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: ConflictType,
    pub severity: Severity,
    /// `1..=10`, higher sorts first.
    pub priority: u8,
    pub new_event: Event,
    /// Existing events in the order they were supplied.
    pub conflicting_events: Vec<Event>,
    pub affected_people: BTreeSet<PersonId>,
    pub detected_at: DateTime<Utc>,
    pub summary: String,
    pub resolutions: Vec<ConflictResolution>,
}

impl DetectedConflict {
    /// Returns whether `event_id` is the candidate or one of the conflicting events.
    pub fn involves(&self, event_id: &str) -> bool {
        self.new_event.id == event_id
            || self
                .conflicting_events
                .iter()
                .any(|event| event.id == event_id)
    }

    pub fn conflicting_event_ids(&self) -> Vec<&EventId> {
        self.conflicting_events.iter().map(|event| &event.id).collect()
    }
}

/// Highest severity across `conflicts`; `None` when empty.
pub fn highest_severity(conflicts: &[DetectedConflict]) -> Option<Severity> {
    conflicts.iter().map(|conflict| conflict.severity).max()
}
