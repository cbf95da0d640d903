//! One classification strategy per conflict kind.
//!
//! # Responsibility
//! - Scan existing events against one candidate for a single conflict kind.
//!
//! # Invariants
//! - Classifiers are pure: they read inputs and return matches, nothing else.
//! - Existing events are scanned in the given order and every match is kept.
//! - Cancelled events never match any classifier.

use crate::config::EngineConfig;
use crate::model::conflict::{ConflictRule, ConflictType, Severity};
use crate::model::event::Person;
use crate::schedule::interval::{contains, gap_minutes, overlaps, ScheduledEvent};

/// Read-only inputs shared by every classifier in one detection call.
#[derive(Debug, Clone, Copy)]
pub struct ClassifierContext<'a> {
    pub people: &'a [Person],
    pub config: &'a EngineConfig,
}

impl ClassifierContext<'_> {
    fn is_family(&self, scheduled: &ScheduledEvent<'_>) -> bool {
        scheduled.event.is_family(&self.config.family_sentinel)
    }
}

/// One existing event flagged by a classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawMatch {
    /// Index into the existing-event slice.
    pub index: usize,
    pub severity_hint: Severity,
}

/// Classifier strategy signature.
pub type Classifier = fn(
    &ScheduledEvent<'_>,
    &[ScheduledEvent<'_>],
    &ClassifierContext<'_>,
    &ConflictRule,
) -> Vec<RawMatch>;

/// Strategy table lookup.
pub fn classifier_for(kind: ConflictType) -> Classifier {
    match kind {
        ConflictType::TimeOverlap => classify_time_overlap,
        ConflictType::DoubleBooking => classify_double_booking,
        ConflictType::LocationConflict => classify_location_conflict,
        ConflictType::TravelTime => classify_travel_time,
        ConflictType::FamilyConflict => classify_family_conflict,
    }
}

fn scan(
    existing: &[ScheduledEvent<'_>],
    candidate: &ScheduledEvent<'_>,
    severity_hint: Severity,
    mut matches: impl FnMut(&ScheduledEvent<'_>) -> bool,
) -> Vec<RawMatch> {
    if candidate.event.is_cancelled() {
        return Vec::new();
    }
    existing
        .iter()
        .enumerate()
        .filter(|(_, other)| !other.event.is_cancelled())
        .filter(|(_, other)| matches(*other))
        .map(|(index, _)| RawMatch {
            index,
            severity_hint,
        })
        .collect()
}

/// Same person (both individual or both family), intervals overlap.
///
/// Family-versus-individual pairs belong to the family classifier.
pub fn classify_time_overlap(
    candidate: &ScheduledEvent<'_>,
    existing: &[ScheduledEvent<'_>],
    _context: &ClassifierContext<'_>,
    rule: &ConflictRule,
) -> Vec<RawMatch> {
    scan(existing, candidate, rule.severity, |other| {
        other.event.person_id == candidate.event.person_id
            && overlaps(&candidate.interval, &other.interval)
    })
}

/// Same person, candidate identical to or inside the existing interval.
///
/// Always reported at least `Major`.
pub fn classify_double_booking(
    candidate: &ScheduledEvent<'_>,
    existing: &[ScheduledEvent<'_>],
    _context: &ClassifierContext<'_>,
    rule: &ConflictRule,
) -> Vec<RawMatch> {
    let hint = rule.severity.max(Severity::Major);
    scan(existing, candidate, hint, |other| {
        other.event.person_id == candidate.event.person_id
            && contains(&other.interval, &candidate.interval)
    })
}

/// Different people, same non-empty location, intervals overlap.
pub fn classify_location_conflict(
    candidate: &ScheduledEvent<'_>,
    existing: &[ScheduledEvent<'_>],
    _context: &ClassifierContext<'_>,
    rule: &ConflictRule,
) -> Vec<RawMatch> {
    let Some(location) = candidate.event.normalized_location() else {
        return Vec::new();
    };
    scan(existing, candidate, rule.severity, |other| {
        other.event.person_id != candidate.event.person_id
            && other.event.normalized_location().as_deref() == Some(location.as_str())
            && overlaps(&candidate.interval, &other.interval)
    })
}

/// Same person, different non-empty locations, gap shorter than the buffer.
pub fn classify_travel_time(
    candidate: &ScheduledEvent<'_>,
    existing: &[ScheduledEvent<'_>],
    context: &ClassifierContext<'_>,
    rule: &ConflictRule,
) -> Vec<RawMatch> {
    let Some(location) = candidate.event.normalized_location() else {
        return Vec::new();
    };
    let buffer = context.config.travel_buffer_minutes;
    scan(existing, candidate, rule.severity, |other| {
        if other.event.person_id != candidate.event.person_id {
            return false;
        }
        let Some(other_location) = other.event.normalized_location() else {
            return false;
        };
        if other_location == location || overlaps(&candidate.interval, &other.interval) {
            return false;
        }
        gap_minutes(&candidate.interval, &other.interval) < buffer
    })
}

/// Exactly one side is a family event, intervals overlap.
pub fn classify_family_conflict(
    candidate: &ScheduledEvent<'_>,
    existing: &[ScheduledEvent<'_>],
    context: &ClassifierContext<'_>,
    rule: &ConflictRule,
) -> Vec<RawMatch> {
    let candidate_is_family = context.is_family(candidate);
    scan(existing, candidate, rule.severity, |other| {
        context.is_family(other) != candidate_is_family
            && overlaps(&candidate.interval, &other.interval)
    })
}
