//! Merges raw classifier matches into ranked conflict records.
//!
//! # Responsibility
//! - Run enabled classifiers in fixed order.
//! - Group matches into one `DetectedConflict` per fired rule kind.
//! - Apply the double-booking severity coupling and compute priority.
//!
//! # Invariants
//! - Output is sorted by descending priority; ties keep classifier order.
//! - Priority is clamped to `1..=10`.

use crate::detect::classifiers::{classifier_for, ClassifierContext, RawMatch};
use crate::model::conflict::{ConflictRule, ConflictType, DetectedConflict, Severity};
use crate::model::event::{Event, Person, PersonId};
use crate::rules::registry::RuleRegistry;
use crate::schedule::interval::ScheduledEvent;
use chrono::{DateTime, Utc};
use log::debug;
use std::collections::BTreeSet;
use uuid::Uuid;

const MIN_PRIORITY: u8 = 1;
const MAX_PRIORITY: u8 = 10;

/// Matches produced by one enabled rule.
#[derive(Debug, Clone)]
pub struct ClassifiedGroup<'r> {
    pub rule: &'r ConflictRule,
    pub matches: Vec<RawMatch>,
}

/// Runs every enabled classifier and keeps the groups that matched.
pub fn classify_all<'r>(
    candidate: &ScheduledEvent<'_>,
    existing: &[ScheduledEvent<'_>],
    context: &ClassifierContext<'_>,
    rules: &'r RuleRegistry,
) -> Vec<ClassifiedGroup<'r>> {
    rules
        .enabled_rules()
        .filter_map(|rule| {
            let matches = classifier_for(rule.kind)(candidate, existing, context, rule);
            debug!(
                "event=classifier_run module=detect kind={} matches={}",
                rule.kind.as_str(),
                matches.len()
            );
            (!matches.is_empty()).then_some(ClassifiedGroup { rule, matches })
        })
        .collect()
}

/// Builds ranked conflict records from classified groups.
///
/// Resolutions are left empty; the caller attaches them afterwards.
pub fn aggregate(
    candidate: &ScheduledEvent<'_>,
    existing: &[ScheduledEvent<'_>],
    groups: &[ClassifiedGroup<'_>],
    context: &ClassifierContext<'_>,
    detected_at: DateTime<Utc>,
) -> Vec<DetectedConflict> {
    let double_booked = double_booked_pairs(candidate, existing, groups);

    let mut conflicts: Vec<DetectedConflict> = groups
        .iter()
        .map(|group| {
            let kind = group.rule.kind;
            let mut severity = group
                .matches
                .iter()
                .map(|raw| raw.severity_hint)
                .max()
                .unwrap_or(group.rule.severity);
            if kind == ConflictType::TimeOverlap
                && group.matches.iter().any(|raw| {
                    double_booked.contains(&pair_key(candidate.event, existing[raw.index].event))
                })
            {
                severity = severity.upgraded();
            }

            let conflicting_events: Vec<Event> = group
                .matches
                .iter()
                .map(|raw| existing[raw.index].event.clone())
                .collect();
            let priority = compute_priority(
                severity,
                candidate.event,
                &conflicting_events,
                context.config.cost_threshold,
            );
            let affected_people = affected_people(
                candidate.event,
                &conflicting_events,
                context.people,
                &context.config.family_sentinel,
            );

            DetectedConflict {
                id: Uuid::new_v4(),
                kind,
                severity,
                priority,
                new_event: candidate.event.clone(),
                summary: summarize(kind, conflicting_events.len()),
                conflicting_events,
                affected_people,
                detected_at,
                resolutions: Vec::new(),
            }
        })
        .collect();

    conflicts.sort_by(|left, right| right.priority.cmp(&left.priority));
    conflicts
}

/// `base(severity) + costWeight + statusWeight`, clamped to `1..=10`.
pub fn compute_priority(
    severity: Severity,
    candidate: &Event,
    conflicting: &[Event],
    cost_threshold: f64,
) -> u8 {
    let involved = || std::iter::once(candidate).chain(conflicting.iter());
    let cost_weight = u8::from(involved().any(|event| event.cost > cost_threshold));
    let status_weight = u8::from(involved().any(Event::is_confirmed));
    (severity.base_priority() + cost_weight + status_weight).clamp(MIN_PRIORITY, MAX_PRIORITY)
}

/// Union of involved people; the family sentinel expands to every known person.
///
/// With no known people the sentinel itself is kept.
pub fn affected_people(
    candidate: &Event,
    conflicting: &[Event],
    people: &[Person],
    family_sentinel: &str,
) -> BTreeSet<PersonId> {
    let mut affected = BTreeSet::new();
    for event in std::iter::once(candidate).chain(conflicting.iter()) {
        if event.is_family(family_sentinel) {
            if people.is_empty() {
                affected.insert(event.person_id.clone());
            } else {
                affected.extend(people.iter().map(|person| person.id.clone()));
            }
        } else {
            affected.insert(event.person_id.clone());
        }
    }
    affected
}

fn double_booked_pairs<'e>(
    candidate: &ScheduledEvent<'e>,
    existing: &[ScheduledEvent<'e>],
    groups: &[ClassifiedGroup<'_>],
) -> BTreeSet<(&'e str, &'e str)> {
    groups
        .iter()
        .filter(|group| group.rule.kind == ConflictType::DoubleBooking)
        .flat_map(|group| group.matches.iter())
        .map(|raw| pair_key(candidate.event, existing[raw.index].event))
        .collect()
}

/// Unordered event-id pair.
fn pair_key<'e>(a: &'e Event, b: &'e Event) -> (&'e str, &'e str) {
    if a.id <= b.id {
        (a.id.as_str(), b.id.as_str())
    } else {
        (b.id.as_str(), a.id.as_str())
    }
}

fn summarize(kind: ConflictType, count: usize) -> String {
    let noun = if count == 1 { "event" } else { "events" };
    format!("{} with {count} existing {noun}", kind.label())
}
