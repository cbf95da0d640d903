//! Resolution suggestions for detected conflicts.
//!
//! # Responsibility
//! - Pick the applicable fixes from a fixed catalogue per conflict.
//! - Find a concrete free slot for the reschedule suggestion.
//!
//! # Invariants
//! - `Ignore` is never produced; dismissing a warning is a caller action.
//! - Output is ordered by ascending impact, catalogue order on ties.
//! - Nothing is auto-applied; `automated` is always `false` here.

use crate::config::EngineConfig;
use crate::model::conflict::{
    ConflictResolution, ConflictType, DetectedConflict, ImpactLevel, ResolutionType, Severity,
};
use crate::schedule::free_slot::{find_free_slot, DayWindow, SlotQuery};
use crate::schedule::interval::{to_interval, EventInterval, ScheduledEvent};
use chrono::NaiveDateTime;
use uuid::Uuid;

/// Inputs needed to place a reschedule suggestion.
#[derive(Debug, Clone, Copy)]
pub struct ResolutionContext<'a> {
    pub candidate: &'a ScheduledEvent<'a>,
    pub existing: &'a [ScheduledEvent<'a>],
    pub config: &'a EngineConfig,
    pub window: DayWindow,
}

/// Builds the ordered resolution list for one conflict.
pub fn generate_resolutions(
    conflict: &DetectedConflict,
    context: &ResolutionContext<'_>,
) -> Vec<ConflictResolution> {
    let mut resolutions = vec![reschedule(conflict, context), cancel()];
    if matches!(
        conflict.kind,
        ConflictType::LocationConflict | ConflictType::TravelTime
    ) {
        resolutions.push(relocate(conflict.kind));
    }
    if conflict.severity == Severity::Minor {
        resolutions.push(accept_overlap());
    }
    resolutions.sort_by_key(|resolution| resolution.impact);
    resolutions
}

fn resolution(
    kind: ResolutionType,
    description: String,
    impact: ImpactLevel,
    suggested_start: Option<NaiveDateTime>,
) -> ConflictResolution {
    ConflictResolution {
        id: Uuid::new_v4(),
        kind,
        description,
        impact,
        automated: false,
        suggested_start,
    }
}

fn reschedule(conflict: &DetectedConflict, context: &ResolutionContext<'_>) -> ConflictResolution {
    let suggested_start = suggest_start(conflict, context);
    let description = match suggested_start {
        Some(start) => format!(
            "Move the new event to {} on {}",
            start.format("%H:%M"),
            start.format("%Y-%m-%d")
        ),
        None => "Move the new event to a free time slot".to_string(),
    };
    resolution(
        ResolutionType::Reschedule,
        description,
        ImpactLevel::Medium,
        suggested_start,
    )
}

fn cancel() -> ConflictResolution {
    resolution(
        ResolutionType::Cancel,
        "Cancel the new event".to_string(),
        ImpactLevel::High,
        None,
    )
}

fn relocate(kind: ConflictType) -> ConflictResolution {
    let description = match kind {
        ConflictType::TravelTime => "Choose a location closer to the adjacent event",
        _ => "Choose a different location for the new event",
    };
    resolution(
        ResolutionType::Relocate,
        description.to_string(),
        ImpactLevel::Medium,
        None,
    )
}

fn accept_overlap() -> ConflictResolution {
    resolution(
        ResolutionType::AcceptOverlap,
        "Keep both events despite the conflict".to_string(),
        ImpactLevel::Low,
        None,
    )
}

/// Earliest free start after the latest conflicting event on the candidate's date.
///
/// Travel-time conflicts also keep the configured buffer after that event.
fn suggest_start(
    conflict: &DetectedConflict,
    context: &ResolutionContext<'_>,
) -> Option<NaiveDateTime> {
    let candidate = context.candidate;
    let latest_end = context
        .existing
        .iter()
        .filter(|other| conflict.involves(&other.event.id))
        .map(|other| other.interval.end)
        .max()?;
    let not_before = if conflict.kind == ConflictType::TravelTime {
        to_interval(latest_end, context.config.travel_buffer_minutes)?.end
    } else {
        latest_end
    };

    let sentinel = context.config.family_sentinel.as_str();
    let candidate_is_family = candidate.event.is_family(sentinel);
    let busy: Vec<EventInterval> = context
        .existing
        .iter()
        .filter(|other| !other.event.is_cancelled())
        .filter(|other| {
            candidate_is_family
                || other.event.is_family(sentinel)
                || other.event.person_id == candidate.event.person_id
        })
        .map(|other| other.interval)
        .collect();

    find_free_slot(
        &SlotQuery {
            date: candidate.interval.start.date(),
            duration_minutes: candidate.interval.duration_minutes(),
            not_before,
            window: context.window,
            step_minutes: context.config.slot_step_minutes,
        },
        &busy,
    )
}

#[cfg(test)]
mod tests {
    use super::{generate_resolutions, ResolutionContext};
    use crate::config::EngineConfig;
    use crate::model::conflict::{
        ConflictType, DetectedConflict, ImpactLevel, ResolutionType, Severity,
    };
    use crate::model::event::Event;
    use crate::schedule::interval::ScheduledEvent;
    use chrono::Utc;
    use std::collections::BTreeSet;
    use uuid::Uuid;

    fn conflict(
        kind: ConflictType,
        severity: Severity,
        candidate: &Event,
        others: &[Event],
    ) -> DetectedConflict {
        DetectedConflict {
            id: Uuid::new_v4(),
            kind,
            severity,
            priority: 5,
            new_event: candidate.clone(),
            conflicting_events: others.to_vec(),
            affected_people: BTreeSet::new(),
            detected_at: Utc::now(),
            summary: String::new(),
            resolutions: Vec::new(),
        }
    }

    fn kinds_for(kind: ConflictType, severity: Severity) -> Vec<ResolutionType> {
        let config = EngineConfig::default();
        let window = config.day_window().expect("default window");
        let candidate = Event::new("c", "Swim", "amari", "2025-09-04", "14:00", 60);
        let other = Event::new("o", "Piano", "amari", "2025-09-04", "14:30", 30);
        let scheduled_candidate = ScheduledEvent::new(&candidate, candidate.interval().expect("c"));
        let existing = [ScheduledEvent::new(&other, other.interval().expect("o"))];
        let context = ResolutionContext {
            candidate: &scheduled_candidate,
            existing: &existing,
            config: &config,
            window,
        };
        generate_resolutions(&conflict(kind, severity, &candidate, &[other.clone()]), &context)
            .into_iter()
            .map(|resolution| resolution.kind)
            .collect()
    }

    #[test]
    fn catalogue_filters_by_kind_and_severity() {
        assert_eq!(
            kinds_for(ConflictType::TimeOverlap, Severity::Major),
            vec![ResolutionType::Reschedule, ResolutionType::Cancel]
        );
        assert_eq!(
            kinds_for(ConflictType::LocationConflict, Severity::Major),
            vec![
                ResolutionType::Reschedule,
                ResolutionType::Relocate,
                ResolutionType::Cancel
            ]
        );
        assert_eq!(
            kinds_for(ConflictType::TravelTime, Severity::Minor),
            vec![
                ResolutionType::AcceptOverlap,
                ResolutionType::Reschedule,
                ResolutionType::Relocate,
                ResolutionType::Cancel
            ]
        );
    }

    #[test]
    fn never_suggests_ignore_or_automation() {
        let config = EngineConfig::default();
        let window = config.day_window().expect("default window");
        let candidate = Event::new("c", "Swim", "amari", "2025-09-04", "14:00", 60);
        let other = Event::new("o", "Piano", "amari", "2025-09-04", "14:30", 30);
        let scheduled_candidate = ScheduledEvent::new(&candidate, candidate.interval().expect("c"));
        let existing = [ScheduledEvent::new(&other, other.interval().expect("o"))];
        let context = ResolutionContext {
            candidate: &scheduled_candidate,
            existing: &existing,
            config: &config,
            window,
        };
        for kind in ConflictType::ALL {
            let resolutions = generate_resolutions(
                &conflict(kind, Severity::Minor, &candidate, &[other.clone()]),
                &context,
            );
            assert!(resolutions.iter().all(|r| r.kind != ResolutionType::Ignore));
            assert!(resolutions.iter().all(|r| !r.automated));
            let impacts: Vec<_> = resolutions.iter().map(|r| r.impact).collect();
            let mut sorted = impacts.clone();
            sorted.sort();
            assert_eq!(impacts, sorted);
            assert_eq!(impacts.first(), Some(&ImpactLevel::Low));
        }
    }

    #[test]
    fn reschedule_points_after_latest_conflicting_event() {
        let config = EngineConfig::default();
        let window = config.day_window().expect("default window");
        let candidate = Event::new("c", "Swim", "amari", "2025-09-04", "14:00", 60);
        let other = Event::new("o", "Piano", "amari", "2025-09-04", "14:30", 30);
        let scheduled_candidate = ScheduledEvent::new(&candidate, candidate.interval().expect("c"));
        let existing = [ScheduledEvent::new(&other, other.interval().expect("o"))];
        let context = ResolutionContext {
            candidate: &scheduled_candidate,
            existing: &existing,
            config: &config,
            window,
        };
        let resolutions = generate_resolutions(
            &conflict(ConflictType::TimeOverlap, Severity::Major, &candidate, &[other.clone()]),
            &context,
        );
        let reschedule = resolutions
            .iter()
            .find(|r| r.kind == ResolutionType::Reschedule)
            .expect("reschedule is always offered");
        assert_eq!(
            reschedule.suggested_start.map(|start| start.to_string()),
            Some("2025-09-04 15:00:00".to_string())
        );
        assert!(reschedule.description.contains("15:00"));
    }
}
