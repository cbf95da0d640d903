//! Conflict detection pipeline.
//!
//! # Responsibility
//! - `classifiers`: one pure strategy per conflict kind.
//! - `aggregator`: group, rank and attribute classifier matches.
//!
//! # Invariants
//! - Detection is a pure function of its inputs and the rule snapshot.
//! - Every returned conflict carries its resolution list.

pub mod aggregator;
pub mod classifiers;

use crate::detect::aggregator::{aggregate, classify_all};
use crate::detect::classifiers::ClassifierContext;
use crate::model::conflict::DetectedConflict;
use crate::resolution::generator::{generate_resolutions, ResolutionContext};
use crate::rules::registry::RuleRegistry;
use crate::schedule::free_slot::DayWindow;
use crate::schedule::interval::ScheduledEvent;
use chrono::Utc;

/// Runs classification, aggregation and resolution generation for one candidate.
pub fn run_detection(
    candidate: &ScheduledEvent<'_>,
    existing: &[ScheduledEvent<'_>],
    context: &ClassifierContext<'_>,
    rules: &RuleRegistry,
    window: DayWindow,
) -> Vec<DetectedConflict> {
    let groups = classify_all(candidate, existing, context, rules);
    let mut conflicts = aggregate(candidate, existing, &groups, context, Utc::now());

    let resolution_context = ResolutionContext {
        candidate,
        existing,
        config: context.config,
        window,
    };
    for conflict in &mut conflicts {
        conflict.resolutions = generate_resolutions(conflict, &resolution_context);
    }
    conflicts
}
