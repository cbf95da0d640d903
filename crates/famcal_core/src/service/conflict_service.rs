//! Conflict checking use-case service.
//!
//! # Responsibility
//! - Expose the three caller operations: detect, list rules, update rule.
//! - Validate every input event before any classifier runs.
//! - Own the rule registry and guard it for concurrent callers.
//!
//! # Invariants
//! - Detection fails closed: one malformed event fails the whole call.
//! - Each detection call works on a registry snapshot taken at call start.
//! - Rule updates are validated in full before they become visible.
//! - Logs carry ids and counts only, never titles, names or locations.

use crate::config::{ConfigError, EngineConfig};
use crate::detect::classifiers::ClassifierContext;
use crate::detect::run_detection;
use crate::model::conflict::{ConflictRule, DetectedConflict};
use crate::model::event::{Event, EventId, EventValidationError, Person};
use crate::rules::registry::{RuleRegistry, RuleRegistryError, RuleUpdate};
use crate::schedule::free_slot::DayWindow;
use crate::schedule::interval::ScheduledEvent;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

const DETECTION_FAILED_MESSAGE: &str = "Could not check for conflicts.";
const RULE_UPDATE_FAILED_MESSAGE: &str = "Could not update the conflict rule.";

/// Service-boundary error for conflict operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictServiceError {
    /// Candidate or existing event cannot be placed on the timeline.
    InvalidEvent {
        event_id: EventId,
        source: EventValidationError,
    },
    /// Unknown rule id.
    NotFound(String),
    /// Update tried to change an immutable rule field.
    InvalidUpdate {
        rule_id: String,
        field: &'static str,
    },
}

impl ConflictServiceError {
    /// Short message suitable for end users.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidEvent { .. } => DETECTION_FAILED_MESSAGE,
            Self::NotFound(_) | Self::InvalidUpdate { .. } => RULE_UPDATE_FAILED_MESSAGE,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::InvalidEvent { .. } => "invalid_event",
            Self::NotFound(_) => "rule_not_found",
            Self::InvalidUpdate { .. } => "invalid_update",
        }
    }
}

impl Display for ConflictServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEvent { event_id, source } => {
                write!(f, "invalid event `{event_id}`: {source}")
            }
            Self::NotFound(rule_id) => write!(f, "conflict rule not found: {rule_id}"),
            Self::InvalidUpdate { rule_id, field } => {
                write!(f, "conflict rule `{rule_id}` field `{field}` is immutable")
            }
        }
    }
}

impl Error for ConflictServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEvent { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<RuleRegistryError> for ConflictServiceError {
    fn from(value: RuleRegistryError) -> Self {
        match value {
            RuleRegistryError::NotFound(rule_id) => Self::NotFound(rule_id),
            RuleRegistryError::InvalidUpdate { rule_id, field } => {
                Self::InvalidUpdate { rule_id, field }
            }
        }
    }
}

pub type ConflictResult<T> = Result<T, ConflictServiceError>;

/// Conflict detection engine entry point.
///
/// `Send + Sync`; share it behind an `Arc` across callers.
#[derive(Debug)]
pub struct ConflictService {
    config: EngineConfig,
    window: DayWindow,
    rules: RwLock<RuleRegistry>,
}

impl ConflictService {
    /// Creates a service with validated configuration and default rules.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        let window = config.validate()?;
        info!(
            "event=conflict_service_init module=conflict status=ok travel_buffer_minutes={} slot_step_minutes={}",
            config.travel_buffer_minutes, config.slot_step_minutes
        );
        Ok(Self {
            config,
            window,
            rules: RwLock::new(RuleRegistry::new()),
        })
    }

    /// Creates a service with default configuration.
    pub fn with_defaults() -> Self {
        let config = EngineConfig::default();
        let window = config.day_window().unwrap_or_default();
        Self {
            config,
            window,
            rules: RwLock::new(RuleRegistry::new()),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Checks `candidate` against `existing` with the current rule set.
    ///
    /// # Contract
    /// - `existing` must not contain the candidate itself when editing.
    /// - Returns conflicts sorted by descending priority.
    ///
    /// # Errors
    /// - `InvalidEvent` for the first event (candidate first, then existing in
    ///   order) that fails validation.
    pub fn detect_conflicts(
        &self,
        candidate: &Event,
        existing: &[Event],
        people: &[Person],
    ) -> ConflictResult<Vec<DetectedConflict>> {
        let scheduled_candidate = schedule(candidate)?;
        let scheduled_existing = existing
            .iter()
            .map(schedule)
            .collect::<ConflictResult<Vec<_>>>()?;

        let snapshot = self.read_rules().clone();
        let context = ClassifierContext {
            people,
            config: &self.config,
        };
        let conflicts = run_detection(
            &scheduled_candidate,
            &scheduled_existing,
            &context,
            &snapshot,
            self.window,
        );

        info!(
            "event=conflict_detect module=conflict status=ok candidate={} existing={} conflicts={}",
            candidate.id,
            existing.len(),
            conflicts.len()
        );
        Ok(conflicts)
    }

    /// Returns rules in classifier order.
    pub fn get_rules(&self) -> Vec<ConflictRule> {
        self.read_rules().list_rules()
    }

    pub fn get_rule(&self, rule_id: &str) -> ConflictResult<ConflictRule> {
        Ok(self.read_rules().get_rule(rule_id)?.clone())
    }

    /// Applies a partial update to one rule.
    ///
    /// # Errors
    /// - `NotFound` for unknown `rule_id`.
    /// - `InvalidUpdate` when the update changes an immutable field; nothing
    ///   is applied in that case.
    pub fn update_rule(&self, rule_id: &str, update: &RuleUpdate) -> ConflictResult<ConflictRule> {
        let result = self
            .write_rules()
            .update_rule(rule_id, update)
            .map_err(ConflictServiceError::from);
        match &result {
            Ok(rule) => info!(
                "event=rule_update module=conflict status=ok rule_id={} enabled={} severity={:?}",
                rule.id, rule.enabled, rule.severity
            ),
            Err(err) => warn!(
                "event=rule_update module=conflict status=error code={} rule_id={}",
                err.code(),
                rule_id.trim()
            ),
        }
        result
    }

    /// Restores every rule to its initial state.
    pub fn reset_rules(&self) -> Vec<ConflictRule> {
        let mut rules = self.write_rules();
        rules.reset_defaults();
        info!("event=rule_reset module=conflict status=ok");
        rules.list_rules()
    }

    // Registry writes are all-or-nothing; a poisoned guard is still consistent.
    fn read_rules(&self) -> RwLockReadGuard<'_, RuleRegistry> {
        self.rules.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_rules(&self) -> RwLockWriteGuard<'_, RuleRegistry> {
        self.rules.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ConflictService {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn schedule(event: &Event) -> ConflictResult<ScheduledEvent<'_>> {
    match event.interval() {
        Ok(interval) => Ok(ScheduledEvent::new(event, interval)),
        Err(source) => {
            warn!(
                "event=conflict_detect module=conflict status=error code=invalid_event event_id={}",
                event.id
            );
            Err(ConflictServiceError::InvalidEvent {
                event_id: event.id.clone(),
                source,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConflictService, ConflictServiceError};
    use crate::config::EngineConfig;
    use crate::model::event::{Event, EventValidationError};
    use crate::rules::registry::RuleRegistryError;

    #[test]
    fn registry_errors_map_to_service_errors() {
        let not_found: ConflictServiceError =
            RuleRegistryError::NotFound("rule_x".to_string()).into();
        assert_eq!(not_found, ConflictServiceError::NotFound("rule_x".to_string()));

        let invalid: ConflictServiceError = RuleRegistryError::InvalidUpdate {
            rule_id: "rule_time_overlap".to_string(),
            field: "type",
        }
        .into();
        assert!(matches!(
            invalid,
            ConflictServiceError::InvalidUpdate { field: "type", .. }
        ));
    }

    #[test]
    fn invalid_event_surfaces_generic_user_message() {
        let service = ConflictService::default();
        let bad = Event::new("bad", "Swim", "amari", "2025-09-04", "14:00", 0);
        let err = service
            .detect_conflicts(&bad, &[], &[])
            .expect_err("zero duration must fail");
        assert_eq!(err.user_message(), "Could not check for conflicts.");
        assert!(matches!(
            err,
            ConflictServiceError::InvalidEvent {
                source: EventValidationError::NonPositiveDuration { minutes: 0 },
                ..
            }
        ));
    }

    #[test]
    fn new_rejects_invalid_config() {
        let config = EngineConfig {
            slot_step_minutes: 0,
            ..EngineConfig::default()
        };
        assert!(ConflictService::new(config).is_err());
    }

    #[test]
    fn service_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ConflictService>();
    }
}
