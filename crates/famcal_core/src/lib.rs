//! Scheduling conflict detection and resolution for family calendars.
//! Callers pass a candidate event plus the already-accepted events and get
//! back ranked conflicts with suggested fixes. The crate never stores events.

pub mod config;
pub mod detect;
pub mod logging;
pub mod model;
pub mod resolution;
pub mod rules;
pub mod schedule;
pub mod service;

pub use config::{ConfigError, EngineConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::conflict::{
    highest_severity, ConflictResolution, ConflictRule, ConflictType, DetectedConflict,
    ImpactLevel, ResolutionType, Severity,
};
pub use model::event::{
    Event, EventId, EventPriority, EventStatus, EventValidationError, Person, PersonId,
    Recurrence, DEFAULT_FAMILY_SENTINEL,
};
pub use rules::registry::{RuleRegistry, RuleRegistryError, RuleUpdate};
pub use schedule::interval::{gap_minutes, overlaps, EventInterval};
pub use service::conflict_service::{ConflictResult, ConflictService, ConflictServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
