//! In-memory conflict rule registry.
//!
//! # Responsibility
//! - Hold one rule per conflict kind with its enabled flag and severity.
//! - Apply caller updates by rule id.
//!
//! # Invariants
//! - Rules are listed in `ConflictType` order, fixed at initialization.
//! - A rule's id, kind, name and description never change.
//! - Updates are validated in full before anything is written.

use crate::model::conflict::{ConflictRule, ConflictType, Severity};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Partial rule update. `None` fields are left untouched.
///
/// `kind`, `name` and `description` are accepted only when they match the
/// current value, so callers can round-trip a full rule record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleUpdate {
    pub enabled: Option<bool>,
    pub severity: Option<Severity>,
    pub kind: Option<ConflictType>,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl RuleUpdate {
    pub fn enabled(enabled: bool) -> Self {
        Self {
            enabled: Some(enabled),
            ..Self::default()
        }
    }

    pub fn severity(severity: Severity) -> Self {
        Self {
            severity: Some(severity),
            ..Self::default()
        }
    }
}

/// Rule lookup/update errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleRegistryError {
    NotFound(String),
    InvalidUpdate {
        rule_id: String,
        field: &'static str,
    },
}

impl Display for RuleRegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(rule_id) => write!(f, "conflict rule not found: {rule_id}"),
            Self::InvalidUpdate { rule_id, field } => {
                write!(f, "conflict rule `{rule_id}` field `{field}` is immutable")
            }
        }
    }
}

impl Error for RuleRegistryError {}

/// Rule set keyed by conflict kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleRegistry {
    rules: BTreeMap<ConflictType, ConflictRule>,
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleRegistry {
    /// Creates one enabled rule per kind with default severities.
    pub fn new() -> Self {
        let rules = ConflictType::ALL
            .into_iter()
            .map(|kind| (kind, ConflictRule::default_for(kind)))
            .collect();
        Self { rules }
    }

    /// Returns rules in classifier order.
    pub fn list_rules(&self) -> Vec<ConflictRule> {
        self.rules.values().cloned().collect()
    }

    /// Returns enabled rules in classifier order.
    pub fn enabled_rules(&self) -> impl Iterator<Item = &ConflictRule> {
        self.rules.values().filter(|rule| rule.enabled)
    }

    pub fn rule_for(&self, kind: ConflictType) -> Option<&ConflictRule> {
        self.rules.get(&kind)
    }

    pub fn is_enabled(&self, kind: ConflictType) -> bool {
        self.rule_for(kind).is_some_and(|rule| rule.enabled)
    }

    /// Returns one rule by id. Surrounding whitespace in `rule_id` is ignored.
    pub fn get_rule(&self, rule_id: &str) -> Result<&ConflictRule, RuleRegistryError> {
        let normalized = rule_id.trim();
        self.rules
            .values()
            .find(|rule| rule.id == normalized)
            .ok_or_else(|| RuleRegistryError::NotFound(normalized.to_string()))
    }

    /// Applies `update` to the rule with `rule_id` and returns the new record.
    ///
    /// # Errors
    /// - `NotFound` when no rule has `rule_id`.
    /// - `InvalidUpdate` when `update` changes `kind`, `name` or `description`.
    pub fn update_rule(
        &mut self,
        rule_id: &str,
        update: &RuleUpdate,
    ) -> Result<ConflictRule, RuleRegistryError> {
        let current = self.get_rule(rule_id)?;
        let invalid = |field| RuleRegistryError::InvalidUpdate {
            rule_id: current.id.clone(),
            field,
        };
        if update.kind.is_some_and(|kind| kind != current.kind) {
            return Err(invalid("type"));
        }
        if update.name.as_ref().is_some_and(|name| *name != current.name) {
            return Err(invalid("name"));
        }
        if update
            .description
            .as_ref()
            .is_some_and(|description| *description != current.description)
        {
            return Err(invalid("description"));
        }

        let kind = current.kind;
        let rule = self
            .rules
            .get_mut(&kind)
            .ok_or_else(|| RuleRegistryError::NotFound(rule_id.trim().to_string()))?;
        if let Some(enabled) = update.enabled {
            rule.enabled = enabled;
        }
        if let Some(severity) = update.severity {
            rule.severity = severity;
        }
        Ok(rule.clone())
    }

    /// Restores the initial rule set.
    pub fn reset_defaults(&mut self) {
        *self = Self::new();
    }
}
