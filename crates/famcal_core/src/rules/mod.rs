//! Runtime-configurable conflict rule set.

pub mod registry;
