//! Suggested structural fixes for detected conflicts.

pub mod generator;
