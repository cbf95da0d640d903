//! Domain records read and produced by the conflict engine.
//!
//! # Responsibility
//! - `event`: caller-owned calendar entries and people.
//! - `conflict`: rules, detected conflicts and suggested resolutions.
//!
//! # Invariants
//! - The engine borrows events and never writes them back.
//! - Conflict and resolution records are created fresh per detection call.

pub mod conflict;
pub mod event;
