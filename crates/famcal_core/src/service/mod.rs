//! Core use-case services.
//!
//! # Responsibility
//! - Turn engine internals into caller-level operations.
//! - Keep host applications decoupled from classifier and registry details.

pub mod conflict_service;
