//! Pure time arithmetic: intervals, overlap tests and free-slot search.

pub mod free_slot;
pub mod interval;
