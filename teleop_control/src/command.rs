//! Command processing root.
//!
//! Arbitration between manual and assist control, per-group ownership,
//! the single-occupancy command slot and the hatch handoff sequence.

pub mod arbitration;
pub mod assist;
pub mod handoff;
pub mod source_lock;
