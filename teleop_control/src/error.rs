//! Error module root.
//!
//! Fault edge tracking. Faults are data, not control flow: subsystems
//! raise bits, the cycle collects them, the tracker logs transitions.

pub mod propagation;
