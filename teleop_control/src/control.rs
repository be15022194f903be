//! Signal conditioning root.
//!
//! Stick shaping for the input mapper and switch debouncing for the
//! hatch flower.

pub mod debounce;
pub mod shaping;
