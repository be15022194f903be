//! Teleop Common Library
//!
//! Shared types for the teleop control core: discrete state enums,
//! controller naming scheme, fault bitflags, configuration structures and
//! the traits through which the core reaches physical hardware.
//!
//! # Module Structure
//!
//! - [`consts`] - Numeric limits and defaults
//! - [`state`] - Subsystem and mode enums
//! - [`input`] - Raw controller snapshot keyed by button/axis name
//! - [`command`] - Drive signals, tracking types, ownership
//! - [`error`] - Per-cycle fault bitflags
//! - [`config`] - TOML configuration structures
//! - [`hal`] - Actuator, sensor, telemetry and assist-command traits
//! - [`prelude`] - Common re-exports for convenience

pub mod command;
pub mod config;
pub mod consts;
pub mod error;
pub mod hal;
pub mod input;
pub mod prelude;
pub mod state;
