//! # Teleop Control Library
//!
//! Per-cycle control core of a competition robot during driver-controlled
//! play. Raw gamepad samples become named intents, the arbitrator decides
//! whether the driver or an autonomous-assist command owns each actuator
//! group, and four subsystem state machines turn setpoints into actuator
//! outputs.
//!
//! ## Cycle
//!
//! 1. **Sample**: input source and subsystem sensors
//! 2. **Map**: [`input::mapper`] builds the intent frame
//! 3. **Arbitrate**: [`command::arbitration`] latches modes, runs assist
//!    and handoff lifecycles, writes setpoints
//! 4. **Update**: drivetrain, elevator, intake, hatch flower
//! 5. **Publish**: telemetry and fault edges
//!
//! ## Single Writer
//!
//! Everything runs on one thread in a fixed order. Each actuator group has
//! exactly one owner per cycle, recorded in the ownership table.

pub mod command;
pub mod config;
pub mod control;
pub mod cycle;
pub mod error;
pub mod input;
pub mod sim;
pub mod state;
pub mod telemetry;
