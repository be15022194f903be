//! Prelude module for common re-exports.
//!
//! ```rust
//! use teleop_common::prelude::*;
//! ```

use std::time::Duration;

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{MotionProfile, TeleopConfig};

// ─── System Constants ───────────────────────────────────────────────
pub use crate::consts::{CYCLE_PERIOD_MS, DEFAULT_CONFIG_PATH};

// ─── Types ──────────────────────────────────────────────────────────
pub use crate::command::{
    AssistClaims, ControlSource, DriveSignal, NeutralMode, Nudge, Ownership, TargetClass,
    TrackingType, VisionTarget,
};
pub use crate::error::{FaultState, SubsystemFault};
pub use crate::input::{Axis, Button, ControllerSnapshot, RawInputFrame};
pub use crate::state::{
    ArbitrationMode, DrivetrainState, ElevatorPosition, ElevatorState, ElevatorTarget,
    ExtensionState, GamePieceMode, GrabberState, IntakeState, PickupLocation, RollerState,
    SolenoidState, WristState,
};

// ─── Hardware ───────────────────────────────────────────────────────
pub use crate::hal::{
    AssistCommand, AssistContext, AssistFactory, AssistOutput, DigitalInput, DigitalOutput,
    HalError, InputSource, MotorController, TelemetrySink,
};

/// Default cycle period as Duration.
pub const DEFAULT_CYCLE_PERIOD: Duration = Duration::from_millis(CYCLE_PERIOD_MS as u64);
