//! Hardware and collaborator traits.
//!
//! The control core never touches a device directly. It is handed boxed
//! trait objects at construction:
//!
//! - [`MotorController`] - open-loop or closed-loop motor with feedback
//! - [`DigitalOutput`] - solenoid channel
//! - [`DigitalInput`] - limit/hatch switch
//! - [`InputSource`] - both gamepads, sampled once per cycle
//! - [`TelemetrySink`] - named numeric values
//! - [`AssistCommand`] / [`AssistFactory`] - vision-assist behaviour
//!
//! # Timing
//!
//! | Operation | RT Constraint |
//! |-----------|---------------|
//! | actuator writes / feedback reads | **HARD**, no blocking |
//! | `InputSource::sample` | **HARD** |
//! | `TelemetrySink::flush` | soft, may buffer |
//! | `init` / `shutdown` | none (outside the loop) |

use thiserror::Error;

use crate::command::{AssistClaims, DriveSignal, NeutralMode, TrackingType};
use crate::config::MotionProfile;
use crate::input::RawInputFrame;
use crate::state::{ElevatorPosition, GamePieceMode, GrabberState, IntakeState, WristState};

/// Error types for hardware and collaborator operations.
#[derive(Debug, Clone, Error)]
pub enum HalError {
    /// Device initialization failed.
    #[error("Initialization failed: {0}")]
    InitFailed(String),

    /// Device did not answer.
    #[error("Hardware communication error: {0}")]
    CommunicationError(String),

    /// Controller unplugged or not enumerated.
    #[error("Input device disconnected: {0}")]
    Disconnected(String),

    /// Telemetry could not be delivered.
    #[error("Telemetry error: {0}")]
    TelemetryError(String),
}

// ─── Actuators & Sensors ────────────────────────────────────────────

/// A motor controller with integrated encoder and current sensing.
///
/// Position units are whatever the subsystem's configuration is written
/// in (rotations for the elevator, degrees for the wrist, inches for the
/// drivetrain).
pub trait MotorController {
    /// Percent output in [-1, 1].
    fn set_open_loop_output(&mut self, output: f64);

    /// Closed-loop position target with motion profile.
    fn set_closed_loop_target(&mut self, position: f64, profile: &MotionProfile);

    /// Measured position. May be non-finite if the sensor misbehaves.
    fn position(&self) -> f64;

    /// Measured output current [A].
    fn current(&self) -> f64;

    /// Reset the position sensor to zero.
    fn zero_position(&mut self);

    /// Behaviour at zero output. Default: ignored.
    fn set_neutral_mode(&mut self, _mode: NeutralMode) {}
}

/// A single solenoid channel.
pub trait DigitalOutput {
    fn set_digital_output(&mut self, level: bool);

    /// Last level written.
    fn level(&self) -> bool;
}

/// A single switch.
pub trait DigitalInput {
    fn is_triggered(&self) -> bool;
}

// ─── Collaborators ──────────────────────────────────────────────────

/// Source of raw controller state.
pub trait InputSource {
    /// Sample both controllers. Called once at the start of every cycle.
    ///
    /// # Errors
    /// `HalError::Disconnected` if a controller is missing; the caller
    /// substitutes a neutral snapshot.
    fn sample(&mut self) -> Result<RawInputFrame, HalError>;
}

/// Per-cycle named numeric telemetry.
pub trait TelemetrySink {
    fn publish(&mut self, key: &str, value: f64);

    /// Called once after all components published for a cycle.
    fn flush(&mut self) -> Result<(), HalError> {
        Ok(())
    }
}

// ─── Assist Commands ────────────────────────────────────────────────

/// Feedback handed to the active assist command every cycle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AssistContext {
    pub mode: GamePieceMode,
    /// Average drivetrain distance traveled.
    pub drive_distance: f64,
    pub has_hatch: bool,
    /// Elevator is in `SET_POSITION` within tolerance of `elevator_target`.
    pub elevator_in_position: bool,
    /// Last position the elevator was asked for.
    pub elevator_target: ElevatorPosition,
    /// Last wrist preset the intake commanded.
    pub wrist: WristState,
}

/// Setpoint requests from an assist command. Only groups the command
/// claims are applied; a claimed drivetrain without a signal goes neutral.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AssistOutput {
    pub drive: Option<DriveSignal>,
    pub elevator: Option<ElevatorPosition>,
    pub intake: Option<IntakeState>,
    pub grabber: Option<GrabberState>,
}

impl AssistOutput {
    pub fn drive(signal: DriveSignal) -> Self {
        Self {
            drive: Some(signal),
            ..Self::default()
        }
    }
}

/// A unit of autonomous-assist behaviour.
///
/// # Lifecycle
///
/// 1. `start()` - once, in the cycle the arbitrator selects it
/// 2. `update()` - every cycle while active, including the start cycle
/// 3. `cancel()` - on override, permission withdrawal or replacement
///
/// `is_complete()` is polled before `update()`; a complete command is
/// dropped without being cancelled.
pub trait AssistCommand {
    /// Short identifier for logs.
    fn name(&self) -> &str;

    fn start(&mut self, now: f64);

    fn update(&mut self, now: f64, ctx: &AssistContext) -> AssistOutput;

    /// Stop whatever the command is doing. The arbitrator guarantees at
    /// most one call per command.
    fn cancel(&mut self);

    fn is_complete(&self) -> bool;

    /// Actuator groups owned while active.
    fn claims(&self) -> AssistClaims {
        AssistClaims::DRIVETRAIN
    }
}

/// Builds assist commands for a tracking selection.
pub trait AssistFactory {
    /// Configure the vision system for `tracking` and return the command
    /// that follows it.
    fn create(&mut self, tracking: TrackingType) -> Box<dyn AssistCommand>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hal_error_display() {
        let e = HalError::Disconnected("operator".to_string());
        assert_eq!(e.to_string(), "Input device disconnected: operator");
    }

    #[test]
    fn assist_output_drive_only() {
        let out = AssistOutput::drive(DriveSignal::NEUTRAL);
        assert_eq!(out.drive, Some(DriveSignal::NEUTRAL));
        assert!(out.elevator.is_none());
        assert!(out.intake.is_none());
        assert!(out.grabber.is_none());
    }
}
