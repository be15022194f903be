//! State machine enums for the teleop control core.
//!
//! All enums use `#[repr(u8)]` so they can be published as telemetry
//! values and decoded back with `from_u8`. Includes the global game piece
//! mode, the arbitration mode and the discrete state of every subsystem.

use serde::{Deserialize, Serialize};

// ─── Global Mode ────────────────────────────────────────────────────

/// Game piece family the subsystems are configured for.
///
/// Written only by the arbitrator, once per cycle, before any subsystem
/// update reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum GamePieceMode {
    Cargo = 0,
    Hatch = 1,
}

impl GamePieceMode {
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Cargo),
            1 => Some(Self::Hatch),
            _ => None,
        }
    }
}

impl Default for GamePieceMode {
    fn default() -> Self {
        Self::Hatch
    }
}

/// Where the next game piece is picked up from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum PickupLocation {
    Ground = 0,
    LoadingStation = 1,
}

impl PickupLocation {
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Ground),
            1 => Some(Self::LoadingStation),
            _ => None,
        }
    }
}

impl Default for PickupLocation {
    fn default() -> Self {
        Self::LoadingStation
    }
}

/// Who owns the drivetrain this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ArbitrationMode {
    /// Driver throttle/turn and operator intents.
    Manual = 0,
    /// An assist command drives the robot.
    Assist = 1,
}

impl Default for ArbitrationMode {
    fn default() -> Self {
        Self::Manual
    }
}

// ─── Elevator ───────────────────────────────────────────────────────

/// Elevator control state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ElevatorState {
    /// Open-loop power.
    Normal = 0,
    /// Zero power, holds by inaction.
    Stop = 1,
    /// Closed loop to a named target.
    SetPosition = 2,
}

impl ElevatorState {
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Normal),
            1 => Some(Self::Stop),
            2 => Some(Self::SetPosition),
            _ => None,
        }
    }
}

impl Default for ElevatorState {
    fn default() -> Self {
        Self::Stop
    }
}

/// Named elevator target. The position it resolves to depends on the
/// [`GamePieceMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ElevatorTarget {
    Bottom = 0,
    Middle = 1,
    Top = 2,
    LoadingStation = 3,
    CargoShip = 4,
}

impl ElevatorTarget {
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Bottom),
            1 => Some(Self::Middle),
            2 => Some(Self::Top),
            3 => Some(Self::LoadingStation),
            4 => Some(Self::CargoShip),
            _ => None,
        }
    }
}

/// A named target paired with the mode whose table it is looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElevatorPosition {
    pub mode: GamePieceMode,
    pub target: ElevatorTarget,
}

impl ElevatorPosition {
    #[inline]
    pub const fn new(mode: GamePieceMode, target: ElevatorTarget) -> Self {
        Self { mode, target }
    }
}

impl Default for ElevatorPosition {
    fn default() -> Self {
        Self::new(GamePieceMode::Hatch, ElevatorTarget::Bottom)
    }
}

// ─── Intake ─────────────────────────────────────────────────────────

/// Wrist preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum WristState {
    Ground = 0,
    Handoff = 1,
    Stowed = 2,
}

impl WristState {
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Ground),
            1 => Some(Self::Handoff),
            2 => Some(Self::Stowed),
            _ => None,
        }
    }
}

impl Default for WristState {
    fn default() -> Self {
        Self::Stowed
    }
}

/// Roller mode. Each mode maps to a configured open-loop power.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum RollerState {
    Stopped = 0,
    Hatch = 1,
    Cargo = 2,
    Hold = 3,
}

impl RollerState {
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Stopped),
            1 => Some(Self::Hatch),
            2 => Some(Self::Cargo),
            3 => Some(Self::Hold),
            _ => None,
        }
    }
}

impl Default for RollerState {
    fn default() -> Self {
        Self::Stopped
    }
}

/// Intake roller geometry solenoid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SolenoidState {
    Hatch = 0,
    Cargo = 1,
}

impl SolenoidState {
    /// Digital output level for this state.
    #[inline]
    pub const fn extended(self) -> bool {
        matches!(self, Self::Cargo)
    }
}

impl Default for SolenoidState {
    fn default() -> Self {
        Self::Hatch
    }
}

/// Desired composite intake state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum IntakeState {
    GroundHatch = 0,
    GroundCargo = 1,
    Handoff = 2,
    Stowed = 3,
}

impl IntakeState {
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::GroundHatch),
            1 => Some(Self::GroundCargo),
            2 => Some(Self::Handoff),
            3 => Some(Self::Stowed),
            _ => None,
        }
    }
}

impl Default for IntakeState {
    fn default() -> Self {
        Self::Stowed
    }
}

// ─── Hatch Flower ───────────────────────────────────────────────────

/// Hatch grabber fingers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum GrabberState {
    Grab = 0,
    Release = 1,
}

impl Default for GrabberState {
    fn default() -> Self {
        Self::Grab
    }
}

/// Hatch flower extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ExtensionState {
    Up = 0,
    Down = 1,
}

impl Default for ExtensionState {
    fn default() -> Self {
        Self::Down
    }
}

// ─── Drivetrain ─────────────────────────────────────────────────────

/// Drivetrain output state for the current cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum DrivetrainState {
    /// No source wrote a signal; outputs are zero.
    Neutral = 0,
    /// A source wrote a percent-output signal this cycle.
    OpenLoop = 1,
}

impl Default for DrivetrainState {
    fn default() -> Self {
        Self::Neutral
    }
}
