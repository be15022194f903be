//! Command types for the teleop control core.
//!
//! Defines `TrackingType` and its parts, `VisionTarget`, `DriveSignal`,
//! `ControlSource`, the per-cycle `Ownership` table and `AssistClaims`.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

// ─── Tracking ───────────────────────────────────────────────────────

/// Class of vision target a tracking trigger selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TargetClass {
    /// Reflective target above a hatch port.
    Target = 0,
    /// Loose cargo ball.
    Cargo = 1,
    /// Floor line in front of a hatch port.
    Line = 2,
}

impl TargetClass {
    /// Height model the vision system uses for this class.
    #[inline]
    pub const fn vision_target(self) -> VisionTarget {
        match self {
            Self::Target => VisionTarget::HatchPort,
            Self::Cargo => VisionTarget::CargoHeight,
            Self::Line => VisionTarget::Ground,
        }
    }
}

/// Left/right adjustment of a tracking selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Nudge {
    Center = 0,
    Left = 1,
    Right = 2,
}

impl Default for Nudge {
    fn default() -> Self {
        Self::Center
    }
}

/// Tracking variant handed to the assist command factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackingType {
    pub class: TargetClass,
    pub nudge: Nudge,
}

impl TrackingType {
    #[inline]
    pub const fn new(class: TargetClass, nudge: Nudge) -> Self {
        Self { class, nudge }
    }

    /// Vision pipeline index: three per class, center/left/right.
    #[inline]
    pub const fn pipeline(self) -> u8 {
        self.class as u8 * 3 + self.nudge as u8
    }

    #[inline]
    pub const fn vision_target(self) -> VisionTarget {
        self.class.vision_target()
    }
}

impl std::fmt::Display for TrackingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let class = match self.class {
            TargetClass::Target => "TARGET",
            TargetClass::Cargo => "CARGO",
            TargetClass::Line => "LINE",
        };
        match self.nudge {
            Nudge::Center => write!(f, "{class}"),
            Nudge::Left => write!(f, "{class}_LEFT"),
            Nudge::Right => write!(f, "{class}_RIGHT"),
        }
    }
}

/// Height model used by the external vision system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum VisionTarget {
    HatchPort = 0,
    CargoHeight = 1,
    Ground = 2,
}

// ─── Drive Signal ───────────────────────────────────────────────────

/// Motor behaviour at zero output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum NeutralMode {
    Brake = 0,
    Coast = 1,
}

impl Default for NeutralMode {
    fn default() -> Self {
        Self::Brake
    }
}

/// Percent-output command for both drivetrain sides.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DriveSignal {
    pub left: f64,
    pub right: f64,
    pub neutral_mode: NeutralMode,
}

impl DriveSignal {
    /// Zero output, brake.
    pub const NEUTRAL: Self = Self {
        left: 0.0,
        right: 0.0,
        neutral_mode: NeutralMode::Brake,
    };

    pub const fn new(left: f64, right: f64, neutral_mode: NeutralMode) -> Self {
        Self {
            left,
            right,
            neutral_mode,
        }
    }

    /// Arcade mix. When either side would exceed full output both sides are
    /// scaled by the same factor so the turn ratio is kept.
    pub fn from_throttle_and_turn(throttle: f64, turn: f64) -> Self {
        let mut left = throttle + turn;
        let mut right = throttle - turn;
        let max = left.abs().max(right.abs());
        if max > 1.0 {
            left /= max;
            right /= max;
        }
        Self::new(left, right, NeutralMode::Brake)
    }

    #[inline]
    pub fn is_neutral(&self) -> bool {
        self.left == 0.0 && self.right == 0.0
    }
}

// ─── Ownership ──────────────────────────────────────────────────────

/// Source allowed to write an actuator group's setpoints this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ControlSource {
    /// Mapped driver/operator intents.
    Manual = 0,
    /// The active vision assist command.
    Assist = 1,
    /// The operator's handoff sequence.
    Sequence = 2,
}

impl ControlSource {
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Manual),
            1 => Some(Self::Assist),
            2 => Some(Self::Sequence),
            _ => None,
        }
    }
}

impl Default for ControlSource {
    fn default() -> Self {
        Self::Manual
    }
}

bitflags! {
    /// Actuator groups a command may claim.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AssistClaims: u8 {
        const DRIVETRAIN   = 0x01;
        const ELEVATOR     = 0x02;
        const INTAKE       = 0x04;
        const HATCH_FLOWER = 0x08;
    }
}

impl Default for AssistClaims {
    fn default() -> Self {
        Self::DRIVETRAIN
    }
}

/// One owner per actuator group, recomputed every cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Ownership {
    pub drivetrain: ControlSource,
    pub elevator: ControlSource,
    pub intake: ControlSource,
    pub hatch_flower: ControlSource,
}

impl Ownership {
    /// Everything manual.
    pub const MANUAL: Self = Self {
        drivetrain: ControlSource::Manual,
        elevator: ControlSource::Manual,
        intake: ControlSource::Manual,
        hatch_flower: ControlSource::Manual,
    };

    /// Hand every group in `claims` to `source`.
    pub fn grant(&mut self, claims: AssistClaims, source: ControlSource) {
        if claims.contains(AssistClaims::DRIVETRAIN) {
            self.drivetrain = source;
        }
        if claims.contains(AssistClaims::ELEVATOR) {
            self.elevator = source;
        }
        if claims.contains(AssistClaims::INTAKE) {
            self.intake = source;
        }
        if claims.contains(AssistClaims::HATCH_FLOWER) {
            self.hatch_flower = source;
        }
    }
}
