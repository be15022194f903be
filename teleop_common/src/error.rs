//! Fault bitflags for the teleop control core.
//!
//! Faults are accumulated per subsystem per cycle and published to
//! telemetry. None of them stops the robot: the owning component keeps
//! writing a defined output every cycle. `ATTENTION_MASK` selects the
//! faults the driver station should highlight.

use bitflags::bitflags;

bitflags! {
    /// Per-cycle subsystem fault flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SubsystemFault: u8 {
        /// A discrete state value could not be decoded; output forced to zero.
        const UNREACHABLE_STATE    = 0x01;
        /// Sensor reading non-finite or inconsistent (time going backwards).
        const SENSOR_IMPLAUSIBLE   = 0x02;
        /// Wrist commanded to ground but has not crossed the transit bound.
        const WRIST_NOT_ARRIVING   = 0x04;
        /// More than one tracking trigger pressed in the same cycle.
        const ARBITRATION_CONFLICT = 0x08;
        /// Raw axis sample outside [-1, 1] or non-finite.
        const INPUT_OUT_OF_RANGE   = 0x10;
    }
}

impl SubsystemFault {
    /// Faults the driver station should highlight.
    pub const ATTENTION_MASK: Self = Self::from_bits_truncate(
        Self::UNREACHABLE_STATE.bits()
            | Self::SENSOR_IMPLAUSIBLE.bits()
            | Self::WRIST_NOT_ARRIVING.bits(),
    );

    /// Returns true if any attention flag is set.
    #[inline]
    pub const fn needs_attention(&self) -> bool {
        self.intersects(Self::ATTENTION_MASK)
    }
}

impl Default for SubsystemFault {
    fn default() -> Self {
        Self::empty()
    }
}

/// Fault flags of every component for one cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FaultState {
    pub input: SubsystemFault,
    pub arbitration: SubsystemFault,
    pub drivetrain: SubsystemFault,
    pub elevator: SubsystemFault,
    pub intake: SubsystemFault,
    pub hatch_flower: SubsystemFault,
}

impl FaultState {
    /// Union of all component faults.
    #[inline]
    pub fn combined(&self) -> SubsystemFault {
        self.input
            | self.arbitration
            | self.drivetrain
            | self.elevator
            | self.intake
            | self.hatch_flower
    }

    #[inline]
    pub fn has_any_fault(&self) -> bool {
        !self.combined().is_empty()
    }

    #[inline]
    pub fn needs_attention(&self) -> bool {
        self.combined().needs_attention()
    }

    #[inline]
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
