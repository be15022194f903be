//! Actuator group ownership.
//!
//! Exactly one [`ControlSource`] owns each actuator group per cycle. The
//! table is rebuilt from scratch before any subsystem is updated:
//! MANUAL everywhere, then the handoff sequence's claims, then the active
//! assist command's claims. The assist wins any overlap.

use teleop_common::command::{AssistClaims, ControlSource, Ownership};
use teleop_common::error::SubsystemFault;

/// Independently owned set of actuators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ActuatorGroup {
    Drivetrain = 0,
    Elevator = 1,
    Intake = 2,
    HatchFlower = 3,
}

impl ActuatorGroup {
    pub const ALL: [ActuatorGroup; 4] = [
        Self::Drivetrain,
        Self::Elevator,
        Self::Intake,
        Self::HatchFlower,
    ];

    /// Claim bit for this group.
    #[inline]
    pub const fn claim(self) -> AssistClaims {
        match self {
            Self::Drivetrain => AssistClaims::DRIVETRAIN,
            Self::Elevator => AssistClaims::ELEVATOR,
            Self::Intake => AssistClaims::INTAKE,
            Self::HatchFlower => AssistClaims::HATCH_FLOWER,
        }
    }
}

/// Result of resolving one cycle's ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub ownership: Ownership,
    /// `ARBITRATION_CONFLICT` if assist and sequence claimed the same group.
    pub fault: SubsystemFault,
}

/// Build the ownership table for this cycle.
pub fn resolve_ownership(
    assist: Option<AssistClaims>,
    sequence: Option<AssistClaims>,
) -> Resolution {
    let mut ownership = Ownership::MANUAL;
    let mut fault = SubsystemFault::empty();

    if let Some(claims) = sequence {
        ownership.grant(claims, ControlSource::Sequence);
    }
    if let Some(claims) = assist {
        ownership.grant(claims, ControlSource::Assist);
        if sequence.is_some_and(|s| s.intersects(claims)) {
            fault |= SubsystemFault::ARBITRATION_CONFLICT;
        }
    }

    Resolution { ownership, fault }
}

/// Current owner of `group`.
#[inline]
pub fn owner(ownership: &Ownership, group: ActuatorGroup) -> ControlSource {
    match group {
        ActuatorGroup::Drivetrain => ownership.drivetrain,
        ActuatorGroup::Elevator => ownership.elevator,
        ActuatorGroup::Intake => ownership.intake,
        ActuatorGroup::HatchFlower => ownership.hatch_flower,
    }
}

/// Whether `source` may write `group`'s setpoints this cycle.
#[inline]
pub fn may_write(ownership: &Ownership, group: ActuatorGroup, source: ControlSource) -> bool {
    owner(ownership, group) == source
}
