//! Hatch handoff: ground intake → hatch flower.
//!
//! Claims the elevator, intake and hatch flower for as long as the
//! operator holds HANDOFF. Never touches the drivetrain.
//!
//! ```text
//! MovingToHandoff ──(elevator at HATCH bottom ∧ wrist HANDOFF)──▶ Capturing
//! Capturing ──(has_hatch)──▶ Done (intake STOWED)
//! ```

use teleop_common::command::AssistClaims;
use teleop_common::hal::{AssistCommand, AssistContext, AssistOutput};
use teleop_common::state::{
    ElevatorPosition, ElevatorTarget, GamePieceMode, GrabberState, IntakeState, WristState,
};
use tracing::debug;

/// Elevator position the flower meets the intake at.
pub const HANDOFF_ELEVATOR: ElevatorPosition =
    ElevatorPosition::new(GamePieceMode::Hatch, ElevatorTarget::Bottom);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandoffStep {
    Idle,
    MovingToHandoff,
    Capturing,
    Done,
    Cancelled,
}

#[derive(Debug)]
pub struct HandoffSequence {
    step: HandoffStep,
}

impl HandoffSequence {
    pub fn new() -> Self {
        Self {
            step: HandoffStep::Idle,
        }
    }

    #[inline]
    pub fn step(&self) -> HandoffStep {
        self.step
    }

    fn advance(&mut self, next: HandoffStep) {
        debug!("Handoff {:?} -> {:?}", self.step, next);
        self.step = next;
    }

    fn in_handoff_position(ctx: &AssistContext) -> bool {
        ctx.elevator_in_position
            && ctx.elevator_target == HANDOFF_ELEVATOR
            && ctx.wrist == WristState::Handoff
    }
}

impl Default for HandoffSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl AssistCommand for HandoffSequence {
    fn name(&self) -> &str {
        "handoff"
    }

    fn start(&mut self, _now: f64) {
        self.advance(HandoffStep::MovingToHandoff);
    }

    fn update(&mut self, _now: f64, ctx: &AssistContext) -> AssistOutput {
        if self.step == HandoffStep::MovingToHandoff && Self::in_handoff_position(ctx) {
            self.advance(HandoffStep::Capturing);
        }
        if self.step == HandoffStep::Capturing && ctx.has_hatch {
            self.advance(HandoffStep::Done);
        }

        match self.step {
            HandoffStep::MovingToHandoff => AssistOutput {
                elevator: Some(HANDOFF_ELEVATOR),
                intake: Some(IntakeState::Handoff),
                ..AssistOutput::default()
            },
            HandoffStep::Capturing => AssistOutput {
                elevator: Some(HANDOFF_ELEVATOR),
                intake: Some(IntakeState::Handoff),
                grabber: Some(GrabberState::Grab),
                ..AssistOutput::default()
            },
            HandoffStep::Done => AssistOutput {
                intake: Some(IntakeState::Stowed),
                ..AssistOutput::default()
            },
            HandoffStep::Idle | HandoffStep::Cancelled => AssistOutput::default(),
        }
    }

    fn cancel(&mut self) {
        self.step = HandoffStep::Cancelled;
    }

    fn is_complete(&self) -> bool {
        self.step == HandoffStep::Done
    }

    fn claims(&self) -> AssistClaims {
        AssistClaims::ELEVATOR | AssistClaims::INTAKE | AssistClaims::HATCH_FLOWER
    }
}
