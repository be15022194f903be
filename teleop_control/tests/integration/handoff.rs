//! Operator handoff sequence: ground intake to hatch flower.

use teleop_common::command::ControlSource;
use teleop_common::input::{Axis, Button, ControllerSnapshot};
use teleop_common::state::{ElevatorPosition, ElevatorTarget, GamePieceMode, GrabberState, IntakeState};

use super::Harness;

fn idle() -> ControllerSnapshot {
    ControllerSnapshot::neutral()
}

fn handoff() -> ControllerSnapshot {
    idle().with_button(Button::Start)
}

#[test]
fn handoff_runs_to_completion_and_returns_groups() {
    let mut t = Harness::with_plant();
    let bottom = ElevatorPosition::new(GamePieceMode::Hatch, ElevatorTarget::Bottom);

    t.hold_operator(handoff());
    t.step();
    assert!(t.core.arbitrator().is_handoff_active());
    let own = t.core.arbitrator().ownership();
    assert_eq!(own.elevator, ControlSource::Sequence);
    assert_eq!(own.intake, ControlSource::Sequence);
    assert_eq!(own.hatch_flower, ControlSource::Sequence);
    assert_eq!(own.drivetrain, ControlSource::Manual);
    assert_eq!(t.core.subsystems().intake.desired_state(), IntakeState::Handoff);
    assert_eq!(t.core.subsystems().elevator.desired_position(), bottom);

    t.run(5);
    assert!(t.core.subsystems().elevator.is_at_position(bottom));
    assert_eq!(t.core.subsystems().hatch_flower.grabber(), GrabberState::Grab);

    // Hatch lands in the flower.
    t.h.hatch_switch.set(true);
    t.run(20);
    assert!(t.core.subsystems().hatch_flower.has_hatch());
    assert!(!t.core.arbitrator().is_handoff_active());
    assert_eq!(t.core.arbitrator().ownership().elevator, ControlSource::Manual);
    assert_eq!(t.core.subsystems().intake.desired_state(), IntakeState::Stowed);

    // Still holding the button does not restart it.
    t.run(5);
    assert!(!t.core.arbitrator().is_handoff_active());
}

#[test]
fn releasing_handoff_cancels_it() {
    let mut t = Harness::with_plant();
    t.hold_operator(handoff());
    t.run(3);
    assert!(t.core.arbitrator().is_handoff_active());

    t.release();
    t.step();
    assert!(!t.core.arbitrator().is_handoff_active());
    assert_eq!(t.core.arbitrator().ownership(), teleop_common::command::Ownership::MANUAL);
    assert_eq!(t.core.subsystems().intake.desired_state(), IntakeState::Stowed);
}

#[test]
fn driver_keeps_drivetrain_during_handoff() {
    let mut t = Harness::with_plant();
    t.hold(idle().with_axis(Axis::LeftY, -0.5), handoff());
    t.run(3);
    assert!(t.core.arbitrator().is_handoff_active());
    assert!((t.h.drive_left.output() - 0.25).abs() < 1e-12);
}

#[test]
fn operator_elevator_buttons_ignored_while_sequence_owns_elevator() {
    let mut t = Harness::with_plant();
    t.hold_operator(handoff().with_button(Button::Y));
    t.run(3);
    let elevator = &t.core.subsystems().elevator;
    assert_eq!(
        elevator.desired_position(),
        ElevatorPosition::new(GamePieceMode::Hatch, ElevatorTarget::Bottom)
    );
    assert_eq!(elevator.set_point(), 1.0);
}
