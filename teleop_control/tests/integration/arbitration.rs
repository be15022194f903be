//! MANUAL ↔ ASSIST arbitration through the full cycle.

use teleop_common::command::{ControlSource, Nudge, TargetClass, TrackingType};
use teleop_common::error::SubsystemFault;
use teleop_common::input::{Axis, Button, ControllerSnapshot};
use teleop_common::state::ArbitrationMode;
use teleop_control::sim::{SimRobot, SimTargetLock};

use super::Harness;

fn idle() -> ControllerSnapshot {
    ControllerSnapshot::neutral()
}

#[test]
fn track_target_assists_and_release_returns_manual_same_cycle() {
    let mut t = Harness::new();

    t.hold_driver(idle().with_button(Button::A));
    t.step();
    assert!(t.core.is_assist_active());
    assert_eq!(t.core.arbitrator().arbitration_mode(), ArbitrationMode::Assist);
    assert_eq!(t.core.arbitrator().ownership().drivetrain, ControlSource::Assist);
    assert_eq!(
        t.h.assist.created(),
        vec![TrackingType::new(TargetClass::Target, Nudge::Center)]
    );
    assert_eq!(t.h.drive_left.output(), SimTargetLock::THROTTLE);

    // Release with the stick forward: manual drive from this cycle's axes.
    t.hold_driver(idle().with_axis(Axis::LeftY, -0.5));
    t.step();
    assert!(!t.core.is_assist_active());
    assert_eq!(t.core.arbitrator().ownership().drivetrain, ControlSource::Manual);
    assert!((t.h.drive_left.output() - 0.25).abs() < 1e-12);
    assert!((t.h.drive_right.output() - 0.25).abs() < 1e-12);
    assert_eq!(t.h.assist.cancelled(), 1);
}

#[test]
fn override_cancels_and_held_trigger_does_not_restart() {
    let mut t = Harness::new();

    t.hold_driver(idle().with_button(Button::A));
    t.run(3);
    assert!(t.core.is_assist_active());

    t.hold_driver(idle().with_button(Button::A).with_axis(Axis::LeftY, -0.8));
    t.step();
    assert!(!t.core.is_assist_active());
    assert_eq!(t.h.assist.cancelled(), 1);
    // Driver steers through the override.
    assert!(t.h.drive_left.output() > 0.5);

    // Stick back to center, trigger still held: stays manual.
    t.hold_driver(idle().with_button(Button::A));
    t.run(5);
    assert!(!t.core.is_assist_active());
    assert_eq!(t.h.assist.started(), 1);

    // A fresh press starts a new command.
    t.release();
    t.step();
    t.hold_driver(idle().with_button(Button::A));
    t.step();
    assert!(t.core.is_assist_active());
    assert_eq!(t.h.assist.started(), 2);
}

#[test]
fn override_at_threshold_does_not_cancel() {
    let mut t = Harness::new();
    t.hold_driver(idle().with_button(Button::A));
    t.step();
    t.hold_driver(idle().with_button(Button::A).with_axis(Axis::RightX, 0.5));
    t.step();
    assert!(t.core.is_assist_active());
    assert_eq!(t.h.assist.cancelled(), 0);
}

#[test]
fn nudge_change_restarts_with_new_tracking() {
    let mut t = Harness::new();

    t.hold_driver(idle().with_button(Button::X).with_button(Button::LeftBumper));
    t.step();
    assert_eq!(
        t.core.arbitrator().active_tracking(),
        Some(TrackingType::new(TargetClass::Cargo, Nudge::Left))
    );
    let left = SimTargetLock::signal_for(TrackingType::new(TargetClass::Cargo, Nudge::Left));
    assert_eq!(t.h.drive_left.output(), left.left);
    assert_eq!(t.h.drive_right.output(), left.right);

    t.hold_driver(idle().with_button(Button::X).with_button(Button::RightBumper));
    t.step();
    assert_eq!(
        t.core.arbitrator().active_tracking(),
        Some(TrackingType::new(TargetClass::Cargo, Nudge::Right))
    );
    assert_eq!(t.h.assist.cancelled(), 1);
    assert_eq!(t.h.assist.started(), 2);
}

#[test]
fn completed_assist_returns_to_manual_without_cancel() {
    let mut t = Harness::from_robot(SimRobot::new().with_assist_completion(0.1));

    t.hold_driver(idle().with_button(Button::A));
    t.step();
    assert!(t.core.is_assist_active());
    t.run(10);
    assert!(!t.core.is_assist_active());
    assert_eq!(t.core.arbitrator().ownership().drivetrain, ControlSource::Manual);
    assert_eq!(t.h.assist.cancelled(), 0);
    assert_eq!(t.h.assist.started(), 1);
}

#[test]
fn simultaneous_triggers_pick_priority_and_flag_conflict() {
    let mut t = Harness::new();
    t.hold_driver(
        idle()
            .with_button(Button::A)
            .with_button(Button::B)
            .with_button(Button::X),
    );
    let faults = t.step();
    assert!(faults.arbitration.contains(SubsystemFault::ARBITRATION_CONFLICT));
    assert_eq!(
        t.core.arbitrator().active_tracking(),
        Some(TrackingType::new(TargetClass::Target, Nudge::Center))
    );
}

#[test]
fn drivetrain_has_exactly_one_owner_every_cycle() {
    let mut t = Harness::from_robot(SimRobot::new().with_assist_completion(0.2));
    let script = [
        idle(),
        idle().with_button(Button::A),
        idle().with_button(Button::A),
        idle().with_button(Button::A).with_axis(Axis::LeftY, 0.9),
        idle().with_button(Button::B),
        idle().with_button(Button::B).with_button(Button::RightBumper),
        idle().with_axis(Axis::RightX, 0.4),
        idle().with_button(Button::X),
    ];
    for snap in script {
        t.hold_driver(snap);
        for _ in 0..6 {
            t.step();
            let assist = t.core.is_assist_active();
            let owner = t.core.arbitrator().ownership().drivetrain;
            assert_eq!(owner == ControlSource::Assist, assist);
            assert_eq!(owner == ControlSource::Manual, !assist);
        }
    }
}

#[test]
fn mode_latch_persists_after_release() {
    let mut t = Harness::new();
    t.hold_operator(idle().with_button(Button::RightBumper));
    t.step();
    t.release();
    t.run(3);
    assert_eq!(
        t.core.arbitrator().mode(),
        teleop_common::state::GamePieceMode::Cargo
    );
    assert_eq!(t.h.telemetry.get("arbitration.game_piece"), Some(0.0));
}
