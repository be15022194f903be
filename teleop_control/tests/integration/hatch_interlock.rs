//! Hatch flower: debounced possession and the backup-distance interlock.

use teleop_common::config::HatchFlowerConfig;
use teleop_common::input::{Axis, Button, ControllerSnapshot};
use teleop_common::state::{ExtensionState, GrabberState};

use super::Harness;

fn idle() -> ControllerSnapshot {
    ControllerSnapshot::neutral()
}

#[test]
fn has_hatch_needs_debounce_and_drops_on_release() {
    let mut t = Harness::new();
    t.step();

    t.h.hatch_switch.set(true);
    t.run(5); // 0.08 s held
    assert!(!t.core.subsystems().hatch_flower.has_hatch());

    t.run(15); // 0.38 s held
    assert!(t.core.subsystems().hatch_flower.has_hatch());
    assert_eq!(t.h.telemetry.get("hatch_flower.has_hatch"), Some(1.0));

    t.h.hatch_switch.set(false);
    t.step();
    assert!(!t.core.subsystems().hatch_flower.has_hatch());
}

#[test]
fn flicker_restarts_debounce() {
    let mut t = Harness::new();
    for _ in 0..4 {
        t.h.hatch_switch.set(true);
        t.run(8);
        t.h.hatch_switch.set(false);
        t.step();
        assert!(!t.core.subsystems().hatch_flower.has_hatch());
    }
}

#[test]
fn retract_is_safe_only_after_backing_up() {
    let mut t = Harness::new();
    let backup = HatchFlowerConfig::default().backup_distance;
    t.h.set_drive_distance(10.0);
    t.step();

    // Driver pushes the hatch onto the port.
    t.hold_driver(idle().with_button(Button::Start));
    t.step();
    t.release();
    let flower = &t.core.subsystems().hatch_flower;
    assert_eq!(flower.grabber(), GrabberState::Release);
    assert!(!flower.is_hatch_grabber_safe_to_retract());

    t.h.set_drive_distance(10.0 - backup / 2.0);
    t.step();
    assert!(!t.core.subsystems().hatch_flower.is_hatch_grabber_safe_to_retract());

    t.h.set_drive_distance(10.0 - backup - 0.5);
    t.step();
    assert!(t.core.subsystems().hatch_flower.is_hatch_grabber_safe_to_retract());
    // Still released: nothing asked for a grab.
    assert_eq!(t.core.subsystems().hatch_flower.grabber(), GrabberState::Release);
}

#[test]
fn driving_forward_never_makes_retract_safe() {
    let mut t = Harness::new();
    t.hold_driver(idle().with_button(Button::Start));
    t.step();
    t.release();
    t.h.set_drive_distance(20.0);
    t.run(3);
    assert!(!t.core.subsystems().hatch_flower.is_hatch_grabber_safe_to_retract());
}

#[test]
fn capture_beats_push() {
    let mut t = Harness::new();
    t.hold_driver(idle().with_button(Button::Back).with_button(Button::Start));
    t.step();
    assert_eq!(t.core.subsystems().hatch_flower.grabber(), GrabberState::Grab);
}

#[test]
fn operator_score_in_hatch_mode_releases() {
    let mut t = Harness::new();
    t.hold_operator(idle().with_axis(Axis::LeftTrigger, 1.0));
    t.step();
    assert_eq!(t.core.subsystems().hatch_flower.grabber(), GrabberState::Release);

    // Loading-station acquire grabs again.
    t.hold_operator(idle().with_axis(Axis::RightTrigger, 1.0));
    t.step();
    assert_eq!(t.core.subsystems().hatch_flower.grabber(), GrabberState::Grab);
}

#[test]
fn extension_follows_game_piece_mode() {
    let mut t = Harness::new();
    t.step();
    assert_eq!(t.core.subsystems().hatch_flower.extension(), ExtensionState::Down);
    let down_level = t.h.extend_solenoid.level();

    t.hold_operator(idle().with_button(Button::RightBumper));
    t.step();
    assert_eq!(t.core.subsystems().hatch_flower.extension(), ExtensionState::Up);
    assert_ne!(t.h.extend_solenoid.level(), down_level);
}
