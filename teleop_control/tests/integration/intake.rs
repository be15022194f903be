//! Ground pickup with the wrist transit interlock.

use teleop_common::config::IntakeConfig;
use teleop_common::error::SubsystemFault;
use teleop_common::input::{Axis, Button, ControllerSnapshot};
use teleop_common::state::{IntakeState, RollerState, SolenoidState, WristState};

use super::Harness;

fn idle() -> ControllerSnapshot {
    ControllerSnapshot::neutral()
}

fn select(t: &mut Harness, snap: ControllerSnapshot) {
    t.hold_operator(snap);
    t.step();
}

fn acquire() -> ControllerSnapshot {
    idle().with_axis(Axis::RightTrigger, 1.0)
}

#[test]
fn ground_cargo_waits_for_wrist_before_rollers() {
    let mut t = Harness::with_plant();
    let cfg = IntakeConfig::default();
    select(&mut t, idle().with_button(Button::RightBumper).with_button(Button::DpadDown));

    t.hold_operator(acquire());
    let mut saw_power = false;
    for _ in 0..20 {
        t.step();
        let intake = &t.core.subsystems().intake;
        assert_eq!(intake.desired_state(), IntakeState::GroundCargo);
        assert_eq!(intake.wrist_state(), WristState::Ground);
        if intake.wrist_angle() < cfg.wrist_bound {
            assert_eq!(t.h.roller.output(), 0.0, "angle {}", intake.wrist_angle());
        }
        saw_power |= t.h.roller.output() != 0.0;
    }
    assert!(saw_power);

    let intake = &t.core.subsystems().intake;
    assert_eq!(intake.roller_state(), RollerState::Cargo);
    assert_eq!(intake.solenoid_state(), SolenoidState::Cargo);
    assert_eq!(t.h.roller.output(), cfg.roller_powers.cargo);
    assert_eq!(t.h.intake_solenoid.level(), SolenoidState::Cargo.extended());
    assert_eq!(t.h.wrist.target(), Some(cfg.wrist_angles.ground));
}

#[test]
fn releasing_acquire_stows() {
    let mut t = Harness::with_plant();
    select(&mut t, idle().with_button(Button::DpadDown));
    t.hold_operator(acquire());
    t.run(15);
    assert_eq!(t.core.subsystems().intake.roller_state(), RollerState::Hatch);

    t.release();
    t.step();
    let intake = &t.core.subsystems().intake;
    assert_eq!(intake.desired_state(), IntakeState::Stowed);
    assert_eq!(intake.roller_state(), RollerState::Stopped);
    assert_eq!(intake.solenoid_state(), SolenoidState::Hatch);
    assert_eq!(t.h.roller.output(), 0.0);
    assert_eq!(t.h.wrist.target(), Some(0.0));
}

#[test]
fn acquire_at_loading_station_leaves_intake_stowed() {
    let mut t = Harness::new();
    select(&mut t, idle().with_button(Button::DpadUp));
    t.hold_operator(acquire());
    t.run(3);
    assert_eq!(t.core.subsystems().intake.desired_state(), IntakeState::Stowed);
}

#[test]
fn stuck_wrist_raises_not_arriving() {
    let mut t = Harness::new();
    select(&mut t, idle().with_button(Button::DpadDown));
    t.hold_operator(acquire());

    let early = t.run(50);
    assert!(!early.intake.contains(SubsystemFault::WRIST_NOT_ARRIVING));

    let late = t.run(75);
    assert!(late.intake.contains(SubsystemFault::WRIST_NOT_ARRIVING));
    assert_eq!(t.h.roller.output(), 0.0);
    assert!(t.h.telemetry.get("intake.faults").is_some_and(|f| f > 0.0));
}

#[test]
fn implausible_wrist_angle_keeps_rollers_off() {
    let mut t = Harness::new();
    select(&mut t, idle().with_button(Button::DpadDown));
    t.h.wrist.set_position(f64::NAN);
    t.hold_operator(acquire());
    let faults = t.run(5);
    assert!(faults.intake.contains(SubsystemFault::SENSOR_IMPLAUSIBLE));
    assert_eq!(t.h.roller.output(), 0.0);
}
