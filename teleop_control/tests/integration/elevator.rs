//! Elevator presets, open-loop fallback and gain scheduling.

use teleop_common::config::ElevatorConfig;
use teleop_common::input::{Axis, Button, ControllerSnapshot};
use teleop_common::state::{ElevatorPosition, ElevatorState, ElevatorTarget, GamePieceMode};

use super::Harness;

fn idle() -> ControllerSnapshot {
    ControllerSnapshot::neutral()
}

#[test]
fn top_button_reaches_hatch_top() {
    let mut t = Harness::with_plant();
    let up = ElevatorConfig::default().up_acceleration;
    let down = ElevatorConfig::default().down_acceleration;
    let top = ElevatorPosition::new(GamePieceMode::Hatch, ElevatorTarget::Top);

    t.hold_operator(idle().with_button(Button::Y));
    t.run(5);
    let elevator = &t.core.subsystems().elevator;
    assert_eq!(elevator.state(), ElevatorState::SetPosition);
    assert_eq!(elevator.set_point(), 35.0);
    assert_eq!(elevator.accel_limit(), up);
    assert!(!elevator.is_at_position(top));

    t.run(40);
    let elevator = &t.core.subsystems().elevator;
    assert!(elevator.is_at_position(top));
    assert!((t.h.elevator.position() - 35.0).abs() < 1e-9);
    // Holding at the target is not "moving up".
    assert_eq!(elevator.accel_limit(), down);
    assert_eq!(t.h.elevator.profile().map(|p| p.max_acceleration), Some(down));
}

#[test]
fn moving_down_uses_down_limit() {
    let mut t = Harness::new();
    t.step();
    t.h.elevator.set_position(40.0);

    t.hold_operator(idle().with_button(Button::Y));
    t.step();
    let elevator = &t.core.subsystems().elevator;
    assert_eq!(elevator.set_point(), 35.0);
    assert_eq!(elevator.accel_limit(), ElevatorConfig::default().down_acceleration);
    assert_eq!(t.h.elevator.target(), Some(35.0));
}

#[test]
fn releasing_preset_falls_back_to_open_loop() {
    let mut t = Harness::new();
    t.hold_operator(idle().with_button(Button::B));
    t.step();
    assert_eq!(t.core.subsystems().elevator.state(), ElevatorState::SetPosition);

    t.hold_operator(idle().with_axis(Axis::LeftY, -0.6));
    t.step();
    let elevator = &t.core.subsystems().elevator;
    assert_eq!(elevator.state(), ElevatorState::Normal);
    assert!(elevator.desired_power() > 0.0);
    assert_eq!(t.h.elevator.output(), elevator.desired_power());
    assert_eq!(t.h.elevator.target(), None);
}

#[test]
fn cargo_mode_uses_cargo_table() {
    let mut t = Harness::new();
    t.hold_operator(idle().with_button(Button::RightBumper));
    t.step();
    t.hold_operator(idle().with_button(Button::Y));
    t.step();
    assert_eq!(t.core.subsystems().elevator.set_point(), 45.0);

    t.hold_operator(idle().with_button(Button::X));
    t.step();
    assert_eq!(t.core.subsystems().elevator.set_point(), 17.0);
}

#[test]
fn hatch_loading_station_falls_back_to_bottom() {
    let mut t = Harness::new();
    t.hold_operator(idle().with_button(Button::X));
    t.step();
    let elevator = &t.core.subsystems().elevator;
    assert_eq!(
        elevator.desired_position(),
        ElevatorPosition::new(GamePieceMode::Hatch, ElevatorTarget::LoadingStation)
    );
    assert_eq!(elevator.set_point(), 1.0);
}

#[test]
fn ground_button_goes_to_handoff_height_in_any_mode() {
    let mut t = Harness::new();
    t.hold_operator(idle().with_button(Button::RightBumper));
    t.step();
    t.hold_operator(idle().with_button(Button::Back));
    t.step();
    let elevator = &t.core.subsystems().elevator;
    assert_eq!(
        elevator.desired_position(),
        ElevatorPosition::new(GamePieceMode::Hatch, ElevatorTarget::Bottom)
    );
    assert_eq!(elevator.set_point(), 1.0);
}

#[test]
fn zeroes_once_after_mode_init() {
    let mut t = Harness::new();
    t.run(5);
    assert_eq!(t.h.elevator.zero_count(), 1);

    t.core.on_mode_init(t.now());
    t.run(2);
    assert_eq!(t.h.elevator.zero_count(), 2);
}

#[test]
fn implausible_position_is_reported_and_last_value_kept() {
    let mut t = Harness::new();
    t.step();
    t.h.elevator.set_position(12.0);
    t.step();
    t.h.elevator.set_position(f64::NAN);
    let faults = t.step();
    assert!(
        faults
            .elevator
            .contains(teleop_common::error::SubsystemFault::SENSOR_IMPLAUSIBLE)
    );
    assert_eq!(t.core.subsystems().elevator.position(), 12.0);
    assert_eq!(t.h.telemetry.get("elevator.position"), Some(12.0));
}
