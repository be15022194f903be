//! Elevator: NORMAL / STOP / SET_POSITION.
//!
//! - NORMAL: open-loop power, clamped to the configured range.
//! - STOP: zero output, the carriage holds by inaction.
//! - SET_POSITION: closed loop to a named target resolved through the
//!   per-mode target table, with acceleration gain scheduling (faster
//!   limit going up than going down).
//!
//! The position sensor is zeroed on the first update after power-on or
//! `on_mode_init`. `stop()` is a one-cycle request: while in SET_POSITION
//! the next update targets the measured position instead of the named one.

use teleop_common::config::ElevatorConfig;
use teleop_common::error::SubsystemFault;
use teleop_common::hal::{MotorController, TelemetrySink};
use teleop_common::state::{ElevatorPosition, ElevatorState};
use tracing::{debug, error, warn};

use super::{Subsystem, finite_clamp, flag};

pub struct Elevator {
    config: ElevatorConfig,
    motor: Box<dyn MotorController>,
    state: ElevatorState,
    desired: ElevatorPosition,
    desired_power: f64,
    set_point: f64,
    /// One-cycle hold request.
    stop_requested: bool,
    /// Zero the sensor on the next update.
    zero_pending: bool,
    measured: f64,
    current: f64,
    accel_limit: f64,
    faults: SubsystemFault,
}

impl Elevator {
    pub fn new(config: ElevatorConfig, motor: Box<dyn MotorController>) -> Self {
        let accel_limit = config.down_acceleration;
        Self {
            config,
            motor,
            state: ElevatorState::Stop,
            desired: ElevatorPosition::default(),
            desired_power: 0.0,
            set_point: 0.0,
            stop_requested: false,
            zero_pending: true,
            measured: 0.0,
            current: 0.0,
            accel_limit,
            faults: SubsystemFault::empty(),
        }
    }

    // ─── Commands ───────────────────────────────────────────────────

    /// Open-loop power. Enters NORMAL.
    pub fn set_desired_power(&mut self, power: f64) {
        self.desired_power = finite_clamp(
            power,
            self.config.open_loop_min_power,
            self.config.open_loop_max_power,
        );
        self.enter(ElevatorState::Normal);
    }

    /// Closed loop to a named target. Enters SET_POSITION.
    pub fn set_desired_position(&mut self, position: ElevatorPosition) {
        self.desired = position;
        self.enter(ElevatorState::SetPosition);
    }

    /// Hold at the measured position for the next update.
    #[inline]
    pub fn stop(&mut self) {
        self.stop_requested = true;
    }

    fn enter(&mut self, next: ElevatorState) {
        if next != self.state {
            debug!("Elevator {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }

    // ─── Queries ────────────────────────────────────────────────────

    /// In SET_POSITION and within tolerance of `position`.
    pub fn is_at_position(&self, position: ElevatorPosition) -> bool {
        if self.state != ElevatorState::SetPosition {
            return false;
        }
        self.config
            .lookup(position.mode, position.target)
            .is_some_and(|p| (p - self.measured).abs() <= self.config.tolerance)
    }

    /// Measured current above the warning threshold.
    #[inline]
    pub fn is_current_limiting(&self) -> bool {
        self.current > self.config.warn_current
    }

    #[inline]
    pub fn state(&self) -> ElevatorState {
        self.state
    }

    #[inline]
    pub fn desired_position(&self) -> ElevatorPosition {
        self.desired
    }

    #[inline]
    pub fn desired_power(&self) -> f64 {
        self.desired_power
    }

    #[inline]
    pub fn set_point(&self) -> f64 {
        self.set_point
    }

    #[inline]
    pub fn position(&self) -> f64 {
        self.measured
    }

    /// Acceleration limit sent with the last closed-loop command.
    #[inline]
    pub fn accel_limit(&self) -> f64 {
        self.accel_limit
    }

    fn update_set_position(&mut self) {
        let target = if self.stop_requested {
            Some(self.measured)
        } else {
            self.config.lookup(self.desired.mode, self.desired.target)
        };

        let Some(set_point) = target else {
            error!(
                "Elevator target {:?} has no position, stopping",
                self.desired
            );
            self.faults |= SubsystemFault::UNREACHABLE_STATE;
            self.motor.set_open_loop_output(0.0);
            self.enter(ElevatorState::Stop);
            return;
        };

        self.set_point = set_point;
        self.desired_power = 0.0;
        self.accel_limit = if set_point > self.measured {
            self.config.up_acceleration
        } else {
            self.config.down_acceleration
        };
        let profile = self.config.profile.with_acceleration(self.accel_limit);
        self.motor.set_closed_loop_target(set_point, &profile);
    }
}

impl Subsystem for Elevator {
    fn name(&self) -> &'static str {
        "elevator"
    }

    fn on_mode_init(&mut self, _now: f64) {
        self.zero_pending = true;
        self.stop_requested = false;
        self.desired = ElevatorPosition::default();
        self.desired_power = 0.0;
        self.enter(ElevatorState::Stop);
    }

    fn on_sample_inputs(&mut self, _now: f64) {
        self.faults = SubsystemFault::empty();
        let position = self.motor.position();
        if position.is_finite() {
            self.measured = position;
        } else {
            warn!("Elevator position not finite, keeping {}", self.measured);
            self.faults |= SubsystemFault::SENSOR_IMPLAUSIBLE;
        }
        self.current = self.motor.current();
    }

    fn on_update(&mut self, _now: f64) {
        if self.zero_pending {
            self.motor.zero_position();
            self.measured = 0.0;
            self.zero_pending = false;
            debug!("Elevator position zeroed");
        }

        match self.state {
            ElevatorState::Normal => self.motor.set_open_loop_output(self.desired_power),
            ElevatorState::Stop => {
                self.desired_power = 0.0;
                self.motor.set_open_loop_output(0.0);
            }
            ElevatorState::SetPosition => self.update_set_position(),
        }

        self.stop_requested = false;
    }

    fn on_publish_telemetry(&self, sink: &mut dyn TelemetrySink) {
        sink.publish("elevator.state", self.state as u8 as f64);
        sink.publish("elevator.desired_power", self.desired_power);
        sink.publish("elevator.set_point", self.set_point);
        sink.publish("elevator.position", self.measured);
        sink.publish("elevator.current", self.current);
        sink.publish("elevator.current_limiting", flag(self.is_current_limiting()));
        sink.publish("elevator.accel_limit", self.accel_limit);
        sink.publish("elevator.target", self.desired.target as u8 as f64);
        sink.publish("elevator.faults", self.faults.bits() as f64);
    }

    fn on_shutdown(&mut self, _now: f64) {
        self.desired_power = 0.0;
        self.motor.set_open_loop_output(0.0);
        self.enter(ElevatorState::Stop);
    }

    fn faults(&self) -> SubsystemFault {
        self.faults
    }
}
