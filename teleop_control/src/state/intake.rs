//! Ground intake: wrist + roller + geometry solenoid.
//!
//! One desired state drives all three outputs. The ground states first
//! swing the wrist down; the solenoid and roller only follow once the
//! measured wrist angle has crossed the transit bound. HANDOFF and STOWED
//! apply all three at once.

use teleop_common::config::IntakeConfig;
use teleop_common::error::SubsystemFault;
use teleop_common::hal::{DigitalOutput, MotorController, TelemetrySink};
use teleop_common::state::{IntakeState, RollerState, SolenoidState, WristState};
use tracing::{debug, warn};

use super::{Subsystem, flag};

pub struct Intake {
    config: IntakeConfig,
    wrist: Box<dyn MotorController>,
    roller: Box<dyn MotorController>,
    solenoid: Box<dyn DigitalOutput>,
    desired: IntakeState,
    wrist_state: WristState,
    roller_state: RollerState,
    solenoid_state: SolenoidState,
    wrist_angle: f64,
    angle_plausible: bool,
    roller_current: f64,
    /// When the wrist was first commanded to GROUND without crossing the bound.
    ground_since: Option<f64>,
    arrival_warned: bool,
    faults: SubsystemFault,
}

impl Intake {
    pub fn new(
        config: IntakeConfig,
        wrist: Box<dyn MotorController>,
        roller: Box<dyn MotorController>,
        solenoid: Box<dyn DigitalOutput>,
    ) -> Self {
        Self {
            config,
            wrist,
            roller,
            solenoid,
            desired: IntakeState::Stowed,
            wrist_state: WristState::Stowed,
            roller_state: RollerState::Stopped,
            solenoid_state: SolenoidState::Hatch,
            wrist_angle: 0.0,
            angle_plausible: true,
            roller_current: 0.0,
            ground_since: None,
            arrival_warned: false,
            faults: SubsystemFault::empty(),
        }
    }

    // ─── Commands ───────────────────────────────────────────────────

    pub fn set_desired_state(&mut self, state: IntakeState) {
        if state != self.desired {
            debug!("Intake desired {:?} -> {:?}", self.desired, state);
            self.desired = state;
        }
    }

    #[inline]
    pub fn command_ground_hatch(&mut self) {
        self.set_desired_state(IntakeState::GroundHatch);
    }

    #[inline]
    pub fn command_ground_cargo(&mut self) {
        self.set_desired_state(IntakeState::GroundCargo);
    }

    #[inline]
    pub fn command_handoff(&mut self) {
        self.set_desired_state(IntakeState::Handoff);
    }

    #[inline]
    pub fn command_stowed(&mut self) {
        self.set_desired_state(IntakeState::Stowed);
    }

    // ─── Queries ────────────────────────────────────────────────────

    /// Last-commanded wrist preset equals `wrist`.
    #[inline]
    pub fn is_at_position(&self, wrist: WristState) -> bool {
        self.wrist_state == wrist
    }

    #[inline]
    pub fn desired_state(&self) -> IntakeState {
        self.desired
    }

    #[inline]
    pub fn wrist_state(&self) -> WristState {
        self.wrist_state
    }

    #[inline]
    pub fn roller_state(&self) -> RollerState {
        self.roller_state
    }

    #[inline]
    pub fn solenoid_state(&self) -> SolenoidState {
        self.solenoid_state
    }

    #[inline]
    pub fn wrist_angle(&self) -> f64 {
        self.wrist_angle
    }

    /// Measured wrist angle has crossed into the ground region.
    fn past_bound(&self) -> bool {
        self.angle_plausible && self.wrist_angle >= self.config.wrist_bound
    }

    fn ground(&mut self, now: f64, solenoid: SolenoidState, roller: RollerState) {
        self.wrist_state = WristState::Ground;
        if self.past_bound() {
            self.ground_since = None;
            self.arrival_warned = false;
            self.solenoid_state = solenoid;
            self.roller_state = roller;
            return;
        }

        // Still in transit: no pickup power below the bound.
        if matches!(self.roller_state, RollerState::Hatch | RollerState::Cargo) {
            self.roller_state = RollerState::Stopped;
        }
        let since = *self.ground_since.get_or_insert(now);
        if now - since >= self.config.wrist_not_arriving_after {
            self.faults |= SubsystemFault::WRIST_NOT_ARRIVING;
            if !self.arrival_warned {
                warn!(
                    "Wrist has not crossed {}° after {:.2}s (angle {})",
                    self.config.wrist_bound,
                    now - since,
                    self.wrist_angle
                );
                self.arrival_warned = true;
            }
        }
    }

    fn direct(&mut self, wrist: WristState, roller: RollerState) {
        self.ground_since = None;
        self.arrival_warned = false;
        self.solenoid_state = SolenoidState::Hatch;
        self.roller_state = roller;
        self.wrist_state = wrist;
    }

    fn write_outputs(&mut self) {
        let angle = self.config.wrist_angles.angle(self.wrist_state);
        self.wrist
            .set_closed_loop_target(angle, &self.config.wrist_profile);
        self.solenoid
            .set_digital_output(self.solenoid_state.extended());
        self.roller
            .set_open_loop_output(self.config.roller_powers.power(self.roller_state));
    }
}

impl Subsystem for Intake {
    fn name(&self) -> &'static str {
        "intake"
    }

    fn on_mode_init(&mut self, _now: f64) {
        self.desired = IntakeState::Stowed;
        self.wrist_state = WristState::Stowed;
        self.roller_state = RollerState::Stopped;
        self.solenoid_state = SolenoidState::Hatch;
        self.ground_since = None;
        self.arrival_warned = false;
    }

    fn on_sample_inputs(&mut self, _now: f64) {
        self.faults = SubsystemFault::empty();
        let angle = self.wrist.position();
        self.angle_plausible = angle.is_finite();
        if self.angle_plausible {
            self.wrist_angle = angle;
        } else {
            warn!("Wrist angle not finite");
            self.faults |= SubsystemFault::SENSOR_IMPLAUSIBLE;
        }
        self.roller_current = self.roller.current();
    }

    fn on_update(&mut self, now: f64) {
        match self.desired {
            IntakeState::GroundHatch => self.ground(now, SolenoidState::Hatch, RollerState::Hatch),
            IntakeState::GroundCargo => self.ground(now, SolenoidState::Cargo, RollerState::Cargo),
            IntakeState::Handoff => self.direct(WristState::Handoff, RollerState::Hold),
            IntakeState::Stowed => self.direct(WristState::Stowed, RollerState::Stopped),
        }
        self.write_outputs();
    }

    fn on_publish_telemetry(&self, sink: &mut dyn TelemetrySink) {
        sink.publish("intake.desired_state", self.desired as u8 as f64);
        sink.publish("intake.wrist_state", self.wrist_state as u8 as f64);
        sink.publish("intake.wrist_angle", self.wrist_angle);
        sink.publish(
            "intake.roller_power",
            self.config.roller_powers.power(self.roller_state),
        );
        sink.publish("intake.roller_current", self.roller_current);
        sink.publish("intake.solenoid_extended", flag(self.solenoid_state.extended()));
        sink.publish("intake.faults", self.faults.bits() as f64);
    }

    fn on_shutdown(&mut self, _now: f64) {
        self.roller_state = RollerState::Stopped;
        self.roller.set_open_loop_output(0.0);
    }

    fn faults(&self) -> SubsystemFault {
        self.faults
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{SimMotor, SimMotorHandle, SimSolenoid, SimSolenoidHandle};

    struct Rig {
        intake: Intake,
        wrist: SimMotorHandle,
        roller: SimMotorHandle,
        solenoid: SimSolenoidHandle,
    }

    fn rig() -> Rig {
        let (w, wrist) = SimMotor::new();
        let (r, roller) = SimMotor::new();
        let (s, solenoid) = SimSolenoid::new();
        Rig {
            intake: Intake::new(IntakeConfig::default(), Box::new(w), Box::new(r), Box::new(s)),
            wrist,
            roller,
            solenoid,
        }
    }

    impl Rig {
        fn step(&mut self, now: f64) {
            self.intake.on_sample_inputs(now);
            self.intake.on_update(now);
        }
    }

    #[test]
    fn stowed_by_default_and_outputs_written() {
        let mut r = rig();
        r.step(0.0);
        assert_eq!(r.wrist.target(), Some(0.0));
        assert_eq!(r.roller.output(), 0.0);
        assert!(!r.solenoid.level());
        assert!(r.solenoid.writes() > 0);
        assert!(r.intake.is_at_position(WristState::Stowed));
    }

    #[test]
    fn ground_cargo_waits_for_bound() {
        let mut r = rig();
        r.intake.command_ground_cargo();

        r.wrist.set_position(30.0);
        r.step(0.0);
        assert_eq!(r.wrist.target(), Some(90.0));
        assert!(r.intake.is_at_position(WristState::Ground));
        assert_eq!(r.intake.roller_state(), RollerState::Stopped);
        assert_eq!(r.roller.output(), 0.0);
        assert!(!r.solenoid.level());

        r.wrist.set_position(75.0);
        r.step(0.02);
        assert_eq!(r.intake.solenoid_state(), SolenoidState::Cargo);
        assert!(r.solenoid.level());
        assert_eq!(r.roller.output(), 0.8);
    }

    #[test]
    fn ground_hatch_after_bound() {
        let mut r = rig();
        r.intake.command_ground_hatch();
        r.wrist.set_position(88.0);
        r.step(0.0);
        assert_eq!(r.intake.roller_state(), RollerState::Hatch);
        assert_eq!(r.roller.output(), 0.5);
        assert!(!r.solenoid.level());
    }

    #[test]
    fn pickup_power_dropped_when_wrist_falls_back_below_bound() {
        let mut r = rig();
        r.intake.command_ground_cargo();
        r.wrist.set_position(80.0);
        r.step(0.0);
        assert_eq!(r.roller.output(), 0.8);

        r.wrist.set_position(60.0);
        r.step(0.02);
        assert_eq!(r.roller.output(), 0.0);
        // Solenoid keeps its last value.
        assert!(r.solenoid.level());
    }

    #[test]
    fn non_finite_angle_is_below_bound() {
        let mut r = rig();
        r.intake.command_ground_cargo();
        r.wrist.set_position(f64::NAN);
        r.step(0.0);
        assert_eq!(r.roller.output(), 0.0);
        assert!(r.intake.faults().contains(SubsystemFault::SENSOR_IMPLAUSIBLE));
        assert_eq!(r.wrist.target(), Some(90.0));
    }

    #[test]
    fn handoff_and_stowed_are_direct() {
        let mut r = rig();
        r.intake.command_handoff();
        r.step(0.0);
        assert_eq!(r.wrist.target(), Some(45.0));
        assert_eq!(r.roller.output(), 0.1);
        assert!(!r.solenoid.level());
        assert!(r.intake.is_at_position(WristState::Handoff));

        r.intake.command_stowed();
        r.step(0.02);
        assert_eq!(r.wrist.target(), Some(0.0));
        assert_eq!(r.roller.output(), 0.0);
    }

    #[test]
    fn wrist_not_arriving_raised_after_interval() {
        let mut r = rig();
        r.intake.command_ground_hatch();
        r.wrist.set_position(10.0);
        r.step(0.0);
        r.step(1.0);
        assert!(!r.intake.faults().contains(SubsystemFault::WRIST_NOT_ARRIVING));
        r.step(2.0);
        assert!(r.intake.faults().contains(SubsystemFault::WRIST_NOT_ARRIVING));
        // Keeps commanding the same target.
        assert_eq!(r.wrist.target(), Some(90.0));

        r.wrist.set_position(80.0);
        r.step(2.02);
        assert!(r.intake.faults().is_empty());
    }

    #[test]
    fn mode_init_resets() {
        let mut r = rig();
        r.intake.command_ground_cargo();
        r.wrist.set_position(90.0);
        r.step(0.0);
        r.intake.on_mode_init(1.0);
        assert_eq!(r.intake.desired_state(), IntakeState::Stowed);
        assert_eq!(r.intake.solenoid_state(), SolenoidState::Hatch);
        assert_eq!(r.intake.roller_state(), RollerState::Stopped);
        assert_eq!(r.intake.wrist_state(), WristState::Stowed);
    }

    #[test]
    fn shutdown_stops_roller() {
        let mut r = rig();
        r.intake.command_handoff();
        r.step(0.0);
        r.intake.on_shutdown(0.02);
        assert_eq!(r.roller.output(), 0.0);
    }
}
