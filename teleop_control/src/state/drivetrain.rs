//! Drivetrain: NEUTRAL ↔ OPEN_LOOP.
//!
//! The drive signal is a single-cycle request. Whoever owns the
//! drivetrain writes it during arbitration; `on_update` consumes it. A
//! cycle without a fresh signal writes neutral (0, 0, BRAKE).

use teleop_common::command::{DriveSignal, NeutralMode};
use teleop_common::error::SubsystemFault;
use teleop_common::hal::{MotorController, TelemetrySink};
use teleop_common::state::DrivetrainState;
use tracing::{debug, warn};

use super::{Subsystem, finite_clamp};

/// Left/right percent-output drivetrain with distance feedback.
pub struct Drivetrain {
    left: Box<dyn MotorController>,
    right: Box<dyn MotorController>,
    state: DrivetrainState,
    pending: Option<DriveSignal>,
    applied: DriveSignal,
    left_distance: f64,
    right_distance: f64,
    faults: SubsystemFault,
}

impl Drivetrain {
    pub fn new(left: Box<dyn MotorController>, right: Box<dyn MotorController>) -> Self {
        Self {
            left,
            right,
            state: DrivetrainState::Neutral,
            pending: None,
            applied: DriveSignal::NEUTRAL,
            left_distance: 0.0,
            right_distance: 0.0,
            faults: SubsystemFault::empty(),
        }
    }

    /// Request a signal for this cycle. A later call in the same cycle
    /// replaces an earlier one.
    #[inline]
    pub fn set_drive_signal(&mut self, signal: DriveSignal) {
        self.pending = Some(signal);
    }

    #[inline]
    pub fn state(&self) -> DrivetrainState {
        self.state
    }

    /// Signal written by the last update.
    #[inline]
    pub fn applied(&self) -> DriveSignal {
        self.applied
    }

    /// Mean of left and right traveled distance.
    #[inline]
    pub fn average_distance(&self) -> f64 {
        (self.left_distance + self.right_distance) / 2.0
    }

    fn write(&mut self, signal: DriveSignal) {
        self.left.set_neutral_mode(signal.neutral_mode);
        self.right.set_neutral_mode(signal.neutral_mode);
        self.left.set_open_loop_output(signal.left);
        self.right.set_open_loop_output(signal.right);
        self.applied = signal;
    }
}

/// Reads one side's distance, keeping the last plausible value.
fn read_distance(motor: &dyn MotorController, last: &mut f64) -> bool {
    let d = motor.position();
    if d.is_finite() {
        *last = d;
        true
    } else {
        false
    }
}

impl Subsystem for Drivetrain {
    fn name(&self) -> &'static str {
        "drivetrain"
    }

    fn on_mode_init(&mut self, _now: f64) {
        self.pending = None;
        self.state = DrivetrainState::Neutral;
        self.applied = DriveSignal::NEUTRAL;
    }

    fn on_sample_inputs(&mut self, _now: f64) {
        self.faults = SubsystemFault::empty();
        let left_ok = read_distance(self.left.as_ref(), &mut self.left_distance);
        let right_ok = read_distance(self.right.as_ref(), &mut self.right_distance);
        if !(left_ok && right_ok) {
            warn!("Drivetrain distance feedback not finite, keeping last value");
            self.faults |= SubsystemFault::SENSOR_IMPLAUSIBLE;
        }
    }

    fn on_update(&mut self, _now: f64) {
        let next = match self.pending.take() {
            Some(signal) => {
                let sanitized = DriveSignal::new(
                    finite_clamp(signal.left, -1.0, 1.0),
                    finite_clamp(signal.right, -1.0, 1.0),
                    signal.neutral_mode,
                );
                (DrivetrainState::OpenLoop, sanitized)
            }
            None => (DrivetrainState::Neutral, DriveSignal::NEUTRAL),
        };
        if next.0 != self.state {
            debug!("Drivetrain {:?} -> {:?}", self.state, next.0);
        }
        self.state = next.0;
        self.write(next.1);
    }

    fn on_publish_telemetry(&self, sink: &mut dyn TelemetrySink) {
        sink.publish("drivetrain.state", self.state as u8 as f64);
        sink.publish("drivetrain.left_output", self.applied.left);
        sink.publish("drivetrain.right_output", self.applied.right);
        sink.publish("drivetrain.left_distance", self.left_distance);
        sink.publish("drivetrain.right_distance", self.right_distance);
        sink.publish("drivetrain.faults", self.faults.bits() as f64);
    }

    fn on_shutdown(&mut self, _now: f64) {
        self.pending = None;
        self.write(DriveSignal::new(0.0, 0.0, NeutralMode::Brake));
        self.state = DrivetrainState::Neutral;
    }

    fn faults(&self) -> SubsystemFault {
        self.faults
    }
}
