//! Subsystem state machines.
//!
//! One explicitly owned instance per physical subsystem, constructed once
//! at startup and driven by the [`ControlCore`](crate::cycle::ControlCore)
//! through the [`Subsystem`] hooks in a fixed order every cycle.

pub mod drivetrain;
pub mod elevator;
pub mod hatch_flower;
pub mod intake;

use teleop_common::error::{FaultState, SubsystemFault};
use teleop_common::hal::TelemetrySink;

pub use drivetrain::Drivetrain;
pub use elevator::Elevator;
pub use hatch_flower::HatchFlower;
pub use intake::Intake;

/// Lifecycle hooks shared by every subsystem.
///
/// Per cycle: `on_sample_inputs` → (arbitration writes setpoints) →
/// `on_update` → `on_publish_telemetry`. Faults are cleared at sampling
/// and accumulate until the next sample.
pub trait Subsystem {
    /// Telemetry key prefix.
    fn name(&self) -> &'static str;

    /// Reset to the power-on configuration at the start of a match phase.
    fn on_mode_init(&mut self, now: f64);

    /// Read sensors for this cycle.
    fn on_sample_inputs(&mut self, now: f64);

    /// Compute and write actuator outputs.
    fn on_update(&mut self, now: f64);

    fn on_publish_telemetry(&self, sink: &mut dyn TelemetrySink);

    /// Leave every actuator at zero output.
    fn on_shutdown(&mut self, now: f64);

    /// Faults raised since the last sample.
    fn faults(&self) -> SubsystemFault;
}

/// The four subsystems, in update order.
pub struct Subsystems {
    pub drivetrain: Drivetrain,
    pub elevator: Elevator,
    pub intake: Intake,
    pub hatch_flower: HatchFlower,
}

impl Subsystems {
    /// Mutable hook access in update order.
    pub fn in_order_mut(&mut self) -> [&mut dyn Subsystem; 4] {
        [
            &mut self.drivetrain,
            &mut self.elevator,
            &mut self.intake,
            &mut self.hatch_flower,
        ]
    }

    /// Shared hook access in update order.
    pub fn in_order(&self) -> [&dyn Subsystem; 4] {
        [&self.drivetrain, &self.elevator, &self.intake, &self.hatch_flower]
    }

    /// Copy every subsystem's faults into `state`.
    pub fn collect_faults(&self, state: &mut FaultState) {
        state.drivetrain = self.drivetrain.faults();
        state.elevator = self.elevator.faults();
        state.intake = self.intake.faults();
        state.hatch_flower = self.hatch_flower.faults();
    }
}

/// Clamp a computed output, mapping non-finite values to zero.
#[inline]
pub(crate) fn finite_clamp(value: f64, min: f64, max: f64) -> f64 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        0.0
    }
}

/// Boolean as a telemetry value.
#[inline]
pub(crate) fn flag(value: bool) -> f64 {
    if value { 1.0 } else { 0.0 }
}
