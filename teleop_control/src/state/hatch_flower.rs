//! Hatch flower: grabber fingers and extension, two independent binary
//! solenoids, plus a debounced hatch switch.
//!
//! Releasing a hatch records the drivetrain's average distance; the
//! grabber is safe to retract once the robot has backed away from the
//! scoring station by the configured distance.

use teleop_common::config::HatchFlowerConfig;
use teleop_common::error::SubsystemFault;
use teleop_common::hal::{DigitalInput, DigitalOutput, TelemetrySink};
use teleop_common::state::{ExtensionState, GrabberState};
use tracing::{debug, warn};

use super::{Subsystem, flag};
use crate::control::debounce::Debouncer;

pub struct HatchFlower {
    config: HatchFlowerConfig,
    grab: Box<dyn DigitalOutput>,
    extend: Box<dyn DigitalOutput>,
    switch: Box<dyn DigitalInput>,
    grabber: GrabberState,
    extension: ExtensionState,
    debounce: Debouncer,
    drive_distance: f64,
    released_at: f64,
    faults: SubsystemFault,
}

impl HatchFlower {
    pub fn new(
        config: HatchFlowerConfig,
        grab: Box<dyn DigitalOutput>,
        extend: Box<dyn DigitalOutput>,
        switch: Box<dyn DigitalInput>,
    ) -> Self {
        let debounce = Debouncer::new(config.switch_debounce);
        let mut flower = Self {
            config,
            grab,
            extend,
            switch,
            grabber: GrabberState::Grab,
            extension: ExtensionState::Down,
            debounce,
            drive_distance: 0.0,
            released_at: 0.0,
            faults: SubsystemFault::empty(),
        };
        // Power on holding whatever was preloaded.
        flower.write_outputs();
        flower
    }

    // ─── Commands ───────────────────────────────────────────────────

    #[inline]
    pub fn capture_hatch(&mut self) {
        self.set_grabber(GrabberState::Grab);
    }

    /// Release and remember where the robot was.
    pub fn push_hatch(&mut self) {
        self.set_grabber(GrabberState::Release);
        self.released_at = self.drive_distance;
    }

    pub fn set_extension(&mut self, state: ExtensionState) {
        if state != self.extension {
            debug!("Hatch flower extension {:?} -> {:?}", self.extension, state);
            self.extension = state;
        }
    }

    /// Latest average drivetrain distance. Fed by the cycle after the
    /// drivetrain has sampled.
    #[inline]
    pub fn set_drive_distance(&mut self, distance: f64) {
        self.drive_distance = distance;
    }

    fn set_grabber(&mut self, state: GrabberState) {
        if state != self.grabber {
            debug!("Hatch grabber {:?} -> {:?}", self.grabber, state);
            self.grabber = state;
        }
    }

    // ─── Queries ────────────────────────────────────────────────────

    /// Switch held for at least the debounce interval.
    #[inline]
    pub fn has_hatch(&self) -> bool {
        self.debounce.is_settled()
    }

    /// Backed up at least `backup_distance` since the last push.
    #[inline]
    pub fn is_hatch_grabber_safe_to_retract(&self) -> bool {
        self.released_at - self.drive_distance >= self.config.backup_distance
    }

    #[inline]
    pub fn grabber(&self) -> GrabberState {
        self.grabber
    }

    #[inline]
    pub fn extension(&self) -> ExtensionState {
        self.extension
    }

    fn grab_level(&self) -> bool {
        match self.grabber {
            GrabberState::Grab => self.config.grab_level,
            GrabberState::Release => !self.config.grab_level,
        }
    }

    fn extend_level(&self) -> bool {
        match self.extension {
            ExtensionState::Up => self.config.up_level,
            ExtensionState::Down => !self.config.up_level,
        }
    }

    fn write_outputs(&mut self) {
        let grab = self.grab_level();
        let extend = self.extend_level();
        self.grab.set_digital_output(grab);
        self.extend.set_digital_output(extend);
    }
}

impl Subsystem for HatchFlower {
    fn name(&self) -> &'static str {
        "hatch_flower"
    }

    fn on_mode_init(&mut self, _now: f64) {
        self.grabber = GrabberState::Grab;
        self.extension = ExtensionState::Down;
        self.released_at = self.drive_distance;
        self.debounce.reset();
    }

    fn on_sample_inputs(&mut self, now: f64) {
        self.faults = self.debounce.update(self.switch.is_triggered(), now);
        if self.faults.contains(SubsystemFault::SENSOR_IMPLAUSIBLE) {
            warn!("Hatch switch sampled out of order at t={now}, debounce restarted");
        }
    }

    fn on_update(&mut self, _now: f64) {
        self.write_outputs();
    }

    fn on_publish_telemetry(&self, sink: &mut dyn TelemetrySink) {
        sink.publish("hatch_flower.extension", self.extension as u8 as f64);
        sink.publish("hatch_flower.grabber", self.grabber as u8 as f64);
        sink.publish("hatch_flower.switch", flag(self.debounce.raw()));
        sink.publish("hatch_flower.has_hatch", flag(self.has_hatch()));
        sink.publish(
            "hatch_flower.safe_to_retract",
            flag(self.is_hatch_grabber_safe_to_retract()),
        );
        sink.publish("hatch_flower.faults", self.faults.bits() as f64);
    }

    fn on_shutdown(&mut self, _now: f64) {
        // Pneumatics hold their last state.
    }

    fn faults(&self) -> SubsystemFault {
        self.faults
    }
}
