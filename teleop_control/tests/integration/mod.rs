//! Scenario tests on the simulated robot.
//!
//! Each scenario drives a full [`ControlCore`] cycle by cycle through the
//! [`Harness`], scripting controllers and sensors through the sim handles.

mod arbitration;
mod elevator;
mod handoff;
mod hatch_interlock;
mod intake;

use teleop_common::config::TeleopConfig;
use teleop_common::error::FaultState;
use teleop_common::input::{ControllerSnapshot, RawInputFrame};
use teleop_control::cycle::ControlCore;
use teleop_control::sim::{SimHandles, SimRobot};

/// Cycle period used by every scenario [s].
pub const PERIOD: f64 = 0.02;

pub struct Harness {
    pub core: ControlCore,
    pub h: SimHandles,
    cycle: u64,
}

impl Harness {
    /// Motors stay where the test puts them.
    pub fn new() -> Self {
        Self::from_robot(SimRobot::new())
    }

    /// Motors follow their commands.
    pub fn with_plant() -> Self {
        Self::from_robot(SimRobot::new().with_plant())
    }

    pub fn from_robot(robot: SimRobot) -> Self {
        let (hw, h) = robot.build();
        let mut core = ControlCore::new(TeleopConfig::default(), hw);
        core.on_mode_init(0.0);
        Self { core, h, cycle: 0 }
    }

    /// Time of the next cycle.
    pub fn now(&self) -> f64 {
        self.cycle as f64 * PERIOD
    }

    /// Hold both controllers from the next cycle on.
    pub fn hold(&self, driver: ControllerSnapshot, operator: ControllerSnapshot) {
        self.h.input.set(RawInputFrame::new(driver, operator));
    }

    pub fn hold_driver(&self, driver: ControllerSnapshot) {
        self.hold(driver, ControllerSnapshot::neutral());
    }

    pub fn hold_operator(&self, operator: ControllerSnapshot) {
        self.hold(ControllerSnapshot::neutral(), operator);
    }

    pub fn release(&self) {
        self.hold(ControllerSnapshot::neutral(), ControllerSnapshot::neutral());
    }

    pub fn step(&mut self) -> FaultState {
        let now = self.now();
        self.cycle += 1;
        self.core.run_cycle(now)
    }

    /// Run `n` cycles and return the union of their faults.
    pub fn run(&mut self, n: u32) -> FaultState {
        let mut all = FaultState::default();
        for _ in 0..n {
            let f = self.step();
            all.input |= f.input;
            all.arbitration |= f.arbitration;
            all.drivetrain |= f.drivetrain;
            all.elevator |= f.elevator;
            all.intake |= f.intake;
            all.hatch_flower |= f.hatch_flower;
        }
        all
    }
}
