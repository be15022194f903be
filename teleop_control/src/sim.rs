//! Simulated hardware.
//!
//! Every device is split into the boxed half handed to the control core
//! and a cloneable handle the test (or demo driver) keeps to script
//! sensors and inspect outputs. Both halves share state through
//! `Rc<RefCell<_>>`; the control core is single-threaded.
//!
//! Motors optionally integrate a trivial plant: each write moves the
//! measured position toward the closed-loop target (or by `output·rate`
//! in open loop) by at most `rate` units.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use teleop_common::command::{AssistClaims, DriveSignal, NeutralMode, Nudge, TrackingType};
use teleop_common::config::MotionProfile;
use teleop_common::hal::{
    AssistCommand, AssistContext, AssistFactory, AssistOutput, DigitalInput, DigitalOutput,
    HalError, InputSource, MotorController,
};
use teleop_common::input::RawInputFrame;
use tracing::debug;

use crate::cycle::Hardware;
use crate::telemetry::{MemoryTelemetry, MemoryTelemetryHandle};

// ─── Motor ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
struct SimMotorState {
    output: f64,
    target: Option<f64>,
    profile: Option<MotionProfile>,
    position: f64,
    current: f64,
    zero_count: u32,
    neutral_mode: NeutralMode,
    writes: u64,
}

/// Simulated motor controller.
#[derive(Debug)]
pub struct SimMotor {
    state: Rc<RefCell<SimMotorState>>,
    /// Max position change per write; `None` disables the plant.
    rate: Option<f64>,
}

/// Test side of a [`SimMotor`].
#[derive(Debug, Clone)]
pub struct SimMotorHandle {
    state: Rc<RefCell<SimMotorState>>,
}

impl SimMotor {
    /// Motor without a plant: position only changes through the handle.
    pub fn new() -> (Self, SimMotorHandle) {
        Self::build(None)
    }

    /// Motor whose position follows its commands by at most `rate` per write.
    pub fn with_rate(rate: f64) -> (Self, SimMotorHandle) {
        Self::build(Some(rate))
    }

    fn build(rate: Option<f64>) -> (Self, SimMotorHandle) {
        let state = Rc::new(RefCell::new(SimMotorState::default()));
        let handle = SimMotorHandle {
            state: Rc::clone(&state),
        };
        (Self { state, rate }, handle)
    }
}

impl MotorController for SimMotor {
    fn set_open_loop_output(&mut self, output: f64) {
        let mut s = self.state.borrow_mut();
        s.output = output;
        s.target = None;
        s.writes += 1;
        if let Some(rate) = self.rate {
            s.position += output * rate;
        }
    }

    fn set_closed_loop_target(&mut self, position: f64, profile: &MotionProfile) {
        let mut s = self.state.borrow_mut();
        s.output = 0.0;
        s.target = Some(position);
        s.profile = Some(*profile);
        s.writes += 1;
        if let Some(rate) = self.rate {
            let error = position - s.position;
            s.position += error.clamp(-rate, rate);
        }
    }

    fn position(&self) -> f64 {
        self.state.borrow().position
    }

    fn current(&self) -> f64 {
        self.state.borrow().current
    }

    fn zero_position(&mut self) {
        let mut s = self.state.borrow_mut();
        s.position = 0.0;
        s.zero_count += 1;
    }

    fn set_neutral_mode(&mut self, mode: NeutralMode) {
        self.state.borrow_mut().neutral_mode = mode;
    }
}

impl SimMotorHandle {
    /// Last open-loop output; 0.0 after a closed-loop write.
    pub fn output(&self) -> f64 {
        self.state.borrow().output
    }

    /// Last closed-loop target; `None` after an open-loop write.
    pub fn target(&self) -> Option<f64> {
        self.state.borrow().target
    }

    pub fn profile(&self) -> Option<MotionProfile> {
        self.state.borrow().profile
    }

    pub fn position(&self) -> f64 {
        self.state.borrow().position
    }

    pub fn set_position(&self, position: f64) {
        self.state.borrow_mut().position = position;
    }

    pub fn set_current(&self, current: f64) {
        self.state.borrow_mut().current = current;
    }

    pub fn zero_count(&self) -> u32 {
        self.state.borrow().zero_count
    }

    pub fn neutral_mode(&self) -> NeutralMode {
        self.state.borrow().neutral_mode
    }

    /// Total output writes.
    pub fn writes(&self) -> u64 {
        self.state.borrow().writes
    }
}

// ─── Solenoid & Switch ──────────────────────────────────────────────

/// Simulated solenoid channel.
#[derive(Debug)]
pub struct SimSolenoid {
    level: Rc<Cell<bool>>,
    writes: Rc<Cell<u64>>,
}

#[derive(Debug, Clone)]
pub struct SimSolenoidHandle {
    level: Rc<Cell<bool>>,
    writes: Rc<Cell<u64>>,
}

impl SimSolenoid {
    pub fn new() -> (Self, SimSolenoidHandle) {
        let level = Rc::new(Cell::new(false));
        let writes = Rc::new(Cell::new(0));
        let handle = SimSolenoidHandle {
            level: Rc::clone(&level),
            writes: Rc::clone(&writes),
        };
        (Self { level, writes }, handle)
    }
}

impl DigitalOutput for SimSolenoid {
    fn set_digital_output(&mut self, level: bool) {
        self.level.set(level);
        self.writes.set(self.writes.get() + 1);
    }

    fn level(&self) -> bool {
        self.level.get()
    }
}

impl SimSolenoidHandle {
    pub fn level(&self) -> bool {
        self.level.get()
    }

    pub fn writes(&self) -> u64 {
        self.writes.get()
    }
}

/// Simulated switch.
#[derive(Debug)]
pub struct SimSwitch {
    triggered: Rc<Cell<bool>>,
}

#[derive(Debug, Clone)]
pub struct SimSwitchHandle {
    triggered: Rc<Cell<bool>>,
}

impl SimSwitch {
    pub fn new() -> (Self, SimSwitchHandle) {
        let triggered = Rc::new(Cell::new(false));
        let handle = SimSwitchHandle {
            triggered: Rc::clone(&triggered),
        };
        (Self { triggered }, handle)
    }
}

impl DigitalInput for SimSwitch {
    fn is_triggered(&self) -> bool {
        self.triggered.get()
    }
}

impl SimSwitchHandle {
    pub fn set(&self, triggered: bool) {
        self.triggered.set(triggered);
    }
}

// ─── Input ──────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct Script {
    current: RawInputFrame,
    queue: VecDeque<RawInputFrame>,
    disconnected: bool,
}

/// Replays queued frames, then holds the last one.
#[derive(Debug)]
pub struct ScriptedInput {
    script: Rc<RefCell<Script>>,
}

#[derive(Debug, Clone)]
pub struct ScriptedInputHandle {
    script: Rc<RefCell<Script>>,
}

impl ScriptedInput {
    pub fn new() -> (Self, ScriptedInputHandle) {
        let script = Rc::new(RefCell::new(Script::default()));
        let handle = ScriptedInputHandle {
            script: Rc::clone(&script),
        };
        (Self { script }, handle)
    }
}

impl InputSource for ScriptedInput {
    fn sample(&mut self) -> Result<RawInputFrame, HalError> {
        let mut s = self.script.borrow_mut();
        if s.disconnected {
            return Err(HalError::Disconnected("scripted input".to_string()));
        }
        if let Some(next) = s.queue.pop_front() {
            s.current = next;
        }
        Ok(s.current)
    }
}

impl ScriptedInputHandle {
    /// Hold `frame` from the next sample on, dropping anything queued.
    pub fn set(&self, frame: RawInputFrame) {
        let mut s = self.script.borrow_mut();
        s.queue.clear();
        s.current = frame;
    }

    /// Append a frame to be returned by a future sample.
    pub fn push(&self, frame: RawInputFrame) {
        self.script.borrow_mut().queue.push_back(frame);
    }

    pub fn queued(&self) -> usize {
        self.script.borrow().queue.len()
    }

    pub fn set_connected(&self, connected: bool) {
        self.script.borrow_mut().disconnected = !connected;
    }
}

// ─── Assist ─────────────────────────────────────────────────────────

/// What the simulated assist commands did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssistLog {
    /// Trackings passed to the factory, in order.
    pub created: Vec<TrackingType>,
    /// Vision pipelines selected, in order.
    pub pipelines: Vec<u8>,
    pub started: u32,
    pub cancelled: u32,
    pub updates: u32,
}

/// Simulated target lock: drives forward slowly, steering by nudge, and
/// optionally completes after a fixed time.
#[derive(Debug)]
pub struct SimTargetLock {
    tracking: TrackingType,
    complete_after: Option<f64>,
    started_at: Option<f64>,
    complete: bool,
    cancelled: bool,
    log: Rc<RefCell<AssistLog>>,
}

impl SimTargetLock {
    pub const THROTTLE: f64 = 0.3;
    pub const NUDGE_TURN: f64 = 0.2;

    /// Drive signal this command outputs for `tracking`.
    pub fn signal_for(tracking: TrackingType) -> DriveSignal {
        let turn = match tracking.nudge {
            Nudge::Center => 0.0,
            Nudge::Left => -Self::NUDGE_TURN,
            Nudge::Right => Self::NUDGE_TURN,
        };
        DriveSignal::from_throttle_and_turn(Self::THROTTLE, turn)
    }
}

impl AssistCommand for SimTargetLock {
    fn name(&self) -> &str {
        "target_lock"
    }

    fn start(&mut self, now: f64) {
        self.started_at = Some(now);
        self.log.borrow_mut().started += 1;
    }

    fn update(&mut self, now: f64, _ctx: &AssistContext) -> AssistOutput {
        self.log.borrow_mut().updates += 1;
        if let (Some(after), Some(t0)) = (self.complete_after, self.started_at) {
            if now - t0 >= after {
                self.complete = true;
            }
        }
        AssistOutput::drive(Self::signal_for(self.tracking))
    }

    fn cancel(&mut self) {
        if !self.cancelled {
            self.cancelled = true;
            self.log.borrow_mut().cancelled += 1;
        }
    }

    fn is_complete(&self) -> bool {
        self.complete
    }

    fn claims(&self) -> AssistClaims {
        AssistClaims::DRIVETRAIN
    }
}

/// Builds [`SimTargetLock`]s and records what it was asked for.
#[derive(Debug)]
pub struct SimAssistFactory {
    complete_after: Option<f64>,
    log: Rc<RefCell<AssistLog>>,
}

#[derive(Debug, Clone)]
pub struct AssistLogHandle {
    log: Rc<RefCell<AssistLog>>,
}

impl SimAssistFactory {
    pub fn new(complete_after: Option<f64>) -> (Self, AssistLogHandle) {
        let log = Rc::new(RefCell::new(AssistLog::default()));
        let handle = AssistLogHandle {
            log: Rc::clone(&log),
        };
        (Self { complete_after, log }, handle)
    }
}

impl AssistFactory for SimAssistFactory {
    fn create(&mut self, tracking: TrackingType) -> Box<dyn AssistCommand> {
        debug!(
            "Vision pipeline {} ({:?}) for {tracking}",
            tracking.pipeline(),
            tracking.vision_target()
        );
        {
            let mut log = self.log.borrow_mut();
            log.created.push(tracking);
            log.pipelines.push(tracking.pipeline());
        }
        Box::new(SimTargetLock {
            tracking,
            complete_after: self.complete_after,
            started_at: None,
            complete: false,
            cancelled: false,
            log: Rc::clone(&self.log),
        })
    }
}

impl AssistLogHandle {
    pub fn snapshot(&self) -> AssistLog {
        self.log.borrow().clone()
    }

    pub fn created(&self) -> Vec<TrackingType> {
        self.log.borrow().created.clone()
    }

    pub fn cancelled(&self) -> u32 {
        self.log.borrow().cancelled
    }

    pub fn started(&self) -> u32 {
        self.log.borrow().started
    }
}

// ─── Robot ──────────────────────────────────────────────────────────

/// Handles to every simulated device of a [`SimRobot`].
#[derive(Debug, Clone)]
pub struct SimHandles {
    pub input: ScriptedInputHandle,
    pub drive_left: SimMotorHandle,
    pub drive_right: SimMotorHandle,
    pub elevator: SimMotorHandle,
    pub wrist: SimMotorHandle,
    pub roller: SimMotorHandle,
    pub intake_solenoid: SimSolenoidHandle,
    pub grab_solenoid: SimSolenoidHandle,
    pub extend_solenoid: SimSolenoidHandle,
    pub hatch_switch: SimSwitchHandle,
    pub telemetry: MemoryTelemetryHandle,
    pub assist: AssistLogHandle,
}

impl SimHandles {
    /// Average of both drive sides.
    pub fn set_drive_distance(&self, distance: f64) {
        self.drive_left.set_position(distance);
        self.drive_right.set_position(distance);
    }
}

/// Builder for a fully simulated robot.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimRobot {
    plant: bool,
    assist_complete_after: Option<f64>,
}

impl SimRobot {
    /// Per-write plant rates: drive [in], elevator [rot], wrist [deg].
    const DRIVE_RATE: f64 = 1.0;
    const ELEVATOR_RATE: f64 = 1.5;
    const WRIST_RATE: f64 = 15.0;

    pub fn new() -> Self {
        Self::default()
    }

    /// Motors move toward their commands instead of staying put.
    pub fn with_plant(mut self) -> Self {
        self.plant = true;
        self
    }

    /// Simulated assist commands complete this long after starting.
    pub fn with_assist_completion(mut self, after: f64) -> Self {
        self.assist_complete_after = Some(after);
        self
    }

    fn motor(&self, rate: f64) -> (SimMotor, SimMotorHandle) {
        if self.plant {
            SimMotor::with_rate(rate)
        } else {
            SimMotor::new()
        }
    }

    pub fn build(self) -> (Hardware, SimHandles) {
        let (input, input_h) = ScriptedInput::new();
        let (drive_left, drive_left_h) = self.motor(Self::DRIVE_RATE);
        let (drive_right, drive_right_h) = self.motor(Self::DRIVE_RATE);
        let (elevator, elevator_h) = self.motor(Self::ELEVATOR_RATE);
        let (wrist, wrist_h) = self.motor(Self::WRIST_RATE);
        let (roller, roller_h) = SimMotor::new();
        let (intake_solenoid, intake_solenoid_h) = SimSolenoid::new();
        let (grab_solenoid, grab_solenoid_h) = SimSolenoid::new();
        let (extend_solenoid, extend_solenoid_h) = SimSolenoid::new();
        let (hatch_switch, hatch_switch_h) = SimSwitch::new();
        let (telemetry, telemetry_h) = MemoryTelemetry::new();
        let (assist_factory, assist_h) = SimAssistFactory::new(self.assist_complete_after);

        let hw = Hardware {
            input: Box::new(input),
            drive_left: Box::new(drive_left),
            drive_right: Box::new(drive_right),
            elevator: Box::new(elevator),
            wrist: Box::new(wrist),
            roller: Box::new(roller),
            intake_solenoid: Box::new(intake_solenoid),
            grab_solenoid: Box::new(grab_solenoid),
            extend_solenoid: Box::new(extend_solenoid),
            hatch_switch: Box::new(hatch_switch),
            telemetry: Box::new(telemetry),
            assist_factory: Box::new(assist_factory),
        };
        let handles = SimHandles {
            input: input_h,
            drive_left: drive_left_h,
            drive_right: drive_right_h,
            elevator: elevator_h,
            wrist: wrist_h,
            roller: roller_h,
            intake_solenoid: intake_solenoid_h,
            grab_solenoid: grab_solenoid_h,
            extend_solenoid: extend_solenoid_h,
            hatch_switch: hatch_switch_h,
            telemetry: telemetry_h,
            assist: assist_h,
        };
        (hw, handles)
    }
}
