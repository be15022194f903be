//! Raw controller state → named logical intents.
//!
//! Pure function of the raw snapshot plus [`InputConfig`]:
//! 1. sanitize axes (clamp to [-1, 1], non-finite → 0.0, flag
//!    `INPUT_OUT_OF_RANGE`);
//! 2. invert axes whose physical polarity is opposite to the intent;
//! 3. shape throttle/turn with `sign(x)·|x|^n`, then limit turn;
//! 4. promote trigger axes to button presses above the threshold.

use teleop_common::config::{AxisBinding, Binding, InputConfig};
use teleop_common::error::SubsystemFault;
use teleop_common::input::{ControllerSnapshot, RawInputFrame};

use crate::control::shaping::{exponential, limit, promote, sanitize_axis};

// ─── Intents ────────────────────────────────────────────────────────

/// Logical intent name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Intent {
    Throttle = 0,
    Turn = 1,
    SnailMode = 2,
    TrackTarget = 3,
    TrackCargo = 4,
    TrackHatch = 5,
    NudgeLeft = 6,
    NudgeRight = 7,
    AssistPermission = 8,
    AssistOverride = 9,
    HatchCapture = 10,
    HatchPush = 11,
    SelectCargo = 12,
    SelectHatch = 13,
    SelectGround = 14,
    SelectLoadingStation = 15,
    Acquire = 16,
    Score = 17,
    ElevatorBottom = 18,
    ElevatorMiddle = 19,
    ElevatorTop = 20,
    ElevatorLoadingStation = 21,
    ElevatorCargoShip = 22,
    ElevatorGround = 23,
    ElevatorPower = 24,
    Handoff = 25,
}

impl Intent {
    pub const COUNT: usize = 26;

    pub const ALL: [Intent; Self::COUNT] = [
        Self::Throttle,
        Self::Turn,
        Self::SnailMode,
        Self::TrackTarget,
        Self::TrackCargo,
        Self::TrackHatch,
        Self::NudgeLeft,
        Self::NudgeRight,
        Self::AssistPermission,
        Self::AssistOverride,
        Self::HatchCapture,
        Self::HatchPush,
        Self::SelectCargo,
        Self::SelectHatch,
        Self::SelectGround,
        Self::SelectLoadingStation,
        Self::Acquire,
        Self::Score,
        Self::ElevatorBottom,
        Self::ElevatorMiddle,
        Self::ElevatorTop,
        Self::ElevatorLoadingStation,
        Self::ElevatorCargoShip,
        Self::ElevatorGround,
        Self::ElevatorPower,
        Self::Handoff,
    ];

    /// Stable telemetry name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Throttle => "throttle",
            Self::Turn => "turn",
            Self::SnailMode => "snail_mode",
            Self::TrackTarget => "track_target",
            Self::TrackCargo => "track_cargo",
            Self::TrackHatch => "track_hatch",
            Self::NudgeLeft => "nudge_left",
            Self::NudgeRight => "nudge_right",
            Self::AssistPermission => "assist_permission",
            Self::AssistOverride => "assist_override",
            Self::HatchCapture => "hatch_capture",
            Self::HatchPush => "hatch_push",
            Self::SelectCargo => "select_cargo",
            Self::SelectHatch => "select_hatch",
            Self::SelectGround => "select_ground",
            Self::SelectLoadingStation => "select_loading_station",
            Self::Acquire => "acquire",
            Self::Score => "score",
            Self::ElevatorBottom => "elevator_bottom",
            Self::ElevatorMiddle => "elevator_middle",
            Self::ElevatorTop => "elevator_top",
            Self::ElevatorLoadingStation => "elevator_loading_station",
            Self::ElevatorCargoShip => "elevator_cargo_ship",
            Self::ElevatorGround => "elevator_ground",
            Self::ElevatorPower => "elevator_power",
            Self::Handoff => "handoff",
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Intent values for one cycle. Booleans are stored as 1.0 / 0.0.
///
/// Rebuilt from scratch every cycle; nothing carries over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntentFrame {
    values: [f64; Intent::COUNT],
    faults: SubsystemFault,
}

impl IntentFrame {
    /// Everything released and centered.
    pub const fn neutral() -> Self {
        Self {
            values: [0.0; Intent::COUNT],
            faults: SubsystemFault::empty(),
        }
    }

    #[inline]
    pub fn get(&self, intent: Intent) -> f64 {
        self.values[intent.index()]
    }

    #[inline]
    pub fn pressed(&self, intent: Intent) -> bool {
        self.values[intent.index()] > 0.5
    }

    #[inline]
    pub fn set(&mut self, intent: Intent, value: f64) {
        self.values[intent.index()] = value;
    }

    #[inline]
    pub fn set_pressed(&mut self, intent: Intent, pressed: bool) {
        self.set(intent, if pressed { 1.0 } else { 0.0 });
    }

    /// Builder-style press.
    pub fn with(mut self, intent: Intent) -> Self {
        self.set_pressed(intent, true);
        self
    }

    /// Builder-style scalar.
    pub fn with_value(mut self, intent: Intent, value: f64) -> Self {
        self.set(intent, value);
        self
    }

    /// Faults raised while mapping.
    #[inline]
    pub const fn faults(&self) -> SubsystemFault {
        self.faults
    }

    /// `(name, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        Intent::ALL.iter().map(|i| (i.name(), self.get(*i)))
    }
}

impl Default for IntentFrame {
    fn default() -> Self {
        Self::neutral()
    }
}

// ─── Mapper ─────────────────────────────────────────────────────────

/// Converts raw controller snapshots into an [`IntentFrame`].
#[derive(Debug, Clone)]
pub struct InputMapper {
    config: InputConfig,
}

/// Sanitizing reader over one controller, accumulating range faults.
struct Reader<'a> {
    snap: &'a ControllerSnapshot,
    threshold: f64,
    faults: SubsystemFault,
}

impl Reader<'_> {
    fn axis(&mut self, axis: teleop_common::input::Axis) -> f64 {
        let s = sanitize_axis(self.snap.axis(axis));
        if s.out_of_range {
            self.faults |= SubsystemFault::INPUT_OUT_OF_RANGE;
        }
        s.value
    }

    fn scalar(&mut self, binding: AxisBinding) -> f64 {
        let v = self.axis(binding.axis);
        if binding.invert { -v } else { v }
    }

    fn pressed(&mut self, binding: Binding) -> bool {
        match binding {
            Binding::Button(b) => self.snap.button(b),
            Binding::Axis(a) => {
                let threshold = self.threshold;
                promote(self.axis(a), threshold)
            }
        }
    }
}

impl InputMapper {
    pub fn new(config: InputConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    /// Map one cycle's raw input.
    pub fn map(&self, raw: &RawInputFrame) -> IntentFrame {
        let cfg = &self.config;
        let mut frame = IntentFrame::neutral();

        // ── Driver ──
        let mut d = Reader {
            snap: &raw.driver,
            threshold: cfg.trigger_threshold,
            faults: SubsystemFault::empty(),
        };
        let b = &cfg.driver;

        let throttle = exponential(d.scalar(b.throttle), cfg.throttle_exponent);
        let turn = limit(exponential(d.scalar(b.turn), cfg.turn_exponent), cfg.turn_limit);
        frame.set(Intent::Throttle, throttle);
        frame.set(Intent::Turn, turn);

        frame.set_pressed(Intent::SnailMode, d.pressed(b.snail_mode));
        frame.set_pressed(Intent::TrackTarget, d.pressed(b.track_target));
        frame.set_pressed(Intent::TrackCargo, d.pressed(b.track_cargo));
        frame.set_pressed(Intent::TrackHatch, d.pressed(b.track_hatch));
        frame.set_pressed(Intent::NudgeLeft, d.pressed(b.nudge_left));
        frame.set_pressed(Intent::NudgeRight, d.pressed(b.nudge_right));
        frame.set_pressed(Intent::HatchCapture, d.pressed(b.hatch_capture));
        frame.set_pressed(Intent::HatchPush, d.pressed(b.hatch_push));

        let permission = b.assist_permission.iter().any(|btn| raw.driver.button(*btn));
        frame.set_pressed(Intent::AssistPermission, permission);

        let override_mag = b
            .assist_override
            .iter()
            .map(|a| d.axis(*a).abs())
            .fold(0.0, f64::max);
        frame.set(Intent::AssistOverride, override_mag);

        // ── Operator ──
        let mut o = Reader {
            snap: &raw.operator,
            threshold: cfg.trigger_threshold,
            faults: SubsystemFault::empty(),
        };
        let b = &cfg.operator;

        frame.set_pressed(Intent::SelectCargo, o.pressed(b.select_cargo));
        frame.set_pressed(Intent::SelectHatch, o.pressed(b.select_hatch));
        frame.set_pressed(Intent::SelectGround, o.pressed(b.select_ground));
        frame.set_pressed(Intent::SelectLoadingStation, o.pressed(b.select_loading_station));
        frame.set_pressed(Intent::Acquire, o.pressed(b.acquire));
        frame.set_pressed(Intent::Score, o.pressed(b.score));
        frame.set_pressed(Intent::ElevatorBottom, o.pressed(b.elevator_bottom));
        frame.set_pressed(Intent::ElevatorMiddle, o.pressed(b.elevator_middle));
        frame.set_pressed(Intent::ElevatorTop, o.pressed(b.elevator_top));
        frame.set_pressed(Intent::ElevatorLoadingStation, o.pressed(b.elevator_loading_station));
        frame.set_pressed(Intent::ElevatorCargoShip, o.pressed(b.elevator_cargo_ship));
        frame.set_pressed(Intent::ElevatorGround, o.pressed(b.elevator_ground));
        frame.set(Intent::ElevatorPower, o.scalar(b.elevator_power));
        frame.set_pressed(Intent::Handoff, o.pressed(b.handoff));

        frame.faults = d.faults | o.faults;
        frame
    }
}
