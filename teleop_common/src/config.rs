//! Configuration structures for the teleop control core.
//!
//! All config types use `serde::Deserialize` for TOML loading. Every field
//! has a default reproducing the shipped robot constants, so an empty file
//! is a valid configuration. `validate()` checks bounds and returns the
//! first violation as a message.

use std::collections::BTreeMap;

use heapless::Vec as HVec;
use serde::{Deserialize, Serialize};

use crate::consts::{
    CYCLE_PERIOD_MS, CYCLE_PERIOD_MS_MAX, CYCLE_PERIOD_MS_MIN, DEFAULT_CURVE_EXPONENT,
    DEFAULT_TRIGGER_PRESS_THRESHOLD, MAX_TRIGGER_BINDINGS, TELEMETRY_INTERVAL_DEFAULT,
};
use crate::input::{Axis, Button};
use crate::state::{ElevatorTarget, GamePieceMode, RollerState, WristState};

// ─── Top-Level Config ───────────────────────────────────────────────

/// Top-level teleop configuration.
///
/// Loaded from TOML at startup and immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeleopConfig {
    /// Control cycle period in milliseconds (default: 20).
    #[serde(default = "default_cycle_period_ms")]
    pub cycle_period_ms: u32,

    /// Telemetry publish interval [cycles] (default: 1).
    #[serde(default = "default_telemetry_interval")]
    pub telemetry_interval: u32,

    #[serde(default)]
    pub input: InputConfig,

    #[serde(default)]
    pub arbitration: ArbitrationConfig,

    #[serde(default)]
    pub elevator: ElevatorConfig,

    #[serde(default)]
    pub intake: IntakeConfig,

    #[serde(default)]
    pub hatch_flower: HatchFlowerConfig,
}

fn default_cycle_period_ms() -> u32 {
    CYCLE_PERIOD_MS
}
fn default_telemetry_interval() -> u32 {
    TELEMETRY_INTERVAL_DEFAULT
}

impl Default for TeleopConfig {
    fn default() -> Self {
        Self {
            cycle_period_ms: default_cycle_period_ms(),
            telemetry_interval: default_telemetry_interval(),
            input: InputConfig::default(),
            arbitration: ArbitrationConfig::default(),
            elevator: ElevatorConfig::default(),
            intake: IntakeConfig::default(),
            hatch_flower: HatchFlowerConfig::default(),
        }
    }
}

impl TeleopConfig {
    /// Parse from TOML text without validating.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Validate parameter bounds of every section.
    pub fn validate(&self) -> Result<(), String> {
        if self.cycle_period_ms < CYCLE_PERIOD_MS_MIN || self.cycle_period_ms > CYCLE_PERIOD_MS_MAX
        {
            return Err(format!(
                "cycle_period_ms {} out of range [{}, {}]",
                self.cycle_period_ms, CYCLE_PERIOD_MS_MIN, CYCLE_PERIOD_MS_MAX
            ));
        }
        if self.telemetry_interval == 0 {
            return Err("telemetry_interval must be at least 1".to_string());
        }
        self.input.validate()?;
        self.arbitration.validate()?;
        self.elevator.validate()?;
        self.intake.validate()?;
        self.hatch_flower.validate()?;
        Ok(())
    }

    /// Cycle period in seconds.
    #[inline]
    pub fn cycle_period_s(&self) -> f64 {
        f64::from(self.cycle_period_ms) / 1000.0
    }
}

fn check_unit_interval(name: &str, value: f64) -> Result<(), String> {
    if !(0.0..=1.0).contains(&value) {
        return Err(format!("{name} {value} out of range [0, 1]"));
    }
    Ok(())
}

fn check_non_negative(name: &str, value: f64) -> Result<(), String> {
    if !(value >= 0.0) {
        return Err(format!("{name} {value} must be >= 0"));
    }
    Ok(())
}

// ─── Input Bindings ─────────────────────────────────────────────────

/// A boolean intent source: a button, or an axis promoted to "pressed"
/// when its magnitude exceeds the trigger threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Binding {
    Button(Button),
    Axis(Axis),
}

/// A scalar intent source with optional sign inversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisBinding {
    pub axis: Axis,
    #[serde(default)]
    pub invert: bool,
}

impl AxisBinding {
    pub const fn new(axis: Axis, invert: bool) -> Self {
        Self { axis, invert }
    }
}

/// Driver controller bindings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverBindings {
    #[serde(default = "default_throttle")]
    pub throttle: AxisBinding,
    #[serde(default = "default_turn")]
    pub turn: AxisBinding,
    #[serde(default = "default_snail_mode")]
    pub snail_mode: Binding,
    #[serde(default = "default_track_target")]
    pub track_target: Binding,
    #[serde(default = "default_track_cargo")]
    pub track_cargo: Binding,
    #[serde(default = "default_track_hatch")]
    pub track_hatch: Binding,
    #[serde(default = "default_nudge_left")]
    pub nudge_left: Binding,
    #[serde(default = "default_nudge_right")]
    pub nudge_right: Binding,
    #[serde(default = "default_hatch_capture")]
    pub hatch_capture: Binding,
    #[serde(default = "default_hatch_push")]
    pub hatch_push: Binding,
    /// Any of these held allows assist commands to run.
    #[serde(default = "default_assist_permission")]
    pub assist_permission: HVec<Button, MAX_TRIGGER_BINDINGS>,
    /// Largest magnitude among these axes is the override intent.
    #[serde(default = "default_assist_override")]
    pub assist_override: HVec<Axis, MAX_TRIGGER_BINDINGS>,
}

fn default_throttle() -> AxisBinding {
    AxisBinding::new(Axis::LeftY, true)
}
fn default_turn() -> AxisBinding {
    AxisBinding::new(Axis::RightX, false)
}
fn default_snail_mode() -> Binding {
    Binding::Axis(Axis::RightTrigger)
}
fn default_track_target() -> Binding {
    Binding::Button(Button::A)
}
fn default_track_cargo() -> Binding {
    Binding::Button(Button::X)
}
fn default_track_hatch() -> Binding {
    Binding::Button(Button::B)
}
fn default_nudge_left() -> Binding {
    Binding::Button(Button::LeftBumper)
}
fn default_nudge_right() -> Binding {
    Binding::Button(Button::RightBumper)
}
fn default_hatch_capture() -> Binding {
    Binding::Button(Button::Back)
}
fn default_hatch_push() -> Binding {
    Binding::Button(Button::Start)
}
fn default_assist_permission() -> HVec<Button, MAX_TRIGGER_BINDINGS> {
    [Button::A, Button::B, Button::X].into_iter().collect()
}
fn default_assist_override() -> HVec<Axis, MAX_TRIGGER_BINDINGS> {
    [Axis::LeftY, Axis::RightX].into_iter().collect()
}

impl Default for DriverBindings {
    fn default() -> Self {
        Self {
            throttle: default_throttle(),
            turn: default_turn(),
            snail_mode: default_snail_mode(),
            track_target: default_track_target(),
            track_cargo: default_track_cargo(),
            track_hatch: default_track_hatch(),
            nudge_left: default_nudge_left(),
            nudge_right: default_nudge_right(),
            hatch_capture: default_hatch_capture(),
            hatch_push: default_hatch_push(),
            assist_permission: default_assist_permission(),
            assist_override: default_assist_override(),
        }
    }
}

/// Operator controller bindings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatorBindings {
    #[serde(default = "default_select_cargo")]
    pub select_cargo: Binding,
    #[serde(default = "default_select_hatch")]
    pub select_hatch: Binding,
    #[serde(default = "default_select_ground")]
    pub select_ground: Binding,
    #[serde(default = "default_select_loading_station")]
    pub select_loading_station: Binding,
    #[serde(default = "default_acquire")]
    pub acquire: Binding,
    #[serde(default = "default_score")]
    pub score: Binding,
    #[serde(default = "default_elevator_bottom")]
    pub elevator_bottom: Binding,
    #[serde(default = "default_elevator_middle")]
    pub elevator_middle: Binding,
    #[serde(default = "default_elevator_top")]
    pub elevator_top: Binding,
    #[serde(default = "default_elevator_loading_station")]
    pub elevator_loading_station: Binding,
    #[serde(default = "default_elevator_cargo_ship")]
    pub elevator_cargo_ship: Binding,
    #[serde(default = "default_elevator_ground")]
    pub elevator_ground: Binding,
    #[serde(default = "default_elevator_power")]
    pub elevator_power: AxisBinding,
    #[serde(default = "default_handoff")]
    pub handoff: Binding,
}

fn default_select_cargo() -> Binding {
    Binding::Button(Button::RightBumper)
}
fn default_select_hatch() -> Binding {
    Binding::Button(Button::LeftBumper)
}
fn default_select_ground() -> Binding {
    Binding::Button(Button::DpadDown)
}
fn default_select_loading_station() -> Binding {
    Binding::Button(Button::DpadUp)
}
fn default_acquire() -> Binding {
    Binding::Axis(Axis::RightTrigger)
}
fn default_score() -> Binding {
    Binding::Axis(Axis::LeftTrigger)
}
fn default_elevator_bottom() -> Binding {
    Binding::Button(Button::A)
}
fn default_elevator_middle() -> Binding {
    Binding::Button(Button::B)
}
fn default_elevator_top() -> Binding {
    Binding::Button(Button::Y)
}
fn default_elevator_loading_station() -> Binding {
    Binding::Button(Button::X)
}
fn default_elevator_cargo_ship() -> Binding {
    Binding::Button(Button::DpadRight)
}
fn default_elevator_ground() -> Binding {
    Binding::Button(Button::Back)
}
fn default_elevator_power() -> AxisBinding {
    AxisBinding::new(Axis::LeftY, true)
}
fn default_handoff() -> Binding {
    Binding::Button(Button::Start)
}

impl Default for OperatorBindings {
    fn default() -> Self {
        Self {
            select_cargo: default_select_cargo(),
            select_hatch: default_select_hatch(),
            select_ground: default_select_ground(),
            select_loading_station: default_select_loading_station(),
            acquire: default_acquire(),
            score: default_score(),
            elevator_bottom: default_elevator_bottom(),
            elevator_middle: default_elevator_middle(),
            elevator_top: default_elevator_top(),
            elevator_loading_station: default_elevator_loading_station(),
            elevator_cargo_ship: default_elevator_cargo_ship(),
            elevator_ground: default_elevator_ground(),
            elevator_power: default_elevator_power(),
            handoff: default_handoff(),
        }
    }
}

/// Input mapper configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Exponent of the throttle response curve (default: 2.0).
    #[serde(default = "default_curve_exponent")]
    pub throttle_exponent: f64,
    /// Exponent of the turn response curve (default: 2.0).
    #[serde(default = "default_curve_exponent")]
    pub turn_exponent: f64,
    /// Turn magnitude limit applied after shaping (default: 0.7).
    #[serde(default = "default_turn_limit")]
    pub turn_limit: f64,
    /// Axis magnitude above which a trigger reads as pressed (default: 0.5).
    #[serde(default = "default_trigger_threshold")]
    pub trigger_threshold: f64,
    /// Throttle multiplier while snail mode is held.
    #[serde(default = "default_snail_throttle")]
    pub snail_throttle_reduction: f64,
    /// Turn multiplier while snail mode is held.
    #[serde(default = "default_snail_turn")]
    pub snail_turn_reduction: f64,
    #[serde(default)]
    pub driver: DriverBindings,
    #[serde(default)]
    pub operator: OperatorBindings,
}

fn default_curve_exponent() -> f64 {
    DEFAULT_CURVE_EXPONENT
}
fn default_turn_limit() -> f64 {
    0.7
}
fn default_trigger_threshold() -> f64 {
    DEFAULT_TRIGGER_PRESS_THRESHOLD
}
fn default_snail_throttle() -> f64 {
    0.5
}
fn default_snail_turn() -> f64 {
    0.5
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            throttle_exponent: default_curve_exponent(),
            turn_exponent: default_curve_exponent(),
            turn_limit: default_turn_limit(),
            trigger_threshold: default_trigger_threshold(),
            snail_throttle_reduction: default_snail_throttle(),
            snail_turn_reduction: default_snail_turn(),
            driver: DriverBindings::default(),
            operator: OperatorBindings::default(),
        }
    }
}

impl InputConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.throttle_exponent > 0.0) || !(self.turn_exponent > 0.0) {
            return Err(format!(
                "curve exponents must be > 0 (throttle {}, turn {})",
                self.throttle_exponent, self.turn_exponent
            ));
        }
        check_unit_interval("turn_limit", self.turn_limit)?;
        check_unit_interval("trigger_threshold", self.trigger_threshold)?;
        check_unit_interval("snail_throttle_reduction", self.snail_throttle_reduction)?;
        check_unit_interval("snail_turn_reduction", self.snail_turn_reduction)?;
        if self.driver.assist_permission.is_empty() {
            return Err("driver.assist_permission must name at least one button".to_string());
        }
        Ok(())
    }
}

// ─── Arbitration ────────────────────────────────────────────────────

/// Command arbitrator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArbitrationConfig {
    /// Override axis magnitude that cancels an assist command (default: 0.5).
    #[serde(default = "default_override_threshold")]
    pub override_threshold: f64,
    /// Enable the operator handoff sequence (default: true).
    #[serde(default = "default_true")]
    pub handoff_enabled: bool,
}

fn default_override_threshold() -> f64 {
    0.5
}
fn default_true() -> bool {
    true
}

impl Default for ArbitrationConfig {
    fn default() -> Self {
        Self {
            override_threshold: default_override_threshold(),
            handoff_enabled: true,
        }
    }
}

impl ArbitrationConfig {
    pub fn validate(&self) -> Result<(), String> {
        check_unit_interval("override_threshold", self.override_threshold)
    }
}

// ─── Closed-Loop Profile ────────────────────────────────────────────

/// Parameters sent with every closed-loop target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionProfile {
    /// Max acceleration [units/s²].
    pub max_acceleration: f64,
    /// Max cruise velocity [units/s].
    pub max_velocity: f64,
    /// Minimum output velocity [units/s].
    #[serde(default)]
    pub min_output_velocity: f64,
    /// Allowable closed-loop error [units].
    #[serde(default)]
    pub allowable_error: f64,
    /// Arbitrary feed-forward [V].
    #[serde(default)]
    pub feed_forward: f64,
}

impl MotionProfile {
    /// Same profile with a different acceleration limit.
    #[inline]
    pub const fn with_acceleration(self, max_acceleration: f64) -> Self {
        Self {
            max_acceleration,
            ..self
        }
    }

    fn validate(&self, name: &str) -> Result<(), String> {
        if !(self.max_acceleration > 0.0) || !(self.max_velocity > 0.0) {
            return Err(format!("{name}: max_acceleration and max_velocity must be > 0"));
        }
        check_non_negative(&format!("{name}.min_output_velocity"), self.min_output_velocity)?;
        check_non_negative(&format!("{name}.allowable_error"), self.allowable_error)?;
        Ok(())
    }
}

// ─── Elevator ───────────────────────────────────────────────────────

/// Target positions per game piece mode [encoder rotations].
pub type ElevatorTargetTable = BTreeMap<GamePieceMode, BTreeMap<ElevatorTarget, f64>>;

/// Elevator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElevatorConfig {
    #[serde(default = "default_elevator_min_power")]
    pub open_loop_min_power: f64,
    #[serde(default = "default_elevator_max_power")]
    pub open_loop_max_power: f64,
    /// Position-reached tolerance [rotations].
    #[serde(default = "default_elevator_tolerance")]
    pub tolerance: f64,
    /// Acceleration limit while moving up.
    #[serde(default = "default_elevator_up_accel")]
    pub up_acceleration: f64,
    /// Acceleration limit while moving down or holding.
    #[serde(default = "default_elevator_down_accel")]
    pub down_acceleration: f64,
    #[serde(default = "default_elevator_profile")]
    pub profile: MotionProfile,
    /// Current above which `is_current_limiting` reports true [A].
    #[serde(default = "default_elevator_warn_current")]
    pub warn_current: f64,
    #[serde(default = "default_elevator_targets")]
    pub targets: ElevatorTargetTable,
}

fn default_elevator_min_power() -> f64 {
    -1.0
}
fn default_elevator_max_power() -> f64 {
    1.0
}
fn default_elevator_tolerance() -> f64 {
    0.5
}
fn default_elevator_up_accel() -> f64 {
    5000.0
}
fn default_elevator_down_accel() -> f64 {
    3000.0
}
fn default_elevator_profile() -> MotionProfile {
    MotionProfile {
        max_acceleration: default_elevator_up_accel(),
        max_velocity: 4000.0,
        min_output_velocity: 0.0,
        allowable_error: 0.1,
        feed_forward: 0.5,
    }
}
fn default_elevator_warn_current() -> f64 {
    40.0
}
fn default_elevator_targets() -> ElevatorTargetTable {
    use ElevatorTarget::*;
    let hatch = BTreeMap::from([(Bottom, 1.0), (Middle, 17.0), (Top, 35.0)]);
    let cargo = BTreeMap::from([
        (Bottom, 10.5),
        (Middle, 27.5),
        (Top, 45.0),
        (LoadingStation, 17.0),
        (CargoShip, 16.5),
    ]);
    BTreeMap::from([(GamePieceMode::Hatch, hatch), (GamePieceMode::Cargo, cargo)])
}

impl Default for ElevatorConfig {
    fn default() -> Self {
        Self {
            open_loop_min_power: default_elevator_min_power(),
            open_loop_max_power: default_elevator_max_power(),
            tolerance: default_elevator_tolerance(),
            up_acceleration: default_elevator_up_accel(),
            down_acceleration: default_elevator_down_accel(),
            profile: default_elevator_profile(),
            warn_current: default_elevator_warn_current(),
            targets: default_elevator_targets(),
        }
    }
}

impl ElevatorConfig {
    /// Resolve a named target. Missing entries fall back to the same mode's
    /// bottom position; `None` when the mode has no table at all.
    pub fn lookup(&self, mode: GamePieceMode, target: ElevatorTarget) -> Option<f64> {
        let table = self.targets.get(&mode)?;
        table
            .get(&target)
            .or_else(|| table.get(&ElevatorTarget::Bottom))
            .copied()
    }

    /// Like [`lookup`](Self::lookup), 0.0 when unresolvable.
    pub fn position(&self, mode: GamePieceMode, target: ElevatorTarget) -> f64 {
        self.lookup(mode, target).unwrap_or(0.0)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.open_loop_min_power <= self.open_loop_max_power) {
            return Err(format!(
                "elevator open-loop power limits not ordered: min {} > max {}",
                self.open_loop_min_power, self.open_loop_max_power
            ));
        }
        if self.open_loop_min_power < -1.0 || self.open_loop_max_power > 1.0 {
            return Err("elevator open-loop power limits must lie within [-1, 1]".to_string());
        }
        check_non_negative("elevator.tolerance", self.tolerance)?;
        if !(self.up_acceleration > 0.0) || !(self.down_acceleration > 0.0) {
            return Err("elevator accelerations must be > 0".to_string());
        }
        self.profile.validate("elevator.profile")?;
        for mode in [GamePieceMode::Cargo, GamePieceMode::Hatch] {
            let has_bottom = self
                .targets
                .get(&mode)
                .is_some_and(|t| t.contains_key(&ElevatorTarget::Bottom));
            if !has_bottom {
                return Err(format!("elevator.targets: {mode:?} has no bottom position"));
            }
        }
        Ok(())
    }
}

// ─── Intake ─────────────────────────────────────────────────────────

/// Wrist angle per preset [degrees].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WristAngles {
    pub ground: f64,
    pub handoff: f64,
    pub stowed: f64,
}

impl WristAngles {
    #[inline]
    pub const fn angle(&self, state: WristState) -> f64 {
        match state {
            WristState::Ground => self.ground,
            WristState::Handoff => self.handoff,
            WristState::Stowed => self.stowed,
        }
    }
}

impl Default for WristAngles {
    fn default() -> Self {
        Self {
            ground: 90.0,
            handoff: 45.0,
            stowed: 0.0,
        }
    }
}

/// Roller open-loop power per mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RollerPowers {
    pub hatch: f64,
    pub cargo: f64,
    pub hold: f64,
}

impl RollerPowers {
    /// `Stopped` is always zero.
    #[inline]
    pub const fn power(&self, state: RollerState) -> f64 {
        match state {
            RollerState::Stopped => 0.0,
            RollerState::Hatch => self.hatch,
            RollerState::Cargo => self.cargo,
            RollerState::Hold => self.hold,
        }
    }
}

impl Default for RollerPowers {
    fn default() -> Self {
        Self {
            hatch: 0.5,
            cargo: 0.8,
            hold: 0.1,
        }
    }
}

/// Intake configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeConfig {
    #[serde(default)]
    pub wrist_angles: WristAngles,
    #[serde(default)]
    pub roller_powers: RollerPowers,
    /// Wrist angle the ground presets must cross before rollers start [deg].
    #[serde(default = "default_wrist_bound")]
    pub wrist_bound: f64,
    #[serde(default = "default_wrist_profile")]
    pub wrist_profile: MotionProfile,
    /// Time commanded to ground without crossing the bound before warning [s].
    #[serde(default = "default_wrist_warn_after")]
    pub wrist_not_arriving_after: f64,
}

fn default_wrist_bound() -> f64 {
    75.0
}
fn default_wrist_profile() -> MotionProfile {
    MotionProfile {
        max_acceleration: 720.0,
        max_velocity: 360.0,
        min_output_velocity: 0.0,
        allowable_error: 2.0,
        feed_forward: 0.0,
    }
}
fn default_wrist_warn_after() -> f64 {
    2.0
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            wrist_angles: WristAngles::default(),
            roller_powers: RollerPowers::default(),
            wrist_bound: default_wrist_bound(),
            wrist_profile: default_wrist_profile(),
            wrist_not_arriving_after: default_wrist_warn_after(),
        }
    }
}

impl IntakeConfig {
    pub fn validate(&self) -> Result<(), String> {
        let p = &self.roller_powers;
        for (name, v) in [("hatch", p.hatch), ("cargo", p.cargo), ("hold", p.hold)] {
            if !(-1.0..=1.0).contains(&v) {
                return Err(format!("intake.roller_powers.{name} {v} out of range [-1, 1]"));
            }
        }
        if !self.wrist_bound.is_finite() {
            return Err("intake.wrist_bound must be finite".to_string());
        }
        self.wrist_profile.validate("intake.wrist_profile")?;
        check_non_negative("intake.wrist_not_arriving_after", self.wrist_not_arriving_after)?;
        Ok(())
    }
}

// ─── Hatch Flower ───────────────────────────────────────────────────

/// Hatch flower configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HatchFlowerConfig {
    /// Backward travel after push before retract is safe [in].
    #[serde(default = "default_backup_distance")]
    pub backup_distance: f64,
    /// Switch must be held this long before `has_hatch` [s].
    #[serde(default = "default_switch_debounce")]
    pub switch_debounce: f64,
    /// Grab solenoid level for GRAB; RELEASE is the opposite.
    #[serde(default)]
    pub grab_level: bool,
    /// Extension solenoid level for UP; DOWN is the opposite.
    #[serde(default)]
    pub up_level: bool,
}

fn default_backup_distance() -> f64 {
    3.0
}
fn default_switch_debounce() -> f64 {
    0.25
}

impl Default for HatchFlowerConfig {
    fn default() -> Self {
        Self {
            backup_distance: default_backup_distance(),
            switch_debounce: default_switch_debounce(),
            grab_level: false,
            up_level: false,
        }
    }
}

impl HatchFlowerConfig {
    pub fn validate(&self) -> Result<(), String> {
        check_non_negative("hatch_flower.backup_distance", self.backup_distance)?;
        check_non_negative("hatch_flower.switch_debounce", self.switch_debounce)?;
        Ok(())
    }
}
