//! Command arbitration: MANUAL ↔ ASSIST.
//!
//! Runs once per cycle after input mapping and before any subsystem
//! update. In order:
//!
//! 1. latch GamePieceMode / PickupLocation from operator selections;
//! 2. assist lifecycle: permission, override, completion, selection;
//! 3. handoff sequence lifecycle;
//! 4. rebuild the ownership table;
//! 5. apply assist / sequence outputs to the groups they own;
//! 6. map intents onto every group still owned by MANUAL.
//!
//! # Assist selection
//!
//! While permission is held, the first pressed trigger in priority order
//! TRACK_TARGET > TRACK_CARGO > TRACK_HATCH selects a target class and the
//! nudge buttons pick the variant. A command is only created when the
//! selection differs from the previous cycle's, so a held button never
//! restarts a command that completed or was overridden.

use teleop_common::command::{
    ControlSource, DriveSignal, NeutralMode, Nudge, Ownership, TargetClass, TrackingType,
};
use teleop_common::config::{ArbitrationConfig, InputConfig};
use teleop_common::error::SubsystemFault;
use teleop_common::hal::{AssistContext, AssistFactory, AssistOutput, TelemetrySink};
use teleop_common::state::{
    ArbitrationMode, ElevatorPosition, ElevatorTarget, ExtensionState, GamePieceMode,
    GrabberState, IntakeState, PickupLocation,
};
use tracing::info;

use super::assist::AssistSlot;
use super::handoff::{HANDOFF_ELEVATOR, HandoffSequence};
use super::source_lock::{ActuatorGroup, may_write, resolve_ownership};
use crate::input::mapper::{Intent, IntentFrame};
use crate::state::{Subsystems, flag};

/// Trigger → target class, highest priority first.
const TRACKING_TRIGGERS: [(Intent, TargetClass); 3] = [
    (Intent::TrackTarget, TargetClass::Target),
    (Intent::TrackCargo, TargetClass::Cargo),
    (Intent::TrackHatch, TargetClass::Line),
];

/// Elevator button → named target, first pressed wins.
const ELEVATOR_BUTTONS: [(Intent, ElevatorTarget); 5] = [
    (Intent::ElevatorBottom, ElevatorTarget::Bottom),
    (Intent::ElevatorMiddle, ElevatorTarget::Middle),
    (Intent::ElevatorTop, ElevatorTarget::Top),
    (Intent::ElevatorLoadingStation, ElevatorTarget::LoadingStation),
    (Intent::ElevatorCargoShip, ElevatorTarget::CargoShip),
];

pub struct CommandArbitrator {
    config: ArbitrationConfig,
    snail_throttle: f64,
    snail_turn: f64,
    factory: Box<dyn AssistFactory>,
    assist: AssistSlot,
    handoff: AssistSlot,
    /// HANDOFF seen pressed; cleared on release.
    handoff_latched: bool,
    last_tracking: Option<TrackingType>,
    mode: GamePieceMode,
    pickup: PickupLocation,
    ownership: Ownership,
    faults: SubsystemFault,
}

impl CommandArbitrator {
    pub fn new(
        config: ArbitrationConfig,
        input: &InputConfig,
        factory: Box<dyn AssistFactory>,
    ) -> Self {
        Self {
            config,
            snail_throttle: input.snail_throttle_reduction,
            snail_turn: input.snail_turn_reduction,
            factory,
            assist: AssistSlot::new(),
            handoff: AssistSlot::new(),
            handoff_latched: false,
            last_tracking: None,
            mode: GamePieceMode::default(),
            pickup: PickupLocation::default(),
            ownership: Ownership::MANUAL,
            faults: SubsystemFault::empty(),
        }
    }

    // ─── Lifecycle ──────────────────────────────────────────────────

    pub fn on_mode_init(&mut self, _now: f64) {
        self.assist.cancel("mode init");
        self.handoff.cancel("mode init");
        self.handoff_latched = false;
        self.last_tracking = None;
        self.mode = GamePieceMode::default();
        self.pickup = PickupLocation::default();
        self.ownership = Ownership::MANUAL;
        self.faults = SubsystemFault::empty();
    }

    pub fn on_shutdown(&mut self, _now: f64) {
        self.assist.cancel("shutdown");
        self.handoff.cancel("shutdown");
        self.handoff_latched = false;
        self.ownership = Ownership::MANUAL;
    }

    /// One arbitration pass. Writes setpoints into `subsystems`; the caller
    /// updates them afterwards.
    pub fn arbitrate(&mut self, now: f64, intents: &IntentFrame, subsystems: &mut Subsystems) {
        self.faults = SubsystemFault::empty();

        self.update_latches(intents);
        self.update_assist(now, intents);
        self.update_handoff(now, intents);

        let resolution = resolve_ownership(self.assist.claims(), self.handoff.claims());
        self.ownership = resolution.ownership;
        self.faults |= resolution.fault;

        let ctx = self.context(subsystems);
        if let Some(out) = self.assist.update(now, &ctx) {
            self.apply(&out, ControlSource::Assist, subsystems);
        }
        if let Some(out) = self.handoff.update(now, &ctx) {
            self.apply(&out, ControlSource::Sequence, subsystems);
        }

        self.manual(intents, subsystems);
    }

    // ─── Queries ────────────────────────────────────────────────────

    #[inline]
    pub fn is_assist_active(&self) -> bool {
        self.assist.is_active()
    }

    #[inline]
    pub fn arbitration_mode(&self) -> ArbitrationMode {
        if self.assist.is_active() {
            ArbitrationMode::Assist
        } else {
            ArbitrationMode::Manual
        }
    }

    #[inline]
    pub fn is_handoff_active(&self) -> bool {
        self.handoff.is_active()
    }

    /// Tracking of the running assist command.
    #[inline]
    pub fn active_tracking(&self) -> Option<TrackingType> {
        self.assist.tracking()
    }

    #[inline]
    pub fn mode(&self) -> GamePieceMode {
        self.mode
    }

    #[inline]
    pub fn pickup(&self) -> PickupLocation {
        self.pickup
    }

    #[inline]
    pub fn ownership(&self) -> Ownership {
        self.ownership
    }

    #[inline]
    pub fn faults(&self) -> SubsystemFault {
        self.faults
    }

    pub fn publish_telemetry(&self, sink: &mut dyn TelemetrySink) {
        sink.publish("arbitration.mode", self.arbitration_mode() as u8 as f64);
        sink.publish("arbitration.game_piece", self.mode as u8 as f64);
        sink.publish("arbitration.pickup", self.pickup as u8 as f64);
        sink.publish(
            "arbitration.tracking",
            self.assist
                .tracking()
                .map_or(-1.0, |t| t.pipeline() as f64),
        );
        sink.publish("arbitration.handoff", flag(self.handoff.is_active()));
        sink.publish("arbitration.owner.drivetrain", self.ownership.drivetrain as u8 as f64);
        sink.publish("arbitration.owner.elevator", self.ownership.elevator as u8 as f64);
        sink.publish("arbitration.owner.intake", self.ownership.intake as u8 as f64);
        sink.publish(
            "arbitration.owner.hatch_flower",
            self.ownership.hatch_flower as u8 as f64,
        );
    }

    // ─── Steps ──────────────────────────────────────────────────────

    fn update_latches(&mut self, intents: &IntentFrame) {
        let mode = if intents.pressed(Intent::SelectCargo) {
            GamePieceMode::Cargo
        } else if intents.pressed(Intent::SelectHatch) {
            GamePieceMode::Hatch
        } else {
            self.mode
        };
        if mode != self.mode {
            info!("Game piece mode {:?} -> {:?}", self.mode, mode);
            self.mode = mode;
        }

        if intents.pressed(Intent::SelectGround) {
            self.pickup = PickupLocation::Ground;
        } else if intents.pressed(Intent::SelectLoadingStation) {
            self.pickup = PickupLocation::LoadingStation;
        }
    }

    fn select_tracking(&mut self, intents: &IntentFrame) -> Option<TrackingType> {
        let mut pressed = TRACKING_TRIGGERS
            .iter()
            .filter(|(intent, _)| intents.pressed(*intent));
        let (_, class) = pressed.next()?;
        if pressed.next().is_some() {
            self.faults |= SubsystemFault::ARBITRATION_CONFLICT;
        }

        let nudge = if intents.pressed(Intent::NudgeLeft) {
            Nudge::Left
        } else if intents.pressed(Intent::NudgeRight) {
            Nudge::Right
        } else {
            Nudge::Center
        };
        Some(TrackingType::new(*class, nudge))
    }

    fn update_assist(&mut self, now: f64, intents: &IntentFrame) {
        if !intents.pressed(Intent::AssistPermission) {
            self.assist.cancel("driver no longer allowing assist");
            self.last_tracking = None;
            return;
        }

        let overridden = intents.get(Intent::AssistOverride) > self.config.override_threshold;
        if overridden {
            self.assist.cancel("override pressed");
        }
        self.assist.take_if_complete();

        let selection = self.select_tracking(intents);
        if let Some(tracking) = selection {
            if selection != self.last_tracking && !overridden {
                self.assist.cancel("tracking selection changed");
                let command = self.factory.create(tracking);
                info!(
                    "Assist {tracking} requested (pipeline {}, {:?})",
                    tracking.pipeline(),
                    tracking.vision_target()
                );
                self.assist.install(now, command, Some(tracking));
            }
        }
        self.last_tracking = selection;
    }

    fn update_handoff(&mut self, now: f64, intents: &IntentFrame) {
        if !self.config.handoff_enabled {
            return;
        }
        let held = intents.pressed(Intent::Handoff);
        match (held, self.handoff_latched) {
            (true, false) => {
                self.handoff
                    .install(now, Box::new(HandoffSequence::new()), None);
                self.handoff_latched = true;
            }
            (true, true) => {
                self.handoff.take_if_complete();
            }
            (false, true) => {
                self.handoff.cancel("handoff released");
                self.handoff_latched = false;
            }
            (false, false) => {}
        }
    }

    fn context(&self, subsystems: &Subsystems) -> AssistContext {
        let target = subsystems.elevator.desired_position();
        AssistContext {
            mode: self.mode,
            drive_distance: subsystems.drivetrain.average_distance(),
            has_hatch: subsystems.hatch_flower.has_hatch(),
            elevator_in_position: subsystems.elevator.is_at_position(target),
            elevator_target: target,
            wrist: subsystems.intake.wrist_state(),
        }
    }

    /// Apply a command's requests to the groups `source` owns.
    fn apply(&self, out: &AssistOutput, source: ControlSource, subsystems: &mut Subsystems) {
        let own = &self.ownership;
        if may_write(own, ActuatorGroup::Drivetrain, source) {
            // A claimed drivetrain always gets a signal.
            subsystems
                .drivetrain
                .set_drive_signal(out.drive.unwrap_or(DriveSignal::NEUTRAL));
        }
        if may_write(own, ActuatorGroup::Elevator, source) {
            if let Some(position) = out.elevator {
                subsystems.elevator.set_desired_position(position);
            }
        }
        if may_write(own, ActuatorGroup::Intake, source) {
            if let Some(state) = out.intake {
                subsystems.intake.set_desired_state(state);
            }
        }
        if may_write(own, ActuatorGroup::HatchFlower, source) {
            match out.grabber {
                Some(GrabberState::Grab) => subsystems.hatch_flower.capture_hatch(),
                Some(GrabberState::Release) => subsystems.hatch_flower.push_hatch(),
                None => {}
            }
        }
    }

    // ─── Manual mapping ─────────────────────────────────────────────

    fn manual(&self, intents: &IntentFrame, subsystems: &mut Subsystems) {
        let own = &self.ownership;
        let manual = |group| may_write(own, group, ControlSource::Manual);

        if manual(ActuatorGroup::Drivetrain) {
            self.manual_drive(intents, subsystems);
        }
        if manual(ActuatorGroup::HatchFlower) {
            self.manual_hatch_flower(intents, subsystems);
        }
        if manual(ActuatorGroup::Elevator) {
            self.manual_elevator(intents, subsystems);
        }
        if manual(ActuatorGroup::Intake) {
            self.manual_intake(intents, subsystems);
        }
    }

    fn manual_drive(&self, intents: &IntentFrame, subsystems: &mut Subsystems) {
        let mut throttle = intents.get(Intent::Throttle);
        let mut turn = intents.get(Intent::Turn);
        if intents.pressed(Intent::SnailMode) {
            throttle *= self.snail_throttle;
            turn *= self.snail_turn;
        }
        let mut signal = DriveSignal::from_throttle_and_turn(throttle, turn);
        signal.neutral_mode = NeutralMode::Brake;
        subsystems.drivetrain.set_drive_signal(signal);
    }

    fn manual_hatch_flower(&self, intents: &IntentFrame, subsystems: &mut Subsystems) {
        let flower = &mut subsystems.hatch_flower;
        flower.set_extension(match self.mode {
            GamePieceMode::Cargo => ExtensionState::Up,
            GamePieceMode::Hatch => ExtensionState::Down,
        });

        let hatch = self.mode == GamePieceMode::Hatch;
        if intents.pressed(Intent::Acquire) {
            if hatch {
                match self.pickup {
                    // Open the flower so the intake can hand the hatch up.
                    PickupLocation::Ground => flower.push_hatch(),
                    PickupLocation::LoadingStation => flower.capture_hatch(),
                }
            }
        } else if intents.pressed(Intent::Score) && hatch {
            flower.push_hatch();
        }

        if intents.pressed(Intent::HatchCapture) {
            flower.capture_hatch();
        } else if intents.pressed(Intent::HatchPush) {
            flower.push_hatch();
        }
    }

    fn manual_elevator(&self, intents: &IntentFrame, subsystems: &mut Subsystems) {
        let elevator = &mut subsystems.elevator;
        let button = ELEVATOR_BUTTONS
            .iter()
            .find(|(intent, _)| intents.pressed(*intent));
        match button {
            Some((_, target)) => {
                elevator.set_desired_position(ElevatorPosition::new(self.mode, *target));
            }
            None => elevator.set_desired_power(intents.get(Intent::ElevatorPower)),
        }
        if intents.pressed(Intent::ElevatorGround) {
            elevator.set_desired_position(HANDOFF_ELEVATOR);
        }
    }

    fn manual_intake(&self, intents: &IntentFrame, subsystems: &mut Subsystems) {
        let ground = self.pickup == PickupLocation::Ground;
        let state = if intents.pressed(Intent::Acquire) && ground {
            match self.mode {
                GamePieceMode::Cargo => IntakeState::GroundCargo,
                GamePieceMode::Hatch => IntakeState::GroundHatch,
            }
        } else {
            IntakeState::Stowed
        };
        subsystems.intake.set_desired_state(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{AssistLogHandle, SimAssistFactory, SimMotor, SimSolenoid, SimSwitch};
    use crate::state::{Drivetrain, Elevator, HatchFlower, Intake};
    use teleop_common::config::TeleopConfig;
    use teleop_common::state::ElevatorState;

    struct Rig {
        arb: CommandArbitrator,
        subs: Subsystems,
        log: AssistLogHandle,
    }

    fn rig_with(complete_after: Option<f64>) -> Rig {
        let cfg = TeleopConfig::default();
        let (factory, log) = SimAssistFactory::new(complete_after);
        let motor = || Box::new(SimMotor::new().0);
        let solenoid = || Box::new(SimSolenoid::new().0);
        let subs = Subsystems {
            drivetrain: Drivetrain::new(motor(), motor()),
            elevator: Elevator::new(cfg.elevator.clone(), motor()),
            intake: Intake::new(cfg.intake.clone(), motor(), motor(), solenoid()),
            hatch_flower: HatchFlower::new(
                cfg.hatch_flower.clone(),
                solenoid(),
                solenoid(),
                Box::new(SimSwitch::new().0),
            ),
        };
        Rig {
            arb: CommandArbitrator::new(cfg.arbitration.clone(), &cfg.input, Box::new(factory)),
            subs,
            log,
        }
    }

    fn rig() -> Rig {
        rig_with(None)
    }

    impl Rig {
        fn run(&mut self, now: f64, intents: IntentFrame) {
            self.arb.arbitrate(now, &intents, &mut self.subs);
            crate::state::Subsystem::on_update(&mut self.subs.drivetrain, now);
        }
    }

    fn track_target() -> IntentFrame {
        IntentFrame::neutral()
            .with(Intent::AssistPermission)
            .with(Intent::TrackTarget)
    }

    #[test]
    fn manual_by_default() {
        let mut r = rig();
        r.run(0.0, IntentFrame::neutral().with_value(Intent::Throttle, 0.5));
        assert!(!r.arb.is_assist_active());
        assert_eq!(r.arb.ownership(), Ownership::MANUAL);
        assert_eq!(r.subs.drivetrain.applied().left, 0.5);
        assert_eq!(r.subs.drivetrain.applied().right, 0.5);
    }

    #[test]
    fn track_target_without_nudge_starts_center() {
        let mut r = rig();
        r.run(0.0, track_target());
        assert!(r.arb.is_assist_active());
        assert_eq!(r.arb.arbitration_mode(), ArbitrationMode::Assist);
        let expected = TrackingType::new(TargetClass::Target, Nudge::Center);
        assert_eq!(r.arb.active_tracking(), Some(expected));
        assert_eq!(r.log.created(), vec![expected]);
        assert_eq!(r.arb.ownership().drivetrain, ControlSource::Assist);
    }

    #[test]
    fn trigger_without_permission_does_nothing() {
        let mut r = rig();
        r.run(0.0, IntentFrame::neutral().with(Intent::TrackCargo));
        assert!(!r.arb.is_assist_active());
        assert!(r.log.created().is_empty());
    }

    #[test]
    fn held_button_does_not_restart() {
        let mut r = rig();
        for i in 0..10 {
            r.run(i as f64 * 0.02, track_target());
        }
        assert_eq!(r.log.started(), 1);
        assert_eq!(r.log.cancelled(), 0);
    }

    #[test]
    fn permission_withdrawal_returns_to_manual_same_cycle() {
        let mut r = rig();
        r.run(0.0, track_target());
        r.run(0.02, IntentFrame::neutral().with_value(Intent::Throttle, 0.4));
        assert!(!r.arb.is_assist_active());
        assert_eq!(r.log.cancelled(), 1);
        assert_eq!(r.subs.drivetrain.applied().left, 0.4);
    }

    #[test]
    fn override_cancels_and_suppresses_restart() {
        let mut r = rig();
        r.run(0.0, track_target());
        r.run(0.02, track_target().with_value(Intent::AssistOverride, 0.9));
        assert!(!r.arb.is_assist_active());
        assert_eq!(r.log.cancelled(), 1);

        // Same selection still held: no restart.
        r.run(0.04, track_target());
        assert!(!r.arb.is_assist_active());
        assert_eq!(r.log.started(), 1);
    }

    #[test]
    fn override_at_threshold_is_not_override() {
        let mut r = rig();
        r.run(0.0, track_target());
        r.run(0.02, track_target().with_value(Intent::AssistOverride, 0.5));
        assert!(r.arb.is_assist_active());
    }

    #[test]
    fn override_in_start_cycle_suppresses_start() {
        let mut r = rig();
        r.run(0.0, track_target().with_value(Intent::AssistOverride, 0.9));
        assert!(!r.arb.is_assist_active());
        assert!(r.log.created().is_empty());
    }

    #[test]
    fn new_selection_replaces_in_same_cycle() {
        let mut r = rig();
        r.run(0.0, track_target());
        r.run(0.02, track_target().with(Intent::NudgeRight));
        assert!(r.arb.is_assist_active());
        assert_eq!(
            r.arb.active_tracking(),
            Some(TrackingType::new(TargetClass::Target, Nudge::Right))
        );
        assert_eq!(r.log.cancelled(), 1);
        assert_eq!(r.log.started(), 2);
    }

    #[test]
    fn nudge_left_wins() {
        let mut r = rig();
        r.run(
            0.0,
            IntentFrame::neutral()
                .with(Intent::AssistPermission)
                .with(Intent::TrackHatch)
                .with(Intent::NudgeLeft)
                .with(Intent::NudgeRight),
        );
        assert_eq!(
            r.arb.active_tracking(),
            Some(TrackingType::new(TargetClass::Line, Nudge::Left))
        );
    }

    #[test]
    fn multiple_triggers_resolved_by_priority() {
        let mut r = rig();
        r.run(0.0, track_target().with(Intent::TrackCargo));
        assert_eq!(
            r.arb.active_tracking().map(|t| t.class),
            Some(TargetClass::Target)
        );
        assert!(r.arb.faults().contains(SubsystemFault::ARBITRATION_CONFLICT));
    }

    #[test]
    fn completion_returns_to_manual_without_restart() {
        let mut r = rig_with(Some(0.05));
        r.run(0.0, track_target());
        r.run(0.06, track_target());
        assert!(r.arb.is_assist_active());
        r.run(0.08, track_target().with_value(Intent::Throttle, 0.2));
        assert!(!r.arb.is_assist_active());
        assert_eq!(r.log.cancelled(), 0);
        assert_eq!(r.log.started(), 1);
        assert_eq!(r.subs.drivetrain.applied().left, 0.2);
    }

    #[test]
    fn released_trigger_keeps_command_while_permission_held() {
        let mut r = rig();
        r.run(0.0, track_target());
        r.run(0.02, IntentFrame::neutral().with(Intent::AssistPermission));
        assert!(r.arb.is_assist_active());
        // Pressing again is a new selection.
        r.run(0.04, track_target());
        assert_eq!(r.log.started(), 2);
        assert_eq!(r.log.cancelled(), 1);
    }

    #[test]
    fn assist_leaves_subsystems_manual() {
        let mut r = rig();
        r.run(0.0, track_target().with(Intent::ElevatorTop));
        assert_eq!(r.arb.ownership().elevator, ControlSource::Manual);
        assert_eq!(r.subs.elevator.state(), ElevatorState::SetPosition);
        // Assist signal, not the stick.
        let expected = crate::sim::SimTargetLock::signal_for(TrackingType::new(
            TargetClass::Target,
            Nudge::Center,
        ));
        assert_eq!(r.subs.drivetrain.applied(), expected);
    }

    #[test]
    fn mode_latch() {
        let mut r = rig();
        assert_eq!(r.arb.mode(), GamePieceMode::Hatch);
        r.run(0.0, IntentFrame::neutral().with(Intent::SelectCargo));
        assert_eq!(r.arb.mode(), GamePieceMode::Cargo);
        r.run(0.02, IntentFrame::neutral());
        assert_eq!(r.arb.mode(), GamePieceMode::Cargo);
        r.run(
            0.04,
            IntentFrame::neutral()
                .with(Intent::SelectCargo)
                .with(Intent::SelectHatch),
        );
        assert_eq!(r.arb.mode(), GamePieceMode::Cargo);
        r.run(0.06, IntentFrame::neutral().with(Intent::SelectHatch));
        assert_eq!(r.arb.mode(), GamePieceMode::Hatch);

        r.run(0.08, IntentFrame::neutral().with(Intent::SelectGround));
        assert_eq!(r.arb.pickup(), PickupLocation::Ground);
    }

    #[test]
    fn snail_mode_scales_drive() {
        let mut r = rig();
        r.run(
            0.0,
            IntentFrame::neutral()
                .with_value(Intent::Throttle, 0.8)
                .with(Intent::SnailMode),
        );
        assert!((r.subs.drivetrain.applied().left - 0.4).abs() < 1e-12);
    }

    #[test]
    fn manual_elevator_targets_follow_mode() {
        let mut r = rig();
        r.run(0.0, IntentFrame::neutral().with(Intent::SelectCargo).with(Intent::ElevatorMiddle));
        assert_eq!(
            r.subs.elevator.desired_position(),
            ElevatorPosition::new(GamePieceMode::Cargo, ElevatorTarget::Middle)
        );

        r.run(0.02, IntentFrame::neutral().with_value(Intent::ElevatorPower, 0.3));
        assert_eq!(r.subs.elevator.state(), ElevatorState::Normal);
        assert_eq!(r.subs.elevator.desired_power(), 0.3);

        r.run(0.04, IntentFrame::neutral().with(Intent::ElevatorTop).with(Intent::ElevatorGround));
        assert_eq!(r.subs.elevator.desired_position(), HANDOFF_ELEVATOR);
    }

    #[test]
    fn manual_intake_and_hatch() {
        let mut r = rig();
        r.run(0.0, IntentFrame::neutral().with(Intent::SelectGround).with(Intent::Acquire));
        assert_eq!(r.subs.intake.desired_state(), IntakeState::GroundHatch);
        assert_eq!(r.subs.hatch_flower.grabber(), GrabberState::Release);

        r.run(0.02, IntentFrame::neutral());
        assert_eq!(r.subs.intake.desired_state(), IntakeState::Stowed);

        r.run(0.04, IntentFrame::neutral().with(Intent::SelectLoadingStation).with(Intent::Acquire));
        assert_eq!(r.subs.hatch_flower.grabber(), GrabberState::Grab);
        assert_eq!(r.subs.intake.desired_state(), IntakeState::Stowed);

        r.run(0.06, IntentFrame::neutral().with(Intent::Score));
        assert_eq!(r.subs.hatch_flower.grabber(), GrabberState::Release);

        r.run(0.08, IntentFrame::neutral().with(Intent::SelectCargo).with(Intent::SelectGround).with(Intent::Acquire));
        assert_eq!(r.subs.intake.desired_state(), IntakeState::GroundCargo);
        assert_eq!(r.subs.hatch_flower.extension(), ExtensionState::Up);
    }

    #[test]
    fn capture_beats_push() {
        let mut r = rig();
        r.run(0.0, IntentFrame::neutral().with(Intent::HatchPush));
        assert_eq!(r.subs.hatch_flower.grabber(), GrabberState::Release);
        r.run(0.02, IntentFrame::neutral().with(Intent::HatchPush).with(Intent::HatchCapture));
        assert_eq!(r.subs.hatch_flower.grabber(), GrabberState::Grab);
    }

    #[test]
    fn handoff_claims_and_releases() {
        let mut r = rig();
        r.run(0.0, IntentFrame::neutral().with(Intent::Handoff).with(Intent::ElevatorTop));
        assert!(r.arb.is_handoff_active());
        let own = r.arb.ownership();
        assert_eq!(own.drivetrain, ControlSource::Manual);
        assert_eq!(own.elevator, ControlSource::Sequence);
        assert_eq!(own.intake, ControlSource::Sequence);
        assert_eq!(own.hatch_flower, ControlSource::Sequence);
        // Manual elevator button ignored while the sequence owns it.
        assert_eq!(r.subs.elevator.desired_position(), HANDOFF_ELEVATOR);
        assert_eq!(r.subs.intake.desired_state(), IntakeState::Handoff);

        r.run(0.02, IntentFrame::neutral());
        assert!(!r.arb.is_handoff_active());
        assert_eq!(r.arb.ownership(), Ownership::MANUAL);
    }

    #[test]
    fn handoff_disabled_by_config() {
        let cfg = TeleopConfig::default();
        let mut r = rig();
        let mut arb_cfg = cfg.arbitration.clone();
        arb_cfg.handoff_enabled = false;
        let (factory, _log) = SimAssistFactory::new(None);
        r.arb = CommandArbitrator::new(arb_cfg, &cfg.input, Box::new(factory));
        r.run(0.0, IntentFrame::neutral().with(Intent::Handoff));
        assert!(!r.arb.is_handoff_active());
    }

    #[test]
    fn mode_init_cancels_everything() {
        let mut r = rig();
        r.run(0.0, track_target().with(Intent::Handoff).with(Intent::SelectCargo));
        r.arb.on_mode_init(1.0);
        assert!(!r.arb.is_assist_active());
        assert!(!r.arb.is_handoff_active());
        assert_eq!(r.arb.mode(), GamePieceMode::Hatch);
        assert_eq!(r.log.cancelled(), 1);
    }
}
