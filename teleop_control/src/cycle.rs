//! Deterministic teleop cycle: sample → map → arbitrate → update → publish.
//!
//! [`ControlCore`] owns every component and runs exactly one cycle per
//! call; it knows nothing about wall-clock time beyond the `now` it is
//! handed. [`CycleRunner`] paces it at the configured period.
//!
//! ## RT Setup Sequence (`rt` feature)
//! 1. `mlockall(MCL_CURRENT | MCL_FUTURE)`: lock all pages.
//! 2. Prefault stack pages.
//! 3. `sched_setaffinity`: pin to one CPU core.
//! 4. `sched_setscheduler(SCHED_FIFO, prio)`.
//!
//! ## Cycle Loop
//! Absolute-time sleep on `CLOCK_MONOTONIC` with the `rt` feature,
//! `std::thread::sleep` otherwise. An overrun is counted and warned; the
//! next cycle still runs.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use teleop_common::config::TeleopConfig;
use teleop_common::error::{FaultState, SubsystemFault};
use teleop_common::hal::{
    AssistFactory, DigitalInput, DigitalOutput, InputSource, MotorController, TelemetrySink,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::command::arbitration::CommandArbitrator;
use crate::error::propagation::FaultTracker;
use crate::input::mapper::{InputMapper, IntentFrame};
use crate::state::{Drivetrain, Elevator, HatchFlower, Intake, Subsystems};
use crate::telemetry::publish_faults;

// ─── Cycle Statistics ───────────────────────────────────────────────

/// O(1) per-cycle timing statistics.
///
/// Updated every cycle with no allocation.
#[derive(Debug, Clone)]
pub struct CycleStats {
    /// Total cycles executed.
    pub cycle_count: u64,
    /// Last cycle duration [ns].
    pub last_cycle_ns: i64,
    /// Minimum cycle duration [ns].
    pub min_cycle_ns: i64,
    /// Maximum cycle duration [ns].
    pub max_cycle_ns: i64,
    /// Running sum for average computation.
    pub sum_cycle_ns: i64,
    /// Number of cycles that exceeded the period.
    pub overruns: u64,
    /// Maximum wake-up latency [ns].
    pub max_latency_ns: i64,
}

impl CycleStats {
    pub const fn new() -> Self {
        Self {
            cycle_count: 0,
            last_cycle_ns: 0,
            min_cycle_ns: i64::MAX,
            max_cycle_ns: 0,
            sum_cycle_ns: 0,
            overruns: 0,
            max_latency_ns: 0,
        }
    }

    /// Record a cycle duration. O(1), no allocation.
    #[inline]
    pub fn record(&mut self, duration_ns: i64, latency_ns: i64) {
        self.cycle_count += 1;
        self.last_cycle_ns = duration_ns;
        self.min_cycle_ns = self.min_cycle_ns.min(duration_ns);
        self.max_cycle_ns = self.max_cycle_ns.max(duration_ns);
        self.sum_cycle_ns += duration_ns;
        self.max_latency_ns = self.max_latency_ns.max(latency_ns);
    }

    /// Average cycle time [ns] (0 if no cycles).
    #[inline]
    pub fn avg_cycle_ns(&self) -> i64 {
        if self.cycle_count == 0 {
            0
        } else {
            self.sum_cycle_ns / self.cycle_count as i64
        }
    }
}

impl Default for CycleStats {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Hardware Bundle ────────────────────────────────────────────────

/// Every device and collaborator the core needs, handed over once at
/// construction.
pub struct Hardware {
    pub input: Box<dyn InputSource>,
    pub drive_left: Box<dyn MotorController>,
    pub drive_right: Box<dyn MotorController>,
    pub elevator: Box<dyn MotorController>,
    pub wrist: Box<dyn MotorController>,
    pub roller: Box<dyn MotorController>,
    pub intake_solenoid: Box<dyn DigitalOutput>,
    pub grab_solenoid: Box<dyn DigitalOutput>,
    pub extend_solenoid: Box<dyn DigitalOutput>,
    pub hatch_switch: Box<dyn DigitalInput>,
    pub telemetry: Box<dyn TelemetrySink>,
    pub assist_factory: Box<dyn AssistFactory>,
}

// ─── Control Core ───────────────────────────────────────────────────

/// The whole teleop control core for one robot.
pub struct ControlCore {
    input: Box<dyn InputSource>,
    telemetry: Box<dyn TelemetrySink>,
    mapper: InputMapper,
    arbitrator: CommandArbitrator,
    subsystems: Subsystems,
    tracker: FaultTracker,
    intents: IntentFrame,
    faults: FaultState,
    telemetry_interval: u64,
    cycle_count: u64,
}

impl ControlCore {
    pub fn new(config: TeleopConfig, hw: Hardware) -> Self {
        let subsystems = Subsystems {
            drivetrain: Drivetrain::new(hw.drive_left, hw.drive_right),
            elevator: Elevator::new(config.elevator.clone(), hw.elevator),
            intake: Intake::new(
                config.intake.clone(),
                hw.wrist,
                hw.roller,
                hw.intake_solenoid,
            ),
            hatch_flower: HatchFlower::new(
                config.hatch_flower.clone(),
                hw.grab_solenoid,
                hw.extend_solenoid,
                hw.hatch_switch,
            ),
        };
        let arbitrator =
            CommandArbitrator::new(config.arbitration.clone(), &config.input, hw.assist_factory);

        Self {
            input: hw.input,
            telemetry: hw.telemetry,
            mapper: InputMapper::new(config.input),
            arbitrator,
            subsystems,
            tracker: FaultTracker::new(),
            intents: IntentFrame::neutral(),
            faults: FaultState::default(),
            telemetry_interval: u64::from(config.telemetry_interval.max(1)),
            cycle_count: 0,
        }
    }

    // ─── Lifecycle ──────────────────────────────────────────────────

    /// Reset every component at the start of a match phase.
    pub fn on_mode_init(&mut self, now: f64) {
        info!("Mode init at t={now:.3}");
        self.arbitrator.on_mode_init(now);
        for s in self.subsystems.in_order_mut() {
            s.on_mode_init(now);
        }
        self.intents = IntentFrame::neutral();
        self.faults.clear();
        self.tracker.reset();
        self.cycle_count = 0;
    }

    /// Run one cycle and return the faults it raised.
    pub fn run_cycle(&mut self, now: f64) -> FaultState {
        self.faults.clear();

        // ═══ SAMPLE ═══
        let (raw, input_fault) = match self.input.sample() {
            Ok(raw) => (Some(raw), SubsystemFault::empty()),
            Err(e) => {
                debug!("Input sample failed: {e}");
                (None, SubsystemFault::INPUT_OUT_OF_RANGE)
            }
        };
        for s in self.subsystems.in_order_mut() {
            s.on_sample_inputs(now);
        }
        let distance = self.subsystems.drivetrain.average_distance();
        self.subsystems.hatch_flower.set_drive_distance(distance);

        // ═══ MAP ═══
        self.intents = match raw {
            Some(raw) => self.mapper.map(&raw),
            None => IntentFrame::neutral(),
        };

        // ═══ ARBITRATE ═══
        self.arbitrator
            .arbitrate(now, &self.intents, &mut self.subsystems);

        // ═══ UPDATE ═══
        for s in self.subsystems.in_order_mut() {
            s.on_update(now);
        }

        // ═══ FAULTS ═══
        self.faults.input = self.intents.faults() | input_fault;
        self.faults.arbitration = self.arbitrator.faults();
        self.subsystems.collect_faults(&mut self.faults);

        // ═══ PUBLISH ═══
        if self.cycle_count % self.telemetry_interval == 0 {
            self.publish_telemetry();
        }
        self.cycle_count += 1;

        self.tracker.evaluate(&self.faults);
        self.faults
    }

    /// Cancel any assist command and leave every actuator at zero.
    pub fn on_shutdown(&mut self, now: f64) {
        info!("Shutdown at t={now:.3}");
        self.arbitrator.on_shutdown(now);
        for s in self.subsystems.in_order_mut() {
            s.on_shutdown(now);
        }
        if let Err(e) = self.telemetry.flush() {
            warn!("Telemetry flush failed at shutdown: {e}");
        }
    }

    fn publish_telemetry(&mut self) {
        let sink = self.telemetry.as_mut();
        for s in self.subsystems.in_order() {
            s.on_publish_telemetry(sink);
        }
        self.arbitrator.publish_telemetry(sink);
        publish_faults(sink, &self.faults);
        if let Err(e) = sink.flush() {
            warn!("Telemetry flush failed: {e}");
        }
    }

    // ─── Queries ────────────────────────────────────────────────────

    #[inline]
    pub fn arbitrator(&self) -> &CommandArbitrator {
        &self.arbitrator
    }

    #[inline]
    pub fn subsystems(&self) -> &Subsystems {
        &self.subsystems
    }

    /// Intents mapped in the last cycle.
    #[inline]
    pub fn intents(&self) -> &IntentFrame {
        &self.intents
    }

    /// Faults of the last cycle.
    #[inline]
    pub fn faults(&self) -> FaultState {
        self.faults
    }

    #[inline]
    pub fn is_assist_active(&self) -> bool {
        self.arbitrator.is_assist_active()
    }

    #[inline]
    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }
}

// ─── RT Setup ───────────────────────────────────────────────────────

/// Errors during RT setup or cycle pacing.
#[derive(Debug, Error)]
pub enum CycleError {
    /// RT system call failed.
    #[error("RT setup error: {0}")]
    RtSetup(String),

    /// Monotonic clock unavailable.
    #[error("clock error: {0}")]
    Clock(String),
}

/// Lock all current and future memory pages.
#[cfg(feature = "rt")]
fn rt_mlockall() -> Result<(), CycleError> {
    use nix::sys::mman::{MlockallFlags, mlockall};
    mlockall(MlockallFlags::MCL_CURRENT | MlockallFlags::MCL_FUTURE)
        .map_err(|e| CycleError::RtSetup(format!("mlockall failed: {e}")))
}

#[cfg(not(feature = "rt"))]
fn rt_mlockall() -> Result<(), CycleError> {
    Ok(())
}

/// Touch a chunk of stack so the loop never faults it in.
fn prefault_stack() {
    let mut buf = [0u8; 256 * 1024];
    for byte in buf.iter_mut() {
        // SAFETY: `byte` is a valid exclusive reference into `buf`.
        unsafe { core::ptr::write_volatile(byte, 0xFF) };
    }
    core::hint::black_box(&buf);
}

#[cfg(feature = "rt")]
fn rt_set_affinity(cpu: usize) -> Result<(), CycleError> {
    use nix::sched::{CpuSet, sched_setaffinity};
    use nix::unistd::Pid;

    let mut cpuset = CpuSet::new();
    cpuset
        .set(cpu)
        .map_err(|e| CycleError::RtSetup(format!("CpuSet::set({cpu}) failed: {e}")))?;
    sched_setaffinity(Pid::from_raw(0), &cpuset)
        .map_err(|e| CycleError::RtSetup(format!("sched_setaffinity failed: {e}")))
}

#[cfg(not(feature = "rt"))]
fn rt_set_affinity(_cpu: usize) -> Result<(), CycleError> {
    Ok(())
}

#[cfg(feature = "rt")]
fn rt_set_scheduler(priority: i32) -> Result<(), CycleError> {
    let param = libc::sched_param {
        sched_priority: priority,
    };
    // SAFETY: `param` outlives the call; pid 0 is the calling thread.
    let ret = unsafe { libc::sched_setscheduler(0, libc::SCHED_FIFO, &param) };
    if ret != 0 {
        let err = std::io::Error::last_os_error();
        return Err(CycleError::RtSetup(format!(
            "sched_setscheduler(SCHED_FIFO, {priority}) failed: {err}"
        )));
    }
    Ok(())
}

#[cfg(not(feature = "rt"))]
fn rt_set_scheduler(_priority: i32) -> Result<(), CycleError> {
    Ok(())
}

/// Perform the RT setup sequence. All calls are no-ops without the `rt`
/// feature.
pub fn rt_setup(cpu_core: usize, rt_priority: i32) -> Result<(), CycleError> {
    rt_mlockall()?;
    prefault_stack();
    rt_set_affinity(cpu_core)?;
    rt_set_scheduler(rt_priority)?;
    Ok(())
}

// ─── Cycle Runner ───────────────────────────────────────────────────

/// Paces a [`ControlCore`] at a fixed period until stopped.
pub struct CycleRunner {
    core: ControlCore,
    period_ns: i64,
    stats: CycleStats,
    running: Arc<AtomicBool>,
    max_cycles: Option<u64>,
}

impl CycleRunner {
    pub fn new(core: ControlCore, period_ms: u32) -> Self {
        Self {
            core,
            period_ns: i64::from(period_ms) * 1_000_000,
            stats: CycleStats::new(),
            running: Arc::new(AtomicBool::new(true)),
            max_cycles: None,
        }
    }

    /// Stop after `cycles` cycles.
    pub fn with_max_cycles(mut self, cycles: u64) -> Self {
        self.max_cycles = Some(cycles);
        self
    }

    /// Flag that keeps the loop alive; clear it (e.g. from a signal
    /// handler) to stop after the current cycle.
    pub fn running(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    #[inline]
    pub fn stats(&self) -> &CycleStats {
        &self.stats
    }

    #[inline]
    pub fn core(&self) -> &ControlCore {
        &self.core
    }

    #[inline]
    pub fn core_mut(&mut self) -> &mut ControlCore {
        &mut self.core
    }

    /// Run `on_mode_init`, the cycle loop, then `on_shutdown`.
    pub fn run(&mut self) -> Result<(), CycleError> {
        self.core.on_mode_init(0.0);

        #[cfg(feature = "rt")]
        let result = self.run_rt_loop();

        #[cfg(not(feature = "rt"))]
        let result = self.run_sim_loop();

        let end = self.stats.cycle_count as f64 * self.period_ns as f64 * 1e-9;
        self.core.on_shutdown(end);
        info!(
            cycles = self.stats.cycle_count,
            overruns = self.stats.overruns,
            avg_ns = self.stats.avg_cycle_ns(),
            max_ns = self.stats.max_cycle_ns,
            "Cycle loop stopped"
        );
        result
    }

    fn should_continue(&self) -> bool {
        self.running.load(Ordering::Relaxed)
            && self
                .max_cycles
                .is_none_or(|max| self.stats.cycle_count < max)
    }

    fn record(&mut self, duration_ns: i64, latency_ns: i64) {
        self.stats.record(duration_ns, latency_ns);
        if duration_ns > self.period_ns {
            self.stats.overruns += 1;
            warn!(
                "Cycle overrun: {duration_ns}ns > {}ns budget",
                self.period_ns
            );
        }
    }

    #[cfg(feature = "rt")]
    fn run_rt_loop(&mut self) -> Result<(), CycleError> {
        use nix::time::{ClockId, ClockNanosleepFlags, clock_gettime, clock_nanosleep};

        let clock = ClockId::CLOCK_MONOTONIC;
        let now = || clock_gettime(clock).map_err(|e| CycleError::Clock(e.to_string()));
        let start = now()?;
        let mut next_wake = start;

        while self.should_continue() {
            next_wake = timespec_add_ns(next_wake, self.period_ns);

            let cycle_start = now()?;
            let t = timespec_diff_ns(&cycle_start, &start) as f64 * 1e-9;
            self.core.run_cycle(t);
            let cycle_end = now()?;

            let latency = timespec_diff_ns(&cycle_start, &next_wake) + self.period_ns;
            self.record(timespec_diff_ns(&cycle_end, &cycle_start), latency.abs());

            let _ = clock_nanosleep(clock, ClockNanosleepFlags::TIMER_ABSTIME, &next_wake);
        }
        Ok(())
    }

    #[cfg(not(feature = "rt"))]
    fn run_sim_loop(&mut self) -> Result<(), CycleError> {
        use std::time::{Duration, Instant};

        let period = Duration::from_nanos(self.period_ns as u64);
        let start = Instant::now();

        while self.should_continue() {
            let cycle_start = Instant::now();
            self.core
                .run_cycle(cycle_start.duration_since(start).as_secs_f64());
            let elapsed = cycle_start.elapsed();
            self.record(elapsed.as_nanos() as i64, 0);

            if let Some(remaining) = period.checked_sub(elapsed) {
                std::thread::sleep(remaining);
            }
        }
        Ok(())
    }
}

// ─── Time Helpers ───────────────────────────────────────────────────

#[cfg(feature = "rt")]
fn timespec_add_ns(ts: nix::sys::time::TimeSpec, ns: i64) -> nix::sys::time::TimeSpec {
    let total = ts.tv_nsec() + ns;
    let secs = ts.tv_sec() + total.div_euclid(1_000_000_000);
    let nanos = total.rem_euclid(1_000_000_000);
    nix::sys::time::TimeSpec::new(secs, nanos)
}

/// `a - b` in nanoseconds.
#[cfg(feature = "rt")]
fn timespec_diff_ns(a: &nix::sys::time::TimeSpec, b: &nix::sys::time::TimeSpec) -> i64 {
    (a.tv_sec() - b.tv_sec()) * 1_000_000_000 + (a.tv_nsec() - b.tv_nsec())
}

// ─── Tests ──────────────────────────────────────────────────────────
