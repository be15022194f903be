//! Per-cycle fault evaluation.
//!
//! Faults never stop the loop. Each cycle the tracker compares the
//! fresh [`FaultState`] with the previous one and logs rising edges only,
//! so a fault that persists for many cycles is reported once:
//!
//! - `UNREACHABLE_STATE` → `error!`
//! - anything else → `warn!`
//!
//! Falling edges are logged at `debug!`.

use teleop_common::error::{FaultState, SubsystemFault};
use tracing::{debug, error, warn};

/// Component names in [`FaultState`] field order.
pub const COMPONENTS: [&str; 6] = [
    "input",
    "arbitration",
    "drivetrain",
    "elevator",
    "intake",
    "hatch_flower",
];

#[inline]
fn fields(state: &FaultState) -> [SubsystemFault; 6] {
    [
        state.input,
        state.arbitration,
        state.drivetrain,
        state.elevator,
        state.intake,
        state.hatch_flower,
    ]
}

// ─── Evaluation Result ──────────────────────────────────────────────

/// Outcome of one evaluation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FaultReport {
    /// Flags set this cycle that were clear the previous cycle.
    pub raised: FaultState,
    /// Flags clear this cycle that were set the previous cycle.
    pub cleared: FaultState,
    /// Some component currently holds an attention-level fault.
    pub attention_required: bool,
}

impl FaultReport {
    #[inline]
    pub fn has_new_faults(&self) -> bool {
        self.raised.has_any_fault()
    }
}

/// Edge detector over successive fault states.
#[derive(Debug, Clone, Default)]
pub struct FaultTracker {
    previous: FaultState,
    raised_total: u64,
}

impl FaultTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare `current` with the previous cycle and log edges.
    pub fn evaluate(&mut self, current: &FaultState) -> FaultReport {
        let now = fields(current);
        let before = fields(&self.previous);
        let mut raised = [SubsystemFault::empty(); 6];
        let mut cleared = [SubsystemFault::empty(); 6];

        for (i, name) in COMPONENTS.iter().enumerate() {
            raised[i] = now[i] - before[i];
            cleared[i] = before[i] - now[i];

            if !raised[i].is_empty() {
                self.raised_total += 1;
                if raised[i].contains(SubsystemFault::UNREACHABLE_STATE) {
                    error!(component = *name, faults = ?raised[i], "fault raised");
                } else {
                    warn!(component = *name, faults = ?raised[i], "fault raised");
                }
            }
            if !cleared[i].is_empty() {
                debug!(component = *name, faults = ?cleared[i], "fault cleared");
            }
        }

        self.previous = *current;
        FaultReport {
            raised: from_fields(raised),
            cleared: from_fields(cleared),
            attention_required: current.needs_attention(),
        }
    }

    /// Number of rising edges seen since construction or `reset`.
    #[inline]
    pub fn raised_total(&self) -> u64 {
        self.raised_total
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn from_fields(f: [SubsystemFault; 6]) -> FaultState {
    FaultState {
        input: f[0],
        arbitration: f[1],
        drivetrain: f[2],
        elevator: f[3],
        intake: f[4],
        hatch_flower: f[5],
    }
}
