//! Single-occupancy slot for a running command.
//!
//! Taking the command out of the slot is what makes cancellation
//! idempotent: a second `cancel` finds the slot empty and does nothing.

use teleop_common::command::{AssistClaims, TrackingType};
use teleop_common::hal::{AssistCommand, AssistContext, AssistOutput};
use tracing::{debug, warn};

/// Holds at most one active command.
#[derive(Default)]
pub struct AssistSlot {
    active: Option<Box<dyn AssistCommand>>,
    tracking: Option<TrackingType>,
}

impl AssistSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start `command` and make it the occupant. A previous occupant is
    /// cancelled first.
    pub fn install(
        &mut self,
        now: f64,
        mut command: Box<dyn AssistCommand>,
        tracking: Option<TrackingType>,
    ) {
        self.cancel("replaced");
        command.start(now);
        debug!("Started {}", command.name());
        self.active = Some(command);
        self.tracking = tracking;
    }

    /// Cancel and drop the occupant. Returns whether there was one.
    pub fn cancel(&mut self, reason: &str) -> bool {
        self.tracking = None;
        match self.active.take() {
            Some(mut command) => {
                command.cancel();
                warn!("Cancelled {}: {reason}", command.name());
                true
            }
            None => false,
        }
    }

    /// Drop the occupant without cancelling if it reports completion.
    pub fn take_if_complete(&mut self) -> bool {
        if self.active.as_ref().is_some_and(|c| c.is_complete()) {
            if let Some(command) = self.active.take() {
                debug!("{} complete", command.name());
            }
            self.tracking = None;
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Tracking the occupant was created for.
    #[inline]
    pub fn tracking(&self) -> Option<TrackingType> {
        self.tracking
    }

    /// Groups the occupant claims.
    pub fn claims(&self) -> Option<AssistClaims> {
        self.active.as_ref().map(|c| c.claims())
    }

    pub fn name(&self) -> Option<&str> {
        self.active.as_ref().map(|c| c.name())
    }

    /// Run the occupant for this cycle.
    pub fn update(&mut self, now: f64, ctx: &AssistContext) -> Option<AssistOutput> {
        self.active.as_mut().map(|c| c.update(now, ctx))
    }
}
