//! Switch debouncing.
//!
//! A flag that reads true only after the raw signal has been continuously
//! asserted for at least the configured interval. Release clears it in
//! the same sample.

use teleop_common::error::SubsystemFault;

/// Debounced boolean sensor flag.
#[derive(Debug, Clone, Copy)]
pub struct Debouncer {
    interval: f64,
    asserted_since: Option<f64>,
    last_sample: Option<f64>,
    raw: bool,
    settled: bool,
}

impl Debouncer {
    /// Create a debouncer with the given interval [s].
    pub const fn new(interval: f64) -> Self {
        Self {
            interval,
            asserted_since: None,
            last_sample: None,
            raw: false,
            settled: false,
        }
    }

    /// Feed one raw sample taken at `now` [s].
    ///
    /// Returns `SENSOR_IMPLAUSIBLE` if `now` is earlier than the previous
    /// sample; the window then restarts at `now`.
    pub fn update(&mut self, raw: bool, now: f64) -> SubsystemFault {
        let mut fault = SubsystemFault::empty();
        let went_backwards = self.last_sample.is_some_and(|last| now < last);
        self.last_sample = Some(now);
        self.raw = raw;

        if !raw {
            self.asserted_since = None;
            self.settled = false;
            return fault;
        }

        if went_backwards {
            fault |= SubsystemFault::SENSOR_IMPLAUSIBLE;
            self.asserted_since = Some(now);
        }
        let since = *self.asserted_since.get_or_insert(now);
        self.settled = now - since >= self.interval;
        fault
    }

    /// Raw signal of the last sample.
    #[inline]
    pub const fn raw(&self) -> bool {
        self.raw
    }

    /// Debounced flag.
    #[inline]
    pub const fn is_settled(&self) -> bool {
        self.raw && self.settled
    }

    /// Forget the current window and the sample history.
    pub fn reset(&mut self) {
        *self = Self::new(self.interval);
    }
}
