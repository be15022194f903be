//! Telemetry sinks.
//!
//! - [`TracingTelemetry`]: every value as a `trace!` event, one `debug!`
//!   summary per flush. Used by the binary.
//! - [`MemoryTelemetry`]: last value per key in a shared map. Used by the
//!   simulated robot and tests.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use teleop_common::error::FaultState;
use teleop_common::hal::{HalError, TelemetrySink};
use tracing::{debug, trace};

/// Publish the per-component fault bits under `faults.*`.
pub fn publish_faults(sink: &mut dyn TelemetrySink, faults: &FaultState) {
    sink.publish("faults.input", faults.input.bits() as f64);
    sink.publish("faults.arbitration", faults.arbitration.bits() as f64);
    sink.publish("faults.combined", faults.combined().bits() as f64);
}

// ─── Tracing ────────────────────────────────────────────────────────

/// Emits telemetry through `tracing`.
#[derive(Debug, Default)]
pub struct TracingTelemetry {
    published: u32,
}

impl TracingTelemetry {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TelemetrySink for TracingTelemetry {
    fn publish(&mut self, key: &str, value: f64) {
        trace!(key, value, "telemetry");
        self.published += 1;
    }

    fn flush(&mut self) -> Result<(), HalError> {
        debug!(values = self.published, "telemetry flushed");
        self.published = 0;
        Ok(())
    }
}

// ─── Memory ─────────────────────────────────────────────────────────

type Store = Rc<RefCell<BTreeMap<String, f64>>>;

/// Keeps the last published value per key.
#[derive(Debug, Default)]
pub struct MemoryTelemetry {
    values: Store,
    flushes: Rc<RefCell<u64>>,
}

/// Read side of a [`MemoryTelemetry`].
#[derive(Debug, Clone)]
pub struct MemoryTelemetryHandle {
    values: Store,
    flushes: Rc<RefCell<u64>>,
}

impl MemoryTelemetry {
    pub fn new() -> (Self, MemoryTelemetryHandle) {
        let sink = Self::default();
        let handle = MemoryTelemetryHandle {
            values: Rc::clone(&sink.values),
            flushes: Rc::clone(&sink.flushes),
        };
        (sink, handle)
    }
}

impl TelemetrySink for MemoryTelemetry {
    fn publish(&mut self, key: &str, value: f64) {
        let mut values = self.values.borrow_mut();
        match values.get_mut(key) {
            Some(slot) => *slot = value,
            None => {
                values.insert(key.to_string(), value);
            }
        }
    }

    fn flush(&mut self) -> Result<(), HalError> {
        *self.flushes.borrow_mut() += 1;
        Ok(())
    }
}

impl MemoryTelemetryHandle {
    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.borrow().get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }

    pub fn flushes(&self) -> u64 {
        *self.flushes.borrow()
    }

    /// Keys with the given prefix, sorted.
    pub fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.values
            .borrow()
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect()
    }
}
