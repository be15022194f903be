//! System-wide constants for the teleop workspace.
//!
//! Single source of truth for numeric limits and default paths.

use static_assertions::const_assert;

/// Default control cycle period in milliseconds (50 Hz).
pub const CYCLE_PERIOD_MS: u32 = 20;

/// Minimum accepted cycle period [ms].
pub const CYCLE_PERIOD_MS_MIN: u32 = 5;

/// Maximum accepted cycle period [ms].
pub const CYCLE_PERIOD_MS_MAX: u32 = 100;

/// Maximum number of buttons in one configured trigger list.
pub const MAX_TRIGGER_BINDINGS: usize = 8;

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "config/teleop.toml";

/// Default exponent of the stick response curve.
pub const DEFAULT_CURVE_EXPONENT: f64 = 2.0;

/// Default magnitude above which a trigger axis reads as "pressed".
pub const DEFAULT_TRIGGER_PRESS_THRESHOLD: f64 = 0.5;

/// Telemetry is published every N cycles by default.
pub const TELEMETRY_INTERVAL_DEFAULT: u32 = 1;

const_assert!(CYCLE_PERIOD_MS >= CYCLE_PERIOD_MS_MIN);
const_assert!(CYCLE_PERIOD_MS <= CYCLE_PERIOD_MS_MAX);
const_assert!(MAX_TRIGGER_BINDINGS > 0);
