//! Stick response shaping.
//!
//! Exponential response curve, symmetric limit, axis sanitizing and
//! trigger-to-button promotion. Pure functions, no state.

/// Result of sanitizing a raw axis sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SanitizedAxis {
    /// Value in [-1, 1].
    pub value: f64,
    /// The raw sample was outside [-1, 1] or non-finite.
    pub out_of_range: bool,
}

/// Clamp a raw axis sample to [-1, 1]. Non-finite samples read as 0.0.
#[inline]
pub fn sanitize_axis(raw: f64) -> SanitizedAxis {
    if !raw.is_finite() {
        return SanitizedAxis {
            value: 0.0,
            out_of_range: true,
        };
    }
    SanitizedAxis {
        value: raw.clamp(-1.0, 1.0),
        out_of_range: !(-1.0..=1.0).contains(&raw),
    }
}

/// Exponential response curve `sign(x) * |x|^n`.
///
/// Keeps the sign and the endpoints (0, ±1) while flattening the response
/// near center for finer low-speed control.
#[inline]
pub fn exponential(x: f64, exponent: f64) -> f64 {
    x.signum() * x.abs().powf(exponent)
}

/// Symmetric limit to `[-max, max]`.
#[inline]
pub fn limit(x: f64, max: f64) -> f64 {
    x.clamp(-max, max)
}

/// Axis magnitude promoted to a button press.
#[inline]
pub fn promote(value: f64, threshold: f64) -> bool {
    value.abs() > threshold
}
