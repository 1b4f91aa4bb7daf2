//! Exponential transform
//!
//! Raises the normalized input to a fixed power before scaling. Human
//! perception of brightness and loudness is roughly logarithmic, so this
//! curve keeps small inputs nearly dark/silent and ramps sharply near the
//! top of the range.
//!
//! Use cases:
//! - Brightness driven by presence
//! - Volume driven by proximity

/// Curve exponent applied to the clamped input
pub const EXPONENT: f64 = 2.5;

/// Apply `x^2.5` to a normalized value, then scale into [min_out, max_out]
///
/// Strictly increasing and convex on [0, 1], with `f(0) == min_out` and
/// `f(1) == max_out`.
pub fn exponential_map(value: f64, min_out: f64, max_out: f64) -> f64 {
    let curved = value.clamp(0.0, 1.0).powf(EXPONENT);
    min_out + curved * (max_out - min_out)
}
