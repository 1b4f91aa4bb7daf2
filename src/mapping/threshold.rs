//! Threshold gate
//!
//! Turns a continuous reading into a binary output. Useful for switching
//! an effect on when someone is present.

/// Cutoff for the gate, inclusive
pub const CUTOFF: f64 = 0.5;

/// Return `max_out` when `value >= 0.5`, otherwise `min_out`
///
/// The input is not clamped; anything at or above the cutoff opens the gate.
pub fn threshold_gate(value: f64, min_out: f64, max_out: f64) -> f64 {
    if value >= CUTOFF {
        max_out
    } else {
        min_out
    }
}
