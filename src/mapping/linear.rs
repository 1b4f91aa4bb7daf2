//! Linear and inverted linear transforms
//!
//! Both transforms treat their input as a normalized value, clamp it to
//! [0, 1] and scale the result affinely into the output range.

/// Scale a normalized value linearly into [min_out, max_out]
///
/// `linear_map(0.0, a, b) == a` and `linear_map(1.0, a, b) == b`.
/// Inputs outside [0, 1] are clamped to the nearest bound first.
pub fn linear_map(value: f64, min_out: f64, max_out: f64) -> f64 {
    let clamped = value.clamp(0.0, 1.0);
    min_out + clamped * (max_out - min_out)
}

/// Flip a normalized value (1 - x), then scale linearly
///
/// Closer readings become louder, farther ones quieter, and so on.
pub fn invert(value: f64, min_out: f64, max_out: f64) -> f64 {
    let inverted = 1.0 - value.clamp(0.0, 1.0);
    min_out + inverted * (max_out - min_out)
}
