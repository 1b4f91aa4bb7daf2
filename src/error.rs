//! Typed errors for the closed tag enums

use thiserror::Error;

/// Failure to resolve a configuration tag into one of the known variants
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("unknown transform '{0}' (available: linear, exponential, threshold, invert, smooth)")]
    UnknownTransform(String),

    #[error("unknown output category '{0}' (available: visual, audio, spatial)")]
    UnknownCategory(String),

    #[error("unknown sensor type '{0}' (available: depth, lidar, motion)")]
    UnknownSensor(String),

    #[error("unknown renderer '{0}' (available: terminal, json_stream, osc)")]
    UnknownRenderer(String),
}
