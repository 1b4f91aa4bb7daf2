//! Transform kinds

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{exponential_map, invert, linear_map, threshold_gate};
use crate::error::ParseError;

/// The closed set of transforms a mapping rule can use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformKind {
    /// Proportional scaling (default)
    #[default]
    Linear,
    /// `x^2.5` curve before scaling
    Exponential,
    /// Binary gate at 0.5
    Threshold,
    /// `1 - x` before scaling
    Invert,
    /// Exponential moving average, then linear scaling
    Smooth,
}

impl TransformKind {
    pub const ALL: [TransformKind; 5] = [
        TransformKind::Linear,
        TransformKind::Exponential,
        TransformKind::Threshold,
        TransformKind::Invert,
        TransformKind::Smooth,
    ];

    /// Permissive lookup: unrecognized names fall back to `Linear`
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            tracing::warn!(transform = name, "unknown transform, falling back to linear");
            TransformKind::Linear
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            TransformKind::Linear => "linear",
            TransformKind::Exponential => "exponential",
            TransformKind::Threshold => "threshold",
            TransformKind::Invert => "invert",
            TransformKind::Smooth => "smooth",
        }
    }

    /// Whether the transform carries per-target state
    pub fn is_stateful(&self) -> bool {
        matches!(self, TransformKind::Smooth)
    }

    /// Evaluate a stateless transform
    ///
    /// `Smooth` needs a smoother; without one it behaves like `Linear`,
    /// which is also the scaling applied after smoothing.
    pub fn eval(&self, value: f64, min_out: f64, max_out: f64) -> f64 {
        match self {
            TransformKind::Linear | TransformKind::Smooth => linear_map(value, min_out, max_out),
            TransformKind::Exponential => exponential_map(value, min_out, max_out),
            TransformKind::Threshold => threshold_gate(value, min_out, max_out),
            TransformKind::Invert => invert(value, min_out, max_out),
        }
    }
}

impl FromStr for TransformKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear" => Ok(TransformKind::Linear),
            "exponential" => Ok(TransformKind::Exponential),
            "threshold" => Ok(TransformKind::Threshold),
            "invert" => Ok(TransformKind::Invert),
            "smooth" => Ok(TransformKind::Smooth),
            other => Err(ParseError::UnknownTransform(other.to_string())),
        }
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
