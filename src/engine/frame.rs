//! Per-tick frame data

use serde::Serialize;

use crate::mapping::ParamMap;
use crate::output::Routed;

/// Everything produced by one tick, handed to renderers and callbacks
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Frame {
    /// Zero-based frame number
    pub frame: u64,

    /// Wall-clock seconds since the Unix epoch
    pub timestamp: f64,

    /// Flat mapped parameters (`visual.brightness` -> value)
    pub params: ParamMap,

    /// Parameters grouped by output category, prefix stripped
    pub routed: Routed,
}
