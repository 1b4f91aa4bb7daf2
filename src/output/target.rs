//! Output categories and targets

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::mapping::ParamMap;

/// Category of output a parameter is destined for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputCategory {
    /// Visual rendering (brightness, particle_density, trace_x, ...)
    Visual,
    /// Audio rendering (volume, pitch, complexity, ...)
    Audio,
    /// Spatial positioning (pan, depth, elevation, ...)
    Spatial,
}

impl OutputCategory {
    pub const ALL: [OutputCategory; 3] = [
        OutputCategory::Visual,
        OutputCategory::Audio,
        OutputCategory::Spatial,
    ];

    /// Parameter prefix for this category
    pub fn name(&self) -> &'static str {
        match self {
            OutputCategory::Visual => "visual",
            OutputCategory::Audio => "audio",
            OutputCategory::Spatial => "spatial",
        }
    }
}

impl FromStr for OutputCategory {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "visual" => Ok(OutputCategory::Visual),
            "audio" => Ok(OutputCategory::Audio),
            "spatial" => Ok(OutputCategory::Spatial),
            other => Err(ParseError::UnknownCategory(other.to_string())),
        }
    }
}

impl fmt::Display for OutputCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sink that keeps the last batch of parameters routed to its category
///
/// The categories behave identically; they only tag where a parameter goes.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputTarget {
    category: OutputCategory,
    last_params: ParamMap,
}

impl OutputTarget {
    pub fn new(category: OutputCategory) -> Self {
        Self {
            category,
            last_params: ParamMap::new(),
        }
    }

    pub fn visual() -> Self {
        Self::new(OutputCategory::Visual)
    }

    pub fn audio() -> Self {
        Self::new(OutputCategory::Audio)
    }

    pub fn spatial() -> Self {
        Self::new(OutputCategory::Spatial)
    }

    pub fn category(&self) -> OutputCategory {
        self.category
    }

    /// Parameters from the most recent `send`, keyed by bare name
    pub fn last_params(&self) -> &ParamMap {
        &self.last_params
    }

    /// Receive a batch of parameters, replacing the previous batch
    pub fn send(&mut self, params: &ParamMap) {
        self.last_params = params.clone();
    }
}
