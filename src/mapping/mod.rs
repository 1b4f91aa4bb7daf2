//! Mapping system for transforming sensor readings into output parameters
//!
//! Sits between sensors and outputs: raw readings go through configurable
//! transforms and come out as `category.param` values that the router
//! hands to output targets.

mod exponential;
mod linear;
mod mapper;
mod rule;
mod smoother;
mod threshold;
mod transform;

use std::collections::BTreeMap;

pub use exponential::exponential_map;
pub use linear::{invert, linear_map};
pub use mapper::{round_output, MappingEngine, OUTPUT_DECIMALS};
pub use rule::{MappingRule, SourceBinding};
pub use smoother::{Smoother, DEFAULT_ALPHA};
pub use threshold::threshold_gate;
pub use transform::TransformKind;

/// Flat parameter values keyed by dotted name (`visual.brightness`)
pub type ParamMap = BTreeMap<String, f64>;
