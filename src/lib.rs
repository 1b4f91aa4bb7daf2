//! Sensorsim - Interactive installation simulator
//!
//! Simulated depth cameras, LIDAR and motion trackers feed a mapping
//! engine whose rules turn raw readings into visual, audio and spatial
//! parameters. A router groups those parameters per output and a renderer
//! shows the result.

pub mod config;
pub mod engine;
pub mod error;
pub mod mapping;
pub mod output;
pub mod render;
pub mod sensors;

pub use config::InstallationConfig;
pub use engine::{Frame, InstallationEngine};
pub use error::ParseError;
pub use mapping::{MappingEngine, MappingRule, ParamMap, TransformKind};
pub use output::{OutputCategory, OutputRouter, OutputTarget};
