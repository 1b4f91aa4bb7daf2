//! Configuration schema definitions

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::mapping::{MappingEngine, MappingRule, TransformKind, DEFAULT_ALPHA};
use crate::output::{OutputCategory, OutputTarget};
use crate::render::RendererKind;
use crate::sensors::{create_sensor, Sensor, SensorKind, SensorParams};

/// Complete configuration for an interactive installation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallationConfig {
    /// Human-readable preset name
    #[serde(default = "default_name")]
    pub name: String,

    /// Simulated sensors, read in this order every tick
    #[serde(default)]
    pub sensors: Vec<SensorConfig>,

    /// Mapping rules, evaluated in this order
    #[serde(default)]
    pub mappings: Vec<MappingConfig>,

    /// Output targets
    #[serde(default)]
    pub outputs: Vec<OutputConfig>,

    /// Renderer used by the run loop (default: terminal)
    #[serde(default)]
    pub renderer: RendererKind,

    /// Frames per second (default: 30); values below 1 are reported by validation
    #[serde(default = "default_tick_rate")]
    pub tick_rate: i64,

    /// Smoothing factor for the `smooth` transform (default: 0.15)
    #[serde(default = "default_smooth_alpha")]
    pub smooth_alpha: f64,
}

fn default_name() -> String { "Untitled Installation".to_string() }
fn default_tick_rate() -> i64 { 30 }
fn default_smooth_alpha() -> f64 { DEFAULT_ALPHA }

impl Default for InstallationConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            sensors: Vec::new(),
            mappings: Vec::new(),
            outputs: Vec::new(),
            renderer: RendererKind::default(),
            tick_rate: default_tick_rate(),
            smooth_alpha: default_smooth_alpha(),
        }
    }
}

impl InstallationConfig {
    /// Collect every validation problem; empty means valid
    pub fn problems(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push("Installation name is empty.".to_string());
        }

        if self.sensors.is_empty() {
            errors.push("At least one sensor is required.".to_string());
        }

        if self.mappings.is_empty() {
            errors.push("At least one mapping rule is required.".to_string());
        }
        for (i, m) in self.mappings.iter().enumerate() {
            if m.source.is_empty() {
                errors.push(format!("Mapping #{i}: source is empty."));
            }
            if m.target.is_empty() {
                errors.push(format!("Mapping #{i}: target is empty."));
            }
            if let Err(e) = m.transform.parse::<TransformKind>() {
                errors.push(format!("Mapping #{i}: {e}."));
            }
            if m.min_out > m.max_out {
                errors.push(format!(
                    "Mapping #{i}: min_out ({}) > max_out ({}).",
                    m.min_out, m.max_out
                ));
            }
        }

        if self.outputs.is_empty() {
            errors.push("At least one output target is required.".to_string());
        }

        if self.tick_rate < 1 {
            errors.push(format!("tick_rate must be >= 1, got {}.", self.tick_rate));
        } else if u32::try_from(self.tick_rate).is_err() {
            errors.push(format!("tick_rate is too large, got {}.", self.tick_rate));
        }

        if !(self.smooth_alpha > 0.0 && self.smooth_alpha <= 1.0) {
            errors.push(format!(
                "smooth_alpha must be in (0, 1], got {}.",
                self.smooth_alpha
            ));
        }

        errors
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let problems = self.problems();
        if !problems.is_empty() {
            bail!("Invalid configuration:\n  {}", problems.join("\n  "));
        }
        Ok(())
    }

    /// Mapping rules in declaration order
    pub fn rules(&self) -> Vec<MappingRule> {
        self.mappings
            .iter()
            .map(|m| MappingRule::new(&m.source, &m.target, &m.transform, m.min_out, m.max_out))
            .collect()
    }

    /// Mapping engine for these rules and smoothing factor
    pub fn mapping_engine(&self) -> MappingEngine {
        MappingEngine::with_smooth_alpha(self.rules(), self.smooth_alpha)
    }

    /// Live sensors, in declaration order
    pub fn build_sensors(&self) -> Vec<Box<dyn Sensor>> {
        self.sensors
            .iter()
            .map(|s| create_sensor(s.kind, &s.params))
            .collect()
    }

    /// Output targets, in declaration order
    pub fn build_targets(&self) -> Vec<OutputTarget> {
        self.outputs.iter().map(|o| OutputTarget::new(o.kind)).collect()
    }
}

/// Configuration for one sensor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorConfig {
    /// Sensor type
    #[serde(rename = "type")]
    pub kind: SensorKind,

    /// Sensor-specific settings, given inline next to `type`
    #[serde(flatten)]
    pub params: SensorParams,
}

impl SensorConfig {
    pub fn new(kind: SensorKind) -> Self {
        Self {
            kind,
            params: SensorParams::default(),
        }
    }
}

/// Configuration for one mapping rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingConfig {
    /// Sensor field dot-path, e.g. `depth.avg_depth`
    pub source: String,

    /// Output parameter dot-path, e.g. `visual.brightness`
    pub target: String,

    /// Transform name (default: linear)
    #[serde(default = "default_transform")]
    pub transform: String,

    /// Output range minimum (default: 0.0)
    #[serde(default)]
    pub min_out: f64,

    /// Output range maximum (default: 1.0)
    #[serde(default = "default_max_out")]
    pub max_out: f64,
}

fn default_transform() -> String { TransformKind::Linear.name().to_string() }
fn default_max_out() -> f64 { 1.0 }

impl MappingConfig {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        transform: TransformKind,
        min_out: f64,
        max_out: f64,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            transform: transform.name().to_string(),
            min_out,
            max_out,
        }
    }
}

/// Configuration for one output target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output category
    #[serde(rename = "type")]
    pub kind: OutputCategory,
}
