//! Mapping engine
//!
//! Evaluates an ordered rule set against one sensor reading at a time and
//! produces flat `category.param` output values.

use super::{linear_map, MappingRule, ParamMap, Smoother, TransformKind, DEFAULT_ALPHA};
use crate::sensors::SensorData;

/// Decimal places kept on every output value
pub const OUTPUT_DECIMALS: i32 = 6;

/// Round an output value to [`OUTPUT_DECIMALS`] places
pub fn round_output(value: f64) -> f64 {
    let scale = 10f64.powi(OUTPUT_DECIMALS);
    (value * scale).round() / scale
}

/// Applies a fixed set of [`MappingRule`]s to sensor readings
///
/// Smoothing state is keyed by target parameter. The set of smoothed
/// targets is known from the rules, so one slot per distinct target is
/// allocated up front and each slot seeds itself on first use.
pub struct MappingEngine {
    rules: Vec<MappingRule>,
    /// Index into `smoothers` for rules using the smooth transform
    slots: Vec<Option<usize>>,
    smoothers: Vec<Smoother>,
    smooth_targets: Vec<String>,
}

impl MappingEngine {
    /// Create an engine with the default smoothing factor
    pub fn new(rules: Vec<MappingRule>) -> Self {
        Self::with_smooth_alpha(rules, DEFAULT_ALPHA)
    }

    /// Create an engine with a custom smoothing factor
    ///
    /// Lower values smooth more heavily.
    pub fn with_smooth_alpha(rules: Vec<MappingRule>, alpha: f64) -> Self {
        let mut smooth_targets: Vec<String> = Vec::new();
        let mut slots = Vec::with_capacity(rules.len());

        for rule in &rules {
            if rule.transform() != TransformKind::Smooth {
                slots.push(None);
                continue;
            }
            let index = match smooth_targets.iter().position(|t| t == rule.target_param()) {
                Some(index) => index,
                None => {
                    smooth_targets.push(rule.target_param().to_string());
                    smooth_targets.len() - 1
                }
            };
            slots.push(Some(index));
        }

        let smoothers = vec![Smoother::new(alpha); smooth_targets.len()];

        Self {
            rules,
            slots,
            smoothers,
            smooth_targets,
        }
    }

    /// Rules in evaluation order
    pub fn rules(&self) -> &[MappingRule] {
        &self.rules
    }

    /// Number of distinct smoothed targets
    pub fn smoother_count(&self) -> usize {
        self.smoothers.len()
    }

    /// Current smoothed (normalized) value for a target, if it has been fed
    pub fn smoothed_value(&self, target_param: &str) -> Option<f64> {
        let index = self.smooth_targets.iter().position(|t| t == target_param)?;
        self.smoothers[index].value()
    }

    /// Map one sensor reading to output parameters
    ///
    /// Rules whose source category differs from the reading's sensor type,
    /// or whose field is missing or non-numeric, contribute nothing. When
    /// several rules write the same target, the last one wins.
    pub fn apply(&mut self, reading: &SensorData) -> ParamMap {
        let mut results = ParamMap::new();

        for (rule, slot) in self.rules.iter().zip(&self.slots) {
            if !rule.matches(&reading.sensor_type) {
                continue;
            }
            let Some(binding) = rule.binding() else {
                continue;
            };
            let Some(raw) = reading.scalar(&binding.field).filter(|v| v.is_finite()) else {
                tracing::trace!(
                    source = rule.source_param(),
                    "source field missing or non-numeric, skipping rule"
                );
                continue;
            };

            let value = match slot {
                Some(index) => {
                    let smoothed = self.smoothers[*index].update(raw);
                    linear_map(smoothed, rule.min_out(), rule.max_out())
                }
                None => rule.transform().eval(raw, rule.min_out(), rule.max_out()),
            };

            results.insert(rule.target_param().to_string(), round_output(value));
        }

        results
    }
}
