//! Parameter router
//!
//! Inspects the category prefix of every flat parameter (`visual.*`,
//! `audio.*`, `spatial.*`), strips it, and hands each category's batch to
//! the matching target.

use std::collections::BTreeMap;

use super::{OutputCategory, OutputTarget};
use crate::mapping::ParamMap;

/// Parameters grouped by category, prefix stripped
pub type Routed = BTreeMap<OutputCategory, ParamMap>;

/// Dispatches mapped parameters to output targets
#[derive(Debug, Clone, Default)]
pub struct OutputRouter {
    targets: BTreeMap<OutputCategory, OutputTarget>,
}

impl OutputRouter {
    /// Create a router; a later target replaces an earlier one of the same category
    pub fn new(targets: impl IntoIterator<Item = OutputTarget>) -> Self {
        let mut registry = BTreeMap::new();
        for target in targets {
            registry.insert(target.category(), target);
        }
        Self { targets: registry }
    }

    /// Registered targets keyed by category
    pub fn targets(&self) -> &BTreeMap<OutputCategory, OutputTarget> {
        &self.targets
    }

    pub fn target(&self, category: OutputCategory) -> Option<&OutputTarget> {
        self.targets.get(&category)
    }

    /// Route parameters to their targets
    ///
    /// Keys without a `.` and keys whose prefix has no registered target are
    /// dropped. Only categories that received at least one parameter get a
    /// `send` and appear in the result.
    pub fn route(&mut self, params: &ParamMap) -> Routed {
        let mut buckets = Routed::new();

        for (key, &value) in params {
            let Some((prefix, name)) = key.split_once('.') else {
                continue;
            };
            let Ok(category) = prefix.parse::<OutputCategory>() else {
                continue;
            };
            if !self.targets.contains_key(&category) {
                continue;
            }
            buckets.entry(category).or_default().insert(name.to_string(), value);
        }

        for (category, bucket) in &buckets {
            if let Some(target) = self.targets.get_mut(category) {
                target.send(bucket);
            }
        }

        buckets
    }
}
