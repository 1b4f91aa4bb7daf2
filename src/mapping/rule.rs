//! Mapping rule definition

use super::TransformKind;

/// Declarative description of one sensor field -> output parameter mapping
///
/// Rules are built once at configuration load and never change. The dot
/// paths are parsed up front so the per-tick evaluation only compares
/// strings and looks up one field.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingRule {
    source_param: String,
    target_param: String,
    transform: TransformKind,
    min_out: f64,
    max_out: f64,
    binding: Option<SourceBinding>,
}

/// Parsed form of a source dot-path such as `depth.avg_depth`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBinding {
    /// Text before the first `.`, compared against the reading's sensor type
    pub category: String,
    /// Text after the last `.`, looked up in the reading's data
    pub field: String,
}

impl SourceBinding {
    /// Parse a dot-path; paths without a `.` have no binding
    pub fn parse(path: &str) -> Option<Self> {
        let (category, _) = path.split_once('.')?;
        let field = path.rsplit('.').next().unwrap_or_default();
        Some(Self {
            category: category.to_string(),
            field: field.to_string(),
        })
    }
}

impl MappingRule {
    /// Create a rule from a transform name
    ///
    /// Unrecognized names fall back to `linear` (see [`TransformKind::from_name`]).
    pub fn new(
        source_param: impl Into<String>,
        target_param: impl Into<String>,
        transform: &str,
        min_out: f64,
        max_out: f64,
    ) -> Self {
        Self::with_kind(
            source_param,
            target_param,
            TransformKind::from_name(transform),
            min_out,
            max_out,
        )
    }

    /// Create a rule with an already-resolved transform
    pub fn with_kind(
        source_param: impl Into<String>,
        target_param: impl Into<String>,
        transform: TransformKind,
        min_out: f64,
        max_out: f64,
    ) -> Self {
        let source_param = source_param.into();
        let target_param = target_param.into();

        // Both paths need a category separator, otherwise the rule never fires
        let binding = if target_param.contains('.') {
            SourceBinding::parse(&source_param)
        } else {
            None
        };

        Self {
            source_param,
            target_param,
            transform,
            min_out,
            max_out,
            binding,
        }
    }

    /// Linear rule over the unit range
    pub fn linear(source_param: impl Into<String>, target_param: impl Into<String>) -> Self {
        Self::with_kind(source_param, target_param, TransformKind::Linear, 0.0, 1.0)
    }

    pub fn source_param(&self) -> &str {
        &self.source_param
    }

    pub fn target_param(&self) -> &str {
        &self.target_param
    }

    pub fn transform(&self) -> TransformKind {
        self.transform
    }

    pub fn min_out(&self) -> f64 {
        self.min_out
    }

    pub fn max_out(&self) -> f64 {
        self.max_out
    }

    /// Parsed source path, `None` for malformed rules
    pub fn binding(&self) -> Option<&SourceBinding> {
        self.binding.as_ref()
    }

    /// Whether this rule can ever fire for a reading of `sensor_type`
    pub fn matches(&self, sensor_type: &str) -> bool {
        self.binding
            .as_ref()
            .is_some_and(|binding| binding.category == sensor_type)
    }
}
