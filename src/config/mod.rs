//! Configuration loading and validation

mod schema;

pub use schema::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Bundled presets: (name, YAML)
pub const PRESETS: &[(&str, &str)] = &[
    ("depth_field", include_str!("../../presets/depth_field.yaml")),
    ("lidar_orbit", include_str!("../../presets/lidar_orbit.yaml")),
    ("motion_trace", include_str!("../../presets/motion_trace.yaml")),
];

/// Look up a bundled preset by name
pub fn preset(name: &str) -> Option<&'static str> {
    PRESETS
        .iter()
        .find(|(preset_name, _)| *preset_name == name)
        .map(|(_, yaml)| *yaml)
}

/// Load and validate configuration from a YAML file
pub fn load_config(path: &Path) -> Result<InstallationConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {:?}", path))?;
    let config = load_config_from_str(&contents)
        .with_context(|| format!("failed to parse config file {:?}", path))?;
    config.validate()?;
    Ok(config)
}

/// Parse configuration from YAML text without validating it
pub fn load_config_from_str(yaml: &str) -> Result<InstallationConfig> {
    let config: InstallationConfig = serde_yaml::from_str(yaml)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::TransformKind;
    use crate::output::OutputCategory;
    use crate::render::RendererKind;
    use crate::sensors::SensorKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_minimal_config() {
        let yaml = r#"
name: Minimal
sensors:
  - type: motion
    noise: 0.0
mappings:
  - source: motion.magnitude
    target: visual.brightness
outputs:
  - type: visual
"#;
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.name, "Minimal");
        assert_eq!(config.sensors[0].kind, SensorKind::Motion);
        assert_eq!(config.renderer, RendererKind::Terminal);
        assert_eq!(config.tick_rate, 30);
        assert_eq!(config.smooth_alpha, 0.15);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_config(Path::new("/nonexistent/installation.yaml")).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }

    #[test]
    fn test_load_invalid_config_fails_validation() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"name: Empty\n").unwrap();

        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid configuration"));
    }

    #[test]
    fn test_non_mapping_yaml_rejected() {
        assert!(load_config_from_str("- just\n- a list\n").is_err());
    }

    #[test]
    fn test_unknown_output_type_rejected() {
        let yaml = "outputs:\n  - type: haptic\n";
        assert!(load_config_from_str(yaml).is_err());
    }

    #[test]
    fn test_bundled_presets_are_valid() {
        for (name, yaml) in PRESETS {
            let config = load_config_from_str(yaml).unwrap();
            assert!(config.problems().is_empty(), "preset {name}: {:?}", config.problems());
        }
    }

    #[test]
    fn test_depth_field_preset() {
        let config = load_config_from_str(preset("depth_field").unwrap()).unwrap();
        assert_eq!(config.sensors[0].kind, SensorKind::Depth);
        assert!(config
            .mappings
            .iter()
            .any(|m| m.transform == TransformKind::Smooth.name()));
        assert!(config.outputs.iter().any(|o| o.kind == OutputCategory::Spatial));
        assert!(preset("nope").is_none());
    }
}
