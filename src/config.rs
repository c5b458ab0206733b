//! Generation config file format.
//!
//! ```yaml
//! seed: 42
//! default_depth: 1
//! default_width: 3
//! depth:
//!   team: 0
//! width:
//!   player: 2
//! scalars:
//!   Date:
//!     type: one_of
//!     values: ["2024-01-01", "2024-06-30"]
//! ```

use anyhow::Context;
use fixture_generator::{
    DepthWidthPolicy, GeneratorError, PolicyConfig, ScalarGeneratorResolver, ScalarStrategyConfig,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Seed used when neither the command line nor the config names one.
pub const DEFAULT_SEED: u64 = 0;

/// Depth, width, scalar and seed settings for one generation run.
///
/// Unknown keys are rejected so a misspelled limit fails loudly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerationConfig {
    /// Seed for reproducible output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Depth budget for object types not listed in `depth`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_depth: Option<i64>,

    /// Width for element types not listed in `width`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_width: Option<i64>,

    /// Per object type depth budget
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub depth: HashMap<String, i64>,

    /// Per element type list width
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub width: HashMap<String, i64>,

    /// Strategies for custom (or overridden built-in) scalars
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub scalars: IndexMap<String, ScalarStrategyConfig>,
}

impl GenerationConfig {
    /// Load config from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Depth and width limits as written.
    pub fn policy_config(&self) -> PolicyConfig {
        PolicyConfig {
            default_depth: self.default_depth,
            default_width: self.default_width,
            depth: self.depth.clone(),
            width: self.width.clone(),
        }
    }

    /// Validated depth and width policy.
    pub fn depth_width_policy(&self) -> Result<DepthWidthPolicy, GeneratorError> {
        DepthWidthPolicy::from_config(&self.policy_config())
    }

    /// Scalar resolver with the configured overrides.
    pub fn scalar_resolver(&self) -> ScalarGeneratorResolver {
        ScalarGeneratorResolver::from_config(&self.scalars)
    }

    /// Seed to use, preferring an explicit override.
    pub fn resolve_seed(&self, explicit: Option<u64>) -> u64 {
        explicit.or(self.seed).unwrap_or(DEFAULT_SEED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
seed: 7
default_depth: 2
default_width: 4
depth:
  team: 0
width:
  player: 2
scalars:
  Date:
    type: one_of
    values: ["2024-01-01"]
  Score:
    type: int_range
    min: 0
    max: 10
"#;
        let config = GenerationConfig::from_yaml(yaml).unwrap();

        assert_eq!(config.seed, Some(7));
        assert_eq!(config.default_depth, Some(2));
        assert_eq!(config.depth.get("team"), Some(&0));
        assert_eq!(
            config.scalars.keys().collect::<Vec<_>>(),
            vec!["Date", "Score"]
        );

        let policy = config.depth_width_policy().unwrap();
        assert_eq!(policy.depth_budget("team"), 0);
        assert_eq!(policy.depth_budget("player"), 2);
        assert_eq!(policy.max_width("player"), Some(2));
        assert_eq!(policy.max_width("team"), Some(4));

        let resolver = config.scalar_resolver();
        assert!(resolver.has_strategy("Date"));
        assert!(resolver.has_strategy("Score"));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = GenerationConfig::from_yaml("{}").unwrap();
        assert!(config.scalars.is_empty());
        assert_eq!(config.resolve_seed(None), DEFAULT_SEED);
        assert_eq!(config.resolve_seed(Some(9)), 9);
    }

    #[test]
    fn test_negative_depth_rejected() {
        let config = GenerationConfig::from_yaml("depth:\n  team: -2\n").unwrap();
        assert!(matches!(
            config.depth_width_policy(),
            Err(GeneratorError::InvalidPolicy { kind: "depth", value: -2, .. })
        ));
    }

    #[test]
    fn test_misspelled_key_rejected() {
        for yaml in ["widht:\n  player: 2\n", "depht:\n  team: 0\n", "default_dept: 3\n"] {
            let err = GenerationConfig::from_yaml(yaml).unwrap_err();
            assert!(err.to_string().contains("unknown field"), "{yaml}: {err}");
        }
    }

    #[test]
    fn test_unknown_scalar_strategy_type_rejected() {
        let result = GenerationConfig::from_yaml("scalars:\n  Date:\n    type: calendar\n");
        assert!(result.is_err());
    }
}
