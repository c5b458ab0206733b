//! Depth and width policy.
//!
//! Depth: an object type with budget `d` may appear at most `d + 1` times on
//! one recursive descent. Width: lists whose element type is `T` hold at most
//! `width(T)` elements.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use schema_core::TypeRegistry;

use crate::error::GeneratorError;

/// Depth budget for types without an explicit entry.
pub const DEFAULT_DEPTH: u32 = 1;

/// Policy as written in configuration files.
///
/// Values are signed so that negative input is reported as
/// [`GeneratorError::InvalidPolicy`] rather than as a parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyConfig {
    /// Depth budget for types not listed in `depth`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_depth: Option<i64>,

    /// Width for types not listed in `width`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_width: Option<i64>,

    /// Per object type depth budget
    #[serde(default)]
    pub depth: HashMap<String, i64>,

    /// Per element type list width
    #[serde(default)]
    pub width: HashMap<String, i64>,
}

/// Per-type recursion budgets and list widths.
#[derive(Debug, Clone)]
pub struct DepthWidthPolicy {
    default_depth: u32,
    default_width: Option<u32>,
    depth: HashMap<String, u32>,
    width: HashMap<String, u32>,
}

impl Default for DepthWidthPolicy {
    fn default() -> Self {
        Self {
            default_depth: DEFAULT_DEPTH,
            default_width: None,
            depth: HashMap::new(),
            width: HashMap::new(),
        }
    }
}

impl DepthWidthPolicy {
    /// Policy with default depth 1 and sampler-default widths.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from configuration, rejecting negative values.
    pub fn from_config(config: &PolicyConfig) -> Result<Self, GeneratorError> {
        let mut policy = Self::new();
        if let Some(depth) = config.default_depth {
            policy.default_depth = non_negative("depth", "*", depth)?;
        }
        if let Some(width) = config.default_width {
            policy.default_width = Some(non_negative("width", "*", width)?);
        }
        for (name, depth) in &config.depth {
            policy.depth.insert(name.clone(), non_negative("depth", name, *depth)?);
        }
        for (name, width) in &config.width {
            policy.width.insert(name.clone(), non_negative("width", name, *width)?);
        }
        Ok(policy)
    }

    /// Set the depth budget of one object type.
    pub fn with_depth(mut self, type_name: impl Into<String>, depth: u32) -> Self {
        self.depth.insert(type_name.into(), depth);
        self
    }

    /// Set the width limit for lists of one element type.
    pub fn with_width(mut self, type_name: impl Into<String>, width: u32) -> Self {
        self.width.insert(type_name.into(), width);
        self
    }

    /// Set the depth budget for unlisted types.
    pub fn with_default_depth(mut self, depth: u32) -> Self {
        self.default_depth = depth;
        self
    }

    /// Set the width limit for unlisted types.
    pub fn with_default_width(mut self, width: u32) -> Self {
        self.default_width = Some(width);
        self
    }

    /// Configured depth budget of a type.
    pub fn depth_budget(&self, type_name: &str) -> u32 {
        self.depth
            .get(type_name)
            .copied()
            .unwrap_or(self.default_depth)
    }

    /// How many more times `type_name` may be entered below `path`.
    ///
    /// `path` lists the object types already entered on the current descent,
    /// outermost first.
    pub fn remaining_depth<S: AsRef<str>>(&self, type_name: &str, path: &[S]) -> u32 {
        let occurrences = path.iter().filter(|p| p.as_ref() == type_name).count();
        let allowed = self.depth_budget(type_name).saturating_add(1);
        allowed.saturating_sub(u32::try_from(occurrences).unwrap_or(u32::MAX))
    }

    /// Whether `type_name` may be entered below `path`.
    pub fn may_enter<S: AsRef<str>>(&self, type_name: &str, path: &[S]) -> bool {
        self.remaining_depth(type_name, path) > 0
    }

    /// Maximum list length for lists of `type_name`; `None` defers to the sampler.
    pub fn max_width(&self, type_name: &str) -> Option<u32> {
        self.width.get(type_name).copied().or(self.default_width)
    }

    /// Log policy entries that name no type in the registry.
    pub fn warn_unknown_names(&self, registry: &TypeRegistry) {
        for name in self.depth.keys() {
            if registry.object(name).is_err() {
                tracing::warn!(type_name = %name, "depth configured for a name that is not an object type");
            }
        }
        for name in self.width.keys() {
            if registry.classify(name).is_err() {
                tracing::warn!(type_name = %name, "width configured for a name that is not a type");
            }
        }
    }
}

fn non_negative(kind: &'static str, name: &str, value: i64) -> Result<u32, GeneratorError> {
    u32::try_from(value).map_err(|_| GeneratorError::InvalidPolicy {
        kind,
        name: name.to_string(),
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_depth_allows_one_reentry() {
        let policy = DepthWidthPolicy::new();
        let empty: [&str; 0] = [];

        assert_eq!(policy.remaining_depth("team", &empty), 2);
        assert_eq!(policy.remaining_depth("team", &["team"]), 1);
        assert!(policy.may_enter("team", &["team", "player"]));
        assert!(!policy.may_enter("team", &["team", "player", "team", "player"]));
    }

    #[test]
    fn test_zero_depth_forbids_reentry() {
        let policy = DepthWidthPolicy::new().with_depth("team", 0);
        let empty: [&str; 0] = [];

        assert!(policy.may_enter("team", &empty));
        assert!(!policy.may_enter("team", &["team"]));
        // other types keep the default
        assert!(policy.may_enter("player", &["player"]));
    }

    #[test]
    fn test_indirect_reentry_counts() {
        let policy = DepthWidthPolicy::new().with_depth("a", 1);
        assert_eq!(policy.remaining_depth("a", &["a", "b", "c"]), 1);
        assert_eq!(policy.remaining_depth("a", &["a", "b", "c", "a", "b"]), 0);
    }

    #[test]
    fn test_max_width() {
        let policy = DepthWidthPolicy::new().with_width("player", 2);
        assert_eq!(policy.max_width("player"), Some(2));
        assert_eq!(policy.max_width("team"), None);

        let policy = policy.with_default_width(4);
        assert_eq!(policy.max_width("team"), Some(4));
        assert_eq!(policy.max_width("player"), Some(2));
    }

    #[test]
    fn test_from_config() {
        let config: PolicyConfig = serde_yaml::from_str(
            r#"
default_depth: 2
depth:
  team: 0
width:
  player: 3
"#,
        )
        .unwrap();
        let policy = DepthWidthPolicy::from_config(&config).unwrap();

        assert_eq!(policy.depth_budget("team"), 0);
        assert_eq!(policy.depth_budget("player"), 2);
        assert_eq!(policy.max_width("player"), Some(3));
    }

    #[test]
    fn test_unknown_config_key_rejected() {
        let result = serde_yaml::from_str::<PolicyConfig>("widht:\n  player: 3\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_negative_values_rejected() {
        let mut config = PolicyConfig::default();
        config.depth.insert("team".to_string(), -1);
        assert!(matches!(
            DepthWidthPolicy::from_config(&config),
            Err(GeneratorError::InvalidPolicy { kind: "depth", ref name, value: -1 }) if name == "team"
        ));

        let config = PolicyConfig {
            default_width: Some(-3),
            ..PolicyConfig::default()
        };
        assert!(matches!(
            DepthWidthPolicy::from_config(&config),
            Err(GeneratorError::InvalidPolicy { kind: "width", value: -3, .. })
        ));
    }
}
