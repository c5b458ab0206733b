//! Scalar strategies: built-in defaults plus caller overrides.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::GeneratorError;
use crate::generators::static_value::yaml_to_json_value;
use crate::strategy::Strategy;

/// Bound for the default `Int` strategy (both signs).
pub const DEFAULT_INT_BOUND: i64 = 1_000_000;

/// Bound for the default `Float` strategy (both signs).
pub const DEFAULT_FLOAT_BOUND: f64 = 1_000_000.0;

/// Upper length for the default `String` strategy.
pub const DEFAULT_TEXT_MAX_LEN: usize = 16;

/// Scalar strategy as written in configuration files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScalarStrategyConfig {
    /// Random integers in a range
    IntRange {
        /// Minimum value (inclusive)
        min: i64,
        /// Maximum value (inclusive)
        max: i64,
    },

    /// Random floats in a range
    FloatRange {
        /// Minimum value (inclusive)
        min: f64,
        /// Maximum value (inclusive)
        max: f64,
    },

    /// Boolean with configurable true probability
    WeightedBool {
        /// Weight for true value (0.0 to 1.0)
        true_weight: f64,
    },

    /// Random selection from a pool of values
    OneOf { values: Vec<serde_yaml::Value> },

    /// Always the same value
    Static { value: serde_yaml::Value },

    /// Random text
    Text {
        #[serde(default = "default_text_max_len")]
        max_length: usize,
    },

    /// UUID v4 strings
    UuidV4,
}

fn default_text_max_len() -> usize {
    DEFAULT_TEXT_MAX_LEN
}

impl ScalarStrategyConfig {
    /// Convert to a strategy descriptor.
    pub fn to_strategy(&self) -> Strategy {
        match self {
            ScalarStrategyConfig::IntRange { min, max } => Strategy::IntRange {
                min: *min,
                max: *max,
            },
            ScalarStrategyConfig::FloatRange { min, max } => Strategy::FloatRange {
                min: *min,
                max: *max,
            },
            ScalarStrategyConfig::WeightedBool { true_weight } => Strategy::WeightedBool {
                true_weight: *true_weight,
            },
            ScalarStrategyConfig::OneOf { values } => {
                Strategy::OneOf(values.iter().map(yaml_to_json_value).collect())
            }
            ScalarStrategyConfig::Static { value } => Strategy::Constant(yaml_to_json_value(value)),
            ScalarStrategyConfig::Text { max_length } => Strategy::Text {
                max_len: *max_length,
            },
            ScalarStrategyConfig::UuidV4 => Strategy::UuidV4,
        }
    }
}

/// Maps scalar names to strategies.
///
/// Overrides win over built-ins and are the only source for custom scalars.
#[derive(Debug, Clone, Default)]
pub struct ScalarGeneratorResolver {
    overrides: HashMap<String, Strategy>,
}

impl ScalarGeneratorResolver {
    /// Resolver with built-in strategies only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver with overrides taken from configuration.
    pub fn from_config<'a, I>(configs: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a ScalarStrategyConfig)>,
    {
        let overrides = configs
            .into_iter()
            .map(|(name, config)| (name.clone(), config.to_strategy()))
            .collect();
        Self { overrides }
    }

    /// Add or replace the strategy for a scalar name.
    pub fn with_override(mut self, name: impl Into<String>, strategy: Strategy) -> Self {
        self.overrides.insert(name.into(), strategy);
        self
    }

    /// Whether a strategy exists for `name` (override or built-in).
    pub fn has_strategy(&self, name: &str) -> bool {
        self.overrides.contains_key(name) || builtin_strategy(name).is_some()
    }

    /// Names with an override, sorted.
    pub fn override_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.overrides.keys().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Strategy for a scalar name.
    pub fn strategy_for(&self, name: &str) -> Result<Strategy, GeneratorError> {
        if let Some(strategy) = self.overrides.get(name) {
            strategy
                .validate()
                .map_err(|reason| GeneratorError::InvalidScalarStrategy {
                    name: name.to_string(),
                    reason,
                })?;
            return Ok(strategy.clone());
        }
        builtin_strategy(name).ok_or_else(|| GeneratorError::MissingScalarStrategy(name.to_string()))
    }
}

/// Default strategy for a built-in scalar name.
pub fn builtin_strategy(name: &str) -> Option<Strategy> {
    let strategy = match name {
        "Int" => Strategy::IntRange {
            min: -DEFAULT_INT_BOUND,
            max: DEFAULT_INT_BOUND,
        },
        "Float" => Strategy::FloatRange {
            min: -DEFAULT_FLOAT_BOUND,
            max: DEFAULT_FLOAT_BOUND,
        },
        "String" => Strategy::Text {
            max_len: DEFAULT_TEXT_MAX_LEN,
        },
        "Boolean" => Strategy::Bool,
        "ID" => Strategy::UuidV4,
        _ => return None,
    };
    Some(strategy)
}
