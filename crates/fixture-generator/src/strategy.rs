//! Strategy descriptors.
//!
//! A [`Strategy`] describes how to draw a value; it never holds random
//! state. Compiled strategies share sub-strategies through `Arc`, so a
//! compiled schema is an acyclic graph that can be sampled from many
//! threads at once.

use rand::RngCore;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Closure-backed strategy for values no built-in variant can describe.
#[derive(Clone)]
pub struct CustomStrategy(Arc<dyn Fn(&mut dyn RngCore) -> Value + Send + Sync>);

impl CustomStrategy {
    /// Draw a value.
    pub fn draw(&self, rng: &mut dyn RngCore) -> Value {
        (self.0)(rng)
    }
}

impl fmt::Debug for CustomStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomStrategy(..)")
    }
}

/// One keyed entry of a record strategy.
#[derive(Debug, Clone)]
pub struct RecordField {
    /// Output key (field name or alias)
    pub key: String,
    pub strategy: Arc<Strategy>,
}

impl RecordField {
    pub fn new(key: impl Into<String>, strategy: Arc<Strategy>) -> Self {
        Self {
            key: key.into(),
            strategy,
        }
    }
}

/// How to draw a value of some shape.
#[derive(Debug, Clone)]
pub enum Strategy {
    /// Always the same value
    Constant(Value),

    /// Integer in a range (inclusive)
    IntRange { min: i64, max: i64 },

    /// Float in a range (inclusive)
    FloatRange { min: f64, max: f64 },

    /// Fair coin
    Bool,

    /// Boolean with configurable true probability
    WeightedBool { true_weight: f64 },

    /// String of up to `max_len` characters, possibly empty
    Text { max_len: usize },

    /// UUID v4 rendered as a string
    UuidV4,

    /// Uniform choice from a fixed set
    OneOf(Vec<Value>),

    /// Sequence of independently drawn elements.
    ///
    /// `max_len` of `None` defers to the sampler's default length
    /// distribution. Length 0 is always possible.
    List {
        element: Arc<Strategy>,
        max_len: Option<u32>,
    },

    /// Record drawing each field in order
    Record(Vec<RecordField>),

    /// Caller-supplied closure
    Custom(CustomStrategy),
}

impl Strategy {
    /// Strategy backed by a closure.
    ///
    /// ```
    /// use fixture_generator::Strategy;
    /// use serde_json::json;
    ///
    /// let answer = Strategy::custom(|_rng| json!(42));
    /// ```
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&mut dyn RngCore) -> Value + Send + Sync + 'static,
    {
        Strategy::Custom(CustomStrategy(Arc::new(f)))
    }

    /// Constant empty list.
    pub fn empty_list() -> Self {
        Strategy::Constant(Value::Array(Vec::new()))
    }

    /// List of `element` with an optional length cap.
    pub fn list(element: Arc<Strategy>, max_len: Option<u32>) -> Self {
        match max_len {
            Some(0) => Strategy::empty_list(),
            _ => Strategy::List { element, max_len },
        }
    }

    /// The query-result envelope: `{ "data": { ... } }`.
    pub fn envelope(fields: Vec<RecordField>) -> Self {
        Strategy::Record(vec![RecordField::new(
            "data",
            Arc::new(Strategy::Record(fields)),
        )])
    }

    /// Output keys of a record strategy, in draw order.
    pub fn record_keys(&self) -> Option<Vec<&str>> {
        match self {
            Strategy::Record(fields) => Some(fields.iter().map(|f| f.key.as_str()).collect()),
            _ => None,
        }
    }

    /// Check that the strategy can be sampled without panicking.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Strategy::IntRange { min, max } if min > max => {
                Err(format!("int range min {min} is greater than max {max}"))
            }
            Strategy::FloatRange { min, max } if !(min.is_finite() && max.is_finite()) => {
                Err("float range bounds must be finite".to_string())
            }
            Strategy::FloatRange { min, max } if min > max => {
                Err(format!("float range min {min} is greater than max {max}"))
            }
            Strategy::FloatRange { min, max } if !(max - min).is_finite() => {
                Err(format!("float range {min}..={max} is wider than f64 can represent"))
            }
            Strategy::WeightedBool { true_weight } if !(0.0..=1.0).contains(true_weight) => {
                Err(format!("true_weight {true_weight} is outside 0.0..=1.0"))
            }
            Strategy::OneOf(values) if values.is_empty() => {
                Err("one_of needs at least one value".to_string())
            }
            Strategy::List { element, .. } => element.validate(),
            Strategy::Record(fields) => fields.iter().try_for_each(|f| f.strategy.validate()),
            _ => Ok(()),
        }
    }
}
