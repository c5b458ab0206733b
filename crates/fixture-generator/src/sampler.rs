//! Sampling: drawing concrete values from strategies.
//!
//! [`Sampler`] is the capability the rest of the crate is written against;
//! [`RandSampler`] is the seeded implementation over `rand`.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde_json::{Map, Value};

use crate::generators::{primitive, text};
use crate::strategy::Strategy;

/// Default upper bound for lists without a width limit.
pub const DEFAULT_MAX_LIST_LEN: u32 = 5;

/// Draws values from strategies.
pub trait Sampler {
    /// Draw one value.
    fn sample(&mut self, strategy: &Strategy) -> Value;

    /// Draw `count` independent values.
    fn sample_n(&mut self, strategy: &Strategy, count: usize) -> Vec<Value> {
        (0..count).map(|_| self.sample(strategy)).collect()
    }
}

/// Sampler over any `rand` RNG.
///
/// With [`RandSampler::seeded`] the same seed, strategy and call sequence
/// always produce the same values.
pub struct RandSampler<R = StdRng> {
    rng: R,
    default_max_list_len: u32,
}

impl RandSampler<StdRng> {
    /// Create a sampler with a seeded `StdRng`.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandSampler<R> {
    /// Create a sampler over the given RNG.
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            default_max_list_len: DEFAULT_MAX_LIST_LEN,
        }
    }

    /// Set the upper bound for lists without a width limit.
    pub fn with_default_max_list_len(mut self, max_len: u32) -> Self {
        self.default_max_list_len = max_len;
        self
    }

    fn draw(&mut self, strategy: &Strategy) -> Value {
        match strategy {
            Strategy::Constant(value) => value.clone(),

            Strategy::IntRange { min, max } => {
                primitive::generate_int_range(&mut self.rng, *min, *max)
            }

            Strategy::FloatRange { min, max } => {
                primitive::generate_float_range(&mut self.rng, *min, *max)
            }

            Strategy::Bool => Value::Bool(self.rng.gen()),

            Strategy::WeightedBool { true_weight } => {
                primitive::generate_weighted_bool(&mut self.rng, *true_weight)
            }

            Strategy::Text { max_len } => text::generate_text(&mut self.rng, *max_len),

            Strategy::UuidV4 => primitive::generate_uuid_v4(&mut self.rng),

            Strategy::OneOf(values) => values
                .choose(&mut self.rng)
                .cloned()
                .unwrap_or(Value::Null),

            Strategy::List { element, max_len } => {
                let max_len = max_len.unwrap_or(self.default_max_list_len);
                let len = self.rng.gen_range(0..=max_len);
                Value::Array((0..len).map(|_| self.draw(element)).collect())
            }

            Strategy::Record(fields) => {
                let mut record = Map::with_capacity(fields.len());
                for field in fields {
                    let value = self.draw(&field.strategy);
                    record.insert(field.key.clone(), value);
                }
                Value::Object(record)
            }

            Strategy::Custom(custom) => custom.draw(&mut self.rng),
        }
    }
}

impl<R: Rng> Sampler for RandSampler<R> {
    fn sample(&mut self, strategy: &Strategy) -> Value {
        self.draw(strategy)
    }
}
