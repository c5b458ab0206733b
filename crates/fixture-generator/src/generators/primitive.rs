//! Number, boolean and identifier generators.

use rand::Rng;
use serde_json::Value;
use uuid::Builder;

/// Integer drawn uniformly from `min..=max`.
pub fn generate_int_range<R: Rng>(rng: &mut R, min: i64, max: i64) -> Value {
    Value::from(rng.gen_range(min..=max))
}

/// Float drawn uniformly from `min..=max`.
pub fn generate_float_range<R: Rng>(rng: &mut R, min: f64, max: f64) -> Value {
    Value::from(rng.gen_range(min..=max))
}

/// Boolean that is `true` with probability `true_weight`.
pub fn generate_weighted_bool<R: Rng>(rng: &mut R, true_weight: f64) -> Value {
    Value::Bool(rng.gen_bool(true_weight))
}

/// Hyphenated UUID v4 built from RNG bytes, so seeded runs repeat.
pub fn generate_uuid_v4<R: Rng>(rng: &mut R) -> Value {
    let uuid = Builder::from_random_bytes(rng.gen()).into_uuid();
    Value::String(uuid.hyphenated().to_string())
}
