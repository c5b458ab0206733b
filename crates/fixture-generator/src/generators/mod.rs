//! Value generators for each leaf strategy.
//!
//! The sampler delegates leaf draws here; composite strategies (lists and
//! records) are assembled by the sampler itself.

pub mod primitive;
pub mod static_value;
pub mod text;
