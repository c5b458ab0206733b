//! Fixture generator: compiles schemas into random value strategies.
//!
//! This crate turns a [`Schema`](schema_core::Schema) into [`Strategy`]
//! descriptors and draws values from them. Cyclic object graphs are bounded
//! by a per-type depth budget; list lengths by a per-element-type width.
//!
//! # Architecture
//!
//! ```text
//! Schema ──► GeneratorCompiler ──► CompiledGenerators ──► Sampler ──► serde_json::Value
//!   │              ▲    ▲                 │
//!   │   DepthWidthPolicy  ScalarGeneratorResolver
//!   │                                     ▼
//!   └── query text ──► QueryParser ──► QueryProjector ──► { "data": { ... } }
//! ```
//!
//! # Example
//!
//! ```rust
//! use fixture_generator::{compile, DepthWidthPolicy, FixtureGenerator, ScalarGeneratorResolver};
//! use schema_core::Schema;
//!
//! let schema = Schema::from_yaml(r#"
//! objects:
//!   team:
//!     fields:
//!       name: { type: String }
//!       players: { type: [player] }
//!   player:
//!     fields:
//!       name: { type: String }
//!       team: { type: team }
//! "#).unwrap();
//!
//! let policy = DepthWidthPolicy::new().with_width("player", 2);
//! let compiled = compile(&schema, &policy, &ScalarGeneratorResolver::new()).unwrap();
//!
//! let mut generator = FixtureGenerator::new(compiled, 42);
//! let team = generator.next_value("team").unwrap();
//! assert!(team["players"].as_array().unwrap().len() <= 2);
//! ```
//!
//! # Strategies
//!
//! Built-in scalars: `Int`, `Float`, `String`, `Boolean`, `ID`. Custom
//! scalars need an override, supplied as a [`Strategy`] or from configuration
//! as a [`ScalarStrategyConfig`]:
//!
//! - `int_range` - Random integers in a range
//! - `float_range` - Random floats in a range
//! - `weighted_bool` - Boolean with configurable true probability
//! - `one_of` - Random selection from a list
//! - `static` - Static value
//! - `text` - Random text up to a length
//! - `uuid_v4` - Random UUID v4 strings

pub mod compiler;
pub mod error;
pub mod generator;
pub mod generators;
pub mod policy;
pub mod projector;
pub mod sampler;
pub mod scalars;
pub mod strategy;

// Re-exports for convenience
pub use compiler::{compile, CompiledGenerators, GeneratorCompiler};
pub use error::GeneratorError;
pub use generator::{FixtureGenerator, ValueIterator};
pub use policy::{DepthWidthPolicy, PolicyConfig, DEFAULT_DEPTH};
pub use projector::{query_result, QueryProjector, TYPENAME_FIELD};
pub use sampler::{RandSampler, Sampler, DEFAULT_MAX_LIST_LEN};
pub use scalars::{ScalarGeneratorResolver, ScalarStrategyConfig};
pub use strategy::{CustomStrategy, RecordField, Strategy};
