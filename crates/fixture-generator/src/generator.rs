//! Seeded fixture generator over compiled strategies.

use serde_json::{Map, Value};
use std::sync::Arc;

use schema_core::QueryParser;

use crate::compiler::CompiledGenerators;
use crate::error::GeneratorError;
use crate::projector::query_result;
use crate::sampler::{RandSampler, Sampler};
use crate::strategy::Strategy;

/// Fixture generator that produces deterministic values.
///
/// The generator pairs compiled strategies with a seeded sampler so the same
/// seed, schema and call sequence reproduce the same fixtures.
pub struct FixtureGenerator {
    /// Compiled strategies for the schema
    compiled: CompiledGenerators,
    /// Seeded sampler
    sampler: RandSampler,
    /// Values drawn so far
    drawn: u64,
}

impl FixtureGenerator {
    /// Create a new generator with the given compiled schema and seed.
    pub fn new(compiled: CompiledGenerators, seed: u64) -> Self {
        Self::with_sampler(compiled, RandSampler::seeded(seed))
    }

    /// Create a generator with a preconfigured sampler.
    pub fn with_sampler(compiled: CompiledGenerators, sampler: RandSampler) -> Self {
        Self {
            compiled,
            sampler,
            drawn: 0,
        }
    }

    /// Number of values drawn so far.
    pub fn drawn(&self) -> u64 {
        self.drawn
    }

    /// Get a reference to the compiled strategies.
    pub fn compiled(&self) -> &CompiledGenerators {
        &self.compiled
    }

    /// Draw one value of the named type.
    pub fn next_value(&mut self, type_name: &str) -> Result<Value, GeneratorError> {
        let strategy = self.compiled.generator(type_name)?;
        Ok(self.sample(&strategy))
    }

    /// Draw `count` values of the named type lazily.
    pub fn values(&mut self, type_name: &str, count: u64) -> Result<ValueIterator<'_>, GeneratorError> {
        let strategy = self.compiled.generator(type_name)?;
        Ok(ValueIterator {
            generator: self,
            strategy,
            remaining: count,
        })
    }

    /// Draw `count` query-result envelopes for `query`.
    pub fn query_results<P: QueryParser>(
        &mut self,
        parser: &P,
        query: &str,
        variables: &Map<String, Value>,
        count: u64,
    ) -> Result<Vec<Value>, GeneratorError> {
        let strategy = query_result(&self.compiled, parser, query, variables)?;
        Ok((0..count).map(|_| self.sample(&strategy)).collect())
    }

    /// Draw one value from any strategy.
    pub fn sample(&mut self, strategy: &Strategy) -> Value {
        self.drawn += 1;
        self.sampler.sample(strategy)
    }
}

/// Iterator that lazily draws values of one type.
pub struct ValueIterator<'a> {
    generator: &'a mut FixtureGenerator,
    strategy: Arc<Strategy>,
    remaining: u64,
}

impl Iterator for ValueIterator<'_> {
    type Item = Value;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        self.remaining -= 1;
        Some(self.generator.sample(&self.strategy))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ValueIterator<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile;
    use crate::policy::DepthWidthPolicy;
    use crate::scalars::ScalarGeneratorResolver;
    use query_parser::GraphqlSelectionParser;
    use schema_core::Schema;

    fn test_schema() -> Schema {
        let yaml = r#"
enums:
  position:
    values: [goalkeeper, defence, attack]
objects:
  player:
    fields:
      name: { type: String }
      age: { type: Int }
      position: { type: position }
queries:
  players:
    type: [player]
"#;
        Schema::from_yaml(yaml).unwrap()
    }

    fn generator(seed: u64) -> FixtureGenerator {
        let compiled = compile(
            &test_schema(),
            &DepthWidthPolicy::new(),
            &ScalarGeneratorResolver::new(),
        )
        .unwrap();
        FixtureGenerator::new(compiled, seed)
    }

    #[test]
    fn test_next_value() {
        let mut generator = generator(42);
        let player = generator.next_value("player").unwrap();

        let record = player.as_object().unwrap();
        assert!(record["name"].is_string());
        assert!(record["age"].is_i64());
        assert!(record["position"].is_string());
        assert_eq!(generator.drawn(), 1);
    }

    #[test]
    fn test_deterministic_generation() {
        let mut gen1 = generator(42);
        let mut gen2 = generator(42);

        let first: Vec<Value> = gen1.values("player", 5).unwrap().collect();
        let second: Vec<Value> = gen2.values("player", 5).unwrap().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_values_iterator_len() {
        let mut generator = generator(42);
        let iter = generator.values("position", 7).unwrap();
        assert_eq!(iter.len(), 7);
        assert_eq!(iter.count(), 7);
        assert_eq!(generator.drawn(), 7);
    }

    #[test]
    fn test_type_not_found() {
        let mut generator = generator(42);
        let result = generator.next_value("coach");
        assert!(matches!(result, Err(GeneratorError::Schema(_))));
    }

    #[test]
    fn test_query_results() {
        let mut generator = generator(42);
        let results = generator
            .query_results(
                &GraphqlSelectionParser,
                "{ players { name } }",
                &Map::new(),
                3,
            )
            .unwrap();

        assert_eq!(results.len(), 3);
        for result in results {
            for player in result["data"]["players"].as_array().unwrap() {
                let keys: Vec<&String> = player.as_object().unwrap().keys().collect();
                assert_eq!(keys, vec!["name"]);
            }
        }
    }
}
