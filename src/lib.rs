//! fixture-gen library
//!
//! Command-line plumbing around the schema compiler: option structs shared by
//! the subcommands, the generation config file format, and JSON output.
//!
//! # Crates
//!
//! - `schema_core` - schema model, type registry, selection sets
//! - `query_parser` - selection-set parser for query text
//! - `fixture_generator` - strategy compiler, query projector, sampler
//!
//! # CLI Usage
//!
//! ```bash
//! # Five players as JSON lines
//! fixture-gen generate --schema league.yaml --type player --count 5
//!
//! # Query results with depth and width limits from a config file
//! fixture-gen query --schema league.yaml --config limits.yaml \
//!   --query '{ teams { wins players { name } } }'
//!
//! # Registered types by kind
//! fixture-gen types --schema league.yaml
//! ```

use anyhow::Context;
use clap::Parser;
use fixture_generator::{compile, FixtureGenerator};
use schema_core::Schema;
use std::path::PathBuf;

pub mod config;
pub mod output;

pub use config::{GenerationConfig, DEFAULT_SEED};

#[derive(Parser, Clone, Debug)]
pub struct SchemaOpts {
    /// Schema file (YAML or JSON)
    #[arg(long, env = "FIXTURE_GEN_SCHEMA")]
    pub schema: PathBuf,
}

impl SchemaOpts {
    pub fn load_schema(&self) -> anyhow::Result<Schema> {
        Schema::from_file(&self.schema)
            .with_context(|| format!("Failed to load schema: {}", self.schema.display()))
    }
}

#[derive(Parser, Clone, Debug)]
pub struct GenerationOpts {
    #[command(flatten)]
    pub schema: SchemaOpts,

    /// Generation config file (depth, width, scalars, seed)
    #[arg(long, env = "FIXTURE_GEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Random seed (overrides the config seed)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of values to generate
    #[arg(long, default_value = "1")]
    pub count: u64,

    /// Print one pretty JSON array instead of JSON lines
    #[arg(long)]
    pub pretty: bool,
}

impl GenerationOpts {
    /// Load the config file, or the defaults when none is given.
    pub fn load_config(&self) -> anyhow::Result<GenerationConfig> {
        match &self.config {
            Some(path) => GenerationConfig::from_file(path),
            None => Ok(GenerationConfig::default()),
        }
    }

    /// Load schema and config, compile, and seed a generator.
    pub fn build_generator(&self) -> anyhow::Result<FixtureGenerator> {
        let schema = self.schema.load_schema()?;
        let config = self.load_config()?;
        build_generator(&schema, &config, self.seed)
    }
}

/// Compile `schema` under `config` and seed a generator.
pub fn build_generator(
    schema: &Schema,
    config: &GenerationConfig,
    seed: Option<u64>,
) -> anyhow::Result<FixtureGenerator> {
    let policy = config
        .depth_width_policy()
        .context("Invalid depth/width configuration")?;
    let scalars = config.scalar_resolver();
    let compiled = compile(schema, &policy, &scalars).context("Failed to compile schema")?;

    let seed = config.resolve_seed(seed);
    tracing::info!(
        seed,
        types = compiled.type_names().len(),
        queries = compiled.query_names().len(),
        "Compiled schema"
    );
    Ok(FixtureGenerator::new(compiled, seed))
}
