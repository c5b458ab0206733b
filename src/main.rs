//! Command-line interface for fixture-gen
//!
//! # Usage Examples
//!
//! ## Full-graph values
//! ```bash
//! # Five players as JSON lines
//! fixture-gen generate --schema league.yaml --type player --count 5
//!
//! # Reproducible pretty output
//! fixture-gen generate --schema league.yaml --type team --seed 42 --pretty
//! ```
//!
//! ## Query results
//! ```bash
//! fixture-gen query --schema league.yaml \
//!   --query '{ teams { wins players { name } } }' --count 3
//!
//! fixture-gen query --schema league.yaml --query-file teams.graphql \
//!   --config limits.yaml
//! ```
//!
//! Set `RUST_LOG=fixture_generator=debug` to see compilation details.

use anyhow::Context;
use clap::{Parser, Subcommand};
use fixture_gen::output::write_values;
use fixture_gen::{GenerationOpts, SchemaOpts};
use query_parser::GraphqlSelectionParser;
use schema_core::{TypeKind, TypeRegistry};
use serde_json::Map;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fixture-gen")]
#[command(about = "A tool for generating random test fixtures from type schemas")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate values of one type
    Generate {
        /// Type to generate (enum, object or scalar name)
        #[arg(long = "type", value_name = "NAME")]
        type_name: String,

        #[command(flatten)]
        opts: GenerationOpts,
    },

    /// Generate query-result envelopes shaped by a query
    Query {
        /// Query text
        #[arg(long, conflicts_with = "query_file", required_unless_present = "query_file")]
        query: Option<String>,

        /// File containing the query text
        #[arg(long)]
        query_file: Option<PathBuf>,

        #[command(flatten)]
        opts: GenerationOpts,
    },

    /// List registered types and queries
    Types {
        #[command(flatten)]
        schema: SchemaOpts,
    },
}

fn main() -> anyhow::Result<()> {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { type_name, opts } => {
            let mut generator = opts.build_generator()?;
            let values = generator
                .values(&type_name, opts.count)
                .with_context(|| format!("Cannot generate type '{type_name}'"))?;
            write_values(&mut std::io::stdout().lock(), values, opts.pretty)?;
        }
        Commands::Query {
            query,
            query_file,
            opts,
        } => {
            let query = match (query, query_file) {
                (Some(query), _) => query,
                (None, Some(path)) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read query file: {}", path.display()))?,
                (None, None) => anyhow::bail!("Either --query or --query-file is required"),
            };
            let mut generator = opts.build_generator()?;
            let results = generator
                .query_results(&GraphqlSelectionParser, &query, &Map::new(), opts.count)
                .context("Failed to build query result generator")?;
            write_values(&mut std::io::stdout().lock(), results, opts.pretty)?;
        }
        Commands::Types { schema } => {
            let registry = TypeRegistry::new(schema.load_schema()?);
            registry.validate().context("Schema validation failed")?;
            for kind in [TypeKind::Enum, TypeKind::Object, TypeKind::Scalar, TypeKind::Query] {
                println!("{kind}:");
                for name in registry.names(kind) {
                    println!("  {name}");
                }
            }
        }
    }

    Ok(())
}
