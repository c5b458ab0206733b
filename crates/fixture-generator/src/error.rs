//! Error type for compilation, projection and generation.

use schema_core::SchemaError;

/// Error type for generator operations.
///
/// Every variant is raised while compiling or projecting, never while
/// sampling.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// Unknown or ambiguous type, unknown query, malformed schema
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Custom scalar reached without a supplied strategy
    #[error("No generation strategy for custom scalar '{0}'")]
    MissingScalarStrategy(String),

    /// Supplied scalar strategy cannot be sampled
    #[error("Invalid strategy for scalar '{name}': {reason}")]
    InvalidScalarStrategy { name: String, reason: String },

    /// Selection names a field the type does not declare
    #[error("Field '{field}' is not declared on type '{type_name}'")]
    UnknownField { type_name: String, field: String },

    /// Nested selection on a scalar or enum field
    #[error("Field '{field}' on type '{type_name}' is a leaf and cannot have a selection set")]
    SelectionOnLeaf { type_name: String, field: String },

    /// Negative depth or width
    #[error("Invalid {kind} for '{name}': {value} (must be non-negative)")]
    InvalidPolicy {
        kind: &'static str,
        name: String,
        value: i64,
    },

    /// Query text could not be parsed
    #[error("Failed to parse query: {0}")]
    QueryParse(String),
}
