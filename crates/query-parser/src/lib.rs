//! Selection-set parser for GraphQL query text.
//!
//! The generator only needs the *shape* of a query: which fields are
//! selected, under which output keys, and how selections nest. This crate
//! extracts exactly that and discards arguments, variables and directives.
//!
//! # Example
//!
//! ```rust
//! use query_parser::GraphqlSelectionParser;
//! use schema_core::{QueryParser, Schema};
//!
//! let schema = Schema::default();
//! let selection = GraphqlSelectionParser
//!     .parse(&schema, "{ teams { wins players { name } } }")
//!     .unwrap();
//! assert_eq!(selection.len(), 1);
//! ```

pub mod parser;

pub use parser::{parse_query, QueryParseError};

use schema_core::{QueryParser, Schema, SelectionSet};

/// [`QueryParser`] for GraphQL query documents.
///
/// Names are not checked against the schema here; unknown fields are
/// reported by the projector with the type they were looked up on.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphqlSelectionParser;

impl QueryParser for GraphqlSelectionParser {
    type Error = QueryParseError;

    fn parse(&self, _schema: &Schema, query: &str) -> Result<SelectionSet, Self::Error> {
        parse_query(query)
    }
}
