//! Core types for fixture generation.
//!
//! This crate provides the schema model shared by the generator and the
//! query parser:
//!
//! - [`Schema`] - enums, objects, scalars and queries loaded from YAML/JSON
//! - [`TypeRef`] - tagged type reference (named, list, non-null)
//! - [`TypeRegistry`] - kind-aware lookup of definitions by name
//! - [`SelectionSet`] - parsed query selections
//! - [`QueryParser`] - capability turning query text into a selection set
//!
//! # Architecture
//!
//! ```text
//! schema-core (this crate)
//!    │
//!    ├─── query-parser        (implements QueryParser)
//!    │
//!    └─── fixture-generator   (compiles schemas into strategies)
//! ```
//!
//! # Example
//!
//! ```rust
//! use schema_core::{Schema, TypeKind, TypeRegistry};
//!
//! let schema = Schema::from_yaml(r#"
//! enums:
//!   position:
//!     values: [goalkeeper, defence, attack]
//! objects:
//!   player:
//!     fields:
//!       name: { type: String }
//!       position: { type: position }
//! "#).unwrap();
//!
//! let registry = TypeRegistry::new(schema);
//! assert_eq!(registry.classify("position").unwrap(), TypeKind::Enum);
//! ```

pub mod registry;
pub mod schema;
pub mod selection;

// Re-exports for convenience
pub use registry::{is_builtin_scalar, Definition, TypeKind, TypeRegistry, BUILTIN_SCALARS};
pub use schema::{EnumType, FieldDef, ObjectType, QueryDef, ScalarType, Schema, SchemaError, TypeRef};
pub use selection::{QueryParser, Selection, SelectionSet};
