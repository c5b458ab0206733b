//! Schema definitions for fixture generation.
//!
//! A schema is a declarative description of four kinds of things:
//!
//! - `enums` - named sets of symbolic values
//! - `objects` - named records of typed fields
//! - `scalars` - custom leaf types (only the name matters for generation)
//! - `queries` - named entry points returning a type reference
//!
//! Schemas are loaded from YAML or JSON:
//!
//! ```yaml
//! enums:
//!   position:
//!     values: [goalkeeper, defence, attack]
//! objects:
//!   team:
//!     fields:
//!       name: { type: String }
//!       players: { type: [player] }
//!   player:
//!     fields:
//!       name: { type: { non_null: String } }
//!       position: { type: position }
//!       team: { type: team }
//! queries:
//!   teams:
//!     type: [team]
//!     resolve: get-teams
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::registry::TypeKind;

// ============================================================================
// Error Types
// ============================================================================

/// Error type for schema loading and lookup.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Error reading schema file
    #[error("Failed to read schema file: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Error parsing JSON
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Schema file extension is neither YAML nor JSON
    #[error("Unsupported schema file format: {0}")]
    UnsupportedFormat(String),

    /// Name is not declared for the requested kind
    #[error("Unknown {kind} type: {name}")]
    UnknownType { kind: TypeKind, name: String },

    /// Type reference names no enum, object or scalar
    #[error("Unknown type: {0}")]
    UnknownTypeRef(String),

    /// Name is declared under more than one kind
    #[error("Type '{name}' is ambiguous, declared as: {}", join_kinds(.kinds))]
    AmbiguousType { name: String, kinds: Vec<TypeKind> },

    /// Enum declares the same value twice
    #[error("Enum '{enum_name}' declares value '{value}' more than once")]
    DuplicateEnumValue { enum_name: String, value: String },

    /// Malformed type reference
    #[error("Invalid type reference: {0}")]
    InvalidTypeRef(String),
}

fn join_kinds(kinds: &[TypeKind]) -> String {
    kinds
        .iter()
        .map(|kind| kind.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// Type References
// ============================================================================

/// Reference to a type from a field or query.
///
/// Serialized as a bare name (`player`), a single-element list (`[player]`)
/// or a non-null wrapper (`{ non_null: player }`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTypeRef", into = "RawTypeRef")]
pub enum TypeRef {
    /// Scalar, enum or object, by name
    Named(String),
    /// List of the inner type
    List(Box<TypeRef>),
    /// Non-null wrapper
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    /// Create a named reference.
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    /// Create a list reference.
    pub fn list(inner: TypeRef) -> Self {
        TypeRef::List(Box::new(inner))
    }

    /// Create a non-null reference.
    pub fn non_null(inner: TypeRef) -> Self {
        TypeRef::NonNull(Box::new(inner))
    }

    /// Innermost named type, through any list and non-null wrappers.
    pub fn base_name(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::List(inner) | TypeRef::NonNull(inner) => inner.base_name(),
        }
    }

    /// Whether a list wrapper appears anywhere in this reference.
    pub fn is_list(&self) -> bool {
        match self {
            TypeRef::Named(_) => false,
            TypeRef::List(_) => true,
            TypeRef::NonNull(inner) => inner.is_list(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => write!(f, "{name}"),
            TypeRef::List(inner) => write!(f, "[{inner}]"),
            TypeRef::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawTypeRef {
    Named(String),
    List(Vec<RawTypeRef>),
    NonNull { non_null: Box<RawTypeRef> },
}

impl TryFrom<RawTypeRef> for TypeRef {
    type Error = SchemaError;

    fn try_from(raw: RawTypeRef) -> Result<Self, Self::Error> {
        match raw {
            RawTypeRef::Named(name) if name.trim().is_empty() => Err(
                SchemaError::InvalidTypeRef("type name must not be empty".to_string()),
            ),
            RawTypeRef::Named(name) => Ok(TypeRef::Named(name)),
            RawTypeRef::List(mut items) => {
                if items.len() != 1 {
                    return Err(SchemaError::InvalidTypeRef(format!(
                        "list wrapper must hold exactly one type, found {}",
                        items.len()
                    )));
                }
                let inner = TypeRef::try_from(items.remove(0))?;
                Ok(TypeRef::list(inner))
            }
            RawTypeRef::NonNull { non_null } => Ok(TypeRef::non_null(TypeRef::try_from(*non_null)?)),
        }
    }
}

impl From<TypeRef> for RawTypeRef {
    fn from(type_ref: TypeRef) -> Self {
        match type_ref {
            TypeRef::Named(name) => RawTypeRef::Named(name),
            TypeRef::List(inner) => RawTypeRef::List(vec![RawTypeRef::from(*inner)]),
            TypeRef::NonNull(inner) => RawTypeRef::NonNull {
                non_null: Box::new(RawTypeRef::from(*inner)),
            },
        }
    }
}

// ============================================================================
// Definitions
// ============================================================================

/// Enumeration of symbolic values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnumType {
    /// Declared values, in declaration order
    pub values: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Field of an object type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Declared type reference
    #[serde(rename = "type")]
    pub type_ref: TypeRef,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FieldDef {
    pub fn new(type_ref: TypeRef) -> Self {
        Self {
            type_ref,
            description: None,
        }
    }
}

/// Object type with ordered fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectType {
    /// Field definitions; order is preserved in generated records
    #[serde(default)]
    pub fields: IndexMap<String, FieldDef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ObjectType {
    /// Get a field definition by name.
    pub fn get_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.get(name)
    }

    /// Get all field names in declaration order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.keys().map(|k| k.as_str()).collect()
    }
}

/// Custom scalar type.
///
/// `parse` and `serialize` name the host application's conversion functions;
/// they are carried through but never interpreted here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScalarType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serialize: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Query entry point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryDef {
    /// Result type reference
    #[serde(rename = "type")]
    pub type_ref: TypeRef,

    /// Resolver reference (not used for generation)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolve: Option<String>,

    /// Argument declarations (not used for generation)
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub args: IndexMap<String, FieldDef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl QueryDef {
    pub fn new(type_ref: TypeRef) -> Self {
        Self {
            type_ref,
            resolve: None,
            args: IndexMap::new(),
            description: None,
        }
    }
}

// ============================================================================
// Schema
// ============================================================================

/// Full schema: enums, objects, scalars and queries keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default)]
    pub enums: IndexMap<String, EnumType>,

    #[serde(default)]
    pub objects: IndexMap<String, ObjectType>,

    #[serde(default)]
    pub scalars: IndexMap<String, ScalarType>,

    #[serde(default)]
    pub queries: IndexMap<String, QueryDef>,
}

impl Schema {
    /// Load schema from a YAML or JSON file, chosen by extension.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            Some("json") => Self::from_json(&content),
            _ => Err(SchemaError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Parse schema from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, SchemaError> {
        let schema: Schema = serde_yaml::from_str(yaml)?;
        schema.check_enum_values()?;
        Ok(schema)
    }

    /// Parse schema from JSON string.
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let schema: Schema = serde_json::from_str(json)?;
        schema.check_enum_values()?;
        Ok(schema)
    }

    /// Add an enum type.
    pub fn with_enum<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enums.insert(
            name.into(),
            EnumType {
                values: values.into_iter().map(Into::into).collect(),
                description: None,
            },
        );
        self
    }

    /// Add an object type from `(field name, type)` pairs.
    pub fn with_object<I, S>(mut self, name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = (S, TypeRef)>,
        S: Into<String>,
    {
        let fields = fields
            .into_iter()
            .map(|(field, type_ref)| (field.into(), FieldDef::new(type_ref)))
            .collect();
        self.objects.insert(
            name.into(),
            ObjectType {
                fields,
                description: None,
            },
        );
        self
    }

    /// Add a custom scalar type.
    pub fn with_scalar(mut self, name: impl Into<String>) -> Self {
        self.scalars.insert(name.into(), ScalarType::default());
        self
    }

    /// Add a query.
    pub fn with_query(mut self, name: impl Into<String>, type_ref: TypeRef) -> Self {
        self.queries.insert(name.into(), QueryDef::new(type_ref));
        self
    }

    fn check_enum_values(&self) -> Result<(), SchemaError> {
        for (enum_name, enum_type) in &self.enums {
            let mut seen = HashSet::new();
            for value in &enum_type.values {
                if !seen.insert(value.as_str()) {
                    return Err(SchemaError::DuplicateEnumValue {
                        enum_name: enum_name.clone(),
                        value: value.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
