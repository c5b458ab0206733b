//! Name-indexed view over a [`Schema`].
//!
//! The registry never follows references itself; it answers "what is the
//! definition of `name` under `kind`" and "which kind does this type
//! reference name". Cycles in the type graph are therefore harmless here.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::schema::{EnumType, ObjectType, QueryDef, ScalarType, Schema, SchemaError, TypeRef};

/// Scalars that every schema understands without declaring them.
pub const BUILTIN_SCALARS: [&str; 5] = ["Int", "Float", "String", "Boolean", "ID"];

/// The four kinds of named definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Enum,
    Object,
    Scalar,
    Query,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeKind::Enum => "enum",
            TypeKind::Object => "object",
            TypeKind::Scalar => "scalar",
            TypeKind::Query => "query",
        };
        f.write_str(name)
    }
}

/// A resolved definition, borrowed from the schema.
#[derive(Debug, Clone, Copy)]
pub enum Definition<'a> {
    Enum(&'a EnumType),
    Object(&'a ObjectType),
    /// `None` for built-in scalars
    Scalar(Option<&'a ScalarType>),
    Query(&'a QueryDef),
}

/// Lookup of enum/object/scalar/query definitions by name.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    schema: Schema,
}

impl TypeRegistry {
    /// Create a registry over a schema.
    pub fn new(schema: Schema) -> Self {
        Self { schema }
    }

    /// Get a reference to the underlying schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Resolve `name` under an explicit `kind`.
    pub fn resolve(&self, kind: TypeKind, name: &str) -> Result<Definition<'_>, SchemaError> {
        let found = match kind {
            TypeKind::Enum => self.schema.enums.get(name).map(Definition::Enum),
            TypeKind::Object => self.schema.objects.get(name).map(Definition::Object),
            TypeKind::Scalar => match self.schema.scalars.get(name) {
                Some(scalar) => Some(Definition::Scalar(Some(scalar))),
                None if is_builtin_scalar(name) => Some(Definition::Scalar(None)),
                None => None,
            },
            TypeKind::Query => self.schema.queries.get(name).map(Definition::Query),
        };
        found.ok_or_else(|| SchemaError::UnknownType {
            kind,
            name: name.to_string(),
        })
    }

    /// Get an enum definition.
    pub fn enum_type(&self, name: &str) -> Result<&EnumType, SchemaError> {
        self.schema
            .enums
            .get(name)
            .ok_or_else(|| unknown(TypeKind::Enum, name))
    }

    /// Get an object definition.
    pub fn object(&self, name: &str) -> Result<&ObjectType, SchemaError> {
        self.schema
            .objects
            .get(name)
            .ok_or_else(|| unknown(TypeKind::Object, name))
    }

    /// Get a query definition.
    pub fn query(&self, name: &str) -> Result<&QueryDef, SchemaError> {
        self.schema
            .queries
            .get(name)
            .ok_or_else(|| unknown(TypeKind::Query, name))
    }

    /// Decide which kind a type reference name denotes.
    ///
    /// Queries are not types and are never considered. A name declared as
    /// more than one of enum, object or scalar (built-ins included) is
    /// rejected rather than resolved by precedence.
    pub fn classify(&self, name: &str) -> Result<TypeKind, SchemaError> {
        let mut kinds = Vec::new();
        if self.schema.enums.contains_key(name) {
            kinds.push(TypeKind::Enum);
        }
        if self.schema.objects.contains_key(name) {
            kinds.push(TypeKind::Object);
        }
        if self.schema.scalars.contains_key(name) || is_builtin_scalar(name) {
            kinds.push(TypeKind::Scalar);
        }

        match kinds.as_slice() {
            [] => Err(SchemaError::UnknownTypeRef(name.to_string())),
            [kind] => Ok(*kind),
            _ => Err(SchemaError::AmbiguousType {
                name: name.to_string(),
                kinds,
            }),
        }
    }

    /// Names declared under `kind`, in declaration order.
    ///
    /// For scalars the built-ins come first.
    pub fn names(&self, kind: TypeKind) -> Vec<&str> {
        match kind {
            TypeKind::Enum => self.schema.enums.keys().map(|k| k.as_str()).collect(),
            TypeKind::Object => self.schema.objects.keys().map(|k| k.as_str()).collect(),
            TypeKind::Scalar => BUILTIN_SCALARS
                .iter()
                .copied()
                .chain(self.schema.scalars.keys().map(|k| k.as_str()))
                .collect(),
            TypeKind::Query => self.schema.queries.keys().map(|k| k.as_str()).collect(),
        }
    }

    /// Check that every type reference in the schema names exactly one type.
    pub fn validate(&self) -> Result<(), SchemaError> {
        for object in self.schema.objects.values() {
            for field in object.fields.values() {
                self.classify(field.type_ref.base_name())?;
            }
        }
        for query in self.schema.queries.values() {
            self.classify(query.type_ref.base_name())?;
        }
        Ok(())
    }

    /// Classify the innermost named type of a reference.
    pub fn classify_ref(&self, type_ref: &TypeRef) -> Result<TypeKind, SchemaError> {
        self.classify(type_ref.base_name())
    }
}

/// Whether `name` is one of the built-in scalar names.
pub fn is_builtin_scalar(name: &str) -> bool {
    BUILTIN_SCALARS.contains(&name)
}

fn unknown(kind: TypeKind, name: &str) -> SchemaError {
    SchemaError::UnknownType {
        kind,
        name: name.to_string(),
    }
}
