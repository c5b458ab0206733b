//! Query projection: restrict compiled generators to a selection set.
//!
//! A projected strategy draws exactly the selected fields, keyed by alias or
//! field name, in selection order. Unselected fields are not part of the
//! strategy at all, so they are never drawn. Scalar and enum leaves reuse the
//! compiled strategies unchanged; lists keep the width of their element
//! type. Selections nest explicitly, so no depth budget applies here.

use serde_json::{Map, Value};
use std::sync::Arc;

use schema_core::{QueryParser, Selection, SelectionSet, TypeKind, TypeRef};

use crate::compiler::CompiledGenerators;
use crate::error::GeneratorError;
use crate::strategy::{RecordField, Strategy};

/// Field every object answers with its own type name.
pub const TYPENAME_FIELD: &str = "__typename";

/// Type name used for root-level errors.
const QUERY_ROOT: &str = "Query";

/// Builds query-result strategies from compiled generators.
pub struct QueryProjector<'a> {
    compiled: &'a CompiledGenerators,
}

impl<'a> QueryProjector<'a> {
    pub fn new(compiled: &'a CompiledGenerators) -> Self {
        Self { compiled }
    }

    /// Project one query: `{ data: { <query_name>: <restricted value> } }`.
    ///
    /// `selection_set` is the selection nested under the query field.
    pub fn project(
        &self,
        query_name: &str,
        selection_set: &SelectionSet,
    ) -> Result<Strategy, GeneratorError> {
        let query = self.compiled.registry().query(query_name)?;
        let selection = (!selection_set.is_empty()).then_some(selection_set);
        let value = self.project_type_ref(&query.type_ref, selection, QUERY_ROOT, query_name)?;
        Ok(Strategy::envelope(vec![RecordField::new(query_name, value)]))
    }

    /// Project a whole parsed operation; every top-level selection names a query.
    pub fn project_operation(&self, operation: &SelectionSet) -> Result<Strategy, GeneratorError> {
        let registry = self.compiled.registry();
        let mut fields = Vec::with_capacity(operation.len());
        for selection in operation.iter() {
            if selection.name == TYPENAME_FIELD {
                fields.push(typename_field(QUERY_ROOT, selection)?);
                continue;
            }
            let query = registry.query(&selection.name)?;
            let value = self.project_type_ref(
                &query.type_ref,
                selection.selection_set.as_ref(),
                QUERY_ROOT,
                &selection.name,
            )?;
            fields.push(RecordField::new(selection.output_key(), value));
        }
        Ok(Strategy::envelope(fields))
    }

    fn project_type_ref(
        &self,
        type_ref: &TypeRef,
        selection: Option<&SelectionSet>,
        parent: &str,
        field: &str,
    ) -> Result<Arc<Strategy>, GeneratorError> {
        let Some(selection) = selection else {
            // no sub-selection: leaves and whole objects use the compiled strategies
            return self.compiled.type_ref_strategy(type_ref);
        };
        match type_ref {
            TypeRef::NonNull(inner) => self.project_type_ref(inner, Some(selection), parent, field),

            TypeRef::List(inner) => {
                let element = self.project_type_ref(inner, Some(selection), parent, field)?;
                Ok(self.compiled.list_strategy(element, inner))
            }

            TypeRef::Named(name) => match self.compiled.registry().classify(name)? {
                TypeKind::Object => self.project_object(name, selection),
                _ => Err(GeneratorError::SelectionOnLeaf {
                    type_name: parent.to_string(),
                    field: field.to_string(),
                }),
            },
        }
    }

    fn project_object(
        &self,
        type_name: &str,
        selection_set: &SelectionSet,
    ) -> Result<Arc<Strategy>, GeneratorError> {
        let object = self.compiled.registry().object(type_name)?;

        let mut fields = Vec::with_capacity(selection_set.len());
        for selection in selection_set.iter() {
            if selection.name == TYPENAME_FIELD {
                fields.push(typename_field(type_name, selection)?);
                continue;
            }
            let field = object
                .get_field(&selection.name)
                .ok_or_else(|| GeneratorError::UnknownField {
                    type_name: type_name.to_string(),
                    field: selection.name.clone(),
                })?;
            let strategy = self.project_type_ref(
                &field.type_ref,
                selection.selection_set.as_ref(),
                type_name,
                &selection.name,
            )?;
            fields.push(RecordField::new(selection.output_key(), strategy));
        }
        Ok(Arc::new(Strategy::Record(fields)))
    }
}

fn typename_field(type_name: &str, selection: &Selection) -> Result<RecordField, GeneratorError> {
    if selection.selection_set.is_some() {
        return Err(GeneratorError::SelectionOnLeaf {
            type_name: type_name.to_string(),
            field: TYPENAME_FIELD.to_string(),
        });
    }
    Ok(RecordField::new(
        selection.output_key(),
        Arc::new(Strategy::Constant(Value::String(type_name.to_string()))),
    ))
}

/// Parse `query` with `parser` and project the whole operation.
///
/// `variables` are accepted for interface parity with real execution and do
/// not influence the generated shape.
pub fn query_result<P: QueryParser>(
    compiled: &CompiledGenerators,
    parser: &P,
    query: &str,
    variables: &Map<String, Value>,
) -> Result<Strategy, GeneratorError> {
    if !variables.is_empty() {
        tracing::debug!(count = variables.len(), "query variables ignored for generation");
    }
    let operation = parser
        .parse(compiled.registry().schema(), query)
        .map_err(|e| GeneratorError::QueryParse(e.to_string()))?;
    QueryProjector::new(compiled).project_operation(&operation)
}
