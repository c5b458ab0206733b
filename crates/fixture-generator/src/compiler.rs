//! Schema compiler: type graph to strategies.
//!
//! The compiler walks type references by recursive descent, carrying the
//! list of object types entered so far. Entering an object type consults
//! [`DepthWidthPolicy::may_enter`]; when the budget is spent the field that
//! would re-enter it is *exhausted*:
//!
//! - a list-typed field becomes the constant empty list
//! - a singular field is left out of the record
//!
//! Every object entry either spends budget or is refused, so the path
//! length is bounded by the sum of `budget + 1` over all object types and
//! compilation terminates for any cycle shape.
//!
//! Object strategies are memoized by type name and the occurrence counts of
//! the path they were compiled under, so branches that reach the same type
//! with the same remaining budgets share one `Arc<Strategy>`.

use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use schema_core::{Schema, SchemaError, TypeKind, TypeRef, TypeRegistry};

use crate::error::GeneratorError;
use crate::policy::DepthWidthPolicy;
use crate::scalars::ScalarGeneratorResolver;
use crate::strategy::{RecordField, Strategy};

/// Path-derived depth state: occurrences of each object type on the path.
type DepthState = Vec<(String, u32)>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MemoKey {
    type_name: String,
    state: DepthState,
}

/// Result of compiling one type reference.
#[derive(Debug, Clone)]
enum Compiled {
    Strategy(Arc<Strategy>),
    /// Singular object reference whose depth budget is spent
    Exhausted,
}

/// Compile a schema with the given policy and scalar strategies.
pub fn compile(
    schema: &Schema,
    policy: &DepthWidthPolicy,
    scalars: &ScalarGeneratorResolver,
) -> Result<CompiledGenerators, GeneratorError> {
    let registry = TypeRegistry::new(schema.clone());
    GeneratorCompiler::new(&registry, policy, scalars).compile()
}

/// One compilation session.
pub struct GeneratorCompiler<'a> {
    registry: &'a TypeRegistry,
    policy: &'a DepthWidthPolicy,
    scalars: &'a ScalarGeneratorResolver,
    leaves: HashMap<String, Arc<Strategy>>,
    memo: HashMap<MemoKey, Arc<Strategy>>,
    memo_hits: usize,
}

impl<'a> GeneratorCompiler<'a> {
    pub fn new(
        registry: &'a TypeRegistry,
        policy: &'a DepthWidthPolicy,
        scalars: &'a ScalarGeneratorResolver,
    ) -> Self {
        Self {
            registry,
            policy,
            scalars,
            leaves: HashMap::new(),
            memo: HashMap::new(),
            memo_hits: 0,
        }
    }

    /// Compile every enum, object, reachable scalar and query result type.
    pub fn compile(mut self) -> Result<CompiledGenerators, GeneratorError> {
        let registry = self.registry;
        registry.validate()?;
        self.policy.warn_unknown_names(registry);

        let mut types = IndexMap::new();
        for name in registry.names(TypeKind::Enum) {
            types.insert(name.to_string(), self.compile_root(&TypeRef::named(name))?);
        }
        for name in registry.names(TypeKind::Object) {
            types.insert(name.to_string(), self.compile_root(&TypeRef::named(name))?);
        }

        let mut queries = IndexMap::new();
        for name in registry.names(TypeKind::Query) {
            let query = registry.query(name)?;
            queries.insert(name.to_string(), self.compile_root(&query.type_ref)?);
        }

        // Scalars last: custom ones only fail if an object or query reached them.
        for name in registry.names(TypeKind::Scalar) {
            if let Some(strategy) = self.leaves.get(name) {
                types.insert(name.to_string(), strategy.clone());
            } else if self.scalars.has_strategy(name) {
                types.insert(name.to_string(), self.compile_root(&TypeRef::named(name))?);
            } else {
                tracing::debug!(scalar = %name, "custom scalar without strategy is never reached");
            }
        }

        tracing::debug!(
            types = types.len(),
            queries = queries.len(),
            memo_entries = self.memo.len(),
            memo_hits = self.memo_hits,
            "schema compiled"
        );

        Ok(CompiledGenerators {
            registry: registry.clone(),
            policy: self.policy.clone(),
            types,
            queries,
        })
    }

    /// Compile a type reference at the root of a descent.
    pub fn compile_root(&mut self, type_ref: &TypeRef) -> Result<Arc<Strategy>, GeneratorError> {
        match self.compile_type_ref(type_ref, &[])? {
            Compiled::Strategy(strategy) => Ok(strategy),
            // an empty path always has budget left
            Compiled::Exhausted => Ok(Arc::new(Strategy::Constant(serde_json::Value::Null))),
        }
    }

    fn compile_type_ref(&mut self, type_ref: &TypeRef, path: &[String]) -> Result<Compiled, GeneratorError> {
        match type_ref {
            TypeRef::NonNull(inner) => self.compile_type_ref(inner, path),

            TypeRef::List(inner) => {
                let max_len = self.policy.max_width(inner.base_name());
                if max_len == Some(0) {
                    // no element is ever drawn; still resolve the name
                    self.registry.classify_ref(inner)?;
                    return Ok(Compiled::Strategy(Arc::new(Strategy::empty_list())));
                }
                match self.compile_type_ref(inner, path)? {
                    Compiled::Strategy(element) => {
                        Ok(Compiled::Strategy(Arc::new(Strategy::list(element, max_len))))
                    }
                    Compiled::Exhausted => Ok(Compiled::Strategy(Arc::new(Strategy::empty_list()))),
                }
            }

            TypeRef::Named(name) => match self.registry.classify(name)? {
                TypeKind::Enum => self.compile_enum(name).map(Compiled::Strategy),
                TypeKind::Scalar => self.compile_scalar(name).map(Compiled::Strategy),
                TypeKind::Object => {
                    if !self.policy.may_enter(name, path) {
                        tracing::trace!(type_name = %name, depth = path.len(), "depth budget spent");
                        return Ok(Compiled::Exhausted);
                    }
                    self.compile_object(name, path).map(Compiled::Strategy)
                }
                TypeKind::Query => Err(SchemaError::UnknownTypeRef(name.clone()).into()),
            },
        }
    }

    fn compile_enum(&mut self, name: &str) -> Result<Arc<Strategy>, GeneratorError> {
        if let Some(strategy) = self.leaves.get(name) {
            return Ok(strategy.clone());
        }
        let enum_type = self.registry.enum_type(name)?;
        let values = enum_type
            .values
            .iter()
            .map(|v| serde_json::Value::String(v.clone()))
            .collect::<Vec<_>>();
        let strategy = if values.is_empty() {
            tracing::warn!(enum_name = %name, "enum declares no values, generating null");
            Strategy::Constant(serde_json::Value::Null)
        } else {
            Strategy::OneOf(values)
        };
        let strategy = Arc::new(strategy);
        self.leaves.insert(name.to_string(), strategy.clone());
        Ok(strategy)
    }

    fn compile_scalar(&mut self, name: &str) -> Result<Arc<Strategy>, GeneratorError> {
        if let Some(strategy) = self.leaves.get(name) {
            return Ok(strategy.clone());
        }
        let strategy = Arc::new(self.scalars.strategy_for(name)?);
        self.leaves.insert(name.to_string(), strategy.clone());
        Ok(strategy)
    }

    fn compile_object(&mut self, name: &str, path: &[String]) -> Result<Arc<Strategy>, GeneratorError> {
        let key = MemoKey {
            type_name: name.to_string(),
            state: depth_state(path),
        };
        if let Some(strategy) = self.memo.get(&key) {
            self.memo_hits += 1;
            tracing::trace!(type_name = %name, depth = path.len(), "memo hit");
            return Ok(strategy.clone());
        }

        let registry = self.registry;
        let object = registry.object(name)?;
        let mut child_path = path.to_vec();
        child_path.push(name.to_string());

        let mut fields = Vec::with_capacity(object.fields.len());
        for (field_name, field) in &object.fields {
            match self.compile_type_ref(&field.type_ref, &child_path)? {
                Compiled::Strategy(strategy) => fields.push(RecordField::new(field_name, strategy)),
                Compiled::Exhausted => {
                    tracing::trace!(type_name = %name, field = %field_name, "field omitted at depth limit");
                }
            }
        }

        tracing::debug!(type_name = %name, depth = path.len(), fields = fields.len(), "compiled object");
        let strategy = Arc::new(Strategy::Record(fields));
        self.memo.insert(key, strategy.clone());
        Ok(strategy)
    }
}

fn depth_state(path: &[String]) -> DepthState {
    let mut counts = BTreeMap::<&str, u32>::new();
    for name in path {
        *counts.entry(name.as_str()).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect()
}

/// Compiled strategies for one schema: the "type name to strategy" mapping.
///
/// Read-only after construction; share it freely across samplers and
/// threads.
#[derive(Debug, Clone)]
pub struct CompiledGenerators {
    registry: TypeRegistry,
    policy: DepthWidthPolicy,
    types: IndexMap<String, Arc<Strategy>>,
    queries: IndexMap<String, Arc<Strategy>>,
}

impl CompiledGenerators {
    /// Strategy for a named type.
    pub fn generator(&self, name: &str) -> Result<Arc<Strategy>, GeneratorError> {
        if let Some(strategy) = self.types.get(name) {
            return Ok(strategy.clone());
        }
        match self.registry.classify(name)? {
            TypeKind::Scalar => Err(GeneratorError::MissingScalarStrategy(name.to_string())),
            kind => Err(SchemaError::UnknownType {
                kind,
                name: name.to_string(),
            }
            .into()),
        }
    }

    /// Full (unprojected) strategy for a query's result type.
    pub fn query_generator(&self, name: &str) -> Result<Arc<Strategy>, GeneratorError> {
        self.queries.get(name).cloned().ok_or_else(|| {
            SchemaError::UnknownType {
                kind: TypeKind::Query,
                name: name.to_string(),
            }
            .into()
        })
    }

    /// Strategy for a type reference, built over the compiled named types.
    pub fn type_ref_strategy(&self, type_ref: &TypeRef) -> Result<Arc<Strategy>, GeneratorError> {
        match type_ref {
            TypeRef::Named(name) => self.generator(name),
            TypeRef::NonNull(inner) => self.type_ref_strategy(inner),
            TypeRef::List(inner) => {
                let element = self.type_ref_strategy(inner)?;
                Ok(self.list_strategy(element, inner))
            }
        }
    }

    /// List of `element`, capped by the width of `element_ref`'s innermost type.
    pub fn list_strategy(&self, element: Arc<Strategy>, element_ref: &TypeRef) -> Arc<Strategy> {
        let max_len = self.policy.max_width(element_ref.base_name());
        Arc::new(Strategy::list(element, max_len))
    }

    /// Names with a compiled strategy, in registry order.
    pub fn type_names(&self) -> Vec<&str> {
        self.types.keys().map(|k| k.as_str()).collect()
    }

    /// Names of compiled queries.
    pub fn query_names(&self) -> Vec<&str> {
        self.queries.keys().map(|k| k.as_str()).collect()
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn policy(&self) -> &DepthWidthPolicy {
        &self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn team_schema() -> Schema {
        Schema::default()
            .with_object(
                "team",
                [
                    ("name", TypeRef::named("String")),
                    ("players", TypeRef::list(TypeRef::named("player"))),
                ],
            )
            .with_object(
                "player",
                [
                    ("name", TypeRef::named("String")),
                    ("team", TypeRef::named("team")),
                ],
            )
    }

    /// Ring of `k` object types, each pointing at the next.
    fn ring_schema(k: usize) -> Schema {
        (0..k).fold(Schema::default(), |schema, i| {
            let next = format!("node{}", (i + 1) % k);
            schema.with_object(
                format!("node{i}"),
                [
                    ("label", TypeRef::named("String")),
                    ("next", TypeRef::named(next.clone())),
                    ("many", TypeRef::list(TypeRef::named(next))),
                ],
            )
        })
    }

    fn record_field<'s>(strategy: &'s Strategy, key: &str) -> Option<&'s Arc<Strategy>> {
        match strategy {
            Strategy::Record(fields) => fields.iter().find(|f| f.key == key).map(|f| &f.strategy),
            _ => None,
        }
    }

    fn list_element(strategy: &Strategy) -> Option<&Arc<Strategy>> {
        match strategy {
            Strategy::List { element, .. } => Some(element),
            _ => None,
        }
    }

    fn is_empty_list(strategy: &Strategy) -> bool {
        matches!(strategy, Strategy::Constant(serde_json::Value::Array(v)) if v.is_empty())
    }

    /// Nesting depth of a strategy graph.
    fn strategy_height(strategy: &Strategy) -> usize {
        match strategy {
            Strategy::List { element, .. } => 1 + strategy_height(element),
            Strategy::Record(fields) => {
                1 + fields
                    .iter()
                    .map(|f| strategy_height(&f.strategy))
                    .max()
                    .unwrap_or(0)
            }
            _ => 0,
        }
    }

    #[test]
    fn test_compile_every_declared_type() {
        let schema = team_schema().with_enum("position", ["goalkeeper", "defence", "attack"]);
        let compiled = compile(
            &schema,
            &DepthWidthPolicy::new(),
            &ScalarGeneratorResolver::new(),
        )
        .unwrap();

        let names = compiled.type_names();
        for name in ["position", "team", "player", "Int", "Float", "String", "Boolean", "ID"] {
            assert!(names.contains(&name), "missing {name}");
        }
    }

    #[test]
    fn test_enum_compiles_to_declared_values() {
        let schema = Schema::default().with_enum("position", ["goalkeeper", "defence", "attack"]);
        let compiled = compile(
            &schema,
            &DepthWidthPolicy::new(),
            &ScalarGeneratorResolver::new(),
        )
        .unwrap();

        let strategy = compiled.generator("position").unwrap();
        assert!(matches!(
            strategy.as_ref(),
            Strategy::OneOf(values) if values == &vec![json!("goalkeeper"), json!("defence"), json!("attack")]
        ));
    }

    #[test]
    fn test_self_reference_bottoms_out_at_default_depth() {
        let compiled = compile(
            &team_schema(),
            &DepthWidthPolicy::new(),
            &ScalarGeneratorResolver::new(),
        )
        .unwrap();
        let team = compiled.generator("team").unwrap();

        // team -> players -> player -> team -> players -> player
        let player = list_element(record_field(&team, "players").unwrap()).unwrap();
        let team2 = record_field(player, "team").unwrap();
        let player2 = list_element(record_field(team2, "players").unwrap()).unwrap();

        assert_eq!(player2.record_keys(), Some(vec!["name"]));
    }

    #[test]
    fn test_zero_depth_stops_reentry() {
        let policy = DepthWidthPolicy::new().with_depth("team", 0);
        let compiled = compile(&team_schema(), &policy, &ScalarGeneratorResolver::new()).unwrap();
        let team = compiled.generator("team").unwrap();

        let player = list_element(record_field(&team, "players").unwrap()).unwrap();
        assert!(record_field(player, "team").is_none());

        // a player root still reaches one team, whose players stop before re-entering it
        let player = compiled.generator("player").unwrap();
        let team = record_field(&player, "team").unwrap();
        let nested = list_element(record_field(team, "players").unwrap()).unwrap();
        assert_eq!(nested.record_keys(), Some(vec!["name"]));
    }

    #[test]
    fn test_exhausted_list_is_empty_constant() {
        let schema = Schema::default().with_object(
            "node",
            [("children", TypeRef::list(TypeRef::named("node")))],
        );
        let policy = DepthWidthPolicy::new().with_depth("node", 0);
        let compiled = compile(&schema, &policy, &ScalarGeneratorResolver::new()).unwrap();

        let node = compiled.generator("node").unwrap();
        assert!(is_empty_list(record_field(&node, "children").unwrap()));
    }

    #[test]
    fn test_zero_width_is_empty_constant() {
        let policy = DepthWidthPolicy::new().with_width("player", 0);
        let compiled = compile(&team_schema(), &policy, &ScalarGeneratorResolver::new()).unwrap();

        let team = compiled.generator("team").unwrap();
        assert!(is_empty_list(record_field(&team, "players").unwrap()));
    }

    #[test]
    fn test_width_applies_to_element_type() {
        let policy = DepthWidthPolicy::new().with_width("player", 2);
        let compiled = compile(&team_schema(), &policy, &ScalarGeneratorResolver::new()).unwrap();

        let team = compiled.generator("team").unwrap();
        assert!(matches!(
            record_field(&team, "players").unwrap().as_ref(),
            Strategy::List { max_len: Some(2), .. }
        ));
    }

    #[test]
    fn test_ring_cycles_terminate() {
        for k in 1..=6 {
            let compiled = compile(
                &ring_schema(k),
                &DepthWidthPolicy::new(),
                &ScalarGeneratorResolver::new(),
            )
            .unwrap();
            for i in 0..k {
                let strategy = compiled.generator(&format!("node{i}")).unwrap();
                // each of the k types is entered at most twice
                assert!(strategy_height(&strategy) <= 2 * (2 * k) + 1, "k={k}");
            }
        }
    }

    #[test]
    fn test_memo_shares_equal_depth_states() {
        let schema = Schema::default()
            .with_object(
                "root",
                [
                    ("left", TypeRef::named("leaf")),
                    ("right", TypeRef::named("leaf")),
                ],
            )
            .with_object("leaf", [("value", TypeRef::named("Int"))]);
        let compiled = compile(
            &schema,
            &DepthWidthPolicy::new(),
            &ScalarGeneratorResolver::new(),
        )
        .unwrap();

        let root = compiled.generator("root").unwrap();
        let left = record_field(&root, "left").unwrap();
        let right = record_field(&root, "right").unwrap();
        assert!(Arc::ptr_eq(left, right));
    }

    #[test]
    fn test_unreached_custom_scalar_is_not_an_error() {
        let schema = team_schema().with_scalar("Date");
        let compiled = compile(
            &schema,
            &DepthWidthPolicy::new(),
            &ScalarGeneratorResolver::new(),
        )
        .unwrap();

        assert!(matches!(
            compiled.generator("Date"),
            Err(GeneratorError::MissingScalarStrategy(ref name)) if name == "Date"
        ));
    }

    #[test]
    fn test_reached_custom_scalar_fails_eagerly() {
        let schema = Schema::default()
            .with_scalar("Date")
            .with_object("event", [("at", TypeRef::named("Date"))]);
        let result = compile(
            &schema,
            &DepthWidthPolicy::new(),
            &ScalarGeneratorResolver::new(),
        );

        assert!(matches!(
            result,
            Err(GeneratorError::MissingScalarStrategy(ref name)) if name == "Date"
        ));
    }

    #[test]
    fn test_unknown_type_reference() {
        let schema = Schema::default().with_object("event", [("venue", TypeRef::named("venue"))]);
        let result = compile(
            &schema,
            &DepthWidthPolicy::new(),
            &ScalarGeneratorResolver::new(),
        );

        assert!(matches!(
            result,
            Err(GeneratorError::Schema(SchemaError::UnknownTypeRef(ref name))) if name == "venue"
        ));
    }

    #[test]
    fn test_unknown_generator_name() {
        let compiled = compile(
            &team_schema(),
            &DepthWidthPolicy::new(),
            &ScalarGeneratorResolver::new(),
        )
        .unwrap();

        assert!(matches!(
            compiled.generator("coach"),
            Err(GeneratorError::Schema(SchemaError::UnknownTypeRef(_)))
        ));
        assert!(matches!(
            compiled.query_generator("teams"),
            Err(GeneratorError::Schema(SchemaError::UnknownType { kind: TypeKind::Query, .. }))
        ));
    }

    #[test]
    fn test_type_ref_strategy_wraps_compiled_types() {
        let policy = DepthWidthPolicy::new().with_width("player", 4);
        let compiled = compile(&team_schema(), &policy, &ScalarGeneratorResolver::new()).unwrap();
        let player = compiled.generator("player").unwrap();

        let type_ref = TypeRef::non_null(TypeRef::list(TypeRef::named("player")));
        let strategy = compiled.type_ref_strategy(&type_ref).unwrap();
        let Strategy::List { element, max_len } = strategy.as_ref() else {
            panic!("Expected list strategy");
        };
        assert_eq!(*max_len, Some(4));
        assert!(Arc::ptr_eq(element, &player));

        // nested lists take the innermost element width
        let nested = TypeRef::list(TypeRef::list(TypeRef::named("player")));
        let strategy = compiled.type_ref_strategy(&nested).unwrap();
        let Strategy::List { element, max_len } = strategy.as_ref() else {
            panic!("Expected list strategy");
        };
        assert_eq!(*max_len, Some(4));
        assert!(matches!(element.as_ref(), Strategy::List { max_len: Some(4), .. }));

        assert!(matches!(
            compiled.type_ref_strategy(&TypeRef::list(TypeRef::named("coach"))),
            Err(GeneratorError::Schema(SchemaError::UnknownTypeRef(_)))
        ));
    }

    #[test]
    fn test_query_result_types_are_compiled() {
        let schema = team_schema().with_query(
            "teams",
            TypeRef::non_null(TypeRef::list(TypeRef::named("team"))),
        );
        let compiled = compile(
            &schema,
            &DepthWidthPolicy::new(),
            &ScalarGeneratorResolver::new(),
        )
        .unwrap();

        assert_eq!(compiled.query_names(), vec!["teams"]);
        let teams = compiled.query_generator("teams").unwrap();
        let team = list_element(&teams).unwrap();
        assert_eq!(team.record_keys(), Some(vec!["name", "players"]));
    }
}
