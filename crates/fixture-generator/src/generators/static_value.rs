//! YAML to JSON value conversion for configured constants and choices.

use serde_json::{Map, Value};
use serde_yaml::Value as YamlValue;

/// Convert a YAML value to a JSON value.
///
/// Mapping keys that are not strings are rendered with their YAML scalar
/// text; tags are dropped.
pub fn yaml_to_json_value(yaml: &YamlValue) -> Value {
    match yaml {
        YamlValue::Null => Value::Null,
        YamlValue::Bool(b) => Value::Bool(*b),
        YamlValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else if let Some(f) = n.as_f64() {
                Value::from(f)
            } else {
                Value::String(n.to_string())
            }
        }
        YamlValue::String(s) => Value::String(s.clone()),
        YamlValue::Sequence(arr) => Value::Array(arr.iter().map(yaml_to_json_value).collect()),
        YamlValue::Mapping(map) => {
            let values: Map<String, Value> = map
                .iter()
                .filter_map(|(k, v)| {
                    let key = match k {
                        YamlValue::String(s) => s.clone(),
                        YamlValue::Number(n) => n.to_string(),
                        YamlValue::Bool(b) => b.to_string(),
                        _ => return None,
                    };
                    Some((key, yaml_to_json_value(v)))
                })
                .collect();
            Value::Object(values)
        }
        YamlValue::Tagged(tagged) => yaml_to_json_value(&tagged.value),
    }
}
