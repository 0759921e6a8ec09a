//! Uniform access to sequences, mappings and bare scalars
//!
//! Sequences and mappings are both keyed containers as far as the engine is
//! concerned: sequence keys are the decimal positions. A bare scalar behaves
//! like a one-element sequence.

use serde_json::Value;

pub fn is_container(value: &Value) -> bool {
    matches!(value, Value::Array(_) | Value::Object(_))
}

/// `null`, `""`, `[]` and `{}`
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Look `key` up in a container
pub fn lookup<'a>(container: &'a Value, key: &str) -> Option<&'a Value> {
    match container {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|index| items.get(index)),
        Value::Null => None,
        scalar => (key == "0").then_some(scalar),
    }
}

/// Every `(key, value)` pair of a container, in order
pub fn entries(container: &Value) -> Vec<(String, &Value)> {
    match container {
        Value::Object(map) => map.iter().map(|(key, value)| (key.clone(), value)).collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, value)| (index.to_string(), value))
            .collect(),
        Value::Null => Vec::new(),
        scalar => vec![("0".to_string(), scalar)],
    }
}
