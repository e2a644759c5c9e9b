//! Default value generation from a schema

use serde_json::{Map, Value};

use crate::schema::{SchemaNode, SchemaType};

/// The record being edited, keyed by schema property name
pub type ValueObject = Map<String, Value>;

/// Build a value object holding a type-appropriate default for every
/// declared property of `schema`.
///
/// Strings take the first enum entry, then `default`, then `""`. Numbers
/// fall back to `0`, booleans to `false`, arrays to `[]`, and nested
/// objects recurse. Schemas are assumed acyclic.
pub fn generate_default(schema: &SchemaNode) -> ValueObject {
    schema
        .properties
        .iter()
        .map(|(name, prop)| (name.to_string(), default_for(prop)))
        .collect()
}

/// Default value for a single schema node
pub fn default_for(prop: &SchemaNode) -> Value {
    match prop.kind {
        SchemaType::String => prop
            .enum_values
            .as_ref()
            .and_then(|values| values.first().cloned())
            .or_else(|| prop.default.clone())
            .unwrap_or_else(|| Value::String(String::new())),
        SchemaType::Array => prop.default.clone().unwrap_or_else(|| Value::Array(Vec::new())),
        SchemaType::Integer | SchemaType::Number => {
            prop.default.clone().unwrap_or_else(|| Value::from(0))
        }
        SchemaType::Boolean => prop.default.clone().unwrap_or(Value::Bool(false)),
        SchemaType::Object => prop
            .default
            .clone()
            .unwrap_or_else(|| Value::Object(generate_default(prop))),
    }
}
