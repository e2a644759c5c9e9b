//! Validation-error adapter
//!
//! Schema validation itself is done by `jsonschema`; this module only turns
//! its error list into the flat key → message map the forms display.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::error::{FormError, Result};

/// Field key → message
pub type ErrorMap = HashMap<String, String>;

/// One validator error as reported by the validation library
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawValidationError {
    /// JSON pointer to the failing value, e.g. `/email`
    pub instance_path: String,
    pub message: String,
}

impl RawValidationError {
    pub fn new(instance_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { instance_path: instance_path.into(), message: message.into() }
    }
}

/// Fold validator errors into an [`ErrorMap`].
///
/// The leading path separator is stripped to get the field key. When
/// several errors share a path the last one wins.
pub fn to_field_errors(errors: &[RawValidationError]) -> ErrorMap {
    errors.iter().fold(ErrorMap::new(), |mut map, error| {
        let key = error.instance_path.strip_prefix('/').unwrap_or(&error.instance_path);
        map.insert(key.to_string(), error.message.clone());
        map
    })
}

/// Validate `value` against `schema` and collect every error.
///
/// An `Err` means the schema itself could not be compiled.
pub fn validate(schema: &Value, value: &Value) -> Result<Vec<RawValidationError>> {
    let validator = jsonschema::validator_for(schema).map_err(|e| FormError::Validator(e.to_string()))?;

    let errors: Vec<RawValidationError> = validator
        .iter_errors(value)
        .map(|error| RawValidationError::new(error.instance_path.to_string(), error.to_string()))
        .collect();

    tracing::debug!(count = errors.len(), "Validated form value");
    Ok(errors)
}

/// Validate and fold in one step
pub fn field_errors(schema: &Value, value: &Value) -> Result<ErrorMap> {
    Ok(to_field_errors(&validate(schema, value)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_error() {
        let errors = vec![RawValidationError::new("/email", "must be email")];
        let map = to_field_errors(&errors);
        assert_eq!(map.len(), 1);
        assert_eq!(map["email"], "must be email");
    }

    #[test]
    fn test_last_error_wins() {
        let errors = vec![
            RawValidationError::new("/name", "too short"),
            RawValidationError::new("/name", "bad pattern"),
        ];
        assert_eq!(to_field_errors(&errors)["name"], "bad pattern");
    }

    #[test]
    fn test_root_and_nested_paths() {
        let errors = vec![
            RawValidationError::new("", "missing property"),
            RawValidationError::new("/address/city", "required"),
        ];
        let map = to_field_errors(&errors);
        assert_eq!(map[""], "missing property");
        assert_eq!(map["address/city"], "required");
    }

    #[test]
    fn test_empty_list() {
        assert!(to_field_errors(&[]).is_empty());
    }

    #[test]
    fn test_raw_error_deserializes_from_camel_case() {
        let raw: RawValidationError =
            serde_json::from_value(json!({ "instancePath": "/age", "message": "must be integer" })).unwrap();
        assert_eq!(raw, RawValidationError::new("/age", "must be integer"));
    }

    #[test]
    fn test_validator_reports_type_errors() {
        let schema = json!({
            "type": "object",
            "properties": {
                "age": { "type": "integer" },
                "name": { "type": "string" }
            }
        });
        let value = json!({ "age": null, "name": "Ada" });

        let map = field_errors(&schema, &value).unwrap();
        assert_eq!(map.len(), 1);
        assert!(map.contains_key("age"));
    }

    #[test]
    fn test_valid_value_has_no_errors() {
        let schema = json!({ "type": "object", "properties": { "age": { "type": "integer" } } });
        assert!(validate(&schema, &json!({ "age": 3 })).unwrap().is_empty());
    }

    #[test]
    fn test_bad_schema() {
        let schema = json!({ "type": 12 });
        assert!(matches!(validate(&schema, &json!({})), Err(FormError::Validator(_))));
    }
}
