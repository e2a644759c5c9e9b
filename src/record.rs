//! Single-record form model
//!
//! Walks an object schema's properties in declaration order and produces one
//! labeled row per visible field. Rendering the rows is up to the host; the
//! `ui` crate does it with Leptos.

use serde_json::Value;

use crate::defaults::ValueObject;
use crate::error::Result;
use crate::field_config::{is_hidden, FieldConfigs};
use crate::schema::SchemaNode;
use crate::settings::FormSettings;
use crate::text::camel_to_title;
use crate::validation::ErrorMap;
use crate::widget::{FieldRequest, FieldResolver, WidgetDescriptor};

/// Synthetic key of the row-action column; never marked required
pub const ACTION_KEY: &str = "Action";

/// One visible field of the form
#[derive(Clone, Debug, PartialEq)]
pub struct FieldRow {
    pub key: String,
    pub title: String,
    pub required: bool,
    /// `None` for an array column that could not be resolved
    pub widget: Option<WidgetDescriptor>,
    pub error: Option<String>,
    /// Target for the "open link" control
    pub link: Option<String>,
}

/// Props of one single-record form render
#[derive(Clone, Copy, Debug)]
pub struct RecordForm<'a> {
    pub schema: &'a SchemaNode,
    pub value: &'a ValueObject,
    pub errors: &'a ErrorMap,
    pub configs: &'a FieldConfigs,
    pub settings: &'a FormSettings,
    pub disable_fields: bool,
}

impl<'a> RecordForm<'a> {
    /// Resolve every visible field.
    ///
    /// Fails on the first property whose type has no widget mapping.
    pub fn rows(&self) -> Result<Vec<FieldRow>> {
        let resolver = FieldResolver::new(self.settings, self.disable_fields);

        self.schema
            .properties
            .iter()
            .filter(|(key, _)| !key.is_empty())
            .filter(|(key, _)| !is_hidden(self.configs, key))
            .map(|(key, prop)| {
                let config = self.configs.get(key);
                let title = field_title(key, prop, config.and_then(|c| c.title.as_deref()));
                let value = self.value.get(key);
                let error = self.errors.get(key).map(String::as_str);

                let widget = resolver.resolve(FieldRequest {
                    schema: prop,
                    key,
                    title: &title,
                    value,
                    error,
                    config,
                })?;

                let link = match value {
                    Some(Value::String(url)) if config.is_some_and(|c| c.is_url) && !url.is_empty() => {
                        Some(url.clone())
                    }
                    _ => None,
                };

                Ok(FieldRow {
                    key: key.to_string(),
                    required: key != ACTION_KEY && self.schema.is_required(key),
                    title,
                    widget,
                    error: error.map(str::to_string),
                    link,
                })
            })
            .collect()
    }
}

/// Config title, then schema title, then the title-cased key
pub fn field_title(key: &str, schema: &SchemaNode, config_title: Option<&str>) -> String {
    config_title
        .map(str::to_string)
        .or_else(|| schema.title.clone())
        .unwrap_or_else(|| camel_to_title(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field_config::FieldConfig;
    use serde_json::json;

    fn schema() -> SchemaNode {
        SchemaNode::from_value(&json!({
            "type": "object",
            "properties": {
                "firstName": { "type": "string" },
                "email": { "type": "string", "title": "E-mail" },
                "age": { "type": "integer" },
                "Action": { "type": "string" },
                "website": { "type": "string" },
                "": { "type": "string" }
            },
            "required": ["firstName", "Action", "age"]
        }))
        .unwrap()
    }

    #[test]
    fn test_rows_in_declaration_order() {
        let schema = schema();
        let value = ValueObject::new();
        let errors = ErrorMap::new();
        let configs = FieldConfigs::new();
        let settings = FormSettings::default();
        let form = RecordForm {
            schema: &schema,
            value: &value,
            errors: &errors,
            configs: &configs,
            settings: &settings,
            disable_fields: false,
        };

        let rows = form.rows().unwrap();
        let keys: Vec<&str> = rows.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["firstName", "email", "age", "Action", "website"]);
    }

    #[test]
    fn test_required_markers_skip_action() {
        let schema = schema();
        let value = ValueObject::new();
        let errors = ErrorMap::new();
        let configs = FieldConfigs::new();
        let settings = FormSettings::default();
        let form = RecordForm {
            schema: &schema,
            value: &value,
            errors: &errors,
            configs: &configs,
            settings: &settings,
            disable_fields: false,
        };

        let rows = form.rows().unwrap();
        let required: Vec<&str> = rows.iter().filter(|r| r.required).map(|r| r.key.as_str()).collect();
        assert_eq!(required, vec!["firstName", "age"]);
    }

    #[test]
    fn test_titles_errors_links_and_hidden() {
        let schema = schema();
        let mut value = ValueObject::new();
        value.insert("website".to_string(), json!("https://example.com"));
        let mut errors = ErrorMap::new();
        errors.insert("email".to_string(), "must be email".to_string());
        let mut configs = FieldConfigs::new();
        configs.insert("age".to_string(), FieldConfig::hidden());
        configs.insert(
            "website".to_string(),
            FieldConfig { is_url: true, title: Some("Homepage".to_string()), ..Default::default() },
        );
        let settings = FormSettings::default();
        let form = RecordForm {
            schema: &schema,
            value: &value,
            errors: &errors,
            configs: &configs,
            settings: &settings,
            disable_fields: false,
        };

        let rows = form.rows().unwrap();
        assert!(rows.iter().all(|r| r.key != "age"));

        let first = rows.iter().find(|r| r.key == "firstName").unwrap();
        assert_eq!(first.title, "First Name");

        let email = rows.iter().find(|r| r.key == "email").unwrap();
        assert_eq!(email.title, "E-mail");
        assert_eq!(email.error.as_deref(), Some("must be email"));
        assert!(email.widget.as_ref().unwrap().has_error());

        let website = rows.iter().find(|r| r.key == "website").unwrap();
        assert_eq!(website.title, "Homepage");
        assert_eq!(website.link.as_deref(), Some("https://example.com"));
        assert_eq!(website.widget.as_ref().unwrap().display_text(), "https://example.com");
    }

    #[test]
    fn test_unsupported_property_fails_render() {
        let schema = SchemaNode::from_value(&json!({
            "type": "object",
            "properties": {
                "name": { "type": "string" },
                "active": { "type": "boolean" }
            }
        }))
        .unwrap();
        let value = ValueObject::new();
        let errors = ErrorMap::new();
        let configs = FieldConfigs::new();
        let settings = FormSettings::default();
        let form = RecordForm {
            schema: &schema,
            value: &value,
            errors: &errors,
            configs: &configs,
            settings: &settings,
            disable_fields: false,
        };

        assert!(form.rows().unwrap_err().is_unsupported());
    }

    #[test]
    fn test_hidden_unsupported_property_is_skipped() {
        let schema = SchemaNode::from_value(&json!({
            "type": "object",
            "properties": { "active": { "type": "boolean" } }
        }))
        .unwrap();
        let value = ValueObject::new();
        let errors = ErrorMap::new();
        let mut configs = FieldConfigs::new();
        configs.insert("active".to_string(), FieldConfig::hidden());
        let settings = FormSettings::default();
        let form = RecordForm {
            schema: &schema,
            value: &value,
            errors: &errors,
            configs: &configs,
            settings: &settings,
            disable_fields: true,
        };

        assert!(form.rows().unwrap().is_empty());
    }
}
