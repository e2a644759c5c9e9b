//! Per-field override configuration

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::defaults::ValueObject;
use crate::schema::SchemaNode;

/// Per-key override records, keyed by property name
pub type FieldConfigs = HashMap<String, FieldConfig>;

/// Computes a partial update from `(key, raw input text)`.
///
/// The returned entries are merged over the current value in place of the
/// default single-key update.
#[derive(Clone)]
pub struct ValueExtractor(Arc<dyn Fn(&str, &str) -> ValueObject + Send + Sync>);

impl ValueExtractor {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str, &str) -> ValueObject + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn extract(&self, key: &str, raw: &str) -> ValueObject {
        (self.0)(key, raw)
    }
}

impl fmt::Debug for ValueExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ValueExtractor(..)")
    }
}

impl PartialEq for ValueExtractor {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Forced widget choice for a string field
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    Select,
    Input,
    Date,
}

// ============================================================================
// Select Option
// ============================================================================

/// One entry of a select widget
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    /// Stored value
    pub id: String,
    /// Displayed text
    pub label: String,
    pub disabled: bool,
}

impl SelectOption {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self { id: id.into(), label: label.into(), disabled: false }
    }

    /// Option whose id and label are the same text
    pub fn plain(text: impl Into<String>) -> Self {
        let text = text.into();
        Self { id: text.clone(), label: text, disabled: false }
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Build an option from a schema `enum` entry.
    ///
    /// Scalars become plain options. Objects are read by the named fields
    /// `id`, `label` and `disabled`; a missing label falls back to the id.
    pub fn from_enum_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self::plain(s.clone())),
            Value::Number(n) => Some(Self::plain(n.to_string())),
            Value::Bool(b) => Some(Self::plain(b.to_string())),
            Value::Object(map) => {
                let id = map.get("id").map(scalar_text)?;
                let label = map.get("label").map(scalar_text).unwrap_or_else(|| id.clone());
                let disabled = map.get("disabled").and_then(Value::as_bool).unwrap_or(false);
                Some(Self { id, label, disabled })
            }
            Value::Null | Value::Array(_) => None,
        }
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl<'de> Deserialize<'de> for SelectOption {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Entry {
            Plain(String),
            Record {
                id: String,
                label: Option<String>,
                #[serde(default)]
                disabled: bool,
            },
        }

        Ok(match Entry::deserialize(deserializer)? {
            Entry::Plain(text) => SelectOption::plain(text),
            Entry::Record { id, label, disabled } => SelectOption {
                label: label.unwrap_or_else(|| id.clone()),
                id,
                disabled,
            },
        })
    }
}

// ============================================================================
// Field Config
// ============================================================================

/// Override record for one property.
///
/// Every field is optional; an absent record means default behaviour:
/// visible, enabled, widget chosen from the schema, title derived from the
/// key, dynamic column width.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConfig {
    /// Replaces the default single-key update
    #[serde(skip)]
    pub extract_value: Option<ValueExtractor>,
    /// Row schema used to resolve `<arrayKey>/<column>` keys
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaNode>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_type: Option<InputType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<SelectOption>>,
    /// Show an "open link" control next to the widget
    #[serde(default)]
    pub is_url: bool,
    /// Fixed column width in pixels (list form)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl FieldConfig {
    pub fn hidden() -> Self {
        Self { hidden: true, ..Default::default() }
    }

    pub fn with_extractor(mut self, extractor: ValueExtractor) -> Self {
        self.extract_value = Some(extractor);
        self
    }
}

/// True when `key` has a config record that hides it
pub fn is_hidden(configs: &FieldConfigs, key: &str) -> bool {
    configs.get(key).map(|c| c.hidden).unwrap_or(false)
}
