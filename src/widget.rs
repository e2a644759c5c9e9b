//! Field-widget resolution
//!
//! Maps one property schema plus its current value and override config to a
//! [`WidgetDescriptor`]: which control to show, how it is parametrized, and
//! how raw user input turns into the next value object.
//!
//! String fields are resolved in this order:
//! 1. `date` / `date-time` format: date picker
//! 2. `maxLength` above the textarea threshold: multi-line text
//! 3. forced select or schema `enum`: select with a leading placeholder
//! 4. anything else: single-line text (`url` mode for URL fields)
//!
//! Integers get a numeric input. Array keys of the form
//! `<arrayKey>/<column>` are resolved against the column schema found in
//! the field config. Every other type is an unsupported-schema error.

use chrono::{Locale, NaiveDateTime};
use serde_json::Value;

use crate::dates::DateFormatter;
use crate::defaults::ValueObject;
use crate::error::{FormError, Result};
use crate::field_config::{FieldConfig, InputType, SelectOption, ValueExtractor};
use crate::schema::{SchemaNode, SchemaType};
use crate::settings::FormSettings;
use crate::text::camel_to_title;

/// Written for integer input that does not parse. JSON has no NaN, so the
/// sentinel is `null`, which schema validation reports as a type error.
pub const NOT_A_NUMBER: Value = Value::Null;

/// Value of the synthetic first option of every select
pub const PLACEHOLDER_OPTION: &str = "default-option";

// ============================================================================
// Widget Descriptor
// ============================================================================

/// Input mode of a single-line text widget
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputMode {
    Text,
    Url,
}

impl InputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputMode::Text => "text",
            InputMode::Url => "url",
        }
    }
}

/// Which control to render
#[derive(Clone, Debug, PartialEq)]
pub enum WidgetKind {
    /// `selected` is `None` when the current value is empty or unparsable;
    /// hosts show the current date in that case.
    DatePicker { selected: Option<NaiveDateTime> },
    TextArea { rows: u32 },
    /// Options start with the placeholder entry
    Select { options: Vec<SelectOption> },
    TextInput { mode: InputMode },
    Number { minimum: Option<f64> },
}

/// How raw input becomes the changed key's new value
#[derive(Clone, Debug, PartialEq)]
enum UpdateRule {
    Text,
    Integer,
    Date { pattern: String, locale: Locale },
    Extract(ValueExtractor),
}

/// Resolved presentation and behaviour for one field
#[derive(Clone, Debug, PartialEq)]
pub struct WidgetDescriptor {
    pub key: String,
    pub title: String,
    pub kind: WidgetKind,
    /// Current value, `Null` when absent
    pub value: Value,
    pub disabled: bool,
    pub placeholder: Option<String>,
    pub error: Option<String>,
    update: UpdateRule,
}

impl WidgetDescriptor {
    /// Text to show in the control
    pub fn display_text(&self) -> String {
        match &self.value {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    pub fn has_error(&self) -> bool {
        self.error.as_deref().is_some_and(|e| !e.is_empty())
    }

    /// Compute the next value object for raw input `raw`.
    ///
    /// The result is a fresh copy of `current` with the changed key (or the
    /// extractor's entries) replaced; `current` itself is never touched.
    /// Returns `None` when a date commit cannot be parsed.
    pub fn next_value(&self, current: &ValueObject, raw: &str) -> Option<ValueObject> {
        let mut next = current.clone();
        match &self.update {
            UpdateRule::Extract(extractor) => {
                next.extend(extractor.extract(&self.key, raw));
            }
            UpdateRule::Text => {
                next.insert(self.key.clone(), Value::String(raw.to_string()));
            }
            UpdateRule::Integer => {
                next.insert(self.key.clone(), parse_integer(raw));
            }
            UpdateRule::Date { pattern, locale } => {
                let formatter = DateFormatter::new(pattern, *locale);
                let Some(text) = formatter.parse(raw).and_then(|date| formatter.format(date)) else {
                    tracing::warn!(key = %self.key, raw, "Ignoring unparsable date input");
                    return None;
                };
                next.insert(self.key.clone(), Value::String(text));
            }
        }
        Some(next)
    }

    /// Run one change: compute the next value and hand it to
    /// `on_input_change` together with the changed key. The callback runs at
    /// most once; returns whether it ran.
    pub fn apply_change<F>(&self, current: &ValueObject, raw: &str, on_input_change: F) -> bool
    where
        F: FnOnce(ValueObject, &str),
    {
        match self.next_value(current, raw) {
            Some(next) => {
                on_input_change(next, &self.key);
                true
            }
            None => false,
        }
    }
}

/// Strict integer parse; anything else yields [`NOT_A_NUMBER`]
pub fn parse_integer(raw: &str) -> Value {
    raw.trim().parse::<i64>().map(Value::from).unwrap_or(NOT_A_NUMBER)
}

// ============================================================================
// Resolver
// ============================================================================

/// Inputs describing one field to resolve
#[derive(Clone, Copy, Debug)]
pub struct FieldRequest<'a> {
    pub schema: &'a SchemaNode,
    pub key: &'a str,
    pub title: &'a str,
    pub value: Option<&'a Value>,
    pub error: Option<&'a str>,
    pub config: Option<&'a FieldConfig>,
}

/// Resolves field requests under one form's settings
#[derive(Clone, Copy, Debug)]
pub struct FieldResolver<'a> {
    settings: &'a FormSettings,
    disable_all: bool,
}

impl<'a> FieldResolver<'a> {
    pub fn new(settings: &'a FormSettings, disable_all: bool) -> Self {
        Self { settings, disable_all }
    }

    /// Pick and parametrize the widget for `req`.
    ///
    /// `Ok(None)` means an array column that could not be resolved; no
    /// widget is rendered for it.
    pub fn resolve(&self, req: FieldRequest<'_>) -> Result<Option<WidgetDescriptor>> {
        match req.schema.kind {
            SchemaType::String => Ok(Some(self.string_widget(req.schema, req))),
            SchemaType::Integer => Ok(Some(self.integer_widget(req.schema, req))),
            SchemaType::Array => Ok(self.array_column(req)),
            kind @ (SchemaType::Number | SchemaType::Boolean | SchemaType::Object) => {
                Err(FormError::UnsupportedSchema { key: req.key.to_string(), kind })
            }
        }
    }

    fn array_column(&self, req: FieldRequest<'_>) -> Option<WidgetDescriptor> {
        let column = req.key.rsplit('/').next().unwrap_or(req.key);
        let column_schema = req
            .config
            .and_then(|c| c.schema.as_ref())
            .and_then(|row| row.properties.get(column));

        let Some(column_schema) = column_schema else {
            tracing::debug!(key = req.key, column, "No column schema for array field");
            return None;
        };

        match column_schema.kind {
            SchemaType::String => {
                let title = camel_to_title(column);
                Some(self.string_widget(column_schema, FieldRequest { title: &title, ..req }))
            }
            SchemaType::Integer => Some(self.integer_widget(column_schema, req)),
            kind => {
                tracing::debug!(key = req.key, %kind, "Array column type has no widget");
                None
            }
        }
    }

    fn string_widget(&self, schema: &SchemaNode, req: FieldRequest<'_>) -> WidgetDescriptor {
        let input_type = req.config.and_then(|c| c.input_type);

        if schema.is_date() || input_type == Some(InputType::Date) {
            let formatter = self.settings.date_formatter();
            let selected = req.value.and_then(Value::as_str).and_then(|raw| formatter.parse(raw));
            let rule = UpdateRule::Date {
                pattern: self.settings.date_format.clone(),
                locale: self.settings.locale(),
            };
            return self.descriptor(schema, req, WidgetKind::DatePicker { selected }, None, rule);
        }

        let placeholder = Some(format!("Enter {}", req.title));

        if schema.max_length.is_some_and(|max| max > self.settings.textarea_threshold) {
            let kind = WidgetKind::TextArea { rows: self.settings.textarea_rows };
            return self.descriptor(schema, req, kind, placeholder, UpdateRule::Text);
        }

        if input_type == Some(InputType::Select) || schema.has_enum() {
            let mut options = vec![SelectOption::new(PLACEHOLDER_OPTION, format!("Select {}", req.title))];
            match req.config.and_then(|c| c.options.as_ref()) {
                Some(configured) => options.extend(configured.iter().cloned()),
                None => options.extend(
                    schema
                        .enum_values
                        .iter()
                        .flatten()
                        .filter_map(SelectOption::from_enum_value),
                ),
            }
            return self.descriptor(schema, req, WidgetKind::Select { options }, None, UpdateRule::Text);
        }

        let is_url = req.config.is_some_and(|c| c.is_url)
            || matches!(schema.format.as_deref(), Some("uri") | Some("url"));
        let mode = if is_url { InputMode::Url } else { InputMode::Text };
        self.descriptor(schema, req, WidgetKind::TextInput { mode }, placeholder, UpdateRule::Text)
    }

    fn integer_widget(&self, schema: &SchemaNode, req: FieldRequest<'_>) -> WidgetDescriptor {
        let kind = WidgetKind::Number { minimum: schema.minimum };
        let placeholder = Some(format!("Enter {}", req.title));
        self.descriptor(schema, req, kind, placeholder, UpdateRule::Integer)
    }

    fn descriptor(
        &self,
        schema: &SchemaNode,
        req: FieldRequest<'_>,
        kind: WidgetKind,
        placeholder: Option<String>,
        rule: UpdateRule,
    ) -> WidgetDescriptor {
        let update = match req.config.and_then(|c| c.extract_value.clone()) {
            Some(extractor) => UpdateRule::Extract(extractor),
            None => rule,
        };

        WidgetDescriptor {
            key: req.key.to_string(),
            title: req.title.to_string(),
            kind,
            value: req.value.cloned().unwrap_or(Value::Null),
            disabled: schema.read_only || self.disable_all || req.config.is_some_and(|c| c.disabled),
            placeholder,
            error: req.error.map(str::to_string),
            update,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
