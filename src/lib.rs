//! # Schemaform - Schema-Driven Forms
//!
//! Schemaform turns a JSON-Schema-like object description into an editable
//! form model: which widget each property gets, how it is labeled, and how
//! user input becomes the next value object.
//!
//! ## Features
//!
//! - **Widget resolution**: date pickers, multi-line text, selects, text and
//!   numeric inputs chosen from type, format and constraints
//! - **Default values**: type-appropriate starting records from a schema
//! - **Validation errors**: `jsonschema` errors folded into per-field messages
//! - **Tabular forms**: column layout and windowed cell sets for large lists
//! - **Settings**: date pattern, locale and grid metrics via the `config` crate
//!
//! ## Quick Start
//!
//! ```rust
//! use schemaform::{FieldConfigs, FormSettings, RecordForm, SchemaNode, ErrorMap, generate_default};
//!
//! let schema = SchemaNode::from_json(r#"{
//!     "type": "object",
//!     "properties": { "firstName": { "type": "string" } },
//!     "required": ["firstName"]
//! }"#)?;
//! let value = generate_default(&schema);
//! let settings = FormSettings::default();
//!
//! let form = RecordForm {
//!     schema: &schema,
//!     value: &value,
//!     errors: &ErrorMap::new(),
//!     configs: &FieldConfigs::new(),
//!     settings: &settings,
//!     disable_fields: false,
//! };
//! let rows = form.rows()?;
//! assert_eq!(rows[0].title, "First Name");
//! # Ok::<(), schemaform::FormError>(())
//! ```
//!
//! ## Architecture
//!
//! Everything in this crate is a pure function of its inputs. Value objects
//! are never mutated in place: every change produces a new copy with one key
//! replaced, which the host stores and feeds back on the next render.

pub mod dates;
pub mod defaults;
pub mod error;
pub mod field_config;
pub mod list;
pub mod record;
pub mod schema;
pub mod settings;
pub mod text;
pub mod validation;
pub mod widget;

pub use defaults::{generate_default, ValueObject};
pub use error::FormError;
pub use field_config::{FieldConfig, FieldConfigs, InputType, SelectOption, ValueExtractor};
pub use list::{Cell, Column, ColumnKind, GridLayout, HeaderCell, ListForm};
pub use record::{FieldRow, RecordForm, ACTION_KEY};
pub use schema::{SchemaNode, SchemaType};
pub use settings::FormSettings;
pub use text::camel_to_title;
pub use validation::{to_field_errors, ErrorMap, RawValidationError};
pub use widget::{FieldRequest, FieldResolver, WidgetDescriptor, WidgetKind, NOT_A_NUMBER, PLACEHOLDER_OPTION};
