//! Leptos components for schema-driven forms.
//!
//! The components are thin views over the `schemaform` crate: they resolve
//! widgets through it and hand every edit back to the host as a fresh value
//! object.

pub mod components;

pub use components::field_widget::FieldWidget;
pub use components::list_schema_form::ListSchemaForm;
pub use components::schema_form::SchemaForm;

/// Install the panic hook and route `log` output to the browser console.
///
/// Call once from the host application's entry point.
pub fn init_console() {
    console_error_panic_hook::set_once();
    // A second call finds the logger already installed
    let _ = console_log::init_with_level(log::Level::Info);
}
