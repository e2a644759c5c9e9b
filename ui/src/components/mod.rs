pub mod field_widget;
pub mod layout;
pub mod list_schema_form;
pub mod schema_form;
