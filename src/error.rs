//! Error types for schema form resolution

use thiserror::Error;

use crate::schema::SchemaType;

/// Errors raised while turning a schema into form widgets
#[derive(Clone, Debug, Error, PartialEq)]
pub enum FormError {
    /// A property's declared type has no widget mapping
    #[error("Unsupported schema: property '{key}' of type '{kind}' has no widget mapping")]
    UnsupportedSchema { key: String, kind: SchemaType },

    /// The schema document could not be read as a schema node
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// The validator rejected the schema itself
    #[error("Validator error: {0}")]
    Validator(String),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(String),
}

impl From<serde_json::Error> for FormError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e.to_string())
    }
}

impl FormError {
    /// True when the error means schema and code are out of sync,
    /// as opposed to a malformed document.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::UnsupportedSchema { .. })
    }
}

pub type Result<T> = std::result::Result<T, FormError>;
