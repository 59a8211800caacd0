//! Error types for model conversions.

use thiserror::Error;

/// Result type alias for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while converting external values into model types.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A JSON value has no scalar representation.
    #[error("unsupported scalar value: expected {expected}, found {found}")]
    UnsupportedValue {
        /// What the conversion accepts.
        expected: &'static str,
        /// The JSON type that was supplied.
        found: &'static str,
    },

    /// JSON serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ModelError {
    /// Create an unsupported value error.
    #[inline]
    pub fn unsupported_value(expected: &'static str, found: &'static str) -> Self {
        ModelError::UnsupportedValue { expected, found }
    }
}

/// Get the type name of a JSON value.
#[inline]
pub fn value_type_name(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
