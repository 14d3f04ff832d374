//! Configuration validation errors.

use thiserror::Error;

/// Raised when a node's configuration does not satisfy its component's
/// schema, or the schema itself cannot be parsed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required field is absent from the configuration.
    #[error("required configuration field '{0}' is missing")]
    MissingField(String),

    /// A field is present but holds a value of the wrong type.
    #[error("configuration field '{field}' must be of type {expected}")]
    TypeMismatch { field: String, expected: &'static str },

    /// The configuration is not a JSON object.
    #[error("configuration must be a JSON object")]
    NotAnObject,

    /// The stored schema could not be parsed.
    #[error("malformed configuration schema: {0}")]
    MalformedSchema(String),
}
