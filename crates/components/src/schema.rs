//! Configuration schemas and validation.
//!
//! A schema is a structural description of the configuration keys a
//! component instance may carry:
//!
//! ```json
//! { "fields": [ { "name": "endpoint", "type": "string", "required": true } ] }
//! ```
//!
//! Validation checks that every required field is present and
//! type-compatible.  Unknown keys are ignored for forward compatibility.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ConfigError;

/// Permitted JSON types for a configuration field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Object,
    Array,
}

impl FieldType {
    fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
        }
    }

    fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Object => value.is_object(),
            Self::Array => value.is_array(),
        }
    }
}

/// One declared configuration field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
}

/// A component's configuration schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigSchema {
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

impl ConfigSchema {
    /// Parse a schema from its stored JSON form.
    pub fn from_value(value: &Value) -> Result<Self, ConfigError> {
        serde_json::from_value(value.clone())
            .map_err(|e| ConfigError::MalformedSchema(e.to_string()))
    }

    /// Validate an instance configuration against this schema.
    ///
    /// Every required field must be present with a compatible type;
    /// optional fields are type-checked only when present; keys the schema
    /// does not mention pass through untouched.
    pub fn validate_config(&self, config: &Value) -> Result<(), ConfigError> {
        let object = config.as_object().ok_or(ConfigError::NotAnObject)?;

        for spec in &self.fields {
            match object.get(&spec.name) {
                None if spec.required => {
                    return Err(ConfigError::MissingField(spec.name.clone()));
                }
                None => {}
                Some(value) => {
                    if !spec.field_type.matches(value) {
                        return Err(ConfigError::TypeMismatch {
                            field: spec.name.clone(),
                            expected: spec.field_type.name(),
                        });
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> ConfigSchema {
        ConfigSchema::from_value(&json!({
            "fields": [
                { "name": "endpoint", "type": "string", "required": true },
                { "name": "batch_size", "type": "number" },
                { "name": "headers", "type": "object" }
            ]
        }))
        .expect("schema should parse")
    }

    #[test]
    fn valid_config_passes() {
        let config = json!({ "endpoint": "https://example.com", "batch_size": 100 });
        assert!(schema().validate_config(&config).is_ok());
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let config = json!({ "batch_size": 100 });
        assert_eq!(
            schema().validate_config(&config),
            Err(ConfigError::MissingField("endpoint".into()))
        );
    }

    #[test]
    fn type_mismatch_is_rejected() {
        let config = json!({ "endpoint": 42 });
        assert!(matches!(
            schema().validate_config(&config),
            Err(ConfigError::TypeMismatch { field, .. }) if field == "endpoint"
        ));
    }

    #[test]
    fn optional_field_is_only_checked_when_present() {
        let ok = json!({ "endpoint": "x" });
        assert!(schema().validate_config(&ok).is_ok());

        let bad = json!({ "endpoint": "x", "batch_size": "not-a-number" });
        assert!(schema().validate_config(&bad).is_err());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let config = json!({ "endpoint": "x", "future_flag": true });
        assert!(schema().validate_config(&config).is_ok());
    }

    #[test]
    fn non_object_config_is_rejected() {
        assert_eq!(
            schema().validate_config(&json!([1, 2, 3])),
            Err(ConfigError::NotAnObject)
        );
    }

    #[test]
    fn malformed_schema_is_rejected() {
        assert!(ConfigSchema::from_value(&json!({ "fields": "nope" })).is_err());
    }
}
