//! Validation of submitted shop config payloads.
//!
//! `POST /config` accepts a JSON object whose fields are merged into the
//! shop's encrypted config. The payload is checked against a fixed schema
//! before anything is written: unknown keys and wrongly-typed values are
//! rejected outright.

use serde_json::{Map, Value};
use thiserror::Error;

/// Expected JSON type for a config field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    String,
    Bool,
}

/// The writable shop config schema.
///
/// `password` is the shop password gate's shared secret; everything else is
/// storefront presentation and contact configuration.
const CONFIG_SCHEMA: &[(&str, FieldKind)] = &[
    ("hostname", FieldKind::String),
    ("title", FieldKind::String),
    ("byline", FieldKind::String),
    ("metaDescription", FieldKind::String),
    ("logo", FieldKind::String),
    ("favicon", FieldKind::String),
    ("css", FieldKind::String),
    ("currency", FieldKind::String),
    ("supportEmail", FieldKind::String),
    ("emailSubject", FieldKind::String),
    ("cartSummaryNote", FieldKind::String),
    ("pgpPublicKey", FieldKind::String),
    ("password", FieldKind::String),
    ("discountCodes", FieldKind::Bool),
    ("disableCheckout", FieldKind::Bool),
];

/// Reasons a config payload fails validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    /// A key that is not part of the schema.
    #[error("unknown config field: {0}")]
    UnknownField(String),

    /// A known key carrying the wrong JSON type.
    #[error("field {field} must be {expected}")]
    WrongType {
        field: String,
        expected: &'static str,
    },
}

/// Validate a submitted config object against the schema.
///
/// An empty object is valid (a no-op merge).
///
/// # Errors
///
/// Returns the first offending field.
pub fn validate_config(config: &Map<String, Value>) -> Result<(), ConfigValidationError> {
    for (key, value) in config {
        let Some((_, kind)) = CONFIG_SCHEMA.iter().find(|(name, _)| name == key) else {
            return Err(ConfigValidationError::UnknownField(key.clone()));
        };

        let ok = match kind {
            FieldKind::String => value.is_string(),
            FieldKind::Bool => value.is_boolean(),
        };

        if !ok {
            return Err(ConfigValidationError::WrongType {
                field: key.clone(),
                expected: match kind {
                    FieldKind::String => "a string",
                    FieldKind::Bool => "a boolean",
                },
            });
        }
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn obj(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_valid_payload() {
        let config = obj(json!({
            "hostname": "shop.example.com",
            "title": "My Shop",
            "discountCodes": true,
            "password": "letmein12",
        }));
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_empty_payload_is_valid() {
        assert!(validate_config(&Map::new()).is_ok());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let config = obj(json!({"adminEmail": "x@example.com"}));
        assert_eq!(
            validate_config(&config),
            Err(ConfigValidationError::UnknownField("adminEmail".to_owned()))
        );
    }

    #[test]
    fn test_wrong_type_rejected() {
        let config = obj(json!({"discountCodes": "yes"}));
        assert!(matches!(
            validate_config(&config),
            Err(ConfigValidationError::WrongType { .. })
        ));
    }

    #[test]
    fn test_string_field_rejects_number() {
        let config = obj(json!({"title": 7}));
        assert!(matches!(
            validate_config(&config),
            Err(ConfigValidationError::WrongType { .. })
        ));
    }
}
