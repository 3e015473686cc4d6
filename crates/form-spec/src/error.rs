//! Error types for schema editing, rule evaluation, codecs, and persistence.

use std::path::PathBuf;

use thiserror::Error;

/// Structural problems with a schema or an edit applied to it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("duplicate field name '{name}'")]
    DuplicateFieldName { name: String },

    #[error("duplicate field id '{id}'")]
    DuplicateFieldId { id: String },

    #[error("field name cannot be empty (field id '{id}')")]
    EmptyFieldName { id: String },

    #[error("field not found: {id}")]
    FieldNotFound { id: String },

    #[error("field '{id}' has no validator at index {index}")]
    ValidatorNotFound { id: String, index: usize },

    #[error("field '{id}' has no option at index {index}")]
    OptionNotFound { id: String, index: usize },

    #[error("field '{id}' of type {kind} does not take options")]
    OptionsNotSupported { id: String, kind: String },
}

/// A validator whose configuration cannot be evaluated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuleError {
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("{kind} rule needs a numeric value, got '{value}'")]
    InvalidThreshold { kind: String, value: String },

    #[error("{kind} rule cannot measure the length of this value")]
    Unmeasurable { kind: String },
}

/// Failures decoding or encoding exported/imported schemas.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("import fragment must start with '#import='")]
    MissingPrefix,

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("import payload is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("template render failed: {0}")]
    Template(#[from] handlebars::RenderError),

    #[error("imported schema rejected: {0}")]
    Schema(#[from] SchemaError),
}

/// Failures of the durable schema store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("stored schema at {path} is not valid JSON: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("stored schema rejected: {0}")]
    Schema(#[from] SchemaError),

    #[error("json encode error: {0}")]
    Encode(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_error_names_the_pattern() {
        let err = RuleError::InvalidPattern {
            pattern: "([a-z".into(),
            reason: "unclosed group".into(),
        };
        assert!(err.to_string().contains("([a-z"));
    }

    #[test]
    fn schema_error_display() {
        let err = SchemaError::DuplicateFieldName {
            name: "email".into(),
        };
        assert_eq!(err.to_string(), "duplicate field name 'email'");
    }
}
