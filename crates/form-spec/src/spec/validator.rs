use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::value::{format_number, parse_number};

/// Rule kinds understood by the validator library.
///
/// Kinds this crate does not know are kept verbatim in [`ValidatorKind::Other`]
/// so they survive import/export; validation skips them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ValidatorKind {
    Email,
    MinLength,
    MaxLength,
    Pattern,
    Min,
    Max,
    Other(String),
}

impl ValidatorKind {
    /// Known kinds, in the order the editor offers them.
    pub const KNOWN: [ValidatorKind; 6] = [
        ValidatorKind::Email,
        ValidatorKind::MinLength,
        ValidatorKind::MaxLength,
        ValidatorKind::Pattern,
        ValidatorKind::Min,
        ValidatorKind::Max,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            ValidatorKind::Email => "email",
            ValidatorKind::MinLength => "minLength",
            ValidatorKind::MaxLength => "maxLength",
            ValidatorKind::Pattern => "pattern",
            ValidatorKind::Min => "min",
            ValidatorKind::Max => "max",
            ValidatorKind::Other(name) => name,
        }
    }

    /// Whether the rule reads a numeric threshold from `value`.
    pub fn takes_threshold(&self) -> bool {
        matches!(
            self,
            ValidatorKind::MinLength
                | ValidatorKind::MaxLength
                | ValidatorKind::Min
                | ValidatorKind::Max
        )
    }
}

impl From<String> for ValidatorKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "email" => ValidatorKind::Email,
            "minLength" => ValidatorKind::MinLength,
            "maxLength" => ValidatorKind::MaxLength,
            "pattern" => ValidatorKind::Pattern,
            "min" => ValidatorKind::Min,
            "max" => ValidatorKind::Max,
            _ => ValidatorKind::Other(value),
        }
    }
}

impl From<ValidatorKind> for String {
    fn from(kind: ValidatorKind) -> Self {
        match kind {
            ValidatorKind::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ValidatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rule parameter: a threshold or a regular expression source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ValidatorValue {
    Number(serde_json::Number),
    Text(String),
}

impl ValidatorValue {
    /// Numeric reading of the parameter. Blank or non-numeric text has none.
    pub fn as_threshold(&self) -> Option<f64> {
        match self {
            ValidatorValue::Number(number) => number.as_f64(),
            ValidatorValue::Text(text) => parse_number(text),
        }
    }

    pub fn number(value: f64) -> Self {
        serde_json::Number::from_f64(value)
            .map(ValidatorValue::Number)
            .unwrap_or_else(|| ValidatorValue::Text(String::new()))
    }

    pub fn as_text(&self) -> String {
        match self {
            ValidatorValue::Number(number) => number
                .as_f64()
                .map(format_number)
                .unwrap_or_else(|| number.to_string()),
            ValidatorValue::Text(text) => text.clone(),
        }
    }
}

impl fmt::Display for ValidatorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

/// A named rule attached to a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Validator {
    #[serde(rename = "type")]
    #[schemars(with = "String")]
    pub kind: ValidatorKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<ValidatorValue>,
    /// User-facing override; blank means "use the default message".
    #[serde(default)]
    pub message: String,
}

impl Validator {
    pub fn new(kind: ValidatorKind) -> Self {
        Self {
            kind,
            value: None,
            message: String::new(),
        }
    }

    pub fn with_value(mut self, value: ValidatorValue) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}
