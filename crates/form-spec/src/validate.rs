use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::spec::field::Field;
use crate::spec::form::FormSchema;
use crate::spec::validator::{Validator, ValidatorKind};
use crate::validators;
use crate::value::{FieldValue, FormData, ValidationErrors};

/// Validates one value against a field definition.
///
/// A failing `required` check short-circuits everything else. An optional
/// field with a blank value always passes. Otherwise every failing rule adds
/// one message, in declaration order.
pub fn validate_field(value: Option<&FieldValue>, field: &Field) -> Vec<String> {
    if field.required && !validators::required(value) {
        return vec![format!("{} is required", field.display_name())];
    }

    let value = match value {
        Some(value) if !value.is_blank() => value,
        _ => return Vec::new(),
    };

    let mut errors = Vec::new();
    for validator in &field.validators {
        match validators::check(validator, value) {
            None | Some(Ok(true)) => {}
            Some(Ok(false)) => errors.push(failure_message(validator)),
            Some(Err(err)) => {
                warn!(
                    field = %field.name,
                    validator = %validator.kind,
                    error = %err,
                    "validator configuration error"
                );
                errors.push(format!("{}: {}", field.display_name(), err));
            }
        }
    }
    errors
}

/// Validates every field of `schema` against `data`, keeping the first error per field.
///
/// Absent and blank values are checked as empty text, so an unchecked
/// required checkbox reports as required.
pub fn validate_form(data: &FormData, schema: &FormSchema) -> ValidationErrors {
    let empty = FieldValue::empty();
    let mut errors = ValidationErrors::new();
    for field in &schema.fields {
        let value = data
            .get(&field.name)
            .filter(|value| !value.is_blank())
            .unwrap_or(&empty);
        if let Some(first) = validate_field(Some(value), field).into_iter().next() {
            errors.insert(field.name.clone(), first);
        }
    }
    errors
}

/// Outcome of validating a whole submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: ValidationErrors,
    /// Submitted keys that no field declares.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unknown_fields: Vec<String>,
}

/// Runs [`validate_form`] and also reports submitted keys no field declares.
///
/// Unknown keys are informational; they do not make the submission invalid.
pub fn validate(schema: &FormSchema, data: &FormData) -> ValidationResult {
    let errors = validate_form(data, schema);
    let unknown_fields = data
        .keys()
        .filter(|name| schema.field_by_name(name).is_none())
        .cloned()
        .collect();
    ValidationResult {
        valid: errors.is_empty(),
        errors,
        unknown_fields,
    }
}

fn failure_message(validator: &Validator) -> String {
    if !validator.message.is_empty() {
        return validator.message.clone();
    }
    let threshold = validator
        .value
        .as_ref()
        .map(|value| value.as_text())
        .unwrap_or_default();
    match &validator.kind {
        ValidatorKind::Email => "Invalid email format".to_string(),
        ValidatorKind::MinLength => format!("Minimum length is {}", threshold),
        ValidatorKind::MaxLength => format!("Maximum length is {}", threshold),
        ValidatorKind::Pattern => "Invalid format".to_string(),
        ValidatorKind::Min => format!("Minimum value is {}", threshold),
        ValidatorKind::Max => format!("Maximum value is {}", threshold),
        ValidatorKind::Other(kind) => format!("{} check failed", kind),
    }
}
