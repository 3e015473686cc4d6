//! Pure predicates, one per rule kind.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::RuleError;
use crate::spec::validator::{Validator, ValidatorKind};
use crate::value::FieldValue;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid"));

/// Present and non-empty: trimmed text, a non-empty list, or any other value.
pub fn required(value: Option<&FieldValue>) -> bool {
    match value {
        None => false,
        Some(FieldValue::Text(text)) => !text.trim().is_empty(),
        Some(FieldValue::List(items)) => !items.is_empty(),
        Some(_) => true,
    }
}

pub fn email(value: &FieldValue) -> bool {
    EMAIL.is_match(&value.as_text())
}

pub fn min_length(min: f64, value: &FieldValue) -> Result<bool, RuleError> {
    let length = measure(&ValidatorKind::MinLength, value)?;
    Ok(length as f64 >= min)
}

pub fn max_length(max: f64, value: &FieldValue) -> Result<bool, RuleError> {
    let length = measure(&ValidatorKind::MaxLength, value)?;
    Ok(length as f64 <= max)
}

/// Compiles `source` on every call; an uncompilable source is a configuration error.
pub fn pattern(source: &str, value: &FieldValue) -> Result<bool, RuleError> {
    let regex = Regex::new(source).map_err(|err| RuleError::InvalidPattern {
        pattern: source.to_string(),
        reason: err.to_string(),
    })?;
    Ok(regex.is_match(&value.as_text()))
}

pub fn min(threshold: f64, value: &FieldValue) -> bool {
    value.as_number() >= threshold
}

pub fn max(threshold: f64, value: &FieldValue) -> bool {
    value.as_number() <= threshold
}

/// Evaluates one configured rule against a value.
///
/// Returns `None` for rule kinds this library does not know; those are skipped.
pub fn check(validator: &Validator, value: &FieldValue) -> Option<Result<bool, RuleError>> {
    let outcome = match &validator.kind {
        ValidatorKind::Email => Ok(email(value)),
        ValidatorKind::MinLength => threshold(validator).and_then(|min| min_length(min, value)),
        ValidatorKind::MaxLength => threshold(validator).and_then(|max| max_length(max, value)),
        ValidatorKind::Pattern => {
            let source = validator
                .value
                .as_ref()
                .map(|value| value.as_text())
                .unwrap_or_default();
            pattern(&source, value)
        }
        ValidatorKind::Min => threshold(validator).map(|threshold| min(threshold, value)),
        ValidatorKind::Max => threshold(validator).map(|threshold| max(threshold, value)),
        ValidatorKind::Other(_) => return None,
    };
    Some(outcome)
}

fn threshold(validator: &Validator) -> Result<f64, RuleError> {
    validator
        .value
        .as_ref()
        .and_then(|value| value.as_threshold())
        .ok_or_else(|| RuleError::InvalidThreshold {
            kind: validator.kind.to_string(),
            value: validator
                .value
                .as_ref()
                .map(|value| value.as_text())
                .unwrap_or_default(),
        })
}

fn measure(kind: &ValidatorKind, value: &FieldValue) -> Result<usize, RuleError> {
    value.length().ok_or_else(|| RuleError::Unmeasurable {
        kind: kind.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::validator::ValidatorValue;

    #[test]
    fn required_rejects_blank_text_and_empty_lists() {
        assert!(!required(None));
        assert!(!required(Some(&FieldValue::text("   "))));
        assert!(!required(Some(&FieldValue::List(Vec::new()))));
        assert!(required(Some(&FieldValue::text("x"))));
        assert!(required(Some(&FieldValue::Bool(false))));
    }

    #[test]
    fn email_requires_at_and_dot() {
        assert!(email(&FieldValue::text("a@b.co")));
        assert!(!email(&FieldValue::text("not-an-email")));
        assert!(!email(&FieldValue::text("a b@c.de")));
        assert!(!email(&FieldValue::text("a@bcde")));
    }

    #[test]
    fn length_rules_count_characters() {
        assert_eq!(min_length(3.0, &FieldValue::text("héé")), Ok(true));
        assert_eq!(max_length(2.0, &FieldValue::text("abc")), Ok(false));
        assert_eq!(
            min_length(1.0, &FieldValue::List(vec!["a".into()])),
            Ok(true)
        );
        assert!(min_length(1.0, &FieldValue::Bool(true)).is_err());
    }

    #[test]
    fn pattern_searches_unanchored() {
        assert_eq!(pattern("[0-9]+", &FieldValue::text("abc123")), Ok(true));
        assert_eq!(pattern("^[0-9]+$", &FieldValue::text("abc123")), Ok(false));
    }

    #[test]
    fn malformed_pattern_is_a_configuration_error() {
        let err = pattern("([a-z", &FieldValue::text("abc")).unwrap_err();
        assert!(matches!(err, RuleError::InvalidPattern { .. }));
    }

    #[test]
    fn numeric_rules_coerce_text() {
        assert!(min(18.0, &FieldValue::text("21")));
        assert!(!max(10.0, &FieldValue::text("11")));
        assert!(!min(0.0, &FieldValue::text("abc")));
    }

    #[test]
    fn check_skips_unknown_kinds() {
        let validator = Validator::new(ValidatorKind::Other("luhn".into()));
        assert!(check(&validator, &FieldValue::text("4111")).is_none());
    }

    #[test]
    fn check_reports_blank_threshold() {
        let validator = Validator::new(ValidatorKind::MinLength)
            .with_value(ValidatorValue::Text(String::new()));
        let outcome = check(&validator, &FieldValue::text("abc")).expect("known kind");
        assert!(matches!(outcome, Err(RuleError::InvalidThreshold { .. })));
    }
}
