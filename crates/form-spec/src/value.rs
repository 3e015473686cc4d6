//! Submitted values keyed by field name.

use std::borrow::Cow;
use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Live map of submitted values keyed by field name.
pub type FormData = BTreeMap<String, FieldValue>;

/// First error message per failing field, keyed by field name.
pub type ValidationErrors = BTreeMap<String, String>;

/// Description of a user-selected file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FileHandle {
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
}

/// One submitted value. The shape depends on the field type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
    File(FileHandle),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn empty() -> Self {
        FieldValue::Text(String::new())
    }

    /// Absent-equivalent values: empty text or list, `false`, zero, NaN.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Bool(flag) => !flag,
            FieldValue::Number(number) => *number == 0.0 || number.is_nan(),
            FieldValue::Text(text) => text.is_empty(),
            FieldValue::List(items) => items.is_empty(),
            FieldValue::File(_) => false,
        }
    }

    /// String reading used by the text rules (email, pattern).
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            FieldValue::Text(text) => Cow::Borrowed(text),
            FieldValue::Bool(flag) => Cow::Owned(flag.to_string()),
            FieldValue::Number(number) => Cow::Owned(format_number(*number)),
            FieldValue::List(items) => Cow::Owned(items.join(",")),
            FieldValue::File(file) => Cow::Borrowed(&file.name),
        }
    }

    /// Numeric coercion used by `min`/`max`. Unreadable values are NaN.
    pub fn as_number(&self) -> f64 {
        match self {
            FieldValue::Number(number) => *number,
            FieldValue::Bool(flag) => {
                if *flag {
                    1.0
                } else {
                    0.0
                }
            }
            FieldValue::Text(text) => {
                if text.trim().is_empty() {
                    0.0
                } else {
                    parse_number(text).unwrap_or(f64::NAN)
                }
            }
            FieldValue::List(_) | FieldValue::File(_) => f64::NAN,
        }
    }

    /// Length for the length rules: characters of text, items of a list.
    pub fn length(&self) -> Option<usize> {
        match self {
            FieldValue::Text(text) => Some(text.chars().count()),
            FieldValue::List(items) => Some(items.len()),
            FieldValue::Bool(_) | FieldValue::Number(_) | FieldValue::File(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

/// Parse a JSON object into form data. `null` entries are treated as absent.
pub fn parse_form_data(value: &Value) -> Result<FormData, serde_json::Error> {
    let raw: BTreeMap<String, Option<FieldValue>> = serde_json::from_value(value.clone())?;
    Ok(raw
        .into_iter()
        .filter_map(|(name, value)| value.map(|value| (name, value)))
        .collect())
}

/// Reads typed text as a number, with the same grammar a browser number input uses.
///
/// Accepts decimal and exponent notation, `0x`/`0o`/`0b` integers and the exact
/// spellings `Infinity`, `+Infinity` and `-Infinity`. Anything else, including
/// `inf`, `nan` and blank text, has no reading.
pub fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    match text {
        "" => return None,
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }
    let radix = match text.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &text[2..];
        if digits.is_empty() {
            return None;
        }
        return digits.chars().try_fold(0.0_f64, |acc, c| {
            c.to_digit(radix).map(|digit| acc * f64::from(radix) + f64::from(digit))
        });
    }
    if !text
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
    {
        return None;
    }
    text.parse::<f64>().ok()
}

/// Formats a number the way a user typed it: integral values carry no fraction.
pub fn format_number(number: f64) -> String {
    if number.is_finite() && number.fract() == 0.0 && number.abs() < 1e15 {
        format!("{:.0}", number)
    } else {
        number.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn untagged_values_pick_the_natural_shape() {
        let data = parse_form_data(&json!({
            "agree": true,
            "age": 42,
            "name": "Ada",
            "tags": ["a", "b"],
            "cv": { "name": "cv.pdf", "size": 1024 },
            "skipped": null
        }))
        .expect("parse");
        assert_eq!(data["agree"], FieldValue::Bool(true));
        assert_eq!(data["age"], FieldValue::Number(42.0));
        assert_eq!(data["name"], FieldValue::text("Ada"));
        assert_eq!(data["tags"], FieldValue::List(vec!["a".into(), "b".into()]));
        assert!(matches!(data["cv"], FieldValue::File(_)));
        assert!(!data.contains_key("skipped"));
    }

    #[test]
    fn blank_values_match_falsy_inputs() {
        assert!(FieldValue::empty().is_blank());
        assert!(FieldValue::Bool(false).is_blank());
        assert!(FieldValue::Number(0.0).is_blank());
        assert!(FieldValue::List(Vec::new()).is_blank());
        assert!(!FieldValue::text(" ").is_blank());
    }

    #[test]
    fn numeric_coercion_handles_text_and_flags() {
        assert_eq!(FieldValue::text(" 12.5 ").as_number(), 12.5);
        assert_eq!(FieldValue::Bool(true).as_number(), 1.0);
        assert!(FieldValue::text("abc").as_number().is_nan());
    }

    #[test]
    fn number_text_follows_browser_grammar() {
        for spelling in ["inf", "INF", "infinity", "NaN", "-inf", "0x", "1_000", "1e"] {
            assert_eq!(parse_number(spelling), None, "{spelling}");
        }
        assert_eq!(parse_number("Infinity"), Some(f64::INFINITY));
        assert_eq!(parse_number("-Infinity"), Some(f64::NEG_INFINITY));
        assert_eq!(parse_number("0x20"), Some(32.0));
        assert_eq!(parse_number("0b101"), Some(5.0));
        assert_eq!(parse_number("0o17"), Some(15.0));
        assert_eq!(parse_number(" -1.5e2 "), Some(-150.0));
        assert_eq!(parse_number(".5"), Some(0.5));
        assert_eq!(parse_number("-0x20"), None);
    }
}
