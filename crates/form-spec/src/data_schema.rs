//! JSON Schema documents: one for the schema format itself, one per form for its data.

use serde_json::{Map, Value, json};

use crate::spec::field::{Field, FieldType};
use crate::spec::form::FormSchema;
use crate::spec::validator::ValidatorKind;

/// JSON Schema of the form-definition document.
pub fn document_schema() -> Value {
    schemars::schema_for!(FormSchema).to_value()
}

/// JSON Schema describing the data a form accepts.
pub fn generate(schema: &FormSchema) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for field in &schema.fields {
        properties.insert(field.name.clone(), field_schema(field));
        if field.required {
            required.push(Value::String(field.name.clone()));
        }
    }

    let mut root = Map::new();
    root.insert(
        "$schema".into(),
        Value::String("https://json-schema.org/draft/2020-12/schema".into()),
    );
    if !schema.title.is_empty() {
        root.insert("title".into(), Value::String(schema.title.clone()));
    }
    root.insert("type".into(), Value::String("object".into()));
    root.insert("properties".into(), Value::Object(properties));
    if !required.is_empty() {
        root.insert("required".into(), Value::Array(required));
    }
    Value::Object(root)
}

fn field_schema(field: &Field) -> Value {
    let option_values = field
        .options()
        .iter()
        .map(|option| Value::String(option.value.clone()))
        .collect::<Vec<_>>();

    let mut schema = match field.kind {
        FieldType::Text | FieldType::Password | FieldType::Textarea => json!({ "type": "string" }),
        FieldType::Email => json!({ "type": "string", "format": "email" }),
        FieldType::Date => json!({ "type": "string", "format": "date" }),
        FieldType::Number => json!({ "type": ["number", "string"] }),
        FieldType::Select | FieldType::Radio => {
            let mut schema = json!({ "type": "string" });
            if !option_values.is_empty() {
                schema["enum"] = Value::Array(option_values.clone());
            }
            schema
        }
        FieldType::Checkbox if field.is_checkbox_group() => json!({
            "type": "array",
            "items": { "type": "string", "enum": option_values },
            "uniqueItems": true,
        }),
        FieldType::Checkbox => json!({ "type": "boolean" }),
        FieldType::File => json!({
            "type": "object",
            "properties": {
                "name": { "type": "string" },
                "size": { "type": "integer", "minimum": 0 },
                "media_type": { "type": "string" },
            },
            "required": ["name"],
        }),
    };

    let is_array = field.is_checkbox_group();
    let is_string = field.kind.is_text_like() && field.kind != FieldType::Number;
    for validator in &field.validators {
        let threshold = validator.value.as_ref().and_then(|value| value.as_threshold());
        let keyword = match (&validator.kind, is_array, is_string) {
            (ValidatorKind::MinLength, true, _) => Some("minItems"),
            (ValidatorKind::MaxLength, true, _) => Some("maxItems"),
            (ValidatorKind::MinLength, false, true) => Some("minLength"),
            (ValidatorKind::MaxLength, false, true) => Some("maxLength"),
            (ValidatorKind::Min, _, _) if field.kind == FieldType::Number => Some("minimum"),
            (ValidatorKind::Max, _, _) if field.kind == FieldType::Number => Some("maximum"),
            (ValidatorKind::Pattern, false, true) => {
                if let Some(source) = &validator.value {
                    schema["pattern"] = Value::String(source.as_text());
                }
                None
            }
            _ => None,
        };
        if let (Some(keyword), Some(threshold)) = (keyword, threshold)
            && threshold.is_finite()
        {
            schema[keyword] = match keyword {
                "minimum" | "maximum" => json!(threshold),
                "maxLength" | "maxItems" => json!(threshold.max(0.0).floor() as u64),
                _ => json!(threshold.max(0.0).ceil() as u64),
            };
        }
    }

    if !field.label.is_empty() {
        schema["title"] = Value::String(field.label.clone());
    }
    schema
}
