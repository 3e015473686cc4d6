use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use form_spec::{
    FieldPatch, FieldType, FormSchema, IdAllocator, Validator, ValidatorPatch, editor,
};

/// Input shape describing the form to author.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthoringInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldInput>,
}

/// Field metadata collected from CLI interactions or JSON inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldInput {
    #[serde(rename = "type")]
    pub kind: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Option texts; each becomes an option whose value and label are the text.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validators: Vec<Validator>,
}

impl FieldInput {
    pub fn new(kind: FieldType) -> Self {
        Self {
            kind,
            name: None,
            label: None,
            required: false,
            placeholder: None,
            options: Vec::new(),
            rows: None,
            validators: Vec::new(),
        }
    }
}

/// Checks the input before any schema is built.
pub fn validate_input(input: &AuthoringInput) -> Result<(), String> {
    let mut names = HashSet::new();
    for (index, field) in input.fields.iter().enumerate() {
        if let Some(name) = &field.name {
            if name.trim().is_empty() {
                return Err(format!("field #{} has an empty name", index + 1));
            }
            if !names.insert(name.as_str()) {
                return Err(format!("field name '{}' is used more than once", name));
            }
        }
        if !field.options.is_empty() && !field.kind.has_options() {
            return Err(format!(
                "field #{} is a {} field and cannot have options",
                index + 1,
                field.kind
            ));
        }
        if field.rows.is_some() && field.kind != FieldType::Textarea {
            return Err(format!("field #{} sets rows but is not a textarea", index + 1));
        }
    }
    Ok(())
}

/// Builds a schema by replaying the input as editor operations.
pub fn build_schema(input: &AuthoringInput, ids: &mut IdAllocator) -> Result<FormSchema, String> {
    validate_input(input)?;
    let mut schema = editor::update_meta(
        &FormSchema::default(),
        input.title.clone(),
        input.description.clone(),
    );

    for field in &input.fields {
        schema = editor::add_field(&schema, field.kind, ids);
        let id = schema
            .fields
            .last()
            .map(|added| added.id.clone())
            .ok_or("field was not added")?;

        let patch = FieldPatch {
            name: field.name.clone(),
            label: field.label.clone(),
            placeholder: field.placeholder.clone(),
            required: Some(field.required),
            rows: field.rows.map(Some),
        };
        schema = editor::update_field(&schema, &id, patch).map_err(|err| err.to_string())?;

        for option in &field.options {
            schema = editor::add_option(&schema, &id, option, ids).map_err(|err| err.to_string())?;
        }

        for validator in &field.validators {
            schema = editor::add_validator(&schema, &id, validator.kind.clone())
                .map_err(|err| err.to_string())?;
            let index = schema
                .field(&id)
                .map(|added| added.validators.len().saturating_sub(1))
                .unwrap_or_default();
            let patch = ValidatorPatch {
                value: Some(validator.value.clone()),
                message: Some(validator.message.clone()),
                ..ValidatorPatch::default()
            };
            schema = editor::update_validator(&schema, &id, index, patch)
                .map_err(|err| err.to_string())?;
        }
    }

    Ok(schema)
}
