use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::spec::field::{Field, FieldType};
use crate::spec::validator::ValidatorKind;

pub const DEFAULT_TITLE: &str = "My Form";
pub const DEFAULT_DESCRIPTION: &str = "Create your form by adding fields";

/// Complete form definition; the unit of persistence, export, and import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FormSchema {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Display and validation order.
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl Default for FormSchema {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.into(),
            description: DEFAULT_DESCRIPTION.into(),
            fields: Vec::new(),
        }
    }
}

/// Non-fatal finding about a schema, e.g. a rule that cannot apply to its field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaWarning {
    pub field_id: String,
    pub field_name: String,
    pub message: String,
}

impl FormSchema {
    pub fn field(&self, id: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.id == id)
    }

    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Rejects schemas whose fields collide on id or name.
    pub fn check(&self) -> Result<(), SchemaError> {
        let mut ids = HashSet::new();
        let mut names = HashSet::new();
        for field in &self.fields {
            if !ids.insert(field.id.as_str()) {
                return Err(SchemaError::DuplicateFieldId {
                    id: field.id.clone(),
                });
            }
            if field.name.trim().is_empty() {
                return Err(SchemaError::EmptyFieldName {
                    id: field.id.clone(),
                });
            }
            if !names.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateFieldName {
                    name: field.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Reports validators and attributes that have no meaning for their field type.
    pub fn lint(&self) -> Vec<SchemaWarning> {
        let mut warnings = Vec::new();
        for field in &self.fields {
            let mut warn = |message: String| {
                warnings.push(SchemaWarning {
                    field_id: field.id.clone(),
                    field_name: field.name.clone(),
                    message,
                })
            };

            for validator in &field.validators {
                let applies = match &validator.kind {
                    ValidatorKind::Email | ValidatorKind::Pattern => field.kind.is_text_like(),
                    ValidatorKind::MinLength | ValidatorKind::MaxLength => {
                        field.kind.is_text_like() || field.is_checkbox_group()
                    }
                    ValidatorKind::Min | ValidatorKind::Max => {
                        matches!(field.kind, FieldType::Number | FieldType::Text)
                    }
                    ValidatorKind::Other(name) => {
                        warn(format!("unknown validator '{}' is ignored", name));
                        continue;
                    }
                };
                if !applies {
                    warn(format!(
                        "{} validator has no effect on a {} field",
                        validator.kind, field.kind
                    ));
                }
            }

            if field.options.is_some() && !field.kind.has_options() {
                warn(format!("options are ignored on a {} field", field.kind));
            }
            if field.rows.is_some() && field.kind != FieldType::Textarea {
                warn(format!("rows are ignored on a {} field", field.kind));
            }
        }
        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::validator::Validator;

    fn field(id: &str, name: &str, kind: FieldType) -> Field {
        Field {
            id: id.into(),
            kind,
            name: name.into(),
            label: String::new(),
            required: false,
            placeholder: String::new(),
            validators: Vec::new(),
            options: None,
            rows: None,
        }
    }

    #[test]
    fn check_rejects_duplicate_names() {
        let schema = FormSchema {
            fields: vec![
                field("1", "email", FieldType::Email),
                field("2", "email", FieldType::Text),
            ],
            ..FormSchema::default()
        };
        assert_eq!(
            schema.check(),
            Err(SchemaError::DuplicateFieldName {
                name: "email".into()
            })
        );
    }

    #[test]
    fn check_rejects_duplicate_ids() {
        let schema = FormSchema {
            fields: vec![
                field("1", "a", FieldType::Text),
                field("1", "b", FieldType::Text),
            ],
            ..FormSchema::default()
        };
        assert!(matches!(
            schema.check(),
            Err(SchemaError::DuplicateFieldId { .. })
        ));
    }

    #[test]
    fn lint_flags_pattern_on_checkbox() {
        let mut agree = field("1", "agree", FieldType::Checkbox);
        agree
            .validators
            .push(Validator::new(ValidatorKind::Pattern));
        let schema = FormSchema {
            fields: vec![agree],
            ..FormSchema::default()
        };
        let warnings = schema.lint();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("pattern"));
    }
}
