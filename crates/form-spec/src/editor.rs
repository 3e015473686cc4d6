//! Copy-on-write schema edits.
//!
//! Every operation takes the current snapshot by reference and returns a new
//! one; the caller swaps it in wholesale. Edits that would leave two fields
//! sharing a name are rejected.

use crate::defaults::{IdAllocator, create_field_for};
use crate::error::SchemaError;
use crate::spec::field::{Field, FieldOption, FieldType};
use crate::spec::form::FormSchema;
use crate::spec::validator::{Validator, ValidatorKind, ValidatorValue};

/// Reorder direction for [`move_field`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Basic attribute changes for one field. `None` leaves the attribute as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldPatch {
    pub name: Option<String>,
    pub label: Option<String>,
    pub placeholder: Option<String>,
    pub required: Option<bool>,
    pub rows: Option<Option<u32>>,
}

/// Rule changes. A new `kind` keeps the rule at its position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatorPatch {
    pub kind: Option<ValidatorKind>,
    pub value: Option<Option<ValidatorValue>>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionPatch {
    pub value: Option<String>,
    pub label: Option<String>,
}

/// Appends a default field of `kind` to the end of the form.
///
/// Ids whose generated `field_<id>` name or id is already taken are skipped.
pub fn add_field(schema: &FormSchema, kind: FieldType, ids: &mut IdAllocator) -> FormSchema {
    let mut next = schema.clone();
    next.fields.push(create_field_for(schema, kind, ids));
    next
}

pub fn update_field(
    schema: &FormSchema,
    id: &str,
    patch: FieldPatch,
) -> Result<FormSchema, SchemaError> {
    let next = with_field(schema, id, |field| {
        if let Some(name) = patch.name {
            field.name = name;
        }
        if let Some(label) = patch.label {
            field.label = label;
        }
        if let Some(placeholder) = patch.placeholder {
            field.placeholder = placeholder;
        }
        if let Some(required) = patch.required {
            field.required = required;
        }
        if let Some(rows) = patch.rows {
            field.rows = rows;
        }
        Ok(())
    })?;
    next.check()?;
    Ok(next)
}

pub fn delete_field(schema: &FormSchema, id: &str) -> Result<FormSchema, SchemaError> {
    let index = position(schema, id)?;
    let mut next = schema.clone();
    next.fields.remove(index);
    Ok(next)
}

/// Swaps a field with its neighbour. Moving past either end leaves the order unchanged.
pub fn move_field(
    schema: &FormSchema,
    id: &str,
    direction: Direction,
) -> Result<FormSchema, SchemaError> {
    let index = position(schema, id)?;
    let mut next = schema.clone();
    match direction {
        Direction::Up if index > 0 => next.fields.swap(index, index - 1),
        Direction::Down if index + 1 < next.fields.len() => next.fields.swap(index, index + 1),
        _ => {}
    }
    Ok(next)
}

pub fn update_meta(
    schema: &FormSchema,
    title: Option<String>,
    description: Option<String>,
) -> FormSchema {
    let mut next = schema.clone();
    if let Some(title) = title {
        next.title = title;
    }
    if let Some(description) = description {
        next.description = description;
    }
    next
}

/// Appends a blank rule of `kind` (empty value and message) to a field.
pub fn add_validator(
    schema: &FormSchema,
    id: &str,
    kind: ValidatorKind,
) -> Result<FormSchema, SchemaError> {
    with_field(schema, id, |field| {
        field
            .validators
            .push(Validator::new(kind).with_value(ValidatorValue::Text(String::new())));
        Ok(())
    })
}

pub fn update_validator(
    schema: &FormSchema,
    id: &str,
    index: usize,
    patch: ValidatorPatch,
) -> Result<FormSchema, SchemaError> {
    with_field(schema, id, |field| {
        let validator =
            field
                .validators
                .get_mut(index)
                .ok_or_else(|| SchemaError::ValidatorNotFound {
                    id: id.to_string(),
                    index,
                })?;
        if let Some(kind) = patch.kind {
            validator.kind = kind;
        }
        if let Some(value) = patch.value {
            validator.value = value;
        }
        if let Some(message) = patch.message {
            validator.message = message;
        }
        Ok(())
    })
}

pub fn remove_validator(
    schema: &FormSchema,
    id: &str,
    index: usize,
) -> Result<FormSchema, SchemaError> {
    with_field(schema, id, |field| {
        if index >= field.validators.len() {
            return Err(SchemaError::ValidatorNotFound {
                id: id.to_string(),
                index,
            });
        }
        field.validators.remove(index);
        Ok(())
    })
}

/// Adds an option whose value and label are both the trimmed `text`.
///
/// Blank text leaves the schema unchanged.
pub fn add_option(
    schema: &FormSchema,
    id: &str,
    text: &str,
    ids: &mut IdAllocator,
) -> Result<FormSchema, SchemaError> {
    let text = text.trim();
    if text.is_empty() {
        position(schema, id)?;
        return Ok(schema.clone());
    }
    ids.reserve(schema);
    with_field(schema, id, |field| {
        choice_options(field)?.push(FieldOption {
            id: ids.next_id(),
            value: text.to_string(),
            label: text.to_string(),
        });
        Ok(())
    })
}

pub fn update_option(
    schema: &FormSchema,
    id: &str,
    index: usize,
    patch: OptionPatch,
) -> Result<FormSchema, SchemaError> {
    with_field(schema, id, |field| {
        let option = choice_options(field)?
            .get_mut(index)
            .ok_or_else(|| SchemaError::OptionNotFound {
                id: id.to_string(),
                index,
            })?;
        if let Some(value) = patch.value {
            option.value = value;
        }
        if let Some(label) = patch.label {
            option.label = label;
        }
        Ok(())
    })
}

pub fn remove_option(
    schema: &FormSchema,
    id: &str,
    index: usize,
) -> Result<FormSchema, SchemaError> {
    with_field(schema, id, |field| {
        let options = choice_options(field)?;
        if index >= options.len() {
            return Err(SchemaError::OptionNotFound {
                id: id.to_string(),
                index,
            });
        }
        options.remove(index);
        Ok(())
    })
}

fn position(schema: &FormSchema, id: &str) -> Result<usize, SchemaError> {
    schema
        .fields
        .iter()
        .position(|field| field.id == id)
        .ok_or_else(|| SchemaError::FieldNotFound { id: id.to_string() })
}

fn with_field(
    schema: &FormSchema,
    id: &str,
    edit: impl FnOnce(&mut Field) -> Result<(), SchemaError>,
) -> Result<FormSchema, SchemaError> {
    let index = position(schema, id)?;
    let mut next = schema.clone();
    edit(&mut next.fields[index])?;
    Ok(next)
}

fn choice_options(field: &mut Field) -> Result<&mut Vec<FieldOption>, SchemaError> {
    if !field.kind.has_options() {
        return Err(SchemaError::OptionsNotSupported {
            id: field.id.clone(),
            kind: field.kind.to_string(),
        });
    }
    Ok(field.options.get_or_insert_with(Vec::new))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema_with(kinds: &[FieldType]) -> (FormSchema, IdAllocator) {
        let mut ids = IdAllocator::starting_at(1);
        let mut schema = FormSchema::default();
        for kind in kinds {
            schema = add_field(&schema, *kind, &mut ids);
        }
        (schema, ids)
    }

    #[test]
    fn edits_leave_the_previous_snapshot_untouched() {
        let (schema, _) = schema_with(&[FieldType::Text]);
        let next = update_field(
            &schema,
            "1",
            FieldPatch {
                label: Some("First name".into()),
                required: Some(true),
                ..FieldPatch::default()
            },
        )
        .expect("update");
        assert_eq!(schema.fields[0].label, "Text Field");
        assert_eq!(next.fields[0].label, "First name");
        assert!(next.fields[0].required);
    }

    #[test]
    fn rename_to_existing_name_is_rejected() {
        let (schema, _) = schema_with(&[FieldType::Text, FieldType::Email]);
        let err = update_field(
            &schema,
            "2",
            FieldPatch {
                name: Some("field_1".into()),
                ..FieldPatch::default()
            },
        )
        .unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateFieldName {
                name: "field_1".into()
            }
        );
    }

    #[test]
    fn move_field_swaps_neighbours_and_stops_at_ends() {
        let (schema, _) = schema_with(&[FieldType::Text, FieldType::Email, FieldType::Date]);
        let moved = move_field(&schema, "3", Direction::Up).expect("move");
        let order: Vec<_> = moved.fields.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(order, ["1", "3", "2"]);
        let unchanged = move_field(&schema, "1", Direction::Up).expect("move");
        assert_eq!(unchanged, schema);
    }

    #[test]
    fn delete_unknown_field_fails() {
        let (schema, _) = schema_with(&[FieldType::Text]);
        assert!(matches!(
            delete_field(&schema, "42"),
            Err(SchemaError::FieldNotFound { .. })
        ));
    }

    #[test]
    fn options_are_trimmed_and_blank_text_ignored() {
        let (schema, mut ids) = schema_with(&[FieldType::Radio]);
        let next = add_option(&schema, "1", "  Yes ", &mut ids).expect("add");
        let next = add_option(&next, "1", "   ", &mut ids).expect("noop");
        let options = next.fields[0].options();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].value, "Yes");
        assert_eq!(options[0].label, "Yes");
        assert_ne!(options[0].id, "1");
    }

    #[test]
    fn options_require_a_choice_field() {
        let (schema, mut ids) = schema_with(&[FieldType::Text]);
        assert!(matches!(
            add_option(&schema, "1", "x", &mut ids),
            Err(SchemaError::OptionsNotSupported { .. })
        ));
    }

    #[test]
    fn validator_lifecycle() {
        let (schema, _) = schema_with(&[FieldType::Textarea]);
        let next = add_validator(&schema, "1", ValidatorKind::MinLength).expect("add");
        let next = update_validator(
            &next,
            "1",
            0,
            ValidatorPatch {
                value: Some(Some(ValidatorValue::Number(10.into()))),
                message: Some("too short".into()),
                ..ValidatorPatch::default()
            },
        )
        .expect("update");
        assert_eq!(next.fields[0].validators[0].message, "too short");
        let next = remove_validator(&next, "1", 0).expect("remove");
        assert!(next.fields[0].validators.is_empty());
        assert!(remove_validator(&next, "1", 0).is_err());
    }

    #[test]
    fn changing_rule_kind_keeps_its_position() {
        let (schema, _) = schema_with(&[FieldType::Text]);
        let next = add_validator(&schema, "1", ValidatorKind::MinLength).expect("add");
        let next = add_validator(&next, "1", ValidatorKind::Pattern).expect("add");
        let next = update_validator(
            &next,
            "1",
            0,
            ValidatorPatch {
                kind: Some(ValidatorKind::MaxLength),
                ..ValidatorPatch::default()
            },
        )
        .expect("update");
        let kinds: Vec<_> = next.fields[0]
            .validators
            .iter()
            .map(|validator| validator.kind.clone())
            .collect();
        assert_eq!(kinds, [ValidatorKind::MaxLength, ValidatorKind::Pattern]);
    }

    #[test]
    fn add_field_skips_names_already_taken() {
        let (schema, _) = schema_with(&[FieldType::Text]);
        let schema = update_field(
            &schema,
            "1",
            FieldPatch {
                name: Some("field_2".into()),
                ..FieldPatch::default()
            },
        )
        .expect("rename");
        assert!(schema.check().is_ok());

        let next = add_field(&schema, FieldType::Email, &mut IdAllocator::starting_at(1));
        let names: Vec<_> = next.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["field_2", "field_3"]);
        assert_eq!(next.fields[1].id, "3");
        assert!(next.check().is_ok());
    }
}
