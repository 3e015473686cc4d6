use crate::spec::field::{Field, FieldType};
use crate::spec::form::FormSchema;
use crate::spec::validator::ValidatorKind;
use crate::value::{FieldValue, FileHandle, FormData};

/// Produce example data for every field of the form.
///
/// The values satisfy the length and range rules; `pattern` rules are not
/// taken into account.
pub fn generate(schema: &FormSchema) -> FormData {
    schema
        .fields
        .iter()
        .map(|field| (field.name.clone(), example_value(field)))
        .collect()
}

fn example_value(field: &Field) -> FieldValue {
    let first_option = field.options().first().map(|option| option.value.clone());
    match field.kind {
        FieldType::Email => FieldValue::text("example@example.com"),
        FieldType::Date => FieldValue::text("2024-01-01"),
        FieldType::Number => {
            let min = threshold(field, &ValidatorKind::Min);
            let max = threshold(field, &ValidatorKind::Max);
            let mut value = 1.0;
            if let Some(min) = min
                && min > value
            {
                value = min;
            }
            if let Some(max) = max
                && max < value
            {
                value = max;
            }
            FieldValue::Number(value)
        }
        FieldType::Text | FieldType::Password | FieldType::Textarea => {
            FieldValue::Text(sized_text(field, format!("example-{}", field.name)))
        }
        FieldType::Select | FieldType::Radio => {
            FieldValue::Text(first_option.unwrap_or_default())
        }
        FieldType::Checkbox if field.is_checkbox_group() => {
            FieldValue::List(first_option.into_iter().collect())
        }
        FieldType::Checkbox => FieldValue::Bool(true),
        FieldType::File => FieldValue::File(FileHandle {
            name: "example.pdf".into(),
            size: 1024,
            media_type: Some("application/pdf".into()),
        }),
    }
}

fn sized_text(field: &Field, mut text: String) -> String {
    if let Some(min) = threshold(field, &ValidatorKind::MinLength) {
        let min = min.max(0.0).ceil() as usize;
        while text.chars().count() < min {
            text.push('x');
        }
    }
    if let Some(max) = threshold(field, &ValidatorKind::MaxLength) {
        let max = max.max(0.0).floor() as usize;
        text = text.chars().take(max).collect();
    }
    text
}

fn threshold(field: &Field, kind: &ValidatorKind) -> Option<f64> {
    field
        .validators
        .iter()
        .filter(|validator| &validator.kind == kind)
        .find_map(|validator| validator.value.as_ref().and_then(|value| value.as_threshold()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples;
    use crate::validate::validate_form;

    #[test]
    fn example_data_passes_validation_for_bundled_samples() {
        for name in samples::NAMES {
            let schema = samples::by_name(name).expect("sample");
            let data = generate(&schema);
            let errors = validate_form(&data, &schema);
            assert!(errors.is_empty(), "{name}: {errors:?}");
        }
    }

    #[test]
    fn choice_fields_use_their_first_option() {
        let data = generate(&samples::contact_form());
        assert_eq!(data["subject"], FieldValue::text("general"));
    }
}
