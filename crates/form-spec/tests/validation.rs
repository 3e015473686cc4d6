use serde_json::json;

use form_spec::{
    Field, FieldType, FieldValue, FormData, FormSchema, Validator, ValidatorKind, ValidatorValue,
    data_schema, example_data, parse_form_data, validate, validate_field, validate_form,
};

fn field(kind: FieldType, name: &str, label: &str, required: bool) -> Field {
    Field {
        id: name.into(),
        kind,
        name: name.into(),
        label: label.into(),
        required,
        placeholder: String::new(),
        validators: Vec::new(),
        options: None,
        rows: None,
    }
}

fn email_field() -> Field {
    let mut field = field(FieldType::Email, "email", "Email", true);
    field
        .validators
        .push(Validator::new(ValidatorKind::Email).with_message("bad email"));
    field
}

fn make_simple_form() -> FormSchema {
    let mut message = field(FieldType::Textarea, "message", "Message", false);
    message.validators.push(
        Validator::new(ValidatorKind::MinLength).with_value(ValidatorValue::Number(10.into())),
    );
    FormSchema {
        title: "Simple".into(),
        description: String::new(),
        fields: vec![email_field(), message],
    }
}

#[test]
fn required_email_field_reports_one_error_at_a_time() {
    let field = email_field();
    assert_eq!(
        validate_field(Some(&FieldValue::text("")), &field),
        vec!["Email is required"]
    );
    assert_eq!(validate_field(None, &field), vec!["Email is required"]);
    assert_eq!(
        validate_field(Some(&FieldValue::text("not-an-email")), &field),
        vec!["bad email"]
    );
    assert!(validate_field(Some(&FieldValue::text("a@b.co")), &field).is_empty());
}

#[test]
fn min_length_uses_default_message() {
    let schema = make_simple_form();
    let message = &schema.fields[1];
    assert_eq!(
        validate_field(Some(&FieldValue::text("short")), message),
        vec!["Minimum length is 10"]
    );
    // optional and blank: no rule runs
    assert!(validate_field(Some(&FieldValue::text("")), message).is_empty());
}

#[test]
fn every_failing_rule_reports_in_order() {
    let mut code = field(FieldType::Text, "code", "Code", false);
    code.validators = vec![
        Validator::new(ValidatorKind::MinLength).with_value(ValidatorValue::number(5.0)),
        Validator::new(ValidatorKind::Pattern)
            .with_value(ValidatorValue::Text("^[0-9]+$".into()))
            .with_message("digits only"),
    ];
    assert_eq!(
        validate_field(Some(&FieldValue::text("ab")), &code),
        vec!["Minimum length is 5", "digits only"]
    );
}

#[test]
fn misconfigured_rules_surface_as_diagnostics() {
    let mut code = field(FieldType::Text, "code", "Code", false);
    code.validators = vec![
        Validator::new(ValidatorKind::Pattern).with_value(ValidatorValue::Text("(".into())),
        Validator::new(ValidatorKind::MaxLength).with_value(ValidatorValue::Text(String::new())),
    ];
    let errors = validate_field(Some(&FieldValue::text("abc")), &code);
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().all(|error| error.starts_with("Code: ")));
}

#[test]
fn validate_form_keeps_first_error_and_skips_valid_fields() {
    let schema = make_simple_form();
    let data = parse_form_data(&json!({ "message": "short", "email": null })).expect("data");
    let errors = validate_form(&data, &schema);
    assert_eq!(errors.len(), 2);
    assert_eq!(errors["email"], "Email is required");
    assert_eq!(errors["message"], "Minimum length is 10");

    let data = parse_form_data(&json!({ "email": "a@b.co" })).expect("data");
    assert!(validate_form(&data, &schema).is_empty());
}

#[test]
fn unchecked_required_checkbox_is_reported() {
    let terms = field(FieldType::Checkbox, "terms", "Terms", true);
    let schema = FormSchema {
        fields: vec![terms],
        ..FormSchema::default()
    };
    let mut data = FormData::new();
    data.insert("terms".into(), FieldValue::Bool(false));
    assert_eq!(validate_form(&data, &schema)["terms"], "Terms is required");
    data.insert("terms".into(), FieldValue::Bool(true));
    assert!(validate_form(&data, &schema).is_empty());
}

#[test]
fn validate_reports_unknown_fields_without_failing() {
    let schema = make_simple_form();
    let data = parse_form_data(&json!({ "email": "a@b.co", "extra": "x" })).expect("data");
    let result = validate(&schema, &data);
    assert!(result.valid);
    assert_eq!(result.unknown_fields, vec!["extra"]);
}

#[test]
fn data_schema_contains_required_properties() {
    let schema = make_simple_form();
    let generated = data_schema(&schema);
    let props = generated["properties"].as_object().expect("properties");
    assert!(props.contains_key("email"));
    assert_eq!(props["message"]["minLength"], 10);
    let required = generated["required"].as_array().expect("required");
    assert_eq!(required, &vec![json!("email")]);
}

#[test]
fn example_data_validates_cleanly() {
    let schema = make_simple_form();
    let data = example_data(&schema);
    assert_eq!(
        data.get("email"),
        Some(&FieldValue::text("example@example.com"))
    );
    assert!(validate_form(&data, &schema).is_empty());
}

#[test]
fn schema_round_trip_preserves_field_order() {
    let schema = make_simple_form();
    let text = serde_json::to_string(&schema).expect("serialize");
    let back: FormSchema = serde_json::from_str(&text).expect("deserialize");
    let names = back
        .fields
        .iter()
        .map(|field| field.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, ["email", "message"]);
    assert_eq!(back, schema);
}

#[test]
fn number_text_that_browsers_reject_fails_min() {
    let mut age = field(FieldType::Number, "age", "Age", true);
    age.validators
        .push(Validator::new(ValidatorKind::Min).with_value(ValidatorValue::Number(18.into())));

    for raw in ["inf", "infinity", "INF"] {
        assert_eq!(
            validate_field(Some(&FieldValue::text(raw)), &age),
            vec!["Minimum value is 18"],
            "{raw}"
        );
    }
    assert!(validate_field(Some(&FieldValue::text("0x20")), &age).is_empty());
    assert!(validate_field(Some(&FieldValue::text("Infinity")), &age).is_empty());
}

#[test]
fn unknown_rule_kinds_are_skipped() {
    let mut card = field(FieldType::Text, "card", "Card", true);
    card.validators.push(
        Validator::new(ValidatorKind::Other("creditCard".into()))
            .with_value(ValidatorValue::Text("visa".into()))
            .with_message("bad card"),
    );
    card.validators.push(
        Validator::new(ValidatorKind::MinLength).with_value(ValidatorValue::Number(3.into())),
    );

    assert_eq!(
        validate_field(Some(&FieldValue::text("ab")), &card),
        vec!["Minimum length is 3"]
    );
    assert!(validate_field(Some(&FieldValue::text("abcd")), &card).is_empty());
}

#[test]
fn fractional_length_bounds_round_inward_in_data_schema() {
    let mut bio = field(FieldType::Textarea, "bio", "Bio", false);
    bio.validators
        .push(Validator::new(ValidatorKind::MinLength).with_value(ValidatorValue::number(1.5)));
    bio.validators
        .push(Validator::new(ValidatorKind::MaxLength).with_value(ValidatorValue::number(2.5)));
    let schema = FormSchema {
        title: "Bio".into(),
        description: String::new(),
        fields: vec![bio],
    };

    let generated = data_schema(&schema);
    assert_eq!(generated["properties"]["bio"]["minLength"], 2);
    assert_eq!(generated["properties"]["bio"]["maxLength"], 2);
    assert!(!validate_field(Some(&FieldValue::text("abc")), &schema.fields[0]).is_empty());
    assert!(validate_field(Some(&FieldValue::text("ab")), &schema.fields[0]).is_empty());
}
