use serde_json::{Map, Value, json};

use crate::{
    spec::{
        field::{Field, FieldOption, FieldType},
        form::FormSchema,
    },
    value::{FieldValue, FormData, ValidationErrors, format_number},
};

const DEFAULT_TEXTAREA_ROWS: u32 = 4;

/// Input representation chosen for a field.
#[derive(Debug, Clone, PartialEq)]
pub enum InputWidget {
    /// Single-line `<input>`; `kind` is one of text, email, password, number, date.
    Input { kind: FieldType },
    TextArea { rows: u32 },
    Select { options: Vec<FieldOption> },
    /// Multi-value checkbox list; the value is a list of option values.
    CheckboxGroup { options: Vec<FieldOption> },
    /// Single toggle; the value is a boolean.
    Checkbox,
    Radio { options: Vec<FieldOption> },
    File,
}

impl InputWidget {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputWidget::Input { .. } => "input",
            InputWidget::TextArea { .. } => "textarea",
            InputWidget::Select { .. } => "select",
            InputWidget::CheckboxGroup { .. } => "checkbox_group",
            InputWidget::Checkbox => "checkbox",
            InputWidget::Radio { .. } => "radio",
            InputWidget::File => "file",
        }
    }

    pub fn options(&self) -> &[FieldOption] {
        match self {
            InputWidget::Select { options }
            | InputWidget::CheckboxGroup { options }
            | InputWidget::Radio { options } => options.as_slice(),
            _ => &[],
        }
    }
}

/// Picks the input representation for a field.
pub fn input_for(field: &Field) -> InputWidget {
    match field.kind {
        FieldType::Text
        | FieldType::Email
        | FieldType::Password
        | FieldType::Number
        | FieldType::Date => InputWidget::Input { kind: field.kind },
        FieldType::Textarea => InputWidget::TextArea {
            rows: field.rows.unwrap_or(DEFAULT_TEXTAREA_ROWS),
        },
        FieldType::Select => InputWidget::Select {
            options: field.options().to_vec(),
        },
        FieldType::Checkbox if field.is_checkbox_group() => InputWidget::CheckboxGroup {
            options: field.options().to_vec(),
        },
        FieldType::Checkbox => InputWidget::Checkbox,
        FieldType::Radio => InputWidget::Radio {
            options: field.options().to_vec(),
        },
        FieldType::File => InputWidget::File,
    }
}

/// A user interaction with a rendered input.
#[derive(Debug, Clone, PartialEq)]
pub enum InputChange {
    /// Replace the value wholesale.
    Set(FieldValue),
    /// Remove the value.
    Clear,
    /// Check or uncheck one option (or the single checkbox).
    Toggle { option: String, checked: bool },
}

/// Applies an interaction to the current value of `field`.
///
/// Checkbox groups add or remove the toggled option value; a single
/// checkbox takes the checked state; radio and select take the option
/// when it is checked. Every other change replaces the value.
pub fn apply_change(
    field: &Field,
    current: Option<&FieldValue>,
    change: InputChange,
) -> Option<FieldValue> {
    match change {
        InputChange::Set(value) => Some(value),
        InputChange::Clear => None,
        InputChange::Toggle { option, checked } => match input_for(field) {
            InputWidget::CheckboxGroup { .. } => {
                let mut selected = current
                    .and_then(FieldValue::as_list)
                    .map(<[String]>::to_vec)
                    .unwrap_or_default();
                if checked {
                    if !selected.contains(&option) {
                        selected.push(option);
                    }
                } else {
                    selected.retain(|value| *value != option);
                }
                Some(FieldValue::List(selected))
            }
            InputWidget::Checkbox => Some(FieldValue::Bool(checked)),
            InputWidget::Radio { .. } | InputWidget::Select { .. } if checked => {
                Some(FieldValue::Text(option))
            }
            _ => current.cloned(),
        },
    }
}

/// Status labels returned by the renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStatus {
    /// The form has no fields to show.
    Empty,
    /// At least one field carries an error.
    Invalid,
    /// Nothing blocks submission.
    Ready,
}

impl RenderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderStatus::Empty => "empty",
            RenderStatus::Invalid => "invalid",
            RenderStatus::Ready => "ready",
        }
    }
}

/// Filled/total counters exposed to renderers.
#[derive(Debug, Clone)]
pub struct RenderProgress {
    pub filled: usize,
    pub total: usize,
}

/// Describes a single field for render outputs.
#[derive(Debug, Clone)]
pub struct RenderField {
    pub id: String,
    pub name: String,
    pub label: String,
    pub kind: FieldType,
    pub widget: InputWidget,
    pub required: bool,
    pub placeholder: String,
    pub current_value: Option<FieldValue>,
    pub error: Option<String>,
}

/// Collected payload used by the text, JSON and card renderers.
#[derive(Debug, Clone)]
pub struct RenderPayload {
    pub title: String,
    pub description: Option<String>,
    pub status: RenderStatus,
    pub progress: RenderProgress,
    pub fields: Vec<RenderField>,
}

/// Build the renderer payload from the schema, current values, and errors.
pub fn build_render_payload(
    schema: &FormSchema,
    data: &FormData,
    errors: &ValidationErrors,
) -> RenderPayload {
    let fields = schema
        .fields
        .iter()
        .map(|field| RenderField {
            id: field.id.clone(),
            name: field.name.clone(),
            label: field.label.clone(),
            kind: field.kind,
            widget: input_for(field),
            required: field.required,
            placeholder: field.placeholder.clone(),
            current_value: data.get(&field.name).cloned(),
            error: errors.get(&field.name).cloned(),
        })
        .collect::<Vec<_>>();

    let filled = fields
        .iter()
        .filter(|field| {
            field
                .current_value
                .as_ref()
                .is_some_and(|value| !value.is_blank())
        })
        .count();

    let status = if fields.is_empty() {
        RenderStatus::Empty
    } else if fields.iter().any(|field| field.error.is_some()) {
        RenderStatus::Invalid
    } else {
        RenderStatus::Ready
    };

    RenderPayload {
        title: schema.title.clone(),
        description: Some(schema.description.clone()).filter(|text| !text.is_empty()),
        status,
        progress: RenderProgress {
            filled,
            total: fields.len(),
        },
        fields,
    }
}

/// Render the payload as a structured JSON-friendly value.
pub fn render_json_ui(payload: &RenderPayload) -> Value {
    let fields = payload
        .fields
        .iter()
        .map(|field| {
            let mut map = Map::new();
            map.insert("id".into(), Value::String(field.id.clone()));
            map.insert("name".into(), Value::String(field.name.clone()));
            map.insert("label".into(), Value::String(field.label.clone()));
            map.insert("type".into(), Value::String(field.kind.to_string()));
            map.insert(
                "widget".into(),
                Value::String(field.widget.as_str().to_string()),
            );
            map.insert("required".into(), Value::Bool(field.required));
            if !field.placeholder.is_empty() {
                map.insert(
                    "placeholder".into(),
                    Value::String(field.placeholder.clone()),
                );
            }
            if let InputWidget::TextArea { rows } = field.widget {
                map.insert("rows".into(), Value::from(rows));
            }
            let options = field.widget.options();
            if !options.is_empty() {
                map.insert(
                    "options".into(),
                    Value::Array(
                        options
                            .iter()
                            .map(|option| {
                                json!({
                                    "value": option.value,
                                    "label": option.display_label(),
                                })
                            })
                            .collect(),
                    ),
                );
            }
            if let Some(current_value) = &field.current_value {
                map.insert(
                    "current_value".into(),
                    serde_json::to_value(current_value).unwrap_or(Value::Null),
                );
            }
            if let Some(error) = &field.error {
                map.insert("error".into(), Value::String(error.clone()));
            }
            Value::Object(map)
        })
        .collect::<Vec<_>>();

    json!({
        "title": payload.title,
        "description": payload.description,
        "status": payload.status.as_str(),
        "progress": {
            "filled": payload.progress.filled,
            "total": payload.progress.total,
        },
        "fields": fields,
    })
}

/// Render the payload as human-friendly text.
pub fn render_text(payload: &RenderPayload) -> String {
    let mut lines = Vec::new();
    lines.push(format!("Form: {}", payload.title));
    if let Some(description) = &payload.description {
        lines.push(description.clone());
    }
    if payload.status == RenderStatus::Empty {
        lines.push("No fields to preview.".to_string());
        return lines.join("\n");
    }
    lines.push(format!(
        "Status: {} ({}/{} filled)",
        payload.status.as_str(),
        payload.progress.filled,
        payload.progress.total
    ));

    lines.push("Fields:".to_string());
    for field in &payload.fields {
        let mut entry = format!(
            " - {} [{}] {}",
            field.name,
            field.kind,
            if field.label.is_empty() {
                field.name.as_str()
            } else {
                field.label.as_str()
            }
        );
        if field.required {
            entry.push_str(" *");
        }
        if let Some(value) = &field.current_value {
            entry.push_str(&format!(" = {}", value_to_display(value)));
        } else if !field.placeholder.is_empty() {
            entry.push_str(&format!(" ({})", field.placeholder));
        }
        lines.push(entry);
        for option in field.widget.options() {
            let marker = if option_selected(field.current_value.as_ref(), &option.value) {
                "x"
            } else {
                " "
            };
            lines.push(format!(
                "     [{}] {} ({})",
                marker,
                option.display_label(),
                option.value
            ));
        }
        if let Some(error) = &field.error {
            lines.push(format!("   ! {}", error));
        }
    }

    lines.join("\n")
}

/// Render the payload as an Adaptive Card v1.3 transport.
pub fn render_card(payload: &RenderPayload) -> Value {
    let mut body = Vec::new();

    body.push(json!({
        "type": "TextBlock",
        "text": payload.title,
        "weight": "Bolder",
        "size": "Large",
        "wrap": true,
    }));

    if let Some(description) = &payload.description {
        body.push(json!({
            "type": "TextBlock",
            "text": description,
            "wrap": true,
        }));
    }

    let mut actions = Vec::new();

    if payload.fields.is_empty() {
        body.push(json!({
            "type": "TextBlock",
            "text": "No fields to preview.",
            "wrap": true,
        }));
    } else {
        for field in &payload.fields {
            let mut items = Vec::new();
            if !matches!(field.widget, InputWidget::Checkbox) && !field.label.is_empty() {
                items.push(json!({
                    "type": "TextBlock",
                    "text": field.label,
                    "weight": "Bolder",
                    "wrap": true,
                }));
            }
            items.push(field_input(field));
            if let Some(error) = &field.error {
                items.push(json!({
                    "type": "TextBlock",
                    "text": error,
                    "color": "Attention",
                    "wrap": true,
                    "spacing": "Small",
                }));
            }
            body.push(json!({
                "type": "Container",
                "items": items,
            }));
        }

        actions.push(json!({
            "type": "Action.Submit",
            "title": "Submit",
            "data": { "form": { "mode": "submit" } }
        }));
    }

    json!({
        "$schema": "http://adaptivecards.io/schemas/adaptive-card.json",
        "type": "AdaptiveCard",
        "version": "1.3",
        "body": body,
        "actions": actions,
    })
}

fn field_input(field: &RenderField) -> Value {
    let mut map = Map::new();
    map.insert("id".into(), Value::String(field.name.clone()));
    map.insert("isRequired".into(), Value::Bool(field.required));
    if !field.placeholder.is_empty() {
        map.insert(
            "placeholder".into(),
            Value::String(field.placeholder.clone()),
        );
    }

    match &field.widget {
        InputWidget::Input { kind } => {
            let card_type = match kind {
                FieldType::Number => "Input.Number",
                FieldType::Date => "Input.Date",
                _ => "Input.Text",
            };
            map.insert("type".into(), Value::String(card_type.into()));
            match kind {
                FieldType::Email => {
                    map.insert("style".into(), Value::String("Email".into()));
                }
                FieldType::Password => {
                    map.insert("style".into(), Value::String("Password".into()));
                }
                _ => {}
            }
        }
        InputWidget::TextArea { .. } => {
            map.insert("type".into(), Value::String("Input.Text".into()));
            map.insert("isMultiline".into(), Value::Bool(true));
        }
        InputWidget::Select { options }
        | InputWidget::Radio { options }
        | InputWidget::CheckboxGroup { options } => {
            map.insert("type".into(), Value::String("Input.ChoiceSet".into()));
            let style = if matches!(field.widget, InputWidget::Select { .. }) {
                "compact"
            } else {
                "expanded"
            };
            map.insert("style".into(), Value::String(style.into()));
            if matches!(field.widget, InputWidget::CheckboxGroup { .. }) {
                map.insert("isMultiSelect".into(), Value::Bool(true));
            }
            let choices = options
                .iter()
                .map(|option| {
                    json!({
                        "title": option.display_label(),
                        "value": option.value,
                    })
                })
                .collect::<Vec<_>>();
            map.insert("choices".into(), Value::Array(choices));
        }
        InputWidget::Checkbox => {
            map.insert("type".into(), Value::String("Input.Toggle".into()));
            map.insert("title".into(), Value::String(field.label.clone()));
            map.insert("valueOn".into(), Value::String("true".into()));
            map.insert("valueOff".into(), Value::String("false".into()));
        }
        InputWidget::File => {
            // Adaptive Cards have no file input; collect the file name instead.
            map.insert("type".into(), Value::String("Input.Text".into()));
        }
    }

    if let Some(value) = &field.current_value {
        map.insert("value".into(), Value::String(value_to_display(value)));
    }
    Value::Object(map)
}

fn option_selected(value: Option<&FieldValue>, option: &str) -> bool {
    match value {
        Some(FieldValue::Text(text)) => text == option,
        Some(FieldValue::List(items)) => items.iter().any(|item| item == option),
        _ => false,
    }
}

fn value_to_display(value: &FieldValue) -> String {
    match value {
        FieldValue::Text(text) => text.clone(),
        FieldValue::Bool(flag) => flag.to_string(),
        FieldValue::Number(number) => format_number(*number),
        FieldValue::List(items) => items.join(","),
        FieldValue::File(file) => file.name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::{IdAllocator, create_default_field};

    fn option(value: &str) -> FieldOption {
        FieldOption {
            id: value.into(),
            value: value.into(),
            label: value.to_uppercase(),
        }
    }

    #[test]
    fn checkbox_with_options_is_a_group() {
        let mut ids = IdAllocator::starting_at(1);
        let mut field = create_default_field(FieldType::Checkbox, &mut ids);
        assert_eq!(input_for(&field), InputWidget::Checkbox);
        field.options = Some(vec![option("a"), option("b")]);
        assert!(matches!(
            input_for(&field),
            InputWidget::CheckboxGroup { .. }
        ));
    }

    #[test]
    fn textarea_defaults_to_four_rows() {
        let mut ids = IdAllocator::starting_at(1);
        let field = create_default_field(FieldType::Textarea, &mut ids);
        assert_eq!(input_for(&field), InputWidget::TextArea { rows: 4 });
    }

    #[test]
    fn group_toggle_adds_and_removes_option_values() {
        let mut ids = IdAllocator::starting_at(1);
        let mut field = create_default_field(FieldType::Checkbox, &mut ids);
        field.options = Some(vec![option("a"), option("b")]);

        let value = apply_change(
            &field,
            None,
            InputChange::Toggle {
                option: "a".into(),
                checked: true,
            },
        );
        let value = apply_change(
            &field,
            value.as_ref(),
            InputChange::Toggle {
                option: "b".into(),
                checked: true,
            },
        );
        assert_eq!(value, Some(FieldValue::List(vec!["a".into(), "b".into()])));

        let value = apply_change(
            &field,
            value.as_ref(),
            InputChange::Toggle {
                option: "a".into(),
                checked: false,
            },
        );
        assert_eq!(value, Some(FieldValue::List(vec!["b".into()])));
    }

    #[test]
    fn scalar_changes_replace_the_value() {
        let mut ids = IdAllocator::starting_at(1);
        let field = create_default_field(FieldType::Text, &mut ids);
        let current = FieldValue::text("old");
        let value = apply_change(
            &field,
            Some(&current),
            InputChange::Set(FieldValue::text("new")),
        );
        assert_eq!(value, Some(FieldValue::text("new")));
    }

    #[test]
    fn single_checkbox_toggle_sets_boolean() {
        let mut ids = IdAllocator::starting_at(1);
        let field = create_default_field(FieldType::Checkbox, &mut ids);
        let value = apply_change(
            &field,
            None,
            InputChange::Toggle {
                option: String::new(),
                checked: true,
            },
        );
        assert_eq!(value, Some(FieldValue::Bool(true)));
    }
}
