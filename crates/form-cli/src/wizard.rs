use std::fs;
use std::path::Path;

use serde_json::{Value, json};

/// Controls which bits of state the fill wizard prints.
#[derive(Copy, Clone, Eq, PartialEq)]
pub enum Verbosity {
    /// Clean output: prompts only.
    Clean,
    /// Verbose output: status, field list, parse expectations.
    Verbose,
}

impl Verbosity {
    pub fn from_verbose(verbose: bool) -> Self {
        if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Clean
        }
    }

    pub fn is_verbose(&self) -> bool {
        matches!(self, Verbosity::Verbose)
    }
}

/// Prints prompts and outcomes while a form preview is filled in.
pub struct WizardPresenter {
    verbosity: Verbosity,
    header_printed: bool,
}

impl WizardPresenter {
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            header_printed: false,
        }
    }

    pub fn show_header(&mut self, payload: &WizardPayload) {
        if self.header_printed {
            return;
        }
        println!("Form: {}", payload.title);
        if let Some(description) = &payload.description {
            println!("{}", description);
        }
        self.header_printed = true;
    }

    pub fn show_status(&self, payload: &WizardPayload) {
        if payload.fields.is_empty() {
            println!("No fields to preview.");
            return;
        }
        if self.verbosity.is_verbose() {
            println!(
                "Status: {} ({}/{} filled)",
                payload.status, payload.filled, payload.total
            );
            println!("Fields:");
            for field in &payload.fields {
                let mut entry = format!(" - {} ({})", field.name, field.widget);
                if field.required {
                    entry.push_str(" [required]");
                }
                println!("{}", entry);
            }
        }
    }

    pub fn show_prompt(&self, prompt: &PromptContext) {
        let mut line = format!("{}/{} {}", prompt.index, prompt.total, prompt.label);
        if prompt.required {
            line.push_str(" *");
        }
        if let Some(hint) = &prompt.hint {
            line.push(' ');
            line.push_str(hint);
        }
        println!("{}", line);
        if let Some(error) = &prompt.error {
            println!("  ! {}", error);
        }
        if self.verbosity.is_verbose() && !prompt.choices.is_empty() {
            println!("Choices: {}", prompt.choices.join(", "));
        }
    }

    pub fn show_parse_error(&self, error: &InputParseError) {
        eprintln!("Invalid value: {}", error.user_message);
        if self.verbosity.is_verbose()
            && let Some(debug) = &error.debug_message
        {
            eprintln!("  Expected: {}", debug);
        }
    }

    pub fn show_rejected(&self, errors: &[(String, String)]) {
        eprintln!("Please fix the following fields:");
        for (name, message) in errors {
            eprintln!("  {}: {}", name, message);
        }
    }

    pub fn show_accepted(&self, data: &Value) {
        println!("Form submitted successfully!");
        match serde_json::to_string_pretty(data) {
            Ok(pretty) => println!("{}", pretty),
            Err(err) => eprintln!("Failed to serialize form data: {}", err),
        }
    }
}

/// Render payload extracted from the component's JSON UI output.
pub struct WizardPayload {
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub filled: usize,
    pub total: usize,
    pub fields: Vec<WizardField>,
}

impl WizardPayload {
    pub fn from_json(json: &Value) -> Result<Self, String> {
        let title = json
            .get("title")
            .and_then(Value::as_str)
            .ok_or_else(|| "render payload missing title".to_string())?
            .to_string();
        let description = json
            .get("description")
            .and_then(Value::as_str)
            .map(String::from);
        let status = json
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or("ready")
            .to_string();
        let progress = json
            .get("progress")
            .and_then(Value::as_object)
            .ok_or_else(|| "render payload missing progress".to_string())?;
        let filled = progress.get("filled").and_then(Value::as_u64).unwrap_or(0) as usize;
        let total = progress.get("total").and_then(Value::as_u64).unwrap_or(0) as usize;
        let fields = json
            .get("fields")
            .and_then(Value::as_array)
            .ok_or_else(|| "render payload missing fields".to_string())?
            .iter()
            .map(WizardField::from_json)
            .collect::<Result<_, _>>()?;
        Ok(Self {
            title,
            description,
            status,
            filled,
            total,
            fields,
        })
    }

    pub fn field(&self, name: &str) -> Option<&WizardField> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// Minimal view of a rendered field used for prompting.
pub struct WizardField {
    pub name: String,
    pub label: String,
    pub widget: String,
    pub required: bool,
    pub placeholder: Option<String>,
    /// Option values, paired with their display labels.
    pub options: Vec<(String, String)>,
    pub error: Option<String>,
}

impl WizardField {
    fn from_json(value: &Value) -> Result<Self, String> {
        let name = value
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| "field missing name".to_string())?
            .to_string();
        let label = value
            .get("label")
            .and_then(Value::as_str)
            .filter(|label| !label.is_empty())
            .unwrap_or(&name)
            .to_string();
        let widget = value
            .get("widget")
            .and_then(Value::as_str)
            .ok_or_else(|| format!("field '{}' missing widget", name))?
            .to_string();
        let required = value
            .get("required")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let placeholder = value
            .get("placeholder")
            .and_then(Value::as_str)
            .map(String::from);
        let options = value
            .get("options")
            .and_then(Value::as_array)
            .map(|options| {
                options
                    .iter()
                    .filter_map(|option| {
                        let value = option.get("value").and_then(Value::as_str)?;
                        let label = option.get("label").and_then(Value::as_str).unwrap_or(value);
                        Some((value.to_string(), label.to_string()))
                    })
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        let error = value
            .get("error")
            .and_then(Value::as_str)
            .map(String::from);
        Ok(Self {
            name,
            label,
            widget,
            required,
            placeholder,
            options,
            error,
        })
    }

    fn hint(&self) -> Option<String> {
        let values = || {
            self.options
                .iter()
                .map(|(value, _)| value.as_str())
                .collect::<Vec<_>>()
        };
        match self.widget.as_str() {
            "checkbox" => Some("(yes/no)".to_string()),
            "select" | "radio" if !self.options.is_empty() => {
                Some(format!("({})", values().join("/")))
            }
            "checkbox_group" => Some(format!("(comma separated: {})", values().join(","))),
            "file" => Some("(path to file)".to_string()),
            _ => self
                .placeholder
                .as_ref()
                .map(|placeholder| format!("[{}]", placeholder)),
        }
    }
}

/// Context used to format a single prompt.
pub struct PromptContext {
    pub index: usize,
    pub total: usize,
    pub label: String,
    pub required: bool,
    pub hint: Option<String>,
    pub error: Option<String>,
    pub choices: Vec<String>,
}

impl PromptContext {
    pub fn new(field: &WizardField, index: usize, total: usize) -> Self {
        Self {
            index: index.max(1),
            total,
            label: field.label.clone(),
            required: field.required,
            hint: field.hint(),
            error: field.error.clone(),
            choices: field
                .options
                .iter()
                .map(|(value, label)| format!("{} ({})", label, value))
                .collect(),
        }
    }
}

/// Error produced when parsing a typed value.
#[derive(Debug)]
pub struct InputParseError {
    pub user_message: String,
    pub debug_message: Option<String>,
}

impl InputParseError {
    pub fn new(user_message: impl Into<String>, debug_message: Option<String>) -> Self {
        Self {
            user_message: user_message.into(),
            debug_message,
        }
    }
}

/// Turns a typed line into the JSON value the field stores. Blank input means "leave empty".
pub fn parse_input(field: &WizardField, raw: &str) -> Result<Option<Value>, InputParseError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let value = match field.widget.as_str() {
        "checkbox" => match raw.to_ascii_lowercase().as_str() {
            "y" | "yes" | "true" => Value::Bool(true),
            "n" | "no" | "false" => Value::Bool(false),
            other => {
                return Err(InputParseError::new(
                    format!("'{}' is not yes or no", other),
                    Some("yes/no, y/n, true/false".into()),
                ));
            }
        },
        "select" | "radio" => Value::String(pick_option(field, raw)?),
        "checkbox_group" => {
            let mut selected = Vec::new();
            for part in raw.split(',').map(str::trim).filter(|part| !part.is_empty()) {
                let value = pick_option(field, part)?;
                if !selected.contains(&value) {
                    selected.push(value);
                }
            }
            json!(selected)
        }
        "file" => file_value(raw),
        _ => Value::String(raw.to_string()),
    };
    Ok(Some(value))
}

fn pick_option(field: &WizardField, raw: &str) -> Result<String, InputParseError> {
    field
        .options
        .iter()
        .find(|(value, label)| value == raw || label.eq_ignore_ascii_case(raw))
        .map(|(value, _)| value.clone())
        .ok_or_else(|| {
            InputParseError::new(
                format!("'{}' is not one of the options", raw),
                Some(
                    field
                        .options
                        .iter()
                        .map(|(value, _)| value.as_str())
                        .collect::<Vec<_>>()
                        .join(", "),
                ),
            )
        })
}

fn file_value(raw: &str) -> Value {
    let path = Path::new(raw);
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| raw.to_string());
    let size = fs::metadata(path).map(|meta| meta.len()).unwrap_or(0);
    json!({ "name": name, "size": size })
}
