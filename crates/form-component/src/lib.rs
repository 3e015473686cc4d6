use serde::Deserialize;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::debug;

use form_spec::{
    CodecError, Direction, ExportFormat, FieldPatch, FieldType, FieldValue, FormData, FormSchema,
    IdAllocator, InputChange, OptionPatch, PreviewSession, RenderPayload, SchemaError,
    SubmitOutcome, ValidationErrors, ValidatorKind, ValidatorPatch, ValidatorValue,
    build_render_payload, codec, create_field_for, data_schema, document_schema, editor,
    example_data, parse_form_data, render_card as spec_render_card,
    render_json_ui as spec_render_json_ui, render_text as spec_render_text, samples, validate,
};

#[derive(Debug, Error)]
enum ComponentError {
    #[error("failed to parse config: {0}")]
    ConfigParse(#[source] serde_json::Error),
    #[error("failed to parse input: {0}")]
    InputParse(#[source] serde_json::Error),
    #[error("sample '{0}' is not available")]
    SampleUnavailable(String),
    #[error("{0}")]
    FieldType(String),
    #[error("field '{0}' is not part of the form")]
    UnknownField(String),
    #[error("unknown export format '{0}'")]
    UnknownFormat(String),
    #[error("json encode error: {0}")]
    JsonEncode(#[source] serde_json::Error),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Host configuration: an explicit schema document, a bundled sample, or neither.
#[derive(Debug, Deserialize, Default)]
struct ComponentConfig {
    #[serde(default)]
    schema_json: Option<String>,
    #[serde(default)]
    sample: Option<String>,
}

fn load_schema(config_json: &str) -> Result<FormSchema, ComponentError> {
    let config = if config_json.trim().is_empty() {
        ComponentConfig::default()
    } else {
        serde_json::from_str(config_json).map_err(ComponentError::ConfigParse)?
    };

    if let Some(schema_json) = config.schema_json.as_deref() {
        return Ok(codec::parse_schema(schema_json)?);
    }
    match config.sample {
        Some(name) => samples::by_name(&name).ok_or(ComponentError::SampleUnavailable(name)),
        None => Ok(FormSchema::default()),
    }
}

fn parse_data(data_json: &str) -> Result<FormData, ComponentError> {
    if data_json.trim().is_empty() {
        return Ok(FormData::new());
    }
    let value: Value = serde_json::from_str(data_json).map_err(ComponentError::InputParse)?;
    parse_form_data(&value).map_err(ComponentError::InputParse)
}

/// Errors the host shows next to inputs; read from `ctx.errors` when present.
fn parse_context_errors(ctx_json: &str) -> ValidationErrors {
    serde_json::from_str::<Value>(ctx_json)
        .ok()
        .and_then(|ctx| ctx.get("errors").cloned())
        .and_then(|errors| serde_json::from_value(errors).ok())
        .unwrap_or_default()
}

fn parse_field_type(kind: &str) -> Result<FieldType, ComponentError> {
    kind.parse().map_err(ComponentError::FieldType)
}

fn parse_format(format: &str) -> Result<ExportFormat, ComponentError> {
    match format.trim().to_ascii_lowercase().as_str() {
        "json" => Ok(ExportFormat::Json),
        "code" | "js" => Ok(ExportFormat::Code),
        "clipboard" => Ok(ExportFormat::Clipboard),
        other => Err(ComponentError::UnknownFormat(other.to_string())),
    }
}

fn to_value<T: serde::Serialize>(value: &T) -> Result<Value, ComponentError> {
    serde_json::to_value(value).map_err(ComponentError::JsonEncode)
}

fn respond(result: Result<Value, ComponentError>) -> String {
    match result {
        Ok(value) => serde_json::to_string(&value).unwrap_or_else(|error| {
            json!({"error": format!("json encode: {}", error)}).to_string()
        }),
        Err(err) => json!({ "error": err.to_string() }).to_string(),
    }
}

fn respond_string(result: Result<String, ComponentError>) -> String {
    match result {
        Ok(value) => value,
        Err(err) => json!({ "error": err.to_string() }).to_string(),
    }
}

pub fn describe(config_json: &str) -> String {
    respond(load_schema(config_json).and_then(|schema| to_value(&schema)))
}

/// Structural check plus lint warnings for the configured schema.
pub fn check_schema(config_json: &str) -> String {
    respond(load_schema(config_json).and_then(|schema| {
        Ok(json!({
            "valid": true,
            "warnings": to_value(&schema.lint())?,
        }))
    }))
}

pub fn get_document_schema() -> String {
    respond(Ok(document_schema()))
}

pub fn get_data_schema(config_json: &str) -> String {
    respond(load_schema(config_json).map(|schema| data_schema(&schema)))
}

pub fn get_example_data(config_json: &str) -> String {
    respond(load_schema(config_json).and_then(|schema| to_value(&example_data(&schema))))
}

pub fn get_sample(name: &str) -> String {
    respond(
        samples::by_name(name)
            .ok_or_else(|| ComponentError::SampleUnavailable(name.to_string()))
            .and_then(|schema| to_value(&schema)),
    )
}

/// Every message for one field, as `{"errors": [...]}`.
pub fn validate_field(config_json: &str, field_name: &str, value_json: &str) -> String {
    respond(load_schema(config_json).and_then(|schema| {
        let field = schema
            .field_by_name(field_name)
            .ok_or_else(|| ComponentError::UnknownField(field_name.to_string()))?;
        let value: Option<FieldValue> =
            serde_json::from_str(value_json).map_err(ComponentError::InputParse)?;
        let errors = form_spec::validate_field(value.as_ref(), field);
        Ok(json!({ "errors": errors }))
    }))
}

pub fn validate_data(config_json: &str, data_json: &str) -> String {
    respond(load_schema(config_json).and_then(|schema| {
        let data = parse_data(data_json)?;
        to_value(&validate(&schema, &data))
    }))
}

fn render_payload(
    config_json: &str,
    ctx_json: &str,
    data_json: &str,
) -> Result<RenderPayload, ComponentError> {
    let schema = load_schema(config_json)?;
    let data = parse_data(data_json)?;
    let errors = parse_context_errors(ctx_json);
    Ok(build_render_payload(&schema, &data, &errors))
}

pub fn render_text(config_json: &str, ctx_json: &str, data_json: &str) -> String {
    respond_string(
        render_payload(config_json, ctx_json, data_json).map(|payload| spec_render_text(&payload)),
    )
}

pub fn render_json_ui(config_json: &str, ctx_json: &str, data_json: &str) -> String {
    respond(
        render_payload(config_json, ctx_json, data_json)
            .map(|payload| spec_render_json_ui(&payload)),
    )
}

pub fn render_card(config_json: &str, ctx_json: &str, data_json: &str) -> String {
    respond(
        render_payload(config_json, ctx_json, data_json).map(|payload| spec_render_card(&payload)),
    )
}

/// One input interaction, as sent by a rendered preview.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ChangeRequest {
    Set(FieldValue),
    Clear,
    Toggle { option: String, checked: bool },
}

impl From<ChangeRequest> for InputChange {
    fn from(request: ChangeRequest) -> Self {
        match request {
            ChangeRequest::Set(value) => InputChange::Set(value),
            ChangeRequest::Clear => InputChange::Clear,
            ChangeRequest::Toggle { option, checked } => InputChange::Toggle { option, checked },
        }
    }
}

/// Applies an input change and returns the updated data map.
pub fn apply_change(
    config_json: &str,
    data_json: &str,
    field_name: &str,
    change_json: &str,
) -> String {
    respond(load_schema(config_json).and_then(|schema| {
        if schema.field_by_name(field_name).is_none() {
            return Err(ComponentError::UnknownField(field_name.to_string()));
        }
        let request: ChangeRequest =
            serde_json::from_str(change_json).map_err(ComponentError::InputParse)?;
        let mut session = PreviewSession::with_data(parse_data(data_json)?);
        session.change(&schema, field_name, request.into());
        to_value(session.data())
    }))
}

pub fn submit(config_json: &str, data_json: &str) -> String {
    respond(load_schema(config_json).and_then(|schema| {
        let mut session = PreviewSession::with_data(parse_data(data_json)?);
        let outcome = session.submit(&schema);
        let payload = session.render(&schema);
        let progress = json!({
            "filled": payload.progress.filled,
            "total": payload.progress.total,
        });
        Ok(match outcome {
            SubmitOutcome::Accepted(data) => json!({
                "status": "accepted",
                "progress": progress,
                "data": to_value(&data)?,
            }),
            SubmitOutcome::Rejected(errors) => json!({
                "status": "rejected",
                "progress": progress,
                "data": to_value(session.data())?,
                "errors": to_value(&errors)?,
            }),
        })
    }))
}

pub fn export(config_json: &str, format: &str) -> String {
    respond_string(load_schema(config_json).and_then(|schema| {
        let format = parse_format(format)?;
        Ok(codec::export(&schema, format)?)
    }))
}

pub fn export_file_name(config_json: &str, format: &str) -> String {
    respond_string(load_schema(config_json).and_then(|schema| {
        let format = parse_format(format)?;
        Ok(codec::export_file_name(&schema, format))
    }))
}

pub fn encode_fragment(config_json: &str) -> String {
    respond_string(
        load_schema(config_json)
            .and_then(|schema| Ok(codec::encode_import_fragment(&schema)?)),
    )
}

pub fn import_fragment(fragment: &str) -> String {
    respond(
        codec::decode_import_fragment(fragment)
            .map_err(ComponentError::from)
            .and_then(|schema| to_value(&schema)),
    )
}

/// Turns uploaded file text into an `#import=` fragment for the host to navigate to.
pub fn import_file(text: &str) -> String {
    respond_string(codec::import_file(text).map_err(ComponentError::from))
}

/// Builds a default field of `kind` whose id and name are unused in the configured schema.
///
/// The host is expected to add the returned field before asking for another.
pub fn create_field(config_json: &str, kind: &str) -> String {
    respond(load_schema(config_json).and_then(|schema| {
        let kind = parse_field_type(kind)?;
        let mut ids = IdAllocator::new();
        to_value(&create_field_for(&schema, kind, &mut ids))
    }))
}

/// Keeps `null` apart from an absent key: `Some(None)` clears, `None` leaves as is.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum MoveDirection {
    Up,
    Down,
}

impl From<MoveDirection> for Direction {
    fn from(direction: MoveDirection) -> Self {
        match direction {
            MoveDirection::Up => Direction::Up,
            MoveDirection::Down => Direction::Down,
        }
    }
}

/// One builder edit, tagged by `op`.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum EditRequest {
    AddField {
        #[serde(rename = "type")]
        kind: String,
    },
    UpdateField {
        id: String,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        label: Option<String>,
        #[serde(default)]
        placeholder: Option<String>,
        #[serde(default)]
        required: Option<bool>,
        #[serde(default, deserialize_with = "nullable")]
        rows: Option<Option<u32>>,
    },
    DeleteField {
        id: String,
    },
    MoveField {
        id: String,
        direction: MoveDirection,
    },
    UpdateMeta {
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        description: Option<String>,
    },
    AddValidator {
        id: String,
        #[serde(rename = "type")]
        kind: String,
    },
    UpdateValidator {
        id: String,
        index: usize,
        #[serde(default, rename = "type")]
        kind: Option<String>,
        #[serde(default, deserialize_with = "nullable")]
        value: Option<Option<ValidatorValue>>,
        #[serde(default)]
        message: Option<String>,
    },
    RemoveValidator {
        id: String,
        index: usize,
    },
    AddOption {
        id: String,
        text: String,
    },
    UpdateOption {
        id: String,
        index: usize,
        #[serde(default)]
        value: Option<String>,
        #[serde(default)]
        label: Option<String>,
    },
    RemoveOption {
        id: String,
        index: usize,
    },
}

fn apply_edit(schema: &FormSchema, request: EditRequest) -> Result<FormSchema, ComponentError> {
    let mut ids = IdAllocator::for_schema(schema);
    let next = match request {
        EditRequest::AddField { kind } => {
            editor::add_field(schema, parse_field_type(&kind)?, &mut ids)
        }
        EditRequest::UpdateField {
            id,
            name,
            label,
            placeholder,
            required,
            rows,
        } => editor::update_field(
            schema,
            &id,
            FieldPatch {
                name,
                label,
                placeholder,
                required,
                rows,
            },
        )?,
        EditRequest::DeleteField { id } => editor::delete_field(schema, &id)?,
        EditRequest::MoveField { id, direction } => {
            editor::move_field(schema, &id, direction.into())?
        }
        EditRequest::UpdateMeta { title, description } => {
            editor::update_meta(schema, title, description)
        }
        EditRequest::AddValidator { id, kind } => {
            editor::add_validator(schema, &id, ValidatorKind::from(kind))?
        }
        EditRequest::UpdateValidator {
            id,
            index,
            kind,
            value,
            message,
        } => editor::update_validator(
            schema,
            &id,
            index,
            ValidatorPatch {
                kind: kind.map(ValidatorKind::from),
                value,
                message,
            },
        )?,
        EditRequest::RemoveValidator { id, index } => {
            editor::remove_validator(schema, &id, index)?
        }
        EditRequest::AddOption { id, text } => editor::add_option(schema, &id, &text, &mut ids)?,
        EditRequest::UpdateOption {
            id,
            index,
            value,
            label,
        } => editor::update_option(schema, &id, index, OptionPatch { value, label })?,
        EditRequest::RemoveOption { id, index } => editor::remove_option(schema, &id, index)?,
    };
    Ok(next)
}

/// Applies one builder edit and returns the new schema document.
pub fn edit(config_json: &str, edit_json: &str) -> String {
    respond(load_schema(config_json).and_then(|schema| {
        let request: EditRequest =
            serde_json::from_str(edit_json).map_err(ComponentError::InputParse)?;
        debug!(?request, "applying schema edit");
        to_value(&apply_edit(&schema, request)?)
    }))
}
