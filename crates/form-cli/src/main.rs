pub mod builder;

mod wizard;

use builder::{AuthoringInput, FieldInput, build_schema};
use clap::{Parser, Subcommand, ValueEnum};
use form_component::{
    get_data_schema, get_document_schema, get_example_data, render_card, render_json_ui,
    render_text, submit, validate_data,
};
use form_spec::{
    Direction, FieldType, FileSchemaStore, FormSchema, FragmentImport, IdAllocator,
    SchemaStore, Validator, ValidatorKind, ValidatorValue, bootstrap, codec, editor, samples,
};
use serde_json::{Map, Value, json};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use wizard::{PromptContext, Verbosity, WizardField, WizardPayload, WizardPresenter};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

const HOME_ENV: &str = "FORM_BUILDER_HOME";
const IMPORT_ENV: &str = "FORM_BUILDER_IMPORT";

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Form schema builder",
    long_about = "Authors, validates, previews, exports and imports form schemas kept in a local store"
)]
struct Cli {
    /// Directory holding formSchema.json (defaults to FORM_BUILDER_HOME or the current directory).
    #[arg(long, global = true, value_name = "DIR")]
    store_dir: Option<PathBuf>,
    /// Pending `#import=` fragment applied before the command runs (defaults to FORM_BUILDER_IMPORT).
    #[arg(long, global = true, value_name = "FRAGMENT")]
    import: Option<String>,
    /// Emit debug logs on stderr.
    #[arg(long, global = true)]
    debug: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum RenderMode {
    Text,
    Json,
    Card,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ExportMode {
    Json,
    Code,
    Clipboard,
}

impl ExportMode {
    fn as_str(&self) -> &'static str {
        match self {
            ExportMode::Json => "json",
            ExportMode::Code => "code",
            ExportMode::Clipboard => "clipboard",
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
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

#[derive(Subcommand)]
enum Command {
    /// Interactively author a new form and save it to the store.
    New {
        /// Replace a schema that is already stored.
        #[arg(long)]
        force: bool,
    },
    /// Build a form from a JSON authoring file and save it to the store.
    Generate {
        /// JSON file describing the form title, description and fields.
        #[arg(long, value_name = "INPUT")]
        input: PathBuf,
        /// Replace a schema that is already stored.
        #[arg(long)]
        force: bool,
    },
    /// Print the stored schema.
    Show,
    /// Append a field to the stored schema.
    AddField {
        #[arg(long = "type", value_name = "TYPE")]
        kind: FieldType,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        label: Option<String>,
        #[arg(long)]
        placeholder: Option<String>,
        #[arg(long)]
        required: bool,
        /// Option text for select, radio and checkbox fields (repeatable).
        #[arg(long = "option", value_name = "TEXT")]
        options: Vec<String>,
        #[arg(long)]
        rows: Option<u32>,
    },
    /// Remove a field by id.
    RemoveField {
        #[arg(long)]
        id: String,
    },
    /// Move a field one position up or down.
    MoveField {
        #[arg(long)]
        id: String,
        #[arg(long, value_enum)]
        direction: MoveDirection,
    },
    /// Attach a validation rule to a field.
    AddRule {
        #[arg(long)]
        id: String,
        /// Rule kind: email, minLength, maxLength, pattern, min, max.
        #[arg(long = "type", value_name = "KIND")]
        kind: String,
        #[arg(long)]
        value: Option<String>,
        #[arg(long)]
        message: Option<String>,
    },
    /// Change the form title or description.
    SetMeta {
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Validate form data against the stored schema (or --schema).
    Validate {
        /// JSON object of field name to value.
        #[arg(long, value_name = "DATA")]
        data: PathBuf,
        /// Schema JSON to validate against instead of the stored one.
        #[arg(long, value_name = "SCHEMA")]
        schema: Option<PathBuf>,
    },
    /// Render the form preview.
    Preview {
        #[arg(long, value_name = "DATA")]
        data: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = RenderMode::Text)]
        format: RenderMode,
        /// Submit the data and show per-field errors.
        #[arg(long)]
        submit: bool,
    },
    /// Fill in the form interactively and submit it.
    Fill {
        /// Show status and option details while prompting.
        #[arg(long)]
        verbose: bool,
    },
    /// Export the stored schema.
    Export {
        #[arg(long, value_enum, default_value_t = ExportMode::Json)]
        format: ExportMode,
        /// Directory to write `<title>-schema.<ext>` into; prints to stdout when omitted.
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
    },
    /// Replace the stored schema with an imported one.
    Import {
        /// Schema JSON file.
        #[arg(
            long,
            value_name = "FILE",
            conflicts_with = "fragment",
            required_unless_present = "fragment"
        )]
        file: Option<PathBuf>,
        /// `#import=<base64>` fragment.
        #[arg(long, value_name = "FRAGMENT")]
        fragment: Option<String>,
    },
    /// Print a shareable `#import=` fragment for the stored schema.
    Share,
    /// Load a bundled sample form into the store.
    Sample {
        /// Sample name (defaults to contact).
        name: Option<String>,
        /// List the bundled sample names.
        #[arg(long)]
        list: bool,
    },
    /// Reset the store to the default empty form.
    Reset,
    /// Print the JSON Schema of the form-definition document.
    DocumentSchema,
    /// Print the JSON Schema of the stored form's data.
    DataSchema,
    /// Print example data for the stored form.
    ExampleData,
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let mut store = FileSchemaStore::new(resolve_store_dir(cli.store_dir)?);
    let pending = cli
        .import
        .or_else(|| env::var(IMPORT_ENV).ok())
        .filter(|fragment| !fragment.trim().is_empty());
    let mut channel = FragmentImport::new(pending);
    let schema = bootstrap(&mut store, &mut channel);
    debug!(path = %store.path().display(), fields = schema.fields.len(), "schema loaded");

    match cli.command {
        Command::New { force } => run_new(&mut store, force),
        Command::Generate { input, force } => run_generate(&mut store, input, force),
        Command::Show => print_json(&serde_json::to_value(&schema)?),
        Command::AddField {
            kind,
            name,
            label,
            placeholder,
            required,
            options,
            rows,
        } => {
            let mut field = FieldInput::new(kind);
            field.name = name;
            field.label = label;
            field.placeholder = placeholder;
            field.required = required;
            field.options = options;
            field.rows = rows;
            run_add_field(&mut store, &schema, field)
        }
        Command::RemoveField { id } => {
            let next = editor::delete_field(&schema, &id)?;
            save(&mut store, &next)
        }
        Command::MoveField { id, direction } => {
            let next = editor::move_field(&schema, &id, direction.into())?;
            save(&mut store, &next)
        }
        Command::AddRule {
            id,
            kind,
            value,
            message,
        } => run_add_rule(&mut store, &schema, &id, kind, value, message),
        Command::SetMeta { title, description } => {
            let next = editor::update_meta(&schema, title, description);
            save(&mut store, &next)
        }
        Command::Validate {
            data,
            schema: schema_path,
        } => run_validate(&schema, data, schema_path),
        Command::Preview {
            data,
            format,
            submit,
        } => run_preview(&schema, data, format, submit),
        Command::Fill { verbose } => run_fill(&schema, verbose),
        Command::Export { format, out } => run_export(&schema, format, out),
        Command::Import { file, fragment } => run_import(&mut store, file, fragment),
        Command::Share => {
            println!("{}", codec::encode_import_fragment(&schema)?);
            Ok(())
        }
        Command::Sample { name, list } => run_sample(&mut store, name, list),
        Command::Reset => {
            store.clear()?;
            println!("Reset to the default form.");
            Ok(())
        }
        Command::DocumentSchema => print_component(&get_document_schema()),
        Command::DataSchema => print_component(&get_data_schema(&config_for(&schema)?)),
        Command::ExampleData => print_component(&get_example_data(&config_for(&schema)?)),
    }
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("form_spec=debug,form_component=debug,form_builder=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(io::stderr)
        .try_init();
}

fn resolve_store_dir(dir: Option<PathBuf>) -> CliResult<PathBuf> {
    let candidate = match dir {
        Some(path) => path,
        None => env::var_os(HOME_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".")),
    };
    if candidate.as_os_str().is_empty() {
        return Err("store directory cannot be empty".into());
    }
    Ok(candidate)
}

fn save(store: &mut FileSchemaStore, schema: &FormSchema) -> CliResult<()> {
    store.save(schema)?;
    info!(fields = schema.fields.len(), "schema updated");
    println!(
        "Saved '{}' ({} fields) to {}",
        schema.title,
        schema.fields.len(),
        store.path().display()
    );
    Ok(())
}

fn ensure_replaceable(store: &FileSchemaStore, force: bool) -> CliResult<()> {
    if !force && store.load().ok().flatten().is_some() {
        return Err(format!(
            "{} already holds a schema; rerun with --force to replace it",
            store.path().display()
        )
        .into());
    }
    Ok(())
}

fn report_warnings(schema: &FormSchema) {
    for warning in schema.lint() {
        eprintln!("warning: {}: {}", warning.field_name, warning.message);
    }
}

fn config_for(schema: &FormSchema) -> CliResult<String> {
    Ok(json!({ "schema_json": serde_json::to_string(schema)? }).to_string())
}

fn parse_component_result(response: &str) -> CliResult<Value> {
    let value: Value = serde_json::from_str(response)?;
    if let Some(error) = value.get("error").and_then(Value::as_str) {
        Err(error.into())
    } else {
        Ok(value)
    }
}

fn print_component(response: &str) -> CliResult<()> {
    print_json(&parse_component_result(response)?)
}

fn print_json(value: &Value) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn read_json(path: &Path) -> CliResult<Value> {
    let contents = fs::read_to_string(path)
        .map_err(|err| format!("failed to read {}: {}", path.display(), err))?;
    Ok(serde_json::from_str(&contents)?)
}

fn run_new(store: &mut FileSchemaStore, force: bool) -> CliResult<()> {
    ensure_replaceable(store, force)?;
    println!("Interactive form builder");
    let title = prompt_non_empty(
        &mark_required("Form title"),
        Some(form_spec::spec::form::DEFAULT_TITLE),
    )?;
    let description = prompt_optional("Description (optional)")?;

    let mut fields: Vec<FieldInput> = Vec::new();
    loop {
        let Some(kind) = prompt_field_type()? else {
            break;
        };
        let mut field = FieldInput::new(kind);
        field.label = prompt_optional("Label (blank for the default)")?;
        loop {
            let name = prompt_optional("Name (blank for the default)")?;
            if let Some(name) = &name
                && fields.iter().any(|other| other.name.as_ref() == Some(name))
            {
                println!("Name '{}' already used; choose a different name.", name);
                continue;
            }
            field.name = name;
            break;
        }
        field.required = prompt_bool("Required?", false)?;
        if kind.is_text_like() {
            field.placeholder = prompt_optional("Placeholder (optional)")?;
        }
        if kind == FieldType::Textarea {
            field.rows = prompt_optional_u32("Rows (blank for 4)")?;
        }
        if kind.has_options() {
            field.options = prompt_options(kind)?;
        }
        field.validators = prompt_validators(kind)?;
        fields.push(field);
    }

    let input = AuthoringInput {
        title: Some(title),
        description,
        fields,
    };
    let schema = build_schema(&input, &mut IdAllocator::new())?;
    report_warnings(&schema);
    save(store, &schema)
}

fn run_generate(store: &mut FileSchemaStore, input_path: PathBuf, force: bool) -> CliResult<()> {
    ensure_replaceable(store, force)?;
    let input: AuthoringInput = serde_json::from_value(read_json(&input_path)?)?;
    let schema = build_schema(&input, &mut IdAllocator::new())?;
    report_warnings(&schema);
    save(store, &schema)
}

fn run_add_field(
    store: &mut FileSchemaStore,
    schema: &FormSchema,
    field: FieldInput,
) -> CliResult<()> {
    let mut ids = IdAllocator::for_schema(schema);
    let added = build_schema(
        &AuthoringInput {
            fields: vec![field],
            ..AuthoringInput::default()
        },
        &mut ids,
    )?;
    let mut next = schema.clone();
    next.fields.extend(added.fields);
    next.check()?;
    if let Some(field) = next.fields.last() {
        println!("Added field {} ({})", field.id, field.name);
    }
    report_warnings(&next);
    save(store, &next)
}

fn run_add_rule(
    store: &mut FileSchemaStore,
    schema: &FormSchema,
    id: &str,
    kind: String,
    value: Option<String>,
    message: Option<String>,
) -> CliResult<()> {
    let kind = ValidatorKind::from(kind);
    if let ValidatorKind::Other(name) = &kind {
        eprintln!(
            "warning: '{}' is not a known rule and will be skipped during validation",
            name
        );
    }
    let value = value.map(|value| rule_value(&kind, value));
    let next = editor::add_validator(schema, id, kind)?;
    let index = next
        .field(id)
        .map(|field| field.validators.len().saturating_sub(1))
        .unwrap_or_default();
    let patch = form_spec::ValidatorPatch {
        value: Some(value),
        message,
        ..form_spec::ValidatorPatch::default()
    };
    let next = editor::update_validator(&next, id, index, patch)?;
    report_warnings(&next);
    save(store, &next)
}

/// Pattern sources stay text; other rules keep a number when the text reads as one.
fn rule_value(kind: &ValidatorKind, raw: String) -> ValidatorValue {
    if *kind == ValidatorKind::Pattern {
        return ValidatorValue::Text(raw);
    }
    match serde_json::from_str::<serde_json::Number>(raw.trim()) {
        Ok(number) => ValidatorValue::Number(number),
        Err(_) => ValidatorValue::Text(raw),
    }
}

fn run_validate(
    stored: &FormSchema,
    data_path: PathBuf,
    schema_path: Option<PathBuf>,
) -> CliResult<()> {
    let schema = match schema_path {
        Some(path) => {
            let contents = fs::read_to_string(&path)
                .map_err(|err| format!("failed to read {}: {}", path.display(), err))?;
            codec::parse_schema(&contents)?
        }
        None => stored.clone(),
    };
    let data = read_json(&data_path)?;
    let config = config_for(&schema)?;
    let result = parse_component_result(&validate_data(&config, &data.to_string()))?;

    let valid = result["valid"].as_bool().unwrap_or(false);
    println!(
        "Validation result: {}",
        if valid { "valid" } else { "invalid" }
    );
    describe_validation(&result);

    if valid {
        Ok(())
    } else {
        Err("validation failed".into())
    }
}

fn describe_validation(result: &Value) {
    if let Some(errors) = result.get("errors").and_then(Value::as_object)
        && !errors.is_empty()
    {
        eprintln!("Errors:");
        for (name, message) in errors {
            eprintln!("  {}: {}", name, message.as_str().unwrap_or("invalid"));
        }
    }
    if let Some(unknown) = result.get("unknown_fields").and_then(Value::as_array)
        && !unknown.is_empty()
    {
        let names = unknown
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        println!("Unknown fields (ignored): {}", names);
    }
}

fn run_preview(
    schema: &FormSchema,
    data_path: Option<PathBuf>,
    format: RenderMode,
    submit_data: bool,
) -> CliResult<()> {
    let config = config_for(schema)?;
    let data = match data_path {
        Some(path) => read_json(&path)?,
        None => Value::Object(Map::new()),
    };
    let data_json = data.to_string();

    let mut ctx = json!({});
    if submit_data {
        let outcome = parse_component_result(&submit(&config, &data_json))?;
        if outcome["status"] == "accepted" {
            println!("Form submitted successfully!");
        } else {
            ctx["errors"] = outcome["errors"].clone();
        }
    }
    print_render_output(format, &config, &ctx.to_string(), &data_json)
}

fn print_render_output(
    mode: RenderMode,
    config_json: &str,
    ctx_json: &str,
    data_json: &str,
) -> CliResult<()> {
    match mode {
        RenderMode::Text => {
            let text = render_text(config_json, ctx_json, data_json);
            if text.starts_with('{') {
                parse_component_result(&text)?;
            }
            println!("{}", text);
            Ok(())
        }
        RenderMode::Json => print_component(&render_json_ui(config_json, ctx_json, data_json)),
        RenderMode::Card => print_component(&render_card(config_json, ctx_json, data_json)),
    }
}

fn run_fill(schema: &FormSchema, verbose: bool) -> CliResult<()> {
    let config = config_for(schema)?;
    let mut presenter = WizardPresenter::new(Verbosity::from_verbose(verbose));
    let mut data = Map::new();
    let mut errors = Value::Object(Map::new());
    let mut pending: Option<Vec<String>> = None;

    loop {
        let data_json = Value::Object(data.clone()).to_string();
        let ctx = json!({ "errors": errors }).to_string();
        let ui = parse_component_result(&render_json_ui(&config, &ctx, &data_json))?;
        let payload =
            WizardPayload::from_json(&ui).map_err(|err| format!("preview UI error: {}", err))?;
        presenter.show_header(&payload);
        presenter.show_status(&payload);
        if payload.fields.is_empty() {
            return Ok(());
        }

        let names = pending.take().unwrap_or_else(|| {
            payload
                .fields
                .iter()
                .map(|field| field.name.clone())
                .collect()
        });
        for (index, name) in names.iter().enumerate() {
            let field = payload
                .field(name)
                .ok_or_else(|| format!("preview payload missing field '{}'", name))?;
            let prompt = PromptContext::new(field, index + 1, names.len());
            match prompt_field(&prompt, field, &presenter)? {
                Some(value) => {
                    data.insert(name.clone(), value);
                }
                None => {
                    data.remove(name);
                }
            }
        }

        let data_json = Value::Object(data.clone()).to_string();
        let outcome = parse_component_result(&submit(&config, &data_json))?;
        if outcome["status"] == "accepted" {
            presenter.show_accepted(&outcome["data"]);
            return Ok(());
        }
        errors = outcome["errors"].clone();
        let failing = errors
            .as_object()
            .map(|map| {
                map.iter()
                    .map(|(name, message)| {
                        (
                            name.clone(),
                            message.as_str().unwrap_or("invalid").to_string(),
                        )
                    })
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        presenter.show_rejected(&failing);
        // re-prompt failing fields in form order
        pending = Some(
            payload
                .fields
                .iter()
                .filter(|field| failing.iter().any(|(name, _)| *name == field.name))
                .map(|field| field.name.clone())
                .collect(),
        );
    }
}

fn prompt_field(
    prompt: &PromptContext,
    field: &WizardField,
    presenter: &WizardPresenter,
) -> CliResult<Option<Value>> {
    loop {
        presenter.show_prompt(prompt);
        print!("> ");
        io::stdout().flush()?;
        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            return Err("input ended before the form was submitted".into());
        }

        let trimmed = input.trim();
        if trimmed.eq_ignore_ascii_case("exit") {
            return Err("preview aborted by user".into());
        }

        match wizard::parse_input(field, trimmed) {
            Ok(value) => return Ok(value),
            Err(err) => presenter.show_parse_error(&err),
        }
    }
}

fn run_export(schema: &FormSchema, format: ExportMode, out: Option<PathBuf>) -> CliResult<()> {
    let config = config_for(schema)?;
    let body = form_component::export(&config, format.as_str());
    if body.starts_with("{\"error\"") {
        parse_component_result(&body)?;
    }
    match (format, out) {
        (ExportMode::Clipboard, _) => {
            println!("{}", body);
            eprintln!("Schema copied; paste it wherever you need it.");
        }
        (_, Some(dir)) => {
            fs::create_dir_all(&dir)?;
            let name = form_component::export_file_name(&config, format.as_str());
            let path = dir.join(name);
            fs::write(&path, &body)?;
            println!("Exported schema to {}", path.display());
        }
        (_, None) => println!("{}", body),
    }
    Ok(())
}

fn run_import(
    store: &mut FileSchemaStore,
    file: Option<PathBuf>,
    fragment: Option<String>,
) -> CliResult<()> {
    let fragment = match (file, fragment) {
        (Some(path), _) => {
            let contents = fs::read_to_string(&path)
                .map_err(|err| format!("failed to read {}: {}", path.display(), err))?;
            codec::import_file(&contents).map_err(|err| {
                format!(
                    "Error importing schema. Please check the file format. ({})",
                    err
                )
            })?
        }
        (None, Some(fragment)) => fragment,
        (None, None) => return Err("pass --file or --fragment".into()),
    };
    let schema = codec::decode_import_fragment(&fragment)
        .map_err(|err| format!("Error importing schema: {}", err))?;
    report_warnings(&schema);
    save(store, &schema)
}

fn run_sample(store: &mut FileSchemaStore, name: Option<String>, list: bool) -> CliResult<()> {
    if list {
        for name in samples::NAMES {
            println!("{}", name);
        }
        return Ok(());
    }
    let name = name.unwrap_or_else(|| "contact".to_string());
    let schema = samples::by_name(&name).ok_or_else(|| {
        format!(
            "unknown sample '{}'; available: {}",
            name,
            samples::NAMES.join(", ")
        )
    })?;
    save(store, &schema)
}

fn prompt_line(prompt: &str, default: Option<&str>) -> CliResult<String> {
    if let Some(default_value) = default {
        print!("{} [{}]: ", prompt, default_value);
    } else {
        print!("{}: ", prompt);
    }
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    let trimmed = line.trim();
    if trimmed.is_empty() {
        if let Some(default_value) = default {
            Ok(default_value.to_string())
        } else {
            Ok(String::new())
        }
    } else {
        Ok(trimmed.to_string())
    }
}

fn prompt_optional(prompt: &str) -> CliResult<Option<String>> {
    let value = prompt_line(prompt, None)?;
    if value.trim().is_empty() {
        Ok(None)
    } else {
        Ok(Some(value))
    }
}

fn prompt_non_empty(prompt: &str, default: Option<&str>) -> CliResult<String> {
    loop {
        let value = prompt_line(prompt, default)?;
        if !value.trim().is_empty() {
            return Ok(value);
        }
        println!("Value cannot be empty.");
    }
}

fn mark_required(prompt: &str) -> String {
    let trimmed = prompt.trim();
    if trimmed.to_lowercase().contains("required") {
        trimmed.to_string()
    } else {
        format!("{} (required)", trimmed)
    }
}

fn prompt_bool(prompt: &str, default: bool) -> CliResult<bool> {
    let prompt_text = format!("{} (y/n)", prompt.trim());
    let default_hint = if default { "Y" } else { "N" };
    loop {
        let line = prompt_line(&prompt_text, Some(default_hint))?;
        match line.trim().to_lowercase().as_str() {
            "" => return Ok(default),
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            other => {
                println!("Invalid answer '{}'. Expected yes or no.", other);
            }
        }
    }
}

fn prompt_optional_u32(prompt: &str) -> CliResult<Option<u32>> {
    loop {
        match prompt_optional(prompt)? {
            None => return Ok(None),
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(value) => return Ok(Some(value)),
                Err(_) => println!("'{}' is not a whole number.", raw),
            },
        }
    }
}

fn field_type_choices() -> String {
    FieldType::ALL
        .iter()
        .map(FieldType::as_str)
        .collect::<Vec<_>>()
        .join("|")
}

fn prompt_field_type() -> CliResult<Option<FieldType>> {
    let prompt = format!("Field type ({}, blank to finish)", field_type_choices());
    loop {
        let Some(value) = prompt_optional(&prompt)? else {
            return Ok(None);
        };
        match value.parse::<FieldType>() {
            Ok(kind) => return Ok(Some(kind)),
            Err(err) => println!("{}", err),
        }
    }
}

fn prompt_options(kind: FieldType) -> CliResult<Vec<String>> {
    let raw = prompt_line("Comma separated options (e.g. red,green,blue)", None)?;
    let options = raw
        .split(',')
        .map(str::trim)
        .filter(|option| !option.is_empty())
        .map(String::from)
        .collect::<Vec<_>>();
    if options.is_empty() && kind != FieldType::Checkbox {
        println!("No options given; add them later with the builder.");
    }
    Ok(options)
}

fn prompt_validators(kind: FieldType) -> CliResult<Vec<Validator>> {
    let mut validators = Vec::new();
    let known = ValidatorKind::KNOWN
        .iter()
        .map(ValidatorKind::as_str)
        .collect::<Vec<_>>()
        .join("|");
    loop {
        let prompt = format!("Validation rule ({}, blank to finish)", known);
        let Some(raw) = prompt_optional(&prompt)? else {
            break;
        };
        let rule_kind = ValidatorKind::from(raw);
        if let ValidatorKind::Other(name) = &rule_kind {
            println!("Unknown rule '{}'.", name);
            continue;
        }
        let mut validator = Validator::new(rule_kind.clone());
        if rule_kind.takes_threshold() || rule_kind == ValidatorKind::Pattern {
            let value = prompt_non_empty(&mark_required("Rule value"), None)?;
            validator = validator.with_value(rule_value(&rule_kind, value));
        }
        if let Some(message) = prompt_optional("Error message (blank for the default)")? {
            validator = validator.with_message(message);
        }
        validators.push(validator);
    }
    if kind == FieldType::File && !validators.is_empty() {
        println!("Note: rules on file fields are checked against the file name.");
    }
    Ok(validators)
}
