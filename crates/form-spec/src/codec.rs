//! Export formats and the `#import=` fragment encoding.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use handlebars::Handlebars;
use serde_json::json;
use tracing::warn;

use crate::error::CodecError;
use crate::spec::form::FormSchema;

pub const IMPORT_PREFIX: &str = "#import=";
pub const DEFAULT_CONSTANT: &str = "formSchema";

const CODE_TEMPLATE: &str = "export const {{name}} = {{{json}}};";

/// Ways a schema leaves the builder. All share the same JSON body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Code,
    Clipboard,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json | ExportFormat::Clipboard => "json",
            ExportFormat::Code => "js",
        }
    }
}

/// Pretty JSON with two-space indentation.
pub fn to_json(schema: &FormSchema) -> Result<String, CodecError> {
    Ok(serde_json::to_string_pretty(schema)?)
}

pub fn export(schema: &FormSchema, format: ExportFormat) -> Result<String, CodecError> {
    match format {
        ExportFormat::Json | ExportFormat::Clipboard => to_json(schema),
        ExportFormat::Code => export_code(schema, DEFAULT_CONSTANT),
    }
}

/// Source snippet assigning the schema JSON to a named constant.
pub fn export_code(schema: &FormSchema, constant: &str) -> Result<String, CodecError> {
    let body = to_json(schema)?;
    let handlebars = Handlebars::new();
    Ok(handlebars.render_template(CODE_TEMPLATE, &json!({ "name": constant, "json": body }))?)
}

/// Download name: `<title>-schema.<ext>`, or `form-schema.<ext>` for an untitled form.
pub fn export_file_name(schema: &FormSchema, format: ExportFormat) -> String {
    let title = if schema.title.trim().is_empty() {
        "form"
    } else {
        schema.title.as_str()
    };
    let stem: String = title
        .chars()
        .map(|ch| {
            if matches!(ch, '/' | '\\' | ':' | '\0') {
                '-'
            } else {
                ch
            }
        })
        .collect();
    format!("{}-schema.{}", stem, format.extension())
}

/// `#import=<base64 of compact JSON>`.
pub fn encode_import_fragment(schema: &FormSchema) -> Result<String, CodecError> {
    let json = serde_json::to_string(schema)?;
    Ok(format!("{}{}", IMPORT_PREFIX, STANDARD.encode(json)))
}

/// Decodes and checks a schema delivered as an import fragment.
pub fn decode_import_fragment(fragment: &str) -> Result<FormSchema, CodecError> {
    let encoded = fragment
        .trim()
        .strip_prefix(IMPORT_PREFIX)
        .ok_or(CodecError::MissingPrefix)?;
    let bytes = STANDARD.decode(encoded)?;
    let text = String::from_utf8(bytes)?;
    parse_schema(&text)
}

/// Parses schema JSON text and runs the structural check.
pub fn parse_schema(text: &str) -> Result<FormSchema, CodecError> {
    let schema: FormSchema = serde_json::from_str(text)?;
    schema.check()?;
    for warning in schema.lint() {
        warn!(
            field = %warning.field_name,
            "{}", warning.message
        );
    }
    Ok(schema)
}

/// Reads an uploaded file and turns it into an import fragment.
///
/// File imports go through the same fragment path as link imports.
pub fn import_file(text: &str) -> Result<String, CodecError> {
    let schema = parse_schema(text)?;
    encode_import_fragment(&schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples;

    #[test]
    fn code_export_wraps_the_json_body() {
        let schema = samples::contact_form();
        let json = export(&schema, ExportFormat::Json).expect("json");
        let code = export(&schema, ExportFormat::Code).expect("code");
        assert_eq!(code, format!("export const formSchema = {};", json));
        assert_eq!(export(&schema, ExportFormat::Clipboard).expect("clip"), json);
    }

    #[test]
    fn code_export_does_not_escape_html_characters() {
        let schema = FormSchema {
            title: "Q&A <beta>".into(),
            ..FormSchema::default()
        };
        let code = export_code(&schema, "schema").expect("code");
        assert!(code.contains("Q&A <beta>"));
        assert!(code.starts_with("export const schema = {"));
    }

    #[test]
    fn file_names_fall_back_to_form() {
        let mut schema = FormSchema::default();
        assert_eq!(
            export_file_name(&schema, ExportFormat::Json),
            "My Form-schema.json"
        );
        schema.title = String::new();
        assert_eq!(
            export_file_name(&schema, ExportFormat::Code),
            "form-schema.js"
        );
    }

    #[test]
    fn fragment_round_trip_preserves_order() {
        let schema = samples::by_name("registration").expect("sample");
        let fragment = encode_import_fragment(&schema).expect("encode");
        assert!(fragment.starts_with(IMPORT_PREFIX));
        let decoded = decode_import_fragment(&fragment).expect("decode");
        assert_eq!(decoded, schema);
    }

    #[test]
    fn malformed_fragments_are_rejected() {
        assert!(matches!(
            decode_import_fragment("#share=abc"),
            Err(CodecError::MissingPrefix)
        ));
        assert!(matches!(
            decode_import_fragment("#import=***"),
            Err(CodecError::Base64(_))
        ));
        let not_json = format!("{}{}", IMPORT_PREFIX, STANDARD.encode("not json"));
        assert!(matches!(
            decode_import_fragment(&not_json),
            Err(CodecError::Json(_))
        ));
    }

    #[test]
    fn import_file_rejects_invalid_json() {
        assert!(matches!(import_file("{"), Err(CodecError::Json(_))));
    }
}
