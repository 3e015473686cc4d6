#![allow(missing_docs)]

pub mod codec;
pub mod data_schema;
pub mod defaults;
pub mod editor;
pub mod error;
pub mod examples;
pub mod import;
pub mod preview;
pub mod render;
pub mod samples;
pub mod spec;
pub mod store;
pub mod validate;
pub mod validators;
pub mod value;

pub use codec::{
    ExportFormat, decode_import_fragment, encode_import_fragment, export, export_file_name,
    import_file, parse_schema,
};
pub use data_schema::{document_schema, generate as data_schema};
pub use defaults::{IdAllocator, create_default_field, create_field_for};
pub use editor::{Direction, FieldPatch, OptionPatch, ValidatorPatch};
pub use error::{CodecError, RuleError, SchemaError, StoreError};
pub use examples::generate as example_data;
pub use import::{FragmentImport, ImportChannel, bootstrap};
pub use preview::{PreviewSession, SubmitOutcome};
pub use render::{
    InputChange, InputWidget, RenderField, RenderPayload, RenderProgress, RenderStatus,
    apply_change, build_render_payload, input_for, render_card, render_json_ui, render_text,
};
pub use spec::{
    Field, FieldOption, FieldType, FormSchema, SchemaWarning, Validator, ValidatorKind,
    ValidatorValue,
};
pub use store::{FileSchemaStore, MemorySchemaStore, SchemaStore, load_or_default};
pub use validate::{ValidationResult, validate, validate_field, validate_form};
pub use value::{FieldValue, FileHandle, FormData, ValidationErrors, parse_form_data};
