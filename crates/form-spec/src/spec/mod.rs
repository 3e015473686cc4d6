pub mod field;
pub mod form;
pub mod validator;

pub use field::{Field, FieldOption, FieldType};
pub use form::{FormSchema, SchemaWarning};
pub use validator::{Validator, ValidatorKind, ValidatorValue};
