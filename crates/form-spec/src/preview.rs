//! Fill-and-submit session over a rendered form.

use tracing::debug;

use crate::render::{InputChange, RenderPayload, apply_change, build_render_payload};
use crate::spec::form::FormSchema;
use crate::validate::validate_form;
use crate::value::{FormData, ValidationErrors};

/// Result of a submit attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Accepted(FormData),
    Rejected(ValidationErrors),
}

/// Current values, errors, and submission state of a previewed form.
#[derive(Debug, Clone, Default)]
pub struct PreviewSession {
    data: FormData,
    errors: ValidationErrors,
    submitted: bool,
}

impl PreviewSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(data: FormData) -> Self {
        Self {
            data,
            ..Self::default()
        }
    }

    pub fn data(&self) -> &FormData {
        &self.data
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Applies an input change to the named field and clears its error.
    ///
    /// Names that no field declares are ignored.
    pub fn change(&mut self, schema: &FormSchema, name: &str, change: InputChange) {
        let Some(field) = schema.field_by_name(name) else {
            debug!(field = name, "ignoring change for unknown field");
            return;
        };
        match apply_change(field, self.data.get(name), change) {
            Some(value) => {
                self.data.insert(name.to_string(), value);
            }
            None => {
                self.data.remove(name);
            }
        }
        self.errors.remove(name);
        self.submitted = false;
    }

    /// Validates the current values; on success the session is marked submitted.
    pub fn submit(&mut self, schema: &FormSchema) -> SubmitOutcome {
        let errors = validate_form(&self.data, schema);
        if errors.is_empty() {
            debug!(fields = self.data.len(), "form submitted");
            self.errors.clear();
            self.submitted = true;
            SubmitOutcome::Accepted(self.data.clone())
        } else {
            self.errors = errors.clone();
            self.submitted = false;
            SubmitOutcome::Rejected(errors)
        }
    }

    pub fn reset(&mut self) {
        self.data.clear();
        self.errors.clear();
        self.submitted = false;
    }

    pub fn render(&self, schema: &FormSchema) -> RenderPayload {
        build_render_payload(schema, &self.data, &self.errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples;
    use crate::value::FieldValue;

    #[test]
    fn submit_reports_errors_then_change_clears_them() {
        let schema = samples::contact_form();
        let mut session = PreviewSession::new();

        let SubmitOutcome::Rejected(errors) = session.submit(&schema) else {
            panic!("empty contact form must be rejected");
        };
        assert_eq!(errors["email"], "Email Address is required");

        session.change(
            &schema,
            "email",
            InputChange::Set(FieldValue::text("ada@example.com")),
        );
        assert!(!session.errors().contains_key("email"));
        assert!(session.errors().contains_key("firstName"));
    }

    #[test]
    fn valid_submission_is_accepted_and_reset_clears() {
        let schema = samples::contact_form();
        let mut session = PreviewSession::new();
        for (name, value) in [
            ("firstName", "Ada"),
            ("lastName", "Lovelace"),
            ("email", "ada@example.com"),
            ("subject", "general"),
            ("message", "Hello there, engine!"),
        ] {
            session.change(&schema, name, InputChange::Set(FieldValue::text(value)));
        }
        assert!(matches!(
            session.submit(&schema),
            SubmitOutcome::Accepted(_)
        ));
        assert!(session.is_submitted());
        session.reset();
        assert!(session.data().is_empty());
        assert!(!session.is_submitted());
    }
}
