//! Bundled example schemas.

use tracing::warn;

use crate::spec::form::FormSchema;

const CONTACT: &str = include_str!("../samples/contact.json");
const REGISTRATION: &str = include_str!("../samples/registration.json");
const JOB_APPLICATION: &str = include_str!("../samples/job_application.json");
const FEEDBACK: &str = include_str!("../samples/feedback.json");

/// Names accepted by [`by_name`].
pub const NAMES: [&str; 4] = ["contact", "registration", "job_application", "feedback"];

/// The five-field contact form offered as the builder's starting sample.
pub fn contact_form() -> FormSchema {
    parse(CONTACT).unwrap_or_default()
}

pub fn by_name(name: &str) -> Option<FormSchema> {
    let source = match name {
        "contact" => CONTACT,
        "registration" => REGISTRATION,
        "job_application" => JOB_APPLICATION,
        "feedback" => FEEDBACK,
        _ => return None,
    };
    parse(source)
}

fn parse(source: &str) -> Option<FormSchema> {
    serde_json::from_str(source)
        .map_err(|err| warn!(error = %err, "bundled sample failed to parse"))
        .ok()
}
