//! Field construction with a complete attribute set.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::spec::field::{Field, FieldType};
use crate::spec::form::FormSchema;

/// Hands out field and option ids for one editing session.
///
/// Ids are time-seeded and strictly increasing, and never repeat an id
/// already present in a schema passed to [`IdAllocator::reserve`].
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u64,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator {
    pub fn new() -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as u64)
            .unwrap_or(1);
        Self::starting_at(now)
    }

    pub fn starting_at(next: u64) -> Self {
        Self { next }
    }

    /// Allocator positioned after every numeric id in `schema`.
    pub fn for_schema(schema: &FormSchema) -> Self {
        let mut ids = Self::new();
        ids.reserve(schema);
        ids
    }

    pub fn reserve(&mut self, schema: &FormSchema) {
        let used = schema.fields.iter().flat_map(|field| {
            std::iter::once(field.id.as_str())
                .chain(field.options().iter().map(|option| option.id.as_str()))
        });
        for id in used {
            if let Ok(numeric) = id.parse::<u64>()
                && numeric >= self.next
            {
                self.next = numeric.saturating_add(1);
            }
        }
    }

    pub fn next_id(&mut self) -> String {
        let id = self.next;
        self.next = self.next.saturating_add(1);
        id.to_string()
    }
}

/// Builds a default field whose id and `field_<id>` name are both unused in `schema`.
pub fn create_field_for(schema: &FormSchema, kind: FieldType, ids: &mut IdAllocator) -> Field {
    ids.reserve(schema);
    let mut field = create_default_field(kind, ids);
    while schema.field_by_name(&field.name).is_some() || schema.field(&field.id).is_some() {
        field = create_default_field(kind, ids);
    }
    field
}

/// Builds a new field of `kind` with defaults for every attribute.
///
/// Choice kinds start with an empty option list; the others carry none.
pub fn create_default_field(kind: FieldType, ids: &mut IdAllocator) -> Field {
    let id = ids.next_id();
    let options = if kind.has_options() {
        Some(Vec::new())
    } else {
        None
    };
    Field {
        name: format!("field_{}", id),
        id,
        kind,
        label: format!("{} Field", capitalize(kind.as_str())),
        required: false,
        placeholder: String::new(),
        validators: Vec::new(),
        options,
        rows: None,
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::field::FieldOption;

    #[test]
    fn select_fields_start_with_empty_options() {
        let mut ids = IdAllocator::starting_at(100);
        let field = create_default_field(FieldType::Select, &mut ids);
        assert_eq!(field.id, "100");
        assert_eq!(field.name, "field_100");
        assert_eq!(field.label, "Select Field");
        assert_eq!(field.options, Some(Vec::new()));
        assert!(field.validators.is_empty());
    }

    #[test]
    fn text_fields_have_no_options_key() {
        let mut ids = IdAllocator::starting_at(1);
        let field = create_default_field(FieldType::Text, &mut ids);
        let value = serde_json::to_value(&field).expect("serialize");
        assert!(value.get("options").is_none());
    }

    #[test]
    fn reserve_skips_ids_already_in_use() {
        let mut ids = IdAllocator::starting_at(1);
        let mut existing = create_default_field(FieldType::Radio, &mut IdAllocator::starting_at(5));
        existing.options = Some(vec![FieldOption {
            id: "9".into(),
            value: "a".into(),
            label: "A".into(),
        }]);
        let schema = FormSchema {
            fields: vec![existing],
            ..FormSchema::default()
        };
        ids.reserve(&schema);
        assert_eq!(ids.next_id(), "10");
        assert_eq!(ids.next_id(), "11");
    }
}
