//! One-shot schema imports delivered at startup.

use tracing::{info, warn};

use crate::codec::decode_import_fragment;
use crate::spec::form::FormSchema;
use crate::store::{SchemaStore, load_or_default};

/// Source of a pending import, consumed at most once.
pub trait ImportChannel {
    fn consume(&mut self) -> Option<FormSchema>;
}

/// Import carried by a `#import=<base64>` location fragment.
#[derive(Debug, Clone, Default)]
pub struct FragmentImport {
    fragment: Option<String>,
}

impl FragmentImport {
    pub fn new(fragment: Option<String>) -> Self {
        Self { fragment }
    }

    /// The fragment still waiting to be consumed, if any.
    pub fn pending(&self) -> Option<&str> {
        self.fragment.as_deref()
    }
}

impl ImportChannel for FragmentImport {
    /// Decodes the fragment and clears it. A malformed payload is logged and dropped.
    fn consume(&mut self) -> Option<FormSchema> {
        let fragment = self.fragment.take()?;
        if fragment.trim().is_empty() {
            return None;
        }
        match decode_import_fragment(&fragment) {
            Ok(schema) => {
                info!(fields = schema.fields.len(), "imported schema from fragment");
                Some(schema)
            }
            Err(err) => {
                warn!(error = %err, "failed to import schema");
                None
            }
        }
    }
}

/// Startup sequence: load the saved schema, then let a pending import replace it.
///
/// An accepted import is written back to the store; a rejected one leaves
/// the loaded schema untouched.
pub fn bootstrap(store: &mut dyn SchemaStore, channel: &mut dyn ImportChannel) -> FormSchema {
    let schema = load_or_default(store);
    match channel.consume() {
        Some(imported) => {
            if let Err(err) = store.save(&imported) {
                warn!(error = %err, "failed to persist imported schema");
            }
            imported
        }
        None => schema,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode_import_fragment;
    use crate::samples;
    use crate::store::MemorySchemaStore;

    #[test]
    fn fragment_is_consumed_once() {
        let schema = samples::contact_form();
        let fragment = encode_import_fragment(&schema).expect("encode");
        let mut channel = FragmentImport::new(Some(fragment));
        assert_eq!(channel.consume(), Some(schema));
        assert!(channel.pending().is_none());
        assert_eq!(channel.consume(), None);
    }

    #[test]
    fn bootstrap_prefers_import_and_persists_it() {
        let mut store = MemorySchemaStore::new();
        let imported = samples::by_name("feedback").expect("sample");
        let mut channel =
            FragmentImport::new(Some(encode_import_fragment(&imported).expect("encode")));
        let schema = bootstrap(&mut store, &mut channel);
        assert_eq!(schema, imported);
        assert_eq!(store.load().expect("load"), Some(imported));
    }

    #[test]
    fn bad_import_keeps_saved_schema() {
        let saved = samples::contact_form();
        let mut store = MemorySchemaStore::new();
        store.save(&saved).expect("save");
        let mut channel = FragmentImport::new(Some("#import=%%%".into()));
        assert_eq!(bootstrap(&mut store, &mut channel), saved);
        assert_eq!(store.load().expect("load"), Some(saved));
    }
}
