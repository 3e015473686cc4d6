//! Durable storage for the single current schema.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::StoreError;
use crate::spec::form::FormSchema;

/// Fixed key the current schema is stored under.
pub const STORE_KEY: &str = "formSchema";

/// Keeps one serialized schema.
pub trait SchemaStore {
    /// Returns the stored schema, or `None` when nothing has been saved yet.
    fn load(&self) -> Result<Option<FormSchema>, StoreError>;

    fn save(&mut self, schema: &FormSchema) -> Result<(), StoreError>;

    fn clear(&mut self) -> Result<(), StoreError>;
}

/// Loads the stored schema, falling back to the default form.
///
/// Unreadable or malformed state is logged and ignored.
pub fn load_or_default(store: &dyn SchemaStore) -> FormSchema {
    match store.load() {
        Ok(Some(schema)) => schema,
        Ok(None) => FormSchema::default(),
        Err(err) => {
            warn!(error = %err, "failed to load saved schema");
            FormSchema::default()
        }
    }
}

/// Stores the schema as `<dir>/formSchema.json`.
#[derive(Debug, Clone)]
pub struct FileSchemaStore {
    path: PathBuf,
}

impl FileSchemaStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", STORE_KEY)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl SchemaStore for FileSchemaStore {
    fn load(&self) -> Result<Option<FormSchema>, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(self.io_error(err)),
        };
        let schema: FormSchema =
            serde_json::from_str(&contents).map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            })?;
        schema.check()?;
        Ok(Some(schema))
    }

    fn save(&mut self, schema: &FormSchema) -> Result<(), StoreError> {
        let contents = serde_json::to_string(schema).map_err(StoreError::Encode)?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
        }
        fs::write(&self.path, contents).map_err(|err| self.io_error(err))?;
        debug!(path = %self.path.display(), fields = schema.fields.len(), "schema saved");
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(self.io_error(err)),
        }
    }
}

/// In-memory store holding the serialized text, for hosts without a filesystem.
#[derive(Debug, Clone, Default)]
pub struct MemorySchemaStore {
    contents: Option<String>,
}

impl MemorySchemaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with raw text, as if it had been written earlier.
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: Some(contents.into()),
        }
    }

    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl SchemaStore for MemorySchemaStore {
    fn load(&self) -> Result<Option<FormSchema>, StoreError> {
        let Some(contents) = &self.contents else {
            return Ok(None);
        };
        let schema: FormSchema =
            serde_json::from_str(contents).map_err(|source| StoreError::Corrupt {
                path: PathBuf::from(STORE_KEY),
                source,
            })?;
        schema.check()?;
        Ok(Some(schema))
    }

    fn save(&mut self, schema: &FormSchema) -> Result<(), StoreError> {
        self.contents = Some(serde_json::to_string(schema).map_err(StoreError::Encode)?);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.contents = None;
        Ok(())
    }
}
