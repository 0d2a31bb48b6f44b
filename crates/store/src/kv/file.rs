use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use tracing::warn;

use super::{KeyValueStore, StoreError};

type Document = BTreeMap<String, String>;

/// Slots kept as one JSON object on disk.
///
/// Writes go to a sibling `.tmp` file that is renamed over the document, so a
/// crash mid-write leaves the previous document intact.
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_document(&self) -> Result<Document, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(source) if source.kind() == ErrorKind::NotFound => return Ok(Document::new()),
            Err(source) => return Err(StoreError::Io { path: self.path.clone(), source }),
        };

        serde_json::from_str(&raw).map_err(|error| {
            StoreError::Decode(format!("storage document `{}`: {error}", self.path.display()))
        })
    }

    fn write_document(&self, document: &Document) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|source| StoreError::Io { path: parent.to_path_buf(), source })?;
        }

        let raw = serde_json::to_string_pretty(document)
            .map_err(|error| StoreError::Encode(error.to_string()))?;

        let mut staging = OsString::from(self.path.as_os_str());
        staging.push(".tmp");
        let staging = PathBuf::from(staging);

        fs::write(&staging, raw)
            .map_err(|source| StoreError::Io { path: staging.clone(), source })?;
        fs::rename(&staging, &self.path)
            .map_err(|source| StoreError::Io { path: self.path.clone(), source })
    }

    fn update(&self, apply: impl FnOnce(&mut Document)) -> Result<(), StoreError> {
        let mut document = match self.read_document() {
            Ok(document) => document,
            Err(StoreError::Decode(reason)) => {
                warn!(
                    event_name = "storage.file.document_reset",
                    path = %self.path.display(),
                    reason = %reason,
                    "storage document is unreadable; starting a fresh one"
                );
                Document::new()
            }
            Err(error) => return Err(error),
        };

        apply(&mut document);
        self.write_document(&document)
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_document()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.update(|document| {
            document.insert(key.to_string(), value.to_string());
        })
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        self.update(|document| {
            document.remove(key);
        })
    }
}
