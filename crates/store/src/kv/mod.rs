use std::path::PathBuf;
use std::rc::Rc;

use thiserror::Error;
use tracing::debug;

use delish_core::config::{StorageBackend, StorageConfig};

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::InMemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage io error at `{path}`: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("decode error: {0}")]
    Decode(String),
    #[error("encode error: {0}")]
    Encode(String),
}

/// Named string slots, in the manner of browser local storage.
///
/// Calls are synchronous and take `&self`; implementations that hold state
/// in memory use interior mutability.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove_item(&self, key: &str) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Rc<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove_item(key)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove_item(key)
    }
}

/// Opens the configured backend as a shared handle for the cart and theme stores.
pub fn open_store(config: &StorageConfig) -> Rc<dyn KeyValueStore> {
    match config.backend {
        StorageBackend::File => {
            debug!(
                event_name = "storage.open",
                backend = "file",
                path = %config.path.display(),
                "opening file-backed storage"
            );
            Rc::new(FileStore::new(config.path.clone()))
        }
        StorageBackend::Memory => {
            debug!(event_name = "storage.open", backend = "memory", "opening in-memory storage");
            Rc::new(InMemoryStore::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::rc::Rc;

    use delish_core::config::{StorageBackend, StorageConfig};
    use tempfile::TempDir;

    use super::{open_store, InMemoryStore, KeyValueStore};

    #[test]
    fn rc_handles_share_one_backend() {
        let store = Rc::new(InMemoryStore::default());
        let other = Rc::clone(&store);

        store.set_item("slot", "value").expect("set");
        assert_eq!(other.get_item("slot").expect("get").as_deref(), Some("value"));
    }

    #[test]
    fn open_store_honors_configured_backend() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("nested").join("storage.json");
        let config = StorageConfig {
            backend: StorageBackend::File,
            path: path.clone(),
            cart_key: "delish_cart".to_string(),
            theme_key: "delish_theme".to_string(),
        };

        let store = open_store(&config);
        store.set_item("delish_theme", "dark").expect("set");
        assert!(path.exists());

        let memory = open_store(&StorageConfig {
            backend: StorageBackend::Memory,
            path: PathBuf::new(),
            ..config
        });
        assert_eq!(memory.get_item("delish_theme").expect("get"), None);
    }
}
