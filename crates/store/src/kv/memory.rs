use std::cell::RefCell;
use std::collections::HashMap;

use super::{KeyValueStore, StoreError};

#[derive(Debug, Default)]
pub struct InMemoryStore {
    slots: RefCell<HashMap<String, String>>,
}

impl InMemoryStore {
    pub fn with_slots<I, K, V>(slots: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            slots: RefCell::new(
                slots.into_iter().map(|(key, value)| (key.into(), value.into())).collect(),
            ),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.borrow().is_empty()
    }
}

impl KeyValueStore for InMemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.slots.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        self.slots.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{InMemoryStore, KeyValueStore};

    #[test]
    fn in_memory_store_round_trip() {
        let store = InMemoryStore::default();

        assert_eq!(store.get_item("delish_cart").expect("get"), None);
        store.set_item("delish_cart", "[]").expect("set");
        assert_eq!(store.get_item("delish_cart").expect("get").as_deref(), Some("[]"));

        store.remove_item("delish_cart").expect("remove");
        assert!(store.is_empty());
    }

    #[test]
    fn removing_absent_slot_is_ok() {
        let store = InMemoryStore::with_slots([("delish_theme", "dark")]);

        store.remove_item("delish_cart").expect("remove absent");
        assert_eq!(store.len(), 1);
    }
}
