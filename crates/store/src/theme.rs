use tracing::{debug, warn};

use delish_core::domain::theme::Theme;

use crate::kv::{KeyValueStore, StoreError};

/// Theme preference slot. Dark writes the flag; light clears the slot.
pub struct ThemeStore<S> {
    store: S,
    slot: String,
}

impl<S: KeyValueStore> ThemeStore<S> {
    pub fn new(store: S, slot: impl Into<String>) -> Self {
        Self { store, slot: slot.into() }
    }

    pub fn load(&self) -> Theme {
        match self.store.get_item(&self.slot) {
            Ok(value) => Theme::from_slot(value.as_deref()),
            Err(error) => {
                warn!(
                    event_name = "theme.load.failed",
                    slot = %self.slot,
                    error = %error,
                    "theme preference is unreadable; using light theme"
                );
                Theme::Light
            }
        }
    }

    pub fn set(&self, theme: Theme) -> Result<(), StoreError> {
        match theme {
            Theme::Dark => self.store.set_item(&self.slot, Theme::DARK_FLAG)?,
            Theme::Light => self.store.remove_item(&self.slot)?,
        }
        debug!(event_name = "theme.set", theme = %theme, "theme preference saved");
        Ok(())
    }

    pub fn toggle(&self) -> Result<Theme, StoreError> {
        let next = self.load().toggled();
        self.set(next)?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use delish_core::domain::theme::Theme;

    use super::ThemeStore;
    use crate::kv::{InMemoryStore, KeyValueStore};

    const SLOT: &str = "delish_theme";

    #[test]
    fn toggle_writes_flag_then_clears_slot() {
        let store = Rc::new(InMemoryStore::default());
        let theme = ThemeStore::new(Rc::clone(&store), SLOT);
        assert_eq!(theme.load(), Theme::Light);

        assert_eq!(theme.toggle().expect("toggle to dark"), Theme::Dark);
        assert_eq!(store.get_item(SLOT).expect("get").as_deref(), Some("dark"));

        assert_eq!(theme.toggle().expect("toggle to light"), Theme::Light);
        assert_eq!(store.get_item(SLOT).expect("get"), None);
    }

    #[test]
    fn unexpected_slot_value_reads_as_light() {
        let store = InMemoryStore::with_slots([(SLOT, "solarized")]);
        let theme = ThemeStore::new(&store, SLOT);

        assert_eq!(theme.load(), Theme::Light);
        assert_eq!(theme.toggle().expect("toggle"), Theme::Dark);
    }

    #[test]
    fn theme_slot_is_independent_of_cart_slot() {
        let store = InMemoryStore::with_slots([("delish_cart", "[]")]);
        let theme = ThemeStore::new(&store, SLOT);

        theme.set(Theme::Dark).expect("set dark");
        theme.set(Theme::Light).expect("set light");

        assert_eq!(store.get_item("delish_cart").expect("get").as_deref(), Some("[]"));
    }
}
