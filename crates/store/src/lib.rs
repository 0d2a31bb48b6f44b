pub mod cart;
pub mod kv;
pub mod theme;

pub use cart::{CartError, CartStore};
pub use kv::{open_store, FileStore, InMemoryStore, KeyValueStore, StoreError};
pub use theme::ThemeStore;
