use std::rc::Rc;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, warn};

use delish_core::catalog::Catalog;
use delish_core::domain::cart::{Cart, CartLine, CartState, QuantityChange};
use delish_core::domain::product::ProductId;
use delish_core::errors::{ApplicationError, DomainError};

use crate::kv::{KeyValueStore, StoreError};

#[derive(Debug, Error)]
pub enum CartError {
    #[error("product {0} is not in the catalog")]
    ProductNotFound(ProductId),
    #[error(transparent)]
    Rejected(#[from] DomainError),
    #[error("cart could not be saved: {0}")]
    Persistence(#[from] StoreError),
}

impl From<CartError> for ApplicationError {
    fn from(error: CartError) -> Self {
        match error {
            CartError::ProductNotFound(product_id) => {
                ApplicationError::Domain(DomainError::ProductNotFound(product_id))
            }
            CartError::Rejected(error) => ApplicationError::Domain(error),
            CartError::Persistence(error) => ApplicationError::Persistence(error.to_string()),
        }
    }
}

/// Owns the cart and writes it back to its slot after every mutation.
///
/// A failed write is reported to the caller but does not roll back the
/// in-memory change.
pub struct CartStore<S> {
    store: S,
    catalog: Rc<Catalog>,
    slot: String,
    cart: Cart,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Reads the cart slot. Missing or unreadable data yields an empty cart.
    pub fn load(store: S, catalog: Rc<Catalog>, slot: impl Into<String>) -> Self {
        let slot = slot.into();
        let cart = match read_cart(&store, &slot) {
            Ok(Some(cart)) => {
                debug!(
                    event_name = "cart.load.restored",
                    slot = %slot,
                    lines = cart.lines().len(),
                    "restored persisted cart"
                );
                cart
            }
            Ok(None) => Cart::new(),
            Err(error) => {
                warn!(
                    event_name = "cart.load.decode_failed",
                    slot = %slot,
                    error = %error,
                    "persisted cart is unreadable; starting with an empty cart"
                );
                Cart::new()
            }
        };

        Self { store, catalog, slot, cart }
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn lines(&self) -> &[CartLine] {
        self.cart.lines()
    }

    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    pub fn state(&self) -> CartState {
        self.cart.state()
    }

    pub fn total(&self) -> Decimal {
        self.cart.total()
    }

    pub fn item_count(&self) -> u64 {
        self.cart.item_count()
    }

    /// Adds one unit and returns the line's new quantity.
    pub fn add_item(&mut self, product_id: ProductId) -> Result<u32, CartError> {
        let Some(product) = self.catalog.find(product_id) else {
            warn!(
                event_name = "cart.add.product_not_found",
                product_id = product_id.0,
                "ignoring add for a product that is not in the catalog"
            );
            return Err(CartError::ProductNotFound(product_id));
        };

        let quantity = self.cart.add(product).map_err(|error| {
            warn!(
                event_name = "cart.add.rejected",
                product_id = product_id.0,
                error = %error,
                "cart refused the new quantity"
            );
            error
        })?;
        debug!(event_name = "cart.add", product_id = product_id.0, quantity, "item added");
        self.save()?;
        Ok(quantity)
    }

    /// Applies `delta` to the line's quantity. A missing line is left alone
    /// and nothing is written.
    pub fn change_quantity(
        &mut self,
        product_id: ProductId,
        delta: i64,
    ) -> Result<QuantityChange, CartError> {
        let change = self.cart.change_quantity(product_id, delta)?;
        match change {
            QuantityChange::Missing => {
                debug!(
                    event_name = "cart.quantity.missing_line",
                    product_id = product_id.0,
                    "no cart line to change"
                );
                return Ok(change);
            }
            QuantityChange::Updated(_) => {}
            QuantityChange::Removed => {
                debug!(
                    event_name = "cart.quantity.line_removed",
                    product_id = product_id.0,
                    delta,
                    "quantity reached zero"
                );
            }
        }
        self.save()?;
        Ok(change)
    }

    /// Returns whether a line was removed. Persists either way.
    pub fn remove_item(&mut self, product_id: ProductId) -> Result<bool, CartError> {
        let removed = self.cart.remove(product_id);
        self.save()?;
        Ok(removed)
    }

    pub fn clear(&mut self) -> Result<(), CartError> {
        self.cart.clear();
        self.save()
    }

    fn save(&self) -> Result<(), CartError> {
        let encoded = serde_json::to_string(&self.cart)
            .map_err(|error| StoreError::Encode(error.to_string()))?;
        self.store.set_item(&self.slot, &encoded).map_err(|error| {
            warn!(
                event_name = "cart.save.failed",
                slot = %self.slot,
                error = %error,
                "cart changes were not persisted"
            );
            CartError::Persistence(error)
        })
    }
}

fn read_cart<S: KeyValueStore>(store: &S, slot: &str) -> Result<Option<Cart>, StoreError> {
    let Some(raw) = store.get_item(slot)? else {
        return Ok(None);
    };

    serde_json::from_str::<Cart>(&raw)
        .map(Some)
        .map_err(|error| StoreError::Decode(format!("cart slot `{slot}`: {error}")))
}
