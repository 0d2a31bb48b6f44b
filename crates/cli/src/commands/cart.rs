use std::rc::Rc;

use delish_core::config::LoadOptions;
use delish_core::domain::cart::{CartState, QuantityChange};
use delish_core::domain::product::ProductId;
use delish_core::errors::ApplicationError;
use delish_core::session::PageSession;
use delish_core::view::{self, CartView};
use delish_store::{CartStore, KeyValueStore};
use serde::Serialize;

use crate::commands::{CommandResult, Context};

#[derive(Debug, Serialize)]
struct CartSnapshot {
    state: CartState,
    cart_open: bool,
    #[serde(flatten)]
    view: CartView,
}

fn snapshot<S: KeyValueStore>(cart: &CartStore<S>, session: &PageSession) -> CartSnapshot {
    CartSnapshot {
        state: cart.state(),
        cart_open: session.cart_open,
        view: view::cart_view(cart.cart()),
    }
}

type SharedCartStore = CartStore<Rc<dyn KeyValueStore>>;

fn with_cart(
    command: &str,
    options: &LoadOptions,
    action: impl FnOnce(&mut SharedCartStore, &mut PageSession) -> Result<String, ApplicationError>,
) -> CommandResult {
    let context = match Context::load(options) {
        Ok(context) => context,
        Err(error) => return CommandResult::from_error(command, &error),
    };

    let mut cart = context.cart_store();
    let mut session = PageSession::new();
    match action(&mut cart, &mut session) {
        Ok(message) => CommandResult::success(command, message, snapshot(&cart, &session)),
        Err(error) => CommandResult::from_error(command, &error),
    }
}

pub fn show(options: &LoadOptions) -> CommandResult {
    with_cart("cart.show", options, |cart, session| {
        session.open_cart();
        Ok(format!("{} item(s), total {}", cart.item_count(), view::format_amount(cart.total())))
    })
}

pub fn add(options: &LoadOptions, product_id: u32) -> CommandResult {
    with_cart("cart.add", options, |cart, session| {
        let product_id = ProductId(product_id);
        let quantity = cart.add_item(product_id)?;
        session.open_cart();

        let name = cart.catalog().find(product_id).map(|product| product.name.as_str());
        Ok(format!("added {} (qty {quantity})", name.unwrap_or("item")))
    })
}

pub fn change_quantity(options: &LoadOptions, product_id: u32, delta: i64) -> CommandResult {
    with_cart("cart.qty", options, |cart, _session| {
        let message = match cart.change_quantity(ProductId(product_id), delta)? {
            QuantityChange::Updated(quantity) => {
                format!("product {product_id} now has qty {quantity}")
            }
            QuantityChange::Removed => format!("removed product {product_id}"),
            QuantityChange::Missing => format!("product {product_id} is not in the cart"),
        };
        Ok(message)
    })
}

pub fn remove(options: &LoadOptions, product_id: u32) -> CommandResult {
    with_cart("cart.remove", options, |cart, _session| {
        let message = if cart.remove_item(ProductId(product_id))? {
            format!("removed product {product_id}")
        } else {
            format!("product {product_id} was not in the cart")
        };
        Ok(message)
    })
}

pub fn clear(options: &LoadOptions) -> CommandResult {
    with_cart("cart.clear", options, |cart, _session| {
        cart.clear()?;
        Ok("cart cleared".to_string())
    })
}
