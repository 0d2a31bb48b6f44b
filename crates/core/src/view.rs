//! Display structures for the menu grid, cart drawer and detail modal.
//!
//! These are pure projections of catalog and cart state. Markup and event
//! wiring belong to whichever front end consumes them.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::catalog::Catalog;
use crate::domain::cart::Cart;
use crate::domain::product::{CategoryFilter, Product, ProductId};

pub const EMPTY_CART_MESSAGE: &str = "Your cart is empty";
pub const VEG_BADGE: &str = "• veg";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MenuCard {
    pub id: ProductId,
    pub emoji: String,
    pub name: String,
    pub badge: Option<&'static str>,
    pub description: String,
    pub price_label: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CartLineView {
    pub id: ProductId,
    pub name: String,
    pub unit_price_label: String,
    pub quantity: u32,
    pub line_total_label: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub count: u64,
    pub total_label: String,
    pub empty_message: Option<&'static str>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProductDetail {
    pub id: ProductId,
    pub emoji: String,
    pub name: String,
    pub description: String,
    pub price_label: String,
    pub is_vegetarian: bool,
}

/// Formats an amount with exactly two decimal places, half-up.
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}")
}

pub fn format_price(amount: Decimal) -> String {
    format!("${}", format_amount(amount))
}

pub fn menu_card(product: &Product) -> MenuCard {
    MenuCard {
        id: product.id,
        emoji: product.emoji.clone(),
        name: product.name.clone(),
        badge: product.is_vegetarian.then_some(VEG_BADGE),
        description: product.description.clone(),
        price_label: format_price(product.price),
    }
}

pub fn menu_cards(catalog: &Catalog, category: CategoryFilter, veg_only: bool) -> Vec<MenuCard> {
    catalog.filter(category, veg_only).into_iter().map(menu_card).collect()
}

pub fn cart_view(cart: &Cart) -> CartView {
    let lines = cart
        .lines()
        .iter()
        .map(|line| CartLineView {
            id: line.product_id,
            name: line.name.clone(),
            unit_price_label: format!("{} each", format_price(line.unit_price)),
            quantity: line.quantity,
            line_total_label: format_price(line.line_total()),
        })
        .collect();

    CartView {
        lines,
        count: cart.item_count(),
        total_label: format_amount(cart.total()),
        empty_message: cart.is_empty().then_some(EMPTY_CART_MESSAGE),
    }
}

pub fn product_detail(product: &Product) -> ProductDetail {
    ProductDetail {
        id: product.id,
        emoji: product.emoji.clone(),
        name: product.name.clone(),
        description: product.description.clone(),
        price_label: format_price(product.price),
        is_vegetarian: product.is_vegetarian,
    }
}
