use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::product::{Product, ProductId};
use crate::errors::DomainError;

/// One product's entry in the cart.
///
/// Name and unit price are copied from the catalog on first add and never
/// refreshed afterwards. The serialized field names match the `delish_cart`
/// slot layout: `{"id", "name", "price", "qty"}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(rename = "id")]
    pub product_id: ProductId,
    pub name: String,
    #[serde(rename = "price", with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(rename = "qty")]
    pub quantity: u32,
}

impl CartLine {
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }

    fn checked_line_total(&self) -> Option<Decimal> {
        self.unit_price.checked_mul(Decimal::from(self.quantity))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CartState {
    Empty,
    NonEmpty,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuantityChange {
    /// No line exists for the product; nothing changed.
    Missing,
    Updated(u32),
    Removed,
}

/// Cart lines, at most one per product.
///
/// Every constructor and mutation keeps the cart total representable as a
/// `Decimal`, so `total` and `CartLine::line_total` never overflow.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CartLine>", into = "Vec<CartLine>")]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_lines(lines: Vec<CartLine>) -> Result<Self, DomainError> {
        let mut seen = HashSet::with_capacity(lines.len());
        for line in &lines {
            if !seen.insert(line.product_id) {
                return Err(DomainError::InvariantViolation(format!(
                    "cart holds more than one line for product {}",
                    line.product_id
                )));
            }
            if line.quantity == 0 {
                return Err(DomainError::InvariantViolation(format!(
                    "cart line for product {} has zero quantity",
                    line.product_id
                )));
            }
            if line.unit_price.is_sign_negative() {
                return Err(DomainError::InvariantViolation(format!(
                    "cart line for product {} has a negative price",
                    line.product_id
                )));
            }
        }

        if checked_total(&lines).is_none() {
            return Err(DomainError::InvariantViolation(
                "cart total exceeds the largest representable amount".to_string(),
            ));
        }

        Ok(Self { lines })
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product_id == product_id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn state(&self) -> CartState {
        if self.lines.is_empty() {
            CartState::Empty
        } else {
            CartState::NonEmpty
        }
    }

    /// Adds one unit of `product`, returning the line's new quantity.
    ///
    /// Fails with `TotalOverflow` when the new quantity would push the cart
    /// total past `Decimal::MAX`; the cart is left unchanged.
    pub fn add(&mut self, product: &Product) -> Result<u32, DomainError> {
        if let Some(index) = self.position(product.id) {
            let quantity = self.lines[index].quantity.saturating_add(1);
            self.set_quantity(index, quantity)?;
            return Ok(quantity);
        }

        self.lines.push(CartLine {
            product_id: product.id,
            name: product.name.clone(),
            unit_price: product.price,
            quantity: 1,
        });
        if checked_total(&self.lines).is_none() {
            self.lines.pop();
            return Err(DomainError::TotalOverflow(product.id));
        }
        Ok(1)
    }

    /// Applies a signed delta. A result of zero or below drops the line.
    pub fn change_quantity(
        &mut self,
        product_id: ProductId,
        delta: i64,
    ) -> Result<QuantityChange, DomainError> {
        let Some(index) = self.position(product_id) else {
            return Ok(QuantityChange::Missing);
        };

        let next = i64::from(self.lines[index].quantity).saturating_add(delta);
        if next <= 0 {
            self.lines.remove(index);
            return Ok(QuantityChange::Removed);
        }

        let quantity = u32::try_from(next).unwrap_or(u32::MAX);
        self.set_quantity(index, quantity)?;
        Ok(QuantityChange::Updated(quantity))
    }

    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.product_id != product_id);
        self.lines.len() != before
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.lines.iter().position(|line| line.product_id == product_id)
    }

    fn set_quantity(&mut self, index: usize, quantity: u32) -> Result<(), DomainError> {
        let previous = self.lines[index].quantity;
        self.lines[index].quantity = quantity;
        if checked_total(&self.lines).is_none() {
            self.lines[index].quantity = previous;
            return Err(DomainError::TotalOverflow(self.lines[index].product_id));
        }
        Ok(())
    }
}

// Prices are non-negative, so a representable total bounds every line total.
fn checked_total(lines: &[CartLine]) -> Option<Decimal> {
    lines.iter().try_fold(Decimal::ZERO, |total, line| {
        line.checked_line_total().and_then(|line_total| total.checked_add(line_total))
    })
}

impl TryFrom<Vec<CartLine>> for Cart {
    type Error = DomainError;

    fn try_from(lines: Vec<CartLine>) -> Result<Self, Self::Error> {
        Self::from_lines(lines)
    }
}

impl From<Cart> for Vec<CartLine> {
    fn from(cart: Cart) -> Self {
        cart.lines
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::domain::product::{Category, Product, ProductId};
    use crate::errors::DomainError;

    use super::{Cart, CartLine, CartState, QuantityChange};

    fn product(id: u32, price: i64) -> Product {
        Product {
            id: ProductId(id),
            name: format!("Dish {id}"),
            description: "house special".to_string(),
            category: Category::Mains,
            emoji: "🍽".to_string(),
            price: Decimal::new(price, 0),
            is_vegetarian: false,
        }
    }

    #[test]
    fn repeated_adds_accumulate_on_a_single_line() {
        let mut cart = Cart::new();
        let pizza = product(1, 12);

        for expected in 1..=5 {
            assert_eq!(cart.add(&pizza), Ok(expected));
        }

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.line(ProductId(1)).map(|line| line.quantity), Some(5));
        assert_eq!(cart.item_count(), 5);
    }

    #[test]
    fn add_snapshots_name_and_price() {
        let mut cart = Cart::new();
        let mut pizza = product(1, 12);
        cart.add(&pizza).expect("add");

        pizza.price = Decimal::new(99, 0);
        pizza.name = "Renamed".to_string();
        cart.add(&pizza).expect("add");

        let line = cart.line(ProductId(1)).expect("line exists");
        assert_eq!(line.unit_price, Decimal::new(12, 0));
        assert_eq!(line.name, "Dish 1");
        assert_eq!(cart.total(), Decimal::new(24, 0));
    }

    #[test]
    fn decrement_to_zero_removes_line() {
        let mut cart = Cart::new();
        cart.add(&product(1, 12)).expect("add");
        cart.add(&product(1, 12)).expect("add");
        cart.add(&product(2, 6)).expect("add");

        assert_eq!(cart.change_quantity(ProductId(1), -2), Ok(QuantityChange::Removed));
        assert!(cart.line(ProductId(1)).is_none());
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total(), Decimal::new(6, 0));
    }

    #[test]
    fn large_negative_delta_removes_instead_of_clamping() {
        let mut cart = Cart::new();
        cart.add(&product(3, 14)).expect("add");

        assert_eq!(cart.change_quantity(ProductId(3), i64::MIN), Ok(QuantityChange::Removed));
        assert_eq!(cart.state(), CartState::Empty);
    }

    #[test]
    fn change_quantity_on_missing_line_is_noop() {
        let mut cart = Cart::new();
        cart.add(&product(1, 12)).expect("add");

        assert_eq!(cart.change_quantity(ProductId(42), 1), Ok(QuantityChange::Missing));
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn positive_delta_saturates_at_u32_max() {
        let mut cart = Cart::new();
        cart.add(&product(1, 1)).expect("add");

        assert_eq!(
            cart.change_quantity(ProductId(1), i64::MAX),
            Ok(QuantityChange::Updated(u32::MAX))
        );
    }

    #[test]
    fn remove_is_idempotent() {
        let mut cart = Cart::new();
        cart.add(&product(1, 12)).expect("add");
        cart.add(&product(2, 6)).expect("add");

        assert!(cart.remove(ProductId(1)));
        let after_first = cart.clone();
        assert!(!cart.remove(ProductId(1)));
        assert_eq!(cart, after_first);
    }

    #[test]
    fn lines_keep_first_added_order() {
        let mut cart = Cart::new();
        cart.add(&product(5, 7)).expect("add");
        cart.add(&product(2, 6)).expect("add");
        cart.add(&product(5, 7)).expect("add");

        let ids: Vec<u32> = cart.lines().iter().map(|line| line.product_id.0).collect();
        assert_eq!(ids, vec![5, 2]);
    }

    #[test]
    fn total_uses_fractional_prices() {
        let mut cart = Cart::new();
        let mut soup = product(1, 0);
        soup.price = Decimal::new(450, 2);
        cart.add(&soup).expect("add");
        cart.add(&soup).expect("add");
        cart.add(&product(2, 3)).expect("add");

        assert_eq!(cart.total(), Decimal::new(1200, 2));
    }

    #[test]
    fn serializes_to_slot_layout() {
        let mut cart = Cart::new();
        cart.add(&product(1, 12)).expect("add");

        let value = serde_json::to_value(&cart).expect("serialize cart");
        assert_eq!(value[0]["id"], 1);
        assert_eq!(value[0]["name"], "Dish 1");
        assert_eq!(value[0]["price"], 12.0);
        assert_eq!(value[0]["qty"], 1);
    }

    #[test]
    fn decodes_records_written_with_integer_prices() {
        let raw = r#"[{"id":1,"name":"Margherita Pizza","price":12,"qty":2}]"#;
        let cart: Cart = serde_json::from_str(raw).expect("decode cart");

        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.total(), Decimal::new(24, 0));
    }

    #[test]
    fn decode_rejects_duplicate_and_zero_quantity_lines() {
        let duplicate = r#"[{"id":1,"name":"a","price":1,"qty":1},{"id":1,"name":"a","price":1,"qty":1}]"#;
        assert!(serde_json::from_str::<Cart>(duplicate).is_err());

        let zero = r#"[{"id":1,"name":"a","price":1,"qty":0}]"#;
        assert!(serde_json::from_str::<Cart>(zero).is_err());

        let negative = r#"[{"id":1,"name":"a","price":1,"qty":-3}]"#;
        assert!(serde_json::from_str::<Cart>(negative).is_err());
    }

    #[test]
    fn from_lines_rejects_negative_price() {
        let result = Cart::from_lines(vec![CartLine {
            product_id: ProductId(1),
            name: "refund".to_string(),
            unit_price: Decimal::new(-1, 0),
            quantity: 1,
        }]);

        assert!(result.is_err());
    }

    fn line(id: u32, unit_price: Decimal, quantity: u32) -> CartLine {
        CartLine { product_id: ProductId(id), name: format!("Dish {id}"), unit_price, quantity }
    }

    #[test]
    fn from_lines_rejects_totals_that_cannot_be_represented() {
        assert!(Cart::from_lines(vec![line(1, Decimal::MAX, 2)]).is_err());
        assert!(Cart::from_lines(vec![line(1, Decimal::MAX, 1), line(2, Decimal::ONE, 1)]).is_err());
        assert!(Cart::from_lines(vec![line(1, Decimal::MAX, 1)]).is_ok());

        let raw = r#"[{"id":1,"name":"Margherita Pizza","price":5e28,"qty":2}]"#;
        assert!(serde_json::from_str::<Cart>(raw).is_err());
    }

    #[test]
    fn add_refuses_units_that_would_overflow_the_total() {
        let mut cart = Cart::new();
        let mut banquet = product(1, 0);
        banquet.price = Decimal::MAX;

        assert_eq!(cart.add(&banquet), Ok(1));
        assert_eq!(cart.add(&banquet), Err(DomainError::TotalOverflow(ProductId(1))));
        assert_eq!(cart.add(&product(2, 1)), Err(DomainError::TotalOverflow(ProductId(2))));

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total(), Decimal::MAX);
    }

    #[test]
    fn change_quantity_refuses_overflow_and_keeps_previous_quantity() {
        let mut cart = Cart::new();
        let mut banquet = product(1, 0);
        banquet.price = Decimal::MAX / Decimal::from(4);
        cart.add(&banquet).expect("add");

        assert_eq!(cart.change_quantity(ProductId(1), 2), Ok(QuantityChange::Updated(3)));
        assert_eq!(
            cart.change_quantity(ProductId(1), 5),
            Err(DomainError::TotalOverflow(ProductId(1)))
        );
        assert_eq!(cart.line(ProductId(1)).map(|line| line.quantity), Some(3));
        assert_eq!(cart.change_quantity(ProductId(1), -3), Ok(QuantityChange::Removed));
    }
}
