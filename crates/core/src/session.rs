use serde::Serialize;

use crate::catalog::Catalog;
use crate::domain::product::{CategoryFilter, ProductId};
use crate::errors::DomainError;
use crate::view::{self, MenuCard, ProductDetail};

/// Headless state of the ordering page: which chips are active and which
/// overlays are open. Cart contents live in the cart store, not here.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PageSession {
    pub category: CategoryFilter,
    pub veg_only: bool,
    pub cart_open: bool,
    pub nav_open: bool,
    pub detail: Option<ProductId>,
}

impl PageSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_category(&mut self, category: CategoryFilter) {
        self.category = category;
    }

    pub fn set_veg_only(&mut self, veg_only: bool) {
        self.veg_only = veg_only;
    }

    pub fn visible_menu(&self, catalog: &Catalog) -> Vec<MenuCard> {
        view::menu_cards(catalog, self.category, self.veg_only)
    }

    /// Opens the detail modal. Unknown ids leave the modal as it was.
    pub fn open_details(
        &mut self,
        catalog: &Catalog,
        product_id: ProductId,
    ) -> Result<ProductDetail, DomainError> {
        let product = catalog.get(product_id)?;
        self.detail = Some(product_id);
        Ok(view::product_detail(product))
    }

    pub fn close_details(&mut self) {
        self.detail = None;
    }

    pub fn open_cart(&mut self) {
        self.cart_open = true;
    }

    pub fn close_cart(&mut self) {
        self.cart_open = false;
    }

    pub fn toggle_nav(&mut self) -> bool {
        self.nav_open = !self.nav_open;
        self.nav_open
    }
}

#[cfg(test)]
mod tests {
    use crate::catalog::Catalog;
    use crate::domain::product::{Category, CategoryFilter, ProductId};
    use crate::errors::DomainError;

    use super::PageSession;

    #[test]
    fn defaults_show_full_menu_with_overlays_closed() {
        let session = PageSession::new();

        assert_eq!(session.category, CategoryFilter::All);
        assert!(!session.veg_only && !session.cart_open && !session.nav_open);
        assert_eq!(session.visible_menu(&Catalog::house_menu()).len(), 9);
    }

    #[test]
    fn veg_toggle_keeps_active_category() {
        let catalog = Catalog::house_menu();
        let mut session = PageSession::new();
        session.select_category(CategoryFilter::Only(Category::Dessert));
        session.set_veg_only(true);

        let names: Vec<_> =
            session.visible_menu(&catalog).into_iter().map(|card| card.name).collect();
        assert_eq!(names, vec!["Chocolate Lava Cake", "Tiramisu"]);
    }

    #[test]
    fn open_details_rejects_unknown_product() {
        let catalog = Catalog::house_menu();
        let mut session = PageSession::new();

        let error = session.open_details(&catalog, ProductId(999)).expect_err("unknown id");
        assert_eq!(error, DomainError::ProductNotFound(ProductId(999)));
        assert_eq!(session.detail, None);

        session.open_details(&catalog, ProductId(3)).expect("known id");
        assert_eq!(session.detail, Some(ProductId(3)));
        session.close_details();
        assert_eq!(session.detail, None);
    }

    #[test]
    fn nav_and_cart_toggles() {
        let mut session = PageSession::new();

        assert!(session.toggle_nav());
        assert!(!session.toggle_nav());
        session.open_cart();
        assert!(session.cart_open);
        session.close_cart();
        assert!(!session.cart_open);
    }

    #[test]
    fn serializes_filter_as_chip_tag() {
        let mut session = PageSession::new();
        session.select_category(CategoryFilter::Only(Category::Drinks));

        let value = serde_json::to_value(&session).expect("serialize session");
        assert_eq!(value["category"], "drinks");
    }
}
