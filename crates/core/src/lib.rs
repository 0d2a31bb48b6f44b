pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod session;
pub mod view;

pub use catalog::{Catalog, CatalogLoadError};
pub use domain::cart::{Cart, CartLine, CartState, QuantityChange};
pub use domain::product::{Category, CategoryFilter, Product, ProductId};
pub use domain::theme::Theme;
pub use errors::{ApplicationError, DomainError};
pub use session::PageSession;
pub use view::{CartLineView, CartView, MenuCard, ProductDetail};
