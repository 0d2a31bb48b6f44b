use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::product::{Category, CategoryFilter, Product, ProductId};
use crate::errors::DomainError;

#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("could not read catalog file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse catalog file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error(transparent)]
    Invalid(#[from] DomainError),
}

/// Read-only product list in declaration order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Result<Self, DomainError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if product.id.0 == 0 {
                return Err(DomainError::InvariantViolation(format!(
                    "product `{}` must have a positive id",
                    product.name
                )));
            }
            if !seen.insert(product.id) {
                return Err(DomainError::DuplicateProductId(product.id));
            }
            if product.price.is_sign_negative() {
                return Err(DomainError::InvariantViolation(format!(
                    "product {} has a negative price",
                    product.id
                )));
            }
        }

        Ok(Self { products })
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, CatalogLoadError> {
        let document = toml::from_str::<CatalogDocument>(raw).map_err(|source| {
            CatalogLoadError::ParseFile { path: PathBuf::from("<inline>"), source }
        })?;
        Ok(Self::new(document.products)?)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, CatalogLoadError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| CatalogLoadError::ReadFile { path: path.to_path_buf(), source })?;
        let document = toml::from_str::<CatalogDocument>(&raw)
            .map_err(|source| CatalogLoadError::ParseFile { path: path.to_path_buf(), source })?;
        Ok(Self::new(document.products)?)
    }

    /// The nine-dish menu served when no catalog file is configured.
    pub fn house_menu() -> Self {
        let dish = |id: u32,
                    name: &str,
                    category: Category,
                    price: i64,
                    is_vegetarian: bool,
                    description: &str,
                    emoji: &str| Product {
            id: ProductId(id),
            name: name.to_string(),
            description: description.to_string(),
            category,
            emoji: emoji.to_string(),
            price: Decimal::new(price, 0),
            is_vegetarian,
        };

        Self {
            products: vec![
                dish(
                    1,
                    "Margherita Pizza",
                    Category::Mains,
                    12,
                    true,
                    "Classic pizza with tomato, mozzarella & basil",
                    "🍕",
                ),
                dish(
                    2,
                    "Garlic Bread",
                    Category::Starters,
                    6,
                    true,
                    "Toasted bread with garlic butter",
                    "🥖",
                ),
                dish(
                    3,
                    "Butter Chicken",
                    Category::Mains,
                    14,
                    false,
                    "Creamy spiced tomato gravy with tender chicken",
                    "🍛",
                ),
                dish(
                    4,
                    "Caesar Salad",
                    Category::Starters,
                    8,
                    false,
                    "Romaine, parmesan, croutons & Caesar dressing",
                    "🥗",
                ),
                dish(
                    5,
                    "Chocolate Lava Cake",
                    Category::Dessert,
                    7,
                    true,
                    "Warm molten cake with vanilla ice cream",
                    "🍰",
                ),
                dish(6, "Cold Brew", Category::Drinks, 4, true, "Slow-brewed coffee, chilled", "🥤"),
                dish(
                    7,
                    "Paneer Tikka",
                    Category::Starters,
                    9,
                    true,
                    "Smoky grilled paneer with spices",
                    "🧀",
                ),
                dish(
                    8,
                    "Pepperoni Pizza",
                    Category::Mains,
                    13,
                    false,
                    "Pepperoni, cheese & tomato",
                    "🍕",
                ),
                dish(
                    9,
                    "Tiramisu",
                    Category::Dessert,
                    8,
                    true,
                    "Coffee-soaked ladyfingers & mascarpone",
                    "☕",
                ),
            ],
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn find(&self, product_id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == product_id)
    }

    pub fn get(&self, product_id: ProductId) -> Result<&Product, DomainError> {
        self.find(product_id).ok_or(DomainError::ProductNotFound(product_id))
    }

    pub fn filter(&self, category: CategoryFilter, veg_only: bool) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|product| category.matches(product.category))
            .filter(|product| !veg_only || product.is_vegetarian)
            .collect()
    }
}
