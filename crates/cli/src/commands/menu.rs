use delish_core::config::LoadOptions;
use delish_core::domain::product::{CategoryFilter, ProductId};
use delish_core::errors::ApplicationError;
use delish_core::session::PageSession;
use delish_core::view::MenuCard;
use serde::Serialize;

use crate::commands::{CommandResult, Context};

#[derive(Debug, Serialize)]
struct MenuListing {
    category: CategoryFilter,
    veg_only: bool,
    items: Vec<MenuCard>,
}

pub fn list(options: &LoadOptions, category: &str, veg_only: bool) -> CommandResult {
    let context = match Context::load(options) {
        Ok(context) => context,
        Err(error) => return CommandResult::from_error("menu", &error),
    };

    let category = match category.parse::<CategoryFilter>() {
        Ok(category) => category,
        Err(error) => return CommandResult::from_error("menu", &ApplicationError::from(error)),
    };

    let mut session = PageSession::new();
    session.select_category(category);
    session.set_veg_only(veg_only);

    let items = session.visible_menu(&context.catalog);
    let message = format!("{} item(s) in `{category}`", items.len());
    CommandResult::success("menu", message, MenuListing { category, veg_only, items })
}

pub fn details(options: &LoadOptions, product_id: u32) -> CommandResult {
    let context = match Context::load(options) {
        Ok(context) => context,
        Err(error) => return CommandResult::from_error("details", &error),
    };

    let mut session = PageSession::new();
    match session.open_details(&context.catalog, ProductId(product_id)) {
        Ok(detail) => {
            let message = format!("{} {}", detail.emoji, detail.name);
            CommandResult::success("details", message, detail)
        }
        Err(error) => CommandResult::from_error("details", &ApplicationError::from(error)),
    }
}
