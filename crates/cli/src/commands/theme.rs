use delish_core::config::LoadOptions;
use delish_core::domain::theme::Theme;
use delish_core::errors::ApplicationError;
use serde::Serialize;

use crate::commands::{CommandResult, Context};

#[derive(Debug, Serialize)]
struct ThemeState {
    theme: Theme,
}

pub fn show(options: &LoadOptions) -> CommandResult {
    let context = match Context::load(options) {
        Ok(context) => context,
        Err(error) => return CommandResult::from_error("theme.show", &error),
    };

    let theme = context.theme_store().load();
    CommandResult::success("theme.show", format!("theme is {theme}"), ThemeState { theme })
}

pub fn toggle(options: &LoadOptions) -> CommandResult {
    let context = match Context::load(options) {
        Ok(context) => context,
        Err(error) => return CommandResult::from_error("theme.toggle", &error),
    };

    match context.theme_store().toggle() {
        Ok(theme) => CommandResult::success(
            "theme.toggle",
            format!("theme switched to {theme}"),
            ThemeState { theme },
        ),
        Err(error) => CommandResult::from_error(
            "theme.toggle",
            &ApplicationError::Persistence(error.to_string()),
        ),
    }
}
