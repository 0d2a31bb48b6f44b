pub mod cart;
pub mod config;
pub mod menu;
pub mod theme;

use std::rc::Rc;

use delish_core::catalog::Catalog;
use delish_core::config::{AppConfig, LoadOptions};
use delish_core::errors::ApplicationError;
use delish_store::{open_store, CartStore, KeyValueStore, ThemeStore};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>, data: impl Serialize) -> Self {
        let data = match serde_json::to_value(data) {
            Ok(data) => data,
            Err(error) => return Self::failure(command, "serialization", error.to_string(), 1),
        };
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            hint: None,
            data: Some(data),
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        Self::failure_with_hint(command, error_class, message, None, exit_code)
    }

    /// Maps an application error to its exit code: 2 config, 3 domain, 4 persistence.
    pub fn from_error(command: &str, error: &ApplicationError) -> Self {
        let exit_code = match error {
            ApplicationError::Configuration(_) => 2,
            ApplicationError::Domain(_) => 3,
            ApplicationError::Persistence(_) => 4,
        };
        Self::failure_with_hint(
            command,
            error.error_class(),
            error.to_string(),
            Some(error.user_message()),
            exit_code,
        )
    }

    fn failure_with_hint(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        hint: Option<&str>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            hint: hint.map(str::to_string),
            data: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

/// Loaded configuration, catalog and storage shared by every command.
pub struct Context {
    pub config: AppConfig,
    pub catalog: Rc<Catalog>,
    pub store: Rc<dyn KeyValueStore>,
}

impl Context {
    pub fn load(options: &LoadOptions) -> Result<Self, ApplicationError> {
        let config = AppConfig::load(options.clone())
            .map_err(|error| ApplicationError::Configuration(error.to_string()))?;

        let catalog = match &config.catalog.path {
            Some(path) => Catalog::from_toml_file(path)
                .map_err(|error| ApplicationError::Configuration(error.to_string()))?,
            None => Catalog::house_menu(),
        };

        let store = open_store(&config.storage);
        Ok(Self { config, catalog: Rc::new(catalog), store })
    }

    pub fn cart_store(&self) -> CartStore<Rc<dyn KeyValueStore>> {
        CartStore::load(
            Rc::clone(&self.store),
            Rc::clone(&self.catalog),
            self.config.storage.cart_key.clone(),
        )
    }

    pub fn theme_store(&self) -> ThemeStore<Rc<dyn KeyValueStore>> {
        ThemeStore::new(Rc::clone(&self.store), self.config.storage.theme_key.clone())
    }
}
