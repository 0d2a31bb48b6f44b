use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use delish_core::config::{AppConfig, LoadOptions};
use delish_core::errors::ApplicationError;
use serde::Serialize;
use toml::Value;

use crate::commands::CommandResult;

#[derive(Debug, Serialize)]
struct ConfigField {
    key: &'static str,
    value: String,
    source: String,
}

pub fn run(options: &LoadOptions) -> CommandResult {
    let config = match AppConfig::load(options.clone()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::from_error(
                "config",
                &ApplicationError::Configuration(error.to_string()),
            )
        }
    };

    let config_file_path = detect_config_path(options.config_path.as_deref());
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let overrides = &options.overrides;
    let field = |key: &'static str, value: String, env_keys: &[&str], overridden: bool| {
        let source = if overridden {
            "flag".to_string()
        } else {
            field_source(key, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
        };
        ConfigField { key, value, source }
    };

    let catalog_path = config
        .catalog
        .path
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "<built-in house menu>".to_string());

    let fields = vec![
        field(
            "storage.backend",
            format!("{:?}", config.storage.backend),
            &["DELISH_STORAGE_BACKEND"],
            overrides.storage_backend.is_some(),
        ),
        field(
            "storage.path",
            config.storage.path.display().to_string(),
            &["DELISH_STORAGE_PATH"],
            overrides.storage_path.is_some(),
        ),
        field("storage.cart_key", config.storage.cart_key.clone(), &["DELISH_CART_KEY"], false),
        field("storage.theme_key", config.storage.theme_key.clone(), &["DELISH_THEME_KEY"], false),
        field(
            "catalog.path",
            catalog_path,
            &["DELISH_CATALOG_PATH"],
            overrides.catalog_path.is_some(),
        ),
        field(
            "logging.level",
            config.logging.level.clone(),
            &["DELISH_LOGGING_LEVEL", "DELISH_LOG_LEVEL"],
            overrides.log_level.is_some(),
        ),
        field(
            "logging.format",
            format!("{:?}", config.logging.format),
            &["DELISH_LOGGING_FORMAT", "DELISH_LOG_FORMAT"],
            false,
        ),
    ];

    CommandResult::success(
        "config",
        "effective config (source precedence: flag > env > file > default)",
        fields,
    )
}

fn detect_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return path.exists().then(|| path.to_path_buf());
    }

    let root = PathBuf::from("delish.toml");
    if root.exists() {
        return Some(root);
    }

    let nested = PathBuf::from("config/delish.toml");
    if nested.exists() {
        return Some(nested);
    }

    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

#[cfg(test)]
mod tests {
    use toml::Value;

    use super::contains_path;

    #[test]
    fn contains_path_walks_nested_tables() {
        let doc: Value = "[storage]\ncart_key = \"cart\"\n".parse().expect("toml");

        assert!(contains_path(&doc, "storage.cart_key"));
        assert!(!contains_path(&doc, "storage.theme_key"));
        assert!(!contains_path(&doc, "logging.level"));
    }
}
