pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::anyhow;
use clap::{Parser, Subcommand};
use delish_core::config::{AppConfig, ConfigOverrides, LoadOptions, LogFormat, StorageBackend};

#[derive(Debug, Parser)]
#[command(
    name = "delish",
    about = "Delish menu and cart CLI",
    long_about = "Browse the menu, manage the persisted cart, and switch the theme preference.",
    after_help = "Examples:\n  delish menu --category mains --veg\n  delish cart add 1\n  delish cart qty 1 -1\n  delish theme toggle"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to a delish.toml config file; it must exist")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Storage backend override (file|memory)")]
    storage_backend: Option<StorageBackend>,
    #[arg(long, global = true, help = "Storage document path override")]
    storage_path: Option<PathBuf>,
    #[arg(long, global = true, help = "Catalog TOML file used instead of the house menu")]
    catalog: Option<PathBuf>,
    #[arg(long, global = true, help = "Log level override (trace|debug|info|warn|error)")]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "List menu items, optionally filtered by category and vegetarian flag")]
    Menu {
        #[arg(long, default_value = "all", help = "all|starters|mains|dessert|drinks")]
        category: String,
        #[arg(long, help = "Only show vegetarian dishes")]
        veg: bool,
    },
    #[command(about = "Show the detail card for one menu item")]
    Details { id: u32 },
    #[command(about = "Inspect or change the persisted cart")]
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    #[command(about = "Inspect or toggle the theme preference")]
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

#[derive(Debug, Subcommand)]
enum CartAction {
    #[command(about = "Show cart lines, item count and total")]
    Show,
    #[command(about = "Add one unit of a menu item")]
    Add { id: u32 },
    #[command(about = "Change a line's quantity by a signed delta; zero or below removes it")]
    Qty {
        id: u32,
        #[arg(allow_negative_numbers = true)]
        delta: i64,
    },
    #[command(about = "Remove a line regardless of quantity")]
    Remove { id: u32 },
    #[command(about = "Remove every line")]
    Clear,
}

#[derive(Debug, Subcommand)]
enum ThemeAction {
    Show,
    Toggle,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let options = load_options(&cli);

    if let Err(error) = init_logging(&options) {
        eprintln!("logging disabled: {error}");
    }

    let result = match cli.command {
        Command::Menu { category, veg } => commands::menu::list(&options, &category, veg),
        Command::Details { id } => commands::menu::details(&options, id),
        Command::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&options),
            CartAction::Add { id } => commands::cart::add(&options, id),
            CartAction::Qty { id, delta } => commands::cart::change_quantity(&options, id, delta),
            CartAction::Remove { id } => commands::cart::remove(&options, id),
            CartAction::Clear => commands::cart::clear(&options),
        },
        Command::Theme { action } => match action {
            ThemeAction::Show => commands::theme::show(&options),
            ThemeAction::Toggle => commands::theme::toggle(&options),
        },
        Command::Config => commands::config::run(&options),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

fn load_options(cli: &Cli) -> LoadOptions {
    LoadOptions {
        config_path: cli.config.clone(),
        require_file: cli.config.is_some(),
        overrides: ConfigOverrides {
            storage_backend: cli.storage_backend,
            storage_path: cli.storage_path.clone(),
            catalog_path: cli.catalog.clone(),
            log_level: cli.log_level.clone(),
        },
    }
}

fn init_logging(options: &LoadOptions) -> anyhow::Result<()> {
    use tracing::Level;

    // Commands report config failures themselves; logging falls back to defaults.
    let config = AppConfig::load(options.clone()).unwrap_or_default();
    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(log_level);

    match config.logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
    .map_err(|error| anyhow!("failed to install tracing subscriber: {error}"))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser;
    use delish_core::config::StorageBackend;

    use super::{load_options, Cli};

    #[test]
    fn global_flags_fill_config_overrides() {
        let cli = Cli::try_parse_from([
            "delish",
            "cart",
            "show",
            "--storage-backend",
            "memory",
            "--catalog",
            "menu.toml",
            "--log-level",
            "debug",
        ])
        .expect("parse args");

        let options = load_options(&cli);
        assert_eq!(options.overrides.storage_backend, Some(StorageBackend::Memory));
        assert_eq!(options.overrides.catalog_path, Some(PathBuf::from("menu.toml")));
        assert_eq!(options.overrides.log_level.as_deref(), Some("debug"));
        assert!(!options.require_file);
    }

    #[test]
    fn explicit_config_path_is_required() {
        let cli = Cli::try_parse_from(["delish", "--config", "custom.toml", "config"])
            .expect("parse args");

        let options = load_options(&cli);
        assert_eq!(options.config_path, Some(PathBuf::from("custom.toml")));
        assert!(options.require_file);
    }

    #[test]
    fn unknown_storage_backend_is_rejected_by_parser() {
        assert!(Cli::try_parse_from(["delish", "--storage-backend", "redis", "cart", "show"])
            .is_err());
    }
}
