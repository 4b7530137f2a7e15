mod catalog;
mod deals;

use anyhow::Context;
use clap::{Parser, Subcommand};
use hybridhunt_core::{AppConfig, Catalog};
use tracing_subscriber::EnvFilter;

use catalog::CatalogCommands;
use deals::DealsCommands;

#[derive(Debug, Parser)]
#[command(name = "hybridhunt-cli")]
#[command(about = "HybridHunt deal search command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search, share, and export deals
    Deals {
        #[command(subcommand)]
        command: DealsCommands,
    },
    /// Catalog maintenance
    Catalog {
        #[command(subcommand)]
        command: CatalogCommands,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = hybridhunt_core::load_app_config()?;

    // Logs go to stderr so `--json` output stays machine-readable.
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Deals { command }) => {
            let catalog = load(&config, None)?;
            deals::run(&catalog, &config, command)?;
        }
        Some(Commands::Catalog { command }) => match command {
            CatalogCommands::Validate { path } => {
                let path = path.unwrap_or_else(|| config.catalog_path.clone());
                let catalog = load(&config, Some(path.as_path()))?;
                catalog::run_validate(&catalog, &path);
            }
        },
        None => println!("hybridhunt-cli ready; run with --help for commands"),
    }

    Ok(())
}

/// Loads the catalog at `path`, or the configured catalog path.
fn load(config: &AppConfig, path: Option<&std::path::Path>) -> anyhow::Result<Catalog> {
    let path = path.unwrap_or(config.catalog_path.as_path());
    hybridhunt_core::load_catalog(path)
        .with_context(|| format!("failed to load catalog from {}", path.display()))
}
