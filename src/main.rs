//! Salesboard main entry point

use anyhow::Context;
use clap::Parser;
use salesboard_api::start_server;
use salesboard_config::Config;
use salesboard_core::{SalesQueryService, SqliteStore};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "salesboard")]
#[command(version = "0.1.0")]
#[command(about = "Sales reporting dashboard over a billing database", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Print the default configuration and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let config = if args.config.exists() {
        match Config::load(args.config.clone()) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{}", e.to_details());
                anyhow::bail!("Failed to load configuration from {}", args.config.display());
            }
        }
    } else {
        Config::default()
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.logging.level))
        .init();

    if !args.config.exists() {
        log::warn!("Config file {} not found, using defaults", args.config.display());
    }
    log::info!("Config loaded: database={}", config.data.database.display());

    let store = SqliteStore::open(&config.data.database)
        .with_context(|| format!("Failed to open database {}", config.data.database.display()))?;
    let service = SalesQueryService::new(Arc::new(store))
        .with_page_size(config.pagination.records_per_page);

    let rt = Runtime::new()?;
    rt.block_on(start_server(config, service))?;

    Ok(())
}
