//! stockbook - inventory and sales bookkeeping
//!
//! Wires together:
//! - Configuration loading
//! - Logging
//! - Table storage (CSV files in the data directory)
//! - The ledger store
//! - Command dispatch

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::process::ExitCode;
use stockbook_config::load_config_or_default;
use stockbook_core::LedgerStore;
use stockbook_store::CsvTables;
use stockbook_util::default_config_path;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::commands::Credentials;

/// stockbook - register products, record sales, report the day's takings
#[derive(Parser, Debug)]
#[command(name = "stockbook")]
#[command(about = "Inventory and sales bookkeeping", long_about = None)]
struct Args {
    /// Configuration file path (default: ~/.config/stockbook/config.toml)
    #[arg(short, long, env = "STOCKBOOK_CONFIG", default_value_os_t = default_config_path())]
    config: PathBuf,

    /// Data directory override (or set STOCKBOOK_DATA_DIR env var)
    #[arg(short, long, env = "STOCKBOOK_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    /// List known product ids when a lookup fails
    #[arg(short, long)]
    verbose: bool,

    /// Username for commands that change the tables
    #[arg(short, long, env = "STOCKBOOK_USER")]
    user: Option<String>,

    /// Password for commands that change the tables
    #[arg(short, long, env = "STOCKBOOK_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Register a new product
    Register {
        id: String,
        name: String,
        quantity: u32,
        unit_value: Decimal,
    },

    /// Sell units of a product
    Sell { id: String, quantity: u32 },

    /// Show the quantity on hand for every product
    Stock,

    /// Summarize today's sales
    Report {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print every product with its unit value
    Products,

    /// Check a username and password
    Login { username: String, password: String },
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    debug!(version = env!("CARGO_PKG_VERSION"), "stockbook starting");
    if stockbook_util::is_mock_time_active() {
        info!(now = %stockbook_util::now(), "Using mock time");
    }

    let mut settings = load_config_or_default(&args.config)
        .with_context(|| format!("Failed to load config from {:?}", args.config))?;

    if let Some(dir) = &args.data_dir {
        settings.storage.data_dir = dir.clone();
    }
    if args.verbose {
        settings.ledger.verbose_errors = true;
    }

    let storage = &settings.storage;
    let tables = CsvTables::open(&storage.data_dir, &storage.products_file, &storage.sales_file)
        .with_context(|| format!("Failed to open tables in {:?}", storage.data_dir))?;

    info!(
        products = %tables.products_path().display(),
        sales = %tables.sales_path().display(),
        "Tables opened"
    );

    let ledger = LedgerStore::new(tables, settings.ledger);
    let credentials = Credentials {
        username: args.user,
        password: args.password,
    };

    let mut stdout = std::io::stdout().lock();
    let mut stderr = std::io::stderr().lock();
    let succeeded =
        commands::execute(&ledger, &args.command, &credentials, &mut stdout, &mut stderr)?;

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
