//! Raw configuration schema (as parsed from TOML)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawConfig {
    /// Config schema version
    pub config_version: u32,

    /// Where the tables live
    #[serde(default)]
    pub storage: RawStorageConfig,

    /// Ledger behavior
    #[serde(default)]
    pub ledger: RawLedgerConfig,
}

/// Storage settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawStorageConfig {
    /// Directory holding both table files
    pub data_dir: Option<PathBuf>,

    /// Products table file name (default: products.csv)
    pub products_file: Option<String>,

    /// Sales table file name (default: sales.csv)
    pub sales_file: Option<String>,
}

/// Ledger settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawLedgerConfig {
    /// List the known product ids when a lookup fails
    pub verbose_errors: Option<bool>,

    /// Symbol printed in front of money amounts
    pub currency_symbol: Option<String>,
}
