//! Validated settings

use crate::schema::{RawConfig, RawLedgerConfig, RawStorageConfig};
use crate::{DEFAULT_CURRENCY_SYMBOL, DEFAULT_PRODUCTS_FILE, DEFAULT_SALES_FILE};
use std::path::PathBuf;

/// Validated settings ready for use by the ledger and the CLI
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub storage: StorageSettings,
    pub ledger: LedgerSettings,
}

impl Settings {
    /// Convert from raw config (after validation)
    pub fn from_raw(raw: RawConfig) -> Self {
        Self {
            storage: StorageSettings::from_raw(raw.storage),
            ledger: LedgerSettings::from_raw(raw.ledger),
        }
    }
}

/// Table file locations
#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub data_dir: PathBuf,
    pub products_file: String,
    pub sales_file: String,
}

impl StorageSettings {
    fn from_raw(raw: RawStorageConfig) -> Self {
        Self {
            data_dir: raw
                .data_dir
                .unwrap_or_else(stockbook_util::default_data_dir),
            products_file: raw
                .products_file
                .unwrap_or_else(|| DEFAULT_PRODUCTS_FILE.to_string()),
            sales_file: raw
                .sales_file
                .unwrap_or_else(|| DEFAULT_SALES_FILE.to_string()),
        }
    }

    pub fn products_path(&self) -> PathBuf {
        self.data_dir.join(&self.products_file)
    }

    pub fn sales_path(&self) -> PathBuf {
        self.data_dir.join(&self.sales_file)
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self::from_raw(RawStorageConfig::default())
    }
}

/// Ledger behavior
#[derive(Debug, Clone)]
pub struct LedgerSettings {
    /// Include the known product ids in "not found" errors
    pub verbose_errors: bool,
    pub currency_symbol: String,
}

impl LedgerSettings {
    fn from_raw(raw: RawLedgerConfig) -> Self {
        Self {
            verbose_errors: raw.verbose_errors.unwrap_or(false),
            currency_symbol: raw
                .currency_symbol
                .map(|s| s.trim().to_string())
                .unwrap_or_else(|| DEFAULT_CURRENCY_SYMBOL.to_string()),
        }
    }
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self::from_raw(RawLedgerConfig::default())
    }
}
