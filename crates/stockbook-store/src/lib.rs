//! Persistence layer for stockbook
//!
//! Provides:
//! - Product and sale records
//! - The `Tables` trait: whole-table load and save for both tables
//! - CSV file backend (header-only files created on first use)
//! - In-memory backend for tests
//!
//! Tables are always read and written in full. There is no locking: a
//! single writer process is assumed.

mod csv_tables;
mod memory;
mod records;
mod traits;

pub use csv_tables::*;
pub use memory::*;
pub use records::*;
pub use traits::*;

use thiserror::Error;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("{table} table has columns {found:?}, expected {expected:?}")]
    SchemaMismatch {
        table: &'static str,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("Malformed {table} row {line}: {message}")]
    MalformedRow {
        table: &'static str,
        line: u64,
        message: String,
    },

    #[error("Value too large to store: {0}")]
    ValueOverflow(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl From<csv::Error> for StoreError {
    fn from(e: csv::Error) -> Self {
        StoreError::Csv(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
