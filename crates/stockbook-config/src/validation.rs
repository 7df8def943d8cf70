//! Configuration validation

use crate::schema::RawConfig;
use thiserror::Error;

/// Validation error
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("Invalid {key} '{value}': {message}")]
    InvalidFileName {
        key: &'static str,
        value: String,
        message: String,
    },

    #[error("products_file and sales_file must differ (both are '{0}')")]
    SharedTableFile(String),

    #[error("currency_symbol cannot be empty")]
    EmptyCurrencySymbol,
}

/// Validate a raw configuration
pub fn validate_config(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let products = config.storage.products_file.as_deref();
    let sales = config.storage.sales_file.as_deref();

    if let Some(name) = products
        && let Err(message) = check_file_name(name)
    {
        errors.push(ValidationError::InvalidFileName {
            key: "products_file",
            value: name.to_string(),
            message,
        });
    }

    if let Some(name) = sales
        && let Err(message) = check_file_name(name)
    {
        errors.push(ValidationError::InvalidFileName {
            key: "sales_file",
            value: name.to_string(),
            message,
        });
    }

    let products = products.unwrap_or(crate::DEFAULT_PRODUCTS_FILE);
    let sales = sales.unwrap_or(crate::DEFAULT_SALES_FILE);
    if products == sales {
        errors.push(ValidationError::SharedTableFile(products.to_string()));
    }

    if let Some(symbol) = &config.ledger.currency_symbol
        && symbol.trim().is_empty()
    {
        errors.push(ValidationError::EmptyCurrencySymbol);
    }

    errors
}

/// Table files are plain names inside the data directory
pub fn check_file_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("file name cannot be empty".into());
    }
    if name.contains('/') || name.contains('\\') {
        return Err("must be a file name, not a path".into());
    }
    if name == "." || name == ".." {
        return Err("must name a file".into());
    }
    Ok(())
}
