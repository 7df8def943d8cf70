//! Store trait definitions

use crate::{Product, Sale, StoreResult};

/// Whole-table access to the products and sales tables.
///
/// Every call reads or rewrites a table in full. Implementations keep no
/// state the caller relies on between calls.
pub trait Tables: Send + Sync {
    /// Read every product, in stored order
    fn load_products(&self) -> StoreResult<Vec<Product>>;

    /// Replace the products table
    fn save_products(&self, products: &[Product]) -> StoreResult<()>;

    /// Read every sale, in stored order
    fn load_sales(&self) -> StoreResult<Vec<Sale>>;

    /// Replace the sales table
    fn save_sales(&self, sales: &[Sale]) -> StoreResult<()>;
}
