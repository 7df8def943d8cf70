//! In-memory tables for testing

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::{Product, Sale, StoreError, StoreResult, Tables};

/// Tables held in memory, with switches to simulate storage failures
#[derive(Debug, Default)]
pub struct MemoryTables {
    products: Mutex<Vec<Product>>,
    sales: Mutex<Vec<Sale>>,

    /// Configure every load to fail
    pub fail_reads: AtomicBool,

    /// Configure every save to fail
    pub fail_writes: AtomicBool,

    /// Configure only sales saves to fail
    pub fail_sales_writes: AtomicBool,

    writes: AtomicUsize,
}

impl MemoryTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing rows
    pub fn with_rows(products: Vec<Product>, sales: Vec<Sale>) -> Self {
        Self {
            products: Mutex::new(products),
            sales: Mutex::new(sales),
            ..Self::default()
        }
    }

    /// Number of successful saves so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check(&self, flag: &AtomicBool, what: &str) -> StoreResult<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(format!("simulated {} failure", what)));
        }
        Ok(())
    }

    fn lock<'a, T>(mutex: &'a Mutex<Vec<T>>) -> StoreResult<MutexGuard<'a, Vec<T>>> {
        mutex
            .lock()
            .map_err(|_| StoreError::Unavailable("memory tables lock poisoned".into()))
    }
}

impl Tables for MemoryTables {
    fn load_products(&self) -> StoreResult<Vec<Product>> {
        self.check(&self.fail_reads, "read")?;
        Ok(Self::lock(&self.products)?.clone())
    }

    fn save_products(&self, products: &[Product]) -> StoreResult<()> {
        self.check(&self.fail_writes, "write")?;
        *Self::lock(&self.products)? = products.to_vec();
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn load_sales(&self) -> StoreResult<Vec<Sale>> {
        self.check(&self.fail_reads, "read")?;
        Ok(Self::lock(&self.sales)?.clone())
    }

    fn save_sales(&self, sales: &[Sale]) -> StoreResult<()> {
        self.check(&self.fail_writes, "write")?;
        self.check(&self.fail_sales_writes, "sales write")?;
        *Self::lock(&self.sales)? = sales.to_vec();
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
