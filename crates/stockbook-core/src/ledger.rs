//! The ledger store

use stockbook_config::LedgerSettings;
use stockbook_store::{Product, Sale, StoreError, Tables};
use stockbook_util::{Money, ProductId, line_total};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::{BestEffort, DailySalesReport, SaleReceipt, StockLine, report::render_products};

/// Ledger errors
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Product ID already exists: {0}")]
    DuplicateId(ProductId),

    #[error("No products registered")]
    NoProducts,

    #[error("{}", not_found_message(.id, .available))]
    NotFound {
        id: ProductId,
        /// Known ids, present only when verbose errors are enabled
        available: Option<Vec<ProductId>>,
    },

    #[error("Insufficient stock for product {id}: {available} available, {requested} requested")]
    InsufficientStock {
        id: ProductId,
        available: u32,
        requested: u32,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

fn not_found_message(id: &ProductId, available: &Option<Vec<ProductId>>) -> String {
    match available {
        Some(ids) => {
            let ids: Vec<&str> = ids.iter().map(ProductId::as_str).collect();
            format!("Product not found: {}. Available IDs: {}", id, ids.join(", "))
        }
        None => format!("Product not found: {}", id),
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Products and sales bookkeeping over a pair of tables.
///
/// Every operation reloads the tables it needs and, when it changes
/// anything, rewrites them in full before returning. Nothing is cached
/// between calls.
///
/// There is no locking and no lost-update detection: the tables must have
/// a single writer. Two processes interleaving a sale will silently lose
/// one of the stock decrements.
pub struct LedgerStore<T: Tables> {
    tables: T,
    settings: LedgerSettings,
}

impl<T: Tables> LedgerStore<T> {
    pub fn new(tables: T, settings: LedgerSettings) -> Self {
        Self { tables, settings }
    }

    pub fn tables(&self) -> &T {
        &self.tables
    }

    pub fn settings(&self) -> &LedgerSettings {
        &self.settings
    }

    /// Register a new product.
    ///
    /// Fails with [`LedgerError::DuplicateId`] if the normalized id is taken.
    /// Nothing is written unless the product is accepted.
    pub fn register_product(
        &self,
        id: impl Into<ProductId>,
        name: &str,
        quantity: u32,
        unit_value: Money,
    ) -> LedgerResult<Product> {
        let id = id.into();
        let name = name.trim();

        if id.is_empty() {
            return Err(LedgerError::InvalidInput("product id cannot be empty".into()));
        }
        if name.is_empty() {
            return Err(LedgerError::InvalidInput("product name cannot be empty".into()));
        }
        if unit_value.is_sign_negative() && !unit_value.is_zero() {
            return Err(LedgerError::InvalidInput(format!(
                "unit value cannot be negative: {}",
                unit_value
            )));
        }
        if line_total(quantity, unit_value).is_none() {
            return Err(LedgerError::InvalidInput(format!(
                "stock value of {} x {} is too large",
                quantity, unit_value
            )));
        }

        let mut products = self.tables.load_products()?;
        if products.iter().any(|p| p.id == id) {
            warn!(product_id = %id, "Rejected duplicate product id");
            return Err(LedgerError::DuplicateId(id));
        }

        let product = Product::new(id, name, quantity, unit_value);
        products.push(product.clone());
        self.tables.save_products(&products)?;

        info!(
            product_id = %product.id,
            quantity,
            unit_value = %unit_value,
            "Product registered"
        );
        Ok(product)
    }

    /// Sell `quantity` units of a product.
    ///
    /// Decrements the stock and appends a sale stamped with the current
    /// local date and time; both tables are rewritten. A failed
    /// precondition writes nothing, and if the sales table cannot be
    /// written the products table is restored to what was loaded.
    pub fn sell(&self, product_id: impl Into<ProductId>, quantity: u32) -> LedgerResult<SaleReceipt> {
        let id = product_id.into();

        if quantity == 0 {
            return Err(LedgerError::InvalidInput(
                "quantity sold must be at least 1".into(),
            ));
        }

        let mut products = self.tables.load_products()?;
        if products.is_empty() {
            return Err(LedgerError::NoProducts);
        }

        let Some(index) = products.iter().position(|p| p.id == id) else {
            let known: Vec<ProductId> = products.iter().map(|p| p.id.clone()).collect();
            debug!(requested = %id, available = ?known, "Product lookup failed");
            return Err(LedgerError::NotFound {
                id,
                available: self.settings.verbose_errors.then_some(known),
            });
        };

        let product = &products[index];
        if product.quantity < quantity {
            warn!(
                product_id = %id,
                available = product.quantity,
                requested = quantity,
                "Rejected sale: insufficient stock"
            );
            return Err(LedgerError::InsufficientStock {
                id,
                available: product.quantity,
                requested: quantity,
            });
        }

        let total_value = line_total(quantity, product.unit_value).ok_or_else(|| {
            LedgerError::InvalidInput(format!(
                "sale value of {} x {} is too large",
                quantity, product.unit_value
            ))
        })?;

        let mut sales = self.tables.load_sales()?;
        let original = products.clone();

        let product = &mut products[index];
        product.quantity -= quantity;
        let sale = Sale::of(product, quantity, stockbook_util::now());
        let receipt = SaleReceipt {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            quantity,
            unit_value: product.unit_value,
            total_value,
            remaining: product.quantity,
        };
        sales.push(sale);

        self.tables.save_products(&products)?;
        if let Err(e) = self.tables.save_sales(&sales) {
            warn!(
                product_id = %receipt.product_id,
                error = %e,
                "Sale not recorded, restoring stock"
            );
            if let Err(restore) = self.tables.save_products(&original) {
                error!(
                    product_id = %receipt.product_id,
                    error = %restore,
                    "Failed to restore stock after unrecorded sale"
                );
            }
            return Err(e.into());
        }

        info!(
            product_id = %receipt.product_id,
            quantity,
            total = %receipt.total_value,
            remaining = receipt.remaining,
            "Sale recorded"
        );
        Ok(receipt)
    }

    /// Current stock per product. Read failures yield an empty list.
    pub fn list_stock(&self) -> BestEffort<Vec<StockLine>> {
        match self.tables.load_products() {
            Ok(products) => BestEffort::ok(products.iter().map(StockLine::from).collect()),
            Err(e) => {
                warn!(error = %e, "Failed to read stock");
                BestEffort::degraded(Vec::new(), e.to_string())
            }
        }
    }

    /// Count and value of today's sales. Read failures yield an empty report.
    pub fn daily_sales_report(&self) -> BestEffort<DailySalesReport> {
        let today = stockbook_util::today();

        match self.tables.load_sales() {
            Ok(sales) => match DailySalesReport::for_date(today, &sales) {
                Some(report) => BestEffort::ok(report),
                None => {
                    warn!(date = %today, "Daily sales total overflows");
                    BestEffort::degraded(
                        DailySalesReport::empty(today),
                        "daily sales total is too large",
                    )
                }
            },
            Err(e) => {
                warn!(error = %e, "Failed to build daily sales report");
                BestEffort::degraded(DailySalesReport::empty(today), e.to_string())
            }
        }
    }

    /// Human-readable dump of every product, for diagnostics
    pub fn list_products_text(&self) -> String {
        match self.tables.load_products() {
            Ok(products) if products.is_empty() => "No products registered".to_string(),
            Ok(products) => render_products(&products),
            Err(e) => {
                warn!(error = %e, "Failed to list products");
                format!("Failed to list products: {}", e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveTime};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::atomic::Ordering;
    use stockbook_store::MemoryTables;

    fn ledger() -> LedgerStore<MemoryTables> {
        LedgerStore::new(MemoryTables::new(), LedgerSettings::default())
    }

    fn verbose_ledger() -> LedgerStore<MemoryTables> {
        let settings = LedgerSettings {
            verbose_errors: true,
            ..LedgerSettings::default()
        };
        LedgerStore::new(MemoryTables::new(), settings)
    }

    #[test]
    fn register_then_list() {
        let ledger = ledger();
        let product = ledger.register_product("1", "Widget", 10, dec!(2.50)).unwrap();
        assert_eq!(product.total_value(), Some(dec!(25.00)));

        let stock = ledger.list_stock();
        assert!(!stock.is_degraded());
        assert_eq!(
            stock.into_value(),
            vec![StockLine {
                id: ProductId::new("1"),
                name: "Widget".into(),
                quantity: 10,
            }]
        );
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let ledger = ledger();
        ledger.register_product(1u64, "Widget", 10, dec!(2.50)).unwrap();

        let result = ledger.register_product(" 1 ", "Other", 5, dec!(1));
        assert!(matches!(result, Err(LedgerError::DuplicateId(_))));

        let products = ledger.tables().load_products().unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Widget");
        assert_eq!(ledger.tables().write_count(), 1);
    }

    #[test]
    fn register_validates_input() {
        let ledger = ledger();
        assert!(matches!(
            ledger.register_product("", "Widget", 1, dec!(1)),
            Err(LedgerError::InvalidInput(_))
        ));
        assert!(matches!(
            ledger.register_product("1", "  ", 1, dec!(1)),
            Err(LedgerError::InvalidInput(_))
        ));
        assert!(matches!(
            ledger.register_product("1", "Widget", 1, dec!(-0.01)),
            Err(LedgerError::InvalidInput(_))
        ));
        assert!(ledger.register_product("1", "Freebie", 1, dec!(0)).is_ok());
    }

    #[test]
    fn register_surfaces_write_failure() {
        let ledger = ledger();
        ledger.tables().fail_writes.store(true, Ordering::SeqCst);

        let err = ledger.register_product("1", "Widget", 1, dec!(1)).unwrap_err();
        assert!(matches!(err, LedgerError::Store(_)));
        assert!(err.to_string().contains("simulated write failure"));
    }

    #[test]
    fn register_rejects_unrepresentable_stock_value() {
        let ledger = ledger();

        let err = ledger.register_product("2", "Big", 2, Decimal::MAX).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidInput(_)));
        assert_eq!(ledger.tables().write_count(), 0);

        let product = ledger.register_product("1", "Big", 1, Decimal::MAX).unwrap();
        assert_eq!(product.total_value(), Some(Decimal::MAX));
    }

    #[test]
    fn largest_quantity_registers_and_sells() {
        let ledger = ledger();
        let product = ledger.register_product("1", "Nut", u32::MAX, dec!(2.50)).unwrap();
        assert_eq!(product.total_value(), Some(dec!(10737418237.50)));

        let receipt = ledger.sell("1", u32::MAX).unwrap();
        assert_eq!(receipt.total_value, dec!(10737418237.50));
        assert_eq!(receipt.remaining, 0);

        let report = ledger.daily_sales_report();
        assert!(!report.is_degraded());
        assert_eq!(report.value().total_value, dec!(10737418237.50));
    }

    #[test]
    fn sell_decrements_stock_and_records_sale() {
        let ledger = ledger();
        ledger.register_product("1", "Widget", 10, dec!(2.50)).unwrap();

        let receipt = ledger.sell("1", 3).unwrap();
        assert_eq!(receipt.total_value, dec!(7.50));
        assert_eq!(receipt.remaining, 7);

        let products = ledger.tables().load_products().unwrap();
        assert_eq!(products[0].quantity, 7);
        assert_eq!(products[0].total_value(), Some(dec!(17.50)));

        let sales = ledger.tables().load_sales().unwrap();
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].product_name(), "Widget");
        assert_eq!(sales[0].quantity(), 3);
        assert_eq!(sales[0].total_value(), Some(dec!(7.50)));
        assert_eq!(sales[0].date(), stockbook_util::today());
    }

    #[test]
    fn sell_entire_stock() {
        let ledger = ledger();
        ledger.register_product("1", "Widget", 2, dec!(1)).unwrap();

        let receipt = ledger.sell("1", 2).unwrap();
        assert_eq!(receipt.remaining, 0);
        assert!(matches!(
            ledger.sell("1", 1),
            Err(LedgerError::InsufficientStock { available: 0, requested: 1, .. })
        ));
    }

    #[test]
    fn insufficient_stock_writes_nothing() {
        let ledger = ledger();
        ledger.register_product("1", "Widget", 10, dec!(2.50)).unwrap();
        let writes = ledger.tables().write_count();

        let err = ledger.sell("1", 100).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InsufficientStock { available: 10, requested: 100, .. }
        ));
        assert!(err.to_string().contains("10 available"));

        assert_eq!(ledger.tables().write_count(), writes);
        assert_eq!(ledger.tables().load_products().unwrap()[0].quantity, 10);
        assert!(ledger.tables().load_sales().unwrap().is_empty());
    }

    #[test]
    fn sell_with_no_products() {
        let ledger = ledger();
        assert!(matches!(ledger.sell("1", 1), Err(LedgerError::NoProducts)));
        assert_eq!(ledger.tables().write_count(), 0);
    }

    #[test]
    fn sell_zero_is_invalid() {
        let ledger = ledger();
        ledger.register_product("1", "Widget", 10, dec!(2.50)).unwrap();
        assert!(matches!(ledger.sell("1", 0), Err(LedgerError::InvalidInput(_))));
    }

    #[test]
    fn not_found_hides_ids_by_default() {
        let ledger = ledger();
        ledger.register_product("1", "Widget", 10, dec!(2.50)).unwrap();
        let writes = ledger.tables().write_count();

        let err = ledger.sell("9", 1).unwrap_err();
        assert!(matches!(err, LedgerError::NotFound { available: None, .. }));
        assert_eq!(err.to_string(), "Product not found: 9");
        assert_eq!(ledger.tables().write_count(), writes);
    }

    #[test]
    fn not_found_lists_ids_when_verbose() {
        let ledger = verbose_ledger();
        ledger.register_product("1", "Widget", 10, dec!(2.50)).unwrap();
        ledger.register_product("2", "Gadget", 1, dec!(9)).unwrap();

        let err = ledger.sell("9", 1).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Product not found: 9. Available IDs: 1, 2"
        );
    }

    #[test]
    fn numeric_id_matches_string_id() {
        let ledger = ledger();
        ledger.register_product("42", "Nut", 5, dec!(0.10)).unwrap();

        let receipt = ledger.sell(42u64, 2).unwrap();
        assert_eq!(receipt.product_id, ProductId::new("42"));
        assert_eq!(receipt.total_value, dec!(0.20));
    }

    #[test]
    fn failed_sale_record_restores_stock() {
        let ledger = ledger();
        ledger.register_product("1", "Widget", 10, dec!(2.50)).unwrap();
        ledger.tables().fail_sales_writes.store(true, Ordering::SeqCst);

        let err = ledger.sell("1", 3).unwrap_err();
        assert!(matches!(err, LedgerError::Store(StoreError::Unavailable(_))));

        let products = ledger.tables().load_products().unwrap();
        assert_eq!(products[0].quantity, 10);
        assert!(ledger.tables().load_sales().unwrap().is_empty());

        // Both tables still agree once writes recover
        ledger.tables().fail_sales_writes.store(false, Ordering::SeqCst);
        assert_eq!(ledger.sell("1", 3).unwrap().remaining, 7);
        assert_eq!(ledger.tables().load_sales().unwrap().len(), 1);
    }

    #[test]
    fn sell_surfaces_read_failure() {
        let ledger = ledger();
        ledger.register_product("1", "Widget", 10, dec!(2.50)).unwrap();
        ledger.tables().fail_reads.store(true, Ordering::SeqCst);

        assert!(matches!(ledger.sell("1", 1), Err(LedgerError::Store(_))));
    }

    #[test]
    fn list_stock_degrades_on_read_failure() {
        let ledger = ledger();
        ledger.register_product("1", "Widget", 10, dec!(2.50)).unwrap();
        ledger.tables().fail_reads.store(true, Ordering::SeqCst);

        let stock = ledger.list_stock();
        assert!(stock.is_degraded());
        assert!(stock.value().is_empty());
    }

    #[test]
    fn empty_daily_report() {
        let ledger = ledger();
        let report = ledger.daily_sales_report();
        assert!(!report.is_degraded());

        let report = report.into_value();
        assert_eq!(report.count, 0);
        assert_eq!(report.total_value, dec!(0));
        assert!(report.details.is_empty());
    }

    #[test]
    fn daily_report_only_counts_today() {
        let now = stockbook_util::now();
        let yesterday = now.date_naive() - Duration::days(1);
        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();

        let old_sale = Sale::new("Widget", 4, dec!(2.50), yesterday, noon);
        let tables = MemoryTables::with_rows(
            vec![Product::new(ProductId::new("1"), "Widget", 10, dec!(2.50))],
            vec![old_sale],
        );
        let ledger = LedgerStore::new(tables, LedgerSettings::default());

        ledger.sell("1", 3).unwrap();
        ledger.sell("1", 1).unwrap();

        let report = ledger.daily_sales_report().into_value();
        assert_eq!(report.count, 2);
        assert_eq!(report.total_value, dec!(10.00));
        assert_eq!(report.details.len(), 2);

        // Older sales stay in storage
        assert_eq!(ledger.tables().load_sales().unwrap().len(), 3);
    }

    #[test]
    fn daily_report_degrades_on_read_failure() {
        let ledger = ledger();
        ledger.tables().fail_reads.store(true, Ordering::SeqCst);

        let report = ledger.daily_sales_report();
        assert!(report.is_degraded());
        assert_eq!(report.value().count, 0);
    }

    #[test]
    fn daily_report_degrades_on_overflowing_total() {
        let now = stockbook_util::now();
        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        let big = Sale::new("Big", 1, Decimal::MAX, now.date_naive(), noon);
        let tables = MemoryTables::with_rows(Vec::new(), vec![big.clone(), big]);
        let ledger = LedgerStore::new(tables, LedgerSettings::default());

        let report = ledger.daily_sales_report();
        assert!(report.is_degraded());
        assert_eq!(report.value().count, 0);
    }

    #[test]
    fn products_text() {
        let ledger = ledger();
        assert_eq!(ledger.list_products_text(), "No products registered");

        ledger.register_product("1", "Widget", 10, dec!(2.50)).unwrap();
        let text = ledger.list_products_text();
        assert!(text.contains("Widget"));
        assert!(text.contains("2.50"));

        ledger.tables().fail_reads.store(true, Ordering::SeqCst);
        assert!(ledger.list_products_text().starts_with("Failed to list products:"));
    }
}
