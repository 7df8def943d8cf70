//! Product and sale records

use chrono::{DateTime, Local, NaiveDate, NaiveTime, Timelike};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stockbook_util::{Money, ProductId, line_total};

use crate::{StoreError, StoreResult};

/// Products table columns, in stored order
pub const PRODUCT_COLUMNS: [&str; 5] = ["id", "name", "quantity", "unit_value", "total_value"];

/// Sales table columns, in stored order
pub const SALE_COLUMNS: [&str; 6] = [
    "product_name",
    "quantity",
    "unit_value",
    "total_value",
    "date",
    "time",
];

/// A registered product.
///
/// The stock value is not a field: it is always derived from the current
/// quantity and unit value, see [`Product::total_value`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub unit_value: Money,
}

impl Product {
    pub fn new(id: ProductId, name: impl Into<String>, quantity: u32, unit_value: Money) -> Self {
        Self {
            id,
            name: name.into(),
            quantity,
            unit_value,
        }
    }

    /// Value of the stock on hand, `None` if it does not fit in a `Money`.
    ///
    /// Products loaded from a table always have a value, and selling only
    /// lowers the quantity.
    pub fn total_value(&self) -> Option<Money> {
        line_total(self.quantity, self.unit_value)
    }
}

/// A completed sale. Sales are append-only and never modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sale {
    product_name: String,
    quantity: u32,
    unit_value: Money,
    date: NaiveDate,
    time: NaiveTime,
}

impl Sale {
    pub fn new(
        product_name: impl Into<String>,
        quantity: u32,
        unit_value: Money,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Self {
        Self {
            product_name: product_name.into(),
            quantity,
            unit_value,
            date,
            // Stored with whole-second precision
            time: time.with_nanosecond(0).unwrap_or(time),
        }
    }

    /// Sale of `quantity` units of `product`, stamped with the given instant
    pub fn of(product: &Product, quantity: u32, at: DateTime<Local>) -> Self {
        Self::new(
            product.name.clone(),
            quantity,
            product.unit_value,
            at.date_naive(),
            at.time(),
        )
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit value at the time of sale
    pub fn unit_value(&self) -> Money {
        self.unit_value
    }

    /// Value of the sale, `None` if it does not fit in a `Money`
    pub fn total_value(&self) -> Option<Money> {
        line_total(self.quantity, self.unit_value)
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn time(&self) -> NaiveTime {
        self.time
    }
}

/// Products table row as persisted
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ProductRow {
    id: String,
    name: String,
    quantity: u32,
    #[serde(with = "rust_decimal::serde::str")]
    unit_value: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    total_value: Decimal,
}

impl TryFrom<&Product> for ProductRow {
    type Error = StoreError;

    fn try_from(product: &Product) -> StoreResult<Self> {
        let total_value = product.total_value().ok_or_else(|| {
            StoreError::ValueOverflow(format!(
                "product {}: {} x {}",
                product.id, product.quantity, product.unit_value
            ))
        })?;

        Ok(Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            quantity: product.quantity,
            unit_value: product.unit_value,
            total_value,
        })
    }
}

impl ProductRow {
    /// The stored total is ignored and recomputed from quantity and unit value
    pub(crate) fn into_product(self, line: u64) -> StoreResult<Product> {
        if self.unit_value.is_sign_negative() {
            return Err(StoreError::MalformedRow {
                table: "products",
                line,
                message: format!("negative unit_value {}", self.unit_value),
            });
        }
        if line_total(self.quantity, self.unit_value).is_none() {
            return Err(StoreError::MalformedRow {
                table: "products",
                line,
                message: format!("total of {} x {} overflows", self.quantity, self.unit_value),
            });
        }
        Ok(Product::new(
            ProductId::new(self.id),
            self.name,
            self.quantity,
            self.unit_value,
        ))
    }
}

/// Sales table row as persisted
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct SaleRow {
    product_name: String,
    quantity: u32,
    #[serde(with = "rust_decimal::serde::str")]
    unit_value: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    total_value: Decimal,
    date: String,
    time: String,
}

impl TryFrom<&Sale> for SaleRow {
    type Error = StoreError;

    fn try_from(sale: &Sale) -> StoreResult<Self> {
        let total_value = sale.total_value().ok_or_else(|| {
            StoreError::ValueOverflow(format!(
                "sale of {}: {} x {}",
                sale.product_name, sale.quantity, sale.unit_value
            ))
        })?;

        Ok(Self {
            product_name: sale.product_name.clone(),
            quantity: sale.quantity,
            unit_value: sale.unit_value,
            total_value,
            date: stockbook_util::format_date(sale.date),
            time: stockbook_util::format_time(sale.time),
        })
    }
}

impl SaleRow {
    pub(crate) fn into_sale(self, line: u64) -> StoreResult<Sale> {
        let malformed = |message: String| StoreError::MalformedRow {
            table: "sales",
            line,
            message,
        };

        let date = stockbook_util::parse_date(&self.date)
            .map_err(|e| malformed(format!("bad date '{}': {}", self.date, e)))?;
        let time = stockbook_util::parse_time(&self.time)
            .map_err(|e| malformed(format!("bad time '{}': {}", self.time, e)))?;
        if line_total(self.quantity, self.unit_value).is_none() {
            return Err(malformed(format!(
                "total of {} x {} overflows",
                self.quantity, self.unit_value
            )));
        }

        Ok(Sale::new(
            self.product_name,
            self.quantity,
            self.unit_value,
            date,
            time,
        ))
    }
}
