//! Report and result types returned by the ledger

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use stockbook_store::{Product, Sale};
use stockbook_util::{Money, ProductId, checked_sum, format_money, round_money};

/// Result of a read that never fails.
///
/// When the underlying tables could not be read, `value` holds an empty
/// fallback and the reason is kept alongside it.
#[derive(Debug, Clone, PartialEq)]
pub struct BestEffort<T> {
    value: T,
    degraded: Option<String>,
}

impl<T> BestEffort<T> {
    pub fn ok(value: T) -> Self {
        Self {
            value,
            degraded: None,
        }
    }

    pub fn degraded(fallback: T, reason: impl Into<String>) -> Self {
        Self {
            value: fallback,
            degraded: Some(reason.into()),
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded.is_some()
    }

    /// Why the value is a fallback, if it is one
    pub fn degradation(&self) -> Option<&str> {
        self.degraded.as_deref()
    }
}

/// One line of the stock listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockLine {
    pub id: ProductId,
    pub name: String,
    pub quantity: u32,
}

impl From<&Product> for StockLine {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            quantity: product.quantity,
        }
    }
}

/// A sale as shown in the daily report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaleDetail {
    pub product_name: String,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::str")]
    pub unit_value: Money,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_value: Money,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl SaleDetail {
    /// `None` when the sale total does not fit in a `Money`
    pub fn from_sale(sale: &Sale) -> Option<Self> {
        Some(Self {
            product_name: sale.product_name().to_string(),
            quantity: sale.quantity(),
            unit_value: sale.unit_value(),
            total_value: sale.total_value()?,
            date: sale.date(),
            time: sale.time(),
        })
    }
}

/// Sales made on a single day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailySalesReport {
    pub date: NaiveDate,
    pub count: usize,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_value: Money,
    pub details: Vec<SaleDetail>,
}

impl DailySalesReport {
    /// Report with no sales
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            count: 0,
            total_value: round_money(Money::ZERO),
            details: Vec::new(),
        }
    }

    /// Aggregate the sales made on `date`; other days are skipped.
    ///
    /// `None` if a sale total or the day's sum overflows.
    pub fn for_date<'a>(
        date: NaiveDate,
        sales: impl IntoIterator<Item = &'a Sale>,
    ) -> Option<Self> {
        let details = sales
            .into_iter()
            .filter(|sale| sale.date() == date)
            .map(SaleDetail::from_sale)
            .collect::<Option<Vec<_>>>()?;

        let total_value = checked_sum(details.iter().map(|d| d.total_value))?;

        Some(Self {
            date,
            count: details.len(),
            total_value,
            details,
        })
    }
}

/// Outcome of a successful sale
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleReceipt {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub unit_value: Money,
    pub total_value: Money,
    /// Stock left after the sale
    pub remaining: u32,
}

impl SaleReceipt {
    /// Confirmation line for the operator
    pub fn confirmation(&self, currency_symbol: &str) -> String {
        format!(
            "Sale completed! Total: {}",
            format_money(currency_symbol, self.total_value)
        )
    }
}

/// Render products as an aligned text table
pub(crate) fn render_products(products: &[Product]) -> String {
    const HEADERS: [&str; 4] = ["id", "name", "quantity", "unit_value"];

    let rows: Vec<[String; 4]> = products
        .iter()
        .map(|p| {
            [
                p.id.to_string(),
                p.name.clone(),
                p.quantity.to_string(),
                p.unit_value.to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header = HEADERS.map(str::to_string);
    for row in std::iter::once(&header).chain(rows.iter()) {
        let line: Vec<String> = row
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:>width$}", cell, width = width))
            .collect();
        out.push_str(&line.join(" "));
        out.push('\n');
    }
    out.pop();
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, d).unwrap()
    }

    fn sale(name: &str, quantity: u32, unit: Money, date: NaiveDate) -> Sale {
        Sale::new(name, quantity, unit, date, NaiveTime::from_hms_opt(12, 0, 0).unwrap())
    }

    #[test]
    fn report_filters_by_date() {
        let sales = vec![
            sale("Widget", 3, dec!(2.50), day(1)),
            sale("Gadget", 1, dec!(10), day(2)),
            sale("Widget", 2, dec!(2.50), day(2)),
        ];

        let report = DailySalesReport::for_date(day(2), &sales).unwrap();
        assert_eq!(report.count, 2);
        assert_eq!(report.total_value, dec!(15.00));
        assert_eq!(report.details[0].product_name, "Gadget");
        assert_eq!(report.details[1].total_value, dec!(5.00));
    }

    #[test]
    fn empty_report() {
        let report = DailySalesReport::for_date(day(1), &Vec::new()).unwrap();
        assert_eq!(report, DailySalesReport::empty(day(1)));
        assert_eq!(report.total_value.to_string(), "0.00");
    }

    #[test]
    fn report_serializes_money_as_strings() {
        let sales = vec![sale("Widget", 3, dec!(2.50), day(1))];
        let report = DailySalesReport::for_date(day(1), &sales).unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["total_value"], "7.50");
        assert_eq!(json["count"], 1);
        assert_eq!(json["details"][0]["date"], "2025-05-01");
        assert_eq!(json["details"][0]["time"], "12:00:00");
    }

    #[test]
    fn report_overflow_is_none() {
        let sales = vec![
            sale("Big", 1, Money::MAX, day(1)),
            sale("Big", 1, Money::MAX, day(1)),
        ];
        assert_eq!(DailySalesReport::for_date(day(1), &sales), None);

        // One of them alone still fits
        let report = DailySalesReport::for_date(day(1), &sales[..1]).unwrap();
        assert_eq!(report.total_value, Money::MAX);

        let oversized = vec![sale("Big", 2, Money::MAX, day(1))];
        assert_eq!(DailySalesReport::for_date(day(1), &oversized), None);
        // Other days are not totalled
        assert!(DailySalesReport::for_date(day(2), &oversized).is_some());
    }

    #[test]
    fn best_effort_markers() {
        let fresh = BestEffort::ok(vec![1]);
        assert!(!fresh.is_degraded());
        assert_eq!(fresh.into_value(), vec![1]);

        let fallback: BestEffort<Vec<i32>> = BestEffort::degraded(Vec::new(), "disk on fire");
        assert!(fallback.is_degraded());
        assert_eq!(fallback.degradation(), Some("disk on fire"));
        assert!(fallback.value().is_empty());
    }

    #[test]
    fn receipt_confirmation() {
        let receipt = SaleReceipt {
            product_id: ProductId::new("1"),
            product_name: "Widget".into(),
            quantity: 3,
            unit_value: dec!(2.50),
            total_value: dec!(7.50),
            remaining: 7,
        };
        assert_eq!(receipt.confirmation("R$"), "Sale completed! Total: R$ 7.50");
    }

    #[test]
    fn products_render_aligned() {
        let products = vec![
            Product::new(ProductId::new("1"), "Widget", 10, dec!(2.50)),
            Product::new(ProductId::new("22"), "Nut", 5, dec!(0.10)),
        ];

        let text = render_products(&products);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "id   name quantity unit_value");
        assert_eq!(lines[1], " 1 Widget       10       2.50");
        assert_eq!(lines[2], "22    Nut        5       0.10");
    }
}
