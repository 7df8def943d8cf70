//! Command dispatch

use anyhow::{Context, Result};
use std::io::Write;
use stockbook_core::{BestEffort, LedgerStore, authenticate};
use stockbook_store::Tables;
use stockbook_util::format_money;
use tracing::warn;

use crate::Command;

/// Credentials supplied on the command line or through the environment
#[derive(Debug, Default)]
pub(crate) struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Credentials {
    fn accepted(&self) -> bool {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => authenticate(user, pass),
            _ => false,
        }
    }
}

/// Run one command, writing results to `out` and problems to `err`.
///
/// Returns whether the command succeeded.
pub(crate) fn execute<T: Tables>(
    ledger: &LedgerStore<T>,
    command: &Command,
    credentials: &Credentials,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<bool> {
    let currency = ledger.settings().currency_symbol.as_str();

    match command {
        Command::Register {
            id,
            name,
            quantity,
            unit_value,
        } => {
            if !require_login(credentials, err)? {
                return Ok(false);
            }
            match ledger.register_product(id.as_str(), name, *quantity, *unit_value) {
                Ok(product) => {
                    writeln!(out, "Product registered successfully!")?;
                    if let Some(value) = product.total_value() {
                        writeln!(
                            out,
                            "{} ({}): {} in stock, {}",
                            product.name,
                            product.id,
                            product.quantity,
                            format_money(currency, value)
                        )?;
                    }
                    Ok(true)
                }
                Err(e) => {
                    writeln!(err, "Failed to register product: {}", e)?;
                    Ok(false)
                }
            }
        }

        Command::Sell { id, quantity } => {
            if !require_login(credentials, err)? {
                return Ok(false);
            }
            match ledger.sell(id.as_str(), *quantity) {
                Ok(receipt) => {
                    writeln!(out, "{}", receipt.confirmation(currency))?;
                    writeln!(out, "{} left in stock", receipt.remaining)?;
                    Ok(true)
                }
                Err(e) => {
                    writeln!(err, "Sale failed: {}", e)?;
                    Ok(false)
                }
            }
        }

        Command::Stock => {
            let stock = ledger.list_stock();
            report_degraded(&stock, err)?;
            if stock.value().is_empty() {
                writeln!(out, "No products in stock")?;
            }
            for line in stock.value() {
                writeln!(out, "{}\t{}\t{}", line.id, line.name, line.quantity)?;
            }
            Ok(true)
        }

        Command::Report { json } => {
            let report = ledger.daily_sales_report();
            report_degraded(&report, err)?;
            let report = report.value();

            if *json {
                let text =
                    serde_json::to_string_pretty(report).context("Failed to serialize report")?;
                writeln!(out, "{}", text)?;
                return Ok(true);
            }

            writeln!(out, "Sales on {}: {}", report.date, report.count)?;
            writeln!(out, "Total: {}", format_money(currency, report.total_value))?;
            for sale in &report.details {
                writeln!(
                    out,
                    "  {}  {} x{} @ {} = {}",
                    sale.time.format("%H:%M:%S"),
                    sale.product_name,
                    sale.quantity,
                    sale.unit_value,
                    sale.total_value
                )?;
            }
            Ok(true)
        }

        Command::Products => {
            writeln!(out, "{}", ledger.list_products_text())?;
            Ok(true)
        }

        Command::Login { username, password } => {
            if authenticate(username, password) {
                writeln!(out, "Login accepted")?;
                Ok(true)
            } else {
                writeln!(err, "Invalid username or password")?;
                Ok(false)
            }
        }
    }
}

fn require_login(credentials: &Credentials, err: &mut impl Write) -> Result<bool> {
    if credentials.accepted() {
        return Ok(true);
    }
    warn!(username = ?credentials.username, "Rejected command: not logged in");
    writeln!(
        err,
        "Authentication required: pass --user and --password (or STOCKBOOK_USER / STOCKBOOK_PASSWORD)"
    )?;
    Ok(false)
}

fn report_degraded<T>(result: &BestEffort<T>, err: &mut impl Write) -> Result<()> {
    if let Some(reason) = result.degradation() {
        writeln!(err, "Warning: showing no data, tables could not be read ({})", reason)?;
    }
    Ok(())
}
