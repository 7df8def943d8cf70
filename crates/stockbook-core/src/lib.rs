//! Ledger operations for stockbook
//!
//! This crate contains:
//! - The ledger store: product registration and the sale workflow
//!   (stock decrement and sale record as one logical unit)
//! - Best-effort reporting: stock listing and the daily sales report
//! - The placeholder credential check used by the CLI

mod auth;
mod ledger;
mod report;

pub use auth::*;
pub use ledger::*;
pub use report::*;
