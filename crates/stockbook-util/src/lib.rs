//! Shared utilities for stockbook
//!
//! This crate provides:
//! - Product ID type with normalized comparison
//! - Clock utilities (local date/time stamps, mock time for development)
//! - Money helpers built on `rust_decimal`
//! - Default paths for config and data directories

mod ids;
mod money;
mod paths;
mod time;

pub use ids::*;
pub use money::*;
pub use paths::*;
pub use time::*;
