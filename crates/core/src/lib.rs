//! Folio Core - Portfolio analysis from brokerage CSV exports.
//!
//! This crate contains the whole batch pipeline: trade import, average
//! cost ledgers, market data orchestration, currency normalization,
//! daily valuation and the report/export layer. It is provider-agnostic
//! and talks to market data through the traits in `folio-market-data`.

pub mod constants;
pub mod errors;
pub mod fx;
pub mod market_data;
pub mod portfolio;
pub mod report;
pub mod transactions;

// Re-export the pipeline types most callers need
pub use portfolio::*;
pub use report::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
