//! Portfolio module - ledger construction, valuation, aggregation and statistics.

pub mod aggregation;
pub mod ledger;
pub mod statistics;
pub mod valuation;

pub use aggregation::*;
pub use ledger::*;
pub use statistics::*;
pub use valuation::*;
