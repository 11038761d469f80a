//! Ledger module - per-ticker average-cost position reconstruction.

mod ledger_calculator;
mod ledger_model;


pub use ledger_calculator::build_ledger;
pub use ledger_model::{LedgerEntry, TickerLedger};
