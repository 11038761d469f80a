//! Transactions module - import, normalization and domain models.

mod csv_importer;
mod transactions_constants;
mod transactions_errors;
mod transactions_model;

pub use csv_importer::{import_bytes, import_file, ImportedTransactions};
pub use transactions_constants::*;
pub use transactions_errors::ImportError;
pub use transactions_model::{sort_chronologically, TradeAction, Transaction};
