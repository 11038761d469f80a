//! Valuation module - aligns ledger state with market prices into daily positions

mod series_aligner;
mod valuation_model;

#[cfg(test)]
mod series_aligner_tests;

pub use series_aligner::align_series;
pub use valuation_model::DailyPosition;
