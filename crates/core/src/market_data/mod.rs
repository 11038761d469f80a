//! Market data module - session orchestration over the provider crate.

mod market_data_model;
mod market_data_service;

#[cfg(test)]
mod market_data_service_tests;

pub use market_data_model::{BulkBarsResult, DroppedTicker};
pub use market_data_service::MarketDataService;
