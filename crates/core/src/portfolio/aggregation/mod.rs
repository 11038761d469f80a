//! Aggregation module - rolls per-ticker daily positions into portfolio totals

mod aggregation_model;
mod portfolio_aggregator;


pub use aggregation_model::PortfolioSnapshot;
pub use portfolio_aggregator::aggregate_daily_positions;
