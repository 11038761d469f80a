//! Statistics module - trading activity, composition, correlation and risk analytics

mod statistics_model;
mod statistics_service;


pub use statistics_model::{
    CompositionSlice, CorrelationMatrix, MonthlyActivity, PortfolioStatistics, ReturnRiskPoint,
};
pub use statistics_service::{
    composition, compute_statistics, correlation_matrix, monthly_activity, return_risk,
};
