use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Portfolio totals for one calendar day, summed across every held ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSnapshot {
    pub date: NaiveDate,
    /// Market value of all positions in the reporting currency.
    pub total_value: Decimal,
    /// Capital currently tied up across all positions.
    pub total_invested: Decimal,
    /// Profit locked in by sales up to and including this day.
    pub realized_profit_to_date: Decimal,
    /// Unrealized gain or loss: total value minus invested capital.
    pub floating_profit: Decimal,
}
