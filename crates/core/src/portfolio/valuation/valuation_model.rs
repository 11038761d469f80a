//! Valuation domain models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One valued day of one ticker on the aligned axis.
///
/// Rows exist for every trade day and bar day between the ticker's
/// first trade and the report end. A day without a trade carries the
/// prior ledger state; a day without a bar carries the prior close.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPosition {
    pub date: NaiveDate,
    pub ticker: String,
    pub cumulative_shares: Decimal,
    /// Average cost per share, reporting currency. `None` while flat.
    pub average_cost: Option<Decimal>,
    /// Daily close in the instrument currency, forward-filled.
    pub close: Decimal,
    /// Invested capital still in the position, reporting currency.
    pub cumulative_invested: Decimal,
    /// Position value in the reporting currency: shares x close x fx.
    pub market_value: Decimal,
    /// Realized profit accumulated for this ticker up to this date.
    pub realized_profit_to_date: Decimal,
}
