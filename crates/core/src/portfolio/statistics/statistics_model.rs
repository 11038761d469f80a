use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Buy and sell counts for one calendar month of trading activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyActivity {
    pub year: i32,
    pub month: u32,
    pub buy_count: u32,
    pub sell_count: u32,
}

/// One ticker's share of the portfolio on the final valued date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionSlice {
    pub ticker: String,
    pub market_value: Decimal,
    /// Fraction of the summed market value, in [0, 1].
    pub weight: Decimal,
}

/// Pairwise Pearson correlation of daily close returns.
///
/// `values[i][j]` correlates `tickers[i]` with `tickers[j]`. Pairs with too
/// little overlapping history or no price movement carry `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationMatrix {
    pub tickers: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }
}

/// Mean and dispersion of one ticker's daily returns over the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnRiskPoint {
    pub ticker: String,
    pub mean_daily_return: f64,
    pub daily_return_std: f64,
}

/// The full analytics bundle attached to a portfolio report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioStatistics {
    pub monthly_activity: Vec<MonthlyActivity>,
    pub composition: Vec<CompositionSlice>,
    pub correlation: CorrelationMatrix,
    pub return_risk: Vec<ReturnRiskPoint>,
}
