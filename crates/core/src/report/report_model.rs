use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_INSTRUMENT_CURRENCY;
use crate::market_data::DroppedTicker;
use crate::portfolio::{DailyPosition, PortfolioSnapshot, PortfolioStatistics};

/// Date range a report covers, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Where the brokerage export is read from.
#[derive(Debug, Clone)]
pub enum CsvSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

/// Inputs for one report run.
#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub csv_source: CsvSource,
    /// Overrides the currency detected from the export header when set.
    pub reporting_currency: Option<String>,
    /// Currency assumed for instruments whose provider reports none.
    pub instrument_currency: String,
    /// Optional window override. Defaults to the span of the imported
    /// trades, extended one day past the last trade.
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl ReportRequest {
    pub fn new(csv_source: CsvSource) -> Self {
        Self {
            csv_source,
            reporting_currency: None,
            instrument_currency: DEFAULT_INSTRUMENT_CURRENCY.to_string(),
            start: None,
            end: None,
        }
    }
}

/// A complete report: the two daily tables plus analytics and the
/// tickers that could not be valued.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioReport {
    pub window: ReportWindow,
    pub reporting_currency: String,
    /// Per-ticker daily positions, ordered by ticker then date.
    pub daily_positions: Vec<DailyPosition>,
    /// Portfolio totals by date.
    pub snapshots: Vec<PortfolioSnapshot>,
    pub dropped_tickers: Vec<DroppedTicker>,
    pub statistics: PortfolioStatistics,
}
