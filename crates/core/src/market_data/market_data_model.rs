//! Models for the session market data layer.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use folio_market_data::PriceSeries;

/// A ticker excluded from the report, with the reason it resolved to
/// nothing. Dropping is a warning, never a run failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DroppedTicker {
    pub ticker: String,
    pub reason: String,
}

/// Outcome of a bulk daily-bar fetch.
#[derive(Debug, Default)]
pub struct BulkBarsResult {
    /// Usable series keyed by ticker.
    pub series: HashMap<String, PriceSeries>,
    /// Tickers the provider could not resolve.
    pub dropped: Vec<DroppedTicker>,
}
