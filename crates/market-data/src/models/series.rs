use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One daily closing observation for an instrument.
///
/// Providers emit at most one bar per trading day; non-trading days carry
/// no bar at all.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBar {
    /// UTC calendar day of the observation
    pub date: NaiveDate,

    /// Closing price in the instrument's native currency
    pub close: Decimal,
}

/// A daily close-price history for one symbol.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PriceSeries {
    /// Provider symbol the series was fetched for
    pub symbol: String,

    /// Native currency of the prices
    pub currency: String,

    /// Bars ordered by date ascending, at most one per day
    pub bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Date of the first bar, if any.
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    /// Date of the last bar, if any.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }
}

/// One daily foreign-exchange observation for a currency pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FxRate {
    /// UTC calendar day of the observation
    pub date: NaiveDate,

    /// Units of the target currency per unit of the source currency
    pub rate: Decimal,
}
