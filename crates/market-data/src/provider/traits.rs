//! Market data provider trait definition.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::MarketDataError;
use crate::models::{FxRate, PriceSeries};

/// Trait for market data providers.
///
/// Implement this trait to add support for a new market data source. The
/// trait is object-safe so services can hold providers as
/// `Arc<dyn MarketDataProvider>` and tests can substitute in-memory fakes.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Unique identifier for this provider, e.g. "YAHOO".
    ///
    /// Used for logging and error attribution.
    fn id(&self) -> &'static str;

    /// Fetch daily close bars for a symbol over an inclusive date range.
    ///
    /// The provider may not know the instrument's native currency;
    /// `fallback_currency` is used to tag the series when the source does
    /// not report one. Bars are returned ordered by date ascending.
    async fn fetch_daily_bars(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        fallback_currency: &str,
    ) -> Result<PriceSeries, MarketDataError>;

    /// Fetch a daily FX rate series for a currency pair over an inclusive
    /// date range.
    ///
    /// A returned rate is multiplicative: an amount in `from_currency`
    /// times the rate yields the amount in `to_currency`. Observations are
    /// returned ordered by date ascending; days the FX market does not
    /// publish are simply absent.
    async fn fetch_fx_series(
        &self,
        from_currency: &str,
        to_currency: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<FxRate>, MarketDataError>;
}
