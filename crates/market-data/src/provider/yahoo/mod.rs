//! Yahoo Finance market data provider.
//!
//! Serves daily close bars for equities/ETFs (e.g. AAPL, SHOP.TO) and FX
//! rate series through the `{from}{to}=X` symbol convention
//! (e.g. USDEUR=X). Bar timestamps arrive in GMT and are floored to the
//! UTC calendar day.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use log::debug;
use rust_decimal::Decimal;
use time::OffsetDateTime;
use yahoo_finance_api as yahoo;

use crate::errors::MarketDataError;
use crate::models::{FxRate, PriceBar, PriceSeries};
use crate::provider::MarketDataProvider;

/// Provider identifier used in logs and error attribution.
pub const YAHOO_PROVIDER_ID: &str = "YAHOO";

/// Yahoo Finance market data provider.
pub struct YahooProvider {
    connector: yahoo::YahooConnector,
}

impl YahooProvider {
    pub fn new() -> Result<Self, MarketDataError> {
        let connector =
            yahoo::YahooConnector::new().map_err(|e| MarketDataError::ProviderError {
                provider: YAHOO_PROVIDER_ID.to_string(),
                message: format!("Failed to initialize Yahoo connector: {}", e),
            })?;
        Ok(Self { connector })
    }

    /// Yahoo symbol for an FX pair: USD/EUR becomes "USDEUR=X".
    pub fn fx_symbol(from_currency: &str, to_currency: &str) -> String {
        format!("{}{}=X", from_currency, to_currency)
    }

    /// Convert a chrono date to the `time` type the Yahoo API expects,
    /// at midnight UTC.
    fn to_offset_datetime(date: NaiveDate) -> OffsetDateTime {
        let timestamp = Utc
            .from_utc_datetime(&date.and_time(NaiveTime::MIN))
            .timestamp();
        OffsetDateTime::from_unix_timestamp(timestamp)
            .unwrap_or_else(|_| OffsetDateTime::now_utc())
    }

    /// Collapse timestamped close observations into daily bars.
    ///
    /// Observations are expected in ascending timestamp order. Several
    /// observations can map onto one GMT day; the last one wins.
    fn collapse_to_daily(
        observations: impl IntoIterator<Item = (DateTime<Utc>, Decimal)>,
    ) -> Vec<PriceBar> {
        let mut bars: Vec<PriceBar> = Vec::new();
        for (timestamp, close) in observations {
            let date = timestamp.date_naive();
            match bars.last_mut() {
                Some(last) if last.date == date => last.close = close,
                _ => bars.push(PriceBar { date, close }),
            }
        }
        bars
    }

    fn quotes_to_daily_bars(
        symbol: &str,
        quotes: Vec<yahoo::Quote>,
    ) -> Result<Vec<PriceBar>, MarketDataError> {
        let mut observations = Vec::with_capacity(quotes.len());
        for quote in quotes {
            let timestamp = Utc
                .timestamp_opt(quote.timestamp as i64, 0)
                .single()
                .ok_or_else(|| MarketDataError::ValidationFailed {
                    message: format!(
                        "Invalid quote timestamp {} for symbol {}",
                        quote.timestamp, symbol
                    ),
                })?;
            match Decimal::from_f64_retain(quote.close) {
                Some(close) => observations.push((timestamp, close)),
                None => {
                    debug!(
                        "Skipping unconvertible close {} for {} at {}",
                        quote.close, symbol, timestamp
                    );
                }
            }
        }
        Ok(Self::collapse_to_daily(observations))
    }
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    fn id(&self) -> &'static str {
        YAHOO_PROVIDER_ID
    }

    async fn fetch_daily_bars(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        fallback_currency: &str,
    ) -> Result<PriceSeries, MarketDataError> {
        debug!("Fetching daily bars for {} from {} to {}", symbol, start, end);

        let start_offset = Self::to_offset_datetime(start);
        // The chart API treats the end bound as exclusive; push it one day
        // out so `end` itself is covered.
        let end_offset = Self::to_offset_datetime(end.succ_opt().unwrap_or(end));

        let response = self
            .connector
            .get_quote_history(symbol, start_offset, end_offset)
            .await?;
        let quotes = response.quotes()?;
        let bars = Self::quotes_to_daily_bars(symbol, quotes)?;

        Ok(PriceSeries {
            symbol: symbol.to_string(),
            currency: fallback_currency.to_string(),
            bars,
        })
    }

    async fn fetch_fx_series(
        &self,
        from_currency: &str,
        to_currency: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<FxRate>, MarketDataError> {
        let symbol = Self::fx_symbol(from_currency, to_currency);
        let series = self
            .fetch_daily_bars(&symbol, start, end, to_currency)
            .await?;

        Ok(series
            .bars
            .into_iter()
            .map(|bar| FxRate {
                date: bar.date,
                rate: bar.close,
            })
            .collect())
    }
}
